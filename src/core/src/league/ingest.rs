//! `ingest_game_result` (spec §4.7): folds one validated `GameResultV2`
//! into season-accumulated league state. The caller is responsible for
//! serializing calls against a single `LeagueState` (spec §5: "the only
//! shared mutation happening at `ingest_game_result`, which must be
//! serialized on the league state") — this function itself takes `&mut`
//! and does no locking of its own.

use super::state::{GameSummary, LeagueState, PhaseSlice, PlayerSeasonStats, SeasonArchive, TeamSeasonStats};
use crate::error::{EngineError, Result};
use crate::result::v2::{self, GameResultV2};
use std::collections::HashMap;

fn rollover(league: &mut LeagueState, new_season_id: &str) {
    let regular = league.take_regular_slice();
    let phase_containers = std::mem::take(&mut league.phase_containers);
    let archived_at_turn = league.cache_version;
    league.season_history.insert(league.active_season_id.clone(), SeasonArchive { regular, phase_containers, archived_at_turn });
    league.active_season_id = new_season_id.to_string();
}

fn accumulate_into(slice_player_stats: &mut HashMap<String, PlayerSeasonStats>, slice_team_stats: &mut HashMap<String, TeamSeasonStats>, slice_games: &mut Vec<GameSummary>, slice_game_results: &mut HashMap<String, GameResultV2>, v2: &GameResultV2) {
    for (team_id, team) in &v2.teams {
        let entry = slice_team_stats.entry(team_id.clone()).or_default();
        entry.games += 1;
        entry.totals += &team.totals;
        for (category, counts) in &team.breakdowns {
            let dst = entry.breakdowns.entry(category.clone()).or_default();
            for (key, count) in counts {
                *dst.entry(key.clone()).or_insert(0) += count;
            }
        }

        for row in &team.players {
            let player = slice_player_stats.entry(row.player_id.clone()).or_default();
            // V2PlayerRow carries no player name today; falls back to the
            // player_id until roster metadata is threaded through the v2
            // payload (see DESIGN.md).
            player.name = row.player_id.clone();
            player.team_id = row.team_id.clone();
            player.games += 1;
            player.totals.pts += row.pts;
            player.totals.fgm += row.fgm;
            player.totals.fga += row.fga;
            player.totals.tpm += row.tpm;
            player.totals.tpa += row.tpa;
            player.totals.ftm += row.ftm;
            player.totals.fta += row.fta;
            player.totals.tov += row.tov;
            player.totals.orb += row.orb;
            player.totals.drb += row.drb;
            player.totals.ast += row.ast;
        }
    }

    let home_score = v2.final_scores[&v2.game.home_team_id];
    let away_score = v2.final_scores[&v2.game.away_team_id];
    slice_games.push(GameSummary {
        game_id: v2.game.game_id.clone(),
        date: v2.game.date.clone(),
        home_team_id: v2.game.home_team_id.clone(),
        away_team_id: v2.game.away_team_id.clone(),
        home_score,
        away_score,
        status: "final".to_string(),
        is_overtime: v2.game.overtime_periods > 0,
        phase: v2.game.phase.as_str().to_string(),
        season_id: v2.game.season_id.clone(),
    });
    slice_game_results.insert(v2.game.game_id.clone(), v2.clone());
}

pub fn ingest_game_result(league: &mut LeagueState, result: &GameResultV2) -> Result<()> {
    v2::validate(result)?;

    if league.game_results.contains_key(&result.game.game_id) || league.phase_containers.values().any(|s| s.game_results.contains_key(&result.game.game_id)) {
        return Err(EngineError::Ingest(format!("game_id '{}' already ingested", result.game.game_id)));
    }

    if result.game.season_id != league.active_season_id {
        rollover(league, &result.game.season_id);
    }

    if result.game.phase == v2::Phase::Regular {
        accumulate_into(&mut league.player_stats, &mut league.team_stats, &mut league.games, &mut league.game_results, result);
    } else {
        let slice: &mut PhaseSlice = league.phase_containers.entry(result.game.phase.as_str().to_string()).or_default();
        accumulate_into(&mut slice.player_stats, &mut slice.team_stats, &mut slice.games, &mut slice.game_results, result);
    }

    let home_score = result.final_scores[&result.game.home_team_id];
    let away_score = result.final_scores[&result.game.away_team_id];
    league.master_schedule.mark_final(&result.game.game_id, home_score, away_score);

    league.cache_version += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::v2::{CanonicalTotals, GameInfo, GameResultV2, Phase, V2GameState, V2Meta, V2TeamResult};

    fn sample(game_id: &str, season_id: &str, phase: Phase, home: &str, away: &str, home_pts: u32, away_pts: u32) -> GameResultV2 {
        let mut teams = HashMap::new();
        teams.insert(home.to_string(), V2TeamResult { totals: CanonicalTotals { pts: home_pts, ..Default::default() }, ..Default::default() });
        teams.insert(away.to_string(), V2TeamResult { totals: CanonicalTotals { pts: away_pts, ..Default::default() }, ..Default::default() });
        let mut final_scores = HashMap::new();
        final_scores.insert(home.to_string(), home_pts);
        final_scores.insert(away.to_string(), away_pts);
        GameResultV2 {
            schema_version: v2::SCHEMA_VERSION.to_string(),
            game: GameInfo { game_id: game_id.to_string(), date: "2026-01-01".into(), season_id: season_id.to_string(), phase, home_team_id: home.to_string(), away_team_id: away.to_string(), overtime_periods: 0, possessions_per_team: HashMap::new() },
            final_scores,
            teams,
            game_state: V2GameState {
                team_fouls: [(home.to_string(), 0), (away.to_string(), 0)].into_iter().collect(),
                player_fouls: [(home.to_string(), HashMap::new()), (away.to_string(), HashMap::new())].into_iter().collect(),
                fatigue: [(home.to_string(), HashMap::new()), (away.to_string(), HashMap::new())].into_iter().collect(),
                minutes_played_sec: [(home.to_string(), HashMap::new()), (away.to_string(), HashMap::new())].into_iter().collect(),
            },
            meta: V2Meta { engine_name: "league_core".into(), engine_version: "test".into(), era: "default".into(), era_version: 1, replay_token: "tok".into() },
            debug: None,
            replay_events: None,
        }
    }

    #[test]
    fn ingest_accumulates_team_totals_and_appends_a_game_summary() {
        let mut league = LeagueState::new("2025-26");
        let v2 = sample("g1", "2025-26", Phase::Regular, "HOU", "DAL", 102, 99);
        ingest_game_result(&mut league, &v2).expect("ingest ok");

        assert_eq!(league.team_stats["HOU"].games, 1);
        assert_eq!(league.team_stats["HOU"].totals.pts, 102);
        assert_eq!(league.games.len(), 1);
        assert_eq!(league.games[0].home_score, 102);
        assert!(league.game_results.contains_key("g1"));
        assert_eq!(league.cache_version, 1);
    }

    #[test]
    fn ingest_rejects_a_duplicate_game_id() {
        let mut league = LeagueState::new("2025-26");
        let v2 = sample("g1", "2025-26", Phase::Regular, "HOU", "DAL", 102, 99);
        ingest_game_result(&mut league, &v2).unwrap();
        assert!(ingest_game_result(&mut league, &v2).is_err());
    }

    #[test]
    fn season_rollover_archives_the_prior_season_and_resets_live_accumulators() {
        let mut league = LeagueState::new("2025-26");
        ingest_game_result(&mut league, &sample("g1", "2025-26", Phase::Regular, "HOU", "DAL", 102, 99)).unwrap();
        ingest_game_result(&mut league, &sample("g2", "2026-27", Phase::Regular, "HOU", "DAL", 110, 108)).unwrap();

        assert_eq!(league.active_season_id, "2026-27");
        assert_eq!(league.games.len(), 1);
        assert_eq!(league.games[0].game_id, "g2");
        let archived = &league.season_history["2025-26"];
        assert_eq!(archived.regular.games.len(), 1);
        assert_eq!(archived.regular.games[0].game_id, "g1");
        assert_eq!(archived.archived_at_turn, 1);
    }

    #[test]
    fn non_regular_phase_accumulates_separately_from_the_regular_slice() {
        let mut league = LeagueState::new("2025-26");
        ingest_game_result(&mut league, &sample("g1", "2025-26", Phase::Playoffs, "HOU", "DAL", 102, 99)).unwrap();

        assert!(league.games.is_empty());
        assert!(league.team_stats.is_empty());
        let playoffs = &league.phase_containers["playoffs"];
        assert_eq!(playoffs.games.len(), 1);
        assert_eq!(playoffs.team_stats["HOU"].totals.pts, 102);
    }
}
