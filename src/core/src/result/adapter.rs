//! `adapt_raw`: turns an internal [`super::raw::RawGameResult`] into the
//! external [`super::v2::GameResultV2`] contract (spec §4.6). Strict by
//! construction — every mismatch between the raw payload and the
//! `GameContext` it's paired with is a rejection, never a silent rewrite.

use super::raw::RawGameResult;
use super::v2::{self, CanonicalTotals, DerivedPlayerPct, GameContext, GameInfo, GameResultV2, V2GameState, V2Meta, V2PlayerRow, V2TeamResult};
use crate::error::{EngineError, Result};
use std::collections::HashMap;

fn pct(makes: u32, attempts: u32) -> f64 {
    if attempts == 0 {
        0.0
    } else {
        makes as f64 / attempts as f64
    }
}

/// `game_state` sub-maps may arrive keyed by the two canonical team_ids
/// already, or — "for some engine variants" (spec §4.6) — by the literal
/// strings `home`/`away`. Anything else is rejected rather than guessed at.
fn remap_side_keyed<T>(label: &str, map: HashMap<String, T>, home_id: &str, away_id: &str) -> Result<HashMap<String, T>> {
    if map.len() != 2 {
        return Err(EngineError::Adapter(format!("raw game_state.{label} must have exactly 2 entries, got {}", map.len())));
    }
    if map.contains_key(home_id) && map.contains_key(away_id) {
        return Ok(map);
    }
    let mut iter = map.into_iter().collect::<Vec<_>>();
    let has_home = iter.iter().any(|(k, _)| k == "home");
    let has_away = iter.iter().any(|(k, _)| k == "away");
    if has_home && has_away {
        let mut out = HashMap::new();
        while let Some((k, v)) = iter.pop() {
            match k.as_str() {
                "home" => {
                    out.insert(home_id.to_string(), v);
                }
                "away" => {
                    out.insert(away_id.to_string(), v);
                }
                other => return Err(EngineError::Adapter(format!("raw game_state.{label} has unexpected side key '{other}'"))),
            }
        }
        return Ok(out);
    }
    Err(EngineError::Adapter(format!("raw game_state.{label} keyed neither by ({home_id}, {away_id}) nor by (home, away)")))
}

pub fn adapt_raw(raw: &RawGameResult, ctx: &GameContext) -> Result<GameResultV2> {
    ctx.validate()?;
    let home = ctx.home_team_id.as_str();
    let away = ctx.away_team_id.as_str();

    if raw.teams.contains_key("home") || raw.teams.contains_key("away") {
        return Err(EngineError::Adapter("raw.teams must be keyed by team_id, not 'home'/'away'".into()));
    }
    if raw.teams.len() != 2 {
        return Err(EngineError::Adapter(format!("raw.teams must have exactly 2 entries, got {}", raw.teams.len())));
    }
    for id in [home, away] {
        if !raw.teams.contains_key(id) {
            return Err(EngineError::Adapter(format!("raw.teams missing team_id '{id}' from GameContext")));
        }
    }

    let mut teams = HashMap::new();
    let mut final_scores = HashMap::new();
    for id in [home, away] {
        let raw_team = &raw.teams[id];
        let totals = CanonicalTotals {
            pts: raw_team.totals.pts,
            fgm: raw_team.totals.fgm,
            fga: raw_team.totals.fga,
            tpm: raw_team.totals.tpm,
            tpa: raw_team.totals.tpa,
            ftm: raw_team.totals.ftm,
            fta: raw_team.totals.fta,
            tov: raw_team.totals.tov,
            orb: raw_team.totals.orb,
            drb: raw_team.totals.drb,
            possessions: raw_team.totals.possessions,
            ast: raw_team.totals.ast,
            pitp: raw_team.totals.pitp,
            fastbreak_pts: raw_team.totals.fastbreak_pts,
            second_chance_pts: raw_team.totals.second_chance_pts,
            points_off_tov: raw_team.totals.points_off_tov,
        };
        final_scores.insert(id.to_string(), totals.pts);

        let mut extra_totals = HashMap::new();
        extra_totals.insert("AvgFatigue".to_string(), raw_team.avg_fatigue);

        let mut breakdowns = HashMap::new();
        breakdowns.insert("possession_end_counts".to_string(), raw_team.breakdowns.possession_end_counts.clone());
        breakdowns.insert("shot_zones".to_string(), raw_team.breakdowns.shot_zones.clone());
        breakdowns.insert("off_action_counts".to_string(), raw_team.breakdowns.off_action_counts.clone());
        breakdowns.insert("def_action_counts".to_string(), raw_team.breakdowns.def_action_counts.clone());
        breakdowns.insert("outcome_counts".to_string(), raw_team.breakdowns.outcome_counts.clone());
        breakdowns.insert("role_fit_grade_counts".to_string(), raw_team.breakdowns.role_fit_grade_counts.clone());

        let mut extra_breakdowns = HashMap::new();
        let mut role_fit_bad = HashMap::new();
        role_fit_bad.insert("RoleFitBadTotals".to_string(), raw_team.breakdowns.role_fit_bad_totals);
        extra_breakdowns.insert("role_fit_bad_totals".to_string(), role_fit_bad);

        let players: Vec<V2PlayerRow> = raw_team
            .player_box
            .values()
            .map(|p| V2PlayerRow {
                player_id: p.player_id.clone(),
                team_id: p.team_id.clone(),
                pts: p.pts,
                fgm: p.fgm,
                fga: p.fga,
                tpm: p.tpm,
                tpa: p.tpa,
                ftm: p.ftm,
                fta: p.fta,
                tov: p.tov,
                orb: p.orb,
                drb: p.drb,
                ast: p.ast,
                minutes_played_sec: p.minutes_played_sec,
                derived: DerivedPlayerPct { fg_pct: pct(p.fgm, p.fga), tp_pct: pct(p.tpm, p.tpa), ft_pct: pct(p.ftm, p.fta) },
            })
            .collect();

        teams.insert(id.to_string(), V2TeamResult { totals, breakdowns, players, extra_totals, extra_breakdowns });
    }

    let game_state = V2GameState {
        team_fouls: remap_side_keyed("team_fouls", raw.game_state.team_fouls.clone(), home, away)?,
        player_fouls: remap_side_keyed("player_fouls", raw.game_state.player_fouls.clone(), home, away)?,
        fatigue: remap_side_keyed("fatigue", raw.game_state.fatigue.clone(), home, away)?,
        minutes_played_sec: remap_side_keyed("minutes_played_sec", raw.game_state.minutes_played_sec.clone(), home, away)?,
    };

    fn check_known_pids<V>(label: &str, map: &HashMap<String, HashMap<String, V>>, teams: &HashMap<String, V2TeamResult>) -> Result<()> {
        for (team_id, inner) in map {
            let known: std::collections::HashSet<&str> = teams[team_id].players.iter().map(|p| p.player_id.as_str()).collect();
            for pid in inner.keys() {
                if !known.contains(pid.as_str()) {
                    return Err(EngineError::Adapter(format!("raw game_state.{label}[{team_id}] references unknown player_id '{pid}'")));
                }
            }
        }
        Ok(())
    }
    check_known_pids("player_fouls", &game_state.player_fouls, &teams)?;
    check_known_pids("fatigue", &game_state.fatigue, &teams)?;
    check_known_pids("minutes_played_sec", &game_state.minutes_played_sec, &teams)?;

    let result = GameResultV2 {
        schema_version: v2::SCHEMA_VERSION.to_string(),
        game: GameInfo {
            game_id: ctx.game_id.clone(),
            date: ctx.date.clone(),
            season_id: ctx.season_id.clone(),
            phase: ctx.phase,
            home_team_id: ctx.home_team_id.clone(),
            away_team_id: ctx.away_team_id.clone(),
            overtime_periods: raw.meta.overtime_periods,
            possessions_per_team: raw.possessions_per_team.clone(),
        },
        final_scores,
        teams,
        game_state,
        meta: V2Meta {
            engine_name: "league_core".to_string(),
            engine_version: raw.meta.engine_version.clone(),
            era: raw.meta.era.clone(),
            era_version: raw.meta.era_version,
            replay_token: raw.meta.replay_token.clone(),
        },
        debug: if raw.meta.internal_debug.is_empty() { None } else { Some(raw.meta.internal_debug.clone()) },
        replay_events: raw.replay_events.clone(),
    };

    v2::validate(&result)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::raw::*;
    use crate::result::v2::Phase;

    fn sample_raw() -> RawGameResult {
        let mut home_box = HashMap::new();
        home_box.insert("h1".to_string(), RawPlayerBox { player_id: "h1".into(), team_id: "HOU".into(), pts: 20, fgm: 8, fga: 15, tpm: 2, tpa: 5, ftm: 2, fta: 2, tov: 1, orb: 1, drb: 4, ast: 3, minutes_played_sec: 2000.0 });
        let mut away_box = HashMap::new();
        away_box.insert("a1".to_string(), RawPlayerBox { player_id: "a1".into(), team_id: "DAL".into(), pts: 18, fgm: 7, fga: 14, tpm: 1, tpa: 4, ftm: 3, fta: 4, tov: 2, orb: 0, drb: 5, ast: 4, minutes_played_sec: 1900.0 });
        let mut teams = HashMap::new();
        teams.insert("HOU".to_string(), RawTeamResult { totals: RawTotals { pts: 102, fgm: 40, fga: 85, ..Default::default() }, breakdowns: RawBreakdowns::default(), player_box: home_box, avg_fatigue: 0.8 });
        teams.insert("DAL".to_string(), RawTeamResult { totals: RawTotals { pts: 99, fgm: 38, fga: 84, ..Default::default() }, breakdowns: RawBreakdowns::default(), player_box: away_box, avg_fatigue: 0.78 });

        RawGameResult {
            meta: RawMeta { engine_version: "test".into(), era: "default".into(), era_version: 1, overtime_periods: 0, replay_token: "tok".into(), validation_report: vec![], internal_debug: HashMap::new() },
            possessions_per_team: [("HOU".to_string(), 100), ("DAL".to_string(), 100)].into_iter().collect(),
            teams,
            game_state: RawGameStateResult {
                team_fouls: [("HOU".to_string(), 14), ("DAL".to_string(), 16)].into_iter().collect(),
                player_fouls: [("HOU".to_string(), [("h1".to_string(), 2)].into_iter().collect()), ("DAL".to_string(), [("a1".to_string(), 3)].into_iter().collect())].into_iter().collect(),
                fatigue: [("HOU".to_string(), [("h1".to_string(), 0.7)].into_iter().collect()), ("DAL".to_string(), [("a1".to_string(), 0.6)].into_iter().collect())].into_iter().collect(),
                minutes_played_sec: [("HOU".to_string(), [("h1".to_string(), 2000.0)].into_iter().collect()), ("DAL".to_string(), [("a1".to_string(), 1900.0)].into_iter().collect())].into_iter().collect(),
            },
            replay_events: None,
        }
    }

    fn ctx() -> GameContext {
        GameContext { game_id: "g1".into(), date: "2026-01-01".into(), season_id: "2025-26".into(), phase: Phase::Regular, home_team_id: "HOU".into(), away_team_id: "DAL".into() }
    }

    #[test]
    fn adapts_a_well_formed_raw_result() {
        let v2 = adapt_raw(&sample_raw(), &ctx()).expect("valid adaptation");
        assert_eq!(v2.final_scores["HOU"], 102);
        assert_eq!(v2.teams["HOU"].players[0].derived.fg_pct, 8.0 / 15.0);
        assert_eq!(v2.teams["HOU"].extra_totals["AvgFatigue"], 0.8);
    }

    #[test]
    fn rejects_unknown_player_id_in_game_state() {
        let mut raw = sample_raw();
        raw.game_state.fatigue.get_mut("HOU").unwrap().insert("ghost".to_string(), 1.0);
        assert!(adapt_raw(&raw, &ctx()).is_err());
    }

    #[test]
    fn remaps_home_away_side_keyed_game_state() {
        let mut raw = sample_raw();
        let fatigue = raw.game_state.fatigue.remove("HOU").unwrap();
        raw.game_state.fatigue.insert("home".to_string(), fatigue);
        let fatigue = raw.game_state.fatigue.remove("DAL").unwrap();
        raw.game_state.fatigue.insert("away".to_string(), fatigue);
        let v2 = adapt_raw(&raw, &ctx()).expect("side-keyed remap should succeed");
        assert!(v2.game_state.fatigue.contains_key("HOU"));
    }

    #[test]
    fn rejects_team_id_mismatch_with_context() {
        let raw = sample_raw();
        let mut bad_ctx = ctx();
        bad_ctx.home_team_id = "BOS".into();
        assert!(adapt_raw(&raw, &bad_ctx).is_err());
    }
}
