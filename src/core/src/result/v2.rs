//! `GameResultV2`: the stable, strictly-validated external game-output
//! contract (spec §3/§4.6) produced by [`super::adapter::adapt_raw`] and
//! consumed by [`crate::league::ingest`].

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const SCHEMA_VERSION: &str = "2.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Regular,
    PlayIn,
    Playoffs,
    Preseason,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Regular => "regular",
            Phase::PlayIn => "play_in",
            Phase::Playoffs => "playoffs",
            Phase::Preseason => "preseason",
        }
    }

    pub fn parse(s: &str) -> Option<Phase> {
        match s {
            "regular" => Some(Phase::Regular),
            "play_in" => Some(Phase::PlayIn),
            "playoffs" => Some(Phase::Playoffs),
            "preseason" => Some(Phase::Preseason),
            _ => None,
        }
    }
}

/// Input alongside a `RawGameResult` the adapter needs to produce a v2
/// payload (spec §6 "Input: GameContext").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameContext {
    pub game_id: String,
    pub date: String,
    pub season_id: String,
    pub phase: Phase,
    pub home_team_id: String,
    pub away_team_id: String,
}

impl GameContext {
    pub fn validate(&self) -> Result<()> {
        if self.game_id.is_empty() {
            return Err(EngineError::Contract("GameContext.game_id must be non-empty".into()));
        }
        if self.season_id.is_empty() {
            return Err(EngineError::Contract("GameContext.season_id must be non-empty".into()));
        }
        if self.home_team_id == self.away_team_id {
            return Err(EngineError::Contract(format!("GameContext home_team_id == away_team_id ('{}')", self.home_team_id)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameInfo {
    pub game_id: String,
    pub date: String,
    pub season_id: String,
    pub phase: Phase,
    pub home_team_id: String,
    pub away_team_id: String,
    pub overtime_periods: u32,
    pub possessions_per_team: HashMap<String, u32>,
}

/// The canonical, schema-stable totals row every team carries (spec
/// §4.6: "Normalize team totals into a canonical totals dict").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanonicalTotals {
    #[serde(rename = "PTS")]
    pub pts: u32,
    #[serde(rename = "FGM")]
    pub fgm: u32,
    #[serde(rename = "FGA")]
    pub fga: u32,
    #[serde(rename = "3PM")]
    pub tpm: u32,
    #[serde(rename = "3PA")]
    pub tpa: u32,
    #[serde(rename = "FTM")]
    pub ftm: u32,
    #[serde(rename = "FTA")]
    pub fta: u32,
    #[serde(rename = "TOV")]
    pub tov: u32,
    #[serde(rename = "ORB")]
    pub orb: u32,
    #[serde(rename = "DRB")]
    pub drb: u32,
    #[serde(rename = "Possessions")]
    pub possessions: u32,
    #[serde(rename = "AST")]
    pub ast: u32,
    #[serde(rename = "PITP")]
    pub pitp: u32,
    #[serde(rename = "FastbreakPTS")]
    pub fastbreak_pts: u32,
    #[serde(rename = "SecondChancePTS")]
    pub second_chance_pts: u32,
    #[serde(rename = "PointsOffTOV")]
    pub points_off_tov: u32,
}

impl std::ops::AddAssign<&CanonicalTotals> for CanonicalTotals {
    fn add_assign(&mut self, rhs: &CanonicalTotals) {
        self.pts += rhs.pts;
        self.fgm += rhs.fgm;
        self.fga += rhs.fga;
        self.tpm += rhs.tpm;
        self.tpa += rhs.tpa;
        self.ftm += rhs.ftm;
        self.fta += rhs.fta;
        self.tov += rhs.tov;
        self.orb += rhs.orb;
        self.drb += rhs.drb;
        self.possessions += rhs.possessions;
        self.ast += rhs.ast;
        self.pitp += rhs.pitp;
        self.fastbreak_pts += rhs.fastbreak_pts;
        self.second_chance_pts += rhs.second_chance_pts;
        self.points_off_tov += rhs.points_off_tov;
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DerivedPlayerPct {
    #[serde(rename = "FG_PCT")]
    pub fg_pct: f64,
    #[serde(rename = "3P_PCT")]
    pub tp_pct: f64,
    #[serde(rename = "FT_PCT")]
    pub ft_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct V2PlayerRow {
    #[serde(rename = "PlayerID")]
    pub player_id: String,
    #[serde(rename = "TeamID")]
    pub team_id: String,
    pub pts: u32,
    pub fgm: u32,
    pub fga: u32,
    pub tpm: u32,
    pub tpa: u32,
    pub ftm: u32,
    pub fta: u32,
    pub tov: u32,
    pub orb: u32,
    pub drb: u32,
    pub ast: u32,
    pub minutes_played_sec: f64,
    pub derived: DerivedPlayerPct,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct V2TeamResult {
    pub totals: CanonicalTotals,
    pub breakdowns: HashMap<String, HashMap<String, u32>>,
    pub players: Vec<V2PlayerRow>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra_totals: HashMap<String, f64>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra_breakdowns: HashMap<String, HashMap<String, u32>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct V2GameState {
    pub team_fouls: HashMap<String, u32>,
    pub player_fouls: HashMap<String, HashMap<String, u32>>,
    pub fatigue: HashMap<String, HashMap<String, f64>>,
    pub minutes_played_sec: HashMap<String, HashMap<String, f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct V2Meta {
    pub engine_name: String,
    pub engine_version: String,
    pub era: String,
    pub era_version: u32,
    pub replay_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResultV2 {
    pub schema_version: String,
    pub game: GameInfo,
    #[serde(rename = "final")]
    pub final_scores: HashMap<String, u32>,
    pub teams: HashMap<String, V2TeamResult>,
    pub game_state: V2GameState,
    pub meta: V2Meta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<HashMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay_events: Option<Vec<serde_json::Value>>,
}

/// Spec §6 "Output: GameResultV2" validation rules, re-checked
/// independently of the adapter that produced the payload (spec §4.7
/// step 1 calls this again on ingest, "belt-and-suspenders").
pub fn validate(v2: &GameResultV2) -> Result<()> {
    if v2.schema_version != SCHEMA_VERSION {
        return Err(EngineError::Adapter(format!("schema_version must be '{SCHEMA_VERSION}', got '{}'", v2.schema_version)));
    }
    let home = &v2.game.home_team_id;
    let away = &v2.game.away_team_id;
    if home == away {
        return Err(EngineError::Adapter("game.home_team_id == game.away_team_id".into()));
    }

    for id in [home, away] {
        if !v2.final_scores.contains_key(id) {
            return Err(EngineError::Adapter(format!("final scoreboard missing team_id '{id}'")));
        }
    }
    if v2.final_scores.len() != 2 {
        return Err(EngineError::Adapter(format!("final scoreboard must have exactly 2 entries, got {}", v2.final_scores.len())));
    }

    for id in [home, away] {
        let Some(team) = v2.teams.get(id) else {
            return Err(EngineError::Adapter(format!("teams map missing team_id '{id}'")));
        };
        for row in &team.players {
            if row.team_id != *id {
                return Err(EngineError::Adapter(format!("player '{}' row.team_id '{}' != containing team '{id}'", row.player_id, row.team_id)));
            }
        }
    }
    if v2.teams.len() != 2 {
        return Err(EngineError::Adapter(format!("teams map must have exactly 2 entries, got {}", v2.teams.len())));
    }

    let player_ids_for = |id: &str| -> std::collections::HashSet<&str> {
        v2.teams.get(id).map(|t| t.players.iter().map(|p| p.player_id.as_str()).collect()).unwrap_or_default()
    };
    let home_pids = player_ids_for(home);
    let away_pids = player_ids_for(away);

    let check_side_keyed = |label: &str, fouls: &HashMap<String, impl Sized>| -> Result<()> {
        for id in [home, away] {
            if !fouls.contains_key(id) {
                return Err(EngineError::Adapter(format!("game_state.{label} missing team_id '{id}'")));
            }
        }
        if fouls.len() != 2 {
            return Err(EngineError::Adapter(format!("game_state.{label} must have exactly 2 entries, got {}", fouls.len())));
        }
        Ok(())
    };
    check_side_keyed("team_fouls", &v2.game_state.team_fouls)?;
    check_side_keyed("player_fouls", &v2.game_state.player_fouls)?;
    check_side_keyed("fatigue", &v2.game_state.fatigue)?;
    check_side_keyed("minutes_played_sec", &v2.game_state.minutes_played_sec)?;

    let check_pids = |label: &str, map: &HashMap<String, HashMap<String, impl Sized>>| -> Result<()> {
        for (team_id, inner) in map {
            let allowed = if team_id == home { &home_pids } else { &away_pids };
            for pid in inner.keys() {
                if !allowed.contains(pid.as_str()) {
                    return Err(EngineError::Adapter(format!("game_state.{label}[{team_id}] references unknown player_id '{pid}'")));
                }
            }
        }
        Ok(())
    };
    check_pids("player_fouls", &v2.game_state.player_fouls)?;
    check_pids("fatigue", &v2.game_state.fatigue)?;
    check_pids("minutes_played_sec", &v2.game_state.minutes_played_sec)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(home: &str, away: &str) -> GameResultV2 {
        let mut teams = HashMap::new();
        teams.insert(home.to_string(), V2TeamResult::default());
        teams.insert(away.to_string(), V2TeamResult::default());
        let mut final_scores = HashMap::new();
        final_scores.insert(home.to_string(), 100);
        final_scores.insert(away.to_string(), 95);
        GameResultV2 {
            schema_version: SCHEMA_VERSION.to_string(),
            game: GameInfo {
                game_id: "g1".into(),
                date: "2026-01-01".into(),
                season_id: "2025-26".into(),
                phase: Phase::Regular,
                home_team_id: home.to_string(),
                away_team_id: away.to_string(),
                overtime_periods: 0,
                possessions_per_team: HashMap::new(),
            },
            final_scores,
            teams,
            game_state: V2GameState {
                team_fouls: [(home.to_string(), 0), (away.to_string(), 0)].into_iter().collect(),
                player_fouls: [(home.to_string(), HashMap::new()), (away.to_string(), HashMap::new())].into_iter().collect(),
                fatigue: [(home.to_string(), HashMap::new()), (away.to_string(), HashMap::new())].into_iter().collect(),
                minutes_played_sec: [(home.to_string(), HashMap::new()), (away.to_string(), HashMap::new())].into_iter().collect(),
            },
            meta: V2Meta { engine_name: "league_core".into(), engine_version: "test".into(), era: "default".into(), era_version: 1, replay_token: "abc".into() },
            debug: None,
            replay_events: None,
        }
    }

    #[test]
    fn a_well_formed_payload_validates() {
        assert!(validate(&minimal("HOU", "DAL")).is_ok());
    }

    #[test]
    fn mismatched_schema_version_is_rejected() {
        let mut v2 = minimal("HOU", "DAL");
        v2.schema_version = "1.0".to_string();
        assert!(validate(&v2).is_err());
    }

    #[test]
    fn unknown_player_id_in_fatigue_is_rejected() {
        let mut v2 = minimal("HOU", "DAL");
        v2.game_state.fatigue.get_mut("HOU").unwrap().insert("ghost".to_string(), 1.0);
        assert!(validate(&v2).is_err());
    }
}
