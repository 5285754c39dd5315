//! `RawGameResult` (spec §3): the engine's internal, team-id-keyed output
//! shape. `orchestrator::simulate_game` builds one of these directly from
//! [`crate::state::TeamGame`]/[`crate::state::GameState`]; [`super::adapter`]
//! turns it into the external [`super::v2::GameResultV2`] contract.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct RawTotals {
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
    pub possessions: u32,
    pub pitp: u32,
    pub fastbreak_pts: u32,
    pub second_chance_pts: u32,
    pub points_off_tov: u32,
}

#[derive(Debug, Clone, Default)]
pub struct RawBreakdowns {
    pub possession_end_counts: HashMap<String, u32>,
    pub shot_zones: HashMap<String, u32>,
    pub off_action_counts: HashMap<String, u32>,
    pub def_action_counts: HashMap<String, u32>,
    pub outcome_counts: HashMap<String, u32>,
    pub role_fit_grade_counts: HashMap<String, u32>,
    pub role_fit_bad_totals: u32,
}

#[derive(Debug, Clone, Default)]
pub struct RawPlayerBox {
    pub player_id: String,
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
}

#[derive(Debug, Clone, Default)]
pub struct RawTeamResult {
    pub totals: RawTotals,
    pub breakdowns: RawBreakdowns,
    pub player_box: HashMap<String, RawPlayerBox>,
    pub avg_fatigue: f64,
}

/// `game_state` sub-maps, re-keyed from the engine's internal `Side` to
/// the caller's `team_id` at the orchestrator/adapter boundary (spec
/// §4.6: "Support either `{home, away}` side-keyed ... mapped to
/// `{home_team_id, away_team_id}`" — here the raw result is always
/// produced team-id-keyed already, so the adapter's side-keyed branch
/// only matters for externally supplied raw results).
#[derive(Debug, Clone, Default)]
pub struct RawGameStateResult {
    pub team_fouls: HashMap<String, u32>,
    pub player_fouls: HashMap<String, HashMap<String, u32>>,
    pub fatigue: HashMap<String, HashMap<String, f64>>,
    pub minutes_played_sec: HashMap<String, HashMap<String, f64>>,
}

#[derive(Debug, Clone, Default)]
pub struct RawMeta {
    pub engine_version: String,
    pub era: String,
    pub era_version: u32,
    pub overtime_periods: u32,
    pub replay_token: String,
    pub validation_report: Vec<String>,
    /// `ResolutionWarning`s collected from both sides' `PossessionContext`
    /// plus role-fit bad-outcome totals, surfaced verbatim rather than
    /// swallowed (spec §7 `ResolutionWarning` row: "Surfaced in
    /// `meta.internal_debug`").
    pub internal_debug: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct RawGameResult {
    pub meta: RawMeta,
    pub possessions_per_team: HashMap<String, u32>,
    pub teams: HashMap<String, RawTeamResult>,
    pub game_state: RawGameStateResult,
    pub replay_events: Option<Vec<serde_json::Value>>,
}
