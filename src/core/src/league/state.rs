//! `LeagueState` and the per-phase accumulator slice it's built from
//! (spec §3 `LeagueState`). Only the slices `ingest_game_result` touches
//! are modeled — draft picks, contracts, and trade ledgers belong to
//! other collaborators (spec §6 "Persistence layout").

use crate::result::v2::GameResultV2;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct PlayerSeasonStats {
    pub name: String,
    pub team_id: String,
    pub games: u32,
    pub totals: crate::result::v2::CanonicalTotals,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TeamSeasonStats {
    pub games: u32,
    pub totals: crate::result::v2::CanonicalTotals,
    pub breakdowns: HashMap<String, HashMap<String, u32>>,
}

/// Compact finalized game record appended to `games[]` (spec §4.7 step 5).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GameSummary {
    pub game_id: String,
    pub date: String,
    pub home_team_id: String,
    pub away_team_id: String,
    pub home_score: u32,
    pub away_score: u32,
    pub status: String,
    pub is_overtime: bool,
    pub phase: String,
    pub season_id: String,
}

/// One phase's worth of accumulated state: the regular-season slice
/// lives flattened on [`LeagueState`] itself; `preseason`/`play_in`/
/// `playoffs` each get their own `PhaseSlice` under `phase_containers`
/// (spec §3: "each with the same shape as the regular slice").
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct PhaseSlice {
    pub player_stats: HashMap<String, PlayerSeasonStats>,
    pub team_stats: HashMap<String, TeamSeasonStats>,
    pub games: Vec<GameSummary>,
    pub game_results: HashMap<String, GameResultV2>,
}

/// A prior season's frozen regular + phase slices (spec §6 "round-trip
/// `season_history`").
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SeasonArchive {
    pub regular: PhaseSlice,
    pub phase_containers: HashMap<String, PhaseSlice>,
    /// The `cache_version` turn counter at archive time (spec §8 S5:
    /// "`season_history[...]` ... with `archived_at_turn` set"). There is
    /// no wall-clock in the deterministic core, so this stands in for a
    /// timestamp with a monotonically increasing ingest-turn number.
    pub archived_at_turn: u64,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct LeagueState {
    pub active_season_id: String,
    pub player_stats: HashMap<String, PlayerSeasonStats>,
    pub team_stats: HashMap<String, TeamSeasonStats>,
    pub games: Vec<GameSummary>,
    pub game_results: HashMap<String, GameResultV2>,
    pub master_schedule: super::master_schedule::MasterSchedule,
    pub phase_containers: HashMap<String, PhaseSlice>,
    pub season_history: HashMap<String, SeasonArchive>,
    /// Bumped every time `ingest_game_result` mutates team/player/schedule
    /// state (spec §4.7 step 7 "invalidate cached derived views").
    /// Readers of standings/leaders compare this against the version their
    /// cached view was built from and recompute on mismatch; the actual
    /// cache contents are an outer-layer concern, not modeled here.
    #[serde(default)]
    pub cache_version: u64,
}

impl LeagueState {
    pub fn new(active_season_id: impl Into<String>) -> Self {
        LeagueState { active_season_id: active_season_id.into(), ..Default::default() }
    }

    pub fn regular_slice(&self) -> PhaseSlice {
        PhaseSlice {
            player_stats: self.player_stats.clone(),
            team_stats: self.team_stats.clone(),
            games: self.games.clone(),
            game_results: self.game_results.clone(),
        }
    }

    pub(super) fn take_regular_slice(&mut self) -> PhaseSlice {
        PhaseSlice {
            player_stats: std::mem::take(&mut self.player_stats),
            team_stats: std::mem::take(&mut self.team_stats),
            games: std::mem::take(&mut self.games),
            game_results: std::mem::take(&mut self.game_results),
        }
    }
}
