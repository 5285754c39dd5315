//! Season-accumulated league state and the ingest path that feeds it
//! (spec §4.7, §3 `LeagueState`).
//!
//! Grounded on the teacher's `league::table::LeagueTable` accumulator
//! idiom (`get_team_mut`/find-by-id, additive per-game updates) for
//! [`state`]'s `TeamSeasonStats`/`PlayerSeasonStats` bookkeeping, and on
//! `league::league::League`'s season-container shape for
//! [`state::LeagueState`] itself.

mod ingest;
mod master_schedule;
mod state;

pub use ingest::ingest_game_result;
pub use master_schedule::{MasterSchedule, MasterScheduleEntry};
pub use state::{GameSummary, LeagueState, PhaseSlice, PlayerSeasonStats, SeasonArchive, TeamSeasonStats};
