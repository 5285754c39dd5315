//! The master schedule: one entry per scheduled game, indexed for lookup
//! by id/team/date (spec §3 `master_schedule{games[], by_id, by_team,
//! by_date}`). Populated ahead of time by an external scheduling
//! collaborator (out of scope here); `ingest_game_result` only updates
//! an existing entry to `final` (spec §4.7 step 6).

use std::collections::HashMap;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MasterScheduleEntry {
    pub game_id: String,
    pub date: String,
    pub home_team_id: String,
    pub away_team_id: String,
    pub status: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct MasterSchedule {
    pub games: Vec<MasterScheduleEntry>,
    pub by_id: HashMap<String, usize>,
    pub by_team: HashMap<String, Vec<String>>,
    pub by_date: HashMap<String, Vec<String>>,
}

impl MasterSchedule {
    /// Adds a not-yet-played slot (used by schedule generation / tests;
    /// `ingest_game_result` never calls this, only `mark_final`).
    pub fn add_scheduled(&mut self, game_id: impl Into<String>, date: impl Into<String>, home_team_id: impl Into<String>, away_team_id: impl Into<String>) {
        let game_id = game_id.into();
        let date = date.into();
        let home_team_id = home_team_id.into();
        let away_team_id = away_team_id.into();

        self.by_id.insert(game_id.clone(), self.games.len());
        self.by_team.entry(home_team_id.clone()).or_default().push(game_id.clone());
        self.by_team.entry(away_team_id.clone()).or_default().push(game_id.clone());
        self.by_date.entry(date.clone()).or_default().push(game_id.clone());

        self.games.push(MasterScheduleEntry { game_id, date, home_team_id, away_team_id, status: "scheduled".to_string(), home_score: None, away_score: None });
    }

    /// Marks the matching entry final with the given scores. Returns
    /// `false` (rather than erring) if no scheduled entry exists for this
    /// game_id — some callers simulate unscheduled exhibition games.
    pub fn mark_final(&mut self, game_id: &str, home_score: u32, away_score: u32) -> bool {
        let Some(&idx) = self.by_id.get(game_id) else {
            return false;
        };
        let entry = &mut self.games[idx];
        entry.status = "final".to_string();
        entry.home_score = Some(home_score);
        entry.away_score = Some(away_score);
        true
    }
}
