//! Per-game mutable state: clock/foul/fatigue bookkeeping shared by both
//! sides (`GameState`) and one side's box-score accumulators (`TeamGame`).
//!
//! Grounded on `original_source/matchengine_v3/models.py`'s `GameState`
//! and `TeamState` dataclasses. The Python original keeps both team
//! totals and the clock/fatigue maps on loosely-typed dict fields keyed
//! by a `"home"`/`"away"` string; here `Side` is a two-variant enum and
//! the per-side maps are plain `HashMap<Side, _>`, matching the
//! teacher's preference for small enums over string keys at engine seams
//! (see `club::team::tactics`'s scheme enums).

use std::collections::HashMap;

/// Which bench a team occupies for a given game. Distinct from
/// `team_id`: possession alternates between `Side::Home`/`Side::Away`
/// regardless of which `Team` currently holds the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// Classification of how a possession ended, used to bucket team-level
/// possession counters (spec §3, §4.5 step 9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PossessionEndClass {
    Fga,
    Tov,
    FtTrip,
    Other,
}

impl PossessionEndClass {
    pub fn as_str(self) -> &'static str {
        match self {
            PossessionEndClass::Fga => "FGA",
            PossessionEndClass::Tov => "TOV",
            PossessionEndClass::FtTrip => "FT_TRIP",
            PossessionEndClass::Other => "OTHER",
        }
    }
}

/// Why a possession terminated (spec §8 invariant 4's `end_reason` set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Score,
    Turnover,
    Drb,
    PeriodEnd,
    ShotClock,
}

/// How the next possession begins (spec §4.3.1's `pos_start`/`pos_start_next`
/// values: `start_q`, `after_score`, `after_tov_dead`, `after_foul`,
/// `after_drb`). Only `StartQ`/`AfterScore`/`AfterTovDead` are dead-ball
/// starts that roll for an inbound turnover (step 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PossessionStart {
    StartQ,
    AfterScore,
    AfterTovDead,
    AfterFoul,
    AfterDrb,
}

impl PossessionStart {
    pub fn is_dead_ball_inbound(self) -> bool {
        matches!(self, PossessionStart::StartQ | PossessionStart::AfterScore | PossessionStart::AfterTovDead)
    }
}

/// Clock/foul/fatigue state shared by both teams for the game in
/// progress. Owned exclusively by a single `simulate_game` call (spec
/// §9 "Per-game state ownership").
#[derive(Debug, Clone)]
pub struct GameState {
    pub quarter: u32,
    pub clock_sec: f64,
    pub shot_clock_sec: f64,
    pub possession: u64,
    pub team_fouls: HashMap<Side, u32>,
    pub player_fouls: HashMap<Side, HashMap<String, u32>>,
    pub fatigue: HashMap<Side, HashMap<String, f64>>,
    pub minutes_played_sec: HashMap<Side, HashMap<String, f64>>,
    pub on_court: HashMap<Side, Vec<String>>,
    pub targets_sec: HashMap<Side, HashMap<String, f64>>,
}

impl GameState {
    pub fn new(
        home_pids: &[String],
        away_pids: &[String],
        home_targets: HashMap<String, f64>,
        away_targets: HashMap<String, f64>,
        start_home: Vec<String>,
        start_away: Vec<String>,
    ) -> Self {
        let mut team_fouls = HashMap::new();
        team_fouls.insert(Side::Home, 0);
        team_fouls.insert(Side::Away, 0);

        let mut player_fouls = HashMap::new();
        player_fouls.insert(Side::Home, HashMap::new());
        player_fouls.insert(Side::Away, HashMap::new());

        let mut fatigue = HashMap::new();
        fatigue.insert(Side::Home, home_pids.iter().map(|p| (p.clone(), 1.0)).collect());
        fatigue.insert(Side::Away, away_pids.iter().map(|p| (p.clone(), 1.0)).collect());

        let mut minutes_played_sec = HashMap::new();
        minutes_played_sec.insert(Side::Home, home_pids.iter().map(|p| (p.clone(), 0.0)).collect());
        minutes_played_sec.insert(Side::Away, away_pids.iter().map(|p| (p.clone(), 0.0)).collect());

        let mut on_court = HashMap::new();
        on_court.insert(Side::Home, start_home);
        on_court.insert(Side::Away, start_away);

        let mut targets_sec = HashMap::new();
        targets_sec.insert(Side::Home, home_targets);
        targets_sec.insert(Side::Away, away_targets);

        GameState {
            quarter: 1,
            clock_sec: 0.0,
            shot_clock_sec: 0.0,
            possession: 0,
            team_fouls,
            player_fouls,
            fatigue,
            minutes_played_sec,
            on_court,
            targets_sec,
        }
    }

    pub fn fatigue_of(&self, side: Side, pid: &str) -> f64 {
        self.fatigue.get(&side).and_then(|m| m.get(pid)).copied().unwrap_or(1.0)
    }

    pub fn on_court_of(&self, side: Side) -> &[String] {
        self.on_court.get(&side).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn player_foul_count(&self, side: Side, pid: &str) -> u32 {
        self.player_fouls.get(&side).and_then(|m| m.get(pid)).copied().unwrap_or(0)
    }

    pub fn add_player_foul(&mut self, side: Side, pid: &str) -> u32 {
        let entry = self.player_fouls.entry(side).or_default().entry(pid.to_string()).or_insert(0);
        *entry += 1;
        *self.team_fouls.entry(side).or_insert(0) += 1;
        *entry
    }

    pub fn add_minutes(&mut self, side: Side, pid: &str, sec: f64) {
        *self.minutes_played_sec.entry(side).or_default().entry(pid.to_string()).or_insert(0.0) += sec;
    }

    pub fn set_fatigue(&mut self, side: Side, pid: &str, value: f64) {
        self.fatigue.entry(side).or_default().insert(pid.to_string(), value.clamp(0.0, 1.0));
    }
}

/// Per-player accumulated box score line (spec §3 "accumulated box-score
/// counters"). Carries only the counters the possession resolver
/// actually produces — matching `models.py: TeamState.player_stats`'s
/// dict shape, which has no `AST`/`STL`/`BLK` either beyond what the
/// resolver writes.
#[derive(Debug, Clone, Default)]
pub struct PlayerBoxRaw {
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
}

/// One team's per-game mutable accumulators (spec §3 `Team`'s "mutable
/// per-game accumulators"). Kept separate from [`crate::team::Team`]
/// (the immutable roster/tactics identity) so a fresh `TeamGame` can be
/// created per `simulate_game` call without touching roster data, the
/// same separation `models.py` draws between `Player`/`TeamState`
/// (identity) and the counters those dataclasses also carry — here
/// split out into its own type instead of decorating `Team`.
#[derive(Debug, Clone, Default)]
pub struct TeamGame {
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
    pub possession_end_counts: HashMap<&'static str, u32>,
    pub shot_zones: HashMap<String, u32>,
    pub off_action_counts: HashMap<String, u32>,
    pub def_action_counts: HashMap<String, u32>,
    pub outcome_counts: HashMap<String, u32>,
    pub player_stats: HashMap<String, PlayerBoxRaw>,
    /// Role-fit debug counters (spec §4.4 "logs counts of bad outcomes by
    /// grade for calibration"), surfaced verbatim in `meta.internal_debug`.
    pub role_fit_grade_counts: HashMap<&'static str, u32>,
    pub role_fit_bad_totals: u32,
}

impl TeamGame {
    pub fn new(pids: &[String]) -> Self {
        let mut tg = TeamGame::default();
        for pid in pids {
            tg.player_stats.insert(pid.clone(), PlayerBoxRaw::default());
        }
        tg
    }

    pub fn record_end(&mut self, class: PossessionEndClass) {
        *self.possession_end_counts.entry(class.as_str()).or_insert(0) += 1;
        self.possessions += 1;
    }

    pub fn record_action(&mut self, offense: bool, action: &str) {
        let map = if offense { &mut self.off_action_counts } else { &mut self.def_action_counts };
        *map.entry(action.to_string()).or_insert(0) += 1;
    }

    pub fn record_outcome(&mut self, outcome: &str) {
        *self.outcome_counts.entry(outcome.to_string()).or_insert(0) += 1;
    }

    pub fn record_role_fit_grade(&mut self, grade: &'static str, is_bad: bool) {
        *self.role_fit_grade_counts.entry(grade).or_insert(0) += 1;
        if is_bad {
            self.role_fit_bad_totals += 1;
        }
    }

    pub fn player(&mut self, pid: &str) -> &mut PlayerBoxRaw {
        self.player_stats.entry(pid.to_string()).or_insert_with(PlayerBoxRaw::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_state_initializes_fatigue_to_full_energy() {
        let home = vec!["h1".to_string(), "h2".to_string()];
        let away = vec!["a1".to_string()];
        let gs = GameState::new(&home, &away, HashMap::new(), HashMap::new(), home.clone(), away.clone());
        assert_eq!(gs.fatigue_of(Side::Home, "h1"), 1.0);
        assert_eq!(gs.fatigue_of(Side::Away, "a1"), 1.0);
    }

    #[test]
    fn add_player_foul_increments_both_player_and_team_counters() {
        let home = vec!["h1".to_string()];
        let away = vec!["a1".to_string()];
        let mut gs = GameState::new(&home, &away, HashMap::new(), HashMap::new(), home.clone(), away.clone());
        assert_eq!(gs.add_player_foul(Side::Home, "h1"), 1);
        assert_eq!(gs.add_player_foul(Side::Home, "h1"), 2);
        assert_eq!(gs.team_fouls[&Side::Home], 2);
    }

    #[test]
    fn team_game_tracks_possession_end_classes() {
        let mut tg = TeamGame::new(&["p1".to_string()]);
        tg.record_end(PossessionEndClass::Fga);
        tg.record_end(PossessionEndClass::Fga);
        tg.record_end(PossessionEndClass::Tov);
        assert_eq!(tg.possession_end_counts["FGA"], 2);
        assert_eq!(tg.possession_end_counts["TOV"], 1);
    }
}
