//! Sample-data helpers for the `nba-sim` smoke-test binary.
//!
//! Stands in for the roster-import/spreadsheet layer the spec places
//! out of scope (§1 Non-goals: "roster importing from spreadsheets");
//! this crate only ever needs two plausible teams to drive
//! `league_core::orchestrator::simulate_game` end to end, so it builds
//! them in code rather than reading any external format.

use league_core::rating::RawRatings;
use league_core::team::{DefenseScheme, OffenseScheme, Player, RotationPlan, Tactics, Team};

fn raw(overrides: &[(&str, f64)]) -> RawRatings {
    let mut raw = RawRatings::new();
    for (k, v) in overrides {
        raw.insert((*k).to_string(), *v);
    }
    raw
}

/// An eight-man roster with one clear star (first player) and three
/// plausible archetypes repeated to fill out a rotation, so every
/// canonical offensive role (spec §4.2) has a sensible candidate.
pub fn sample_roster(team_id: &str) -> Vec<Player> {
    let archetypes: [&[(&str, f64)]; 4] = [
        &[
            ("Pass IQ", 92.0), ("Pass Vision", 90.0), ("Ball Handle", 88.0),
            ("Speed with Ball", 85.0), ("Three-Point Shot", 78.0), ("Stamina", 82.0),
        ],
        &[
            ("Three-Point Shot", 90.0), ("Offensive Consistency", 85.0), ("Shot IQ", 80.0),
            ("Speed", 75.0), ("Perimeter Defense", 72.0),
        ],
        &[
            ("Standing Dunk", 88.0), ("Driving Dunk", 86.0), ("Interior Defense", 82.0),
            ("Block", 80.0), ("Strength", 85.0), ("Vertical", 88.0),
        ],
        &[
            ("Post Hook", 84.0), ("Post Control", 82.0), ("Strength", 90.0),
            ("Defensive Rebound", 86.0), ("Interior Defense", 85.0), ("Stamina", 70.0),
        ],
    ];
    let positions = ["G", "G", "F", "F", "C", "G", "F", "C"];
    (0..8)
        .map(|i| {
            let archetype = archetypes[i % archetypes.len()];
            let name = format!("{team_id} Player {}", i + 1);
            Player::new(format!("{}_{:02}", team_id.to_lowercase(), i + 1), name, positions[i], &raw(archetype))
        })
        .collect()
}

/// Builds a ready-to-simulate [`Team`] with a sample roster, the given
/// tactics, and even rotation-minute targets (starters get more).
pub fn sample_team(team_id: &str, offense: OffenseScheme, defense: DefenseScheme) -> Team {
    let roster = sample_roster(team_id);
    let mut team = Team::new(team_id, roster, Tactics::new(offense, defense));
    let mut rotation = RotationPlan::default();
    for (i, p) in team.roster.iter().enumerate() {
        let target = if i < 5 { 2200.0 } else { 900.0 };
        rotation.target_sec_by_pid.insert(p.player_id.clone(), target);
    }
    team.rotation = rotation;
    team
}
