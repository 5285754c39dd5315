//! Player/Team/Tactics data model (spec §3) and the role-assignment /
//! best-effort starting-lineup logic of spec §4.2.
//!
//! Grounded on the teacher's `club::player`/`club::team` struct-and-builder
//! idiom, with field semantics taken from
//! `original_source/matchengine_v3/models.py` (`Player`, `TeamState`).

mod roles;
mod tactics;

pub use roles::OffenseRole;
pub use tactics::{DefenseScheme, OffenseScheme, Tactics};

use crate::rating::{self, DerivedAbilities, RawRatings};
use std::collections::HashMap;

/// Ability read with the fatigue curve applied (spec §3 SUPPLEMENT).
///
/// `floor = 0.82`, `gamma = 1.35`: a fully fresh player (`energy = 1.0`)
/// reads at 100% of a derived ability; a fully gassed player
/// (`energy = 0.0`) reads at 82%, with the falloff accelerating as energy
/// drops rather than scaling linearly.
const FATIGUE_FLOOR: f64 = 0.82;
const FATIGUE_GAMMA: f64 = 1.35;

/// Immutable player identity plus the one piece of truly mutable
/// per-game state the core cares about: in-game fatigue (`energy`).
/// Box-score counters live on [`crate::state::TeamGame`] instead, keyed
/// by player_id, matching `TeamState.player_stats` in the Python
/// original rather than decorating each `Player`.
#[derive(Debug, Clone)]
pub struct Player {
    pub player_id: String,
    pub name: String,
    pub position: String,
    pub derived: DerivedAbilities,
    /// `1.0` fresh .. `0.0` exhausted.
    pub energy: f64,
}

impl Player {
    pub fn new(player_id: impl Into<String>, name: impl Into<String>, position: impl Into<String>, raw: &RawRatings) -> Self {
        Player {
            player_id: player_id.into(),
            name: name.into(),
            position: position.into(),
            derived: rating::derive(raw),
            energy: 1.0,
        }
    }

    pub fn from_derived(player_id: impl Into<String>, name: impl Into<String>, position: impl Into<String>, derived: DerivedAbilities) -> Self {
        Player {
            player_id: player_id.into(),
            name: name.into(),
            position: position.into(),
            derived,
            energy: 1.0,
        }
    }

    /// Read a derived ability, applying the fatigue curve (spec §3 SUPPLEMENT).
    pub fn ability(&self, key: &str) -> f64 {
        self.ability_with_fatigue(key, true)
    }

    /// Read a derived ability, fatigue-insensitive (e.g. jumpball strength).
    pub fn ability_raw(&self, key: &str) -> f64 {
        self.ability_with_fatigue(key, false)
    }

    pub fn ability_with_fatigue(&self, key: &str, fatigue_sensitive: bool) -> f64 {
        let v = *self.derived.get(key).unwrap_or(&rating::RAW_RATING_DEFAULT);
        if !fatigue_sensitive {
            return v;
        }
        let e = self.energy.clamp(0.0, 1.0);
        let severity = (1.0 - e).powf(FATIGUE_GAMMA);
        let f = 1.0 - severity * (1.0 - FATIGUE_FLOOR);
        v * f
    }
}

/// Per-game rotation configuration supplied by the caller (spec §6 input).
#[derive(Debug, Clone, Default)]
pub struct RotationPlan {
    pub target_sec_by_pid: HashMap<String, f64>,
    pub lock_pids: Vec<String>,
}

/// A franchise's roster plus this game's role assignment and tactics.
/// Immutable identity (`team_id`, `roster`) constructed once from external
/// roster data; `roles`/`tactics`/`rotation` are this game's configuration.
#[derive(Debug, Clone)]
pub struct Team {
    pub team_id: String,
    pub roster: Vec<Player>,
    pub roles: HashMap<OffenseRole, String>,
    pub tactics: Tactics,
    pub rotation: RotationPlan,
}

impl Team {
    pub fn new(team_id: impl Into<String>, roster: Vec<Player>, tactics: Tactics) -> Self {
        let mut team = Team {
            team_id: team_id.into(),
            roster,
            roles: HashMap::new(),
            tactics,
            rotation: RotationPlan::default(),
        };
        team.assign_roles_if_unset();
        team
    }

    pub fn find_player(&self, pid: &str) -> Option<&Player> {
        self.roster.iter().find(|p| p.player_id == pid)
    }

    pub fn find_player_mut(&mut self, pid: &str) -> Option<&mut Player> {
        self.roster.iter_mut().find(|p| p.player_id == pid)
    }

    pub fn role_player(&self, role: OffenseRole) -> Option<&Player> {
        self.roles.get(&role).and_then(|pid| self.find_player(pid))
    }

    /// Manual overrides win; unassigned roles are derived by ranking the
    /// five highest-composite players on role-specific derived-ability
    /// composites (spec §4.2).
    fn assign_roles_if_unset(&mut self) {
        for role in OffenseRole::ALL {
            if self.roles.contains_key(role) {
                continue;
            }
            if let Some(best) = self.best_fit_for_role(*role) {
                self.roles.insert(*role, best);
            }
        }
    }

    fn best_fit_for_role(&self, role: OffenseRole) -> Option<String> {
        self.roster
            .iter()
            .max_by(|a, b| {
                role.composite(a)
                    .partial_cmp(&role.composite(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|p| p.player_id.clone())
    }

    /// Spec §4.2: best-effort starting-lineup constraint. If at least one
    /// roster player is assigned `Initiator_Primary`, the returned five
    /// must contain exactly one such player; swap bench/starter to
    /// satisfy the constraint while preferring to keep higher
    /// rotation-minute targets on court.
    pub fn enforce_initiator_primary_start(&self, start: &[String]) -> Vec<String> {
        let primary_pid = match self.roles.get(&OffenseRole::InitiatorPrimary) {
            Some(pid) => pid.clone(),
            None => return start.to_vec(),
        };
        if !self.roster.iter().any(|p| p.player_id == primary_pid) {
            return start.to_vec();
        }
        let tgt = |pid: &str| -> f64 { *self.rotation.target_sec_by_pid.get(pid).unwrap_or(&0.0) };
        let mut start: Vec<String> = start.to_vec();
        let has_primary = start.contains(&primary_pid);
        if has_primary {
            return start;
        }
        if let Some(out_idx) = start
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| tgt(a).partial_cmp(&tgt(b)).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
        {
            start[out_idx] = primary_pid;
        }
        start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::tactics::{DefenseScheme, OffenseScheme};

    fn make_roster() -> Vec<Player> {
        (0..8)
            .map(|i| {
                let mut raw = RawRatings::new();
                raw.insert("Pass IQ".into(), if i == 0 { 95.0 } else { 50.0 });
                raw.insert("Pass Vision".into(), if i == 0 { 90.0 } else { 50.0 });
                Player::new(format!("p{i}"), format!("Player {i}"), "G", &raw)
            })
            .collect()
    }

    #[test]
    fn roles_assigned_for_every_canonical_role() {
        let team = Team::new("LAL", make_roster(), Tactics::new(OffenseScheme::FiveOut, DefenseScheme::Drop));
        for role in OffenseRole::ALL {
            assert!(team.roles.contains_key(role), "missing role {role:?}");
        }
    }

    #[test]
    fn initiator_primary_constraint_swaps_in_the_role_player() {
        let mut team = Team::new("BOS", make_roster(), Tactics::new(OffenseScheme::FiveOut, DefenseScheme::Drop));
        team.roles.insert(OffenseRole::InitiatorPrimary, "p0".to_string());
        let start: Vec<String> = team.roster[1..6].iter().map(|p| p.player_id.clone()).collect();
        assert!(!start.contains(&"p0".to_string()));
        let fixed = team.enforce_initiator_primary_start(&start);
        assert!(fixed.contains(&"p0".to_string()));
        assert_eq!(fixed.len(), 5);
    }
}
