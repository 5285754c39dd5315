//! Tactics data model (spec §3): one offense scheme + one defense scheme
//! per team, plus the sharpness/strength scalars and override maps that
//! bias action/outcome sampling in `possession` (spec §4.3.2).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OffenseScheme {
    SpreadHeavyPnR,
    FiveOut,
    DriveKick,
    MotionSplitCut,
    DhoChicago,
    PostInsideOut,
    HornsElbow,
    TransitionEarly,
}

impl OffenseScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            OffenseScheme::SpreadHeavyPnR => "Spread_HeavyPnR",
            OffenseScheme::FiveOut => "FiveOut",
            OffenseScheme::DriveKick => "Drive_Kick",
            OffenseScheme::MotionSplitCut => "Motion_SplitCut",
            OffenseScheme::DhoChicago => "DHO_Chicago",
            OffenseScheme::PostInsideOut => "Post_InsideOut",
            OffenseScheme::HornsElbow => "Horns_Elbow",
            OffenseScheme::TransitionEarly => "Transition_Early",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefenseScheme {
    Drop,
    SwitchEverything,
    Zone,
    BlitzHedge,
    ManPress,
}

impl DefenseScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefenseScheme::Drop => "Drop",
            DefenseScheme::SwitchEverything => "Switch_Everything",
            DefenseScheme::Zone => "Zone",
            DefenseScheme::BlitzHedge => "Blitz_Hedge",
            DefenseScheme::ManPress => "Man_Press",
        }
    }
}

/// Per-team tactical configuration (spec §3/§6).
///
/// `scheme_weight_sharpness` scales how strongly `offense_scheme`/
/// `defense_scheme` bend the action-selection weights away from uniform
/// (spec §4.3.2's `alpha_action`); `scheme_outcome_strength` does the
/// same for the outcome-multiplier stage (`alpha_outcome`). Both default
/// to `1.0` — the config-table scheme weights apply at face value.
#[derive(Debug, Clone)]
pub struct Tactics {
    pub offense_scheme: OffenseScheme,
    pub defense_scheme: DefenseScheme,
    pub scheme_weight_sharpness: f64,
    pub scheme_outcome_strength: f64,
    pub action_weight_mult: HashMap<String, f64>,
    pub outcome_global_mult: f64,
    pub outcome_by_action_mult: HashMap<String, HashMap<String, f64>>,
    /// Free-form per-team bias knobs the config/orchestrator may read
    /// (e.g. `transition_emphasis`, `heavy_pnr`) without widening this
    /// struct for every new one-off tuning flag.
    pub context: HashMap<String, serde_json::Value>,
}

impl Tactics {
    pub fn new(offense_scheme: OffenseScheme, defense_scheme: DefenseScheme) -> Self {
        Tactics {
            offense_scheme,
            defense_scheme,
            scheme_weight_sharpness: 1.0,
            scheme_outcome_strength: 1.0,
            action_weight_mult: HashMap::new(),
            outcome_global_mult: 1.0,
            outcome_by_action_mult: HashMap::new(),
            context: HashMap::new(),
        }
    }

    pub fn context_f64(&self, key: &str, default: f64) -> f64 {
        self.context.get(key).and_then(|v| v.as_f64()).unwrap_or(default)
    }

    pub fn context_bool(&self, key: &str, default: bool) -> bool {
        self.context.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
    }

    pub fn action_mult(&self, action: &str) -> f64 {
        *self.action_weight_mult.get(action).unwrap_or(&1.0)
    }

    pub fn outcome_mult(&self, action: &str, outcome: &str) -> f64 {
        let by_action = self
            .outcome_by_action_mult
            .get(action)
            .and_then(|m| m.get(outcome))
            .copied()
            .unwrap_or(1.0);
        self.outcome_global_mult * by_action
    }
}
