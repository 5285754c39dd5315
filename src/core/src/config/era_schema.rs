//! Strongly-typed sub-tables of [`super::GameConfig`], split out of
//! `mod.rs` purely for readability — every one of these mirrors a
//! sub-mapping `game_config.py: build_game_config` extracts from the raw
//! era dict.

use serde::Deserialize;
use std::collections::HashMap;

/// Scalar tuning knobs (spec §3 `GameConfig` + §9 Open-Question knobs).
/// Grouped into one struct because `game_config.py` keeps them in a flat
/// `knobs` sub-mapping rather than one field per dataclass attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct Knobs {
    pub regulation_quarters: u32,
    pub quarter_length_sec: f64,
    pub overtime_length_sec: f64,
    pub shot_clock_sec: f64,
    pub shot_clock_reset_orb_sec: f64,
    pub shot_clock_reset_foul_sec: f64,
    pub max_possession_steps: u32,
    pub stall_bailout_cost_sec: f64,
    pub foul_out_limit: u32,
    pub bonus_team_fouls: u32,
    pub inbound_to_base: f64,
    pub inbound_to_min: f64,
    pub inbound_to_max: f64,
    pub logit_slope: f64,
    pub p_make_min: f64,
    pub p_make_max: f64,
    pub fatigue_logit_max: f64,
    /// Open Question 2 (spec §9): how much defensive score dampens shot
    /// quality relative to offensive score. Defaults to `0.5`.
    pub mix_def_score_for_shot: f64,
    /// Open Question 1 (spec §9): whether a non-shooting foul drawn
    /// outside the bonus still awards free throws. Defaults to `false`.
    pub bonus_reach_trap_awards_fts: bool,
    pub jumpball_sigmoid_scale: f64,
    pub fastbreak_shotclock_threshold_sec: f64,
    pub action_clamp_lo: f64,
    pub action_clamp_hi: f64,
    pub outcome_clamp_lo: f64,
    pub outcome_clamp_hi: f64,
    pub pass_to_turnover_midpoint: f64,
    pub pass_to_turnover_slope: f64,
    pub pass_reset_midpoint: f64,
    pub pass_reset_slope: f64,
    pub contact_penalty_hard: f64,
    pub contact_penalty_normal: f64,
    pub contact_penalty_soft: f64,
    pub between_period_rest_mult: f64,
    pub pre_ot_rest_mult: f64,
    pub foul_draw_post_to_shot_post_pct: f64,
    pub foul_draw_rim_to_contact_pct: f64,
    pub foul_draw_jumper_to_3_pct: f64,
}

/// Offense- or defense-side stat-weight profile for a shot/pass outcome
/// (spec §4.3.3/§4.3.4's `profile_offense[outcome]`/`profile_defense[outcome]`).
#[derive(Debug, Clone, Deserialize)]
pub struct OutcomeProfile {
    #[serde(default)]
    pub offense: HashMap<String, f64>,
    #[serde(default)]
    pub defense: HashMap<String, f64>,
}

impl OutcomeProfile {
    pub fn score(&self, side: ProfileSide, abilities: &HashMap<String, f64>) -> f64 {
        let weights = match side {
            ProfileSide::Offense => &self.offense,
            ProfileSide::Defense => &self.defense,
        };
        weights
            .iter()
            .map(|(k, w)| w * abilities.get(k).copied().unwrap_or(50.0))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSide {
    Offense,
    Defense,
}

/// Defensive role-fit assignment tables (spec §4.3.3/§4.4's `q_delta`
/// apparatus). Synthesized in place of the missing `quality.py`
/// (`ROLE_STAT_PROFILES`) — see module-level doc comment in `mod.rs`.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleFitConfig {
    pub roles: Vec<String>,
    /// defense_scheme -> role -> (derived-ability -> weight)
    pub profiles: HashMap<String, HashMap<String, HashMap<String, f64>>>,
    pub q_delta_scale: f64,
    pub grade_thresholds: GradeThresholds,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradeThresholds {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "C")]
    pub c: f64,
}

impl GradeThresholds {
    /// Letter grade for a normalized `[0,1]` fit score, worst grade `D`
    /// for anything below `c`.
    pub fn grade(&self, fit: f64) -> &'static str {
        if fit >= self.a {
            "A"
        } else if fit >= self.b {
            "B"
        } else if fit >= self.c {
            "C"
        } else {
            "D"
        }
    }
}

/// Shot-diet tuning tables, carried over verbatim from
/// `original_source/matchengine_v3/shot_diet_data.py` (the one module in
/// this cluster that *was* present in the retrieved pack).
#[derive(Debug, Clone, Deserialize)]
pub struct ShotDietConfig {
    pub baseline: f64,
    pub tau_usage: f64,
    pub usage_min_primary: f64,
    pub usage_max_primary: f64,
    pub clamp_action_mult_lo: f64,
    pub clamp_action_mult_hi: f64,
    pub clamp_outcome_mult_lo: f64,
    pub clamp_outcome_mult_hi: f64,
    pub prob_floor: f64,
    pub alpha_action_fallback: f64,
    pub alpha_outcome_fallback: f64,
    /// tactic -> (alpha_action, alpha_outcome)
    pub tactic_alpha: HashMap<String, (f64, f64)>,
    /// scheme -> priority-ordered list of canonical offense-role names
    pub screener_role_priority: HashMap<String, Vec<String>>,
    pub scheme_aliases: HashMap<String, String>,
    /// base_action -> outcome -> (feature -> weight)
    pub weights_global_outcome: HashMap<String, HashMap<String, HashMap<String, f64>>>,
    /// tactic -> base_action -> (feature -> weight)
    pub weights_tactic_action: HashMap<String, HashMap<String, HashMap<String, f64>>>,
    /// tactic -> base_action -> outcome -> (feature -> delta weight)
    pub weights_tactic_outcome_delta: HashMap<String, HashMap<String, HashMap<String, HashMap<String, f64>>>>,
}

impl ShotDietConfig {
    pub fn normalize_scheme_name(&self, name: &str) -> String {
        if self.screener_role_priority.contains_key(name) || self.tactic_alpha.contains_key(name) {
            return name.to_string();
        }
        let folded: String = name.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect();
        for (alias, canonical) in &self.scheme_aliases {
            if alias.to_lowercase() == folded {
                return canonical.clone();
            }
        }
        name.to_string()
    }

    pub fn tactic_alphas(&self, tactic: &str) -> (f64, f64) {
        self.tactic_alpha
            .get(tactic)
            .copied()
            .unwrap_or((self.alpha_action_fallback, self.alpha_outcome_fallback))
    }
}
