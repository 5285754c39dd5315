//! Immutable per-era tuning tables (spec §3 `GameConfig`, §4.3/§4.4).
//!
//! Grounded on `original_source/matchengine_v3/game_config.py`'s
//! `GameConfig` dataclass and `build_game_config` loader for the top-level
//! shape (`knobs`, `prob_model`-ish tables, scheme weight tables), and on
//! `shot_diet.py`/`shot_diet_data.py` for the `shot_diet` sub-table, which
//! is carried through verbatim (those two Python modules, unlike
//! `profiles_data.py` and `quality.py`, were present in the retrieved
//! source pack). Loaded once per era from an embedded JSON file via
//! `serde_json` + `include_str!`, the way the teacher's config layer reads
//! static competition parameters once at startup rather than per-call.
//!
//! `shot_base`, `pass_base_success`, `corner3_prob_by_action_base`,
//! `action_outcome_priors`, `off_scheme_action_weights`,
//! `def_scheme_action_weights`, `offense_scheme_mult`,
//! `defense_scheme_mult`, `outcome_profiles`, `pass_profiles`, and
//! `role_fit.profiles` have no surviving source: they come from
//! `profiles_data.py` and `quality.py`, both referenced by name in the
//! retrieved Python (`profiles.py`'s docstring, `def_role_players.py`'s
//! `from . import quality`) but absent from the pack. Those tables below
//! are synthesized to the shape the referencing modules describe, not
//! translated — see DESIGN.md for the honest accounting.

mod era_schema;

use crate::error::{EngineError, Result};
pub use era_schema::*;
use std::collections::HashMap;
use std::sync::Arc;

const DEFAULT_ERA_JSON: &str = include_str!("era_default.json");

/// Loads the named era's [`GameConfig`], wrapped for cheap sharing across
/// every concurrent `simulate_game` call (spec §5: "GameConfig is
/// immutable and shared by reference across all concurrent games").
///
/// Only `"default"` is embedded today; unknown eras fall back to it with
/// a log warning rather than failing the game outright, matching
/// `game_config.py`'s `build_game_config(era_cfg)` which tolerates a
/// partial era table by defaulting every missing sub-mapping to empty.
pub fn load_era(era: &str) -> Result<Arc<GameConfig>> {
    if era != "default" {
        log::warn!("unknown era '{era}', falling back to 'default'");
    }
    let raw: RawEraConfig = serde_json::from_str(DEFAULT_ERA_JSON)
        .map_err(|e| EngineError::Validation(format!("embedded era config malformed: {e}")))?;
    Ok(Arc::new(GameConfig::from_raw(raw)))
}

/// Deserialization target matching the embedded JSON exactly (snake_case,
/// flat sub-tables). [`GameConfig`] wraps this with convenience accessors
/// and the derived `action_aliases` reverse lookup built once at load time.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawEraConfig {
    pub era: String,
    pub era_version: u32,
    pub knobs: Knobs,
    pub shot_base: HashMap<String, f64>,
    pub corner3_prob_by_action_base: HashMap<String, f64>,
    pub pass_base_success: HashMap<String, f64>,
    pub action_outcome_priors: HashMap<String, HashMap<String, f64>>,
    #[serde(default)]
    pub action_aliases: HashMap<String, String>,
    pub off_scheme_action_weights: HashMap<String, HashMap<String, f64>>,
    pub def_scheme_action_weights: HashMap<String, HashMap<String, f64>>,
    #[serde(default)]
    pub offense_scheme_mult: HashMap<String, HashMap<String, HashMap<String, f64>>>,
    #[serde(default)]
    pub defense_scheme_mult: HashMap<String, HashMap<String, HashMap<String, f64>>>,
    pub outcome_profiles: HashMap<String, OutcomeProfile>,
    pub pass_profiles: HashMap<String, OutcomeProfile>,
    pub role_fit: RoleFitConfig,
    pub shot_diet: ShotDietConfig,
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub era: String,
    pub era_version: u32,
    pub knobs: Knobs,
    pub shot_base: HashMap<String, f64>,
    pub corner3_prob_by_action_base: HashMap<String, f64>,
    pub pass_base_success: HashMap<String, f64>,
    pub action_outcome_priors: HashMap<String, HashMap<String, f64>>,
    pub action_aliases: HashMap<String, String>,
    pub off_scheme_action_weights: HashMap<String, HashMap<String, f64>>,
    pub def_scheme_action_weights: HashMap<String, HashMap<String, f64>>,
    pub offense_scheme_mult: HashMap<String, HashMap<String, HashMap<String, f64>>>,
    pub defense_scheme_mult: HashMap<String, HashMap<String, HashMap<String, f64>>>,
    pub outcome_profiles: HashMap<String, OutcomeProfile>,
    pub pass_profiles: HashMap<String, OutcomeProfile>,
    pub role_fit: RoleFitConfig,
    pub shot_diet: ShotDietConfig,
}

impl GameConfig {
    fn from_raw(raw: RawEraConfig) -> Self {
        GameConfig {
            era: raw.era,
            era_version: raw.era_version,
            knobs: raw.knobs,
            shot_base: raw.shot_base,
            corner3_prob_by_action_base: raw.corner3_prob_by_action_base,
            pass_base_success: raw.pass_base_success,
            action_outcome_priors: raw.action_outcome_priors,
            action_aliases: raw.action_aliases,
            off_scheme_action_weights: raw.off_scheme_action_weights,
            def_scheme_action_weights: raw.def_scheme_action_weights,
            offense_scheme_mult: raw.offense_scheme_mult,
            defense_scheme_mult: raw.defense_scheme_mult,
            outcome_profiles: raw.outcome_profiles,
            pass_profiles: raw.pass_profiles,
            role_fit: raw.role_fit,
            shot_diet: raw.shot_diet,
        }
    }

    /// Resolves an action name through `action_aliases` before any table
    /// lookup, mirroring `shot_diet.py: get_action_base`.
    pub fn canonical_action<'a>(&'a self, action: &'a str) -> &'a str {
        self.action_aliases.get(action).map(|s| s.as_str()).unwrap_or(action)
    }

    pub fn outcome_priors_for(&self, action: &str) -> Option<&HashMap<String, f64>> {
        self.action_outcome_priors.get(self.canonical_action(action))
    }

    pub fn shot_base_for(&self, outcome: &str) -> f64 {
        self.shot_base.get(outcome).copied().unwrap_or(0.40)
    }

    pub fn pass_base_for(&self, outcome: &str) -> f64 {
        self.pass_base_success.get(outcome).copied().unwrap_or(0.90)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_era_loads_and_has_all_ten_base_actions() {
        let cfg = load_era("default").expect("embedded config must parse");
        for action in [
            "PnR", "Drive", "DHO", "SpotUp", "Kickout", "ExtraPass", "Cut", "PostUp", "HornsSet",
            "TransitionEarly",
        ] {
            assert!(
                cfg.action_outcome_priors.contains_key(action),
                "missing action_outcome_priors for {action}"
            );
            assert!(
                cfg.shot_diet.weights_global_outcome.contains_key(action),
                "missing shot_diet weights for {action}"
            );
        }
    }

    #[test]
    fn unknown_era_falls_back_to_default() {
        let cfg = load_era("2031-retro").expect("fallback must still parse");
        assert_eq!(cfg.era, "default");
    }

    #[test]
    fn role_fit_has_five_roles_per_scheme() {
        let cfg = load_era("default").unwrap();
        assert_eq!(cfg.role_fit.roles.len(), 5);
        for scheme in ["Drop", "Switch_Everything", "Zone", "Blitz_Hedge", "Man_Press"] {
            let profile = cfg.role_fit.profiles.get(scheme).expect("scheme profile present");
            assert_eq!(profile.len(), 5);
        }
    }
}
