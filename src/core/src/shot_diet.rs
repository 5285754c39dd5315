//! Lineup-driven, tactics-preserving probability shaping (spec §4.4).
//!
//! Grounded on `original_source/matchengine_v3/shot_diet.py` (the
//! feature-vector computation and multiplier math, ported near
//! line-for-line) and `shot_diet_data.py` (now `config::ShotDietConfig`,
//! see `config/mod.rs`). Both Python modules survive in the retrieved
//! pack, so this module is a translation rather than a synthesis.
//!
//! The Python original keeps a single process-wide `OrderedDict` cache
//! mutated as a side effect of `compute_shot_diet_style`. Spec §9
//! reserves `TeamState`/`GameState` to a single `simulate_game`
//! invocation with "no cross-game references ... until ingest", so
//! [`ShotDietCache`] is owned per-game instead of process-wide — still
//! a pure function of its key (spec §9 "cache is a pure function of
//! its key"), just scoped narrower than the Python global to avoid a
//! shared mutable static across concurrently-simulated games.

use crate::config::{GameConfig, ShotDietConfig};
use crate::team::{OffenseRole, Player, Team};
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

const BASELINE: f64 = 0.5;
const CACHE_CAPACITY: usize = 2048;

#[derive(Debug, Clone)]
pub struct InitiatorInfo {
    pub primary_pid: String,
    pub secondary_pid: String,
    pub w_primary: f64,
    pub w_secondary: f64,
}

#[derive(Debug, Clone)]
pub struct ScreenersInfo {
    pub screener1_pid: String,
    pub screener2_pid: Option<String>,
}

/// Cached style vector for a given on-court matchup (spec §4.4 "a
/// cached feature vector describing the offensive and defensive
/// lineup profile").
#[derive(Debug, Clone)]
pub struct ShotDietStyle {
    pub initiator: InitiatorInfo,
    pub screeners: ScreenersInfo,
    pub off_features: HashMap<String, f64>,
    pub def_features: HashMap<String, f64>,
}

impl ShotDietStyle {
    pub fn all_features(&self) -> HashMap<String, f64> {
        let mut out = self.off_features.clone();
        out.extend(self.def_features.clone());
        out
    }
}

fn get01(p: &Player, key: &str) -> f64 {
    (p.ability(key) / 100.0).clamp(0.0, 1.0)
}

fn mean(vals: &[f64]) -> f64 {
    if vals.is_empty() {
        BASELINE
    } else {
        vals.iter().sum::<f64>() / vals.len() as f64
    }
}

fn topk_mean(players: &[&Player], score_fn: impl Fn(&Player) -> f64, k: usize) -> f64 {
    if players.is_empty() {
        return BASELINE;
    }
    let mut scored: Vec<f64> = players.iter().map(|p| score_fn(p)).collect();
    scored.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    let k = k.clamp(1, scored.len());
    scored[..k].iter().sum::<f64>() / k as f64
}

fn count_ge(players: &[&Player], score_fn: impl Fn(&Player) -> f64, thr: f64) -> usize {
    players.iter().filter(|p| score_fn(p) >= thr).count()
}

fn onball_score(p: &Player) -> f64 {
    0.35 * get01(p, "PNR_READ") + 0.35 * get01(p, "DRIVE_CREATE") + 0.20 * get01(p, "PASS_CREATE") + 0.10 * get01(p, "HANDLE_SAFE")
}

fn screen_score(p: &Player) -> f64 {
    let mut physical = get01(p, "PHYSICAL");
    if (physical - BASELINE).abs() < 1e-9 {
        physical = get01(p, "FIN_CONTACT");
    }
    0.30 * get01(p, "SHORTROLL_PLAY") + 0.25 * get01(p, "FIN_RIM") + 0.15 * get01(p, "FIN_CONTACT") + 0.15 * physical + 0.15 * get01(p, "PASS_CREATE")
}

fn active<'a>(team: &'a Team, on_court: &[String]) -> Vec<&'a Player> {
    on_court.iter().filter_map(|pid| team.find_player(pid)).collect()
}

fn role_pid<'a>(team: &'a Team, role_name: &str) -> Option<&'a String> {
    OffenseRole::ALL.iter().find(|r| r.as_str() == role_name).and_then(|r| team.roles.get(r))
}

fn pick_primary_secondary(offense: &Team, lineup: &[&Player], cfg: &ShotDietConfig) -> InitiatorInfo {
    let role_ip = role_pid(offense, "Initiator_Primary").cloned();
    let role_is = role_pid(offense, "Initiator_Secondary").cloned();

    let primary = match &role_ip {
        Some(pid) if lineup.iter().any(|p| &p.player_id == pid) => pid.clone(),
        _ => lineup.iter().max_by(|a, b| onball_score(a).partial_cmp(&onball_score(b)).unwrap()).map(|p| p.player_id.clone()).unwrap_or_default(),
    };

    let secondary = match &role_is {
        Some(pid) if pid != &primary && lineup.iter().any(|p| &p.player_id == pid) => pid.clone(),
        _ => lineup
            .iter()
            .filter(|p| p.player_id != primary)
            .max_by(|a, b| onball_score(a).partial_cmp(&onball_score(b)).unwrap())
            .map(|p| p.player_id.clone())
            .unwrap_or_else(|| primary.clone()),
    };

    let p_primary = lineup.iter().find(|p| p.player_id == primary);
    let s1 = p_primary.map(|p| onball_score(p)).unwrap_or(BASELINE);

    let (w1, w2, s2) = if secondary == primary {
        (1.0, 0.0, s1)
    } else {
        let p_secondary = lineup.iter().find(|p| p.player_id == secondary);
        let s2 = p_secondary.map(|p| onball_score(p)).unwrap_or(BASELINE);
        let z1 = (s1 / cfg.tau_usage).exp();
        let z2 = (s2 / cfg.tau_usage).exp();
        let mut w1 = z1 / (z1 + z2);
        w1 = w1.clamp(cfg.usage_min_primary, cfg.usage_max_primary);
        (w1, 1.0 - w1, s2)
    };
    let _ = s2;

    InitiatorInfo { primary_pid: primary, secondary_pid: secondary, w_primary: w1, w_secondary: w2 }
}

fn pick_screeners(offense: &Team, lineup: &[&Player], primary: &str, secondary: &str, scheme_norm: &str, cfg: &ShotDietConfig) -> ScreenersInfo {
    let prio_roles: &[String] = cfg.screener_role_priority.get(scheme_norm).map(|v| v.as_slice()).unwrap_or(&[]);

    let first_by_priority = |exclude: &[&str]| -> Option<String> {
        for role_name in prio_roles {
            if let Some(pid) = role_pid(offense, role_name) {
                if !exclude.contains(&pid.as_str()) && lineup.iter().any(|p| &p.player_id == pid) {
                    return Some(pid.clone());
                }
            }
        }
        None
    };

    let scr1 = first_by_priority(&[primary, secondary]).unwrap_or_else(|| {
        let candidates: Vec<&&Player> = lineup.iter().filter(|p| p.player_id != primary && p.player_id != secondary).collect();
        let pool: Vec<&&Player> = if candidates.is_empty() { lineup.iter().collect() } else { candidates };
        pool.into_iter().max_by(|a, b| screen_score(a).partial_cmp(&screen_score(b)).unwrap()).map(|p| p.player_id.clone()).unwrap_or_default()
    });

    let scr2 = first_by_priority(&[primary, secondary, &scr1]).or_else(|| {
        let candidates: Vec<&&Player> = lineup.iter().filter(|p| p.player_id != scr1).collect();
        let preferred: Vec<&&Player> = candidates.iter().filter(|p| p.player_id != primary && p.player_id != secondary).copied().collect();
        let pool = if preferred.is_empty() { candidates } else { preferred };
        pool.into_iter().max_by(|a, b| screen_score(a).partial_cmp(&screen_score(b)).unwrap()).map(|p| p.player_id.clone())
    });

    ScreenersInfo { screener1_pid: scr1, screener2_pid: scr2 }
}

fn support_players<'a>(lineup: &[&'a Player], exclude: &[&str]) -> Vec<&'a Player> {
    let support: Vec<&Player> = lineup.iter().filter(|p| !exclude.contains(&p.player_id.as_str())).copied().collect();
    if support.is_empty() {
        lineup.to_vec()
    } else {
        support
    }
}

/// Computes the style vector from scratch (spec §4.4). Called only on
/// a cache miss by [`ShotDietCache::get_or_compute`].
fn compute_shot_diet_style(offense: &Team, defense: &Team, off_on_court: &[String], def_on_court: &[String], scheme_norm: &str, cfg: &ShotDietConfig) -> ShotDietStyle {
    let lineup = active(offense, off_on_court);
    let dline = active(defense, def_on_court);

    let initiator = pick_primary_secondary(offense, &lineup, cfg);
    let screeners = pick_screeners(offense, &lineup, &initiator.primary_pid, &initiator.secondary_pid, scheme_norm, cfg);

    let p_primary = lineup.iter().find(|p| p.player_id == initiator.primary_pid).copied();
    let p_secondary = lineup.iter().find(|p| p.player_id == initiator.secondary_pid).copied();
    let usage_weighted = |fn_: &dyn Fn(&Player) -> f64| -> f64 {
        let a = p_primary.map(fn_).unwrap_or(BASELINE) * initiator.w_primary;
        let b = p_secondary.map(fn_).unwrap_or(BASELINE) * initiator.w_secondary;
        a + b
    };

    let foul_pressure = |p: &Player| -> f64 {
        let ft = get01(p, "SHOT_FT");
        if (ft - BASELINE).abs() < 1e-9 {
            get01(p, "FIN_CONTACT")
        } else {
            0.6 * ft + 0.4 * get01(p, "FIN_CONTACT")
        }
    };

    let bh_pnr = usage_weighted(&|p| get01(p, "PNR_READ"));
    let bh_drive_pressure = usage_weighted(&|p| 0.6 * get01(p, "FIRST_STEP") + 0.4 * get01(p, "DRIVE_CREATE"));
    let bh_pullup_threat = usage_weighted(&|p| 0.6 * get01(p, "SHOT_3_OD") + 0.4 * get01(p, "SHOT_MID_PU"));
    let bh_pass_creation = usage_weighted(&|p| 0.6 * get01(p, "PASS_CREATE") + 0.4 * get01(p, "PNR_READ"));
    let bh_ball_security = usage_weighted(&|p| 0.5 * get01(p, "HANDLE_SAFE") + 0.5 * get01(p, "PASS_SAFE"));
    let bh_foul_pressure = usage_weighted(&foul_pressure);

    let scr1_p = lineup.iter().find(|p| p.player_id == screeners.screener1_pid).copied();
    let scr2_p = screeners.screener2_pid.as_ref().and_then(|pid| lineup.iter().find(|p| &p.player_id == pid).copied());
    let (w_scr1, w_scr2) = if scr2_p.is_some() { (0.70, 0.30) } else { (1.0, 0.0) };
    let screener_mix = |fn_: &dyn Fn(&Player) -> f64| -> f64 {
        let a = scr1_p.map(fn_).unwrap_or(BASELINE) * w_scr1;
        let b = scr2_p.map(fn_).unwrap_or(BASELINE) * w_scr2;
        a + b
    };

    let screen_quality = |p: &Player| -> f64 {
        let physical = get01(p, "PHYSICAL");
        if (physical - BASELINE).abs() < 1e-9 {
            get01(p, "FIN_CONTACT")
        } else {
            physical
        }
    };
    let shortroll_play = |p: &Player| -> f64 {
        let sr = get01(p, "SHORTROLL_PLAY");
        if (sr - BASELINE).abs() < 1e-9 {
            0.6 * get01(p, "PASS_CREATE") + 0.4 * get01(p, "PASS_SAFE")
        } else {
            sr
        }
    };

    let sc_screen_quality = screener_mix(&screen_quality);
    let sc_roll_finish = screener_mix(&|p| 0.45 * get01(p, "FIN_RIM") + 0.30 * get01(p, "FIN_DUNK") + 0.25 * get01(p, "FIN_CONTACT"));
    let sc_shortroll_play = screener_mix(&shortroll_play);
    let sc_pop_threat = screener_mix(&|p| 0.7 * get01(p, "SHOT_3_CS") + 0.3 * get01(p, "SHOT_MID_CS"));

    let mut exclude = vec![initiator.primary_pid.as_str(), initiator.secondary_pid.as_str(), screeners.screener1_pid.as_str()];
    if let Some(scr2) = &screeners.screener2_pid {
        exclude.push(scr2.as_str());
    }
    let support = support_players(&lineup, &exclude);

    let cs_fn = |p: &Player| get01(p, "SHOT_3_CS");
    let team_catch3_quality = mean(&support.iter().map(|p| get01(p, "SHOT_3_CS")).collect::<Vec<_>>());
    let base = topk_mean(&support, cs_fn, 3);
    let shooters = count_ge(&support, cs_fn, 0.70);
    let bonus = (((shooters as i64) - 2) as f64 * 0.05).clamp(-0.05, 0.10);
    let team_spacing = (base + bonus).clamp(0.0, 1.0);

    let team_cutting = mean(&support.iter().map(|p| 0.6 * get01(p, "FIRST_STEP") + 0.4 * get01(p, "FIN_RIM")).collect::<Vec<_>>());
    let team_extra_pass = mean(&support.iter().map(|p| 0.6 * get01(p, "PASS_SAFE") + 0.4 * get01(p, "PASS_CREATE")).collect::<Vec<_>>());
    let team_orb_crash = mean(&lineup.iter().map(|p| get01(p, "REB_OR")).collect::<Vec<_>>());
    let team_pace = mean(&lineup.iter().map(|p| 0.6 * get01(p, "ENDURANCE") + 0.4 * get01(p, "FIRST_STEP")).collect::<Vec<_>>());

    let has_key_any = |key: &str| lineup.iter().any(|p| (p.ability_raw(key) - 50.0).abs() > 1e-6);
    let team_post_gravity = if has_key_any("POST_SCORE") {
        let post_score = topk_mean(&lineup, |p| get01(p, "POST_SCORE"), 1);
        let post_control = if has_key_any("POST_CONTROL") { topk_mean(&lineup, |p| get01(p, "POST_CONTROL"), 1) } else { BASELINE };
        let physical = if has_key_any("PHYSICAL") { topk_mean(&lineup, |p| get01(p, "PHYSICAL"), 1) } else { topk_mean(&lineup, |p| get01(p, "FIN_CONTACT"), 1) };
        (0.5 * post_score + 0.3 * post_control + 0.2 * physical).clamp(0.0, 1.0)
    } else {
        let contact = topk_mean(&lineup, |p| get01(p, "FIN_CONTACT"), 1);
        let rim = topk_mean(&lineup, |p| get01(p, "FIN_RIM"), 1);
        (0.7 * contact + 0.3 * rim).clamp(0.0, 1.0)
    };

    let off_features = HashMap::from([
        ("BH_PNR".to_string(), bh_pnr),
        ("BH_DRIVE_PRESSURE".to_string(), bh_drive_pressure),
        ("BH_PULLUP_THREAT".to_string(), bh_pullup_threat),
        ("BH_PASS_CREATION".to_string(), bh_pass_creation),
        ("BH_BALL_SECURITY".to_string(), bh_ball_security),
        ("BH_FOUL_PRESSURE".to_string(), bh_foul_pressure),
        ("SC_SCREEN_QUALITY".to_string(), sc_screen_quality),
        ("SC_ROLL_FINISH".to_string(), sc_roll_finish),
        ("SC_SHORTROLL_PLAY".to_string(), sc_shortroll_play),
        ("SC_POP_THREAT".to_string(), sc_pop_threat),
        ("TEAM_SPACING".to_string(), team_spacing),
        ("TEAM_CATCH3_QUALITY".to_string(), team_catch3_quality),
        ("TEAM_CUTTING".to_string(), team_cutting),
        ("TEAM_EXTRA_PASS".to_string(), team_extra_pass),
        ("TEAM_ORB_CRASH".to_string(), team_orb_crash),
        ("TEAM_PACE".to_string(), team_pace),
        ("TEAM_POST_GRAVITY".to_string(), team_post_gravity),
    ]);

    let mut d_rim_protect = topk_mean(&dline, |p| get01(p, "DEF_RIM"), 1);
    if (d_rim_protect - BASELINE).abs() < 1e-9 {
        d_rim_protect = mean(&dline.iter().map(|p| get01(p, "DEF_HELP")).collect::<Vec<_>>());
    }
    let mut d_poa = topk_mean(&dline, |p| get01(p, "DEF_POA"), 1);
    if (d_poa - BASELINE).abs() < 1e-9 {
        d_poa = mean(&dline.iter().map(|p| get01(p, "DEF_HELP")).collect::<Vec<_>>());
    }
    let mut d_help_closeout = mean(&dline.iter().map(|p| get01(p, "DEF_HELP")).collect::<Vec<_>>());
    if (d_help_closeout - BASELINE).abs() < 1e-9 {
        d_help_closeout = mean(&dline.iter().map(|p| get01(p, "DEF_POA")).collect::<Vec<_>>());
    }
    let d_steal_press = mean(&dline.iter().map(|p| get01(p, "DEF_STEAL")).collect::<Vec<_>>());
    let mut d_post = topk_mean(&dline, |p| get01(p, "DEF_POST"), 1);
    if (d_post - BASELINE).abs() < 1e-9 {
        d_post = topk_mean(&dline, |p| get01(p, "PHYSICAL"), 1);
    }
    let d_dreb = mean(&dline.iter().map(|p| get01(p, "REB_DR")).collect::<Vec<_>>());

    let def_features = HashMap::from([
        ("D_RIM_PROTECT".to_string(), d_rim_protect),
        ("D_POA".to_string(), d_poa),
        ("D_HELP_CLOSEOUT".to_string(), d_help_closeout),
        ("D_STEAL_PRESS".to_string(), d_steal_press),
        ("D_POST".to_string(), d_post),
        ("D_DREB".to_string(), d_dreb),
    ]);

    ShotDietStyle { initiator, screeners, off_features, def_features }
}

fn compute_log_mult(features: &HashMap<String, f64>, weights: &HashMap<String, f64>) -> f64 {
    weights.iter().map(|(k, w)| w * (features.get(k).copied().unwrap_or(BASELINE) - BASELINE)).sum()
}

fn exp_mult_from_log(log_mult: f64, alpha: f64, clamp: (f64, f64)) -> f64 {
    if alpha <= 0.0 {
        return 1.0;
    }
    let (lo, hi) = clamp;
    let lo_log = lo.ln() / alpha;
    let hi_log = hi.ln() / alpha;
    let log_mult = log_mult.clamp(lo_log, hi_log);
    (alpha * log_mult).exp()
}

/// Multipliers for base actions (spec §4.4a).
pub fn action_multipliers(style: &ShotDietStyle, tactic_name: &str, cfg: &ShotDietConfig) -> HashMap<String, f64> {
    let (alpha_action, _) = cfg.tactic_alphas(tactic_name);
    let features = style.all_features();
    let weights_by_action = cfg.weights_tactic_action.get(tactic_name);
    let clamp = (cfg.clamp_action_mult_lo, cfg.clamp_action_mult_hi);

    let mut actions: std::collections::HashSet<&String> = cfg.weights_global_outcome.keys().collect();
    if let Some(w) = weights_by_action {
        actions.extend(w.keys());
    }

    actions
        .into_iter()
        .map(|action| {
            let mult = match weights_by_action.and_then(|w| w.get(action)) {
                Some(w) if !w.is_empty() => exp_mult_from_log(compute_log_mult(&features, w), alpha_action, clamp),
                _ => 1.0,
            };
            (action.clone(), mult)
        })
        .collect()
}

/// Multipliers for outcomes within a given base action (spec §4.4b).
pub fn outcome_multipliers(style: &ShotDietStyle, tactic_name: &str, base_action: &str, cfg: &ShotDietConfig) -> HashMap<String, f64> {
    let (_, alpha_outcome) = cfg.tactic_alphas(tactic_name);
    let features = style.all_features();
    let clamp = (cfg.clamp_outcome_mult_lo, cfg.clamp_outcome_mult_hi);

    let base = cfg.weights_global_outcome.get(base_action);
    let delta = cfg.weights_tactic_outcome_delta.get(tactic_name).and_then(|m| m.get(base_action));

    let mut outcomes: std::collections::HashSet<&String> = base.map(|b| b.keys().collect()).unwrap_or_default();
    if let Some(d) = delta {
        outcomes.extend(d.keys());
    }

    outcomes
        .into_iter()
        .map(|outcome| {
            let mut w_total: HashMap<String, f64> = base.and_then(|b| b.get(outcome)).cloned().unwrap_or_default();
            if let Some(d) = delta.and_then(|d| d.get(outcome)) {
                for (k, v) in d {
                    *w_total.entry(k.clone()).or_insert(0.0) += v;
                }
            }
            let mult = if w_total.is_empty() { 1.0 } else { exp_mult_from_log(compute_log_mult(&features, &w_total), alpha_outcome, clamp) };
            (outcome.clone(), mult)
        })
        .collect()
}

fn energy_bucket(v: f64) -> i64 {
    (v.clamp(0.0, 1.0) * 100.0).round() as i64
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StyleCacheKey {
    off_pids: Vec<String>,
    def_pids: Vec<String>,
    off_energy: Vec<i64>,
    def_energy: Vec<i64>,
    scheme_norm: String,
    role_key: Vec<Option<String>>,
}

/// Bounded LRU cache of [`ShotDietStyle`] vectors (spec §4.4/§5: "cache
/// in an LRU bounded at 2048 entries").
pub struct ShotDietCache {
    cache: LruCache<StyleCacheKey, Arc<ShotDietStyle>>,
}

impl ShotDietCache {
    pub fn new() -> Self {
        ShotDietCache { cache: LruCache::new(NonZeroUsize::new(CACHE_CAPACITY).unwrap()) }
    }

    pub fn get_or_compute(&mut self, offense: &Team, defense: &Team, game_state: &crate::state::GameState, off_side: crate::state::Side, def_side: crate::state::Side, scheme_name: &str, game_cfg: &GameConfig) -> Arc<ShotDietStyle> {
        let scheme_norm = game_cfg.shot_diet.normalize_scheme_name(scheme_name);

        let mut off_pids: Vec<String> = game_state.on_court_of(off_side).to_vec();
        off_pids.sort();
        let mut def_pids: Vec<String> = game_state.on_court_of(def_side).to_vec();
        def_pids.sort();
        let off_energy: Vec<i64> = off_pids.iter().map(|pid| energy_bucket(game_state.fatigue_of(off_side, pid))).collect();
        let def_energy: Vec<i64> = def_pids.iter().map(|pid| energy_bucket(game_state.fatigue_of(def_side, pid))).collect();
        let role_key: Vec<Option<String>> = OffenseRole::ALL.iter().map(|r| offense.roles.get(r).cloned()).collect();

        let key = StyleCacheKey { off_pids, def_pids, off_energy, def_energy, scheme_norm: scheme_norm.clone(), role_key };

        if let Some(style) = self.cache.get(&key) {
            return style.clone();
        }

        let off_on_court = game_state.on_court_of(off_side).to_vec();
        let def_on_court = game_state.on_court_of(def_side).to_vec();
        let style = Arc::new(compute_shot_diet_style(offense, defense, &off_on_court, &def_on_court, &scheme_norm, &game_cfg.shot_diet));
        self.cache.put(key, style.clone());
        style
    }
}

impl Default for ShotDietCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_era;
    use crate::rating::RawRatings;
    use crate::state::{GameState, Side};
    use crate::team::tactics::{DefenseScheme, OffenseScheme};
    use crate::team::Tactics;

    fn team_with_shooters() -> Team {
        let roster = (0..5)
            .map(|i| {
                let mut raw = RawRatings::new();
                raw.insert("Three-Point Shot".into(), 99.0);
                raw.insert("Shot IQ".into(), 90.0);
                raw.insert("Offensive Consistency".into(), 90.0);
                raw.insert("Hands".into(), 90.0);
                Player::new(format!("p{i}"), format!("Player {i}"), "G", &raw)
            })
            .collect();
        Team::new("LAL", roster, Tactics::new(OffenseScheme::FiveOut, DefenseScheme::Drop))
    }

    #[test]
    fn cache_returns_same_style_for_same_key() {
        let cfg = load_era("default").unwrap();
        let offense = team_with_shooters();
        let defense = team_with_shooters();
        let pids: Vec<String> = offense.roster.iter().map(|p| p.player_id.clone()).collect();
        let gs = GameState::new(&pids, &pids, HashMap::new(), HashMap::new(), pids.clone(), pids.clone());
        let mut cache = ShotDietCache::new();
        let a = cache.get_or_compute(&offense, &defense, &gs, Side::Home, Side::Away, "FiveOut", &cfg);
        let b = cache.get_or_compute(&offense, &defense, &gs, Side::Home, Side::Away, "FiveOut", &cfg);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn team_spacing_is_high_for_a_lineup_of_elite_shooters() {
        let cfg = load_era("default").unwrap();
        let offense = team_with_shooters();
        let defense = team_with_shooters();
        let off_pids: Vec<String> = offense.roster.iter().map(|p| p.player_id.clone()).collect();
        let def_pids: Vec<String> = defense.roster.iter().map(|p| p.player_id.clone()).collect();
        let style = compute_shot_diet_style(&offense, &defense, &off_pids, &def_pids, "FiveOut", &cfg.shot_diet);
        assert!(style.off_features["TEAM_SPACING"] > 0.7);
    }
}
