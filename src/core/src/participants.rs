//! Participant selection: which on-court player executes a given shot,
//! pass, or rebound (spec §4.3.5 "participant selection resolves the
//! specific players involved once an outcome is chosen").
//!
//! Grounded on `original_source/matchengine_v3/participants.py`, ported
//! close to line-for-line (role-priority-first candidate lists, filled
//! out with top-K-by-stat fallbacks, weighted by a power-law over the
//! relevant derived ability). `weighted_choice` (imported there from the
//! absent `core.py`) is reimplemented here as [`weighted_choice`] over an
//! explicitly ordered candidate list rather than a `HashMap`, so that
//! identical `(seed, lineup)` pairs always walk weights in the same
//! order (spec §5/§8 determinism).

use crate::shot_diet::ShotDietStyle;
use crate::team::{OffenseRole, Player, Team};
use rand::Rng;
use std::collections::{HashMap, HashSet};

fn active<'a>(team: &'a Team, on_court: &[String]) -> Vec<&'a Player> {
    on_court.iter().filter_map(|pid| team.find_player(pid)).collect()
}

fn role_player<'a>(team: &'a Team, on_court: &[String], role: OffenseRole) -> Option<&'a Player> {
    let pid = team.roles.get(&role)?;
    if !on_court.iter().any(|x| x == pid) {
        return None;
    }
    team.find_player(pid)
}

fn unique_players<'a>(players: Vec<Option<&'a Player>>) -> Vec<&'a Player> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for p in players.into_iter().flatten() {
        if seen.insert(p.player_id.clone()) {
            out.push(p);
        }
    }
    out
}

fn players_from_roles<'a>(team: &'a Team, on_court: &[String], roles: &[OffenseRole]) -> Vec<&'a Player> {
    unique_players(roles.iter().map(|r| role_player(team, on_court, *r)).collect())
}

fn top_k_by_stat<'a>(team: &'a Team, on_court: &[String], stat_key: &str, k: usize, exclude: &[&str]) -> Vec<&'a Player> {
    let mut pool = active(team, on_court);
    pool.sort_by(|a, b| b.ability(stat_key).partial_cmp(&a.ability(stat_key)).unwrap_or(std::cmp::Ordering::Equal));
    pool.into_iter().filter(|p| !exclude.contains(&p.player_id.as_str())).take(k).collect()
}

fn fill_candidates_with_top_k<'a>(team: &'a Team, on_court: &[String], mut cand: Vec<&'a Player>, cap: usize, stat_key: &str) -> Vec<&'a Player> {
    if cand.len() >= cap {
        cand.truncate(cap);
        return cand;
    }
    let exclude: Vec<&str> = cand.iter().map(|p| p.player_id.as_str()).collect();
    let extra = top_k_by_stat(team, on_court, stat_key, cap - cand.len(), &exclude);
    cand.extend(extra);
    let uniq = unique_players(cand.into_iter().map(Some).collect());
    uniq.into_iter().take(cap).collect()
}

fn pid_role_mult(team: &Team, pid: &str, role_mult: &HashMap<OffenseRole, f64>) -> f64 {
    let mut mult = 1.0f64;
    for (role, rpid) in &team.roles {
        if rpid == pid {
            mult = mult.max(*role_mult.get(role).unwrap_or(&1.0));
        }
    }
    mult
}

/// Weighted random choice over an explicitly ordered candidate list
/// (`core.py: weighted_choice`, reimplemented — see module doc comment
/// on why a `HashMap` cannot stand in for `weights` here).
pub fn weighted_choice(rng: &mut impl Rng, weights: &[(String, f64)]) -> Option<String> {
    let total: f64 = weights.iter().map(|(_, w)| w.max(0.0)).sum();
    if weights.is_empty() {
        return None;
    }
    if total <= 0.0 {
        return Some(weights[0].0.clone());
    }
    let r = rng.random_range(0.0..total);
    let mut acc = 0.0;
    for (pid, w) in weights {
        acc += w.max(0.0);
        if r < acc {
            return Some(pid.clone());
        }
    }
    weights.last().map(|(pid, _)| pid.clone())
}

/// Weighted random choice among provided candidates on a power-law of
/// `key`, each candidate's weight nudged by `extra_mult_by_pid`
/// (`participants.py: choose_weighted_player`).
pub fn choose_weighted_player<'a>(rng: &mut impl Rng, players: &[&'a Player], key: &str, power: f64, extra_mult_by_pid: &HashMap<String, f64>) -> &'a Player {
    let weights: Vec<(String, f64)> = players
        .iter()
        .map(|p| {
            let base = p.ability(key).max(1.0).powf(power);
            let mult = extra_mult_by_pid.get(&p.player_id).copied().unwrap_or(1.0);
            (p.player_id.clone(), base * mult)
        })
        .collect();
    let pid = weighted_choice(rng, &weights);
    match pid {
        Some(pid) => players.iter().find(|p| p.player_id == pid).copied().unwrap_or(players[0]),
        None => players[0],
    }
}

fn max_by_keys<'a>(players: &[&'a Player], keys: &[&str]) -> &'a Player {
    players
        .iter()
        .copied()
        .max_by(|a, b| {
            for k in keys {
                let ord = a.ability(k).partial_cmp(&b.ability(k)).unwrap_or(std::cmp::Ordering::Equal);
                if ord != std::cmp::Ordering::Equal {
                    return ord;
                }
            }
            std::cmp::Ordering::Equal
        })
        .expect("on-court lineup must be non-empty")
}

/// Style hints consumed by several choosers below (`participants.py:
/// _shot_diet_info`), clamping the initiator weights so style bias never
/// swamps the underlying stat-driven weight.
struct StyleHint {
    primary_pid: Option<String>,
    secondary_pid: Option<String>,
    w_primary: f64,
    w_secondary: f64,
    screener1_pid: Option<String>,
    screener2_pid: Option<String>,
}

fn style_hint(style: Option<&ShotDietStyle>) -> StyleHint {
    match style {
        None => StyleHint { primary_pid: None, secondary_pid: None, w_primary: 1.0, w_secondary: 1.0, screener1_pid: None, screener2_pid: None },
        Some(s) => StyleHint {
            primary_pid: Some(s.initiator.primary_pid.clone()),
            secondary_pid: Some(s.initiator.secondary_pid.clone()),
            w_primary: s.initiator.w_primary.clamp(0.75, 1.35),
            w_secondary: s.initiator.w_secondary.clamp(0.75, 1.35),
            screener1_pid: Some(s.screeners.screener1_pid.clone()),
            screener2_pid: s.screeners.screener2_pid.clone(),
        },
    }
}

const CREATOR_ROLE_PRIORITY: [OffenseRole; 5] = [
    OffenseRole::ShotCreator,
    OffenseRole::InitiatorPrimary,
    OffenseRole::InitiatorSecondary,
    OffenseRole::TransitionHandler,
    OffenseRole::ConnectorPlaymaker,
];

const FINISH_ROLE_BASE: [OffenseRole; 6] = [
    OffenseRole::RimAttacker,
    OffenseRole::RollerFinisher,
    OffenseRole::SpacerMovement,
    OffenseRole::ShotCreator,
    OffenseRole::InitiatorPrimary,
    OffenseRole::InitiatorSecondary,
];

const FINISH_ROLE_PNR: [OffenseRole; 8] = [
    OffenseRole::RollerFinisher,
    OffenseRole::ShortRollPlaymaker,
    OffenseRole::PopSpacerBig,
    OffenseRole::RimAttacker,
    OffenseRole::SpacerMovement,
    OffenseRole::ShotCreator,
    OffenseRole::InitiatorPrimary,
    OffenseRole::InitiatorSecondary,
];

const MULT_MIN: f64 = 0.70;
const MULT_MAX: f64 = 1.40;

fn dunk_role_mult() -> HashMap<OffenseRole, f64> {
    HashMap::from([
        (OffenseRole::RimAttacker, 1.10),
        (OffenseRole::RollerFinisher, 1.15),
        (OffenseRole::ShortRollPlaymaker, 1.00),
        (OffenseRole::SpacerMovement, 1.00),
        (OffenseRole::PopSpacerBig, 0.80),
    ])
}

const POST_FALLBACK_ROLES: [OffenseRole; 3] = [OffenseRole::ShortRollPlaymaker, OffenseRole::PopSpacerBig, OffenseRole::RollerFinisher];

const DEFAULT_PASSER_PRIORITY: [OffenseRole; 5] = [
    OffenseRole::InitiatorPrimary,
    OffenseRole::InitiatorSecondary,
    OffenseRole::ConnectorPlaymaker,
    OffenseRole::TransitionHandler,
    OffenseRole::ShotCreator,
];

const SHORTROLL_PASSER_PRIORITY: [OffenseRole; 4] = [OffenseRole::ShortRollPlaymaker, OffenseRole::RollerFinisher, OffenseRole::PopSpacerBig, OffenseRole::PostHub];

const ASSIST_ROLE_PRIORITY: [OffenseRole; 6] = [
    OffenseRole::ConnectorPlaymaker,
    OffenseRole::InitiatorPrimary,
    OffenseRole::InitiatorSecondary,
    OffenseRole::ShortRollPlaymaker,
    OffenseRole::PostHub,
    OffenseRole::TransitionHandler,
];

const DEFAULT_ACTOR_ROLE_PRIORITY: [OffenseRole; 5] = [
    OffenseRole::InitiatorPrimary,
    OffenseRole::InitiatorSecondary,
    OffenseRole::TransitionHandler,
    OffenseRole::ConnectorPlaymaker,
    OffenseRole::ShotCreator,
];

/// Up to 3 best catch-and-shoot three-point shooters, weighted, nudged
/// away from the ball-handlers the shot-diet style already leans on.
pub fn choose_shooter_for_three<'a>(rng: &mut impl Rng, offense: &'a Team, on_court: &[String], style: Option<&ShotDietStyle>) -> &'a Player {
    let cand = top_k_by_stat(offense, on_court, "SHOT_3_CS", 3, &[]);
    let hint = style_hint(style);
    let apply_bias = style.is_some();
    let extra: HashMap<String, f64> = cand
        .iter()
        .map(|p| {
            let mult = if apply_bias {
                if Some(&p.player_id) == hint.primary_pid.as_ref() || Some(&p.player_id) == hint.secondary_pid.as_ref() {
                    0.85
                } else {
                    1.10
                }
            } else {
                1.0
            };
            (p.player_id.clone(), mult)
        })
        .collect();
    choose_weighted_player(rng, &cand, "SHOT_3_CS", 1.35, &extra)
}

/// Up to 3 best mid-range catch-and-shoot shooters, weighted the same way.
pub fn choose_shooter_for_mid<'a>(rng: &mut impl Rng, offense: &'a Team, on_court: &[String], style: Option<&ShotDietStyle>) -> &'a Player {
    let cand = top_k_by_stat(offense, on_court, "SHOT_MID_CS", 3, &[]);
    let hint = style_hint(style);
    let apply_bias = style.is_some();
    let extra: HashMap<String, f64> = cand
        .iter()
        .map(|p| {
            let mult = if apply_bias {
                if Some(&p.player_id) == hint.primary_pid.as_ref() || Some(&p.player_id) == hint.secondary_pid.as_ref() {
                    0.85
                } else {
                    1.10
                }
            } else {
                1.0
            };
            (p.player_id.clone(), mult)
        })
        .collect();
    choose_weighted_player(rng, &cand, "SHOT_MID_CS", 1.25, &extra)
}

/// Pull-up / off-dribble creator for a `SHOT_3_OD`/`SHOT_MID_PU` outcome.
pub fn choose_creator_for_pulloff<'a>(rng: &mut impl Rng, offense: &'a Team, on_court: &[String], outcome: &str, style: Option<&ShotDietStyle>) -> &'a Player {
    let key = if outcome == "SHOT_3_OD" { "SHOT_3_OD" } else { "SHOT_MID_PU" };
    let cand = players_from_roles(offense, on_court, &CREATOR_ROLE_PRIORITY);
    let cand = fill_candidates_with_top_k(offense, on_court, cand, 3, key);

    let hint = style_hint(style);
    let mut extra = HashMap::new();
    for p in &cand {
        if Some(&p.player_id) == hint.primary_pid.as_ref() {
            extra.insert(p.player_id.clone(), hint.w_primary);
        } else if Some(&p.player_id) == hint.secondary_pid.as_ref() {
            extra.insert(p.player_id.clone(), hint.w_secondary);
        }
    }
    choose_weighted_player(rng, &cand, key, 1.20, &extra)
}

/// Rim finisher for a `FIN_RIM`/`FIN_DUNK` outcome. `base_action ==
/// "PnR"` widens the role priority to the screen-and-roll cast and
/// gives the shot-diet style's chosen screeners a weight bump.
pub fn choose_finisher_rim<'a>(rng: &mut impl Rng, offense: &'a Team, on_court: &[String], dunk_bias: bool, style: Option<&ShotDietStyle>, base_action: Option<&str>) -> &'a Player {
    let key = if dunk_bias { "FIN_DUNK" } else { "FIN_RIM" };
    let role_priority: &[OffenseRole] = if base_action == Some("PnR") { &FINISH_ROLE_PNR } else { &FINISH_ROLE_BASE };

    let cand = players_from_roles(offense, on_court, role_priority);
    let cand = fill_candidates_with_top_k(offense, on_court, cand, 4, key);

    let hint = style_hint(style);
    let dunk_mult = dunk_role_mult();
    let mut extra = HashMap::new();
    for p in &cand {
        let mut mult = 1.0;
        if base_action == Some("PnR") {
            if Some(&p.player_id) == hint.screener1_pid.as_ref() {
                mult *= 1.25;
            } else if Some(&p.player_id) == hint.screener2_pid.as_ref() {
                mult *= 1.10;
            }
        }
        if dunk_bias {
            mult *= pid_role_mult(offense, &p.player_id, &dunk_mult);
        }
        extra.insert(p.player_id.clone(), mult.clamp(MULT_MIN, MULT_MAX));
    }
    choose_weighted_player(rng, &cand, key, 1.15, &extra)
}

/// Post-up target: the `Post_Hub` if on-court, else the best-fit big
/// among the short-roll/pop-big/roller roles, else the best post
/// controller on the floor.
pub fn choose_post_target<'a>(offense: &'a Team, on_court: &[String]) -> &'a Player {
    if let Some(p) = role_player(offense, on_court, OffenseRole::PostHub) {
        return p;
    }
    let cand = players_from_roles(offense, on_court, &POST_FALLBACK_ROLES);
    if !cand.is_empty() {
        return max_by_keys(&cand, &["POST_CONTROL", "POST_SCORE"]);
    }
    // REB_DR stands in for the Python fallback's generic "REB" stat,
    // which has no counterpart among our 29 derived abilities.
    max_by_keys(&active(offense, on_court), &["POST_CONTROL", "POST_SCORE", "REB_DR"])
}

/// Passer for the action/outcome pair that's about to resolve
/// (`participants.py: choose_passer`).
pub fn choose_passer<'a>(rng: &mut impl Rng, offense: &'a Team, on_court: &[String], base_action: &str, outcome: &str, style: Option<&ShotDietStyle>) -> &'a Player {
    if outcome == "PASS_SHORTROLL" {
        let cand = players_from_roles(offense, on_court, &SHORTROLL_PASSER_PRIORITY);
        if !cand.is_empty() {
            return max_by_keys(&cand, &["SHORTROLL_PLAY", "PASS_CREATE"]);
        }
        return max_by_keys(&active(offense, on_court), &["SHORTROLL_PLAY", "PASS_CREATE"]);
    }

    if base_action == "PostUp" {
        if let Some(p) = role_player(offense, on_court, OffenseRole::PostHub) {
            return p;
        }
        return max_by_keys(&active(offense, on_court), &["POST_CONTROL", "PASS_CREATE"]);
    }

    if style.is_some() && matches!(outcome, "PASS_KICKOUT" | "PASS_EXTRA" | "PASS_SKIP") {
        let hint = style_hint(style);
        let mut cands: Vec<&Player> = Vec::new();
        for pid in [&hint.primary_pid, &hint.secondary_pid].into_iter().flatten() {
            if on_court.iter().any(|x| x == pid) {
                if let Some(p) = offense.find_player(pid) {
                    cands.push(p);
                }
            }
        }
        let cands = unique_players(cands.into_iter().map(Some).collect());
        if !cands.is_empty() {
            let mut extra = HashMap::new();
            for p in &cands {
                let mult = if Some(&p.player_id) == hint.primary_pid.as_ref() { hint.w_primary } else { hint.w_secondary };
                extra.insert(p.player_id.clone(), mult);
            }
            return choose_weighted_player(rng, &cands, "PASS_CREATE", 1.10, &extra);
        }
    }

    if base_action == "Drive" {
        let cand_a = role_player(offense, on_court, OffenseRole::RimAttacker).unwrap_or_else(|| max_by_keys(&active(offense, on_court), &["DRIVE_CREATE"]));
        let cand_b = role_player(offense, on_court, OffenseRole::InitiatorPrimary)
            .or_else(|| role_player(offense, on_court, OffenseRole::InitiatorSecondary))
            .or_else(|| role_player(offense, on_court, OffenseRole::ConnectorPlaymaker))
            .unwrap_or_else(|| max_by_keys(&active(offense, on_court), &["PASS_CREATE"]));
        let cand = unique_players(vec![Some(cand_a), Some(cand_b)]);
        return choose_weighted_player(rng, &cand, "PASS_CREATE", 1.10, &HashMap::new());
    }

    for role in DEFAULT_PASSER_PRIORITY {
        if let Some(p) = role_player(offense, on_court, role) {
            return p;
        }
    }
    max_by_keys(&active(offense, on_court), &["PASS_CREATE"])
}

/// Deterministic assist credit: prefer the established playmaking
/// roles, but never credit the shooter themselves.
pub fn choose_assister_deterministic<'a>(team: &'a Team, on_court: &[String], shooter_pid: &str) -> Option<&'a Player> {
    for role in ASSIST_ROLE_PRIORITY {
        if let Some(pid) = team.roles.get(&role) {
            if pid != shooter_pid && on_court.iter().any(|x| x == pid) {
                if let Some(p) = team.find_player(pid) {
                    return Some(p);
                }
            }
        }
    }
    let others: Vec<&Player> = active(team, on_court).into_iter().filter(|p| p.player_id != shooter_pid).collect();
    if others.is_empty() {
        return None;
    }
    Some(max_by_keys(&others, &["PASS_CREATE"]))
}

/// Generic on-ball actor for outcomes with no dedicated chooser (spec
/// §4.3.5's catch-all "a reasonable default participant").
pub fn choose_default_actor<'a>(offense: &'a Team, on_court: &[String]) -> &'a Player {
    for role in DEFAULT_ACTOR_ROLE_PRIORITY {
        if let Some(p) = role_player(offense, on_court, role) {
            return p;
        }
    }
    max_by_keys(&active(offense, on_court), &["PASS_CREATE"])
}

pub fn choose_orb_rebounder<'a>(rng: &mut impl Rng, offense: &'a Team, on_court: &[String]) -> &'a Player {
    let mut pool = active(offense, on_court);
    pool.sort_by(|a, b| {
        let sa = a.ability("REB_OR") + 0.20 * a.ability("PHYSICAL");
        let sb = b.ability("REB_OR") + 0.20 * b.ability("PHYSICAL");
        sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
    });
    pool.truncate(3);
    choose_weighted_player(rng, &pool, "REB_OR", 1.15, &HashMap::new())
}

pub fn choose_drb_rebounder<'a>(rng: &mut impl Rng, defense: &'a Team, on_court: &[String]) -> &'a Player {
    let mut pool = active(defense, on_court);
    pool.sort_by(|a, b| {
        let sa = a.ability("REB_DR") + 0.20 * a.ability("PHYSICAL");
        let sb = b.ability("REB_DR") + 0.20 * b.ability("PHYSICAL");
        sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
    });
    pool.truncate(3);
    choose_weighted_player(rng, &pool, "REB_DR", 1.10, &HashMap::new())
}

/// Defender credited with a foul: excludes anyone already at the
/// foul-out limit when an eligible defender remains, uniform otherwise.
/// Bookkeeping (incrementing `player_fouls`) is the caller's job.
pub fn choose_fouler_pid(rng: &mut impl Rng, def_on_court: &[String], player_fouls: &HashMap<String, u32>, foul_out_limit: u32) -> Option<String> {
    if def_on_court.is_empty() {
        return None;
    }
    let eligible: Vec<&String> = def_on_court.iter().filter(|pid| player_fouls.get(*pid).copied().unwrap_or(0) < foul_out_limit).collect();
    let pool: Vec<&String> = if eligible.is_empty() { def_on_court.iter().collect() } else { eligible };
    let idx = rng.random_range(0..pool.len());
    Some(pool[idx].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::RawRatings;
    use crate::team::tactics::{DefenseScheme, OffenseScheme};
    use crate::team::Tactics;

    fn team_with_shooter() -> Team {
        let roster = (0..5)
            .map(|i| {
                let mut raw = RawRatings::new();
                if i == 0 {
                    raw.insert("Three-Point Shot".into(), 99.0);
                }
                Player::new(format!("p{i}"), format!("Player {i}"), "G", &raw)
            })
            .collect();
        Team::new("LAL", roster, Tactics::new(OffenseScheme::FiveOut, DefenseScheme::Drop))
    }

    #[test]
    fn choose_shooter_for_three_only_returns_on_court_players() {
        let team = team_with_shooter();
        let on_court: Vec<String> = team.roster.iter().map(|p| p.player_id.clone()).collect();
        let mut rng = rand::rng();
        let shooter = choose_shooter_for_three(&mut rng, &team, &on_court, None);
        assert!(on_court.contains(&shooter.player_id));
    }

    #[test]
    fn assister_never_credits_the_shooter() {
        let team = team_with_shooter();
        let on_court: Vec<String> = team.roster.iter().map(|p| p.player_id.clone()).collect();
        let assister = choose_assister_deterministic(&team, &on_court, "p0");
        assert!(assister.is_none() || assister.unwrap().player_id != "p0");
    }

    #[test]
    fn fouler_excludes_players_at_foul_out_limit_when_others_remain() {
        let on_court = vec!["p0".to_string(), "p1".to_string()];
        let mut fouls = HashMap::new();
        fouls.insert("p0".to_string(), 6);
        let mut rng = rand::rng();
        for _ in 0..20 {
            let fouler = choose_fouler_pid(&mut rng, &on_court, &fouls, 6).unwrap();
            assert_eq!(fouler, "p1");
        }
    }
}
