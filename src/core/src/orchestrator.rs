//! The per-game orchestrator (spec §4.5): `simulate_game` validates both
//! sides, builds a fresh [`GameState`], runs the period loop (regulation +
//! overtime) over repeated [`crate::possession::simulate_possession`]
//! calls, drives the rotation/fatigue/rest subsystems between possessions,
//! and emits a [`RawGameResult`].
//!
//! Grounded on `original_source/matchengine_v3/sim_game.py` for the flow
//! (the numbered steps below mirror spec §4.5 one-to-one); the outer
//! `play`-then-assemble-result shape and the tired-players-first
//! substitution idiom are carried from the teacher's
//! `match::engine::engine::FootballEngine::play`/`process_substitutions`.

use crate::config::GameConfig;
use crate::error::{EngineError, Result};
use crate::possession::{self, PossessionContext, PossessionResult, PossessionStart, Rules};
use crate::rating;
use crate::result::raw::{RawBreakdowns, RawGameResult, RawGameStateResult, RawMeta, RawPlayerBox, RawTeamResult, RawTotals};
use crate::shot_diet::ShotDietCache;
use crate::state::{EndReason, GameState, Side, TeamGame};
use crate::team::{OffenseRole, Team};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Multiplier bounds every tactic knob is clamped into during validation
/// (spec §7 `ValidationError` row: "multiplier outside [0.70, 1.40]").
const TACTIC_MULT_LO: f64 = 0.70;
const TACTIC_MULT_HI: f64 = 1.40;

/// Energy lost per elapsed clock-second for an on-court player, before
/// per-team tactical-emphasis amplification (spec §4.5 step 8's "fatigue
/// losses based on action intensity"). No table survives for this in the
/// retrieved config; tuned so a full-minutes starter in a 48-minute game
/// without rest ends up noticeably but not completely gassed.
const BASE_FATIGUE_DECAY_PER_SEC: f64 = 0.00035;

/// A substituted-out player must be at least this many seconds over his
/// rotation target (or fouled out) before the rotation subsystem swaps
/// him for a bench player, to avoid thrashing the lineup every possession.
const ROTATION_OVERAGE_THRESHOLD_SEC: f64 = 60.0;

fn engine_version() -> String {
    format!("league_core-{}", env!("CARGO_PKG_VERSION"))
}

fn is_canonical_team_id(team_id: &str) -> bool {
    team_id.len() == 3 && team_id.chars().all(|c| c.is_ascii_uppercase())
}

/// Spec §4.5 steps 1–2: tactic-multiplier sanitization and ID-contract
/// checks. `strict` mirrors `Rules::strict` (spec §7's
/// `ValidationConfig.strict`): in permissive mode out-of-bounds
/// multipliers are clamped and logged into `validation_report` rather
/// than rejected, and missing derived-ability keys are backfilled to the
/// rating-layer default instead of failing the game.
fn validate_and_sanitize(team: &mut Team, strict: bool, validation_report: &mut Vec<String>) -> Result<()> {
    if !is_canonical_team_id(&team.team_id) {
        return Err(EngineError::Contract(format!("non-canonical team_id '{}'", team.team_id)));
    }

    let mut seen = std::collections::HashSet::new();
    for p in &team.roster {
        if !seen.insert(p.player_id.clone()) {
            return Err(EngineError::Contract(format!("duplicate player_id '{}' within team '{}'", p.player_id, team.team_id)));
        }
    }

    for p in team.roster.iter_mut() {
        for key in rating::DERIVED_ABILITY_KEYS {
            if !p.derived.contains_key(*key) {
                if strict {
                    return Err(EngineError::Validation(format!("player '{}' missing derived ability '{key}'", p.player_id)));
                }
                validation_report.push(format!("backfilled missing derived ability '{key}' for player '{}'", p.player_id));
                p.derived.insert((*key).to_string(), rating::RAW_RATING_DEFAULT);
            }
        }
    }

    let clamp_or_reject = |label: String, value: f64, strict: bool, report: &mut Vec<String>| -> Result<f64> {
        if (TACTIC_MULT_LO..=TACTIC_MULT_HI).contains(&value) {
            return Ok(value);
        }
        if strict {
            return Err(EngineError::Validation(format!("{label} = {value} outside [{TACTIC_MULT_LO}, {TACTIC_MULT_HI}]")));
        }
        report.push(format!("clamped {label} from {value} into [{TACTIC_MULT_LO}, {TACTIC_MULT_HI}]"));
        Ok(value.clamp(TACTIC_MULT_LO, TACTIC_MULT_HI))
    };

    let team_id = team.team_id.clone();
    let tactics = &mut team.tactics;
    for (action, mult) in tactics.action_weight_mult.iter_mut() {
        *mult = clamp_or_reject(format!("{team_id}.action_weight_mult[{action}]"), *mult, strict, validation_report)?;
    }
    tactics.outcome_global_mult = clamp_or_reject(format!("{team_id}.outcome_global_mult"), tactics.outcome_global_mult, strict, validation_report)?;
    for (action, by_outcome) in tactics.outcome_by_action_mult.iter_mut() {
        for (outcome, mult) in by_outcome.iter_mut() {
            *mult = clamp_or_reject(format!("{team_id}.outcome_by_action_mult[{action}][{outcome}]"), *mult, strict, validation_report)?;
        }
    }

    Ok(())
}

fn validate_cross_team_identity(home: &Team, away: &Team) -> Result<()> {
    if home.team_id == away.team_id {
        return Err(EngineError::Contract(format!("home_team_id == away_team_id ('{}')", home.team_id)));
    }
    let home_pids: std::collections::HashSet<&str> = home.roster.iter().map(|p| p.player_id.as_str()).collect();
    for p in &away.roster {
        if home_pids.contains(p.player_id.as_str()) {
            return Err(EngineError::Contract(format!("player_id '{}' appears on both teams in a single game", p.player_id)));
        }
    }
    Ok(())
}

/// Spec §4.2's best-effort starting five, synthesized in the absence of a
/// surviving `pick_starters` source: walk the 12 canonical roles in
/// priority order, collecting distinct role-assigned players until five
/// are gathered, then pad from the roster if the team has fewer than
/// five distinctly-assigned roles. `Team::enforce_initiator_primary_start`
/// is applied by the caller afterward.
fn pick_starting_five(team: &Team) -> Vec<String> {
    let mut start: Vec<String> = Vec::new();
    for role in OffenseRole::ALL {
        if start.len() >= 5 {
            break;
        }
        if let Some(pid) = team.roles.get(role) {
            if !start.contains(pid) {
                start.push(pid.clone());
            }
        }
    }
    if start.len() < 5 {
        for p in &team.roster {
            if start.len() >= 5 {
                break;
            }
            if !start.contains(&p.player_id) {
                start.push(p.player_id.clone());
            }
        }
    }
    start
}

fn team_refs_mut<'a>(side: Side, home: &'a mut Team, away: &'a mut Team) -> (&'a mut Team, &'a mut Team) {
    match side {
        Side::Home => (home, away),
        Side::Away => (away, home),
    }
}

fn team_game_refs_mut<'a>(side: Side, home_game: &'a mut TeamGame, away_game: &'a mut TeamGame) -> (&'a mut TeamGame, &'a mut TeamGame) {
    match side {
        Side::Home => (home_game, away_game),
        Side::Away => (away_game, home_game),
    }
}

fn team_id_of<'a>(side: Side, home: &'a Team, away: &'a Team) -> &'a str {
    match side {
        Side::Home => &home.team_id,
        Side::Away => &away.team_id,
    }
}

/// Spec §4.5 step 8's "apply fatigue losses based on action intensity":
/// a flat per-second decay, amplified when the side's own tactics context
/// flags `transition_emphasis`/`heavy_pnr` (spec §3 SUPPLEMENT's free-form
/// `context` map). No formula survives in the retrieved source; this is
/// synthesized to the shape the spec's wording describes.
fn apply_fatigue(team: &mut Team, game_state: &mut GameState, side: Side, pids: &[String], elapsed_sec: f64) {
    if elapsed_sec <= 0.0 {
        return;
    }
    let mut mult = 1.0;
    if team.tactics.context_bool("transition_emphasis", false) {
        mult += 0.25;
    }
    if team.tactics.context_bool("heavy_pnr", false) {
        mult += 0.15;
    }
    let decay = BASE_FATIGUE_DECAY_PER_SEC * elapsed_sec * mult;
    for pid in pids {
        if let Some(p) = team.find_player_mut(pid) {
            p.energy = (p.energy - decay).max(0.0);
            game_state.set_fatigue(side, pid, p.energy);
        }
    }
}

/// Spec §4.5 step 8's "update per-player minutes for both sides": credits
/// every player who was on court for the possession with its elapsed time.
fn record_minutes(game_state: &mut GameState, side: Side, pids: &[String], elapsed_sec: f64) {
    if elapsed_sec <= 0.0 {
        return;
    }
    for pid in pids {
        game_state.add_minutes(side, pid, elapsed_sec);
    }
}

/// Between-period / pre-OT rest (spec §4.5 steps 6–7): every roster
/// player recovers a fraction `rest_mult` of the gap between his current
/// energy and full (`1.0`), rather than a flat additive bump, so a nearly
/// fresh bench player gains little while a gassed starter gains more.
fn apply_rest(team: &mut Team, game_state: &mut GameState, side: Side, rest_mult: f64) {
    for p in team.roster.iter_mut() {
        p.energy = (p.energy + (1.0 - p.energy) * rest_mult).clamp(0.0, 1.0);
        game_state.set_fatigue(side, &p.player_id, p.energy);
    }
}

/// Spec §4.5 step 10: compare on-court minutes against rotation targets
/// and swap the furthest-over-target (or fouled-out) starter for the
/// furthest-under-target eligible bench player, one swap per call,
/// respecting `rotation.lock_pids`.
fn maybe_substitute(side: Side, team: &Team, game_state: &mut GameState, cfg: &GameConfig) {
    let on_court = game_state.on_court.get(&side).cloned().unwrap_or_default();
    let lock = &team.rotation.lock_pids;
    let target = |pid: &str| -> f64 { *team.rotation.target_sec_by_pid.get(pid).unwrap_or(&0.0) };
    let played = |pid: &str| -> f64 { game_state.minutes_played_sec.get(&side).and_then(|m| m.get(pid)).copied().unwrap_or(0.0) };
    let fouled_out = |pid: &str| game_state.player_foul_count(side, pid) >= cfg.knobs.foul_out_limit;

    let worst_on = on_court
        .iter()
        .filter(|pid| !lock.contains(pid))
        .max_by(|a, b| {
            let sa = if fouled_out(a) { f64::INFINITY } else { played(a) - target(a) };
            let sb = if fouled_out(b) { f64::INFINITY } else { played(b) - target(b) };
            sa.partial_cmp(&sb).unwrap_or(std::cmp::Ordering::Equal)
        })
        .cloned();
    let Some(worst_on) = worst_on else {
        return;
    };
    let overage = if fouled_out(&worst_on) { f64::INFINITY } else { played(&worst_on) - target(&worst_on) };
    if overage <= ROTATION_OVERAGE_THRESHOLD_SEC {
        return;
    }

    let bench = team
        .roster
        .iter()
        .map(|p| p.player_id.clone())
        .filter(|pid| !on_court.contains(pid) && !fouled_out(pid))
        .max_by(|a, b| (target(a) - played(a)).partial_cmp(&(target(b) - played(b))).unwrap_or(std::cmp::Ordering::Equal));
    let Some(bench_in) = bench else {
        return;
    };

    let new_on: Vec<String> = on_court.iter().map(|pid| if *pid == worst_on { bench_in.clone() } else { pid.clone() }).collect();
    game_state.on_court.insert(side, new_on);
}

/// Spec §4.5 step 7's OT jumpball: each side's best rebounding+physical
/// composite among its on-court five feeds a sigmoid (scale
/// `jumpball_sigmoid_scale`) that sets the home side's win probability.
fn jumpball_offense_side(rng: &mut impl Rng, home: &Team, away: &Team, game_state: &GameState, cfg: &GameConfig) -> Side {
    let score = |team: &Team, side: Side| -> f64 {
        game_state
            .on_court_of(side)
            .iter()
            .filter_map(|pid| team.find_player(pid))
            .map(|p| p.ability_raw("REB_OR") + p.ability_raw("REB_DR") + p.ability_raw("PHYSICAL"))
            .fold(0.0, f64::max)
    };
    let home_score = score(home, Side::Home);
    let away_score = score(away, Side::Away);
    let z = (home_score - away_score) / cfg.knobs.jumpball_sigmoid_scale.max(1e-6);
    let p_home = 1.0 / (1.0 + (-z).exp());
    if rng.random_bool(p_home.clamp(0.0, 1.0)) {
        Side::Home
    } else {
        Side::Away
    }
}

/// Single entry point: validates both sides, runs the period loop, and
/// assembles the raw result (spec §4.5).
pub fn simulate_game(rng: &mut ChaCha8Rng, mut home: Team, mut away: Team, era: &str, rules: Rules) -> Result<RawGameResult> {
    let cfg = crate::config::load_era(era)?;
    let mut validation_report: Vec<String> = Vec::new();

    validate_and_sanitize(&mut home, rules.strict, &mut validation_report)?;
    validate_and_sanitize(&mut away, rules.strict, &mut validation_report)?;
    validate_cross_team_identity(&home, &away)?;

    let home_pids: Vec<String> = home.roster.iter().map(|p| p.player_id.clone()).collect();
    let away_pids: Vec<String> = away.roster.iter().map(|p| p.player_id.clone()).collect();

    let start_home = home.enforce_initiator_primary_start(&pick_starting_five(&home));
    let start_away = away.enforce_initiator_primary_start(&pick_starting_five(&away));

    let mut game_state = GameState::new(&home_pids, &away_pids, home.rotation.target_sec_by_pid.clone(), away.rotation.target_sec_by_pid.clone(), start_home, start_away);

    let mut home_game = TeamGame::new(&home_pids);
    let mut away_game = TeamGame::new(&away_pids);
    let mut shot_diet_cache = ShotDietCache::new();
    let mut home_ctx = PossessionContext::new();
    let mut away_ctx = PossessionContext::new();

    for q in 1..=cfg.knobs.regulation_quarters {
        game_state.quarter = q;
        game_state.clock_sec = cfg.knobs.quarter_length_sec;
        game_state.shot_clock_sec = cfg.knobs.shot_clock_sec;
        let mut offense_side = if q % 2 == 1 { Side::Home } else { Side::Away };
        let mut pos_start = PossessionStart::StartQ;

        while game_state.clock_sec > 0.0 {
            let defense_side = offense_side.other();
            let transition_eligible = matches!(pos_start, PossessionStart::AfterTovDead | PossessionStart::AfterDrb);

            let clock_before = game_state.clock_sec;
            let off_on_court_before = game_state.on_court_of(offense_side).to_vec();
            let def_on_court_before = game_state.on_court_of(defense_side).to_vec();

            let (off_team, def_team) = team_refs_mut(offense_side, &mut home, &mut away);
            let (off_game, def_game) = team_game_refs_mut(offense_side, &mut home_game, &mut away_game);
            let ctx = match offense_side {
                Side::Home => &mut home_ctx,
                Side::Away => &mut away_ctx,
            };

            let result: PossessionResult = possession::simulate_possession(
                rng,
                off_team,
                def_team,
                offense_side,
                defense_side,
                &mut game_state,
                off_game,
                def_game,
                &mut shot_diet_cache,
                &rules,
                ctx,
                &cfg,
                pos_start,
                transition_eligible,
            );

            let elapsed = (clock_before - game_state.clock_sec).max(0.0);
            apply_fatigue(off_team, &mut game_state, offense_side, &off_on_court_before, elapsed);
            apply_fatigue(def_team, &mut game_state, defense_side, &def_on_court_before, elapsed);
            record_minutes(&mut game_state, offense_side, &off_on_court_before, elapsed);
            record_minutes(&mut game_state, defense_side, &def_on_court_before, elapsed);

            if result.points_scored > 0 {
                if matches!(pos_start, PossessionStart::AfterTovDead) {
                    off_game.points_off_tov += result.points_scored as u32;
                }
                if result.had_orb {
                    off_game.second_chance_pts += result.points_scored as u32;
                }
                if matches!(pos_start, PossessionStart::AfterTovDead | PossessionStart::AfterDrb) {
                    if let Some(first_fga) = result.first_fga_shotclock_sec {
                        if first_fga >= cfg.knobs.fastbreak_shotclock_threshold_sec {
                            off_game.fastbreak_pts += result.points_scored as u32;
                        }
                    }
                }
            }

            maybe_substitute(offense_side, off_team, &mut game_state, &cfg);
            maybe_substitute(defense_side, def_team, &mut game_state, &cfg);

            pos_start = result.pos_start_next;
            offense_side = defense_side;

            if matches!(result.end_reason, EndReason::PeriodEnd) {
                break;
            }
        }

        if q < cfg.knobs.regulation_quarters {
            apply_rest(&mut home, &mut game_state, Side::Home, cfg.knobs.between_period_rest_mult);
            apply_rest(&mut away, &mut game_state, Side::Away, cfg.knobs.between_period_rest_mult);
        }
    }

    let mut overtime_periods = 0u32;
    while home_game.pts == away_game.pts {
        overtime_periods += 1;
        apply_rest(&mut home, &mut game_state, Side::Home, cfg.knobs.pre_ot_rest_mult);
        apply_rest(&mut away, &mut game_state, Side::Away, cfg.knobs.pre_ot_rest_mult);

        game_state.quarter = cfg.knobs.regulation_quarters + overtime_periods;
        game_state.clock_sec = cfg.knobs.overtime_length_sec;
        game_state.shot_clock_sec = cfg.knobs.shot_clock_sec;
        let mut offense_side = jumpball_offense_side(rng, &home, &away, &game_state, &cfg);
        let mut pos_start = PossessionStart::StartQ;

        while game_state.clock_sec > 0.0 {
            let defense_side = offense_side.other();
            let transition_eligible = matches!(pos_start, PossessionStart::AfterTovDead | PossessionStart::AfterDrb);

            let clock_before = game_state.clock_sec;
            let off_on_court_before = game_state.on_court_of(offense_side).to_vec();
            let def_on_court_before = game_state.on_court_of(defense_side).to_vec();

            let (off_team, def_team) = team_refs_mut(offense_side, &mut home, &mut away);
            let (off_game, def_game) = team_game_refs_mut(offense_side, &mut home_game, &mut away_game);
            let ctx = match offense_side {
                Side::Home => &mut home_ctx,
                Side::Away => &mut away_ctx,
            };

            let result: PossessionResult = possession::simulate_possession(
                rng,
                off_team,
                def_team,
                offense_side,
                defense_side,
                &mut game_state,
                off_game,
                def_game,
                &mut shot_diet_cache,
                &rules,
                ctx,
                &cfg,
                pos_start,
                transition_eligible,
            );

            let elapsed = (clock_before - game_state.clock_sec).max(0.0);
            apply_fatigue(off_team, &mut game_state, offense_side, &off_on_court_before, elapsed);
            apply_fatigue(def_team, &mut game_state, defense_side, &def_on_court_before, elapsed);
            record_minutes(&mut game_state, offense_side, &off_on_court_before, elapsed);
            record_minutes(&mut game_state, defense_side, &def_on_court_before, elapsed);

            if result.points_scored > 0 {
                if matches!(pos_start, PossessionStart::AfterTovDead) {
                    off_game.points_off_tov += result.points_scored as u32;
                }
                if result.had_orb {
                    off_game.second_chance_pts += result.points_scored as u32;
                }
            }

            maybe_substitute(offense_side, off_team, &mut game_state, &cfg);
            maybe_substitute(defense_side, def_team, &mut game_state, &cfg);

            pos_start = result.pos_start_next;
            offense_side = defense_side;

            if matches!(result.end_reason, EndReason::PeriodEnd) {
                break;
            }
        }
    }

    let final_draw: u64 = rng.random();
    let mut hasher = Sha256::new();
    hasher.update(home.team_id.as_bytes());
    hasher.update(away.team_id.as_bytes());
    hasher.update(era.as_bytes());
    hasher.update(game_state.possession.to_le_bytes());
    hasher.update(final_draw.to_le_bytes());
    let replay_token = format!("{:x}", hasher.finalize());

    let mut internal_debug = HashMap::new();
    if !home_ctx.errors.is_empty() {
        internal_debug.insert(home.team_id.clone(), home_ctx.errors.clone());
    }
    if !away_ctx.errors.is_empty() {
        internal_debug.insert(away.team_id.clone(), away_ctx.errors.clone());
    }

    let mut possessions_per_team = HashMap::new();
    possessions_per_team.insert(home.team_id.clone(), home_game.possessions.max(home_game.fga + home_game.tov));
    possessions_per_team.insert(away.team_id.clone(), away_game.possessions.max(away_game.fga + away_game.tov));

    let mut teams = HashMap::new();
    teams.insert(home.team_id.clone(), team_result(&home, &home_game, &game_state, Side::Home));
    teams.insert(away.team_id.clone(), team_result(&away, &away_game, &game_state, Side::Away));

    let game_state_result = RawGameStateResult {
        team_fouls: [(home.team_id.clone(), game_state.team_fouls[&Side::Home]), (away.team_id.clone(), game_state.team_fouls[&Side::Away])].into_iter().collect(),
        player_fouls: [(home.team_id.clone(), game_state.player_fouls[&Side::Home].clone()), (away.team_id.clone(), game_state.player_fouls[&Side::Away].clone())].into_iter().collect(),
        fatigue: [(home.team_id.clone(), game_state.fatigue[&Side::Home].clone()), (away.team_id.clone(), game_state.fatigue[&Side::Away].clone())].into_iter().collect(),
        minutes_played_sec: [(home.team_id.clone(), game_state.minutes_played_sec[&Side::Home].clone()), (away.team_id.clone(), game_state.minutes_played_sec[&Side::Away].clone())].into_iter().collect(),
    };

    log::info!("simulated {} @ {} -> {}-{} ({overtime_periods} OT)", away.team_id, home.team_id, away_game.pts, home_game.pts);

    Ok(RawGameResult {
        meta: RawMeta {
            engine_version: engine_version(),
            era: cfg.era.clone(),
            era_version: cfg.era_version,
            overtime_periods,
            replay_token,
            validation_report,
            internal_debug,
        },
        possessions_per_team,
        teams,
        game_state: game_state_result,
        replay_events: None,
    })
}

fn team_result(team: &Team, game: &TeamGame, game_state: &GameState, side: Side) -> RawTeamResult {
    let totals = RawTotals {
        pts: game.pts,
        fgm: game.fgm,
        fga: game.fga,
        tpm: game.tpm,
        tpa: game.tpa,
        ftm: game.ftm,
        fta: game.fta,
        tov: game.tov,
        orb: game.orb,
        drb: game.drb,
        ast: game.ast,
        possessions: game.possessions.max(game.fga + game.tov),
        pitp: game.pitp,
        fastbreak_pts: game.fastbreak_pts,
        second_chance_pts: game.second_chance_pts,
        points_off_tov: game.points_off_tov,
    };
    let breakdowns = RawBreakdowns {
        possession_end_counts: game.possession_end_counts.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        shot_zones: game.shot_zones.clone(),
        off_action_counts: game.off_action_counts.clone(),
        def_action_counts: game.def_action_counts.clone(),
        outcome_counts: game.outcome_counts.clone(),
        role_fit_grade_counts: game.role_fit_grade_counts.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        role_fit_bad_totals: game.role_fit_bad_totals,
    };
    let player_box = game
        .player_stats
        .iter()
        .map(|(pid, b)| {
            (
                pid.clone(),
                RawPlayerBox {
                    player_id: pid.clone(),
                    team_id: team.team_id.clone(),
                    pts: b.pts,
                    fgm: b.fgm,
                    fga: b.fga,
                    tpm: b.tpm,
                    tpa: b.tpa,
                    ftm: b.ftm,
                    fta: b.fta,
                    tov: b.tov,
                    orb: b.orb,
                    drb: b.drb,
                    ast: b.ast,
                    minutes_played_sec: game_state.minutes_played_sec.get(&side).and_then(|m| m.get(pid)).copied().unwrap_or(0.0),
                },
            )
        })
        .collect();
    let avg_fatigue = {
        let m = game_state.fatigue.get(&side);
        let values: Vec<f64> = m.map(|m| m.values().copied().collect()).unwrap_or_default();
        if values.is_empty() {
            1.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    };
    RawTeamResult { totals, breakdowns, player_box, avg_fatigue }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::RawRatings;
    use crate::team::{DefenseScheme, OffenseScheme, Player, Tactics};
    use rand::SeedableRng;

    fn roster(team_prefix: &str, n: usize) -> Vec<Player> {
        (0..n)
            .map(|i| {
                let mut raw = RawRatings::new();
                for k in crate::rating::RAW_RATING_KEYS {
                    raw.insert((*k).to_string(), 50.0 + (i as f64) * 3.0);
                }
                Player::new(format!("{team_prefix}{i}"), format!("{team_prefix} Player {i}"), "G", &raw)
            })
            .collect()
    }

    fn team(id: &str, prefix: &str) -> Team {
        Team::new(id, roster(prefix, 10), Tactics::new(OffenseScheme::SpreadHeavyPnR, DefenseScheme::Drop))
    }

    #[test]
    fn simulate_game_produces_a_plausible_final_score() {
        let home = team("HOU", "h");
        let away = team("DAL", "d");
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let raw = simulate_game(&mut rng, home, away, "default", Rules::default()).expect("valid game");

        let home_totals = &raw.teams["HOU"].totals;
        let away_totals = &raw.teams["DAL"].totals;
        assert!(home_totals.pts > 40 && home_totals.pts < 200);
        assert!(away_totals.pts > 40 && away_totals.pts < 200);
        assert_ne!(home_totals.pts, away_totals.pts, "overtime must break the tie");
        assert!((home_totals.possessions as i64 - away_totals.possessions as i64).abs() <= 5);

        let home_player_pts: u32 = raw.teams["HOU"].player_box.values().map(|p| p.pts).sum();
        assert_eq!(home_player_pts, home_totals.pts);
    }

    #[test]
    fn simulate_game_rejects_shared_player_ids() {
        let mut home = team("HOU", "h");
        let away = team("DAL", "h");
        home.roster[0].player_id = "dup".to_string();
        let mut away = away;
        away.roster[0].player_id = "dup".to_string();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = simulate_game(&mut rng, home, away, "default", Rules::default()).unwrap_err();
        assert!(matches!(err, EngineError::Contract(_)));
    }

    #[test]
    fn simulate_game_rejects_matching_team_ids() {
        let home = team("HOU", "h");
        let away = team("HOU", "d");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = simulate_game(&mut rng, home, away, "default", Rules::default()).unwrap_err();
        assert!(matches!(err, EngineError::Contract(_)));
    }

    #[test]
    fn deterministic_for_identical_seed() {
        let run = |seed: u64| {
            let home = team("HOU", "h");
            let away = team("DAL", "d");
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let raw = simulate_game(&mut rng, home, away, "default", Rules::default()).unwrap();
            (raw.teams["HOU"].totals.pts, raw.teams["DAL"].totals.pts, raw.meta.replay_token)
        };
        assert_eq!(run(99), run(99));
    }
}
