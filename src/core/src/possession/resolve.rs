//! Per-outcome-category resolution (spec §4.3.3 shot make probability,
//! §4.3.4 pass resolution, §4.3.5 shooting-foul mechanics, §4.3.6 foul
//! bookkeeping/rebounds): once [`super::sample_outcome`] has picked an
//! [`Outcome`], these functions pick the participant(s), roll the dice,
//! and update the box score and clocks.
//!
//! Grounded on `original_source/matchengine_v3/resolve.py`'s outcome
//! dispatch, translated from its string-keyed `if outcome.startswith(...)`
//! ladder into a `match` over the [`Outcome`] sum type.

use super::outcome::{FoulDrawTarget, Outcome, PassKind, ResetKind, ShotKind, TurnoverKind};
use super::{Action, PossessionContext, PossessionResult};
use crate::config::GameConfig;
use crate::participants;
use crate::role_fit::{self, RoleFitAssignment};
use crate::state::{EndReason, GameState, PossessionEndClass, PossessionStart, Side, TeamGame};
use crate::team::{OffenseRole, Player, Team};
use rand::Rng;

/// Charged once per pass resolved into a completion (on top of the
/// originating action's own time cost, already deducted in the main
/// loop), matching spec §4.3.1 step 8's "charge a small additional time
/// cost" for CONTINUE/RESET branches. No table value survives in the
/// retrieved config for either figure; synthesized to be smaller than
/// any base action cost.
const PASS_TIME_COST: f64 = 1.5;
const RESET_TIME_COST: f64 = 2.0;

/// What the possession loop should do with a resolved outcome.
pub enum Resolution {
    Terminal(PossessionResult),
    /// A non-shooting foul drawn outside the bonus: dead ball, no shots,
    /// shot clock floors to the foul-reset value, then an inbound
    /// turnover roll (same as any other dead-ball restart).
    DeadBallNoShots,
    /// A completed pass or a bonus-awarded and-one continuation: same
    /// possession, resample an action next loop iteration.
    Continue,
    /// A RESET_* outcome: same possession, same ball-handler, resample
    /// an action next loop iteration.
    ResetAction,
}

fn logit(p: f64) -> f64 {
    let p = p.clamp(1e-6, 1.0 - 1e-6);
    (p / (1.0 - p)).ln()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn offense_role_of(offense: &Team, pid: &str) -> Option<OffenseRole> {
    offense.roles.iter().find(|(_, v)| v.as_str() == pid).map(|(k, _)| *k)
}

/// Spec §4.4 "logs counts of 'bad outcomes by grade' for calibration":
/// looks up the acting participant's assigned-role fit grade and tallies
/// it, flagging `is_bad` for the negative outcomes (misses, turnovers)
/// the role-fit penalty is meant to amplify. A no-op for a participant
/// with no assigned offensive role (the grade apparatus has nothing to
/// rank them against).
fn record_participant_grade(off_game: &mut TeamGame, offense: &Team, pid: &str, is_bad: bool, cfg: &GameConfig) {
    if let Some(role) = offense_role_of(offense, pid) {
        if let Some(player) = offense.find_player(pid) {
            let (_, grade) = role_fit::participant_role_fit_logit(player, role, &cfg.role_fit);
            off_game.record_role_fit_grade(grade, is_bad);
        }
    }
}

/// Assesses a personal foul on a defender for any dead-ball or shooting
/// foul (spec §4.3.6), fouling out the player (energy to zero, mirrored
/// into `game_state.fatigue` so the shot-diet cache key — which reads
/// `GameState::fatigue_of`, not `Player.energy` directly — sees the
/// foul-out immediately) once `foul_out_limit` is reached.
fn assess_defensive_foul(rng: &mut impl Rng, defense: &mut Team, def_side: Side, def_on_court: &[String], game_state: &mut GameState, cfg: &GameConfig) {
    let fouls_map = game_state.player_fouls.get(&def_side).cloned().unwrap_or_default();
    let Some(pid) = participants::choose_fouler_pid(rng, def_on_court, &fouls_map, cfg.knobs.foul_out_limit) else {
        return;
    };
    let new_count = game_state.add_player_foul(def_side, &pid);
    if new_count >= cfg.knobs.foul_out_limit {
        if let Some(p) = defense.find_player_mut(&pid) {
            p.energy = 0.0;
        }
        game_state.set_fatigue(def_side, &pid, 0.0);
    }
}

#[allow(clippy::too_many_arguments)]
pub fn resolve_outcome(
    rng: &mut impl Rng,
    action: Action,
    outcome: Outcome,
    offense: &Team,
    defense: &mut Team,
    off_side: Side,
    def_side: Side,
    game_state: &mut GameState,
    off_game: &mut TeamGame,
    def_game: &mut TeamGame,
    assignment: &RoleFitAssignment,
    ctx: &mut PossessionContext,
    cfg: &GameConfig,
    off_on_court: &[String],
    def_on_court: &[String],
) -> Resolution {
    match outcome {
        Outcome::Shot(kind) => resolve_shot(rng, action, kind, offense, defense, off_side, def_side, game_state, off_game, def_game, assignment, ctx, cfg, off_on_court, def_on_court),
        Outcome::Pass(kind) => resolve_pass(rng, action, kind, offense, defense, game_state, off_game, assignment, ctx, cfg, off_on_court),
        Outcome::Turnover(kind) => resolve_turnover(rng, kind, offense, off_game, off_on_court, ctx, cfg),
        Outcome::FoulDraw(target) => resolve_foul_draw(rng, action, target, offense, defense, off_side, def_side, game_state, off_game, def_game, assignment, ctx, cfg, off_on_court, def_on_court),
        Outcome::FoulReach => resolve_foul_reach(rng, offense, defense, off_side, def_side, game_state, off_game, def_game, off_on_court, def_on_court, cfg, ctx),
        Outcome::Reset(kind) => resolve_reset(kind, game_state, ctx),
    }
}

fn choose_shooter<'a>(rng: &mut impl Rng, action: Action, kind: ShotKind, offense: &'a Team, on_court: &[String], style: Option<&crate::shot_diet::ShotDietStyle>) -> &'a Player {
    match kind {
        ShotKind::RimDunk => participants::choose_finisher_rim(rng, offense, on_court, true, style, Some(action.config_key())),
        ShotKind::RimLayup | ShotKind::RimContact => participants::choose_finisher_rim(rng, offense, on_court, false, style, Some(action.config_key())),
        ShotKind::MidCs => participants::choose_shooter_for_mid(rng, offense, on_court, style),
        ShotKind::MidPu | ShotKind::TouchFloater => participants::choose_creator_for_pulloff(rng, offense, on_court, "SHOT_MID_PU", style),
        ShotKind::ThreeCs => participants::choose_shooter_for_three(rng, offense, on_court, style),
        ShotKind::ThreeOd => participants::choose_creator_for_pulloff(rng, offense, on_court, "SHOT_3_OD", style),
        ShotKind::Post => participants::choose_post_target(offense, on_court),
    }
}

/// Shot make probability (spec §4.3.3): a base logit shifted by
/// offense/defense derived-ability score, offense-role fit, defensive
/// role-fit `q_delta`, a one-shot pass-carry delta, and a fatigue
/// penalty, then squashed back through a sigmoid. `off_score`/`def_score`
/// read `ability_raw` rather than the fatigue-adjusted `ability`: fatigue
/// already enters as its own additive `fatigue_logit_delta` term, so
/// reading fatigue-adjusted abilities too would double-count it.
#[allow(clippy::too_many_arguments)]
fn shot_make_probability(kind: ShotKind, shooter: &Player, offense: &Team, defense: &Team, def_on_court: &[String], assignment: &RoleFitAssignment, ctx: &mut PossessionContext, cfg: &GameConfig) -> f64 {
    let key = kind.config_key();
    let base_p = cfg.shot_base_for(key);
    let profile = cfg.outcome_profiles.get(key);

    let off_score = profile.map(|p| p.offense.iter().map(|(k, w)| w * shooter.ability_raw(k)).sum::<f64>()).unwrap_or(0.0);
    let def_score_raw = profile
        .map(|p| {
            let defs: Vec<&Player> = def_on_court.iter().filter_map(|pid| defense.find_player(pid)).collect();
            if defs.is_empty() {
                return 0.0;
            }
            defs.iter().map(|d| p.defense.iter().map(|(k, w)| w * d.ability_raw(k)).sum::<f64>()).sum::<f64>() / defs.len() as f64
        })
        .unwrap_or(0.0);
    let def_score = def_score_raw * cfg.knobs.mix_def_score_for_shot;

    let role_logit_delta = offense_role_of(offense, &shooter.player_id).map(|role| role_fit::participant_role_fit_logit(shooter, role, &cfg.role_fit).0).unwrap_or(0.0);
    let q_delta = role_fit::shot_q_delta(assignment, &cfg.role_fit);
    let carry = ctx.carry_logit_delta.take().unwrap_or(0.0);
    let fatigue_logit_delta = -(1.0 - shooter.energy.clamp(0.0, 1.0)) * cfg.knobs.fatigue_logit_max;

    let slope = cfg.knobs.logit_slope.max(1e-6);
    let z = logit(base_p) + (off_score - def_score) / slope + role_logit_delta + q_delta + carry + fatigue_logit_delta;
    sigmoid(z).clamp(cfg.knobs.p_make_min, cfg.knobs.p_make_max)
}

fn ft_make_probability(shooter: &Player, cfg: &GameConfig) -> f64 {
    let ft = shooter.ability("SHOT_FT");
    (0.55 + (ft - 50.0) / 100.0 * 0.5).clamp(cfg.knobs.p_make_min, cfg.knobs.p_make_max)
}

/// Shoots `n` free throws for `shooter`, returning (makes, did the last
/// attempt miss). A missed final attempt is a live-ball rebound; a made
/// (or zero-attempt) final attempt ends the trip dead.
fn shoot_free_throws(rng: &mut impl Rng, shooter: &Player, off_game: &mut TeamGame, n: u32, cfg: &GameConfig) -> (u32, bool) {
    let p = ft_make_probability(shooter, cfg);
    let mut made = 0u32;
    let mut last_missed = false;
    for _ in 0..n {
        off_game.player(&shooter.player_id).fta += 1;
        off_game.fta += 1;
        if rng.random_bool(p) {
            off_game.player(&shooter.player_id).ftm += 1;
            off_game.player(&shooter.player_id).pts += 1;
            off_game.ftm += 1;
            off_game.pts += 1;
            made += 1;
            last_missed = false;
        } else {
            last_missed = true;
        }
    }
    (made, last_missed)
}

#[allow(clippy::too_many_arguments)]
fn resolve_live_rebound(
    rng: &mut impl Rng,
    offense: &Team,
    defense: &mut Team,
    off_side: Side,
    def_side: Side,
    off_game: &mut TeamGame,
    def_game: &mut TeamGame,
    game_state: &mut GameState,
    off_on_court: &[String],
    def_on_court: &[String],
    ctx: &mut PossessionContext,
    class_on_drb: PossessionEndClass,
    shot_clock_reset: f64,
    first_fga_shotclock_sec: Option<f64>,
) -> Resolution {
    let _ = off_side;
    let style = ctx.current_style.clone();
    let off_orb_feat = style.as_ref().map(|s| s.off_features.get("TEAM_ORB_CRASH").copied().unwrap_or(0.5)).unwrap_or(0.5);
    let def_dreb_feat = style.as_ref().map(|s| s.def_features.get("D_DREB").copied().unwrap_or(0.5)).unwrap_or(0.5);
    let p_orb = (0.28 + (off_orb_feat - def_dreb_feat) * 0.35).clamp(0.05, 0.6);

    if rng.random_bool(p_orb) {
        let rebounder = participants::choose_orb_rebounder(rng, offense, off_on_court);
        off_game.player(&rebounder.player_id).orb += 1;
        off_game.orb += 1;
        game_state.shot_clock_sec = shot_clock_reset;
        ctx.had_orb = true;
        ctx.next_action_boost = Some(vec![Action::Kickout, Action::ExtraPass, Action::Drive]);
        return Resolution::Continue;
    }

    let rebounder = participants::choose_drb_rebounder(rng, defense, def_on_court);
    def_game.player(&rebounder.player_id).drb += 1;
    def_game.drb += 1;
    off_game.record_end(class_on_drb);
    let _ = def_side;
    Resolution::Terminal(PossessionResult { end_reason: EndReason::Drb, pos_start_next: PossessionStart::AfterDrb, points_scored: 0, had_orb: ctx.had_orb, first_fga_shotclock_sec })
}

#[allow(clippy::too_many_arguments)]
fn resolve_free_throw_trip(
    rng: &mut impl Rng,
    shooter: &Player,
    offense: &Team,
    defense: &mut Team,
    off_side: Side,
    def_side: Side,
    game_state: &mut GameState,
    off_game: &mut TeamGame,
    def_game: &mut TeamGame,
    off_on_court: &[String],
    def_on_court: &[String],
    n_fts: u32,
    cfg: &GameConfig,
    ctx: &mut PossessionContext,
) -> Resolution {
    let (made, last_missed) = shoot_free_throws(rng, shooter, off_game, n_fts, cfg);
    if !last_missed {
        off_game.record_end(PossessionEndClass::FtTrip);
        return Resolution::Terminal(PossessionResult { end_reason: EndReason::Score, pos_start_next: PossessionStart::AfterScore, points_scored: made as i32, had_orb: ctx.had_orb, first_fga_shotclock_sec: None });
    }
    resolve_live_rebound(rng, offense, defense, off_side, def_side, off_game, def_game, game_state, off_on_court, def_on_court, ctx, PossessionEndClass::FtTrip, cfg.knobs.shot_clock_reset_foul_sec, None)
}

#[allow(clippy::too_many_arguments)]
fn resolve_shot(
    rng: &mut impl Rng,
    action: Action,
    kind: ShotKind,
    offense: &Team,
    defense: &mut Team,
    off_side: Side,
    def_side: Side,
    game_state: &mut GameState,
    off_game: &mut TeamGame,
    def_game: &mut TeamGame,
    assignment: &RoleFitAssignment,
    ctx: &mut PossessionContext,
    cfg: &GameConfig,
    off_on_court: &[String],
    def_on_court: &[String],
) -> Resolution {
    let style = ctx.current_style.clone();
    let shooter = choose_shooter(rng, action, kind, offense, off_on_court, style.as_deref());
    let shooter_pid = shooter.player_id.clone();
    let p_make = shot_make_probability(kind, shooter, offense, defense, def_on_court, assignment, ctx, cfg);
    let made = rng.random_bool(p_make);
    let first_fga = game_state.shot_clock_sec;

    off_game.player(&shooter_pid).fga += 1;
    if kind.is_three() {
        off_game.player(&shooter_pid).tpa += 1;
    }
    off_game.fga += 1;
    if kind.is_three() {
        off_game.tpa += 1;
    }
    *off_game.shot_zones.entry(kind.zone_label().to_string()).or_insert(0) += 1;
    if kind.is_three() {
        let corner_p = cfg.corner3_prob_by_action_base.get(action.config_key()).copied().unwrap_or(0.2);
        let label = if rng.random_bool(corner_p) { "THREE_CORNER" } else { "THREE_AB" };
        *off_game.shot_zones.entry(label.to_string()).or_insert(0) += 1;
    }

    if made {
        let pts = kind.points();
        {
            let box_ = off_game.player(&shooter_pid);
            box_.pts += pts;
            box_.fgm += 1;
            if kind.is_three() {
                box_.tpm += 1;
            }
        }
        off_game.pts += pts;
        off_game.fgm += 1;
        if kind.is_three() {
            off_game.tpm += 1;
        }
        if kind.is_paint() {
            off_game.pitp += pts;
        }
        if ctx.last_was_pass {
            if let Some(assister) = participants::choose_assister_deterministic(offense, off_on_court, &shooter_pid) {
                let assister_pid = assister.player_id.clone();
                off_game.player(&assister_pid).ast += 1;
                off_game.ast += 1;
            }
        }
        off_game.record_end(PossessionEndClass::Fga);
        ctx.last_was_pass = false;
        record_participant_grade(off_game, offense, &shooter_pid, false, cfg);
        return Resolution::Terminal(PossessionResult { end_reason: EndReason::Score, pos_start_next: PossessionStart::AfterScore, points_scored: pts as i32, had_orb: ctx.had_orb, first_fga_shotclock_sec: Some(first_fga) });
    }

    ctx.last_was_pass = false;
    record_participant_grade(off_game, offense, &shooter_pid, true, cfg);
    resolve_live_rebound(rng, offense, defense, off_side, def_side, off_game, def_game, game_state, off_on_court, def_on_court, ctx, PossessionEndClass::Fga, cfg.knobs.shot_clock_reset_orb_sec, Some(first_fga))
}

#[allow(clippy::too_many_arguments)]
fn resolve_foul_draw(
    rng: &mut impl Rng,
    action: Action,
    target: FoulDrawTarget,
    offense: &Team,
    defense: &mut Team,
    off_side: Side,
    def_side: Side,
    game_state: &mut GameState,
    off_game: &mut TeamGame,
    def_game: &mut TeamGame,
    assignment: &RoleFitAssignment,
    ctx: &mut PossessionContext,
    cfg: &GameConfig,
    off_on_court: &[String],
    def_on_court: &[String],
) -> Resolution {
    let style = ctx.current_style.clone();
    let (shooter_pid, kind): (String, ShotKind) = match target {
        FoulDrawTarget::Rim => {
            let is_contact = rng.random_bool(cfg.knobs.foul_draw_rim_to_contact_pct);
            let dunk_bias = !is_contact;
            let p = participants::choose_finisher_rim(rng, offense, off_on_court, dunk_bias, style.as_deref(), Some(action.config_key()));
            (p.player_id.clone(), ShotKind::RimContact)
        }
        FoulDrawTarget::Post => {
            if rng.random_bool(cfg.knobs.foul_draw_post_to_shot_post_pct) {
                let p = participants::choose_post_target(offense, off_on_court);
                (p.player_id.clone(), ShotKind::Post)
            } else if rng.random_bool(cfg.knobs.foul_draw_jumper_to_3_pct) {
                let p = participants::choose_creator_for_pulloff(rng, offense, off_on_court, "SHOT_3_OD", style.as_deref());
                (p.player_id.clone(), ShotKind::ThreeOd)
            } else {
                let p = participants::choose_creator_for_pulloff(rng, offense, off_on_court, "SHOT_MID_PU", style.as_deref());
                (p.player_id.clone(), ShotKind::MidPu)
            }
        }
    };
    assess_defensive_foul(rng, defense, def_side, def_on_court, game_state, cfg);
    let shooter = offense.find_player(&shooter_pid).expect("chooser returns an on-court player");

    let bucket_roll: f64 = rng.random_range(0.0..1.0);
    let contact_mult = if bucket_roll < 0.3 {
        cfg.knobs.contact_penalty_hard
    } else if bucket_roll < 0.8 {
        cfg.knobs.contact_penalty_normal
    } else {
        cfg.knobs.contact_penalty_soft
    };
    let p_computed = shot_make_probability(kind, shooter, offense, defense, def_on_court, assignment, ctx, cfg);
    let p_make = (p_computed * contact_mult).clamp(cfg.knobs.p_make_min, cfg.knobs.p_make_max);
    let made = rng.random_bool(p_make);

    off_game.player(&shooter_pid).fga += 1;
    if kind.is_three() {
        off_game.player(&shooter_pid).tpa += 1;
    }
    off_game.fga += 1;
    if kind.is_three() {
        off_game.tpa += 1;
    }

    let mut fg_pts = 0i32;
    if made {
        let pts = kind.points();
        {
            let box_ = off_game.player(&shooter_pid);
            box_.pts += pts;
            box_.fgm += 1;
            if kind.is_three() {
                box_.tpm += 1;
            }
        }
        off_game.pts += pts;
        off_game.fgm += 1;
        if kind.is_three() {
            off_game.tpm += 1;
        }
        if kind.is_paint() {
            off_game.pitp += pts;
        }
        fg_pts = pts as i32;
    }
    record_participant_grade(off_game, offense, &shooter_pid, !made, cfg);

    let n_fts = if made { 1 } else if kind.is_three() { 3 } else { 2 };
    let res = resolve_free_throw_trip(rng, shooter, offense, defense, off_side, def_side, game_state, off_game, def_game, off_on_court, def_on_court, n_fts, cfg, ctx);
    match res {
        Resolution::Terminal(mut result) => {
            result.points_scored += fg_pts;
            Resolution::Terminal(result)
        }
        other => other,
    }
}

fn resolve_turnover(rng: &mut impl Rng, kind: TurnoverKind, offense: &Team, off_game: &mut TeamGame, off_on_court: &[String], ctx: &mut PossessionContext, cfg: &GameConfig) -> Resolution {
    let culprit = match kind {
        TurnoverKind::Charge => participants::choose_creator_for_pulloff(rng, offense, off_on_court, "SHOT_MID_PU", ctx.current_style.as_deref()),
        TurnoverKind::HandleLoss => participants::choose_default_actor(offense, off_on_court),
    };
    let pid = culprit.player_id.clone();
    off_game.player(&pid).tov += 1;
    off_game.tov += 1;
    off_game.record_end(PossessionEndClass::Tov);
    ctx.last_was_pass = false;
    record_participant_grade(off_game, offense, &pid, true, cfg);
    Resolution::Terminal(PossessionResult { end_reason: EndReason::Turnover, pos_start_next: PossessionStart::AfterTovDead, points_scored: 0, had_orb: ctx.had_orb, first_fga_shotclock_sec: None })
}

#[allow(clippy::too_many_arguments)]
fn resolve_pass(rng: &mut impl Rng, action: Action, kind: PassKind, offense: &Team, defense: &Team, game_state: &mut GameState, off_game: &mut TeamGame, assignment: &RoleFitAssignment, ctx: &mut PossessionContext, cfg: &GameConfig, off_on_court: &[String]) -> Resolution {
    let outcome_key = Outcome::Pass(kind).config_key();
    let q_score = cfg.pass_profiles.get(outcome_key).map(|p| role_fit::pass_q_score(p, defense, assignment, &cfg.role_fit)).unwrap_or(0.0);
    let k = &cfg.knobs;
    let p_to = sigmoid(k.pass_to_turnover_slope * (k.pass_to_turnover_midpoint - q_score));
    let p_reset = sigmoid(k.pass_reset_slope * (k.pass_reset_midpoint - q_score));

    let passer = participants::choose_passer(rng, offense, off_on_court, action.config_key(), outcome_key, ctx.current_style.as_deref());
    let passer_pid = passer.player_id.clone();

    game_state.clock_sec = (game_state.clock_sec - PASS_TIME_COST).max(0.0);
    game_state.shot_clock_sec = (game_state.shot_clock_sec - PASS_TIME_COST).max(0.0);
    if game_state.shot_clock_sec <= 0.0 {
        off_game.player(&passer_pid).tov += 1;
        off_game.tov += 1;
        off_game.record_end(PossessionEndClass::Tov);
        ctx.last_was_pass = false;
        return Resolution::Terminal(PossessionResult { end_reason: EndReason::ShotClock, pos_start_next: PossessionStart::AfterTovDead, points_scored: 0, had_orb: ctx.had_orb, first_fga_shotclock_sec: None });
    }

    let r: f64 = rng.random_range(0.0..1.0);
    if r < p_to {
        off_game.player(&passer_pid).tov += 1;
        off_game.tov += 1;
        off_game.record_end(PossessionEndClass::Tov);
        ctx.last_was_pass = false;
        record_participant_grade(off_game, offense, &passer_pid, true, cfg);
        return Resolution::Terminal(PossessionResult { end_reason: EndReason::Turnover, pos_start_next: PossessionStart::AfterTovDead, points_scored: 0, had_orb: ctx.had_orb, first_fga_shotclock_sec: None });
    }
    if r < p_to + p_reset {
        ctx.last_was_pass = false;
        return Resolution::ResetAction;
    }

    // Completion: classify the carry bucket off a 3-way softmax over
    // `q_score` (no formula survives for this split; weighting the
    // extremes by `exp(±1.5 * q_score)` against a flat neutral bucket
    // keeps a strong pass quality from swinging the next shot wildly).
    let neg_w = (-1.5 * q_score).exp();
    let pos_w = (1.5 * q_score).exp();
    let neu_w = 1.0_f64;
    let total = neg_w + pos_w + neu_w;
    let roll = rng.random_range(0.0..total);
    ctx.carry_logit_delta = Some(if roll < neg_w { -0.15 } else if roll < neg_w + neu_w { 0.0 } else { 0.15 });

    ctx.pass_chain += 1;
    ctx.last_was_pass = true;
    if ctx.pass_chain >= 3 {
        ctx.force_next_action = Some(Action::SpotUp);
    } else {
        ctx.next_action_boost = Some(match kind {
            PassKind::Kickout | PassKind::Extra | PassKind::Skip => vec![Action::SpotUp, Action::ExtraPass],
            PassKind::Shortroll => vec![Action::Drive, Action::Kickout],
        });
    }
    Resolution::Continue
}

#[allow(clippy::too_many_arguments)]
fn resolve_foul_reach(
    rng: &mut impl Rng,
    offense: &Team,
    defense: &mut Team,
    off_side: Side,
    def_side: Side,
    game_state: &mut GameState,
    off_game: &mut TeamGame,
    def_game: &mut TeamGame,
    off_on_court: &[String],
    def_on_court: &[String],
    cfg: &GameConfig,
    ctx: &mut PossessionContext,
) -> Resolution {
    let in_bonus = game_state.team_fouls.get(&def_side).copied().unwrap_or(0) >= cfg.knobs.bonus_team_fouls;
    assess_defensive_foul(rng, defense, def_side, def_on_court, game_state, cfg);

    if !(in_bonus || cfg.knobs.bonus_reach_trap_awards_fts) {
        return Resolution::DeadBallNoShots;
    }

    let mut pool: Vec<&Player> = off_on_court.iter().filter_map(|pid| offense.find_player(pid)).collect();
    pool.sort_by(|a, b| b.ability("SHOT_FT").partial_cmp(&a.ability("SHOT_FT")).unwrap_or(std::cmp::Ordering::Equal));
    let Some(shooter) = pool.into_iter().next().cloned() else {
        return Resolution::DeadBallNoShots;
    };
    ctx.last_was_pass = false;
    resolve_free_throw_trip(rng, &shooter, offense, defense, off_side, def_side, game_state, off_game, def_game, off_on_court, def_on_court, 2, cfg, ctx)
}

fn resolve_reset(kind: ResetKind, game_state: &mut GameState, ctx: &mut PossessionContext) -> Resolution {
    let _ = kind;
    game_state.clock_sec = (game_state.clock_sec - RESET_TIME_COST).max(0.0);
    game_state.shot_clock_sec = (game_state.shot_clock_sec - RESET_TIME_COST).max(0.0);
    ctx.last_was_pass = false;
    Resolution::ResetAction
}
