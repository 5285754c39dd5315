//! The ten base offensive actions and the tagged `Outcome` sum type
//! (spec §9 redesign flag: "model outcomes as a sum type ... instead of
//! parsing [`SHOT_*`, `PASS_*`, ...] string prefixes").
//!
//! Era config tables (`GameConfig::action_outcome_priors`, `shot_base`,
//! `pass_base_success`, `outcome_profiles`) are still keyed by the
//! original string codes (`original_source/matchengine_v3/game_config.py`
//! keeps them that way on disk), so each variant below knows its own
//! config key via [`Outcome::config_key`]/[`Outcome::parse`] — the
//! prefix-parsing happens exactly once, at the table lookup boundary,
//! never inside the resolver.

/// One of the ten base offensive actions (spec glossary "Action").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    PnR,
    Drive,
    Dho,
    SpotUp,
    Kickout,
    ExtraPass,
    Cut,
    PostUp,
    HornsSet,
    TransitionEarly,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::PnR,
        Action::Drive,
        Action::Dho,
        Action::SpotUp,
        Action::Kickout,
        Action::ExtraPass,
        Action::Cut,
        Action::PostUp,
        Action::HornsSet,
        Action::TransitionEarly,
    ];

    /// Config-table key, matching `era_default.json`'s `action_outcome_priors` keys.
    pub fn config_key(self) -> &'static str {
        match self {
            Action::PnR => "PnR",
            Action::Drive => "Drive",
            Action::Dho => "DHO",
            Action::SpotUp => "SpotUp",
            Action::Kickout => "Kickout",
            Action::ExtraPass => "ExtraPass",
            Action::Cut => "Cut",
            Action::PostUp => "PostUp",
            Action::HornsSet => "HornsSet",
            Action::TransitionEarly => "TransitionEarly",
        }
    }

    pub fn parse(key: &str) -> Option<Action> {
        Action::ALL.into_iter().find(|a| a.config_key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShotKind {
    RimLayup,
    RimDunk,
    RimContact,
    MidCs,
    MidPu,
    ThreeCs,
    ThreeOd,
    Post,
    TouchFloater,
}

impl ShotKind {
    pub fn config_key(self) -> &'static str {
        match self {
            ShotKind::RimLayup => "SHOT_RIM_LAYUP",
            ShotKind::RimDunk => "SHOT_RIM_DUNK",
            ShotKind::RimContact => "SHOT_RIM_CONTACT",
            ShotKind::MidCs => "SHOT_MID_CS",
            ShotKind::MidPu => "SHOT_MID_PU",
            ShotKind::ThreeCs => "SHOT_3_CS",
            ShotKind::ThreeOd => "SHOT_3_OD",
            ShotKind::Post => "SHOT_POST",
            ShotKind::TouchFloater => "SHOT_TOUCH_FLOATER",
        }
    }

    pub fn is_three(self) -> bool {
        matches!(self, ShotKind::ThreeCs | ShotKind::ThreeOd)
    }

    /// Paint attempts for `PITP` (points in the paint); a touch floater is
    /// released just outside the restricted area so it's excluded.
    pub fn is_paint(self) -> bool {
        matches!(self, ShotKind::RimLayup | ShotKind::RimDunk | ShotKind::RimContact | ShotKind::Post)
    }

    pub fn points(self) -> u32 {
        if self.is_three() {
            3
        } else {
            2
        }
    }

    pub fn zone_label(self) -> &'static str {
        match self {
            ShotKind::RimLayup | ShotKind::RimDunk | ShotKind::RimContact => "RIM",
            ShotKind::MidCs | ShotKind::MidPu => "MID",
            ShotKind::ThreeCs | ShotKind::ThreeOd => "THREE",
            ShotKind::Post => "POST",
            ShotKind::TouchFloater => "FLOATER",
        }
    }

    fn parse(key: &str) -> Option<ShotKind> {
        Some(match key {
            "SHOT_RIM_LAYUP" => ShotKind::RimLayup,
            "SHOT_RIM_DUNK" => ShotKind::RimDunk,
            "SHOT_RIM_CONTACT" => ShotKind::RimContact,
            "SHOT_MID_CS" => ShotKind::MidCs,
            "SHOT_MID_PU" => ShotKind::MidPu,
            "SHOT_3_CS" => ShotKind::ThreeCs,
            "SHOT_3_OD" => ShotKind::ThreeOd,
            "SHOT_POST" => ShotKind::Post,
            "SHOT_TOUCH_FLOATER" => ShotKind::TouchFloater,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    Kickout,
    Shortroll,
    Extra,
    Skip,
}

impl PassKind {
    pub fn config_key(self) -> &'static str {
        match self {
            PassKind::Kickout => "PASS_KICKOUT",
            PassKind::Shortroll => "PASS_SHORTROLL",
            PassKind::Extra => "PASS_EXTRA",
            PassKind::Skip => "PASS_SKIP",
        }
    }

    fn parse(key: &str) -> Option<PassKind> {
        Some(match key {
            "PASS_KICKOUT" => PassKind::Kickout,
            "PASS_SHORTROLL" => PassKind::Shortroll,
            "PASS_EXTRA" => PassKind::Extra,
            "PASS_SKIP" => PassKind::Skip,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnoverKind {
    HandleLoss,
    Charge,
}

impl TurnoverKind {
    pub fn config_key(self) -> &'static str {
        match self {
            TurnoverKind::HandleLoss => "TO_HANDLE_LOSS",
            TurnoverKind::Charge => "TO_CHARGE",
        }
    }

    fn parse(key: &str) -> Option<TurnoverKind> {
        Some(match key {
            "TO_HANDLE_LOSS" => TurnoverKind::HandleLoss,
            "TO_CHARGE" => TurnoverKind::Charge,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoulDrawTarget {
    Rim,
    Post,
}

impl FoulDrawTarget {
    pub fn config_key(self) -> &'static str {
        match self {
            FoulDrawTarget::Rim => "FOUL_DRAW_RIM",
            FoulDrawTarget::Post => "FOUL_DRAW_POST",
        }
    }

    fn parse(key: &str) -> Option<FoulDrawTarget> {
        Some(match key {
            "FOUL_DRAW_RIM" => FoulDrawTarget::Rim,
            "FOUL_DRAW_POST" => FoulDrawTarget::Post,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetKind {
    Rescreen,
    Hub,
    RedoDho,
    PostOut,
}

impl ResetKind {
    pub fn config_key(self) -> &'static str {
        match self {
            ResetKind::Rescreen => "RESET_RESREEN",
            ResetKind::Hub => "RESET_HUB",
            ResetKind::RedoDho => "RESET_REDO_DHO",
            ResetKind::PostOut => "RESET_POST_OUT",
        }
    }

    fn parse(key: &str) -> Option<ResetKind> {
        Some(match key {
            "RESET_RESREEN" => ResetKind::Rescreen,
            "RESET_HUB" => ResetKind::Hub,
            "RESET_REDO_DHO" => ResetKind::RedoDho,
            "RESET_POST_OUT" => ResetKind::PostOut,
            _ => return None,
        })
    }
}

/// Terminal event of a single step within a possession (spec glossary
/// "Outcome"), as a tagged sum type rather than a bare string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Shot(ShotKind),
    Pass(PassKind),
    Turnover(TurnoverKind),
    FoulDraw(FoulDrawTarget),
    FoulReach,
    Reset(ResetKind),
}

impl Outcome {
    pub fn config_key(self) -> &'static str {
        match self {
            Outcome::Shot(k) => k.config_key(),
            Outcome::Pass(k) => k.config_key(),
            Outcome::Turnover(k) => k.config_key(),
            Outcome::FoulDraw(k) => k.config_key(),
            Outcome::FoulReach => "FOUL_REACH_TRAP",
            Outcome::Reset(k) => k.config_key(),
        }
    }

    pub fn parse(key: &str) -> Option<Outcome> {
        if key == "FOUL_REACH_TRAP" {
            return Some(Outcome::FoulReach);
        }
        if let Some(k) = ShotKind::parse(key) {
            return Some(Outcome::Shot(k));
        }
        if let Some(k) = PassKind::parse(key) {
            return Some(Outcome::Pass(k));
        }
        if let Some(k) = TurnoverKind::parse(key) {
            return Some(Outcome::Turnover(k));
        }
        if let Some(k) = FoulDrawTarget::parse(key) {
            return Some(Outcome::FoulDraw(k));
        }
        ResetKind::parse(key).map(Outcome::Reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_outcome_prior_key_in_the_era_config_parses() {
        let cfg = crate::config::load_era("default").unwrap();
        for (action, outcomes) in &cfg.action_outcome_priors {
            assert!(Action::parse(action).is_some(), "unparseable action {action}");
            for outcome in outcomes.keys() {
                assert!(Outcome::parse(outcome).is_some(), "unparseable outcome {outcome} under {action}");
            }
        }
    }

    #[test]
    fn config_key_roundtrips_through_parse() {
        for action in Action::ALL {
            assert_eq!(Action::parse(action.config_key()), Some(action));
        }
    }
}
