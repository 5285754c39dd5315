//! The 12 canonical offensive roles (spec §4.2) and the derived-ability
//! composite used to rank roster players against each one.

use super::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffenseRole {
    InitiatorPrimary,
    InitiatorSecondary,
    TransitionHandler,
    ShotCreator,
    RimAttacker,
    SpacerCatchShoot,
    SpacerMovement,
    ConnectorPlaymaker,
    RollerFinisher,
    ShortRollPlaymaker,
    PopSpacerBig,
    PostHub,
}

impl OffenseRole {
    pub const ALL: &'static [OffenseRole] = &[
        OffenseRole::InitiatorPrimary,
        OffenseRole::InitiatorSecondary,
        OffenseRole::TransitionHandler,
        OffenseRole::ShotCreator,
        OffenseRole::RimAttacker,
        OffenseRole::SpacerCatchShoot,
        OffenseRole::SpacerMovement,
        OffenseRole::ConnectorPlaymaker,
        OffenseRole::RollerFinisher,
        OffenseRole::ShortRollPlaymaker,
        OffenseRole::PopSpacerBig,
        OffenseRole::PostHub,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OffenseRole::InitiatorPrimary => "Initiator_Primary",
            OffenseRole::InitiatorSecondary => "Initiator_Secondary",
            OffenseRole::TransitionHandler => "Transition_Handler",
            OffenseRole::ShotCreator => "Shot_Creator",
            OffenseRole::RimAttacker => "Rim_Attacker",
            OffenseRole::SpacerCatchShoot => "Spacer_CatchShoot",
            OffenseRole::SpacerMovement => "Spacer_Movement",
            OffenseRole::ConnectorPlaymaker => "Connector_Playmaker",
            OffenseRole::RollerFinisher => "Roller_Finisher",
            OffenseRole::ShortRollPlaymaker => "ShortRoll_Playmaker",
            OffenseRole::PopSpacerBig => "Pop_Spacer_Big",
            OffenseRole::PostHub => "Post_Hub",
        }
    }

    /// Ranking score used to assign a role when the caller hasn't pinned
    /// one explicitly — a simple weighted sum over the relevant derived
    /// abilities for that role (spec §4.2: "ranks roster players on a
    /// role-specific composite of derived abilities").
    pub fn composite(&self, p: &Player) -> f64 {
        let a = |k: &str| p.ability_raw(k);
        match self {
            OffenseRole::InitiatorPrimary => 0.4 * a("DRIVE_CREATE") + 0.35 * a("PASS_CREATE") + 0.25 * a("HANDLE_SAFE"),
            OffenseRole::InitiatorSecondary => 0.35 * a("PASS_CREATE") + 0.35 * a("DRIVE_CREATE") + 0.30 * a("PNR_READ"),
            OffenseRole::TransitionHandler => 0.4 * a("FIRST_STEP") + 0.3 * a("HANDLE_SAFE") + 0.3 * a("DRIVE_CREATE"),
            OffenseRole::ShotCreator => 0.4 * a("SHOT_MID_PU") + 0.35 * a("SHOT_3_OD") + 0.25 * a("DRIVE_CREATE"),
            OffenseRole::RimAttacker => 0.4 * a("FIN_RIM") + 0.35 * a("FIN_CONTACT") + 0.25 * a("FIN_DUNK"),
            OffenseRole::SpacerCatchShoot => 0.7 * a("SHOT_3_CS") + 0.3 * a("SHOT_TOUCH"),
            OffenseRole::SpacerMovement => 0.5 * a("SHOT_3_CS") + 0.3 * a("SHOT_3_OD") + 0.2 * a("FIRST_STEP"),
            OffenseRole::ConnectorPlaymaker => 0.5 * a("PASS_SAFE") + 0.3 * a("PNR_READ") + 0.2 * a("HANDLE_SAFE"),
            OffenseRole::RollerFinisher => 0.5 * a("FIN_DUNK") + 0.3 * a("FIN_CONTACT") + 0.2 * a("SEAL_POWER"),
            OffenseRole::ShortRollPlaymaker => 0.5 * a("SHORTROLL_PLAY") + 0.3 * a("PASS_SAFE") + 0.2 * a("FIN_RIM"),
            OffenseRole::PopSpacerBig => 0.5 * a("SHOT_3_CS") + 0.3 * a("SHOT_MID_CS") + 0.2 * a("POST_CONTROL"),
            OffenseRole::PostHub => 0.45 * a("POST_SCORE") + 0.3 * a("POST_CONTROL") + 0.25 * a("SEAL_POWER"),
        }
    }
}

impl std::fmt::Display for OffenseRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
