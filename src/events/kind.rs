//! Event discriminators and the oracle's answer type.

use serde::{Deserialize, Serialize};

use crate::core::PlayerSide;

/// Game-effect discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum EffectType {
    AdvancePhase,
    RevealCards,
    StartEngagement,
    DetermineRetreatEligibility,
    RotateFlankDefender,
    ResolveRangedAttack,
    ResolveMelee,
    RoutPenalty,
    CompleteRout,
    CompleteRetreat,
    CompleteReverse,
    DiscardPlayedCards,
    ResolveRally,
}

impl EffectType {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EffectType::AdvancePhase => "advancePhase",
            EffectType::RevealCards => "revealCards",
            EffectType::StartEngagement => "startEngagement",
            EffectType::DetermineRetreatEligibility => "determineRetreatEligibility",
            EffectType::RotateFlankDefender => "rotateFlankDefender",
            EffectType::ResolveRangedAttack => "resolveRangedAttack",
            EffectType::ResolveMelee => "resolveMelee",
            EffectType::RoutPenalty => "routPenalty",
            EffectType::CompleteRout => "completeRout",
            EffectType::CompleteRetreat => "completeRetreat",
            EffectType::CompleteReverse => "completeReverse",
            EffectType::DiscardPlayedCards => "discardPlayedCards",
            EffectType::ResolveRally => "resolveRally",
        }
    }
}

impl std::fmt::Display for EffectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Player-choice discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum ChoiceType {
    ChooseCard,
    MoveCommander,
    IssueCommand,
    CommitCard,
    ChooseToRetreat,
    ChooseRetreatPosition,
    ChooseRoutDiscards,
    ChooseMelee,
    ChooseRally,
}

impl ChoiceType {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ChoiceType::ChooseCard => "chooseCard",
            ChoiceType::MoveCommander => "moveCommander",
            ChoiceType::IssueCommand => "issueCommand",
            ChoiceType::CommitCard => "commitCard",
            ChoiceType::ChooseToRetreat => "chooseToRetreat",
            ChoiceType::ChooseRetreatPosition => "chooseRetreatPosition",
            ChoiceType::ChooseRoutDiscards => "chooseRoutDiscards",
            ChoiceType::ChooseMelee => "chooseMelee",
            ChoiceType::ChooseRally => "chooseRally",
        }
    }
}

impl std::fmt::Display for ChoiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single event a state is waiting for.
///
/// Also describes an actual event (see [`Event::kind`](super::Event::kind)),
/// so expected and supplied events compare directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ExpectedEventInfo {
    /// A side must make a choice of this type.
    PlayerChoice {
        /// Who chooses.
        side: PlayerSide,
        /// What they choose.
        choice_type: ChoiceType,
    },
    /// The system must generate an effect of this type.
    GameEffect {
        /// Which effect.
        effect_type: EffectType,
    },
}

impl ExpectedEventInfo {
    /// Shorthand for a player choice.
    #[must_use]
    pub const fn choice(side: PlayerSide, choice_type: ChoiceType) -> Self {
        ExpectedEventInfo::PlayerChoice { side, choice_type }
    }

    /// Shorthand for a game effect.
    #[must_use]
    pub const fn effect(effect_type: EffectType) -> Self {
        ExpectedEventInfo::GameEffect { effect_type }
    }

    /// The side to act, for player choices.
    #[must_use]
    pub fn side(&self) -> Option<PlayerSide> {
        match self {
            ExpectedEventInfo::PlayerChoice { side, .. } => Some(*side),
            ExpectedEventInfo::GameEffect { .. } => None,
        }
    }
}

impl std::fmt::Display for ExpectedEventInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectedEventInfo::PlayerChoice { side, choice_type } => {
                write!(f, "{choice_type} by {side}")
            }
            ExpectedEventInfo::GameEffect { effect_type } => write!(f, "{effect_type}"),
        }
    }
}
