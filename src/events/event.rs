//! Event records.
//!
//! Every event is a self-contained, serializable record. Game effects carry
//! everything the applier needs, including the outcome of any random draw,
//! so replaying a log never resamples anything.
//!
//! ## Wire format
//!
//! Events serialize as flat JSON objects with a `kind` discriminator and an
//! `effectType` or `choiceType` discriminator:
//!
//! ```json
//! {"kind": "gameEffect", "effectType": "routPenalty", "numberToDiscard": 3}
//! {"kind": "playerChoice", "side": "black", "choiceType": "chooseCard", "card": 7}
//! ```

use im::OrdSet;
use serde::{Deserialize, Serialize};

use super::kind::{ChoiceType, EffectType, ExpectedEventInfo};
use crate::board::{Coordinate, UnitFacing, UnitWithPlacement};
use crate::cards::CardId;
use crate::core::PlayerSide;
use crate::state::{AttackResult, EngagementType, UnitCommand};
use crate::units::UnitInstance;

/// A deterministic, system-computed event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effectType", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEffect {
    /// Close the completed phase and open the next one.
    AdvancePhase,
    /// Reveal both chosen cards; the higher initiative takes the initiative.
    RevealCards {
        /// Side holding the initiative after the reveal.
        initiative: PlayerSide,
    },
    /// A mover enters a space held by an enemy.
    StartEngagement {
        /// Front, flank or rear.
        engagement_type: EngagementType,
        /// The unit holding the space.
        defending_unit: UnitWithPlacement,
    },
    /// Decide whether a front-engaged defender may retreat.
    DetermineRetreatEligibility {
        /// The defender may retreat.
        eligible: bool,
        /// Where it could go.
        legal_retreat_options: OrdSet<Coordinate>,
    },
    /// A flank-engaged defender turns to meet the engager.
    RotateFlankDefender {
        /// The defender's facing afterwards.
        new_facing: UnitFacing,
    },
    /// Computed ranged attack.
    ResolveRangedAttack {
        /// The attack suffered by the target.
        result: AttackResult,
    },
    /// Computed melee: the attack suffered by each side's unit.
    ResolveMelee {
        /// Attack suffered by Black's unit.
        black: AttackResult,
        /// Attack suffered by White's unit.
        white: AttackResult,
    },
    /// Discards owed by a rout.
    RoutPenalty {
        /// Sum of the routed units' rout penalties.
        number_to_discard: u32,
    },
    /// Routed units leave the board.
    CompleteRout {
        /// The units removed.
        units: OrdSet<UnitInstance>,
    },
    /// A retreating unit moves.
    CompleteRetreat {
        /// The retreating unit.
        unit: UnitInstance,
        /// Where it ends up.
        destination: Coordinate,
    },
    /// A reversed unit turns around.
    CompleteReverse {
        /// The reversed unit.
        unit: UnitInstance,
        /// Its facing afterwards.
        new_facing: UnitFacing,
    },
    /// In-play cards move to the played pile.
    DiscardPlayedCards,
    /// A rally's card movements, with the seeded draw baked in.
    ResolveRally {
        /// Rallying side.
        side: PlayerSide,
        /// Seed the burnt card was drawn with.
        seed: u64,
        /// Card burnt, if any played card existed.
        burnt_card: Option<CardId>,
        /// Units whose type lost its last supporting card.
        units_lost_support: OrdSet<UnitInstance>,
    },
}

impl GameEffect {
    /// Discriminator of this effect.
    #[must_use]
    pub fn effect_type(&self) -> EffectType {
        match self {
            GameEffect::AdvancePhase => EffectType::AdvancePhase,
            GameEffect::RevealCards { .. } => EffectType::RevealCards,
            GameEffect::StartEngagement { .. } => EffectType::StartEngagement,
            GameEffect::DetermineRetreatEligibility { .. } => {
                EffectType::DetermineRetreatEligibility
            }
            GameEffect::RotateFlankDefender { .. } => EffectType::RotateFlankDefender,
            GameEffect::ResolveRangedAttack { .. } => EffectType::ResolveRangedAttack,
            GameEffect::ResolveMelee { .. } => EffectType::ResolveMelee,
            GameEffect::RoutPenalty { .. } => EffectType::RoutPenalty,
            GameEffect::CompleteRout { .. } => EffectType::CompleteRout,
            GameEffect::CompleteRetreat { .. } => EffectType::CompleteRetreat,
            GameEffect::CompleteReverse { .. } => EffectType::CompleteReverse,
            GameEffect::DiscardPlayedCards => EffectType::DiscardPlayedCards,
            GameEffect::ResolveRally { .. } => EffectType::ResolveRally,
        }
    }
}

/// A decision made by a player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "choiceType", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Choice {
    /// Pick this round's card.
    ChooseCard {
        /// Card from hand.
        card: CardId,
    },
    /// Reposition the commander.
    MoveCommander {
        /// Destination space.
        to: Coordinate,
    },
    /// Order a unit, or `None` when done issuing commands.
    IssueCommand {
        /// The command.
        command: Option<UnitCommand>,
    },
    /// Pledge a card from hand, or nothing.
    CommitCard {
        /// Card from hand.
        card: Option<CardId>,
    },
    /// Whether a front-engaged defender falls back.
    ChooseToRetreat {
        /// Retreat or hold.
        retreat: bool,
    },
    /// Where a retreating unit goes.
    ChooseRetreatPosition {
        /// One of the retreat's legal options.
        position: Coordinate,
    },
    /// Cards discarded to pay a rout penalty.
    ChooseRoutDiscards {
        /// Cards from hand.
        cards: Vec<CardId>,
    },
    /// Which engaged space fights next.
    ChooseMelee {
        /// An unresolved engaged space.
        location: Coordinate,
    },
    /// Whether to rally.
    ChooseRally {
        /// Rally or not.
        perform: bool,
    },
}

impl Choice {
    /// Discriminator of this choice.
    #[must_use]
    pub fn choice_type(&self) -> ChoiceType {
        match self {
            Choice::ChooseCard { .. } => ChoiceType::ChooseCard,
            Choice::MoveCommander { .. } => ChoiceType::MoveCommander,
            Choice::IssueCommand { .. } => ChoiceType::IssueCommand,
            Choice::CommitCard { .. } => ChoiceType::CommitCard,
            Choice::ChooseToRetreat { .. } => ChoiceType::ChooseToRetreat,
            Choice::ChooseRetreatPosition { .. } => ChoiceType::ChooseRetreatPosition,
            Choice::ChooseRoutDiscards { .. } => ChoiceType::ChooseRoutDiscards,
            Choice::ChooseMelee { .. } => ChoiceType::ChooseMelee,
            Choice::ChooseRally { .. } => ChoiceType::ChooseRally,
        }
    }
}

/// A choice together with the side making it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerChoice {
    /// Choosing side.
    pub side: PlayerSide,
    /// The decision.
    #[serde(flatten)]
    pub choice: Choice,
}

/// Any event the rules core accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Event {
    /// System-computed.
    GameEffect(GameEffect),
    /// Player-made.
    PlayerChoice(PlayerChoice),
}

impl Event {
    /// Wrap a player's choice.
    #[must_use]
    pub fn choice(side: PlayerSide, choice: Choice) -> Self {
        Event::PlayerChoice(PlayerChoice { side, choice })
    }

    /// What kind of event this is, in the oracle's terms.
    #[must_use]
    pub fn kind(&self) -> ExpectedEventInfo {
        match self {
            Event::GameEffect(effect) => ExpectedEventInfo::GameEffect {
                effect_type: effect.effect_type(),
            },
            Event::PlayerChoice(choice) => ExpectedEventInfo::PlayerChoice {
                side: choice.side,
                choice_type: choice.choice.choice_type(),
            },
        }
    }
}

impl From<GameEffect> for Event {
    fn from(effect: GameEffect) -> Self {
        Event::GameEffect(effect)
    }
}
