//! Game state and the nested resolution state machines.
//!
//! ## Layout
//!
//! - `game`: `GameState` and `RoundState`, the root values
//! - `phase`: one state per phase, each with its own step enum
//! - `command`, `engagement`, `melee`, `rally`: resolutions in flight
//! - `outcome`: attack results and the rout/retreat/reverse they cause
//! - `commitment`: cards pledged to a resolution
//! - `focus`: getters that re-derive nested state from the round

pub mod command;
pub mod commitment;
pub mod engagement;
pub mod focus;
pub mod game;
pub mod melee;
pub mod outcome;
pub mod phase;
pub mod rally;

pub use command::{
    CommandResolutionState, MovementResolutionState, RangedAttackResolutionState, UnitCommand,
};
pub use commitment::Commitment;
pub use engagement::{
    EngagementResolutionState, EngagementState, EngagementType, FrontEngagementState,
    RetreatEligibility,
};
pub use focus::{OutcomeMut, OutcomeRef};
pub use game::{GameState, RoundState};
pub use melee::MeleeResolutionState;
pub use outcome::{
    AttackApplyState, AttackOutcome, AttackResult, RetreatState, ReverseState, RoutState,
};
pub use phase::{
    CleanupPhaseState, CleanupStep, IssueCommandsPhaseState, IssueCommandsStep,
    MoveCommandersPhaseState, MoveCommandersStep, PhaseKind, PhaseState, PlayCardsPhaseState,
    PlayCardsStep, ResolveMeleePhaseState, ResolveMeleeStep,
};
pub use rally::RallyResolutionState;
