//! Invariant-violation errors.
//!
//! A `RulesError` means the caller and the rules core disagree about the
//! state of the game: an event was applied out of order, a nested resolution
//! state is missing, or a state is self-contradictory. These are never
//! routine game conditions. Illegal player input is reported through
//! [`ValidationResult`](crate::rules::ValidationResult) instead.

use derive_more::{Display, Error};

use crate::events::ExpectedEventInfo;
use crate::state::PhaseKind;

/// Fatal rules-core error.
#[derive(Clone, Debug, PartialEq, Eq, Display, Error)]
pub enum RulesError {
    /// The operation requires a different phase.
    #[display("wrong phase: expected {expected}, found {actual}")]
    WrongPhase {
        /// Phase the operation needs.
        expected: PhaseKind,
        /// Phase the state is in.
        actual: PhaseKind,
    },

    /// The operation requires a different step of the current phase.
    #[display("wrong step in {phase}: {detail}")]
    WrongStep {
        /// Current phase.
        phase: PhaseKind,
        /// What was wrong with the step.
        #[error(not(source))]
        detail: String,
    },

    /// A nested resolution state needed by the operation is absent.
    #[display("missing resolution state: {_0}")]
    MissingState(#[error(not(source))] &'static str),

    /// The targeted resolution state has already been completed.
    #[display("already completed: {_0}")]
    AlreadyCompleted(#[error(not(source))] &'static str),

    /// The event is not the one the state expects next.
    #[display("unexpected event {actual}, expected {expected}")]
    UnexpectedEvent {
        /// What the oracle reports.
        expected: ExpectedEventInfo,
        /// What was supplied.
        actual: ExpectedEventInfo,
    },

    /// A game effect was requested while the state waits for a player.
    #[display("no game effect to generate: waiting for {expected}")]
    ChoiceExpected {
        /// What the oracle reports.
        expected: ExpectedEventInfo,
    },

    /// The state contradicts itself (e.g. a resolved sub-state left in place).
    #[display("inconsistent state: {_0}")]
    InconsistentState(#[error(not(source))] String),

    /// A unit referenced by an event or state is not where it should be.
    #[display("unit not found: {_0}")]
    UnitNotFound(#[error(not(source))] String),

    /// A card referenced by an event is not in the required zone.
    #[display("card not available: {_0}")]
    CardNotAvailable(#[error(not(source))] String),

    /// Static data (unit type or card definition) is missing.
    #[display("unknown definition: {_0}")]
    UnknownDefinition(#[error(not(source))] String),
}

/// Result alias used throughout the rules core.
pub type RulesResult<T> = Result<T, RulesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = RulesError::WrongPhase {
            expected: PhaseKind::Cleanup,
            actual: PhaseKind::PlayCards,
        };
        assert_eq!(err.to_string(), "wrong phase: expected cleanup, found playCards");

        let err = RulesError::MissingState("engagement");
        assert_eq!(err.to_string(), "missing resolution state: engagement");
    }
}
