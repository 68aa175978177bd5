//! Phases, their steps, and the per-phase resolution state.
//!
//! Each `PhaseState` variant carries a step enum specific to that phase plus
//! whatever nested resolution is in flight. Resolution state only exists
//! while its step needs it: moving to the next step clears it.

use im::OrdSet;
use serde::{Deserialize, Serialize};

use super::command::CommandResolutionState;
use super::melee::MeleeResolutionState;
use super::rally::RallyResolutionState;
use crate::board::Coordinate;
use crate::core::PlayerSide;
use crate::units::UnitInstance;

/// The five phases of a round, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseKind {
    /// Both players choose and reveal a card.
    PlayCards,
    /// Commanders reposition.
    MoveCommanders,
    /// Players order their units.
    IssueCommands,
    /// Engaged spaces fight.
    ResolveMelee,
    /// Cards are tidied and players may rally.
    Cleanup,
}

impl PhaseKind {
    /// The phase that follows this one. Cleanup wraps to the next round.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            PhaseKind::PlayCards => PhaseKind::MoveCommanders,
            PhaseKind::MoveCommanders => PhaseKind::IssueCommands,
            PhaseKind::IssueCommands => PhaseKind::ResolveMelee,
            PhaseKind::ResolveMelee => PhaseKind::Cleanup,
            PhaseKind::Cleanup => PhaseKind::PlayCards,
        }
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PhaseKind::PlayCards => "playCards",
            PhaseKind::MoveCommanders => "moveCommanders",
            PhaseKind::IssueCommands => "issueCommands",
            PhaseKind::ResolveMelee => "resolveMelee",
            PhaseKind::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// Steps of the play-cards phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayCardsStep {
    /// Initiative player chooses, then the other.
    ChooseCards,
    /// Both chosen cards are revealed.
    RevealCards,
    /// Done.
    Complete,
}

/// Steps of the move-commanders phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveCommandersStep {
    /// Initiative player's commander.
    MoveFirstCommander,
    /// Other player's commander.
    MoveSecondCommander,
    /// Done.
    Complete,
}

/// Steps of the issue-commands phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueCommandsStep {
    /// Initiative player's commands.
    FirstPlayerIssueCommands,
    /// Other player's commands.
    SecondPlayerIssueCommands,
    /// Done.
    Complete,
}

/// Steps of the resolve-melee phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolveMeleeStep {
    /// Engaged spaces are fought one at a time.
    ResolveMelees,
    /// Done.
    Complete,
}

/// Steps of the cleanup phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CleanupStep {
    /// In-play cards move to the played pile.
    DiscardPlayedCards,
    /// Initiative player's rally.
    FirstPlayerRally,
    /// Other player's rally.
    SecondPlayerRally,
    /// Done.
    Complete,
}

/// Play-cards phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayCardsPhaseState {
    /// Current step.
    pub step: PlayCardsStep,
}

/// Move-commanders phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCommandersPhaseState {
    /// Current step.
    pub step: MoveCommandersStep,
}

/// Issue-commands phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCommandsPhaseState {
    /// Current step.
    pub step: IssueCommandsStep,
    /// Units already commanded this phase (both sides).
    pub commanded_units: OrdSet<UnitInstance>,
    /// Command being resolved.
    pub current_command: Option<CommandResolutionState>,
}

impl IssueCommandsPhaseState {
    /// Number of commands a side has issued this phase.
    #[must_use]
    pub fn commands_issued_by(&self, side: PlayerSide) -> usize {
        self.commanded_units
            .iter()
            .filter(|unit| unit.side == side)
            .count()
    }
}

/// Resolve-melee phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveMeleePhaseState {
    /// Current step.
    pub step: ResolveMeleeStep,
    /// Engaged spaces already fought this phase.
    pub resolved_locations: OrdSet<Coordinate>,
    /// Melee being resolved.
    pub current_melee: Option<MeleeResolutionState>,
}

/// Cleanup phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupPhaseState {
    /// Current step.
    pub step: CleanupStep,
    /// Rally of the player whose step it is.
    pub rally: Option<RallyResolutionState>,
}

/// State of the current phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseState {
    /// Play cards.
    PlayCards(PlayCardsPhaseState),
    /// Move commanders.
    MoveCommanders(MoveCommandersPhaseState),
    /// Issue commands.
    IssueCommands(IssueCommandsPhaseState),
    /// Resolve melee.
    ResolveMelee(ResolveMeleePhaseState),
    /// Cleanup.
    Cleanup(CleanupPhaseState),
}

impl PhaseState {
    /// Which phase this is.
    #[must_use]
    pub fn kind(&self) -> PhaseKind {
        match self {
            PhaseState::PlayCards(_) => PhaseKind::PlayCards,
            PhaseState::MoveCommanders(_) => PhaseKind::MoveCommanders,
            PhaseState::IssueCommands(_) => PhaseKind::IssueCommands,
            PhaseState::ResolveMelee(_) => PhaseKind::ResolveMelee,
            PhaseState::Cleanup(_) => PhaseKind::Cleanup,
        }
    }

    /// Whether the phase's step is `Complete`.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self {
            PhaseState::PlayCards(phase) => phase.step == PlayCardsStep::Complete,
            PhaseState::MoveCommanders(phase) => phase.step == MoveCommandersStep::Complete,
            PhaseState::IssueCommands(phase) => phase.step == IssueCommandsStep::Complete,
            PhaseState::ResolveMelee(phase) => phase.step == ResolveMeleeStep::Complete,
            PhaseState::Cleanup(phase) => phase.step == CleanupStep::Complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order_wraps() {
        let mut phase = PhaseKind::PlayCards;
        let mut seen = vec![phase];
        for _ in 0..5 {
            phase = phase.next();
            seen.push(phase);
        }
        assert_eq!(
            seen,
            vec![
                PhaseKind::PlayCards,
                PhaseKind::MoveCommanders,
                PhaseKind::IssueCommands,
                PhaseKind::ResolveMelee,
                PhaseKind::Cleanup,
                PhaseKind::PlayCards,
            ]
        );
    }

    #[test]
    fn test_kind_and_completion() {
        let phase = PhaseState::Cleanup(CleanupPhaseState {
            step: CleanupStep::Complete,
            rally: None,
        });
        assert_eq!(phase.kind(), PhaseKind::Cleanup);
        assert!(phase.is_complete());
    }
}
