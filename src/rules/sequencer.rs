//! Phase/step sequencing and completion bookkeeping.
//!
//! ## Phase order
//!
//! playCards → moveCommanders → issueCommands → resolveMelee → cleanup →
//! next round's playCards. A phase may only be left once its step is
//! `Complete`.
//!
//! ## Settling
//!
//! After every applied event, [`settle`] clears resolutions that have
//! finished and moves steps on where finishing them ends the step. This
//! keeps the invariant that no resolved state outlives the step that
//! needed it.

use im::OrdSet;
use tracing::{debug, instrument};

use crate::board::{BoardState, Coordinate};
use crate::core::{PlayerSide, RulesError, RulesResult};
use crate::state::{
    CleanupPhaseState, CleanupStep, GameState, IssueCommandsPhaseState, IssueCommandsStep,
    MoveCommandersPhaseState, MoveCommandersStep, PhaseKind, PhaseState, PlayCardsPhaseState,
    PlayCardsStep, ResolveMeleePhaseState, ResolveMeleeStep, RoundState,
};

/// Close the completed phase and open the next one.
///
/// Leaving cleanup starts a new round with the completed set cleared.
#[instrument(skip_all, fields(round = state.round, phase = %state.phase()))]
pub fn advance_phase(state: &mut GameState) -> RulesResult<()> {
    let current = state.phase();
    if !state.round_state.current.is_complete() {
        return Err(RulesError::WrongStep {
            phase: current,
            detail: "phase is not complete".to_string(),
        });
    }

    let next = current.next();
    if current == PhaseKind::Cleanup {
        state.round += 1;
        state.round_state = RoundState::start();
    } else {
        state.round_state.completed_phases.insert(current);
        state.round_state.current = open_phase(next, state);
    }

    debug!(from = %current, to = %next, round = state.round, "phase advanced");
    Ok(())
}

/// Initial state of a phase.
#[must_use]
pub fn open_phase(kind: PhaseKind, state: &GameState) -> PhaseState {
    match kind {
        PhaseKind::PlayCards => PhaseState::PlayCards(PlayCardsPhaseState {
            step: PlayCardsStep::ChooseCards,
        }),
        PhaseKind::MoveCommanders => PhaseState::MoveCommanders(MoveCommandersPhaseState {
            step: live_commander_step(state, MoveCommandersStep::MoveFirstCommander),
        }),
        PhaseKind::IssueCommands => PhaseState::IssueCommands(IssueCommandsPhaseState {
            step: IssueCommandsStep::FirstPlayerIssueCommands,
            commanded_units: OrdSet::new(),
            current_command: None,
        }),
        PhaseKind::ResolveMelee => {
            let step = if state.board.engaged_locations().next().is_some() {
                ResolveMeleeStep::ResolveMelees
            } else {
                ResolveMeleeStep::Complete
            };
            PhaseState::ResolveMelee(ResolveMeleePhaseState {
                step,
                resolved_locations: OrdSet::new(),
                current_melee: None,
            })
        }
        PhaseKind::Cleanup => PhaseState::Cleanup(CleanupPhaseState {
            step: CleanupStep::DiscardPlayedCards,
            rally: None,
        }),
    }
}

/// The side acting in a commander step, if the step belongs to one.
#[must_use]
pub fn commander_step_side(state: &GameState, step: MoveCommandersStep) -> Option<PlayerSide> {
    match step {
        MoveCommandersStep::MoveFirstCommander => Some(state.first_player()),
        MoveCommandersStep::MoveSecondCommander => Some(state.second_player()),
        MoveCommandersStep::Complete => None,
    }
}

/// The first step at or after `from` whose commander is still on the board.
#[must_use]
pub fn live_commander_step(state: &GameState, from: MoveCommandersStep) -> MoveCommandersStep {
    let mut step = from;
    while let Some(side) = commander_step_side(state, step) {
        if !state.commander_lost(side) {
            break;
        }
        step = match step {
            MoveCommandersStep::MoveFirstCommander => MoveCommandersStep::MoveSecondCommander,
            _ => MoveCommandersStep::Complete,
        };
    }
    step
}

/// The side issuing commands in a step.
#[must_use]
pub fn issue_step_side(state: &GameState, step: IssueCommandsStep) -> Option<PlayerSide> {
    match step {
        IssueCommandsStep::FirstPlayerIssueCommands => Some(state.first_player()),
        IssueCommandsStep::SecondPlayerIssueCommands => Some(state.second_player()),
        IssueCommandsStep::Complete => None,
    }
}

/// The step after a player finishes issuing commands.
#[must_use]
pub fn next_issue_step(step: IssueCommandsStep) -> IssueCommandsStep {
    match step {
        IssueCommandsStep::FirstPlayerIssueCommands => IssueCommandsStep::SecondPlayerIssueCommands,
        IssueCommandsStep::SecondPlayerIssueCommands | IssueCommandsStep::Complete => {
            IssueCommandsStep::Complete
        }
    }
}

/// The side rallying in a cleanup step.
#[must_use]
pub fn rally_step_side(state: &GameState, step: CleanupStep) -> Option<PlayerSide> {
    match step {
        CleanupStep::FirstPlayerRally => Some(state.first_player()),
        CleanupStep::SecondPlayerRally => Some(state.second_player()),
        CleanupStep::DiscardPlayedCards | CleanupStep::Complete => None,
    }
}

/// Engaged spaces not yet fought this phase.
#[must_use]
pub fn unresolved_melee_locations(
    board: &BoardState,
    phase: &ResolveMeleePhaseState,
) -> OrdSet<Coordinate> {
    board
        .engaged_locations()
        .filter(|location| !phase.resolved_locations.contains(location))
        .collect()
}

/// Clear finished resolutions and move steps on.
pub fn settle(state: &mut GameState) {
    let GameState {
        round_state, board, ..
    } = state;

    match &mut round_state.current {
        PhaseState::IssueCommands(phase) => {
            if phase
                .current_command
                .as_ref()
                .is_some_and(|command| command.is_resolved())
            {
                phase.current_command = None;
                debug!("command resolved");
            }
        }
        PhaseState::ResolveMelee(phase) => {
            if phase.current_melee.as_ref().is_some_and(|melee| melee.is_resolved()) {
                if let Some(melee) = phase.current_melee.take() {
                    phase.resolved_locations.insert(melee.location);
                    debug!(location = %melee.location, "melee resolved");
                }
            }
            if phase.step == ResolveMeleeStep::ResolveMelees
                && phase.current_melee.is_none()
                && unresolved_melee_locations(board, phase).is_empty()
            {
                phase.step = ResolveMeleeStep::Complete;
            }
        }
        PhaseState::Cleanup(phase) => {
            if phase.rally.as_ref().is_some_and(|rally| rally.is_resolved()) {
                phase.rally = None;
                phase.step = match phase.step {
                    CleanupStep::FirstPlayerRally => CleanupStep::SecondPlayerRally,
                    CleanupStep::SecondPlayerRally => CleanupStep::Complete,
                    other => other,
                };
                debug!(step = ?phase.step, "rally resolved");
            }
        }
        PhaseState::PlayCards(_) | PhaseState::MoveCommanders(_) => {}
    }
}
