//! The expected-event oracle.
//!
//! Walks phase → step → resolution → innermost sub-state and reports the
//! first thing still undecided. The walk order is the rules order:
//!
//! - movement: mover's card → engagement → front / flank / rear resolution
//! - front engagement: defender's card → retreat eligibility → retreat choice → retreat
//! - ranged attack: attacker's card → defender's card → attack → outcome
//! - melee: initiative card → other card → attack → initiative outcome → other outcome
//! - rout: penalty → discards → removal
//! - retreat: destination (unless preselected) → move
//!
//! Every answer the oracle can give has exactly one applier function, and
//! the applier refuses any event the oracle did not ask for.

use super::sequencer::{commander_step_side, issue_step_side, rally_step_side, unresolved_melee_locations};
use crate::core::{RulesError, RulesResult};
use crate::events::{ChoiceType, EffectType, ExpectedEventInfo};
use crate::state::{
    CleanupStep, CommandResolutionState, EngagementResolutionState, GameState,
    MeleeResolutionState, MovementResolutionState, OutcomeRef, PhaseState, PlayCardsStep,
    RangedAttackResolutionState,
};

/// The single event the state is waiting for.
///
/// A rout, retreat, reverse or attack application whose fields contradict
/// each other is reported as [`RulesError::InconsistentState`].
pub fn expected_event(state: &GameState) -> RulesResult<ExpectedEventInfo> {
    state.round_state.check_outcomes()?;

    if state.round_state.current.is_complete() {
        return Ok(ExpectedEventInfo::effect(EffectType::AdvancePhase));
    }

    match &state.round_state.current {
        PhaseState::PlayCards(phase) => match phase.step {
            PlayCardsStep::ChooseCards => [state.first_player(), state.second_player()]
                .into_iter()
                .find(|&side| state.cards[side].awaiting_play.is_none())
                .map(|side| ExpectedEventInfo::choice(side, ChoiceType::ChooseCard))
                .ok_or_else(|| {
                    inconsistent("both cards chosen but the reveal step has not begun")
                }),
            PlayCardsStep::RevealCards => Ok(ExpectedEventInfo::effect(EffectType::RevealCards)),
            PlayCardsStep::Complete => Ok(ExpectedEventInfo::effect(EffectType::AdvancePhase)),
        },

        PhaseState::MoveCommanders(phase) => commander_step_side(state, phase.step)
            .map(|side| ExpectedEventInfo::choice(side, ChoiceType::MoveCommander))
            .ok_or_else(|| inconsistent("no commander to move")),

        PhaseState::IssueCommands(phase) => match &phase.current_command {
            None => issue_step_side(state, phase.step)
                .map(|side| ExpectedEventInfo::choice(side, ChoiceType::IssueCommand))
                .ok_or_else(|| inconsistent("no side is issuing commands")),
            Some(command) if command.is_resolved() => {
                Err(inconsistent("resolved command left in place"))
            }
            Some(CommandResolutionState::Movement(movement)) => movement_expectation(state, movement),
            Some(CommandResolutionState::RangedAttack(ranged)) => {
                ranged_expectation(state, ranged)
            }
        },

        PhaseState::ResolveMelee(phase) => match &phase.current_melee {
            None => {
                if unresolved_melee_locations(&state.board, phase).is_empty() {
                    return Err(inconsistent("no melee left but the step is not complete"));
                }
                Ok(ExpectedEventInfo::choice(state.initiative, ChoiceType::ChooseMelee))
            }
            Some(melee) if melee.is_resolved() => Err(inconsistent("resolved melee left in place")),
            Some(melee) => melee_expectation(state, melee),
        },

        PhaseState::Cleanup(phase) => {
            if phase.step == CleanupStep::DiscardPlayedCards {
                return Ok(ExpectedEventInfo::effect(EffectType::DiscardPlayedCards));
            }
            let side = rally_step_side(state, phase.step)
                .ok_or_else(|| inconsistent("no side is rallying"))?;
            match &phase.rally {
                None => Ok(ExpectedEventInfo::choice(side, ChoiceType::ChooseRally)),
                Some(rally) if rally.is_resolved() => {
                    Err(inconsistent("resolved rally left in place"))
                }
                Some(rally) if !rally.rally_resolved => {
                    Ok(ExpectedEventInfo::effect(EffectType::ResolveRally))
                }
                Some(_) => pending_outcome_expectation(state),
            }
        }
    }
}

fn movement_expectation(
    state: &GameState,
    movement: &MovementResolutionState,
) -> RulesResult<ExpectedEventInfo> {
    if movement.commitment.is_pending() {
        return Ok(ExpectedEventInfo::choice(
            movement.moving_unit.unit.side,
            ChoiceType::CommitCard,
        ));
    }

    let Some(engagement) = &movement.engagement else {
        return Ok(ExpectedEventInfo::effect(EffectType::StartEngagement));
    };
    let defender = engagement.defending_unit.unit.side;

    match &engagement.resolution {
        EngagementResolutionState::Rear { .. } => pending_outcome_expectation(state),
        EngagementResolutionState::Flank { .. } => {
            Ok(ExpectedEventInfo::effect(EffectType::RotateFlankDefender))
        }
        EngagementResolutionState::Front(front) => {
            if front.defensive_commitment.is_pending() {
                return Ok(ExpectedEventInfo::choice(defender, ChoiceType::CommitCard));
            }
            if front.retreat_eligibility.is_none() {
                return Ok(ExpectedEventInfo::effect(
                    EffectType::DetermineRetreatEligibility,
                ));
            }
            match (front.retreat_choice, &front.retreat) {
                (None, _) => Ok(ExpectedEventInfo::choice(defender, ChoiceType::ChooseToRetreat)),
                (Some(true), Some(_)) => pending_outcome_expectation(state),
                (Some(true), None) => Err(RulesError::MissingState("retreat")),
                (Some(false), _) => Err(inconsistent("declined retreat left unresolved")),
            }
        }
    }
}

fn ranged_expectation(
    state: &GameState,
    ranged: &RangedAttackResolutionState,
) -> RulesResult<ExpectedEventInfo> {
    if ranged.attacker_commitment.is_pending() {
        return Ok(ExpectedEventInfo::choice(ranged.attacker.unit.side, ChoiceType::CommitCard));
    }
    if ranged.defender_commitment.is_pending() {
        return Ok(ExpectedEventInfo::choice(ranged.defender.unit.side, ChoiceType::CommitCard));
    }
    if ranged.attack_apply.is_none() {
        return Ok(ExpectedEventInfo::effect(EffectType::ResolveRangedAttack));
    }
    pending_outcome_expectation(state)
}

fn melee_expectation(
    state: &GameState,
    melee: &MeleeResolutionState,
) -> RulesResult<ExpectedEventInfo> {
    if melee.attack_apply.is_some() {
        return pending_outcome_expectation(state);
    }
    let pending = [state.first_player(), state.second_player()]
        .into_iter()
        .find(|&side| melee.commitments[side].is_pending());
    Ok(match pending {
        Some(side) => ExpectedEventInfo::choice(side, ChoiceType::CommitCard),
        None => ExpectedEventInfo::effect(EffectType::ResolveMelee),
    })
}

/// Next step of whichever rout, retreat or reverse is in progress.
fn pending_outcome_expectation(state: &GameState) -> RulesResult<ExpectedEventInfo> {
    let outcome = state
        .round_state
        .pending_outcome(state.initiative)
        .ok_or_else(|| inconsistent("unresolved state with no outcome in progress"))?;

    Ok(match outcome {
        OutcomeRef::Rout(rout) => {
            if rout.number_to_discard.is_none() {
                ExpectedEventInfo::effect(EffectType::RoutPenalty)
            } else if !rout.cards_chosen {
                ExpectedEventInfo::choice(rout.player, ChoiceType::ChooseRoutDiscards)
            } else {
                ExpectedEventInfo::effect(EffectType::CompleteRout)
            }
        }
        OutcomeRef::Retreat(retreat) => {
            if retreat.final_position.is_none() {
                ExpectedEventInfo::choice(retreat.unit.unit.side, ChoiceType::ChooseRetreatPosition)
            } else {
                ExpectedEventInfo::effect(EffectType::CompleteRetreat)
            }
        }
        OutcomeRef::Reverse(_) => ExpectedEventInfo::effect(EffectType::CompleteReverse),
    })
}

fn inconsistent(detail: &str) -> RulesError {
    RulesError::InconsistentState(detail.to_string())
}
