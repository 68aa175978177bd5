//! Command handlers: issuing, movement, engagement and ranged attacks.

use im::OrdSet;

use crate::board::{Coordinate, UnitFacing, UnitPlacement, UnitWithPlacement};
use crate::core::{PlayerSide, RulesError, RulesResult};
use crate::rules::sequencer::next_issue_step;
use crate::state::{
    AttackApplyState, AttackResult, CommandResolutionState, EngagementResolutionState,
    EngagementState, EngagementType, GameState, MovementResolutionState,
    RangedAttackResolutionState, RetreatEligibility, RetreatState, UnitCommand,
};

pub(super) fn issue_command(
    state: &mut GameState,
    side: PlayerSide,
    command: Option<&UnitCommand>,
) -> RulesResult<()> {
    let Some(command) = command else {
        let phase = state.round_state.issue_commands_mut()?;
        phase.step = next_issue_step(phase.step);
        return Ok(());
    };

    let unit = command.unit();
    if unit.side != side {
        return Err(RulesError::InconsistentState(format!(
            "{side} cannot command {unit}"
        )));
    }

    let resolution = match command {
        UnitCommand::Move { path, facing, .. } => {
            CommandResolutionState::Movement(MovementResolutionState::new(
                state.board.require_unit(unit)?,
                path.clone(),
                *facing,
            ))
        }
        UnitCommand::RangedAttack { target, .. } => {
            CommandResolutionState::RangedAttack(RangedAttackResolutionState::new(
                state.board.require_unit(unit)?,
                state.board.require_unit(*target)?,
            ))
        }
    };

    let phase = state.round_state.issue_commands_mut()?;
    if phase.current_command.is_some() {
        return Err(RulesError::InconsistentState(
            "a command is already being resolved".to_string(),
        ));
    }
    phase.commanded_units.insert(unit);
    phase.current_command = Some(resolution);
    Ok(())
}

/// Carry out a committed move whose destination is empty.
///
/// Does nothing outside a movement, before the mover's commitment, or when
/// the destination holds an enemy.
pub(super) fn complete_unopposed_move(state: &mut GameState) -> RulesResult<()> {
    let GameState {
        round_state, board, ..
    } = state;
    let Ok(movement) = round_state.movement_mut() else {
        return Ok(());
    };
    if movement.commitment.is_pending() || movement.engagement.is_some() || movement.completed {
        return Ok(());
    }

    let destination = movement.destination();
    if board.is_empty_at(destination) {
        board.move_unit(movement.moving_unit.unit, destination, movement.facing)?;
        movement.completed = true;
    }
    Ok(())
}

pub(super) fn start_engagement(
    state: &mut GameState,
    engagement_type: EngagementType,
    defending_unit: UnitWithPlacement,
) -> RulesResult<()> {
    let GameState {
        round_state, board, ..
    } = state;
    let movement = round_state.movement_mut()?;
    if movement.engagement.is_some() {
        return Err(RulesError::AlreadyCompleted("engagement"));
    }

    let engaging_unit = UnitWithPlacement::new(
        movement.moving_unit.unit,
        UnitPlacement::new(movement.destination(), movement.facing),
    );
    board.remove_unit(engaging_unit.unit)?;
    board.engage(engaging_unit)?;

    movement.engagement = Some(EngagementState::new(
        engaging_unit,
        defending_unit,
        engagement_type,
    ));
    Ok(())
}

pub(super) fn determine_retreat_eligibility(
    state: &mut GameState,
    eligible: bool,
    legal_retreat_options: &OrdSet<Coordinate>,
) -> RulesResult<()> {
    let engagement = state.round_state.engagement_mut()?;
    let EngagementResolutionState::Front(front) = &mut engagement.resolution else {
        return Err(RulesError::MissingState("front engagement"));
    };
    if front.retreat_eligibility.is_some() {
        return Err(RulesError::AlreadyCompleted("retreat eligibility"));
    }
    front.retreat_eligibility = Some(RetreatEligibility {
        eligible,
        legal_retreat_options: legal_retreat_options.clone(),
    });
    Ok(())
}

pub(super) fn choose_to_retreat(state: &mut GameState, retreat: bool) -> RulesResult<()> {
    let GameState {
        round_state, board, ..
    } = state;
    let engagement = round_state.engagement_mut()?;
    let defender = board.require_unit(engagement.defending_unit.unit)?;
    let EngagementResolutionState::Front(front) = &mut engagement.resolution else {
        return Err(RulesError::MissingState("front engagement"));
    };
    let eligibility = front
        .retreat_eligibility
        .as_ref()
        .ok_or(RulesError::MissingState("retreat eligibility"))?;
    if front.retreat_choice.is_some() {
        return Err(RulesError::AlreadyCompleted("retreat choice"));
    }

    if retreat {
        front.retreat = Some(RetreatState::new(
            defender,
            eligibility.legal_retreat_options.clone(),
        ));
    }
    front.retreat_choice = Some(retreat);
    Ok(())
}

pub(super) fn rotate_flank_defender(state: &mut GameState, new_facing: UnitFacing) -> RulesResult<()> {
    let GameState {
        round_state, board, ..
    } = state;
    let engagement = round_state.engagement_mut()?;
    let EngagementResolutionState::Flank { defender_rotated } = &mut engagement.resolution else {
        return Err(RulesError::MissingState("flank engagement"));
    };
    if *defender_rotated {
        return Err(RulesError::AlreadyCompleted("flank rotation"));
    }
    board.set_facing(engagement.defending_unit.unit, new_facing)?;
    *defender_rotated = true;
    Ok(())
}

pub(super) fn resolve_ranged_attack(state: &mut GameState, result: &AttackResult) -> RulesResult<()> {
    let ranged = state.round_state.ranged_attack_mut()?;
    if ranged.attack_apply.is_some() {
        return Err(RulesError::AlreadyCompleted("ranged attack"));
    }
    ranged.attack_apply = Some(AttackApplyState::from_result(result));
    Ok(())
}
