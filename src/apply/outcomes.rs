//! Rout, retreat and reverse handlers.
//!
//! Each handler works on whatever outcome [`RoundState::pending_outcome_mut`]
//! finds, the same one the oracle reported.
//!
//! [`RoundState::pending_outcome_mut`]: crate::state::RoundState::pending_outcome_mut

use im::OrdSet;
use tracing::debug;

use crate::board::{Coordinate, UnitFacing, UnitPlacement};
use crate::cards::CardId;
use crate::core::{PlayerSide, RulesError, RulesResult};
use crate::state::{GameState, OutcomeMut, RetreatState, ReverseState, RoutState};
use crate::units::UnitInstance;

fn pending_rout(state: &mut GameState) -> RulesResult<&mut RoutState> {
    match state.round_state.pending_outcome_mut(state.initiative) {
        Some(OutcomeMut::Rout(rout)) => Ok(rout),
        _ => Err(RulesError::MissingState("rout")),
    }
}

fn pending_retreat(state: &mut GameState) -> RulesResult<&mut RetreatState> {
    match state.round_state.pending_outcome_mut(state.initiative) {
        Some(OutcomeMut::Retreat(retreat)) => Ok(retreat),
        _ => Err(RulesError::MissingState("retreat")),
    }
}

fn pending_reverse(state: &mut GameState) -> RulesResult<&mut ReverseState> {
    match state.round_state.pending_outcome_mut(state.initiative) {
        Some(OutcomeMut::Reverse(reverse)) => Ok(reverse),
        _ => Err(RulesError::MissingState("reverse")),
    }
}

/// Record the penalty. A player with nothing to discard skips the discard choice.
pub(super) fn rout_penalty(state: &mut GameState, number_to_discard: u32) -> RulesResult<()> {
    let GameState {
        round_state,
        cards,
        initiative,
        ..
    } = state;
    let Some(OutcomeMut::Rout(rout)) = round_state.pending_outcome_mut(*initiative) else {
        return Err(RulesError::MissingState("rout"));
    };
    if rout.number_to_discard.is_some() {
        return Err(RulesError::AlreadyCompleted("rout penalty"));
    }

    let owed = (number_to_discard as usize).min(cards[rout.player].hand_size());
    rout.number_to_discard = Some(number_to_discard);
    rout.cards_chosen = owed == 0;
    Ok(())
}

pub(super) fn choose_rout_discards(
    state: &mut GameState,
    side: PlayerSide,
    chosen: &[CardId],
) -> RulesResult<()> {
    let GameState {
        round_state,
        cards,
        initiative,
        ..
    } = state;
    let Some(OutcomeMut::Rout(rout)) = round_state.pending_outcome_mut(*initiative) else {
        return Err(RulesError::MissingState("rout"));
    };
    if rout.player != side {
        return Err(RulesError::InconsistentState(format!(
            "{side} discarded for {}'s rout",
            rout.player
        )));
    }
    if rout.cards_chosen {
        return Err(RulesError::AlreadyCompleted("rout discards"));
    }

    for card in chosen {
        cards[side].discard_from_hand(*card)?;
    }
    rout.cards_chosen = true;
    Ok(())
}

/// Remove routed units. A commander standing with a routed unit of its own
/// side is lost with it.
pub(super) fn complete_rout(state: &mut GameState, units: &OrdSet<UnitInstance>) -> RulesResult<()> {
    let rout = pending_rout(state)?;
    if rout.units != *units {
        return Err(RulesError::InconsistentState(
            "routed units differ from the pending rout".to_string(),
        ));
    }
    rout.completed = true;

    for unit in units {
        let placement = state.board.remove_unit(*unit)?;
        state.routed_units.insert(*unit);

        let side = unit.side;
        if state.board.commanders[side] == Some(placement.coordinate) {
            state.board.commanders[side] = None;
            state.commanders_lost.insert(side);
            debug!(%side, at = %placement.coordinate, "commander lost");
        }
    }
    Ok(())
}

pub(super) fn choose_retreat_position(state: &mut GameState, position: Coordinate) -> RulesResult<()> {
    let retreat = pending_retreat(state)?;
    if retreat.final_position.is_some() {
        return Err(RulesError::AlreadyCompleted("retreat position"));
    }
    retreat.final_position = Some(position);
    Ok(())
}

pub(super) fn complete_retreat(
    state: &mut GameState,
    unit: UnitInstance,
    destination: Coordinate,
) -> RulesResult<()> {
    let retreat = pending_retreat(state)?;
    if retreat.unit.unit != unit || retreat.final_position != Some(destination) {
        return Err(RulesError::InconsistentState(format!(
            "{unit} to {destination} does not match the pending retreat"
        )));
    }
    retreat.completed = true;

    let facing = state.board.require_unit(unit)?.placement.facing;
    state.board.move_unit(unit, destination, facing)
}

pub(super) fn complete_reverse(
    state: &mut GameState,
    unit: UnitInstance,
    new_facing: UnitFacing,
) -> RulesResult<()> {
    let reverse = pending_reverse(state)?;
    if reverse.unit.unit != unit {
        return Err(RulesError::InconsistentState(format!(
            "{unit} is not the reversing unit"
        )));
    }
    let coordinate = reverse.unit.placement.coordinate;
    reverse.final_position = Some(UnitPlacement::new(coordinate, new_facing));
    reverse.completed = true;

    state.board.set_facing(unit, new_facing)
}
