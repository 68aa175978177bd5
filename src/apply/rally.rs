use im::OrdSet;

use crate::cards::CardId;
use crate::core::{PlayerSide, RulesError, RulesResult};
use crate::rules::sequencer::rally_step_side;
use crate::state::{GameState, RallyResolutionState, RoutState};
use crate::units::UnitInstance;

pub(super) fn choose_rally(state: &mut GameState, perform: bool) -> RulesResult<()> {
    let cleanup = state.round_state.cleanup_mut()?;
    if cleanup.rally.is_some() {
        return Err(RulesError::AlreadyCompleted("rally choice"));
    }
    cleanup.rally = Some(RallyResolutionState::new(perform));
    Ok(())
}

/// Burn the drawn card, return the rest to hand, and rout units left without support.
pub(super) fn resolve_rally(
    state: &mut GameState,
    side: PlayerSide,
    burnt_card: Option<CardId>,
    units_lost_support: &OrdSet<UnitInstance>,
) -> RulesResult<()> {
    let step = state.round_state.cleanup()?.step;
    if rally_step_side(state, step) != Some(side) {
        return Err(RulesError::InconsistentState(format!(
            "{side} is not the rallying side"
        )));
    }

    state.cards[side].rally(burnt_card)?;

    let rally = state.round_state.rally_mut()?;
    if rally.rally_resolved {
        return Err(RulesError::AlreadyCompleted("rally"));
    }
    rally.rally_resolved = true;
    rally.units_lost_support = Some(units_lost_support.clone());
    if !units_lost_support.is_empty() {
        rally.rout = Some(RoutState::new(side, units_lost_support.clone()));
    }
    Ok(())
}
