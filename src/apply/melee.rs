use crate::board::{Coordinate, UnitPlacement, UnitPresence, UnitWithPlacement};
use crate::core::{PlayerSide, RulesError, RulesResult, SideMap};
use crate::state::{AttackApplyState, AttackResult, GameState, MeleeResolutionState};

pub(super) fn choose_melee(state: &mut GameState, location: Coordinate) -> RulesResult<()> {
    let Some(presence @ UnitPresence::Engaged { .. }) = state.board.presence(location).copied()
    else {
        return Err(RulesError::InconsistentState(format!(
            "no engagement at {location}"
        )));
    };
    let unit_of = |side: PlayerSide| -> RulesResult<UnitWithPlacement> {
        presence
            .unit_of(side)
            .map(|placed| {
                UnitWithPlacement::new(placed.unit, UnitPlacement::new(location, placed.facing))
            })
            .ok_or_else(|| RulesError::UnitNotFound(format!("{side} unit at {location}")))
    };
    let units = SideMap {
        black: unit_of(PlayerSide::Black)?,
        white: unit_of(PlayerSide::White)?,
    };

    let phase = state.round_state.resolve_melee_mut()?;
    if phase.current_melee.is_some() {
        return Err(RulesError::InconsistentState(
            "a melee is already being resolved".to_string(),
        ));
    }
    phase.current_melee = Some(MeleeResolutionState::new(location, units));
    Ok(())
}

pub(super) fn resolve_melee(
    state: &mut GameState,
    black: &AttackResult,
    white: &AttackResult,
) -> RulesResult<()> {
    let melee = state.round_state.current_melee_mut()?;
    if melee.attack_apply.is_some() {
        return Err(RulesError::AlreadyCompleted("melee"));
    }
    melee.attack_apply = Some(SideMap {
        black: AttackApplyState::from_result(black),
        white: AttackApplyState::from_result(white),
    });
    Ok(())
}
