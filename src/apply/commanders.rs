use crate::board::Coordinate;
use crate::core::{PlayerSide, RulesError, RulesResult};
use crate::rules::sequencer::{commander_step_side, live_commander_step};
use crate::state::{GameState, MoveCommandersStep};

pub(super) fn move_commander(state: &mut GameState, side: PlayerSide, to: Coordinate) -> RulesResult<()> {
    let step = state.round_state.move_commanders_mut()?.step;
    if commander_step_side(state, step) != Some(side) {
        return Err(RulesError::InconsistentState(format!(
            "{side} may not move a commander in step {step:?}"
        )));
    }

    state.board.commanders[side] = Some(to);

    let next = match step {
        MoveCommandersStep::MoveFirstCommander => MoveCommandersStep::MoveSecondCommander,
        MoveCommandersStep::MoveSecondCommander | MoveCommandersStep::Complete => {
            MoveCommandersStep::Complete
        }
    };
    let next = live_commander_step(state, next);
    state.round_state.move_commanders_mut()?.step = next;
    Ok(())
}
