//! Card handlers.

use super::commands::complete_unopposed_move;
use crate::cards::CardId;
use crate::core::{PlayerSide, RulesError, RulesResult};
use crate::state::{CleanupStep, GameState, PlayCardsStep};

pub(super) fn choose_card(state: &mut GameState, side: PlayerSide, card: CardId) -> RulesResult<()> {
    state.cards[side].choose_for_play(card)?;
    if PlayerSide::ALL
        .iter()
        .all(|&side| state.cards[side].awaiting_play.is_some())
    {
        state.round_state.play_cards_mut()?.step = PlayCardsStep::RevealCards;
    }
    Ok(())
}

pub(super) fn reveal_cards(state: &mut GameState, initiative: PlayerSide) -> RulesResult<()> {
    for side in PlayerSide::ALL {
        state.cards[side].reveal()?;
    }
    state.initiative = initiative;
    state.round_state.play_cards_mut()?.step = PlayCardsStep::Complete;
    Ok(())
}

/// Complete the first pending commitment with a card from `side`'s hand.
///
/// The card leaves the hand and the commitment completes in the same
/// successor state, or neither happens.
pub(super) fn commit_card(
    state: &mut GameState,
    side: PlayerSide,
    card: Option<CardId>,
) -> RulesResult<()> {
    let GameState {
        round_state,
        cards,
        initiative,
        ..
    } = state;

    let (owner, commitment) = round_state
        .pending_commitment_mut(*initiative)
        .ok_or(RulesError::MissingState("pending commitment"))?;
    if owner != side {
        return Err(RulesError::InconsistentState(format!(
            "{side} committed but {owner} owes the card"
        )));
    }
    if let Some(card) = card {
        cards[side].discard_from_hand(card)?;
    }
    commitment.complete(card)?;

    complete_unopposed_move(state)
}

pub(super) fn discard_played_cards(state: &mut GameState) -> RulesResult<()> {
    for side in PlayerSide::ALL {
        state.cards[side].retire_in_play();
    }
    state.round_state.cleanup_mut()?.step = CleanupStep::FirstPlayerRally;
    Ok(())
}
