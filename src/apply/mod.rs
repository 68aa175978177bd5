//! The event applier.
//!
//! `apply_event` is a pure function: it never mutates its input and returns
//! the successor state. Unchanged parts of the state are shared with the
//! input through the persistent `im` collections, so keeping every
//! intermediate state of a game around is cheap.
//!
//! ## Contract
//!
//! The applier only accepts the event the oracle expects. It does not check
//! payload legality beyond what it needs to stay consistent; callers run
//! [`validate_event`](crate::rules::validate_event) first. Each event kind
//! has exactly one handler:
//!
//! | Area | Handlers |
//! |------|----------|
//! | cards | `chooseCard`, `revealCards`, `commitCard`, `discardPlayedCards` |
//! | commanders | `moveCommander` |
//! | commands | `issueCommand`, `startEngagement`, `determineRetreatEligibility`, `chooseToRetreat`, `rotateFlankDefender`, `resolveRangedAttack` |
//! | melee | `chooseMelee`, `resolveMelee` |
//! | outcomes | `routPenalty`, `chooseRoutDiscards`, `completeRout`, `chooseRetreatPosition`, `completeRetreat`, `completeReverse` |
//! | rally | `chooseRally`, `resolveRally` |
//!
//! After the handler runs, [`settle`](crate::rules::sequencer::settle)
//! clears whatever the event finished.

mod cards;
mod commanders;
mod commands;
mod melee;
mod outcomes;
mod rally;

use tracing::{debug, instrument};

use crate::core::{RulesError, RulesResult};
use crate::events::{Choice, Event, GameEffect, PlayerChoice};
use crate::rules::expected_event;
use crate::rules::sequencer::{advance_phase, settle};
use crate::state::GameState;

/// Apply an event, returning the successor state.
///
/// Fails with [`RulesError::UnexpectedEvent`] when the event is not the one
/// the state waits for, and with other [`RulesError`]s when the state and
/// the event disagree. The input state is unchanged either way.
///
/// ```
/// use commander_rules::apply::apply_event;
/// use commander_rules::cards::CardId;
/// use commander_rules::core::PlayerSide;
/// use commander_rules::events::{Choice, Event};
/// use commander_rules::scenario::ScenarioBuilder;
///
/// let (_, state) = ScenarioBuilder::standard().build().unwrap();
/// let event = Event::choice(PlayerSide::Black, Choice::ChooseCard { card: CardId::new(1) });
///
/// let next = apply_event(&event, &state).unwrap();
/// assert_eq!(next.cards.black.awaiting_play, Some(CardId::new(1)));
/// assert_eq!(state.cards.black.awaiting_play, None);
/// ```
#[instrument(skip_all, fields(round = state.round, phase = %state.phase(), event = %event.kind()))]
pub fn apply_event(event: &Event, state: &GameState) -> RulesResult<GameState> {
    let expected = expected_event(state)?;
    let actual = event.kind();
    if expected != actual {
        return Err(RulesError::UnexpectedEvent { expected, actual });
    }

    let mut next = state.clone();
    match event {
        Event::GameEffect(effect) => apply_effect(effect, &mut next)?,
        Event::PlayerChoice(choice) => apply_choice(choice, &mut next)?,
    }
    settle(&mut next);

    debug!(event = %actual, round = next.round, phase = %next.phase(), "event applied");
    Ok(next)
}

fn apply_effect(effect: &GameEffect, state: &mut GameState) -> RulesResult<()> {
    match effect {
        GameEffect::AdvancePhase => advance_phase(state),
        GameEffect::RevealCards { initiative } => cards::reveal_cards(state, *initiative),
        GameEffect::StartEngagement {
            engagement_type,
            defending_unit,
        } => commands::start_engagement(state, *engagement_type, *defending_unit),
        GameEffect::DetermineRetreatEligibility {
            eligible,
            legal_retreat_options,
        } => commands::determine_retreat_eligibility(state, *eligible, legal_retreat_options),
        GameEffect::RotateFlankDefender { new_facing } => {
            commands::rotate_flank_defender(state, *new_facing)
        }
        GameEffect::ResolveRangedAttack { result } => commands::resolve_ranged_attack(state, result),
        GameEffect::ResolveMelee { black, white } => melee::resolve_melee(state, black, white),
        GameEffect::RoutPenalty { number_to_discard } => {
            outcomes::rout_penalty(state, *number_to_discard)
        }
        GameEffect::CompleteRout { units } => outcomes::complete_rout(state, units),
        GameEffect::CompleteRetreat { unit, destination } => {
            outcomes::complete_retreat(state, *unit, *destination)
        }
        GameEffect::CompleteReverse { unit, new_facing } => {
            outcomes::complete_reverse(state, *unit, *new_facing)
        }
        GameEffect::DiscardPlayedCards => cards::discard_played_cards(state),
        GameEffect::ResolveRally {
            side,
            burnt_card,
            units_lost_support,
            ..
        } => rally::resolve_rally(state, *side, *burnt_card, units_lost_support),
    }
}

fn apply_choice(choice: &PlayerChoice, state: &mut GameState) -> RulesResult<()> {
    let side = choice.side;
    match &choice.choice {
        Choice::ChooseCard { card } => cards::choose_card(state, side, *card),
        Choice::MoveCommander { to } => commanders::move_commander(state, side, *to),
        Choice::IssueCommand { command } => commands::issue_command(state, side, command.as_ref()),
        Choice::CommitCard { card } => cards::commit_card(state, side, *card),
        Choice::ChooseToRetreat { retreat } => commands::choose_to_retreat(state, *retreat),
        Choice::ChooseRetreatPosition { position } => {
            outcomes::choose_retreat_position(state, *position)
        }
        Choice::ChooseRoutDiscards { cards } => outcomes::choose_rout_discards(state, side, cards),
        Choice::ChooseMelee { location } => melee::choose_melee(state, *location),
        Choice::ChooseRally { perform } => rally::choose_rally(state, *perform),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;
    use crate::core::PlayerSide;
    use crate::scenario::ScenarioBuilder;
    use crate::state::PlayCardsStep;
    use crate::state::PhaseState;

    fn choose(side: PlayerSide, card: u32) -> Event {
        Event::choice(side, Choice::ChooseCard { card: CardId::new(card) })
    }

    #[test]
    fn test_unexpected_event_is_rejected() {
        let (_, state) = ScenarioBuilder::standard().build().unwrap();
        let result = apply_event(&GameEffect::AdvancePhase.into(), &state);
        assert!(matches!(result, Err(RulesError::UnexpectedEvent { .. })));
    }

    #[test]
    fn test_both_cards_chosen_moves_to_reveal() {
        let (_, state) = ScenarioBuilder::standard().build().unwrap();
        let state = apply_event(&choose(PlayerSide::Black, 2), &state).unwrap();
        let state = apply_event(&choose(PlayerSide::White, 13), &state).unwrap();

        assert_eq!(
            state.round_state.current,
            PhaseState::PlayCards(crate::state::PlayCardsPhaseState {
                step: PlayCardsStep::RevealCards
            })
        );
        let state = apply_event(
            &GameEffect::RevealCards {
                initiative: PlayerSide::Black,
            }
            .into(),
            &state,
        )
        .unwrap();
        assert_eq!(state.cards.black.in_play, Some(CardId::new(2)));
        assert_eq!(state.cards.white.in_play, Some(CardId::new(13)));
        assert!(state.round_state.current.is_complete());
    }

    #[test]
    fn test_failed_apply_leaves_input_untouched() {
        let (_, state) = ScenarioBuilder::standard().build().unwrap();
        let before = state.clone();
        // Card 11 is white's; black cannot choose it.
        assert!(apply_event(&choose(PlayerSide::Black, 11), &state).is_err());
        assert_eq!(state, before);
    }
}
