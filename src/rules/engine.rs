//! Rules engine trait and game results.
//!
//! `RulesEngine` is the surface an orchestrator drives:
//! - What event comes next
//! - Whether a proposed event is legal
//! - How effects are generated and events applied
//! - Win/loss conditions

use serde::{Deserialize, Serialize};

use super::legal::legal_choices;
use super::oracle::expected_event;
use super::ruleset::Ruleset;
use super::validate::{validate_event, ValidationResult};
use crate::apply::apply_event;
use crate::core::{PlayerSide, RulesResult, SideMap};
use crate::events::{ExpectedEventInfo, Event, GameEffect};
use crate::procedures::generate_game_effect;
use crate::state::{GameState, PhaseState, PlayCardsStep};

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerSide),
    /// Both sides lost at once.
    Draw,
}

impl GameResult {
    /// Check if a side won.
    #[must_use]
    pub fn is_winner(&self, side: PlayerSide) -> bool {
        match self {
            GameResult::Winner(winner) => *winner == side,
            GameResult::Draw => false,
        }
    }
}

/// Whether the game is over.
///
/// A side has lost when its commander is lost, when it has no units left
/// on the board, or when it has to choose a card with an empty hand.
#[must_use]
pub fn game_result(state: &GameState) -> Option<GameResult> {
    let lost = SideMap::new(|side| has_lost(state, side));
    match (lost.black, lost.white) {
        (false, false) => None,
        (true, false) => Some(GameResult::Winner(PlayerSide::White)),
        (false, true) => Some(GameResult::Winner(PlayerSide::Black)),
        (true, true) => Some(GameResult::Draw),
    }
}

fn has_lost(state: &GameState, side: PlayerSide) -> bool {
    let cards = &state.cards[side];
    let must_choose = matches!(
        &state.round_state.current,
        PhaseState::PlayCards(phase) if phase.step == PlayCardsStep::ChooseCards
    ) && cards.awaiting_play.is_none();

    state.commander_lost(side)
        || state.board.units_of(side).is_empty()
        || (must_choose && cards.hand_size() == 0)
}

/// Rules engine trait.
///
/// The orchestrator loop is: ask [`expected_event`](RulesEngine::expected_event);
/// for a game effect call [`generate`](RulesEngine::generate), for a player
/// choice collect one from the player; [`validate`](RulesEngine::validate);
/// then [`apply`](RulesEngine::apply).
///
/// ## Implementation Notes
///
/// - `apply` must be deterministic: replaying the same events from the same
///   state yields the same state
/// - `is_terminal`: Return None if the game continues
pub trait RulesEngine {
    /// The event the state waits for.
    fn expected_event(&self, state: &GameState) -> RulesResult<ExpectedEventInfo>;

    /// Whether an event may be applied.
    fn validate(&self, event: &Event, state: &GameState) -> ValidationResult;

    /// Compute the pending game effect.
    fn generate(&self, state: &GameState, seed: u64) -> RulesResult<GameEffect>;

    /// Apply an event, returning the successor state.
    fn apply(&self, event: &Event, state: &GameState) -> RulesResult<GameState>;

    /// Every legal player choice; empty while a game effect is pending.
    fn legal_choices(&self, state: &GameState) -> RulesResult<Vec<Event>>;

    /// Check if the game is over.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;

    // === Convenience Methods ===

    /// Generate the pending effect, or `None` while a player has to choose.
    fn next_effect(&self, state: &GameState, seed: u64) -> RulesResult<Option<Event>> {
        match self.expected_event(state)? {
            ExpectedEventInfo::GameEffect { .. } => Ok(Some(self.generate(state, seed)?.into())),
            ExpectedEventInfo::PlayerChoice { .. } => Ok(None),
        }
    }
}

impl RulesEngine for Ruleset {
    fn expected_event(&self, state: &GameState) -> RulesResult<ExpectedEventInfo> {
        expected_event(state)
    }

    fn validate(&self, event: &Event, state: &GameState) -> ValidationResult {
        validate_event(self, event, state)
    }

    fn generate(&self, state: &GameState, seed: u64) -> RulesResult<GameEffect> {
        generate_game_effect(self, state, seed)
    }

    fn apply(&self, event: &Event, state: &GameState) -> RulesResult<GameState> {
        apply_event(event, state)
    }

    fn legal_choices(&self, state: &GameState) -> RulesResult<Vec<Event>> {
        legal_choices(self, state)
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        game_result(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioBuilder;
    use crate::units::UnitInstance;

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(PlayerSide::White);
        assert!(!result.is_winner(PlayerSide::Black));
        assert!(result.is_winner(PlayerSide::White));

        let draw = GameResult::Draw;
        assert!(!draw.is_winner(PlayerSide::Black));
        assert!(!draw.is_winner(PlayerSide::White));
    }

    #[test]
    fn test_fresh_game_is_not_terminal() {
        let (ruleset, state) = ScenarioBuilder::standard().build().unwrap();
        assert_eq!(ruleset.is_terminal(&state), None);
        assert!(ruleset.next_effect(&state, 0).unwrap().is_none());
    }

    #[test]
    fn test_losing_conditions() {
        let (_, state) = ScenarioBuilder::standard().build().unwrap();

        let mut commander_lost = state.clone();
        commander_lost.commanders_lost.insert(PlayerSide::Black);
        assert_eq!(game_result(&commander_lost), Some(GameResult::Winner(PlayerSide::White)));

        let mut wiped_out = state.clone();
        let white_units: Vec<UnitInstance> = wiped_out
            .board
            .units_of(PlayerSide::White)
            .into_iter()
            .map(|placed| placed.unit)
            .collect();
        for unit in white_units {
            wiped_out.board.remove_unit(unit).unwrap();
        }
        assert_eq!(game_result(&wiped_out), Some(GameResult::Winner(PlayerSide::Black)));

        let mut empty_hands = state;
        empty_hands.cards.black.in_hand.clear();
        empty_hands.cards.white.in_hand.clear();
        assert_eq!(game_result(&empty_hands), Some(GameResult::Draw));
    }
}
