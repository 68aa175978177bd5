//! Root game state.
//!
//! ## GameState
//!
//! The single authoritative value the rules core advances. Every collection
//! inside is persistent (`im`), so cloning is cheap and the applier can
//! return a new state whose untouched subtrees still share memory with the
//! input.
//!
//! ## RoundState
//!
//! The current round's progress: which phases have finished and the one
//! phase in flight.

use im::OrdSet;
use serde::{Deserialize, Serialize};

use super::phase::{PhaseKind, PhaseState, PlayCardsPhaseState, PlayCardsStep};
use crate::board::BoardState;
use crate::cards::PlayerCardState;
use crate::core::{PlayerSide, SideMap};
use crate::units::UnitInstance;

/// Progress through the current round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    /// Phases finished this round.
    pub completed_phases: OrdSet<PhaseKind>,
    /// The phase in flight.
    pub current: PhaseState,
}

impl RoundState {
    /// A fresh round, waiting for cards to be chosen.
    #[must_use]
    pub fn start() -> Self {
        Self {
            completed_phases: OrdSet::new(),
            current: PhaseState::PlayCards(PlayCardsPhaseState {
                step: PlayCardsStep::ChooseCards,
            }),
        }
    }
}

/// Complete game state.
///
/// ## Example
///
/// ```
/// use commander_rules::board::BoardState;
/// use commander_rules::cards::{CardId, PlayerCardState};
/// use commander_rules::core::{PlayerSide, SideMap};
/// use commander_rules::state::{GameState, PhaseKind};
///
/// let cards = SideMap::new(|_| PlayerCardState::with_hand([CardId::new(1)]));
/// let state = GameState::new(BoardState::new(), cards, PlayerSide::Black);
///
/// assert_eq!(state.round, 1);
/// assert_eq!(state.phase(), PhaseKind::PlayCards);
/// assert_eq!(state.second_player(), PlayerSide::White);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Round number, starting at 1.
    pub round: u32,

    /// Progress through the current round.
    pub round_state: RoundState,

    /// Side holding the initiative. It acts first wherever order matters.
    pub initiative: PlayerSide,

    /// Units and commanders.
    pub board: BoardState,

    /// Card zones per side.
    pub cards: SideMap<PlayerCardState>,

    /// Units removed by routs.
    pub routed_units: OrdSet<UnitInstance>,

    /// Sides whose commander has been lost.
    pub commanders_lost: OrdSet<PlayerSide>,
}

impl GameState {
    /// Create the state at the start of round 1.
    #[must_use]
    pub fn new(board: BoardState, cards: SideMap<PlayerCardState>, initiative: PlayerSide) -> Self {
        Self {
            round: 1,
            round_state: RoundState::start(),
            initiative,
            board,
            cards,
            routed_units: OrdSet::new(),
            commanders_lost: OrdSet::new(),
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> PhaseKind {
        self.round_state.current.kind()
    }

    /// The side that acts first (the initiative side).
    #[must_use]
    pub fn first_player(&self) -> PlayerSide {
        self.initiative
    }

    /// The side that acts second.
    #[must_use]
    pub fn second_player(&self) -> PlayerSide {
        self.initiative.opponent()
    }

    /// Whether a side's commander is gone.
    #[must_use]
    pub fn commander_lost(&self, side: PlayerSide) -> bool {
        self.commanders_lost.contains(&side)
    }

    /// Canonical binary encoding, for comparing states bit for bit.
    pub fn snapshot_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;

    fn state() -> GameState {
        let cards = SideMap::new(|side| match side {
            PlayerSide::Black => PlayerCardState::with_hand([CardId::new(1), CardId::new(2)]),
            PlayerSide::White => PlayerCardState::with_hand([CardId::new(3)]),
        });
        GameState::new(BoardState::new(), cards, PlayerSide::White)
    }

    #[test]
    fn test_new_state_starts_choosing_cards() {
        let state = state();
        assert_eq!(state.round, 1);
        assert_eq!(
            state.round_state.current,
            PhaseState::PlayCards(PlayCardsPhaseState {
                step: PlayCardsStep::ChooseCards
            })
        );
        assert!(state.round_state.completed_phases.is_empty());
        assert_eq!(state.first_player(), PlayerSide::White);
        assert_eq!(state.second_player(), PlayerSide::Black);
    }

    #[test]
    fn test_snapshot_is_stable_across_clones() {
        let state = state();
        let copy = state.clone();
        assert_eq!(state.snapshot_bytes().unwrap(), copy.snapshot_bytes().unwrap());
    }

    #[test]
    fn test_json_round_trip() {
        let state = state();
        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, restored);
    }
}
