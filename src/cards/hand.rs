//! Per-player card zones.
//!
//! A card is in exactly one zone at a time: in hand, awaiting play (chosen
//! face-down this round), in play (revealed), played (earlier rounds),
//! discarded (committed or discarded as a penalty), or burnt (gone for good).

use im::OrdSet;
use serde::{Deserialize, Serialize};

use super::definition::CardId;
use crate::core::{RulesError, RulesResult};

/// Card zones for one player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCardState {
    /// Cards the player may choose, commit, or discard.
    pub in_hand: OrdSet<CardId>,

    /// Card chosen this round, not yet revealed.
    pub awaiting_play: Option<CardId>,

    /// Card revealed this round.
    pub in_play: Option<CardId>,

    /// Cards played in earlier rounds.
    pub played: OrdSet<CardId>,

    /// Committed and penalty-discarded cards.
    pub discarded: OrdSet<CardId>,

    /// Cards burnt by rallies.
    pub burnt: OrdSet<CardId>,
}

impl PlayerCardState {
    /// Create a card state with the given starting hand.
    #[must_use]
    pub fn with_hand(cards: impl IntoIterator<Item = CardId>) -> Self {
        Self {
            in_hand: cards.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Whether the card is currently in hand.
    #[must_use]
    pub fn has_in_hand(&self, card: CardId) -> bool {
        self.in_hand.contains(&card)
    }

    /// Number of cards in hand.
    #[must_use]
    pub fn hand_size(&self) -> usize {
        self.in_hand.len()
    }

    /// Move a card from hand to awaiting play.
    pub fn choose_for_play(&mut self, card: CardId) -> RulesResult<()> {
        if self.awaiting_play.is_some() {
            return Err(RulesError::CardNotAvailable(format!(
                "{card}: a card is already awaiting play"
            )));
        }
        self.take_from_hand(card)?;
        self.awaiting_play = Some(card);
        Ok(())
    }

    /// Move the awaiting card into play.
    pub fn reveal(&mut self) -> RulesResult<()> {
        let card = self
            .awaiting_play
            .take()
            .ok_or_else(|| RulesError::CardNotAvailable("no card awaiting play".to_string()))?;
        self.in_play = Some(card);
        Ok(())
    }

    /// Move the in-play card onto the played pile.
    pub fn retire_in_play(&mut self) {
        if let Some(card) = self.in_play.take() {
            self.played.insert(card);
        }
    }

    /// Move a card from hand to the discard pile.
    pub fn discard_from_hand(&mut self, card: CardId) -> RulesResult<()> {
        self.take_from_hand(card)?;
        self.discarded.insert(card);
        Ok(())
    }

    /// Burn one played card and return the rest, plus all discards, to hand.
    pub fn rally(&mut self, burnt_card: Option<CardId>) -> RulesResult<()> {
        if let Some(card) = burnt_card {
            if self.played.remove(&card).is_none() {
                return Err(RulesError::CardNotAvailable(format!("{card}: not a played card")));
            }
            self.burnt.insert(card);
        }
        let returned = std::mem::take(&mut self.played).union(std::mem::take(&mut self.discarded));
        self.in_hand = std::mem::take(&mut self.in_hand).union(returned);
        Ok(())
    }

    /// Every card the player still owns (everything but burnt cards).
    pub fn unburnt(&self) -> impl Iterator<Item = CardId> + '_ {
        self.in_hand
            .iter()
            .chain(self.played.iter())
            .chain(self.discarded.iter())
            .copied()
            .chain(self.awaiting_play)
            .chain(self.in_play)
    }

    fn take_from_hand(&mut self, card: CardId) -> RulesResult<()> {
        if self.in_hand.remove(&card).is_none() {
            return Err(RulesError::CardNotAvailable(format!("{card}: not in hand")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<CardId> {
        raw.iter().copied().map(CardId::new).collect()
    }

    #[test]
    fn test_choose_and_reveal() {
        let mut cards = PlayerCardState::with_hand(ids(&[1, 2]));

        cards.choose_for_play(CardId::new(1)).unwrap();
        assert!(!cards.has_in_hand(CardId::new(1)));
        assert_eq!(cards.awaiting_play, Some(CardId::new(1)));

        // Only one card may await play.
        assert!(cards.choose_for_play(CardId::new(2)).is_err());

        cards.reveal().unwrap();
        assert_eq!(cards.awaiting_play, None);
        assert_eq!(cards.in_play, Some(CardId::new(1)));

        cards.retire_in_play();
        assert_eq!(cards.in_play, None);
        assert!(cards.played.contains(&CardId::new(1)));
    }

    #[test]
    fn test_discard_requires_card_in_hand() {
        let mut cards = PlayerCardState::with_hand(ids(&[1]));

        cards.discard_from_hand(CardId::new(1)).unwrap();
        assert!(cards.discarded.contains(&CardId::new(1)));
        assert!(cards.discard_from_hand(CardId::new(1)).is_err());
    }

    #[test]
    fn test_rally_returns_cards_and_burns_one() {
        let mut cards = PlayerCardState::with_hand(ids(&[1]));
        cards.played = ids(&[2, 3]).into_iter().collect();
        cards.discarded = ids(&[4]).into_iter().collect();

        cards.rally(Some(CardId::new(3))).unwrap();

        assert_eq!(cards.in_hand, ids(&[1, 2, 4]).into_iter().collect());
        assert!(cards.played.is_empty());
        assert!(cards.discarded.is_empty());
        assert_eq!(cards.burnt, ids(&[3]).into_iter().collect());
    }

    #[test]
    fn test_rally_rejects_unplayed_burn() {
        let mut cards = PlayerCardState::with_hand(ids(&[1]));
        assert!(cards.rally(Some(CardId::new(1))).is_err());
    }

    #[test]
    fn test_unburnt_covers_every_live_zone() {
        let mut cards = PlayerCardState::with_hand(ids(&[1]));
        cards.awaiting_play = Some(CardId::new(2));
        cards.in_play = Some(CardId::new(3));
        cards.played.insert(CardId::new(4));
        cards.discarded.insert(CardId::new(5));
        cards.burnt.insert(CardId::new(6));

        let mut live: Vec<_> = cards.unburnt().collect();
        live.sort();
        assert_eq!(live, ids(&[1, 2, 3, 4, 5]));
    }
}
