//! Card registry for definition lookup.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId};
use crate::core::{RulesError, RulesResult};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use commander_rules::cards::{CardRegistry, CardDefinition, CardId};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDefinition::new(CardId::new(1), "Advance").with_command_size(2));
///
/// let found = registry.get(CardId::new(1)).unwrap();
/// assert_eq!(found.command_size, 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        self.cards.insert(card.id, card);
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Get a card definition, reporting a missing one as a rules error.
    pub fn require(&self, id: CardId) -> RulesResult<&CardDefinition> {
        self.get(id)
            .ok_or_else(|| RulesError::UnknownDefinition(format!("{id}")))
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new(CardId::new(1), "Test Card"));

        assert_eq!(registry.get(CardId::new(1)).unwrap().name, "Test Card");
        assert!(registry.get(CardId::new(99)).is_none());
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_require_missing() {
        let registry = CardRegistry::new();
        let err = registry.require(CardId::new(5)).unwrap_err();
        assert_eq!(err, RulesError::UnknownDefinition("Card(5)".to_string()));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_id_panics() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new(CardId::new(1), "Card A"));
        registry.register(CardDefinition::new(CardId::new(1), "Card B"));
    }
}
