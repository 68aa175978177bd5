//! Card definitions - static card data.
//!
//! A `CardDefinition` is the immutable data behind a `CardId`: its
//! initiative, how many units it lets its player command, the modifiers it
//! contributes when committed or in play, and which unit types it supports.
//!
//! Game state only ever stores `CardId`s; definitions are looked up through
//! the [`CardRegistry`](super::CardRegistry).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::units::UnitTypeId;

/// Unique identifier for a card.
///
/// Cards are identified by value: two equal ids are the same card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A numeric effect a card has on attacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardModifier {
    /// Added to melee and engagement attack values.
    Attack(i32),
    /// Added to ranged attack values.
    RangedAttack(i32),
    /// Subtracted from attacks against the committing player's unit.
    Defense(i32),
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use commander_rules::cards::{CardDefinition, CardId, CardModifier};
///
/// let charge = CardDefinition::new(CardId::new(1), "Charge")
///     .with_initiative(3)
///     .with_command_size(2)
///     .with_modifier(CardModifier::Attack(2));
///
/// assert_eq!(charge.attack_bonus(false), 2);
/// assert_eq!(charge.attack_bonus(true), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card.
    pub id: CardId,

    /// Card name (for display/debugging).
    pub name: String,

    /// Initiative value; the higher revealed card takes the initiative.
    pub initiative: u32,

    /// Number of units its player may command while the card is in play.
    pub command_size: u32,

    /// Modifiers applied while committed or in play.
    pub modifiers: SmallVec<[CardModifier; 2]>,

    /// Unit types this card keeps supplied. Burning the last card supporting a
    /// type routs that type's units.
    pub supported_unit_types: SmallVec<[UnitTypeId; 2]>,
}

impl CardDefinition {
    /// Create a new card definition with command size 1 and no modifiers.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            initiative: 0,
            command_size: 1,
            modifiers: SmallVec::new(),
            supported_unit_types: SmallVec::new(),
        }
    }

    /// Set the initiative value.
    #[must_use]
    pub fn with_initiative(mut self, initiative: u32) -> Self {
        self.initiative = initiative;
        self
    }

    /// Set the command size.
    #[must_use]
    pub fn with_command_size(mut self, command_size: u32) -> Self {
        self.command_size = command_size;
        self
    }

    /// Add a modifier.
    #[must_use]
    pub fn with_modifier(mut self, modifier: CardModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Mark a unit type as supported by this card.
    #[must_use]
    pub fn supporting(mut self, unit_type: UnitTypeId) -> Self {
        self.supported_unit_types.push(unit_type);
        self
    }

    /// Total attack bonus for a melee (`ranged == false`) or ranged attack.
    #[must_use]
    pub fn attack_bonus(&self, ranged: bool) -> i32 {
        self.modifiers
            .iter()
            .map(|modifier| match (modifier, ranged) {
                (CardModifier::Attack(value), false) | (CardModifier::RangedAttack(value), true) => {
                    *value
                }
                _ => 0,
            })
            .sum()
    }

    /// Total defence bonus.
    #[must_use]
    pub fn defense_bonus(&self) -> i32 {
        self.modifiers
            .iter()
            .map(|modifier| match modifier {
                CardModifier::Defense(value) => *value,
                _ => 0,
            })
            .sum()
    }

    /// Whether this card supports the given unit type.
    #[must_use]
    pub fn supports(&self, unit_type: UnitTypeId) -> bool {
        self.supported_unit_types.contains(&unit_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_modifier_sums() {
        let card = CardDefinition::new(CardId::new(1), "Volley")
            .with_modifier(CardModifier::RangedAttack(2))
            .with_modifier(CardModifier::RangedAttack(1))
            .with_modifier(CardModifier::Defense(1));

        assert_eq!(card.attack_bonus(true), 3);
        assert_eq!(card.attack_bonus(false), 0);
        assert_eq!(card.defense_bonus(), 1);
    }

    #[test]
    fn test_supports() {
        let card = CardDefinition::new(CardId::new(2), "Supply").supporting(UnitTypeId::new(3));

        assert!(card.supports(UnitTypeId::new(3)));
        assert!(!card.supports(UnitTypeId::new(4)));
    }

    #[test]
    fn test_card_definition_serialization() {
        let card = CardDefinition::new(CardId::new(1), "Test")
            .with_initiative(2)
            .with_modifier(CardModifier::Attack(1));

        let json = serde_json::to_string(&card).unwrap();
        let deserialized: CardDefinition = serde_json::from_str(&json).unwrap();

        assert_eq!(card, deserialized);
    }
}
