//! Unit type registry.

use rustc_hash::FxHashMap;

use super::definition::{UnitType, UnitTypeId};
use crate::core::{RulesError, RulesResult};

/// Registry of unit type stat blocks.
#[derive(Clone, Debug, Default)]
pub struct UnitRegistry {
    types: FxHashMap<UnitTypeId, UnitType>,
}

impl UnitRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit type.
    ///
    /// Panics if the ID is already registered.
    pub fn register(&mut self, unit_type: UnitType) {
        if self.types.contains_key(&unit_type.id) {
            panic!("Unit type {:?} already registered", unit_type.id);
        }
        self.types.insert(unit_type.id, unit_type);
    }

    /// Get a unit type by ID.
    #[must_use]
    pub fn get(&self, id: UnitTypeId) -> Option<&UnitType> {
        self.types.get(&id)
    }

    /// Get a unit type, reporting a missing one as a rules error.
    pub fn require(&self, id: UnitTypeId) -> RulesResult<&UnitType> {
        self.get(id)
            .ok_or_else(|| RulesError::UnknownDefinition(format!("{id}")))
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_require() {
        let mut registry = UnitRegistry::new();
        registry.register(UnitType::new(UnitTypeId::new(1), "Infantry", 2));

        assert_eq!(registry.require(UnitTypeId::new(1)).unwrap().attack, 2);
        assert!(registry.require(UnitTypeId::new(2)).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_panics() {
        let mut registry = UnitRegistry::new();
        registry.register(UnitType::new(UnitTypeId::new(1), "A", 1));
        registry.register(UnitType::new(UnitTypeId::new(1), "B", 1));
    }
}
