//! Rules configuration.
//!
//! Tunable numbers that are not part of any unit or card definition. Loaded
//! from JSON or built with the builder methods; every field has a default so
//! partial files are accepted.

use serde::{Deserialize, Serialize};

/// Tunable rule parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// How far (board distance) a commander may move in the move-commanders phase.
    pub commander_move_range: u32,

    /// Maximum support a single attack can receive from units lined up behind it.
    pub max_support: u32,

    /// Attack bonus for a unit attacking from its commander's space.
    pub commander_attack_bonus: i32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            commander_move_range: 2,
            max_support: 2,
            commander_attack_bonus: 1,
        }
    }
}

impl RulesConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the commander move range.
    #[must_use]
    pub fn with_commander_move_range(mut self, range: u32) -> Self {
        self.commander_move_range = range;
        self
    }

    /// Set the support cap.
    #[must_use]
    pub fn with_max_support(mut self, max: u32) -> Self {
        self.max_support = max;
        self
    }

    /// Set the commander attack bonus.
    #[must_use]
    pub fn with_commander_attack_bonus(mut self, bonus: i32) -> Self {
        self.commander_attack_bonus = bonus;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = RulesConfig::new()
            .with_commander_move_range(3)
            .with_max_support(1)
            .with_commander_attack_bonus(0);

        assert_eq!(config.commander_move_range, 3);
        assert_eq!(config.max_support, 1);
        assert_eq!(config.commander_attack_bonus, 0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RulesConfig::from_json(r#"{ "max_support": 4 }"#).unwrap();

        assert_eq!(config.max_support, 4);
        assert_eq!(config.commander_move_range, 2);
        assert_eq!(config.commander_attack_bonus, 1);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(RulesConfig::from_json("{ max_support: }").is_err());
    }
}
