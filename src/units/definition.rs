//! Unit types and unit instances.
//!
//! `UnitType` holds the static stat block for a kind of unit. `UnitInstance`
//! is the value identity of one unit on the board: side + type + instance
//! number. Two equal instances are the same unit; sets of units are
//! deduplicated and searched by value.

use serde::{Deserialize, Serialize};

use crate::core::PlayerSide;

/// Unit type identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitTypeId(pub u16);

impl UnitTypeId {
    /// Create a new unit type ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UnitTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UnitType({})", self.0)
    }
}

/// One unit in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitInstance {
    /// Owning side.
    pub side: PlayerSide,
    /// Unit type.
    pub unit_type: UnitTypeId,
    /// Distinguishes units of the same side and type.
    pub instance: u32,
}

impl UnitInstance {
    /// Create a unit instance.
    #[must_use]
    pub const fn new(side: PlayerSide, unit_type: UnitTypeId, instance: u32) -> Self {
        Self {
            side,
            unit_type,
            instance,
        }
    }
}

impl std::fmt::Display for UnitInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}#{}", self.side, self.unit_type, self.instance)
    }
}

/// Static stats for a unit type.
///
/// The three thresholds are compared against the total attack value of an
/// attack on a unit of this type. `None` means the outcome never happens.
///
/// ```
/// use commander_rules::units::{UnitType, UnitTypeId};
///
/// let archers = UnitType::new(UnitTypeId::new(2), "Archers", 1)
///     .with_ranged_attack(2, 3)
///     .with_thresholds(Some(4), Some(3), Some(2));
///
/// assert!(archers.can_shoot());
/// assert_eq!(archers.rout_threshold, Some(4));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitType {
    /// Identifier.
    pub id: UnitTypeId,
    /// Display name.
    pub name: String,
    /// Base melee attack.
    pub attack: i32,
    /// Base ranged attack, if the unit can shoot.
    pub ranged_attack: Option<i32>,
    /// Maximum ranged attack distance.
    pub range: u32,
    /// Maximum path length of a move.
    pub speed: u32,
    /// Attack value at or above which the unit routs.
    pub rout_threshold: Option<i32>,
    /// Attack value at or above which the unit retreats.
    pub retreat_threshold: Option<i32>,
    /// Attack value at or above which the unit is reversed.
    pub reverse_threshold: Option<i32>,
    /// Cards its owner discards when this unit routs.
    pub rout_penalty: u32,
}

impl UnitType {
    /// Create a melee-only unit type with speed 1 and no thresholds.
    #[must_use]
    pub fn new(id: UnitTypeId, name: impl Into<String>, attack: i32) -> Self {
        Self {
            id,
            name: name.into(),
            attack,
            ranged_attack: None,
            range: 0,
            speed: 1,
            rout_threshold: None,
            retreat_threshold: None,
            reverse_threshold: None,
            rout_penalty: 0,
        }
    }

    /// Give the unit a ranged attack.
    #[must_use]
    pub fn with_ranged_attack(mut self, value: i32, range: u32) -> Self {
        self.ranged_attack = Some(value);
        self.range = range;
        self
    }

    /// Set the movement speed.
    #[must_use]
    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the rout, retreat and reverse thresholds.
    #[must_use]
    pub fn with_thresholds(
        mut self,
        rout: Option<i32>,
        retreat: Option<i32>,
        reverse: Option<i32>,
    ) -> Self {
        self.rout_threshold = rout;
        self.retreat_threshold = retreat;
        self.reverse_threshold = reverse;
        self
    }

    /// Set the rout penalty.
    #[must_use]
    pub fn with_rout_penalty(mut self, penalty: u32) -> Self {
        self.rout_penalty = penalty;
        self
    }

    /// Whether the unit has a ranged attack.
    #[must_use]
    pub fn can_shoot(&self) -> bool {
        self.ranged_attack.is_some()
    }
}
