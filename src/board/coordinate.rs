//! Coordinates, facings, and placements.

use serde::{Deserialize, Serialize};

use crate::units::UnitInstance;

/// A board space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// Column.
    pub x: i32,
    /// Row, growing southwards.
    pub y: i32,
}

impl Coordinate {
    /// Create a coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by a delta.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Direction a unit faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitFacing {
    /// Towards decreasing `y`.
    North,
    /// Towards increasing `x`.
    East,
    /// Towards increasing `y`.
    South,
    /// Towards decreasing `x`.
    West,
}

impl UnitFacing {
    /// All four facings, clockwise from north.
    pub const ALL: [UnitFacing; 4] = [
        UnitFacing::North,
        UnitFacing::East,
        UnitFacing::South,
        UnitFacing::West,
    ];

    /// The facing turned 180 degrees.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            UnitFacing::North => UnitFacing::South,
            UnitFacing::East => UnitFacing::West,
            UnitFacing::South => UnitFacing::North,
            UnitFacing::West => UnitFacing::East,
        }
    }

    /// The facing turned 90 degrees counter-clockwise.
    #[must_use]
    pub const fn left(self) -> Self {
        match self {
            UnitFacing::North => UnitFacing::West,
            UnitFacing::East => UnitFacing::North,
            UnitFacing::South => UnitFacing::East,
            UnitFacing::West => UnitFacing::South,
        }
    }

    /// The facing turned 90 degrees clockwise.
    #[must_use]
    pub const fn right(self) -> Self {
        self.left().opposite()
    }

    /// Unit step `(dx, dy)` in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            UnitFacing::North => (0, -1),
            UnitFacing::East => (1, 0),
            UnitFacing::South => (0, 1),
            UnitFacing::West => (-1, 0),
        }
    }
}

/// Where a unit stands and which way it faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitPlacement {
    /// Occupied space.
    pub coordinate: Coordinate,
    /// Facing.
    pub facing: UnitFacing,
}

impl UnitPlacement {
    /// Create a placement.
    #[must_use]
    pub const fn new(coordinate: Coordinate, facing: UnitFacing) -> Self {
        Self { coordinate, facing }
    }
}

/// A unit together with its placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitWithPlacement {
    /// The unit.
    pub unit: UnitInstance,
    /// Its placement.
    pub placement: UnitPlacement,
}

impl UnitWithPlacement {
    /// Create a unit-with-placement.
    #[must_use]
    pub const fn new(unit: UnitInstance, placement: UnitPlacement) -> Self {
        Self { unit, placement }
    }

    /// Shorthand for the unit's coordinate.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        self.placement.coordinate
    }
}
