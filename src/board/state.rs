//! Board occupancy.
//!
//! A space holds nothing, a single unit, or two engaged enemy units. The
//! engaged shape is its own variant so "two units in one space" can only
//! ever mean an engagement.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::coordinate::{Coordinate, UnitFacing, UnitPlacement, UnitWithPlacement};
use crate::core::{PlayerSide, RulesError, RulesResult, SideMap};
use crate::units::UnitInstance;

/// A unit standing in a space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedUnit {
    /// The unit.
    pub unit: UnitInstance,
    /// Its facing.
    pub facing: UnitFacing,
}

/// What occupies a space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitPresence {
    /// One unit.
    Single(PlacedUnit),
    /// Two enemy units locked in melee. `primary` held the space first.
    Engaged {
        /// The unit that held the space.
        primary: PlacedUnit,
        /// The unit that moved in.
        secondary: PlacedUnit,
    },
}

impl UnitPresence {
    /// Units in the space, primary first.
    pub fn units(&self) -> impl Iterator<Item = PlacedUnit> {
        let (first, second) = match *self {
            UnitPresence::Single(unit) => (unit, None),
            UnitPresence::Engaged { primary, secondary } => (primary, Some(secondary)),
        };
        std::iter::once(first).chain(second)
    }

    /// The unit of a given side in this space.
    #[must_use]
    pub fn unit_of(&self, side: PlayerSide) -> Option<PlacedUnit> {
        self.units().find(|placed| placed.unit.side == side)
    }

    /// Whether this space is an engagement.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        matches!(self, UnitPresence::Engaged { .. })
    }
}

/// Units and commanders on the board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    /// Occupied spaces.
    #[serde(with = "space_entries")]
    pub spaces: OrdMap<Coordinate, UnitPresence>,

    /// Commander positions; `None` once a commander is lost.
    pub commanders: SideMap<Option<Coordinate>>,
}

impl BoardState {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// What occupies a space.
    #[must_use]
    pub fn presence(&self, coordinate: Coordinate) -> Option<&UnitPresence> {
        self.spaces.get(&coordinate)
    }

    /// Whether a space holds no unit.
    #[must_use]
    pub fn is_empty_at(&self, coordinate: Coordinate) -> bool {
        !self.spaces.contains_key(&coordinate)
    }

    /// The unit alone in a space, if the space holds exactly one.
    #[must_use]
    pub fn single_at(&self, coordinate: Coordinate) -> Option<PlacedUnit> {
        match self.presence(coordinate) {
            Some(UnitPresence::Single(unit)) => Some(*unit),
            _ => None,
        }
    }

    /// Locate a unit.
    #[must_use]
    pub fn find_unit(&self, unit: UnitInstance) -> Option<UnitWithPlacement> {
        self.spaces.iter().find_map(|(coordinate, presence)| {
            presence
                .units()
                .find(|placed| placed.unit == unit)
                .map(|placed| {
                    UnitWithPlacement::new(unit, UnitPlacement::new(*coordinate, placed.facing))
                })
        })
    }

    /// Locate a unit, reporting absence as a rules error.
    pub fn require_unit(&self, unit: UnitInstance) -> RulesResult<UnitWithPlacement> {
        self.find_unit(unit)
            .ok_or_else(|| RulesError::UnitNotFound(unit.to_string()))
    }

    /// All units of one side, in board order.
    #[must_use]
    pub fn units_of(&self, side: PlayerSide) -> Vec<UnitWithPlacement> {
        self.spaces
            .iter()
            .flat_map(|(coordinate, presence)| {
                presence
                    .units()
                    .filter(move |placed| placed.unit.side == side)
                    .map(move |placed| {
                        UnitWithPlacement::new(
                            placed.unit,
                            UnitPlacement::new(*coordinate, placed.facing),
                        )
                    })
            })
            .collect()
    }

    /// Spaces currently holding an engagement.
    pub fn engaged_locations(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.spaces
            .iter()
            .filter(|(_, presence)| presence.is_engaged())
            .map(|(coordinate, _)| *coordinate)
    }

    /// Put a unit into an empty space.
    pub fn place(&mut self, unit: UnitWithPlacement) -> RulesResult<()> {
        let coordinate = unit.coordinate();
        if !self.is_empty_at(coordinate) {
            return Err(RulesError::InconsistentState(format!(
                "cannot place {} at occupied {coordinate}",
                unit.unit
            )));
        }
        self.spaces.insert(
            coordinate,
            UnitPresence::Single(PlacedUnit {
                unit: unit.unit,
                facing: unit.placement.facing,
            }),
        );
        Ok(())
    }

    /// Move an engaging unit into a space held by a single enemy.
    pub fn engage(&mut self, engager: UnitWithPlacement) -> RulesResult<()> {
        let coordinate = engager.coordinate();
        let primary = match self.presence(coordinate) {
            Some(UnitPresence::Single(held)) if held.unit.side != engager.unit.side => *held,
            _ => {
                return Err(RulesError::InconsistentState(format!(
                    "{coordinate} is not held by a single enemy of {}",
                    engager.unit
                )))
            }
        };
        self.spaces.insert(
            coordinate,
            UnitPresence::Engaged {
                primary,
                secondary: PlacedUnit {
                    unit: engager.unit,
                    facing: engager.placement.facing,
                },
            },
        );
        Ok(())
    }

    /// Take a unit off the board. An engaged space keeps the other unit.
    pub fn remove_unit(&mut self, unit: UnitInstance) -> RulesResult<UnitPlacement> {
        let found = self.require_unit(unit)?;
        let coordinate = found.coordinate();
        match self.spaces.get(&coordinate).copied() {
            Some(UnitPresence::Engaged { primary, secondary }) => {
                let remaining = if primary.unit == unit { secondary } else { primary };
                self.spaces.insert(coordinate, UnitPresence::Single(remaining));
            }
            _ => {
                self.spaces.remove(&coordinate);
            }
        }
        Ok(found.placement)
    }

    /// Move a unit to an empty space.
    pub fn move_unit(
        &mut self,
        unit: UnitInstance,
        to: Coordinate,
        facing: UnitFacing,
    ) -> RulesResult<()> {
        if !self.is_empty_at(to) {
            return Err(RulesError::InconsistentState(format!(
                "cannot move {unit} into occupied {to}"
            )));
        }
        self.remove_unit(unit)?;
        self.place(UnitWithPlacement::new(unit, UnitPlacement::new(to, facing)))
    }

    /// Turn a unit in place.
    pub fn set_facing(&mut self, unit: UnitInstance, facing: UnitFacing) -> RulesResult<()> {
        let coordinate = self.require_unit(unit)?.coordinate();
        if let Some(presence) = self.spaces.get_mut(&coordinate) {
            match presence {
                UnitPresence::Single(placed) => placed.facing = facing,
                UnitPresence::Engaged { primary, secondary } => {
                    if primary.unit == unit {
                        primary.facing = facing;
                    } else {
                        secondary.facing = facing;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Serializes the space map as a list of entries so non-string keys survive JSON.
mod space_entries {
    use im::OrdMap;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{Coordinate, UnitPresence};

    pub(super) fn serialize<S: Serializer>(
        spaces: &OrdMap<Coordinate, UnitPresence>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(spaces.iter())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<OrdMap<Coordinate, UnitPresence>, D::Error> {
        let entries: Vec<(Coordinate, UnitPresence)> = Vec::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::UnitTypeId;

    fn unit(side: PlayerSide, instance: u32) -> UnitInstance {
        UnitInstance::new(side, UnitTypeId::new(1), instance)
    }

    fn at(unit: UnitInstance, x: i32, y: i32, facing: UnitFacing) -> UnitWithPlacement {
        UnitWithPlacement::new(unit, UnitPlacement::new(Coordinate::new(x, y), facing))
    }

    #[test]
    fn test_place_and_find() {
        let mut board = BoardState::new();
        let black = unit(PlayerSide::Black, 0);
        board.place(at(black, 1, 1, UnitFacing::North)).unwrap();

        assert_eq!(board.find_unit(black), Some(at(black, 1, 1, UnitFacing::North)));
        assert!(board.place(at(unit(PlayerSide::White, 0), 1, 1, UnitFacing::South)).is_err());
    }

    #[test]
    fn test_engage_then_remove_leaves_survivor() {
        let mut board = BoardState::new();
        let black = unit(PlayerSide::Black, 0);
        let white = unit(PlayerSide::White, 0);
        board.place(at(black, 1, 1, UnitFacing::North)).unwrap();
        board.engage(at(white, 1, 1, UnitFacing::South)).unwrap();

        assert!(board.presence(Coordinate::new(1, 1)).unwrap().is_engaged());
        assert_eq!(board.engaged_locations().count(), 1);

        board.remove_unit(black).unwrap();
        assert_eq!(
            board.single_at(Coordinate::new(1, 1)),
            Some(PlacedUnit { unit: white, facing: UnitFacing::South })
        );
        assert_eq!(board.engaged_locations().count(), 0);
    }

    #[test]
    fn test_engage_requires_single_enemy() {
        let mut board = BoardState::new();
        board.place(at(unit(PlayerSide::Black, 0), 1, 1, UnitFacing::North)).unwrap();

        assert!(board.engage(at(unit(PlayerSide::Black, 1), 1, 1, UnitFacing::South)).is_err());
        assert!(board.engage(at(unit(PlayerSide::White, 0), 2, 2, UnitFacing::South)).is_err());
    }

    #[test]
    fn test_move_and_set_facing() {
        let mut board = BoardState::new();
        let black = unit(PlayerSide::Black, 0);
        board.place(at(black, 0, 0, UnitFacing::North)).unwrap();

        board.move_unit(black, Coordinate::new(0, 1), UnitFacing::East).unwrap();
        assert!(board.is_empty_at(Coordinate::new(0, 0)));

        board.set_facing(black, UnitFacing::West).unwrap();
        assert_eq!(board.find_unit(black), Some(at(black, 0, 1, UnitFacing::West)));
    }

    #[test]
    fn test_units_of_side() {
        let mut board = BoardState::new();
        board.place(at(unit(PlayerSide::Black, 0), 0, 0, UnitFacing::North)).unwrap();
        board.place(at(unit(PlayerSide::Black, 1), 1, 0, UnitFacing::North)).unwrap();
        board.place(at(unit(PlayerSide::White, 0), 2, 0, UnitFacing::South)).unwrap();

        assert_eq!(board.units_of(PlayerSide::Black).len(), 2);
        assert_eq!(board.units_of(PlayerSide::White).len(), 1);
    }

    #[test]
    fn test_json_round_trip_with_struct_keys() {
        let mut board = BoardState::new();
        board.place(at(unit(PlayerSide::Black, 0), 3, 4, UnitFacing::North)).unwrap();
        board.commanders.black = Some(Coordinate::new(3, 4));

        let json = serde_json::to_string(&board).unwrap();
        let restored: BoardState = serde_json::from_str(&json).unwrap();
        assert_eq!(board, restored);
    }
}
