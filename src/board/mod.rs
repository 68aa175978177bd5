//! Board collaborator: coordinates, geometry, occupancy, and derived queries.
//!
//! Geometry is behind the `BoardGeometry` trait so a different board shape
//! can be plugged in without touching the rules. Occupancy (`BoardState`) is
//! part of the game state and is updated only by the event applier.

pub mod coordinate;
pub mod geometry;
pub mod queries;
pub mod state;

pub use coordinate::{Coordinate, UnitFacing, UnitPlacement, UnitWithPlacement};
pub use geometry::{BoardGeometry, SquareGrid};
pub use queries::{classify_engagement, retreat_options, support_count};
pub use state::{BoardState, PlacedUnit, UnitPresence};
