//! Unit data: type stat blocks, instances, and the type registry.

pub mod definition;
pub mod registry;

pub use definition::{UnitInstance, UnitType, UnitTypeId};
pub use registry::UnitRegistry;
