//! Core building blocks: sides, RNG, configuration, errors.
//!
//! Nothing in here knows about phases or events; everything above builds on it.

pub mod config;
pub mod error;
pub mod rng;
pub mod side;

pub use config::RulesConfig;
pub use error::{RulesError, RulesResult};
pub use rng::GameRng;
pub use side::{PlayerSide, SideMap};
