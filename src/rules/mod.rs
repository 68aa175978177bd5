//! The rules core's decision-making layer.
//!
//! - `oracle`: which single event the state waits for
//! - `sequencer`: phase transitions and completion bookkeeping
//! - `validate`: whether a proposed event may be applied
//! - `legal`: enumeration of legal player choices
//! - `engine`: the `RulesEngine` surface and win/loss conditions
//! - `ruleset`: static definitions and configuration
//!
//! The rules core calls into `BoardGeometry` but never does coordinate
//! arithmetic itself.

pub mod engine;
pub mod legal;
pub mod oracle;
pub mod ruleset;
pub mod sequencer;
pub mod validate;

pub use engine::{game_result, GameResult, RulesEngine};
pub use legal::legal_choices;
pub use oracle::expected_event;
pub use ruleset::Ruleset;
pub use sequencer::advance_phase;
pub use validate::{validate_event, ValidationResult};
