//! # commander-rules
//!
//! Rules core for a two-player card-and-board wargame, built as an
//! event-sourced state machine.
//!
//! ## Design Principles
//!
//! 1. **Events Are the Only Input**: The game state changes only by applying
//!    validated events. A game is fully described by its opening state and
//!    its event log.
//!
//! 2. **One Event at a Time**: At any moment the state waits for exactly one
//!    event, either a game effect the rules compute or a choice one player
//!    makes. The oracle names it; the applier accepts nothing else.
//!
//! 3. **Pure Transitions**: Applying an event returns a new state and leaves
//!    the old one untouched. Persistent collections from `im-rs` make this
//!    cheap: unchanged parts are shared, not copied.
//!
//! ## Orchestration
//!
//! ```text
//! loop {
//!     expected_event(state)          -> game effect or player choice
//!     generate_game_effect(..)       (game effect: computed here)
//!     validate_event(..)             -> Legal | Illegal
//!     apply_event(event, state)      -> successor state
//! }
//! ```
//!
//! ## Modules
//!
//! - `core`: Sides, RNG, configuration, errors
//! - `cards`: Card definitions, registry and per-player card zones
//! - `units`: Unit type stats and instances
//! - `board`: Geometry, occupancy and derived board queries
//! - `state`: Game state and nested resolution states
//! - `events`: Event records and their wire format
//! - `rules`: Oracle, sequencer, validation, legal choices, engine trait
//! - `procedures`: Effect generators and attack computation
//! - `apply`: The event applier
//! - `replay`: Event logs and deterministic replay
//! - `scenario`: Ruleset and opening-state construction

pub mod apply;
pub mod board;
pub mod cards;
pub mod core;
pub mod events;
pub mod procedures;
pub mod replay;
pub mod rules;
pub mod scenario;
pub mod state;
pub mod units;

// Re-export commonly used types
pub use crate::core::{GameRng, PlayerSide, RulesConfig, RulesError, RulesResult, SideMap};

pub use crate::board::{
    BoardGeometry, BoardState, Coordinate, SquareGrid, UnitFacing, UnitPlacement,
    UnitWithPlacement,
};

pub use crate::cards::{CardDefinition, CardId, CardModifier, CardRegistry, PlayerCardState};

pub use crate::units::{UnitInstance, UnitRegistry, UnitType, UnitTypeId};

pub use crate::state::{GameState, PhaseKind, PhaseState, RoundState};

pub use crate::events::{Choice, ChoiceType, EffectType, Event, ExpectedEventInfo, GameEffect, PlayerChoice};

pub use crate::rules::{
    expected_event, game_result, legal_choices, validate_event, GameResult, Ruleset, RulesEngine,
    ValidationResult,
};

pub use crate::procedures::generate_game_effect;

pub use crate::apply::apply_event;

pub use crate::replay::{replay, replay_validated, EventLog, ReplayError};

pub use crate::scenario::ScenarioBuilder;
