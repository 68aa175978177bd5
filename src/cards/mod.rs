//! Card system: definitions, registry, and per-player card zones.
//!
//! ## Key Types
//!
//! - `CardId`: Value identity for a card
//! - `CardDefinition`: Static card data (initiative, command size, modifiers)
//! - `CardRegistry`: Card definition lookup
//! - `PlayerCardState`: Where each of a player's cards currently is

pub mod definition;
pub mod hand;
pub mod registry;

pub use definition::{CardDefinition, CardId, CardModifier};
pub use hand::PlayerCardState;
pub use registry::CardRegistry;
