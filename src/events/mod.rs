//! Events: game effects, player choices, and their discriminators.

pub mod event;
pub mod kind;

pub use event::{Choice, Event, GameEffect, PlayerChoice};
pub use kind::{ChoiceType, EffectType, ExpectedEventInfo};
