//! Event logs and replay.
//!
//! A game is its opening state plus the events applied to it. Because every
//! game effect carries its own outcome (and its seed, for rallies),
//! replaying a log never draws anything new: the same log from the same
//! opening state always reproduces the same state, byte for byte.

use derive_more::{Display, Error};
use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::apply::apply_event;
use crate::core::{RulesError, RulesResult};
use crate::events::Event;
use crate::rules::{validate_event, Ruleset, ValidationResult};
use crate::state::GameState;

/// Ordered record of applied events.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vector<Event>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Number of events recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no event has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events in the order they were applied.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Serialize as a JSON array of events.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a JSON array of events.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl FromIterator<Event> for EventLog {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

/// Why a validated replay stopped.
#[derive(Clone, Debug, PartialEq, Eq, Display, Error)]
pub enum ReplayError {
    /// An event failed validation.
    #[display("event {index} is illegal: {reason}")]
    Illegal {
        /// Position in the log.
        index: usize,
        /// Validation's reason.
        reason: String,
    },
    /// An event could not be applied.
    #[display("event {index} could not be applied: {source}")]
    Rules {
        /// Position in the log.
        index: usize,
        /// The underlying error.
        source: RulesError,
    },
}

/// Apply every event of a log in order.
#[instrument(skip_all, fields(events = log.len()))]
pub fn replay(initial: &GameState, log: &EventLog) -> RulesResult<GameState> {
    let mut state = initial.clone();
    for event in log.iter() {
        state = apply_event(event, &state)?;
    }
    debug!(round = state.round, phase = %state.phase(), "replay finished");
    Ok(state)
}

/// Validate then apply every event of a log in order.
#[instrument(skip_all, fields(events = log.len()))]
pub fn replay_validated(
    ruleset: &Ruleset,
    initial: &GameState,
    log: &EventLog,
) -> Result<GameState, ReplayError> {
    let mut state = initial.clone();
    for (index, event) in log.iter().enumerate() {
        if let ValidationResult::Illegal { reason } = validate_event(ruleset, event, &state) {
            return Err(ReplayError::Illegal { index, reason });
        }
        state = apply_event(event, &state).map_err(|source| ReplayError::Rules { index, source })?;
    }
    debug!(round = state.round, phase = %state.phase(), "validated replay finished");
    Ok(state)
}
