//! Rally during cleanup.

use im::OrdSet;
use serde::{Deserialize, Serialize};

use super::outcome::RoutState;
use crate::units::UnitInstance;

/// One player's rally decision and its consequences.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RallyResolutionState {
    /// The player chose to rally.
    pub perform_rally: bool,
    /// The rally's card movements have happened.
    pub rally_resolved: bool,
    /// Units whose type no longer has a supporting card.
    pub units_lost_support: Option<OrdSet<UnitInstance>>,
    /// Rout of those units.
    pub rout: Option<RoutState>,
}

impl RallyResolutionState {
    /// Record the player's decision.
    #[must_use]
    pub fn new(perform_rally: bool) -> Self {
        Self {
            perform_rally,
            rally_resolved: false,
            units_lost_support: None,
            rout: None,
        }
    }

    /// Whether nothing remains to do.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        if !self.perform_rally {
            return true;
        }
        self.rally_resolved && self.rout.as_ref().map_or(true, |rout| rout.completed)
    }
}
