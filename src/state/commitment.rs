//! Card commitments.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{RulesError, RulesResult};

/// A card pledged to a resolution in progress.
///
/// Once completed a commitment never goes back to pending. `card: None`
/// records that the player chose to commit nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Commitment {
    /// Waiting for the player.
    #[default]
    Pending,
    /// Decided.
    Completed {
        /// The committed card, if any.
        card: Option<CardId>,
    },
}

impl Commitment {
    /// Whether the player still has to commit.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Commitment::Pending)
    }

    /// The committed card, if completed with one.
    #[must_use]
    pub fn card(&self) -> Option<CardId> {
        match self {
            Commitment::Pending => None,
            Commitment::Completed { card } => *card,
        }
    }

    /// Complete a pending commitment.
    pub fn complete(&mut self, card: Option<CardId>) -> RulesResult<()> {
        if !self.is_pending() {
            return Err(RulesError::AlreadyCompleted("commitment"));
        }
        *self = Commitment::Completed { card };
        Ok(())
    }
}
