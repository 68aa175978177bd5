//! Melee between the two units of an engaged space.

use serde::{Deserialize, Serialize};

use super::commitment::Commitment;
use super::outcome::AttackApplyState;
use crate::board::{Coordinate, UnitWithPlacement};
use crate::core::{PlayerSide, SideMap};

/// A melee in progress.
///
/// Both attacks are computed by one event; `attack_apply[side]` is the
/// attack suffered by `units[side]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeleeResolutionState {
    /// Engaged space.
    pub location: Coordinate,
    /// The fighting units.
    pub units: SideMap<UnitWithPlacement>,
    /// Each side's card.
    pub commitments: SideMap<Commitment>,
    /// Attacks suffered, once computed.
    pub attack_apply: Option<SideMap<AttackApplyState>>,
}

impl MeleeResolutionState {
    /// Start a melee.
    #[must_use]
    pub fn new(location: Coordinate, units: SideMap<UnitWithPlacement>) -> Self {
        Self {
            location,
            units,
            commitments: SideMap::default(),
            attack_apply: None,
        }
    }

    /// Side whose attack suffered should be resolved next, initiative first.
    #[must_use]
    pub fn next_to_apply(&self, initiative: PlayerSide) -> Option<PlayerSide> {
        let applies = self.attack_apply.as_ref()?;
        [initiative, initiative.opponent()]
            .into_iter()
            .find(|&side| !applies[side].is_resolved())
    }

    /// Whether nothing remains to do.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.attack_apply.as_ref().is_some_and(|applies| {
            applies.black.is_resolved() && applies.white.is_resolved()
        })
    }
}
