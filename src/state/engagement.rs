//! Engagements: a moving unit entering a space held by an enemy.

use im::OrdSet;
use serde::{Deserialize, Serialize};

use super::commitment::Commitment;
use super::outcome::{RetreatState, RoutState};
use crate::board::{Coordinate, UnitWithPlacement};

/// How the engaging unit struck the defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EngagementType {
    /// From the defender's front.
    Front,
    /// From the defender's side.
    Flank,
    /// From behind.
    Rear,
}

impl std::fmt::Display for EngagementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngagementType::Front => write!(f, "front"),
            EngagementType::Flank => write!(f, "flank"),
            EngagementType::Rear => write!(f, "rear"),
        }
    }
}

/// Whether a front-engaged defender may fall back, and where to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetreatEligibility {
    /// The defender may retreat.
    pub eligible: bool,
    /// Destinations, frozen at the time of the check.
    pub legal_retreat_options: OrdSet<Coordinate>,
}

/// Front engagement. Fields fill in strictly in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontEngagementState {
    /// Defender's card.
    pub defensive_commitment: Commitment,
    /// Result of the eligibility check.
    pub retreat_eligibility: Option<RetreatEligibility>,
    /// Defender's decision.
    pub retreat_choice: Option<bool>,
    /// Retreat in progress.
    pub retreat: Option<RetreatState>,
}

impl FrontEngagementState {
    /// Whether nothing remains to do.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match (&self.retreat_eligibility, self.retreat_choice, &self.retreat) {
            (Some(eligibility), _, _) if !eligibility.eligible => true,
            (_, Some(false), _) => true,
            (_, _, Some(retreat)) => retreat.is_resolved(),
            _ => false,
        }
    }
}

/// Type-specific resolution of an engagement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementResolutionState {
    /// Front engagement.
    Front(FrontEngagementState),
    /// Flank engagement: the defender turns to meet the attacker.
    Flank {
        /// Whether the defender has turned.
        defender_rotated: bool,
    },
    /// Rear engagement: the defender routs.
    Rear {
        /// The defender's rout.
        rout: RoutState,
    },
}

impl EngagementResolutionState {
    /// The engagement type this resolution belongs to.
    #[must_use]
    pub fn engagement_type(&self) -> EngagementType {
        match self {
            EngagementResolutionState::Front(_) => EngagementType::Front,
            EngagementResolutionState::Flank { .. } => EngagementType::Flank,
            EngagementResolutionState::Rear { .. } => EngagementType::Rear,
        }
    }
}

/// An engagement in progress.
///
/// The type is fixed at creation: the resolution enum is only ever replaced
/// by a value of the same variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementState {
    /// Moving unit, placed in the contested space.
    pub engaging_unit: UnitWithPlacement,
    /// Unit that held the space.
    pub defending_unit: UnitWithPlacement,
    /// Type-specific progress.
    pub resolution: EngagementResolutionState,
}

impl EngagementState {
    /// Start an engagement of the given type.
    #[must_use]
    pub fn new(
        engaging_unit: UnitWithPlacement,
        defending_unit: UnitWithPlacement,
        engagement_type: EngagementType,
    ) -> Self {
        let resolution = match engagement_type {
            EngagementType::Front => {
                EngagementResolutionState::Front(FrontEngagementState::default())
            }
            EngagementType::Flank => EngagementResolutionState::Flank {
                defender_rotated: false,
            },
            EngagementType::Rear => EngagementResolutionState::Rear {
                rout: RoutState::new(
                    defending_unit.unit.side,
                    OrdSet::unit(defending_unit.unit),
                ),
            },
        };
        Self {
            engaging_unit,
            defending_unit,
            resolution,
        }
    }

    /// Whether nothing remains to do.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match &self.resolution {
            EngagementResolutionState::Front(front) => front.is_resolved(),
            EngagementResolutionState::Flank { defender_rotated } => *defender_rotated,
            EngagementResolutionState::Rear { rout } => rout.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{UnitFacing, UnitPlacement};
    use crate::core::PlayerSide;
    use crate::units::{UnitInstance, UnitTypeId};

    fn placed(side: PlayerSide, facing: UnitFacing) -> UnitWithPlacement {
        UnitWithPlacement::new(
            UnitInstance::new(side, UnitTypeId::new(1), 0),
            UnitPlacement::new(Coordinate::new(1, 1), facing),
        )
    }

    #[test]
    fn test_rear_engagement_starts_a_rout_of_the_defender() {
        let defender = placed(PlayerSide::White, UnitFacing::North);
        let engagement = EngagementState::new(
            placed(PlayerSide::Black, UnitFacing::North),
            defender,
            EngagementType::Rear,
        );

        match &engagement.resolution {
            EngagementResolutionState::Rear { rout } => {
                assert_eq!(rout.player, PlayerSide::White);
                assert!(rout.units.contains(&defender.unit));
            }
            other => panic!("expected rear resolution, got {other:?}"),
        }
        assert_eq!(engagement.resolution.engagement_type(), EngagementType::Rear);
        assert!(!engagement.is_resolved());
    }

    #[test]
    fn test_front_resolution_conditions() {
        let mut front = FrontEngagementState::default();
        assert!(!front.is_resolved());

        front.retreat_eligibility = Some(RetreatEligibility {
            eligible: false,
            legal_retreat_options: OrdSet::new(),
        });
        assert!(front.is_resolved());

        front.retreat_eligibility = Some(RetreatEligibility {
            eligible: true,
            legal_retreat_options: OrdSet::unit(Coordinate::new(0, 0)),
        });
        assert!(!front.is_resolved());

        front.retreat_choice = Some(false);
        assert!(front.is_resolved());
    }
}
