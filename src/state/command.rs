//! Commands issued in the issue-commands phase and their resolution.

use serde::{Deserialize, Serialize};

use super::commitment::Commitment;
use super::engagement::EngagementState;
use super::outcome::AttackApplyState;
use crate::board::{Coordinate, UnitFacing, UnitWithPlacement};
use crate::units::UnitInstance;

/// An order given to one unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "commandType", rename_all = "camelCase")]
pub enum UnitCommand {
    /// Walk a path of adjacent spaces and end with a facing.
    Move {
        /// Unit to move.
        unit: UnitInstance,
        /// Spaces entered, in order; the last one is the destination.
        path: Vec<Coordinate>,
        /// Facing at the destination.
        facing: UnitFacing,
    },
    /// Shoot at an enemy unit.
    RangedAttack {
        /// Shooting unit.
        unit: UnitInstance,
        /// Target.
        target: UnitInstance,
    },
}

impl UnitCommand {
    /// The commanded unit.
    #[must_use]
    pub fn unit(&self) -> UnitInstance {
        match self {
            UnitCommand::Move { unit, .. } | UnitCommand::RangedAttack { unit, .. } => *unit,
        }
    }
}

/// A move in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementResolutionState {
    /// Moving unit at its starting placement.
    pub moving_unit: UnitWithPlacement,
    /// Spaces entered, in order.
    pub path: Vec<Coordinate>,
    /// Facing at the destination.
    pub facing: UnitFacing,
    /// Mover's card.
    pub commitment: Commitment,
    /// Engagement, when the destination held an enemy.
    pub engagement: Option<EngagementState>,
    /// Set when an unopposed move has been carried out.
    pub completed: bool,
}

impl MovementResolutionState {
    /// Start resolving a move.
    #[must_use]
    pub fn new(moving_unit: UnitWithPlacement, path: Vec<Coordinate>, facing: UnitFacing) -> Self {
        Self {
            moving_unit,
            path,
            facing,
            commitment: Commitment::Pending,
            engagement: None,
            completed: false,
        }
    }

    /// Final space of the path.
    #[must_use]
    pub fn destination(&self) -> Coordinate {
        self.path
            .last()
            .copied()
            .unwrap_or(self.moving_unit.placement.coordinate)
    }

    /// Space the unit entered the destination from.
    #[must_use]
    pub fn approach(&self) -> Coordinate {
        match self.path.len() {
            0 | 1 => self.moving_unit.placement.coordinate,
            n => self.path[n - 2],
        }
    }

    /// Whether nothing remains to do.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match &self.engagement {
            Some(engagement) => engagement.is_resolved(),
            None => self.completed,
        }
    }
}

/// A ranged attack in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangedAttackResolutionState {
    /// Shooting unit.
    pub attacker: UnitWithPlacement,
    /// Target.
    pub defender: UnitWithPlacement,
    /// Attacker's card.
    pub attacker_commitment: Commitment,
    /// Defender's card.
    pub defender_commitment: Commitment,
    /// Application of the computed attack.
    pub attack_apply: Option<AttackApplyState>,
}

impl RangedAttackResolutionState {
    /// Start resolving a ranged attack.
    #[must_use]
    pub fn new(attacker: UnitWithPlacement, defender: UnitWithPlacement) -> Self {
        Self {
            attacker,
            defender,
            attacker_commitment: Commitment::Pending,
            defender_commitment: Commitment::Pending,
            attack_apply: None,
        }
    }

    /// Whether nothing remains to do.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.attack_apply
            .as_ref()
            .is_some_and(AttackApplyState::is_resolved)
    }
}

/// The command currently being resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandResolutionState {
    /// A move.
    Movement(MovementResolutionState),
    /// A ranged attack.
    RangedAttack(RangedAttackResolutionState),
}

impl CommandResolutionState {
    /// Whether nothing remains to do.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match self {
            CommandResolutionState::Movement(movement) => movement.is_resolved(),
            CommandResolutionState::RangedAttack(ranged) => ranged.is_resolved(),
        }
    }
}
