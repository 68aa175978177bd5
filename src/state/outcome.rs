//! Attack outcomes and their sub-resolutions: rout, retreat, reverse.
//!
//! `AttackApplyState` carries at most one outcome. The outcome is an enum
//! rather than three optional fields, so "routed and retreating at once"
//! cannot be represented.

use im::OrdSet;
use serde::{Deserialize, Serialize};

use crate::board::{Coordinate, UnitPlacement, UnitWithPlacement};
use crate::core::{PlayerSide, RulesError, RulesResult};
use crate::units::UnitInstance;

/// Removal of one or more units, paid for with discards.
///
/// Lifecycle: created with `number_to_discard: None`, the penalty is computed,
/// the player chooses discards, then the rout completes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutState {
    /// Player whose units rout.
    pub player: PlayerSide,
    /// Units being routed.
    pub units: OrdSet<UnitInstance>,
    /// Sum of the routed units' rout penalties, once computed.
    pub number_to_discard: Option<u32>,
    /// Whether the discards have been chosen.
    pub cards_chosen: bool,
    /// Whether the units have left the board.
    pub completed: bool,
}

impl RoutState {
    /// Start a rout.
    #[must_use]
    pub fn new(player: PlayerSide, units: OrdSet<UnitInstance>) -> Self {
        Self {
            player,
            units,
            number_to_discard: None,
            cards_chosen: false,
            completed: false,
        }
    }

    /// Reject a rout whose flags contradict its lifecycle.
    pub fn check_consistent(&self) -> RulesResult<()> {
        if self.cards_chosen && self.number_to_discard.is_none() {
            return Err(contradiction("rout discards chosen before the penalty"));
        }
        if self.completed && !self.cards_chosen {
            return Err(contradiction("rout completed before its discards"));
        }
        Ok(())
    }
}

/// A unit falling back to an adjacent space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetreatState {
    /// Retreating unit and where it stood.
    pub unit: UnitWithPlacement,
    /// Legal destinations, fixed when the retreat was created.
    pub legal_retreat_options: OrdSet<Coordinate>,
    /// Chosen destination.
    pub final_position: Option<Coordinate>,
    /// Rout replacing the retreat when no destination exists.
    pub rout: Option<RoutState>,
    /// Whether the unit has moved.
    pub completed: bool,
}

impl RetreatState {
    /// Start a retreat.
    ///
    /// With no legal destination the unit routs instead; with exactly one the
    /// destination is chosen immediately.
    #[must_use]
    pub fn new(unit: UnitWithPlacement, legal_retreat_options: OrdSet<Coordinate>) -> Self {
        let rout = legal_retreat_options
            .is_empty()
            .then(|| RoutState::new(unit.unit.side, OrdSet::unit(unit.unit)));
        let final_position = if legal_retreat_options.len() == 1 {
            legal_retreat_options.get_min().copied()
        } else {
            None
        };
        Self {
            unit,
            legal_retreat_options,
            final_position,
            rout,
            completed: false,
        }
    }

    /// Whether nothing remains to do.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match &self.rout {
            Some(rout) => rout.completed,
            None => self.completed,
        }
    }

    /// Reject a retreat whose flags contradict its lifecycle.
    pub fn check_consistent(&self) -> RulesResult<()> {
        match &self.rout {
            Some(_) if self.completed || self.final_position.is_some() => {
                Err(contradiction("retreat both moved and routed"))
            }
            Some(rout) => rout.check_consistent(),
            None if self.completed && self.final_position.is_none() => {
                Err(contradiction("retreat completed without a destination"))
            }
            None => Ok(()),
        }
    }
}

/// A unit turned to face the opposite way.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseState {
    /// Reversing unit and its placement before turning.
    pub unit: UnitWithPlacement,
    /// Placement after turning.
    pub final_position: Option<UnitPlacement>,
    /// Whether the turn has happened.
    pub completed: bool,
}

impl ReverseState {
    /// Start a reverse.
    #[must_use]
    pub fn new(unit: UnitWithPlacement) -> Self {
        Self {
            unit,
            final_position: None,
            completed: false,
        }
    }

    /// Reject a reverse marked done without its new placement.
    pub fn check_consistent(&self) -> RulesResult<()> {
        if self.completed && self.final_position.is_none() {
            return Err(contradiction("reverse completed without a new facing"));
        }
        Ok(())
    }
}

/// The single outcome an attack imposes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    /// The unit routs.
    Rout(RoutState),
    /// The unit retreats.
    Retreat(RetreatState),
    /// The unit is reversed.
    Reverse(ReverseState),
}

impl AttackOutcome {
    /// Whether the outcome has fully played out.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match self {
            AttackOutcome::Rout(rout) => rout.completed,
            AttackOutcome::Retreat(retreat) => retreat.is_resolved(),
            AttackOutcome::Reverse(reverse) => reverse.completed,
        }
    }

    /// Check the nested rout, retreat or reverse.
    pub fn check_consistent(&self) -> RulesResult<()> {
        match self {
            AttackOutcome::Rout(rout) => rout.check_consistent(),
            AttackOutcome::Retreat(retreat) => retreat.check_consistent(),
            AttackOutcome::Reverse(reverse) => reverse.check_consistent(),
        }
    }
}

/// Computed result of one attack against one unit.
///
/// Produced by the effect generators and carried verbatim in events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResult {
    /// The unit attacked.
    pub unit: UnitWithPlacement,
    /// Total attack value.
    pub attack_value: i32,
    /// Value reached the rout threshold.
    pub routed: bool,
    /// Value reached the retreat threshold.
    pub retreated: bool,
    /// Value reached the reverse threshold.
    pub reversed: bool,
    /// Where the unit could retreat to.
    pub legal_retreat_options: OrdSet<Coordinate>,
}

/// Application of an attack's result to its target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackApplyState {
    /// The unit attacked.
    pub unit: UnitWithPlacement,
    /// Total attack value.
    pub attack_value: i32,
    /// Value reached the rout threshold.
    pub routed: bool,
    /// Value reached the retreat threshold.
    pub retreated: bool,
    /// Value reached the reverse threshold.
    pub reversed: bool,
    /// Most severe outcome, if any threshold was reached.
    pub outcome: Option<AttackOutcome>,
}

impl AttackApplyState {
    /// Build the apply state for a result, choosing rout over retreat over reverse.
    #[must_use]
    pub fn from_result(result: &AttackResult) -> Self {
        let outcome = if result.routed {
            Some(AttackOutcome::Rout(RoutState::new(
                result.unit.unit.side,
                OrdSet::unit(result.unit.unit),
            )))
        } else if result.retreated {
            Some(AttackOutcome::Retreat(RetreatState::new(
                result.unit,
                result.legal_retreat_options.clone(),
            )))
        } else if result.reversed {
            Some(AttackOutcome::Reverse(ReverseState::new(result.unit)))
        } else {
            None
        };
        Self {
            unit: result.unit,
            attack_value: result.attack_value,
            routed: result.routed,
            retreated: result.retreated,
            reversed: result.reversed,
            outcome,
        }
    }

    /// Whether nothing remains to do.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.outcome.as_ref().map_or(true, AttackOutcome::is_resolved)
    }

    /// Reject an outcome that is not the most severe threshold reached.
    pub fn check_consistent(&self) -> RulesResult<()> {
        let matches = match &self.outcome {
            None => !self.routed && !self.retreated && !self.reversed,
            Some(AttackOutcome::Rout(_)) => self.routed,
            Some(AttackOutcome::Retreat(_)) => !self.routed && self.retreated,
            Some(AttackOutcome::Reverse(_)) => !self.routed && !self.retreated && self.reversed,
        };
        if !matches {
            return Err(contradiction(&format!(
                "attack on {} has an outcome its thresholds do not give",
                self.unit.unit
            )));
        }
        self.outcome.as_ref().map_or(Ok(()), AttackOutcome::check_consistent)
    }
}

fn contradiction(detail: &str) -> RulesError {
    RulesError::InconsistentState(detail.to_string())
}
