//! Navigation from the round down to nested resolution state.
//!
//! Nothing in the state tree points back at its container. Code that needs a
//! nested resolution re-derives it from the round with these getters, which
//! fail with a [`RulesError`] when the phase or sub-state is not there.
//!
//! The getters borrow only the `RoundState`, so an applier can hold a
//! mutable resolution alongside mutable board and card state.

use super::command::{CommandResolutionState, MovementResolutionState, RangedAttackResolutionState};
use super::commitment::Commitment;
use super::engagement::{EngagementResolutionState, EngagementState};
use super::game::RoundState;
use super::melee::MeleeResolutionState;
use super::outcome::{AttackApplyState, AttackOutcome, RetreatState, ReverseState, RoutState};
use super::phase::{
    CleanupPhaseState, IssueCommandsPhaseState, MoveCommandersPhaseState, PhaseKind, PhaseState,
    PlayCardsPhaseState, ResolveMeleePhaseState,
};
use super::rally::RallyResolutionState;
use crate::core::{PlayerSide, RulesError, RulesResult};

/// The rout, retreat or reverse currently in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutcomeRef<'a> {
    /// A rout.
    Rout(&'a RoutState),
    /// A retreat waiting for its destination or its move.
    Retreat(&'a RetreatState),
    /// A reverse.
    Reverse(&'a ReverseState),
}

/// Mutable form of [`OutcomeRef`].
#[derive(Debug)]
pub enum OutcomeMut<'a> {
    /// A rout.
    Rout(&'a mut RoutState),
    /// A retreat waiting for its destination or its move.
    Retreat(&'a mut RetreatState),
    /// A reverse.
    Reverse(&'a mut ReverseState),
}

impl RoundState {
    /// The play-cards phase, mutably.
    pub fn play_cards_mut(&mut self) -> RulesResult<&mut PlayCardsPhaseState> {
        match &mut self.current {
            PhaseState::PlayCards(phase) => Ok(phase),
            other => Err(wrong_phase(PhaseKind::PlayCards, other)),
        }
    }

    /// The move-commanders phase, mutably.
    pub fn move_commanders_mut(&mut self) -> RulesResult<&mut MoveCommandersPhaseState> {
        match &mut self.current {
            PhaseState::MoveCommanders(phase) => Ok(phase),
            other => Err(wrong_phase(PhaseKind::MoveCommanders, other)),
        }
    }

    /// The issue-commands phase.
    pub fn issue_commands(&self) -> RulesResult<&IssueCommandsPhaseState> {
        match &self.current {
            PhaseState::IssueCommands(phase) => Ok(phase),
            other => Err(wrong_phase(PhaseKind::IssueCommands, other)),
        }
    }

    /// The issue-commands phase, mutably.
    pub fn issue_commands_mut(&mut self) -> RulesResult<&mut IssueCommandsPhaseState> {
        match &mut self.current {
            PhaseState::IssueCommands(phase) => Ok(phase),
            other => Err(wrong_phase(PhaseKind::IssueCommands, other)),
        }
    }

    /// The command being resolved.
    pub fn current_command(&self) -> RulesResult<&CommandResolutionState> {
        self.issue_commands()?
            .current_command
            .as_ref()
            .ok_or(RulesError::MissingState("current command"))
    }

    /// The command being resolved, mutably.
    pub fn current_command_mut(&mut self) -> RulesResult<&mut CommandResolutionState> {
        self.issue_commands_mut()?
            .current_command
            .as_mut()
            .ok_or(RulesError::MissingState("current command"))
    }

    /// The move being resolved.
    pub fn movement(&self) -> RulesResult<&MovementResolutionState> {
        match self.current_command()? {
            CommandResolutionState::Movement(movement) => Ok(movement),
            CommandResolutionState::RangedAttack(_) => {
                Err(RulesError::MissingState("movement resolution"))
            }
        }
    }

    /// The move being resolved, mutably.
    pub fn movement_mut(&mut self) -> RulesResult<&mut MovementResolutionState> {
        match self.current_command_mut()? {
            CommandResolutionState::Movement(movement) => Ok(movement),
            CommandResolutionState::RangedAttack(_) => {
                Err(RulesError::MissingState("movement resolution"))
            }
        }
    }

    /// The engagement of the move being resolved.
    pub fn engagement(&self) -> RulesResult<&EngagementState> {
        self.movement()?
            .engagement
            .as_ref()
            .ok_or(RulesError::MissingState("engagement"))
    }

    /// The engagement of the move being resolved, mutably.
    pub fn engagement_mut(&mut self) -> RulesResult<&mut EngagementState> {
        self.movement_mut()?
            .engagement
            .as_mut()
            .ok_or(RulesError::MissingState("engagement"))
    }

    /// The ranged attack being resolved.
    pub fn ranged_attack(&self) -> RulesResult<&RangedAttackResolutionState> {
        match self.current_command()? {
            CommandResolutionState::RangedAttack(ranged) => Ok(ranged),
            CommandResolutionState::Movement(_) => {
                Err(RulesError::MissingState("ranged attack resolution"))
            }
        }
    }

    /// The ranged attack being resolved, mutably.
    pub fn ranged_attack_mut(&mut self) -> RulesResult<&mut RangedAttackResolutionState> {
        match self.current_command_mut()? {
            CommandResolutionState::RangedAttack(ranged) => Ok(ranged),
            CommandResolutionState::Movement(_) => {
                Err(RulesError::MissingState("ranged attack resolution"))
            }
        }
    }

    /// The resolve-melee phase.
    pub fn resolve_melee(&self) -> RulesResult<&ResolveMeleePhaseState> {
        match &self.current {
            PhaseState::ResolveMelee(phase) => Ok(phase),
            other => Err(wrong_phase(PhaseKind::ResolveMelee, other)),
        }
    }

    /// The resolve-melee phase, mutably.
    pub fn resolve_melee_mut(&mut self) -> RulesResult<&mut ResolveMeleePhaseState> {
        match &mut self.current {
            PhaseState::ResolveMelee(phase) => Ok(phase),
            other => Err(wrong_phase(PhaseKind::ResolveMelee, other)),
        }
    }

    /// The melee being resolved.
    pub fn current_melee(&self) -> RulesResult<&MeleeResolutionState> {
        self.resolve_melee()?
            .current_melee
            .as_ref()
            .ok_or(RulesError::MissingState("current melee"))
    }

    /// The melee being resolved, mutably.
    pub fn current_melee_mut(&mut self) -> RulesResult<&mut MeleeResolutionState> {
        self.resolve_melee_mut()?
            .current_melee
            .as_mut()
            .ok_or(RulesError::MissingState("current melee"))
    }

    /// The cleanup phase.
    pub fn cleanup(&self) -> RulesResult<&CleanupPhaseState> {
        match &self.current {
            PhaseState::Cleanup(phase) => Ok(phase),
            other => Err(wrong_phase(PhaseKind::Cleanup, other)),
        }
    }

    /// The cleanup phase, mutably.
    pub fn cleanup_mut(&mut self) -> RulesResult<&mut CleanupPhaseState> {
        match &mut self.current {
            PhaseState::Cleanup(phase) => Ok(phase),
            other => Err(wrong_phase(PhaseKind::Cleanup, other)),
        }
    }

    /// The rally being resolved.
    pub fn rally(&self) -> RulesResult<&RallyResolutionState> {
        self.cleanup()?
            .rally
            .as_ref()
            .ok_or(RulesError::MissingState("rally"))
    }

    /// The rally being resolved, mutably.
    pub fn rally_mut(&mut self) -> RulesResult<&mut RallyResolutionState> {
        self.cleanup_mut()?
            .rally
            .as_mut()
            .ok_or(RulesError::MissingState("rally"))
    }

    /// The innermost unfinished rout, retreat or reverse, if any.
    ///
    /// A retreat that turned into a rout reports the rout. In melee the
    /// initiative side's outcome comes first.
    #[must_use]
    pub fn pending_outcome(&self, initiative: PlayerSide) -> Option<OutcomeRef<'_>> {
        match &self.current {
            PhaseState::IssueCommands(phase) => match phase.current_command.as_ref()? {
                CommandResolutionState::Movement(movement) => {
                    match &movement.engagement.as_ref()?.resolution {
                        EngagementResolutionState::Rear { rout } => {
                            (!rout.completed).then_some(OutcomeRef::Rout(rout))
                        }
                        EngagementResolutionState::Front(front) => {
                            front.retreat.as_ref().and_then(retreat_ref)
                        }
                        EngagementResolutionState::Flank { .. } => None,
                    }
                }
                CommandResolutionState::RangedAttack(ranged) => {
                    ranged.attack_apply.as_ref()?.outcome.as_ref().and_then(outcome_ref)
                }
            },
            PhaseState::ResolveMelee(phase) => {
                let melee = phase.current_melee.as_ref()?;
                let side = melee.next_to_apply(initiative)?;
                melee.attack_apply.as_ref()?[side]
                    .outcome
                    .as_ref()
                    .and_then(outcome_ref)
            }
            PhaseState::Cleanup(phase) => phase
                .rally
                .as_ref()?
                .rout
                .as_ref()
                .filter(|rout| !rout.completed)
                .map(OutcomeRef::Rout),
            PhaseState::PlayCards(_) | PhaseState::MoveCommanders(_) => None,
        }
    }

    /// Check every rout, retreat, reverse and attack application in the round.
    ///
    /// Unlike [`RoundState::pending_outcome`] this looks at finished
    /// outcomes too, and at both sides of a melee.
    pub fn check_outcomes(&self) -> RulesResult<()> {
        match &self.current {
            PhaseState::IssueCommands(phase) => match &phase.current_command {
                Some(CommandResolutionState::Movement(movement)) => {
                    match movement.engagement.as_ref().map(|engagement| &engagement.resolution) {
                        Some(EngagementResolutionState::Rear { rout }) => rout.check_consistent(),
                        Some(EngagementResolutionState::Front(front)) => front
                            .retreat
                            .as_ref()
                            .map_or(Ok(()), RetreatState::check_consistent),
                        Some(EngagementResolutionState::Flank { .. }) | None => Ok(()),
                    }
                }
                Some(CommandResolutionState::RangedAttack(ranged)) => ranged
                    .attack_apply
                    .as_ref()
                    .map_or(Ok(()), AttackApplyState::check_consistent),
                None => Ok(()),
            },
            PhaseState::ResolveMelee(phase) => {
                let Some(applies) = phase
                    .current_melee
                    .as_ref()
                    .and_then(|melee| melee.attack_apply.as_ref())
                else {
                    return Ok(());
                };
                applies.iter().try_for_each(|(_, apply)| apply.check_consistent())
            }
            PhaseState::Cleanup(phase) => phase
                .rally
                .as_ref()
                .and_then(|rally| rally.rout.as_ref())
                .map_or(Ok(()), RoutState::check_consistent),
            PhaseState::PlayCards(_) | PhaseState::MoveCommanders(_) => Ok(()),
        }
    }

    /// Mutable form of [`RoundState::pending_outcome`]; walks the same path.
    pub fn pending_outcome_mut(&mut self, initiative: PlayerSide) -> Option<OutcomeMut<'_>> {
        match &mut self.current {
            PhaseState::IssueCommands(phase) => match phase.current_command.as_mut()? {
                CommandResolutionState::Movement(movement) => {
                    match &mut movement.engagement.as_mut()?.resolution {
                        EngagementResolutionState::Rear { rout } => {
                            (!rout.completed).then_some(OutcomeMut::Rout(rout))
                        }
                        EngagementResolutionState::Front(front) => {
                            front.retreat.as_mut().and_then(retreat_mut)
                        }
                        EngagementResolutionState::Flank { .. } => None,
                    }
                }
                CommandResolutionState::RangedAttack(ranged) => {
                    ranged.attack_apply.as_mut()?.outcome.as_mut().and_then(outcome_mut)
                }
            },
            PhaseState::ResolveMelee(phase) => {
                let melee = phase.current_melee.as_mut()?;
                let side = melee.next_to_apply(initiative)?;
                melee.attack_apply.as_mut()?[side]
                    .outcome
                    .as_mut()
                    .and_then(outcome_mut)
            }
            PhaseState::Cleanup(phase) => phase
                .rally
                .as_mut()?
                .rout
                .as_mut()
                .filter(|rout| !rout.completed)
                .map(OutcomeMut::Rout),
            PhaseState::PlayCards(_) | PhaseState::MoveCommanders(_) => None,
        }
    }

    /// The first commitment still waiting for a card, with the side that owes it.
    ///
    /// Order: mover, then front-engaged defender; ranged attacker, then
    /// target; in melee the initiative side, then the other.
    pub fn pending_commitment_mut(
        &mut self,
        initiative: PlayerSide,
    ) -> Option<(PlayerSide, &mut Commitment)> {
        match &mut self.current {
            PhaseState::IssueCommands(phase) => match phase.current_command.as_mut()? {
                CommandResolutionState::Movement(movement) => {
                    if movement.commitment.is_pending() {
                        return Some((movement.moving_unit.unit.side, &mut movement.commitment));
                    }
                    let engagement = movement.engagement.as_mut()?;
                    let defender = engagement.defending_unit.unit.side;
                    match &mut engagement.resolution {
                        EngagementResolutionState::Front(front)
                            if front.defensive_commitment.is_pending() =>
                        {
                            Some((defender, &mut front.defensive_commitment))
                        }
                        _ => None,
                    }
                }
                CommandResolutionState::RangedAttack(ranged) => {
                    if ranged.attacker_commitment.is_pending() {
                        Some((ranged.attacker.unit.side, &mut ranged.attacker_commitment))
                    } else if ranged.defender_commitment.is_pending() {
                        Some((ranged.defender.unit.side, &mut ranged.defender_commitment))
                    } else {
                        None
                    }
                }
            },
            PhaseState::ResolveMelee(phase) => {
                let melee = phase.current_melee.as_mut()?;
                let side = [initiative, initiative.opponent()]
                    .into_iter()
                    .find(|&side| melee.commitments[side].is_pending())?;
                Some((side, &mut melee.commitments[side]))
            }
            PhaseState::PlayCards(_) | PhaseState::MoveCommanders(_) | PhaseState::Cleanup(_) => {
                None
            }
        }
    }
}

fn wrong_phase(expected: PhaseKind, actual: &PhaseState) -> RulesError {
    RulesError::WrongPhase {
        expected,
        actual: actual.kind(),
    }
}

fn outcome_ref(outcome: &AttackOutcome) -> Option<OutcomeRef<'_>> {
    match outcome {
        AttackOutcome::Rout(rout) => (!rout.completed).then_some(OutcomeRef::Rout(rout)),
        AttackOutcome::Retreat(retreat) => retreat_ref(retreat),
        AttackOutcome::Reverse(reverse) => {
            (!reverse.completed).then_some(OutcomeRef::Reverse(reverse))
        }
    }
}

fn retreat_ref(retreat: &RetreatState) -> Option<OutcomeRef<'_>> {
    match &retreat.rout {
        Some(rout) => (!rout.completed).then_some(OutcomeRef::Rout(rout)),
        None => (!retreat.completed).then_some(OutcomeRef::Retreat(retreat)),
    }
}

fn outcome_mut(outcome: &mut AttackOutcome) -> Option<OutcomeMut<'_>> {
    match outcome {
        AttackOutcome::Rout(rout) => (!rout.completed).then_some(OutcomeMut::Rout(rout)),
        AttackOutcome::Retreat(retreat) => retreat_mut(retreat),
        AttackOutcome::Reverse(reverse) => {
            (!reverse.completed).then_some(OutcomeMut::Reverse(reverse))
        }
    }
}

fn retreat_mut(retreat: &mut RetreatState) -> Option<OutcomeMut<'_>> {
    if retreat.rout.is_some() {
        return retreat
            .rout
            .as_mut()
            .filter(|rout| !rout.completed)
            .map(OutcomeMut::Rout);
    }
    (!retreat.completed).then_some(OutcomeMut::Retreat(retreat))
}

#[cfg(test)]
mod tests {
    use im::OrdSet;

    use super::*;
    use crate::board::{Coordinate, UnitFacing, UnitPlacement, UnitWithPlacement};
    use crate::cards::CardId;
    use crate::state::outcome::AttackResult;
    use crate::state::phase::{IssueCommandsStep, PlayCardsStep};
    use crate::units::{UnitInstance, UnitTypeId};

    fn placed(side: PlayerSide, x: i32, y: i32) -> UnitWithPlacement {
        UnitWithPlacement::new(
            UnitInstance::new(side, UnitTypeId::new(1), 0),
            UnitPlacement::new(Coordinate::new(x, y), UnitFacing::North),
        )
    }

    fn issuing(command: CommandResolutionState) -> RoundState {
        RoundState {
            completed_phases: OrdSet::new(),
            current: PhaseState::IssueCommands(IssueCommandsPhaseState {
                step: IssueCommandsStep::FirstPlayerIssueCommands,
                commanded_units: OrdSet::new(),
                current_command: Some(command),
            }),
        }
    }

    #[test]
    fn test_wrong_phase_is_reported() {
        let round = RoundState {
            completed_phases: OrdSet::new(),
            current: PhaseState::PlayCards(PlayCardsPhaseState {
                step: PlayCardsStep::ChooseCards,
            }),
        };
        assert_eq!(
            round.movement().unwrap_err(),
            RulesError::WrongPhase {
                expected: PhaseKind::IssueCommands,
                actual: PhaseKind::PlayCards,
            }
        );
    }

    #[test]
    fn test_ranged_commitments_in_order() {
        let ranged = RangedAttackResolutionState::new(
            placed(PlayerSide::Black, 0, 0),
            placed(PlayerSide::White, 0, 2),
        );
        let mut round = issuing(CommandResolutionState::RangedAttack(ranged));

        let (side, commitment) = round.pending_commitment_mut(PlayerSide::Black).unwrap();
        assert_eq!(side, PlayerSide::Black);
        commitment.complete(Some(CardId::new(1))).unwrap();

        let (side, commitment) = round.pending_commitment_mut(PlayerSide::Black).unwrap();
        assert_eq!(side, PlayerSide::White);
        commitment.complete(None).unwrap();

        assert!(round.pending_commitment_mut(PlayerSide::Black).is_none());
    }

    #[test]
    fn test_retreat_turned_rout_reports_the_rout() {
        let mut ranged = RangedAttackResolutionState::new(
            placed(PlayerSide::Black, 0, 0),
            placed(PlayerSide::White, 0, 2),
        );
        ranged.attack_apply = Some(AttackApplyState::from_result(&AttackResult {
            unit: placed(PlayerSide::White, 0, 2),
            attack_value: 2,
            routed: false,
            retreated: true,
            reversed: false,
            legal_retreat_options: OrdSet::new(),
        }));
        let mut round = issuing(CommandResolutionState::RangedAttack(ranged));

        assert!(matches!(
            round.pending_outcome(PlayerSide::Black),
            Some(OutcomeRef::Rout(rout)) if rout.player == PlayerSide::White
        ));

        if let Some(OutcomeMut::Rout(rout)) = round.pending_outcome_mut(PlayerSide::Black) {
            rout.completed = true;
        }
        assert_eq!(round.pending_outcome(PlayerSide::Black), None);
    }
}
