//! Event validation.
//!
//! Validation answers "may this event be applied now?" without touching the
//! state. An event is legal when:
//!
//! 1. its kind (and, for choices, its side) is what the oracle expects, and
//! 2. for a game effect, it equals the effect the generator computes for the
//!    same state, or
//! 3. for a player choice, its payload passes the choice's rules.
//!
//! Any [`RulesError`](crate::core::RulesError) hit while validating is
//! reported as an illegal event, never raised.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use super::oracle::expected_event;
use super::ruleset::Ruleset;
use super::sequencer::unresolved_melee_locations;
use crate::board::{Coordinate, UnitPresence};
use crate::cards::CardId;
use crate::core::{PlayerSide, RulesError};
use crate::events::{Choice, Event, GameEffect, PlayerChoice};
use crate::procedures::generate_game_effect;
use crate::state::{GameState, OutcomeRef, UnitCommand};
use crate::units::UnitInstance;

/// Verdict on a proposed event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "camelCase")]
pub enum ValidationResult {
    /// The event may be applied.
    Legal,
    /// The event must be rejected.
    Illegal {
        /// Why.
        reason: String,
    },
}

impl ValidationResult {
    /// Whether the event may be applied.
    #[must_use]
    pub fn is_legal(&self) -> bool {
        matches!(self, ValidationResult::Legal)
    }

    /// The rejection reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            ValidationResult::Legal => None,
            ValidationResult::Illegal { reason } => Some(reason),
        }
    }
}

pub(super) type Check = Result<(), String>;

fn ensure(condition: bool, reason: impl FnOnce() -> String) -> Check {
    if condition {
        Ok(())
    } else {
        Err(reason())
    }
}

fn rules(error: RulesError) -> String {
    error.to_string()
}

/// Decide whether `event` may be applied to `state`.
#[instrument(skip_all, fields(round = state.round, phase = %state.phase(), event = %event.kind()))]
pub fn validate_event(ruleset: &Ruleset, event: &Event, state: &GameState) -> ValidationResult {
    match check_event(ruleset, event, state) {
        Ok(()) => ValidationResult::Legal,
        Err(reason) => {
            warn!(%reason, "illegal event");
            ValidationResult::Illegal { reason }
        }
    }
}

pub(super) fn check_event(ruleset: &Ruleset, event: &Event, state: &GameState) -> Check {
    let expected = expected_event(state).map_err(rules)?;
    let actual = event.kind();
    ensure(expected == actual, || {
        format!("expected {expected}, got {actual}")
    })?;

    match event {
        Event::GameEffect(effect) => check_effect(ruleset, effect, state),
        Event::PlayerChoice(choice) => check_choice(ruleset, choice, state),
    }
}

fn check_effect(ruleset: &Ruleset, effect: &GameEffect, state: &GameState) -> Check {
    let seed = match effect {
        GameEffect::ResolveRally { seed, .. } => *seed,
        _ => 0,
    };
    let generated = generate_game_effect(ruleset, state, seed).map_err(rules)?;
    ensure(*effect == generated, || {
        format!("{} does not match the computed effect", effect.effect_type())
    })
}

fn check_choice(ruleset: &Ruleset, choice: &PlayerChoice, state: &GameState) -> Check {
    let side = choice.side;
    let cards = &state.cards[side];

    match &choice.choice {
        Choice::ChooseCard { card } => ensure(cards.has_in_hand(*card), || {
            format!("{card} is not in {side}'s hand")
        }),

        Choice::MoveCommander { to } => check_commander_move(ruleset, state, side, *to),

        Choice::IssueCommand { command: None } => Ok(()),
        Choice::IssueCommand {
            command: Some(command),
        } => check_command(ruleset, state, side, command),

        Choice::CommitCard { card: None } => Ok(()),
        Choice::CommitCard { card: Some(card) } => ensure(cards.has_in_hand(*card), || {
            format!("{card} is not in {side}'s hand")
        }),

        Choice::ChooseToRetreat { .. } => Ok(()),

        Choice::ChooseRetreatPosition { position } => {
            let Some(OutcomeRef::Retreat(retreat)) = state.round_state.pending_outcome(state.initiative)
            else {
                return Err("no retreat awaits a position".to_string());
            };
            ensure(retreat.legal_retreat_options.contains(position), || {
                format!("{position} is not a legal retreat position")
            })
        }

        Choice::ChooseRoutDiscards { cards: chosen } => {
            let Some(OutcomeRef::Rout(rout)) = state.round_state.pending_outcome(state.initiative)
            else {
                return Err("no rout awaits discards".to_string());
            };
            let owed = rout.number_to_discard.unwrap_or(0) as usize;
            let required = owed.min(cards.hand_size());
            let distinct: BTreeSet<CardId> = chosen.iter().copied().collect();
            ensure(distinct.len() == chosen.len(), || "duplicate discards".to_string())?;
            ensure(chosen.len() == required, || {
                format!("{required} cards must be discarded, got {}", chosen.len())
            })?;
            match chosen.iter().find(|card| !cards.has_in_hand(**card)) {
                Some(card) => Err(format!("{card} is not in {side}'s hand")),
                None => Ok(()),
            }
        }

        Choice::ChooseMelee { location } => {
            let phase = state.round_state.resolve_melee().map_err(rules)?;
            ensure(unresolved_melee_locations(&state.board, phase).contains(location), || {
                format!("{location} is not an unresolved melee")
            })
        }

        Choice::ChooseRally { perform } => ensure(
            *perform || cards.hand_size() > 0 || cards.played.is_empty(),
            || format!("{side} has no cards in hand and must rally"),
        ),
    }
}

fn check_commander_move(ruleset: &Ruleset, state: &GameState, side: PlayerSide, to: Coordinate) -> Check {
    let from = state.board.commanders[side].ok_or_else(|| format!("{side} has no commander"))?;
    if to == from {
        return Ok(());
    }
    ensure(ruleset.geometry().contains(to), || format!("{to} is off the board"))?;
    let range = ruleset.config.commander_move_range;
    ensure(ruleset.geometry().distance(from, to) <= range, || {
        format!("{to} is beyond the commander's range of {range}")
    })?;
    ensure(
        state
            .board
            .presence(to)
            .is_some_and(|presence| presence.unit_of(side).is_some()),
        || format!("{to} holds no friendly unit"),
    )
}

fn check_command(ruleset: &Ruleset, state: &GameState, side: PlayerSide, command: &UnitCommand) -> Check {
    let unit = command.unit();
    ensure(unit.side == side, || format!("{unit} does not belong to {side}"))?;

    let phase = state.round_state.issue_commands().map_err(rules)?;
    let allowed = ruleset
        .in_play_card(state, side)
        .map_err(rules)?
        .map_or(0, |card| card.command_size as usize);
    ensure(phase.commands_issued_by(side) < allowed, || {
        format!("{side} has issued all {allowed} commands")
    })?;
    ensure(!phase.commanded_units.contains(&unit), || {
        format!("{unit} has already been commanded")
    })?;

    let placed = state.board.find_unit(unit).ok_or_else(|| format!("{unit} is not on the board"))?;
    ensure(state.board.single_at(placed.coordinate()).is_some(), || {
        format!("{unit} is engaged")
    })?;
    let unit_type = ruleset.unit_type(unit).map_err(rules)?;

    match command {
        UnitCommand::Move { path, .. } => {
            ensure(!path.is_empty(), || "empty path".to_string())?;
            ensure(path.len() <= unit_type.speed as usize, || {
                format!("path of {} exceeds speed {}", path.len(), unit_type.speed)
            })?;
            check_path(ruleset, state, unit, placed.coordinate(), path)
        }
        UnitCommand::RangedAttack { target, .. } => {
            ensure(unit_type.can_shoot(), || format!("{unit} cannot shoot"))?;
            ensure(target.side != side, || format!("{target} is not an enemy"))?;
            let target_at = state
                .board
                .find_unit(*target)
                .ok_or_else(|| format!("{target} is not on the board"))?;
            ensure(state.board.single_at(target_at.coordinate()).is_some(), || {
                format!("{target} is engaged")
            })?;
            let distance = ruleset.geometry().distance(placed.coordinate(), target_at.coordinate());
            ensure(distance <= unit_type.range, || {
                format!("{target} is {distance} away, beyond range {}", unit_type.range)
            })
        }
    }
}

fn check_path(
    ruleset: &Ruleset,
    state: &GameState,
    unit: UnitInstance,
    start: Coordinate,
    path: &[Coordinate],
) -> Check {
    let geometry = ruleset.geometry();
    let mut previous = start;
    for (index, &space) in path.iter().enumerate() {
        ensure(geometry.contains(space), || format!("{space} is off the board"))?;
        ensure(geometry.adjacent(previous, space), || {
            format!("{space} is not adjacent to {previous}")
        })?;
        let last = index + 1 == path.len();
        match state.board.presence(space) {
            None => {}
            Some(UnitPresence::Single(held)) if last && held.unit.side != unit.side => {}
            Some(_) if last => return Err(format!("{space} cannot be entered")),
            Some(_) => return Err(format!("{space} is occupied")),
        }
        previous = space;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::apply_event;
    use crate::board::UnitFacing;
    use crate::scenario::{standard, ScenarioBuilder};
    use crate::state::PhaseKind;

    fn choose(side: PlayerSide, card: u32) -> Event {
        Event::choice(side, Choice::ChooseCard { card: CardId::new(card) })
    }

    /// Standard scenario advanced to black's first command.
    fn issuing() -> (Ruleset, GameState) {
        let (ruleset, mut state) = ScenarioBuilder::standard().build().unwrap();
        // Black plays Advance (initiative 3, 2 commands), white Shield Wall (1).
        for event in [choose(PlayerSide::Black, 1), choose(PlayerSide::White, 14)] {
            state = apply_event(&event, &state).unwrap();
        }
        while state.phase() != PhaseKind::IssueCommands {
            let event = match expected_event(&state).unwrap() {
                crate::events::ExpectedEventInfo::PlayerChoice { side, .. } => {
                    let to = state.board.commanders[side].unwrap();
                    Event::choice(side, Choice::MoveCommander { to })
                }
                crate::events::ExpectedEventInfo::GameEffect { .. } => {
                    generate_game_effect(&ruleset, &state, 0).unwrap().into()
                }
            };
            state = apply_event(&event, &state).unwrap();
        }
        (ruleset, state)
    }

    fn command(command: UnitCommand) -> Event {
        Event::choice(PlayerSide::Black, Choice::IssueCommand { command: Some(command) })
    }

    #[test]
    fn test_wrong_side_is_illegal() {
        let (ruleset, state) = ScenarioBuilder::standard().build().unwrap();
        let verdict = validate_event(&ruleset, &choose(PlayerSide::White, 11), &state);
        assert!(!verdict.is_legal());
        assert!(verdict.reason().unwrap().contains("chooseCard by black"));
    }

    #[test]
    fn test_card_must_be_in_hand() {
        let (ruleset, state) = ScenarioBuilder::standard().build().unwrap();
        assert!(validate_event(&ruleset, &choose(PlayerSide::Black, 1), &state).is_legal());
        assert!(!validate_event(&ruleset, &choose(PlayerSide::Black, 11), &state).is_legal());
    }

    #[test]
    fn test_effect_must_match_generated() {
        let (ruleset, mut state) = ScenarioBuilder::standard().build().unwrap();
        for event in [choose(PlayerSide::Black, 1), choose(PlayerSide::White, 12)] {
            state = apply_event(&event, &state).unwrap();
        }
        // White's Charge (5) beats Advance (3).
        let wrong = Event::from(GameEffect::RevealCards {
            initiative: PlayerSide::Black,
        });
        let right = Event::from(GameEffect::RevealCards {
            initiative: PlayerSide::White,
        });
        assert!(!validate_event(&ruleset, &wrong, &state).is_legal());
        assert!(validate_event(&ruleset, &right, &state).is_legal());
    }

    #[test]
    fn test_move_rules() {
        let (ruleset, state) = issuing();
        let infantry = UnitInstance::new(PlayerSide::Black, standard::INFANTRY, 0);
        let cavalry = UnitInstance::new(PlayerSide::Black, standard::CAVALRY, 0);

        let step = command(UnitCommand::Move {
            unit: infantry,
            path: vec![Coordinate::new(2, 4)],
            facing: UnitFacing::North,
        });
        assert!(validate_event(&ruleset, &step, &state).is_legal());

        let too_far = command(UnitCommand::Move {
            unit: infantry,
            path: vec![Coordinate::new(2, 4), Coordinate::new(2, 3)],
            facing: UnitFacing::North,
        });
        assert!(!validate_event(&ruleset, &too_far, &state).is_legal());

        let charge = command(UnitCommand::Move {
            unit: cavalry,
            path: vec![Coordinate::new(5, 4), Coordinate::new(5, 3), Coordinate::new(4, 2)],
            facing: UnitFacing::West,
        });
        assert!(validate_event(&ruleset, &charge, &state).is_legal());

        let through_friend = command(UnitCommand::Move {
            unit: cavalry,
            path: vec![Coordinate::new(4, 5), Coordinate::new(4, 4)],
            facing: UnitFacing::North,
        });
        assert!(!validate_event(&ruleset, &through_friend, &state).is_legal());

        let enemy = command(UnitCommand::Move {
            unit: UnitInstance::new(PlayerSide::White, standard::INFANTRY, 0),
            path: vec![Coordinate::new(2, 3)],
            facing: UnitFacing::South,
        });
        assert!(!validate_event(&ruleset, &enemy, &state).is_legal());
    }

    #[test]
    fn test_ranged_rules() {
        let (ruleset, state) = issuing();
        let archers = UnitInstance::new(PlayerSide::Black, standard::ARCHERS, 0);
        let infantry = UnitInstance::new(PlayerSide::Black, standard::INFANTRY, 1);

        // (3, 6) to (3, 2) is four spaces, beyond range 3.
        let out_of_range = command(UnitCommand::RangedAttack {
            unit: archers,
            target: UnitInstance::new(PlayerSide::White, standard::INFANTRY, 1),
        });
        assert!(!validate_event(&ruleset, &out_of_range, &state).is_legal());

        let cannot_shoot = command(UnitCommand::RangedAttack {
            unit: infantry,
            target: UnitInstance::new(PlayerSide::White, standard::INFANTRY, 1),
        });
        assert!(!validate_event(&ruleset, &cannot_shoot, &state).is_legal());
    }

    #[test]
    fn test_done_is_always_legal() {
        let (ruleset, state) = issuing();
        let done = Event::choice(PlayerSide::Black, Choice::IssueCommand { command: None });
        assert!(validate_event(&ruleset, &done, &state).is_legal());
    }
}
