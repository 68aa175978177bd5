//! Legal choice enumeration.
//!
//! Builds every candidate payload for the choice the oracle expects and
//! keeps the ones validation accepts, so the enumeration can never disagree
//! with [`validate_event`](super::validate_event).

use std::collections::VecDeque;

use im::OrdSet;

use super::oracle::expected_event;
use super::ruleset::Ruleset;
use super::sequencer::unresolved_melee_locations;
use super::validate::check_event;
use crate::board::{Coordinate, UnitFacing, UnitWithPlacement};
use crate::cards::CardId;
use crate::core::{PlayerSide, RulesResult};
use crate::events::{Choice, ChoiceType, Event, ExpectedEventInfo};
use crate::state::{GameState, OutcomeRef, UnitCommand};

/// Every legal player choice in the current state.
///
/// Empty when the state waits for a game effect.
pub fn legal_choices(ruleset: &Ruleset, state: &GameState) -> RulesResult<Vec<Event>> {
    let ExpectedEventInfo::PlayerChoice { side, choice_type } = expected_event(state)? else {
        return Ok(Vec::new());
    };

    Ok(candidates(ruleset, state, side, choice_type)
        .into_iter()
        .map(|choice| Event::choice(side, choice))
        .filter(|event| check_event(ruleset, event, state).is_ok())
        .collect())
}

fn candidates(
    ruleset: &Ruleset,
    state: &GameState,
    side: PlayerSide,
    choice_type: ChoiceType,
) -> Vec<Choice> {
    let hand = &state.cards[side].in_hand;

    match choice_type {
        ChoiceType::ChooseCard => hand
            .iter()
            .map(|&card| Choice::ChooseCard { card })
            .collect(),

        ChoiceType::MoveCommander => match state.board.commanders[side] {
            Some(from) => within(ruleset, from, ruleset.config.commander_move_range)
                .into_iter()
                .map(|to| Choice::MoveCommander { to })
                .collect(),
            None => Vec::new(),
        },

        ChoiceType::IssueCommand => {
            let mut choices = vec![Choice::IssueCommand { command: None }];
            for unit in state.board.units_of(side) {
                choices.extend(
                    unit_commands(ruleset, state, &unit)
                        .into_iter()
                        .map(|command| Choice::IssueCommand {
                            command: Some(command),
                        }),
                );
            }
            choices
        }

        ChoiceType::CommitCard => std::iter::once(None)
            .chain(hand.iter().copied().map(Some))
            .map(|card| Choice::CommitCard { card })
            .collect(),

        ChoiceType::ChooseToRetreat => [true, false]
            .into_iter()
            .map(|retreat| Choice::ChooseToRetreat { retreat })
            .collect(),

        ChoiceType::ChooseRetreatPosition => {
            match state.round_state.pending_outcome(state.initiative) {
                Some(OutcomeRef::Retreat(retreat)) => retreat
                    .legal_retreat_options
                    .iter()
                    .map(|&position| Choice::ChooseRetreatPosition { position })
                    .collect(),
                _ => Vec::new(),
            }
        }

        ChoiceType::ChooseRoutDiscards => {
            match state.round_state.pending_outcome(state.initiative) {
                Some(OutcomeRef::Rout(rout)) => {
                    let owed = rout.number_to_discard.unwrap_or(0) as usize;
                    let cards: Vec<CardId> = hand.iter().copied().collect();
                    combinations(&cards, owed.min(cards.len()))
                        .into_iter()
                        .map(|cards| Choice::ChooseRoutDiscards { cards })
                        .collect()
                }
                _ => Vec::new(),
            }
        }

        ChoiceType::ChooseMelee => match state.round_state.resolve_melee() {
            Ok(phase) => unresolved_melee_locations(&state.board, phase)
                .into_iter()
                .map(|location| Choice::ChooseMelee { location })
                .collect(),
            Err(_) => Vec::new(),
        },

        ChoiceType::ChooseRally => [true, false]
            .into_iter()
            .map(|perform| Choice::ChooseRally { perform })
            .collect(),
    }
}

/// Spaces reachable in at most `range` steps, including `from`.
fn within(ruleset: &Ruleset, from: Coordinate, range: u32) -> OrdSet<Coordinate> {
    let geometry = ruleset.geometry();
    let mut seen = OrdSet::unit(from);
    let mut queue = VecDeque::from([(from, 0)]);
    while let Some((space, depth)) = queue.pop_front() {
        if depth == range {
            continue;
        }
        for next in geometry.neighbours(space) {
            if seen.insert(next).is_none() {
                queue.push_back((next, depth + 1));
            }
        }
    }
    seen
}

fn unit_commands(ruleset: &Ruleset, state: &GameState, unit: &UnitWithPlacement) -> Vec<UnitCommand> {
    let Ok(unit_type) = ruleset.unit_type(unit.unit) else {
        return Vec::new();
    };
    let mut commands = Vec::new();

    let mut paths = Vec::new();
    walk(ruleset, state, unit_type.speed as usize, &mut vec![unit.coordinate()], &mut paths);
    for path in paths {
        for facing in UnitFacing::ALL {
            commands.push(UnitCommand::Move {
                unit: unit.unit,
                path: path.clone(),
                facing,
            });
        }
    }

    if unit_type.can_shoot() {
        for target in state.board.units_of(unit.unit.side.opponent()) {
            commands.push(UnitCommand::RangedAttack {
                unit: unit.unit,
                target: target.unit,
            });
        }
    }
    commands
}

/// Simple paths from the unit's space, stopping at occupied spaces.
///
/// `trail` holds the start followed by the spaces entered so far.
fn walk(
    ruleset: &Ruleset,
    state: &GameState,
    steps_left: usize,
    trail: &mut Vec<Coordinate>,
    out: &mut Vec<Vec<Coordinate>>,
) {
    if steps_left == 0 {
        return;
    }
    let Some(&here) = trail.last() else {
        return;
    };
    for next in ruleset.geometry().neighbours(here) {
        if trail.contains(&next) {
            continue;
        }
        trail.push(next);
        out.push(trail[1..].to_vec());
        if state.board.is_empty_at(next) {
            walk(ruleset, state, steps_left - 1, trail, out);
        }
        trail.pop();
    }
}

fn combinations(cards: &[CardId], size: usize) -> Vec<Vec<CardId>> {
    if size == 0 {
        return vec![Vec::new()];
    }
    let mut out = Vec::new();
    for (index, &card) in cards.iter().enumerate() {
        for mut rest in combinations(&cards[index + 1..], size - 1) {
            rest.insert(0, card);
            out.push(rest);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioBuilder;

    #[test]
    fn test_opening_choices_are_black_cards() {
        let (ruleset, state) = ScenarioBuilder::standard().build().unwrap();
        let choices = legal_choices(&ruleset, &state).unwrap();

        assert_eq!(choices.len(), 5);
        for event in &choices {
            assert_eq!(event.kind().side(), Some(PlayerSide::Black));
        }
    }

    #[test]
    fn test_combinations() {
        let cards: Vec<CardId> = (1..=4).map(CardId::new).collect();
        assert_eq!(combinations(&cards, 2).len(), 6);
        assert_eq!(combinations(&cards, 0), vec![Vec::<CardId>::new()]);
        assert!(combinations(&cards[..1], 2).is_empty());
    }

    #[test]
    fn test_within_range() {
        let (ruleset, _) = ScenarioBuilder::standard().build().unwrap();
        let reach = within(&ruleset, Coordinate::new(0, 0), 1);
        assert_eq!(reach.len(), 4);
        assert!(reach.contains(&Coordinate::new(1, 1)));
    }
}
