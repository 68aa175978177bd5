//! Effect generators.
//!
//! A generator reads the state and the ruleset and computes the complete
//! payload of the game effect the oracle is waiting for. The applier then
//! only records what the generator decided, so server and client can share
//! one applier while only the server generates.
//!
//! Randomness enters only through the caller's `seed`, and only the rally
//! draw uses it. The seed is stored in the event so validation and replay
//! reproduce the same draw.

pub mod attack;

use im::OrdSet;
use tracing::{debug, instrument};

pub use attack::{result_against, Attack};

use crate::board::{classify_engagement, retreat_options};
use crate::cards::{CardDefinition, CardId};
use crate::core::{GameRng, PlayerSide, RulesError, RulesResult, SideMap};
use crate::events::{EffectType, ExpectedEventInfo, GameEffect};
use crate::rules::sequencer::rally_step_side;
use crate::rules::{expected_event, Ruleset};
use crate::state::{
    AttackResult, EngagementResolutionState, GameState, OutcomeRef, RetreatState, ReverseState,
    RoutState,
};
use crate::units::UnitInstance;

/// Compute the game effect the state is waiting for.
///
/// Fails with [`RulesError::ChoiceExpected`] when a player has to act instead.
#[instrument(skip_all, fields(round = state.round, phase = %state.phase(), seed = seed))]
pub fn generate_game_effect(
    ruleset: &Ruleset,
    state: &GameState,
    seed: u64,
) -> RulesResult<GameEffect> {
    let effect_type = match expected_event(state)? {
        ExpectedEventInfo::GameEffect { effect_type } => effect_type,
        expected @ ExpectedEventInfo::PlayerChoice { .. } => {
            return Err(RulesError::ChoiceExpected { expected });
        }
    };

    let effect = match effect_type {
        EffectType::AdvancePhase => GameEffect::AdvancePhase,
        EffectType::RevealCards => reveal_cards(ruleset, state)?,
        EffectType::StartEngagement => start_engagement(ruleset, state)?,
        EffectType::DetermineRetreatEligibility => retreat_eligibility(ruleset, state)?,
        EffectType::RotateFlankDefender => rotate_flank_defender(state)?,
        EffectType::ResolveRangedAttack => ranged_attack(ruleset, state)?,
        EffectType::ResolveMelee => melee(ruleset, state)?,
        EffectType::RoutPenalty => rout_penalty(ruleset, pending_rout(state)?)?,
        EffectType::CompleteRout => GameEffect::CompleteRout {
            units: pending_rout(state)?.units.clone(),
        },
        EffectType::CompleteRetreat => complete_retreat(pending_retreat(state)?)?,
        EffectType::CompleteReverse => complete_reverse(pending_reverse(state)?),
        EffectType::DiscardPlayedCards => GameEffect::DiscardPlayedCards,
        EffectType::ResolveRally => {
            let side = rally_step_side(state, state.round_state.cleanup()?.step)
                .ok_or(RulesError::MissingState("rallying side"))?;
            resolve_rally(ruleset, state, side, seed)?
        }
    };

    debug!(effect = %effect.effect_type(), "generated game effect");
    Ok(effect)
}

fn reveal_cards(ruleset: &Ruleset, state: &GameState) -> RulesResult<GameEffect> {
    let initiative_of = |side: PlayerSide| -> RulesResult<u32> {
        let card = state.cards[side]
            .awaiting_play
            .ok_or_else(|| RulesError::CardNotAvailable(format!("{side} has no card awaiting play")))?;
        Ok(ruleset.card(card)?.initiative)
    };
    let black = initiative_of(PlayerSide::Black)?;
    let white = initiative_of(PlayerSide::White)?;

    let initiative = match black.cmp(&white) {
        std::cmp::Ordering::Greater => PlayerSide::Black,
        std::cmp::Ordering::Less => PlayerSide::White,
        std::cmp::Ordering::Equal => state.initiative,
    };
    Ok(GameEffect::RevealCards { initiative })
}

fn start_engagement(ruleset: &Ruleset, state: &GameState) -> RulesResult<GameEffect> {
    let movement = state.round_state.movement()?;
    let destination = movement.destination();
    let defending_unit = state
        .board
        .single_at(destination)
        .filter(|held| held.unit.side != movement.moving_unit.unit.side)
        .ok_or_else(|| {
            RulesError::InconsistentState(format!("no single enemy to engage at {destination}"))
        })?;
    let defending_unit = state.board.require_unit(defending_unit.unit)?;

    Ok(GameEffect::StartEngagement {
        engagement_type: classify_engagement(
            ruleset.geometry(),
            movement.approach(),
            defending_unit.placement,
        ),
        defending_unit,
    })
}

fn retreat_eligibility(ruleset: &Ruleset, state: &GameState) -> RulesResult<GameEffect> {
    let movement = state.round_state.movement()?;
    let engagement = state.round_state.engagement()?;
    let EngagementResolutionState::Front(front) = &engagement.resolution else {
        return Err(RulesError::MissingState("front engagement"));
    };

    let defender = state.board.require_unit(engagement.defending_unit.unit)?;
    let legal_retreat_options = retreat_options(&state.board, ruleset.geometry(), defender.placement);
    let defence = ruleset
        .maybe_card(front.defensive_commitment.card())?
        .map_or(0, CardDefinition::defense_bonus);
    let attack = ruleset
        .maybe_card(movement.commitment.card())?
        .map_or(0, |card| card.attack_bonus(false));

    Ok(GameEffect::DetermineRetreatEligibility {
        eligible: !legal_retreat_options.is_empty() && defence >= attack,
        legal_retreat_options,
    })
}

fn rotate_flank_defender(state: &GameState) -> RulesResult<GameEffect> {
    let engagement = state.round_state.engagement()?;
    Ok(GameEffect::RotateFlankDefender {
        new_facing: engagement.engaging_unit.placement.facing.opposite(),
    })
}

fn ranged_attack(ruleset: &Ruleset, state: &GameState) -> RulesResult<GameEffect> {
    let ranged = state.round_state.ranged_attack()?;
    let attack = Attack {
        attacker: state.board.require_unit(ranged.attacker.unit)?,
        attacker_card: ranged.attacker_commitment.card(),
        defender_card: ranged.defender_commitment.card(),
        ranged: true,
    };
    let target = state.board.require_unit(ranged.defender.unit)?;
    Ok(GameEffect::ResolveRangedAttack {
        result: attack.against(ruleset, state, target)?,
    })
}

fn melee(ruleset: &Ruleset, state: &GameState) -> RulesResult<GameEffect> {
    let melee = state.round_state.current_melee()?;

    // results[side] is the attack suffered by side's unit.
    let suffered = |side: PlayerSide| -> RulesResult<AttackResult> {
        let attack = Attack {
            attacker: melee.units[side.opponent()],
            attacker_card: melee.commitments[side.opponent()].card(),
            defender_card: melee.commitments[side].card(),
            ranged: false,
        };
        attack.against(ruleset, state, melee.units[side])
    };
    let mut results = SideMap {
        black: suffered(PlayerSide::Black)?,
        white: suffered(PlayerSide::White)?,
    };

    // Two retreats may not end in the same space: the initiative side picks first.
    let first = state.first_player();
    let second = state.second_player();
    let retreats = |result: &AttackResult| !result.routed && result.retreated;
    if retreats(&results[first]) && retreats(&results[second]) {
        let taken = results[first].legal_retreat_options.clone();
        let remaining = results[second].legal_retreat_options.clone().relative_complement(taken);
        results[second].legal_retreat_options = remaining;
    }

    Ok(GameEffect::ResolveMelee {
        black: results.black,
        white: results.white,
    })
}

fn rout_penalty(ruleset: &Ruleset, rout: &RoutState) -> RulesResult<GameEffect> {
    let number_to_discard = rout
        .units
        .iter()
        .map(|unit| ruleset.unit_type(*unit).map(|unit_type| unit_type.rout_penalty))
        .sum::<RulesResult<u32>>()?;
    Ok(GameEffect::RoutPenalty { number_to_discard })
}

fn complete_retreat(retreat: &RetreatState) -> RulesResult<GameEffect> {
    let destination = retreat
        .final_position
        .ok_or(RulesError::MissingState("retreat destination"))?;
    Ok(GameEffect::CompleteRetreat {
        unit: retreat.unit.unit,
        destination,
    })
}

fn complete_reverse(reverse: &ReverseState) -> GameEffect {
    GameEffect::CompleteReverse {
        unit: reverse.unit.unit,
        new_facing: reverse.unit.placement.facing.opposite(),
    }
}

/// The rally's card draw and its loss of support.
///
/// The burnt card is drawn uniformly from the played pile (in card order)
/// by a generator seeded with `seed`. A unit loses support when the burnt
/// card supported its type and none of the side's other unburnt cards does.
pub fn resolve_rally(
    ruleset: &Ruleset,
    state: &GameState,
    side: PlayerSide,
    seed: u64,
) -> RulesResult<GameEffect> {
    let cards = &state.cards[side];
    let played: Vec<CardId> = cards.played.iter().copied().collect();

    let burnt_card = if played.is_empty() {
        None
    } else {
        let mut rng = GameRng::new(seed);
        Some(played[rng.gen_range_usize(0..played.len())])
    };

    let units_lost_support = match burnt_card {
        None => OrdSet::new(),
        Some(burnt) => {
            let burnt_definition = ruleset.card(burnt)?;
            let remaining = cards
                .unburnt()
                .filter(|&card| card != burnt)
                .map(|card| ruleset.card(card))
                .collect::<RulesResult<Vec<_>>>()?;
            state
                .board
                .units_of(side)
                .into_iter()
                .map(|placed| placed.unit)
                .filter(|unit| {
                    burnt_definition.supports(unit.unit_type)
                        && !remaining.iter().any(|card| card.supports(unit.unit_type))
                })
                .collect::<OrdSet<UnitInstance>>()
        }
    };

    Ok(GameEffect::ResolveRally {
        side,
        seed,
        burnt_card,
        units_lost_support,
    })
}

fn pending_rout(state: &GameState) -> RulesResult<&RoutState> {
    match state.round_state.pending_outcome(state.initiative) {
        Some(OutcomeRef::Rout(rout)) => Ok(rout),
        _ => Err(RulesError::MissingState("rout")),
    }
}

fn pending_retreat(state: &GameState) -> RulesResult<&RetreatState> {
    match state.round_state.pending_outcome(state.initiative) {
        Some(OutcomeRef::Retreat(retreat)) => Ok(retreat),
        _ => Err(RulesError::MissingState("retreat")),
    }
}

fn pending_reverse(state: &GameState) -> RulesResult<&ReverseState> {
    match state.round_state.pending_outcome(state.initiative) {
        Some(OutcomeRef::Reverse(reverse)) => Ok(reverse),
        _ => Err(RulesError::MissingState("reverse")),
    }
}
