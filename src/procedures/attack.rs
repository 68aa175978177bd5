//! Attack value computation.
//!
//! ```text
//! value = base (attack or ranged attack)
//!       + support (friendly line behind the attacker, capped)
//!       + attacker's card modifiers (committed + in play)
//!       + commander bonus (attacker stands on its commander's space)
//!       - defender's committed defence
//! ```
//!
//! The value is floored at zero and compared against the target type's
//! thresholds; reaching a threshold triggers that outcome.

use im::OrdSet;

use crate::board::{retreat_options, support_count, Coordinate, UnitWithPlacement};
use crate::cards::CardId;
use crate::core::{RulesError, RulesResult};
use crate::rules::Ruleset;
use crate::state::{AttackResult, GameState};

/// One attack: who strikes, with which cards, and whether it is ranged.
#[derive(Clone, Copy, Debug)]
pub struct Attack {
    /// Attacking unit.
    pub attacker: UnitWithPlacement,
    /// Attacker's committed card.
    pub attacker_card: Option<CardId>,
    /// Defender's committed card.
    pub defender_card: Option<CardId>,
    /// Uses the ranged stat and ranged modifiers.
    pub ranged: bool,
}

impl Attack {
    /// Total attack value.
    pub fn value(&self, ruleset: &Ruleset, state: &GameState) -> RulesResult<i32> {
        let side = self.attacker.unit.side;
        let unit_type = ruleset.unit_type(self.attacker.unit)?;

        let base = if self.ranged {
            unit_type.ranged_attack.ok_or_else(|| {
                RulesError::InconsistentState(format!("{} has no ranged attack", self.attacker.unit))
            })?
        } else {
            unit_type.attack
        };

        let support = support_count(&state.board, ruleset.geometry(), &self.attacker)
            .min(ruleset.config.max_support);

        let committed = ruleset
            .maybe_card(self.attacker_card)?
            .map_or(0, |card| card.attack_bonus(self.ranged));
        let in_play = ruleset
            .in_play_card(state, side)?
            .map_or(0, |card| card.attack_bonus(self.ranged));

        let commander = if !state.commander_lost(side)
            && state.board.commanders[side] == Some(self.attacker.coordinate())
        {
            ruleset.config.commander_attack_bonus
        } else {
            0
        };

        let defence = ruleset
            .maybe_card(self.defender_card)?
            .map_or(0, |card| card.defense_bonus());

        let support = i32::try_from(support).unwrap_or(i32::MAX);
        Ok((base + support + committed + in_play + commander - defence).max(0))
    }

    /// Value, threshold outcomes and retreat options against a target.
    pub fn against(
        &self,
        ruleset: &Ruleset,
        state: &GameState,
        target: UnitWithPlacement,
    ) -> RulesResult<AttackResult> {
        let attack_value = self.value(ruleset, state)?;
        result_against(ruleset, state, target, attack_value)
    }
}

/// Compare an attack value against a target's thresholds.
pub fn result_against(
    ruleset: &Ruleset,
    state: &GameState,
    target: UnitWithPlacement,
    attack_value: i32,
) -> RulesResult<AttackResult> {
    let unit_type = ruleset.unit_type(target.unit)?;
    let reached = |threshold: Option<i32>| threshold.is_some_and(|t| attack_value >= t);
    let legal_retreat_options: OrdSet<Coordinate> =
        retreat_options(&state.board, ruleset.geometry(), target.placement);

    Ok(AttackResult {
        unit: target,
        attack_value,
        routed: reached(unit_type.rout_threshold),
        retreated: reached(unit_type.retreat_threshold),
        reversed: reached(unit_type.reverse_threshold),
        legal_retreat_options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardState, SquareGrid, UnitFacing, UnitPlacement};
    use crate::cards::{CardDefinition, CardModifier, CardRegistry, PlayerCardState};
    use crate::core::{PlayerSide, RulesConfig, SideMap};
    use crate::units::{UnitInstance, UnitRegistry, UnitType, UnitTypeId};

    const INFANTRY: UnitTypeId = UnitTypeId::new(1);
    const ARCHERS: UnitTypeId = UnitTypeId::new(2);

    fn ruleset() -> Ruleset {
        let mut units = UnitRegistry::new();
        units.register(
            UnitType::new(INFANTRY, "Infantry", 2).with_thresholds(Some(5), Some(3), Some(2)),
        );
        units.register(UnitType::new(ARCHERS, "Archers", 1).with_ranged_attack(2, 3));

        let mut cards = CardRegistry::new();
        cards.register(
            CardDefinition::new(CardId::new(1), "Charge")
                .with_modifier(CardModifier::Attack(2))
                .with_modifier(CardModifier::RangedAttack(1)),
        );
        cards.register(
            CardDefinition::new(CardId::new(2), "Shield Wall").with_modifier(CardModifier::Defense(3)),
        );

        Ruleset::new(RulesConfig::new().with_max_support(1), units, cards, SquareGrid::new(6, 6))
    }

    fn at(side: PlayerSide, unit_type: UnitTypeId, instance: u32, x: i32, y: i32) -> UnitWithPlacement {
        let facing = match side {
            PlayerSide::Black => UnitFacing::North,
            PlayerSide::White => UnitFacing::South,
        };
        UnitWithPlacement::new(
            UnitInstance::new(side, unit_type, instance),
            UnitPlacement::new(Coordinate::new(x, y), facing),
        )
    }

    fn state(units: &[UnitWithPlacement]) -> GameState {
        let mut board = BoardState::new();
        for unit in units {
            board.place(*unit).unwrap();
        }
        GameState::new(board, SideMap::new(|_| PlayerCardState::default()), PlayerSide::Black)
    }

    #[test]
    fn test_value_sums_every_source() {
        let ruleset = ruleset();
        let attacker = at(PlayerSide::Black, INFANTRY, 0, 2, 2);
        let mut state = state(&[
            attacker,
            at(PlayerSide::Black, INFANTRY, 1, 2, 3),
            at(PlayerSide::Black, INFANTRY, 2, 2, 4),
        ]);
        state.board.commanders.black = Some(Coordinate::new(2, 2));
        state.cards.black.in_play = Some(CardId::new(1));

        let attack = Attack {
            attacker,
            attacker_card: Some(CardId::new(1)),
            defender_card: None,
            ranged: false,
        };
        // base 2 + support 1 (capped) + committed 2 + in play 2 + commander 1
        assert_eq!(attack.value(&ruleset, &state).unwrap(), 8);
    }

    #[test]
    fn test_defence_floors_at_zero() {
        let ruleset = ruleset();
        let attacker = at(PlayerSide::Black, INFANTRY, 0, 2, 2);
        let state = state(&[attacker]);

        let attack = Attack {
            attacker,
            attacker_card: None,
            defender_card: Some(CardId::new(2)),
            ranged: false,
        };
        assert_eq!(attack.value(&ruleset, &state).unwrap(), 0);
    }

    #[test]
    fn test_ranged_uses_ranged_stat_and_modifiers() {
        let ruleset = ruleset();
        let archers = at(PlayerSide::Black, ARCHERS, 0, 2, 2);
        let state = state(&[archers]);

        let attack = Attack {
            attacker: archers,
            attacker_card: Some(CardId::new(1)),
            defender_card: None,
            ranged: true,
        };
        assert_eq!(attack.value(&ruleset, &state).unwrap(), 3);

        let melee_only = Attack {
            attacker: at(PlayerSide::Black, INFANTRY, 0, 2, 2),
            ranged: true,
            ..attack
        };
        assert!(melee_only.value(&ruleset, &state).is_err());
    }

    #[test]
    fn test_thresholds_reached_inclusively() {
        let ruleset = ruleset();
        let target = at(PlayerSide::White, INFANTRY, 0, 2, 2);
        let state = state(&[target]);

        let result = result_against(&ruleset, &state, target, 3).unwrap();
        assert!(!result.routed);
        assert!(result.retreated);
        assert!(result.reversed);
        // White faces south: back spaces are north of it, sides east and west.
        assert!(result.legal_retreat_options.contains(&Coordinate::new(2, 1)));
        assert!(result.legal_retreat_options.contains(&Coordinate::new(1, 2)));

        let archers = at(PlayerSide::White, ARCHERS, 0, 4, 4);
        let result = result_against(&ruleset, &state, archers, 10).unwrap();
        assert!(!result.routed && !result.retreated && !result.reversed);
    }
}
