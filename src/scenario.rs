//! Scenario setup.
//!
//! `ScenarioBuilder` assembles a [`Ruleset`] and the opening [`GameState`]
//! from unit types, cards, hands and placements. [`ScenarioBuilder::standard`]
//! is a small ready-made battle used by the tests and benchmarks.

use crate::board::{BoardState, Coordinate, SquareGrid, UnitFacing, UnitPlacement, UnitWithPlacement};
use crate::cards::{CardDefinition, CardId, CardModifier, CardRegistry, PlayerCardState};
use crate::core::{PlayerSide, RulesConfig, RulesError, RulesResult, SideMap};
use crate::rules::Ruleset;
use crate::state::GameState;
use crate::units::{UnitInstance, UnitRegistry, UnitType, UnitTypeId};

/// Unit type ids of the standard scenario.
pub mod standard {
    use crate::units::UnitTypeId;

    /// Line infantry.
    pub const INFANTRY: UnitTypeId = UnitTypeId::new(1);
    /// Fast, hard-hitting horse.
    pub const CAVALRY: UnitTypeId = UnitTypeId::new(2);
    /// Shooters.
    pub const ARCHERS: UnitTypeId = UnitTypeId::new(3);
}

/// Builder for a ruleset and an opening state.
#[derive(Debug)]
pub struct ScenarioBuilder {
    config: RulesConfig,
    width: i32,
    height: i32,
    unit_types: Vec<UnitType>,
    cards: Vec<CardDefinition>,
    hands: SideMap<Vec<CardId>>,
    placements: Vec<UnitWithPlacement>,
    commanders: SideMap<Option<Coordinate>>,
    initiative: PlayerSide,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self {
            config: RulesConfig::default(),
            width: 8,
            height: 8,
            unit_types: Vec::new(),
            cards: Vec::new(),
            hands: SideMap::default(),
            placements: Vec::new(),
            commanders: SideMap::default(),
            initiative: PlayerSide::Black,
        }
    }
}

impl ScenarioBuilder {
    /// Empty 8x8 scenario with black holding the initiative.
    pub fn new() -> Self {
        Self::default()
    }

    /// Small two-army battle on an 8x8 board.
    ///
    /// Each side fields three infantry, one cavalry and one archer unit,
    /// with its commander standing on the centre infantry. Black holds
    /// cards 1-5 and white cards 11-15; the two decks are mirror images.
    pub fn standard() -> Self {
        use standard::{ARCHERS, CAVALRY, INFANTRY};

        let mut builder = Self::new()
            .unit_type(
                UnitType::new(INFANTRY, "Infantry", 2)
                    .with_thresholds(Some(6), Some(4), Some(3))
                    .with_rout_penalty(1),
            )
            .unit_type(
                UnitType::new(CAVALRY, "Cavalry", 3)
                    .with_speed(3)
                    .with_thresholds(Some(5), Some(4), Some(3))
                    .with_rout_penalty(2),
            )
            .unit_type(
                UnitType::new(ARCHERS, "Archers", 1)
                    .with_ranged_attack(2, 3)
                    .with_thresholds(Some(4), Some(3), Some(2))
                    .with_rout_penalty(1),
            );

        for (side, offset) in [(PlayerSide::Black, 0), (PlayerSide::White, 10)] {
            let deck = standard_deck(offset);
            builder = builder.hand(side, deck.iter().map(|card| card.id));
            for card in deck {
                builder = builder.card(card);
            }
        }

        builder
            .place(PlayerSide::Black, INFANTRY, 0, Coordinate::new(2, 5), UnitFacing::North)
            .place(PlayerSide::Black, INFANTRY, 1, Coordinate::new(3, 5), UnitFacing::North)
            .place(PlayerSide::Black, INFANTRY, 2, Coordinate::new(4, 5), UnitFacing::North)
            .place(PlayerSide::Black, CAVALRY, 0, Coordinate::new(5, 5), UnitFacing::North)
            .place(PlayerSide::Black, ARCHERS, 0, Coordinate::new(3, 6), UnitFacing::North)
            .commander(PlayerSide::Black, Coordinate::new(3, 5))
            .place(PlayerSide::White, INFANTRY, 0, Coordinate::new(2, 2), UnitFacing::South)
            .place(PlayerSide::White, INFANTRY, 1, Coordinate::new(3, 2), UnitFacing::South)
            .place(PlayerSide::White, INFANTRY, 2, Coordinate::new(4, 2), UnitFacing::South)
            .place(PlayerSide::White, CAVALRY, 0, Coordinate::new(1, 2), UnitFacing::South)
            .place(PlayerSide::White, ARCHERS, 0, Coordinate::new(3, 1), UnitFacing::South)
            .commander(PlayerSide::White, Coordinate::new(3, 2))
    }

    pub fn config(mut self, config: RulesConfig) -> Self {
        self.config = config;
        self
    }

    pub fn board_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Add a unit type. Duplicate ids are reported by [`ScenarioBuilder::build`].
    pub fn unit_type(mut self, unit_type: UnitType) -> Self {
        self.unit_types.push(unit_type);
        self
    }

    /// Add a card definition. Duplicate ids are reported by [`ScenarioBuilder::build`].
    pub fn card(mut self, card: CardDefinition) -> Self {
        self.cards.push(card);
        self
    }

    /// Set a side's starting hand.
    pub fn hand(mut self, side: PlayerSide, cards: impl IntoIterator<Item = CardId>) -> Self {
        self.hands[side] = cards.into_iter().collect();
        self
    }

    /// Place a unit.
    pub fn place(
        mut self,
        side: PlayerSide,
        unit_type: UnitTypeId,
        instance: u32,
        at: Coordinate,
        facing: UnitFacing,
    ) -> Self {
        self.placements.push(UnitWithPlacement::new(
            UnitInstance::new(side, unit_type, instance),
            UnitPlacement::new(at, facing),
        ));
        self
    }

    pub fn commander(mut self, side: PlayerSide, at: Coordinate) -> Self {
        self.commanders[side] = Some(at);
        self
    }

    /// Side holding the initiative before the first reveal.
    pub fn initiative(mut self, side: PlayerSide) -> Self {
        self.initiative = side;
        self
    }

    /// Build the ruleset and the opening state.
    ///
    /// Fails when an id is defined twice, two placements share a space, or
    /// a hand names an unknown card.
    pub fn build(self) -> RulesResult<(Ruleset, GameState)> {
        let mut units = UnitRegistry::new();
        for unit_type in self.unit_types {
            if units.get(unit_type.id).is_some() {
                return Err(RulesError::InconsistentState(format!(
                    "unit type {} defined twice",
                    unit_type.id
                )));
            }
            units.register(unit_type);
        }

        let mut registry = CardRegistry::new();
        for card in self.cards {
            if registry.get(card.id).is_some() {
                return Err(RulesError::InconsistentState(format!("{} defined twice", card.id)));
            }
            registry.register(card);
        }

        let mut board = BoardState::new();
        for unit in &self.placements {
            board.place(*unit)?;
        }
        board.commanders = self.commanders;

        for (_, hand) in self.hands.iter() {
            for card in hand {
                registry.require(*card)?;
            }
        }
        let cards = self
            .hands
            .map(|_, hand| PlayerCardState::with_hand(hand.iter().copied()));

        let ruleset = Ruleset::new(
            self.config,
            units,
            registry,
            SquareGrid::new(self.width, self.height),
        );
        Ok((ruleset, GameState::new(board, cards, self.initiative)))
    }
}

fn standard_deck(offset: u32) -> Vec<CardDefinition> {
    use standard::{ARCHERS, CAVALRY, INFANTRY};

    let id = |n: u32| CardId::new(offset + n);
    vec![
        CardDefinition::new(id(1), "Advance")
            .with_initiative(3)
            .with_command_size(2)
            .with_modifier(CardModifier::Attack(1))
            .supporting(INFANTRY),
        CardDefinition::new(id(2), "Charge")
            .with_initiative(5)
            .with_command_size(1)
            .with_modifier(CardModifier::Attack(2))
            .supporting(CAVALRY),
        CardDefinition::new(id(3), "Volley")
            .with_initiative(2)
            .with_command_size(2)
            .with_modifier(CardModifier::RangedAttack(2))
            .supporting(ARCHERS),
        CardDefinition::new(id(4), "Shield Wall")
            .with_initiative(1)
            .with_command_size(3)
            .with_modifier(CardModifier::Defense(2))
            .supporting(INFANTRY),
        CardDefinition::new(id(5), "Rally the Line")
            .with_initiative(4)
            .with_command_size(3)
            .with_modifier(CardModifier::Defense(1))
            .supporting(CAVALRY)
            .supporting(ARCHERS),
    ]
}
