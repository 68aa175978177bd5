//! Static rules context: configuration, definitions, and board geometry.

use crate::board::BoardGeometry;
use crate::cards::{CardDefinition, CardId, CardRegistry};
use crate::core::{PlayerSide, RulesConfig, RulesResult};
use crate::state::GameState;
use crate::units::{UnitInstance, UnitRegistry, UnitType};

/// Everything about a game that never changes while it is played.
///
/// The applier does not need a `Ruleset`: effect payloads already carry
/// every computed number. Generators, validation and legal-choice
/// enumeration do.
#[derive(Debug)]
pub struct Ruleset {
    /// Tunable numbers.
    pub config: RulesConfig,
    /// Unit type stat blocks.
    pub units: UnitRegistry,
    /// Card definitions.
    pub cards: CardRegistry,
    /// Board shape.
    pub geometry: Box<dyn BoardGeometry>,
}

impl Ruleset {
    /// Bundle a ruleset.
    pub fn new(
        config: RulesConfig,
        units: UnitRegistry,
        cards: CardRegistry,
        geometry: impl BoardGeometry + 'static,
    ) -> Self {
        Self {
            config,
            units,
            cards,
            geometry: Box::new(geometry),
        }
    }

    /// Board geometry as a trait object.
    #[must_use]
    pub fn geometry(&self) -> &dyn BoardGeometry {
        self.geometry.as_ref()
    }

    /// Stat block of a unit.
    pub fn unit_type(&self, unit: UnitInstance) -> RulesResult<&UnitType> {
        self.units.require(unit.unit_type)
    }

    /// Definition of a card.
    pub fn card(&self, card: CardId) -> RulesResult<&CardDefinition> {
        self.cards.require(card)
    }

    /// Definition of an optional card.
    pub fn maybe_card(&self, card: Option<CardId>) -> RulesResult<Option<&CardDefinition>> {
        card.map(|id| self.card(id)).transpose()
    }

    /// Definition of a side's in-play card, if it has one.
    pub fn in_play_card(
        &self,
        state: &GameState,
        side: PlayerSide,
    ) -> RulesResult<Option<&CardDefinition>> {
        self.maybe_card(state.cards[side].in_play)
    }
}
