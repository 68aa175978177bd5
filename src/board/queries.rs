//! Board queries composed from geometry and occupancy.

use im::OrdSet;

use super::coordinate::{Coordinate, UnitPlacement, UnitWithPlacement};
use super::geometry::BoardGeometry;
use super::state::BoardState;
use crate::state::EngagementType;

/// Number of friendly units lined up directly behind a unit.
///
/// Only single (unengaged) units count; the line stops at the first gap.
#[must_use]
pub fn support_count(
    board: &BoardState,
    geometry: &dyn BoardGeometry,
    supported: &UnitWithPlacement,
) -> u32 {
    let side = supported.unit.side;
    let friendly = |c: Coordinate| {
        board
            .single_at(c)
            .is_some_and(|placed| placed.unit.side == side)
    };
    let line = geometry.line_of_units(
        supported.coordinate(),
        supported.placement.facing.opposite(),
        &friendly,
    );
    u32::try_from(line.len()).unwrap_or(u32::MAX)
}

/// Empty spaces a unit may fall back into: behind it or beside it.
#[must_use]
pub fn retreat_options(
    board: &BoardState,
    geometry: &dyn BoardGeometry,
    placement: UnitPlacement,
) -> OrdSet<Coordinate> {
    let sides = [placement.facing.left(), placement.facing.right()]
        .into_iter()
        .filter_map(|facing| geometry.step(placement.coordinate, facing));

    geometry
        .back_spaces(placement)
        .into_iter()
        .chain(sides)
        .filter(|&c| board.is_empty_at(c))
        .collect()
}

/// Classify an engagement by the space the engaging unit entered from.
///
/// Rear takes priority over flank, flank over front: a rear diagonal is
/// both a back space and a flank space, and counts as rear.
#[must_use]
pub fn classify_engagement(
    geometry: &dyn BoardGeometry,
    approach: Coordinate,
    defender: UnitPlacement,
) -> EngagementType {
    if geometry.back_spaces(defender).contains(&approach) {
        EngagementType::Rear
    } else if geometry.flank_spaces(defender).contains(&approach) {
        EngagementType::Flank
    } else {
        EngagementType::Front
    }
}
