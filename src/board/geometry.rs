//! Board geometry collaborator.
//!
//! The rules core never does coordinate arithmetic itself. It asks a
//! `BoardGeometry` which spaces exist, which are adjacent, how far apart two
//! spaces are, and which spaces lie in front of, behind, or to the flank of a
//! placed unit. `SquareGrid` is the reference implementation: a rectangle
//! with eight-way adjacency.

use super::coordinate::{Coordinate, UnitFacing, UnitPlacement};

/// Geometry queries the rules core relies on.
pub trait BoardGeometry: std::fmt::Debug + Send + Sync {
    /// Whether the coordinate is on the board.
    fn contains(&self, coordinate: Coordinate) -> bool;

    /// Distance in moves between two spaces.
    fn distance(&self, a: Coordinate, b: Coordinate) -> u32;

    /// The neighbouring space in a direction, if on the board.
    fn step(&self, from: Coordinate, facing: UnitFacing) -> Option<Coordinate>;

    /// On-board spaces adjacent to a space.
    fn neighbours(&self, coordinate: Coordinate) -> Vec<Coordinate>;

    /// Spaces a placed unit faces.
    fn front_spaces(&self, placement: UnitPlacement) -> Vec<Coordinate>;

    /// Spaces behind a placed unit.
    fn back_spaces(&self, placement: UnitPlacement) -> Vec<Coordinate>;

    /// Spaces on a placed unit's flanks.
    fn flank_spaces(&self, placement: UnitPlacement) -> Vec<Coordinate>;

    /// Whether two distinct spaces touch.
    fn adjacent(&self, a: Coordinate, b: Coordinate) -> bool {
        a != b && self.distance(a, b) == 1
    }

    /// The contiguous line of spaces satisfying `occupied`, starting one step
    /// from `start` and continuing in `direction`.
    fn line_of_units(
        &self,
        start: Coordinate,
        direction: UnitFacing,
        occupied: &dyn Fn(Coordinate) -> bool,
    ) -> Vec<Coordinate> {
        let mut line = Vec::new();
        let mut current = start;
        while let Some(next) = self.step(current, direction) {
            if !occupied(next) {
                break;
            }
            line.push(next);
            current = next;
        }
        line
    }
}

/// Rectangular board with eight-way adjacency.
///
/// ```
/// use commander_rules::board::{BoardGeometry, Coordinate, SquareGrid};
///
/// let grid = SquareGrid::new(5, 4);
/// assert!(grid.contains(Coordinate::new(4, 3)));
/// assert!(!grid.contains(Coordinate::new(5, 0)));
/// assert_eq!(grid.distance(Coordinate::new(0, 0), Coordinate::new(2, 1)), 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SquareGrid {
    width: i32,
    height: i32,
}

impl SquareGrid {
    /// Create a grid of the given size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    fn offset_spaces(&self, origin: Coordinate, deltas: &[(i32, i32)]) -> Vec<Coordinate> {
        deltas
            .iter()
            .map(|&(dx, dy)| origin.offset(dx, dy))
            .filter(|&c| self.contains(c))
            .collect()
    }
}

fn add((ax, ay): (i32, i32), (bx, by): (i32, i32)) -> (i32, i32) {
    (ax + bx, ay + by)
}

impl BoardGeometry for SquareGrid {
    fn contains(&self, coordinate: Coordinate) -> bool {
        (0..self.width).contains(&coordinate.x) && (0..self.height).contains(&coordinate.y)
    }

    fn distance(&self, a: Coordinate, b: Coordinate) -> u32 {
        a.x.abs_diff(b.x).max(a.y.abs_diff(b.y))
    }

    fn step(&self, from: Coordinate, facing: UnitFacing) -> Option<Coordinate> {
        let (dx, dy) = facing.delta();
        Some(from.offset(dx, dy)).filter(|&c| self.contains(c))
    }

    fn neighbours(&self, coordinate: Coordinate) -> Vec<Coordinate> {
        self.offset_spaces(
            coordinate,
            &[(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)],
        )
    }

    fn front_spaces(&self, placement: UnitPlacement) -> Vec<Coordinate> {
        let ahead = placement.facing.delta();
        let left = placement.facing.left().delta();
        let right = placement.facing.right().delta();
        self.offset_spaces(
            placement.coordinate,
            &[add(ahead, left), ahead, add(ahead, right)],
        )
    }

    fn back_spaces(&self, placement: UnitPlacement) -> Vec<Coordinate> {
        let behind = placement.facing.opposite().delta();
        let left = placement.facing.left().delta();
        let right = placement.facing.right().delta();
        self.offset_spaces(
            placement.coordinate,
            &[add(behind, left), behind, add(behind, right)],
        )
    }

    fn flank_spaces(&self, placement: UnitPlacement) -> Vec<Coordinate> {
        let behind = placement.facing.opposite().delta();
        let left = placement.facing.left().delta();
        let right = placement.facing.right().delta();
        self.offset_spaces(
            placement.coordinate,
            &[left, right, add(behind, left), add(behind, right)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(x: i32, y: i32, facing: UnitFacing) -> UnitPlacement {
        UnitPlacement::new(Coordinate::new(x, y), facing)
    }

    #[test]
    fn test_adjacency_is_eight_way() {
        let grid = SquareGrid::new(5, 5);
        let centre = Coordinate::new(2, 2);

        assert!(grid.adjacent(centre, Coordinate::new(3, 3)));
        assert!(grid.adjacent(centre, Coordinate::new(2, 1)));
        assert!(!grid.adjacent(centre, centre));
        assert!(!grid.adjacent(centre, Coordinate::new(4, 2)));

        assert_eq!(grid.neighbours(centre).len(), 8);
        assert_eq!(grid.neighbours(Coordinate::new(0, 0)).len(), 3);
        assert!(grid.neighbours(centre).iter().all(|&c| grid.adjacent(centre, c)));
    }

    #[test]
    fn test_front_and_back_spaces() {
        let grid = SquareGrid::new(5, 5);
        let p = placement(2, 2, UnitFacing::North);

        let mut front = grid.front_spaces(p);
        front.sort();
        assert_eq!(
            front,
            vec![Coordinate::new(1, 1), Coordinate::new(2, 1), Coordinate::new(3, 1)]
        );

        let mut back = grid.back_spaces(p);
        back.sort();
        assert_eq!(
            back,
            vec![Coordinate::new(1, 3), Coordinate::new(2, 3), Coordinate::new(3, 3)]
        );
    }

    #[test]
    fn test_flank_spaces_share_rear_diagonals() {
        let grid = SquareGrid::new(5, 5);
        let p = placement(2, 2, UnitFacing::East);

        let flank = grid.flank_spaces(p);
        let back = grid.back_spaces(p);

        assert!(flank.contains(&Coordinate::new(2, 1)));
        assert!(flank.contains(&Coordinate::new(2, 3)));
        // Rear diagonals belong to both sets.
        assert!(flank.contains(&Coordinate::new(1, 1)) && back.contains(&Coordinate::new(1, 1)));
    }

    #[test]
    fn test_spaces_are_clipped_to_board() {
        let grid = SquareGrid::new(3, 3);
        let p = placement(0, 0, UnitFacing::North);

        assert!(grid.front_spaces(p).is_empty());
        assert_eq!(grid.step(Coordinate::new(0, 0), UnitFacing::West), None);
    }

    #[test]
    fn test_line_of_units() {
        let grid = SquareGrid::new(5, 5);
        let occupied = |c: Coordinate| c.x == 2 && c.y >= 3;

        let line = grid.line_of_units(Coordinate::new(2, 2), UnitFacing::South, &occupied);
        assert_eq!(line, vec![Coordinate::new(2, 3), Coordinate::new(2, 4)]);

        let none = grid.line_of_units(Coordinate::new(2, 2), UnitFacing::North, &occupied);
        assert!(none.is_empty());
    }
}
