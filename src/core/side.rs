//! Player sides and per-side data storage.
//!
//! ## PlayerSide
//!
//! The game is strictly two-player: `Black` and `White`.
//!
//! ## SideMap
//!
//! Per-side data storage with named `black` / `white` fields.
//! Supports iteration and indexing by `PlayerSide`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerSide {
    /// The black player.
    Black,
    /// The white player.
    White,
}

impl PlayerSide {
    /// Both sides, black first.
    pub const ALL: [PlayerSide; 2] = [PlayerSide::Black, PlayerSide::White];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            PlayerSide::Black => PlayerSide::White,
            PlayerSide::White => PlayerSide::Black,
        }
    }
}

impl std::fmt::Display for PlayerSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerSide::Black => write!(f, "black"),
            PlayerSide::White => write!(f, "white"),
        }
    }
}

/// Per-side data storage.
///
/// ## Example
///
/// ```
/// use commander_rules::core::{PlayerSide, SideMap};
///
/// let mut hand_sizes: SideMap<u32> = SideMap::new(|_| 5);
///
/// hand_sizes[PlayerSide::White] = 4;
/// assert_eq!(hand_sizes[PlayerSide::Black], 5);
/// assert_eq!(hand_sizes[PlayerSide::White], 4);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    /// Black's entry.
    pub black: T,
    /// White's entry.
    pub white: T,
}

impl<T> SideMap<T> {
    /// Create a new SideMap with values from a factory function.
    pub fn new(factory: impl Fn(PlayerSide) -> T) -> Self {
        Self {
            black: factory(PlayerSide::Black),
            white: factory(PlayerSide::White),
        }
    }

    /// Create a new SideMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            black: value.clone(),
            white: value,
        }
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: PlayerSide) -> &T {
        match side {
            PlayerSide::Black => &self.black,
            PlayerSide::White => &self.white,
        }
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: PlayerSide) -> &mut T {
        match side {
            PlayerSide::Black => &mut self.black,
            PlayerSide::White => &mut self.white,
        }
    }

    /// Iterate over (PlayerSide, &T) pairs, black first.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerSide, &T)> {
        [(PlayerSide::Black, &self.black), (PlayerSide::White, &self.white)].into_iter()
    }

    /// Map each entry to a new value.
    pub fn map<U>(&self, f: impl Fn(PlayerSide, &T) -> U) -> SideMap<U> {
        SideMap {
            black: f(PlayerSide::Black, &self.black),
            white: f(PlayerSide::White, &self.white),
        }
    }
}

impl<T> Index<PlayerSide> for SideMap<T> {
    type Output = T;

    fn index(&self, side: PlayerSide) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<PlayerSide> for SideMap<T> {
    fn index_mut(&mut self, side: PlayerSide) -> &mut Self::Output {
        self.get_mut(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(PlayerSide::Black.opponent(), PlayerSide::White);
        assert_eq!(PlayerSide::White.opponent(), PlayerSide::Black);
        assert_eq!(format!("{}", PlayerSide::Black), "black");
    }

    #[test]
    fn test_side_map_new() {
        let map: SideMap<i32> = SideMap::new(|side| match side {
            PlayerSide::Black => 1,
            PlayerSide::White => 2,
        });

        assert_eq!(map[PlayerSide::Black], 1);
        assert_eq!(map[PlayerSide::White], 2);
    }

    #[test]
    fn test_side_map_mutation() {
        let mut map: SideMap<Vec<i32>> = SideMap::default();

        map[PlayerSide::White].push(7);

        assert!(map[PlayerSide::Black].is_empty());
        assert_eq!(map[PlayerSide::White], vec![7]);
    }

    #[test]
    fn test_side_map_iter_order() {
        let map = SideMap::with_value(0u8);
        let sides: Vec<_> = map.iter().map(|(side, _)| side).collect();
        assert_eq!(sides, vec![PlayerSide::Black, PlayerSide::White]);
    }

    #[test]
    fn test_side_map_serialization() {
        let map = SideMap { black: 3u32, white: 4u32 };
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"black":3,"white":4}"#);

        let deserialized: SideMap<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
