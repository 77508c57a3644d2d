//! Core type definitions for the simulator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Species bits carried by a cell byte.
///
/// A cell is a bitmask over these three bits; bits 3-7 are ignored by the
/// engines.
pub mod cell {
    pub const A: u8 = 1;
    pub const B: u8 = 2;
    pub const C: u8 = 4;
    /// All species bits.
    pub const SPECIES: u8 = A | B | C;
}

/// One of the three species layers sharing a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    A,
    B,
    C,
}

impl Species {
    /// Species in the fixed evaluation order used by every engine.
    pub const ALL: [Species; 3] = [Species::A, Species::B, Species::C];

    pub fn bit(self) -> u8 {
        match self {
            Species::A => cell::A,
            Species::B => cell::B,
            Species::C => cell::C,
        }
    }

    /// The species of a cell holding exactly one species bit.
    pub fn from_bit(bit: u8) -> Option<Self> {
        match bit {
            cell::A => Some(Species::A),
            cell::B => Some(Species::B),
            cell::C => Some(Species::C),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Species::A => "A",
            Species::B => "B",
            Species::C => "C",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 2D position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Wrap the x axis for the given width; y is left untouched.
    pub fn wrap_x(&self, width: i64) -> Self {
        Self {
            x: self.x.rem_euclid(width),
            y: self.y,
        }
    }
}

/// Compass direction of a neighbor.
///
/// North is the neighbor at row `y + 1`. Each direction owns one bit of a
/// direction mask, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::NorthEast,
            Direction::East,
            Direction::SouthEast,
            Direction::South,
            Direction::SouthWest,
            Direction::West,
            Direction::NorthWest,
        ]
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn bit(self) -> u8 {
        1 << self.index()
    }

    pub fn to_delta(self) -> (i64, i64) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::South => "S",
            Direction::SouthWest => "SW",
            Direction::West => "W",
            Direction::NorthWest => "NW",
        }
    }
}

/// Direction mask bits, for building rules by hand.
pub mod dir {
    pub const N: u8 = 1 << 0;
    pub const NE: u8 = 1 << 1;
    pub const E: u8 = 1 << 2;
    pub const SE: u8 = 1 << 3;
    pub const S: u8 = 1 << 4;
    pub const SW: u8 = 1 << 5;
    pub const W: u8 = 1 << 6;
    pub const NW: u8 = 1 << 7;
}

/// Render the species present in `mask` as `A/B/C`, or `none`.
pub fn format_species_mask(mask: u8) -> String {
    let labels: Vec<&str> = Species::ALL
        .iter()
        .filter(|species| mask & species.bit() != 0)
        .map(|species| species.label())
        .collect();
    if labels.is_empty() {
        "none".to_string()
    } else {
        labels.join("/")
    }
}

/// Render the directions present in `mask` separated by spaces, or `none`.
pub fn format_direction_mask(mask: u8) -> String {
    let labels: Vec<&str> = Direction::all()
        .iter()
        .filter(|direction| mask & direction.bit() != 0)
        .map(|direction| direction.label())
        .collect();
    if labels.is_empty() {
        "none".to_string()
    } else {
        labels.join(" ")
    }
}
