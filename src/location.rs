use std::fmt;

use serde::{Deserialize, Serialize};

/// One cell of a 3x3 compass subdivision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Location {
    NorthWest,
    North,
    NorthEast,
    West,
    Central,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Location {
    pub const ALL: [Location; 9] = [
        Location::NorthWest,
        Location::North,
        Location::NorthEast,
        Location::West,
        Location::Central,
        Location::East,
        Location::SouthWest,
        Location::South,
        Location::SouthEast,
    ];

    /// Cell index in a row-major 3x3 subdivision. Kept as an explicit table
    /// rather than the enum discriminant.
    pub fn index(self) -> usize {
        match self {
            Location::NorthWest => 0,
            Location::North => 1,
            Location::NorthEast => 2,
            Location::West => 3,
            Location::Central => 4,
            Location::East => 5,
            Location::SouthWest => 6,
            Location::South => 7,
            Location::SouthEast => 8,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.iter().copied().find(|loc| loc.index() == index)
    }

    pub fn name(self) -> &'static str {
        match self {
            Location::NorthWest => "NorthWest",
            Location::North => "North",
            Location::NorthEast => "NorthEast",
            Location::West => "West",
            Location::Central => "Central",
            Location::East => "East",
            Location::SouthWest => "SouthWest",
            Location::South => "South",
            Location::SouthEast => "SouthEast",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
