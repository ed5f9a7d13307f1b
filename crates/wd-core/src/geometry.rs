use std::fmt;

use serde::{Deserialize, Serialize};

/// A tile coordinate in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Column, growing eastwards.
    pub x: i32,
    /// Row, growing southwards.
    pub y: i32,
}

impl Position {
    /// Create a position from its two coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring tile one step in `dir`.
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Manhattan (taxicab) distance to another position.
    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four cardinal steps a creature can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// +x
    East,
    /// -x
    West,
    /// +y
    South,
    /// -y
    North,
}

impl Direction {
    /// All directions in enumeration order: +x, -x, +y, -y.
    ///
    /// Flee tie-breaking and uniform random steps both index into this array.
    pub const CARDINALS: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    /// The `(dx, dy)` offset of one step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::South => (0, 1),
            Self::North => (0, -1),
        }
    }

    /// The unit step along x with the sign of `dx`, if `dx` is non-zero.
    pub fn along_x(dx: i32) -> Option<Self> {
        match dx.signum() {
            1 => Some(Self::East),
            -1 => Some(Self::West),
            _ => None,
        }
    }

    /// The unit step along y with the sign of `dy`, if `dy` is non-zero.
    pub fn along_y(dy: i32) -> Option<Self> {
        match dy.signum() {
            1 => Some(Self::South),
            -1 => Some(Self::North),
            _ => None,
        }
    }
}
