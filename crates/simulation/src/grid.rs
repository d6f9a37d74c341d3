//! Grid geometry: positions, directions and board bounds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discriminant values are what the browser shell receives for the direction
/// getter; do not reorder.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit vector `(dx, dy)`; y grows downwards.
    #[must_use]
    pub fn vector(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[must_use]
    pub fn is_opposite(self, other: Self) -> bool {
        self.opposite() == other
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// A cell coordinate. Signed so that a candidate head one step past the edge
/// is representable before the bounds check rejects it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step in `direction`. No wrapping.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.vector();
        Self::new(self.x + dx, self.y + dy)
    }

    /// True when the two cells share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: Self) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Square board of `count × count` cells. Only bounds live here; occupancy is
/// tracked by the snake itself.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Grid {
    pub count: i32,
}

impl Grid {
    #[must_use]
    pub const fn new(count: i32) -> Self {
        Self { count }
    }

    #[must_use]
    pub fn in_bounds(&self, pos: Position) -> bool {
        (0..self.count).contains(&pos.x) && (0..self.count).contains(&pos.y)
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        let side = usize::try_from(self.count).unwrap_or(0);
        side.saturating_mul(side)
    }

    /// Cell centre row, used for the starting snake.
    #[must_use]
    pub fn centre(&self) -> Position {
        Position::new(self.count / 2, self.count / 2)
    }

    /// Row-major iterator over every cell.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let n = self.count;
        (0..n).flat_map(move |y| (0..n).map(move |x| Position::new(x, y)))
    }
}
