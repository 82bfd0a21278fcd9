#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the snake puzzle engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative level and game state, and the pure step codec. Maps are
//! square toroidal grids of [`Block`] values addressed by [`CellCoord`];
//! snakes move in one of four [`Direction`]s and grow according to a
//! [`GrowthRate`]. Mutations performed by the world are broadcast as
//! [`GameEvent`] and [`LevelEvent`] values to handlers registered in a
//! [`Handlers`] registry.

use std::fmt;

use serde::{Deserialize, Serialize};

mod error;
mod event;

pub use error::{ConstraintViolation, ValidationError};
pub use event::{
    GameEvent, GameEventKind, HandlerId, Handlers, LevelEvent, LevelEventKind, Notification,
    Stamped,
};

/// Smallest side length a map may have.
pub const MIN_SIDE_LENGTH: u32 = 15;

/// Largest side length a map may have.
pub const MAX_SIDE_LENGTH: u32 = 21;

/// Shortest initial snake length a level may configure.
pub const MIN_SNAKE_LENGTH: u32 = 1;

/// Longest initial snake length a level may configure.
pub const MAX_SNAKE_LENGTH: u32 = 10;

/// Maximum number of trailing segments removed when the snake swallows a pill.
pub const PILL_SEGMENT_CUT: usize = 5;

/// Reports whether a side length lies within the supported range.
#[must_use]
pub const fn is_valid_side_length(side_length: u32) -> bool {
    MIN_SIDE_LENGTH <= side_length && side_length <= MAX_SIDE_LENGTH
}

/// Contents of a single map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Block {
    /// Open ground the snake may freely enter.
    Empty,
    /// Food that may grow the snake when eaten.
    Food,
    /// Pill that shrinks the snake when swallowed.
    Pill,
    /// Cell occupied by the snake.
    Snake,
    /// Impassable wall; moving into it is rejected.
    Wall,
    /// Lethal wall; moving into it kills the snake.
    DeadlyWall,
}

impl Block {
    /// Every block kind in declaration order.
    pub const ALL: [Block; 6] = [
        Block::Empty,
        Block::Food,
        Block::Pill,
        Block::Snake,
        Block::Wall,
        Block::DeadlyWall,
    ];

    /// Single-character code used in serialized maps.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Food => 'F',
            Self::Pill => 'P',
            Self::Snake => 'S',
            Self::Wall => 'W',
            Self::DeadlyWall => 'X',
        }
    }

    /// Parses a single-character map code.
    #[must_use]
    pub const fn from_char(code: char) -> Option<Self> {
        match code {
            ' ' => Some(Self::Empty),
            'F' => Some(Self::Food),
            'P' => Some(Self::Pill),
            'S' => Some(Self::Snake),
            'W' => Some(Self::Wall),
            'X' => Some(Self::DeadlyWall),
            _ => None,
        }
    }
}

impl TryFrom<char> for Block {
    type Error = ValidationError;

    fn try_from(code: char) -> Result<Self, Self::Error> {
        Self::from_char(code).ok_or(ValidationError::InvalidBlockChar(code))
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Cardinal movement directions, numbered clockwise from up.
///
/// Serialized as its numeric index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
}

impl Direction {
    /// All directions ordered by their numeric index.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Numeric index of the direction (`Up = 0` through `Left = 3`).
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }

    /// Resolves a numeric index back into a direction.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Up),
            1 => Some(Self::Right),
            2 => Some(Self::Down),
            3 => Some(Self::Left),
            _ => None,
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    /// Reports whether both directions move along the same axis.
    #[must_use]
    pub const fn shares_axis_with(self, other: Direction) -> bool {
        self.index() % 2 == other.index() % 2
    }
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> Self {
        direction.index()
    }
}

impl TryFrom<u8> for Direction {
    type Error = ValidationError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(ValidationError::InvalidDirectionIndex(index))
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Returns the neighbouring cell in `direction`, wrapping around a
    /// square grid with the provided side length.
    ///
    /// `side_length` must be non-zero and the coordinate must already lie
    /// inside the grid.
    #[must_use]
    pub const fn step(self, direction: Direction, side_length: u32) -> Self {
        match direction {
            Direction::Up => Self::new(self.x, (self.y + side_length - 1) % side_length),
            Direction::Right => Self::new((self.x + 1) % side_length, self.y),
            Direction::Down => Self::new(self.x, (self.y + 1) % side_length),
            Direction::Left => Self::new((self.x + side_length - 1) % side_length, self.y),
        }
    }

    /// Computes the Manhattan distance between two cell coordinates,
    /// ignoring wraparound.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Fraction of eaten food that should result in a new segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u32; 2]", into = "[u32; 2]")]
pub struct GrowthRate {
    numerator: u32,
    denominator: u32,
}

impl GrowthRate {
    /// Closed set of fractions a level may use, as `(numerator, denominator)`.
    pub const ALLOWED: [(u32, u32); 13] = [
        (1, 1),
        (1, 2),
        (1, 3),
        (2, 3),
        (3, 4),
        (2, 5),
        (3, 5),
        (4, 5),
        (5, 6),
        (3, 7),
        (4, 7),
        (5, 7),
        (6, 7),
    ];

    /// Growth on every piece of food.
    pub const ALWAYS: GrowthRate = GrowthRate {
        numerator: 1,
        denominator: 1,
    };

    /// Creates a growth rate, rejecting fractions outside [`GrowthRate::ALLOWED`].
    pub fn new(numerator: u32, denominator: u32) -> Result<Self, ValidationError> {
        if Self::ALLOWED.contains(&(numerator, denominator)) {
            Ok(Self {
                numerator,
                denominator,
            })
        } else {
            Err(ValidationError::InvalidGrowthRate {
                numerator,
                denominator,
            })
        }
    }

    /// Numerator of the fraction.
    #[must_use]
    pub const fn numerator(&self) -> u32 {
        self.numerator
    }

    /// Denominator of the fraction.
    #[must_use]
    pub const fn denominator(&self) -> u32 {
        self.denominator
    }

    /// Reports whether the snake should grow after its `food_eaten`-th meal,
    /// given it has grown `times_grown` times so far.
    ///
    /// Growth happens while `times_grown / food_eaten` is strictly below the
    /// rate. The comparison is carried out on cross-multiplied integers.
    #[must_use]
    pub fn permits_growth(&self, times_grown: u32, food_eaten: u32) -> bool {
        u64::from(times_grown) * u64::from(self.denominator)
            < u64::from(self.numerator) * u64::from(food_eaten)
    }
}

impl Default for GrowthRate {
    fn default() -> Self {
        Self::ALWAYS
    }
}

impl TryFrom<[u32; 2]> for GrowthRate {
    type Error = ValidationError;

    fn try_from([numerator, denominator]: [u32; 2]) -> Result<Self, Self::Error> {
        Self::new(numerator, denominator)
    }
}

impl From<GrowthRate> for [u32; 2] {
    fn from(rate: GrowthRate) -> Self {
        [rate.numerator, rate.denominator]
    }
}

impl fmt::Display for GrowthRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Lifecycle stage of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No direction has been accepted yet.
    Ready,
    /// The snake has been steered and the game is still in progress.
    Running,
    /// The snake died or the level was cleared; no further moves apply.
    Done,
}
