use thiserror::Error;

/// Rejected constructor or setter input.
///
/// Validation failures are raised immediately at the point of invalid input
/// and leave the target object unchanged.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The level name was empty or contained only whitespace.
    #[error("level must have a name")]
    EmptyName,
    /// The map contained a character outside the block alphabet.
    #[error(
        "map code may only contain \"F\", \"P\", \"S\", \"W\", \"X\" and the space character, \
         found {found:?} at position {position}"
    )]
    InvalidMapChars {
        /// Offending character.
        found: char,
        /// Character offset of the offending character.
        position: usize,
    },
    /// The map contained more than one snake marker.
    #[error("map code can only contain at most one \"S\" character, found {count}")]
    TooManySnakeMarkers {
        /// Number of snake markers found.
        count: usize,
    },
    /// The map length was not the square of a supported side length.
    #[error("map of {cells} cells is not 15\u{d7}15, 16\u{d7}16, 17\u{d7}17, 18\u{d7}18, 19\u{d7}19, 20\u{d7}20 or 21\u{d7}21")]
    InvalidMapDimensions {
        /// Number of cells supplied.
        cells: usize,
    },
    /// A side length outside 15..=21 was requested.
    #[error("side length of map must be an integer in the range of 15 to 21, got {0}")]
    InvalidSideLength(u32),
    /// An initial snake length outside 1..=10 was requested.
    #[error("length must be an integer between 1 and 10, got {0}")]
    InvalidLength(u32),
    /// The growth rate was not one of the allowed fractions.
    #[error("growth rate {numerator}/{denominator} is not one of the allowed fractions")]
    InvalidGrowthRate {
        /// Requested numerator.
        numerator: u32,
        /// Requested denominator.
        denominator: u32,
    },
    /// A single block character outside the alphabet was supplied.
    #[error("{0:?} is not a valid block character")]
    InvalidBlockChar(char),
    /// A direction index outside `0..4` was supplied.
    #[error("{0} is not a valid direction index")]
    InvalidDirectionIndex(u8),
    /// A cell outside the map was addressed.
    #[error("cell ({x}, {y}) lies outside a map with side length {side_length}")]
    CellOutOfBounds {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Side length of the addressed map.
        side_length: u32,
    },
    /// An event name did not match any known event kind.
    #[error("\"{0}\" is not a valid event name")]
    UnknownEventName(String),
}

/// Operation attempted on an object in the wrong lifecycle state.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// A game was requested from a level lacking a snake start or food.
    #[error("level must be playable: it needs a snake start cell and at least one food cell")]
    Unplayable,
    /// An endless game was requested from a level without a snake start.
    #[error("level must contain a snake start cell")]
    MissingSnake,
    /// An endless game was requested from a level that still holds food.
    #[error("endless levels must not contain food, found {0} food cells")]
    FoodPresent(usize),
}
