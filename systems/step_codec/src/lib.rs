#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure codec for the compact move encoding recorded by games.
//!
//! A step code is a sequence of two-character pairs. The first character is
//! the direction digit (`0` up, `1` right, `2` down, `3` left) and the second
//! is a base-36 run counter where `0` means one step and `z` means
//! [`MAX_RUN_LENGTH`] steps. Longer runs continue in a fresh pair, so a
//! single run may span several pairs; [`decode`] coalesces adjacent pairs
//! that share a direction.

use serde::{Deserialize, Serialize};
use snake_puzzle_core::Direction;
use thiserror::Error;

/// Radix used for run counters.
pub const RUN_RADIX: u32 = 36;

/// Longest run a single pair can hold.
pub const MAX_RUN_LENGTH: u32 = RUN_RADIX;

const RUN_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Maximal stretch of consecutive unit steps in one direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Run {
    /// Direction shared by every step of the run.
    pub direction: Direction,
    /// Number of unit steps in the run.
    pub length: u32,
}

/// Structured form of a step code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Steps {
    /// Total number of unit steps.
    pub length: u64,
    /// Encoded form of the steps.
    pub code: String,
    /// Coalesced runs in play order.
    #[serde(rename = "array")]
    pub runs: Vec<Run>,
}

impl Steps {
    /// Creates an empty step record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one unit step, keeping the code and the runs in sync.
    pub fn push(&mut self, direction: Direction) {
        encode_append(&mut self.code, direction);
        self.length = self.length.saturating_add(1);
        match self.runs.last_mut() {
            Some(run) if run.direction == direction => run.length = run.length.saturating_add(1),
            _ => self.runs.push(Run {
                direction,
                length: 1,
            }),
        }
    }

    /// Expands the runs back into individual unit steps.
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.runs
            .iter()
            .flat_map(|run| std::iter::repeat(run.direction).take(run.length as usize))
    }

    /// Reports whether no step has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Reasons a step code cannot be decoded.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StepCodeError {
    /// A pair started with something other than a direction digit.
    #[error("expected a direction digit 0-3 at position {position}, found {found:?}")]
    InvalidDirection {
        /// Character offset of the pair.
        position: usize,
        /// Offending character.
        found: char,
    },
    /// A pair ended with something other than a base-36 counter.
    #[error("expected a run counter 0-9 or a-z at position {position}, found {found:?}")]
    InvalidRunLength {
        /// Character offset of the counter.
        position: usize,
        /// Offending character.
        found: char,
    },
    /// The code ended after a direction digit.
    #[error("direction digit at position {position} has no run counter")]
    DanglingDirection {
        /// Character offset of the unmatched direction digit.
        position: usize,
    },
}

/// Extends `code` by a single unit step in `direction`.
///
/// When the final pair already records `direction` and its counter is below
/// `z`, the counter is bumped in place; otherwise a new pair is appended.
pub fn encode_append(code: &mut String, direction: Direction) {
    let digit = direction_digit(direction);
    let bytes = code.as_bytes();
    if bytes.len() >= 2 && bytes.len() % 2 == 0 && bytes[bytes.len() - 2] == digit {
        let counter = bytes[bytes.len() - 1];
        if let Some(value) = run_value(counter) {
            if value + 1 < RUN_RADIX {
                let _ = code.pop();
                code.push(char::from(RUN_DIGITS[(value + 1) as usize]));
                return;
            }
        }
    }
    code.push(char::from(digit));
    code.push(char::from(RUN_DIGITS[0]));
}

/// Encodes a sequence of unit steps from scratch.
pub fn encode<I>(directions: I) -> String
where
    I: IntoIterator<Item = Direction>,
{
    let mut code = String::new();
    for direction in directions {
        encode_append(&mut code, direction);
    }
    code
}

/// Parses a step code into its total length and coalesced runs.
///
/// Only well-formed (direction, counter) pairs are accepted; any other input
/// is rejected with a [`StepCodeError`] rather than partially decoded.
pub fn decode(code: &str) -> Result<Steps, StepCodeError> {
    let mut steps = Steps {
        length: 0,
        code: code.to_owned(),
        runs: Vec::new(),
    };

    let mut chars = code.char_indices();
    while let Some((position, found)) = chars.next() {
        let direction = found
            .to_digit(10)
            .and_then(|digit| u8::try_from(digit).ok())
            .and_then(Direction::from_index)
            .ok_or(StepCodeError::InvalidDirection { position, found })?;

        let Some((counter_position, counter)) = chars.next() else {
            return Err(StepCodeError::DanglingDirection { position });
        };
        let count = u8::try_from(counter)
            .ok()
            .and_then(run_value)
            .ok_or(StepCodeError::InvalidRunLength {
                position: counter_position,
                found: counter,
            })?
            + 1;

        steps.length = steps.length.saturating_add(u64::from(count));
        match steps.runs.last_mut() {
            Some(run) if run.direction == direction => {
                run.length = run.length.saturating_add(count);
            }
            _ => steps.runs.push(Run {
                direction,
                length: count,
            }),
        }
    }

    Ok(steps)
}

fn direction_digit(direction: Direction) -> u8 {
    b'0' + direction.index()
}

fn run_value(counter: u8) -> Option<u32> {
    RUN_DIGITS
        .iter()
        .position(|digit| *digit == counter)
        .and_then(|index| u32::try_from(index).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_starts_a_pair() {
        let mut code = String::new();
        encode_append(&mut code, Direction::Right);
        assert_eq!(code, "10");
    }

    #[test]
    fn repeated_direction_bumps_counter() {
        let code = encode([Direction::Down, Direction::Down, Direction::Down]);
        assert_eq!(code, "22");
    }

    #[test]
    fn direction_change_starts_new_pair() {
        let code = encode([Direction::Up, Direction::Up, Direction::Left]);
        assert_eq!(code, "0130");
    }

    #[test]
    fn counter_saturates_at_z() {
        let code = encode(std::iter::repeat(Direction::Left).take(MAX_RUN_LENGTH as usize));
        assert_eq!(code, "3z");

        let code = encode(std::iter::repeat(Direction::Left).take(MAX_RUN_LENGTH as usize + 1));
        assert_eq!(code, "3z30");
    }

    #[test]
    fn counter_above_nine_uses_letters() {
        let code = encode(std::iter::repeat(Direction::Up).take(11));
        assert_eq!(code, "0a");
    }

    #[test]
    fn decode_coalesces_split_runs() {
        let steps = decode("3z34").expect("valid code");
        assert_eq!(steps.length, 41);
        assert_eq!(
            steps.runs,
            vec![Run {
                direction: Direction::Left,
                length: 41,
            }]
        );
    }

    #[test]
    fn decode_empty_code() {
        let steps = decode("").expect("empty code is valid");
        assert!(steps.is_empty());
        assert!(steps.runs.is_empty());
    }

    #[test]
    fn decode_rejects_malformed_pairs() {
        assert_eq!(
            decode("4a"),
            Err(StepCodeError::InvalidDirection {
                position: 0,
                found: '4',
            })
        );
        assert_eq!(
            decode("10x!"),
            Err(StepCodeError::InvalidDirection {
                position: 2,
                found: 'x',
            })
        );
        assert_eq!(
            decode("1-"),
            Err(StepCodeError::InvalidRunLength {
                position: 1,
                found: '-',
            })
        );
        assert_eq!(
            decode("102"),
            Err(StepCodeError::DanglingDirection { position: 2 })
        );
    }

    #[test]
    fn steps_push_matches_encode() {
        let path = [
            Direction::Right,
            Direction::Right,
            Direction::Down,
            Direction::Left,
            Direction::Left,
            Direction::Left,
        ];
        let mut steps = Steps::new();
        for direction in path {
            steps.push(direction);
        }

        assert_eq!(steps.code, encode(path));
        assert_eq!(decode(&steps.code), Ok(steps.clone()));
        assert_eq!(steps.directions().collect::<Vec<_>>(), path.to_vec());
    }
}
