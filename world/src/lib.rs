#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level and game state for the snake puzzle.
//!
//! A [`Level`] is the editable description of an arena. A [`Game`] takes a
//! private snapshot of a level and simulates the snake one move at a time.
//! [`check_solution`] replays a step code on a fresh game to decide whether
//! it wins the level.

mod game;
mod level;
mod map;
mod verify;

pub use game::{Game, StepLog, Target};
pub use level::{Level, LevelRecord};
pub use map::Map;
pub use verify::check_solution;
