use snake_puzzle_system_step_codec::decode;
use tracing::debug;

use crate::{game::Game, level::Level};

/// Replays `code` on a fresh game of `level` and reports whether it wins.
///
/// Every unit step must be accepted, the game must not end before the last
/// run, and no step may be left over once it ends. Malformed codes, empty
/// codes and unplayable levels never verify.
#[must_use]
pub fn check_solution(level: &Level, code: &str) -> bool {
    let steps = match decode(code) {
        Ok(steps) if !steps.is_empty() => steps,
        Ok(_) => return false,
        Err(error) => {
            debug!(%error, "rejecting malformed step code");
            return false;
        }
    };
    let Ok(mut game) = Game::new(level) else {
        debug!(level = %level.name(), "level cannot be played");
        return false;
    };

    let last = steps.runs.len() - 1;
    for (index, run) in steps.runs.iter().enumerate() {
        let mut taken = 0;
        while taken < run.length {
            if !game.step_in(run.direction) {
                debug!(run = index, taken, "step refused during replay");
                return false;
            }
            taken += 1;
            if game.is_done() {
                break;
            }
        }
        if taken < run.length || (game.is_done() && index < last) {
            debug!(run = index, taken, "game ended before the code did");
            return false;
        }
    }

    game.is_won()
}
