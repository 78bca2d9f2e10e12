//! Handle-style entry points for presentation layers.
//!
//! A GUI, CLI or test harness owns one [`EngineHandle`] and calls these
//! functions on it. The handle is a plain value: there is no process-wide
//! game, and callers that share it across threads must serialize access.

use crate::game_state::GameState;
use crate::rng::SeededSource;
use crate::types::{Direction, EngineError, Grid};

/// One game session with a seeded tile source
pub type EngineHandle = GameState<SeededSource>;

/// Start a game seeded from OS entropy
pub fn new_game() -> EngineHandle {
    GameState::with_source(SeededSource::from_entropy())
}

/// Start a reproducible game
pub fn new_game_seeded(seed: u64) -> EngineHandle {
    GameState::new(seed)
}

pub fn reset(handle: &mut EngineHandle) {
    handle.reset();
}

/// Slide tiles towards `direction`; true if the board changed
pub fn make_move(handle: &mut EngineHandle, direction: Direction) -> bool {
    handle.apply_move(direction)
}

/// Like [`make_move`] for unvalidated input such as `"left"` or `"U"`
///
/// Unknown directions fail with [`EngineError::InvalidArgument`] and leave
/// the game untouched.
pub fn make_move_raw(handle: &mut EngineHandle, direction: &str) -> Result<bool, EngineError> {
    let direction = direction.parse::<Direction>()?;
    Ok(handle.apply_move(direction))
}

pub fn get_board(handle: &EngineHandle) -> Grid {
    handle.grid()
}

pub fn get_score(handle: &EngineHandle) -> u32 {
    handle.score()
}

pub fn is_terminal(handle: &EngineHandle) -> bool {
    handle.is_terminal()
}
