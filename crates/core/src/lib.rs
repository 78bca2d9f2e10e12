//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the 2048 rules: sliding, merging, spawning and
//! terminal detection. It has **zero dependencies** on UI, networking, or I/O,
//! making it:
//!
//! - **Deterministic**: Same seed produces identical games (for bots and replays)
//! - **Testable**: Tile spawning goes through an injectable [`TileSource`]
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//! - **Fast**: Zero-allocation moves on a flat 16-cell array
//!
//! # Module Structure
//!
//! - [`board`]: 4x4 grid with shifting, transposition and terminal detection
//! - [`line`]: compress / merge of a single row or column
//! - [`game_state`]: one session: board, score, tile source, counters
//! - [`rng`]: tile source trait plus seeded and scripted implementations
//! - [`snapshot`]: copyable read-only view of a session
//! - [`api`]: handle-style functions for presentation layers
//!
//! # Game Rules
//!
//! - **Move**: every line slides towards the chosen direction; zeros are
//!   squeezed out, then equal neighbours merge once, scanning from the
//!   destination edge
//! - **Score**: each merge adds the merged tile's value
//! - **Spawn**: after a move that changed the board, one 2 or 4 (even odds)
//!   lands on a uniformly chosen empty cell
//! - **Terminal**: no empty cell and no equal neighbours; only a reset leaves it
//!
//! # Example
//!
//! ```
//! use twenty48_core::GameState;
//! use twenty48_types::{Direction, GameAction};
//!
//! // Create a game: two tiles are already on the board
//! let mut game = GameState::new(12345);
//! assert_eq!(game.board().tile_count(), 2);
//!
//! // Apply moves
//! game.apply_move(Direction::Left);
//! game.apply_action(GameAction::Move(Direction::Up));
//!
//! // Check game state
//! assert!(!game.is_terminal());
//! ```

pub mod api;
pub mod board;
pub mod game_state;
pub mod line;
pub mod rng;
pub mod snapshot;

pub use twenty48_types as types;

// Re-export commonly used types for convenience
pub use api::EngineHandle;
pub use board::Board;
pub use game_state::GameState;
pub use line::{compress_line, merge_line, slide_line};
pub use rng::{ScriptedSource, SeededSource, TileSource};
pub use snapshot::{board_hash, GameSnapshot};
