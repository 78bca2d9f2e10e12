//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data with no game logic, so it can be shared by the
//! engine, the control adapter and any presentation layer.
//!
//! # Board Dimensions
//!
//! The classic 2048 playfield is a 4x4 grid:
//!
//! - **Size**: 4 rows, 4 columns (indexed 0-3)
//! - **Empty cell**: value `0`
//! - **Tile**: any power of two >= 2
//!
//! # Spawn Rules
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `NEW_TILE_VALUES` | `[2, 4]` | Values a spawned tile can take, chosen uniformly |
//! | `START_TILES` | 2 | Tiles placed at the start of every session |
//!
//! # Examples
//!
//! ```
//! use twenty48_types::{Direction, GameAction, BOARD_SIZE};
//!
//! // Parse from string (case-insensitive)
//! let dir: Direction = "Up".parse().unwrap();
//! assert_eq!(dir, Direction::Up);
//!
//! // Unknown values are rejected with InvalidArgument
//! assert!("north".parse::<Direction>().is_err());
//!
//! // Parse protocol action
//! let action = GameAction::from_str("restart").unwrap();
//! assert_eq!(action, GameAction::Restart);
//!
//! assert_eq!(BOARD_SIZE, 4);
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Board width and height in cells (4x4)
pub const BOARD_SIZE: usize = 4;

/// Total number of cells on the board
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Values a freshly spawned tile can take (uniform choice)
pub const NEW_TILE_VALUES: [u32; 2] = [2, 4];

/// Number of tiles spawned when a session starts
pub const START_TILES: usize = 2;

/// Largest tile a 4x4 board can hold (2^17)
///
/// Reaching it needs every other cell filled with 4, 8, ..., 65536, so no
/// legal game goes past it.
pub const MAX_TILE: u32 = 1 << 17;

/// One row or one column of the board
pub type Line = [u32; BOARD_SIZE];

/// Read-only row-major view of the board handed to callers
pub type Grid = [[u32; BOARD_SIZE]; BOARD_SIZE];


/// Errors surfaced at the engine boundary.
///
/// Only raw caller input can fail; every operation on a well-formed board is
/// total. Internal invariant violations panic instead of producing one of
/// these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// An out-of-enum direction or action value
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// The four directions tiles can slide in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in wire-index order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Convert to lowercase string
    ///
    /// # Examples
    ///
    /// ```
    /// use twenty48_types::Direction;
    ///
    /// assert_eq!(Direction::Up.as_str(), "up");
    /// assert_eq!(Direction::Right.as_str(), "right");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Whether this direction walks columns instead of rows
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Whether lines are processed back-to-front for this direction
    pub fn is_reversed(&self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse direction from string
///
/// Accepts full names or single letters (case-insensitive):
/// "up" | "u", "down" | "d", "left" | "l", "right" | "r"
impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            _ => Err(EngineError::InvalidArgument(format!(
                "unknown direction {:?}",
                s
            ))),
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Direction::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| EngineError::InvalidArgument(format!("direction index {}", value)))
    }
}

/// Actions a caller can apply to a running game
///
/// Used by the control adapter; a presentation layer maps its own input
/// events onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Slide every tile in a direction
    Move(Direction),
    /// Throw the current session away and start a new one
    Restart,
}

impl GameAction {
    /// Parse action from string (for the control protocol)
    ///
    /// # Examples
    ///
    /// ```
    /// use twenty48_types::{Direction, GameAction};
    ///
    /// assert_eq!(GameAction::from_str("up"), Some(GameAction::Move(Direction::Up)));
    /// assert_eq!(GameAction::from_str("Restart"), Some(GameAction::Restart));
    /// assert_eq!(GameAction::from_str("jump"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "restart" | "reset" => Some(GameAction::Restart),
            other => other.parse::<Direction>().ok().map(GameAction::Move),
        }
    }
}

/// Logical state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// At least one direction still changes the board
    Playing,
    /// No move can change the board; only a restart leaves this state
    Terminal,
}
