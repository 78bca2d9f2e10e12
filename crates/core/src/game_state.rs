//! Game state module - manages one game session
//!
//! This module ties together the board, the score and the tile source.
//! It handles directional moves, tile spawning, terminal detection and the
//! session lifecycle (start / reset).

use tracing::{debug, trace};

use crate::board::Board;
use crate::rng::{SeededSource, TileSource};
use crate::snapshot::{board_hash, GameSnapshot};
use crate::types::*;

/// Complete state of one game session
#[derive(Debug, Clone)]
pub struct GameState<R: TileSource = SeededSource> {
    board: Board,
    score: u32,
    source: R,
    /// Monotonic episode id (increments on reset).
    episode_id: u32,
    /// Moves that changed the board in the current episode.
    move_count: u32,
}

impl GameState<SeededSource> {
    /// Start a new game with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_source(SeededSource::new(seed))
    }

    /// Seed of the tile source, for replaying the session
    pub fn seed(&self) -> u64 {
        self.source.seed()
    }
}

impl<R: TileSource> GameState<R> {
    /// Start a new game drawing tiles from `source`
    ///
    /// The board starts with exactly two spawned tiles and a zero score.
    pub fn with_source(source: R) -> Self {
        let mut state = Self {
            board: Board::new(),
            score: 0,
            source,
            episode_id: 0,
            move_count: 0,
        };
        state.start_session();
        state
    }

    /// Resume from an existing position without spawning anything
    ///
    /// Used by harnesses that need a specific board. Panics if the board holds
    /// a value that is neither empty nor a power of two in `2..=MAX_TILE`.
    pub fn from_position(board: Board, score: u32, source: R) -> Self {
        assert!(
            board.is_well_formed(),
            "board holds an invalid tile: {:?}",
            board.to_grid()
        );
        Self {
            board,
            score,
            source,
            episode_id: 0,
            move_count: 0,
        }
    }

    fn start_session(&mut self) {
        self.board.clear();
        self.score = 0;
        self.move_count = 0;
        for _ in 0..START_TILES {
            self.spawn_tile();
        }
    }

    /// Replace the session with a fresh one
    ///
    /// Board emptied, score zeroed, two tiles spawned. The tile source keeps
    /// its stream, so a seeded game stays reproducible across resets.
    pub fn reset(&mut self) {
        self.episode_id = self.episode_id.wrapping_add(1);
        self.start_session();
        debug!(
            episode_id = self.episode_id,
            tiles = self.board.tile_count(),
            "session reset"
        );
    }

    /// Spawn a 2 or 4 into a random empty cell
    ///
    /// Returns the `(row, col, value)` placed, or None if the board is full.
    pub fn spawn_tile(&mut self) -> Option<(usize, usize, u32)> {
        let empty = self.board.empty_cells();
        if empty.is_empty() {
            return None;
        }

        let pick = self.source.pick_cell(empty.len());
        assert!(
            pick < empty.len(),
            "tile source picked cell {} of {}",
            pick,
            empty.len()
        );
        let (row, col) = empty[pick];

        let value = self.source.pick_value();
        assert!(
            NEW_TILE_VALUES.contains(&value),
            "tile source produced value {}",
            value
        );

        self.board.set(row, col, value);
        trace!(row, col, value, "spawned tile");
        Some((row, col, value))
    }

    /// Slide every tile towards `dir`
    ///
    /// Returns true if the board changed, in which case exactly one tile is
    /// spawned after all lines were processed. A move that changes nothing
    /// spawns nothing, so terminal boards are stable under this call.
    pub fn apply_move(&mut self, dir: Direction) -> bool {
        let before = self.score;
        let changed = self.board.shift(dir, &mut self.score);
        debug_assert!(changed || self.score == before);

        if changed {
            self.move_count = self.move_count.wrapping_add(1);
            self.spawn_tile();
        }

        debug_assert!(
            self.board.is_well_formed(),
            "board holds an invalid tile after {:?}: {:?}",
            dir,
            self.board.to_grid()
        );
        changed
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Move(dir) => self.apply_move(dir),
            GameAction::Restart => {
                self.reset();
                true
            }
        }
    }

    /// Check if moving towards `dir` would change the board
    ///
    /// Works on a copy; nothing spawns and the score is untouched.
    pub fn can_move(&self, dir: Direction) -> bool {
        let mut board = self.board;
        let mut scratch = 0;
        board.shift(dir, &mut scratch)
    }

    /// Check if no move can change the board (recomputed on every call)
    pub fn is_terminal(&self) -> bool {
        self.board.is_terminal()
    }

    pub fn status(&self) -> GameStatus {
        if self.is_terminal() {
            GameStatus::Terminal
        } else {
            GameStatus::Playing
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn grid(&self) -> Grid {
        self.board.to_grid()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn max_tile(&self) -> u32 {
        self.board.max_tile()
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);
        out.board_hash = board_hash(&out.board);
        out.score = self.score;
        out.status = self.status();
        out.episode_id = self.episode_id;
        out.move_count = self.move_count;
        out.max_tile = self.board.max_tile();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState<SeededSource> {
    fn default() -> Self {
        Self::new(1)
    }
}
