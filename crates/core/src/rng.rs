//! RNG module - where new tiles come from
//!
//! Spawning is the only nondeterministic step of the game. The engine never
//! touches a random generator directly: it asks a [`TileSource`] which empty
//! cell to fill and which value to put there.
//!
//! Two sources ship with the crate:
//!
//! - [`SeededSource`]: ChaCha8 stream, reproducible from a `u64` seed
//! - [`ScriptedSource`]: replays fixed choices for deterministic tests

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::types::NEW_TILE_VALUES;

/// Supplier of spawn decisions.
///
/// `pick_cell` receives the number of empty cells (always > 0) and must return
/// an index in `0..empty_count`; the engine enumerates empty cells row-major.
/// `pick_value` must return one of [`NEW_TILE_VALUES`].
pub trait TileSource {
    fn pick_cell(&mut self, empty_count: usize) -> usize;
    fn pick_value(&mut self) -> u32;
}

impl<T: TileSource + ?Sized> TileSource for Box<T> {
    fn pick_cell(&mut self, empty_count: usize) -> usize {
        (**self).pick_cell(empty_count)
    }

    fn pick_value(&mut self) -> u32 {
        (**self).pick_value()
    }
}

/// Uniform tile source backed by ChaCha8.
///
/// Cell and value are drawn independently: every empty cell is equally likely
/// and 2 / 4 each come up half the time.
#[derive(Debug, Clone)]
pub struct SeededSource {
    inner: ChaCha8Rng,
    seed: u64,
}

impl SeededSource {
    /// Create a source with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a source with a seed drawn from the OS
    ///
    /// The seed is still recorded, so the session can be replayed later.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    /// Seed this source was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl TileSource for SeededSource {
    fn pick_cell(&mut self, empty_count: usize) -> usize {
        self.inner.gen_range(0..empty_count)
    }

    fn pick_value(&mut self) -> u32 {
        NEW_TILE_VALUES[self.inner.gen_range(0..NEW_TILE_VALUES.len())]
    }
}

impl Default for SeededSource {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Tile source that replays a fixed script.
///
/// Cell picks are taken modulo the current empty count. Once a queue runs
/// dry the source falls back to the first empty cell and the value 2.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    cells: VecDeque<usize>,
    values: VecDeque<u32>,
}

impl ScriptedSource {
    pub fn new(
        cells: impl IntoIterator<Item = usize>,
        values: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            values: values.into_iter().collect(),
        }
    }

    /// Source that always fills the first empty cell with a 2
    pub fn first_cell() -> Self {
        Self::default()
    }

    /// Choices not consumed yet
    pub fn remaining(&self) -> usize {
        self.cells.len().max(self.values.len())
    }
}

impl TileSource for ScriptedSource {
    fn pick_cell(&mut self, empty_count: usize) -> usize {
        self.cells.pop_front().unwrap_or(0) % empty_count
    }

    fn pick_value(&mut self) -> u32 {
        self.values.pop_front().unwrap_or(NEW_TILE_VALUES[0])
    }
}
