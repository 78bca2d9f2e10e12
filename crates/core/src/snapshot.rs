use crate::types::{GameStatus, Grid, BOARD_SIZE};

/// Stable 64-bit FNV-1a over the grid, row-major, little-endian cells.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions, and
/// observers compare this value across processes.
pub fn board_hash(grid: &Grid) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    let mut h = OFFSET_BASIS;
    for value in grid.iter().flat_map(|row| row.iter()) {
        for b in value.to_le_bytes() {
            h ^= b as u64;
            h = h.wrapping_mul(PRIME);
        }
    }
    h
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: Grid,
    pub board_hash: u64,
    pub score: u32,
    pub status: GameStatus,
    pub episode_id: u32,
    pub move_count: u32,
    pub max_tile: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board = [[0; BOARD_SIZE]; BOARD_SIZE];
        self.board_hash = board_hash(&self.board);
        self.score = 0;
        self.status = GameStatus::Playing;
        self.episode_id = 0;
        self.move_count = 0;
        self.max_tile = 0;
    }

    pub fn terminal(&self) -> bool {
        self.status == GameStatus::Terminal
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            board: [[0; BOARD_SIZE]; BOARD_SIZE],
            board_hash: 0,
            score: 0,
            status: GameStatus::Playing,
            episode_id: 0,
            move_count: 0,
            max_tile: 0,
        };
        s.clear();
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_hashes_empty_board() {
        let snap = GameSnapshot::default();
        assert_eq!(snap.board_hash, board_hash(&[[0; 4]; 4]));
        assert!(!snap.terminal());
    }

    #[test]
    fn board_hash_depends_on_position() {
        let a = [[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]];
        let b = [[0, 2, 0, 0], [0; 4], [0; 4], [0; 4]];
        assert_ne!(board_hash(&a), board_hash(&b));
        assert_eq!(board_hash(&a), board_hash(&a));
    }
}
