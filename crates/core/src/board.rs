//! Board module - manages the game grid
//!
//! The board is a 4x4 grid where each cell is either empty (`0`) or holds a
//! tile (a power of two >= 2).
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (row, col) where row ranges 0..3 (top to bottom), col ranges 0..3 (left to right)

use arrayvec::ArrayVec;

use crate::line::slide_line;
use crate::types::{Direction, Grid, Line, BOARD_SIZE, CELL_COUNT, MAX_TILE};

/// The game board - 4 rows x 4 columns using flat array storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (row * SIZE + col)
    cells: [u32; CELL_COUNT],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [0; CELL_COUNT],
        }
    }

    /// Create a board from a row-major grid
    ///
    /// No validation happens here; use [`Board::is_well_formed`] when the grid
    /// comes from outside the engine.
    pub fn from_grid(grid: Grid) -> Self {
        let mut cells = [0; CELL_COUNT];
        for (row, values) in grid.iter().enumerate() {
            cells[row * BOARD_SIZE..(row + 1) * BOARD_SIZE].copy_from_slice(values);
        }
        Self { cells }
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    fn index(row: usize, col: usize) -> Option<usize> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return None;
        }
        Some(row * BOARD_SIZE + col)
    }

    /// Get cell at position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at position (row, col)
    /// Returns false if out of bounds
    pub fn set(&mut self, row: usize, col: usize, value: u32) -> bool {
        match Self::index(row, col) {
            Some(idx) => {
                self.cells[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Copy out one row
    pub fn row(&self, row: usize) -> Line {
        let mut line = [0; BOARD_SIZE];
        line.copy_from_slice(&self.cells[row * BOARD_SIZE..(row + 1) * BOARD_SIZE]);
        line
    }

    /// Copy out one column, top to bottom
    pub fn column(&self, col: usize) -> Line {
        let mut line = [0; BOARD_SIZE];
        for (row, value) in line.iter_mut().enumerate() {
            *value = self.cells[row * BOARD_SIZE + col];
        }
        line
    }

    fn set_row(&mut self, row: usize, line: Line) {
        self.cells[row * BOARD_SIZE..(row + 1) * BOARD_SIZE].copy_from_slice(&line);
    }

    /// Empty cells in row-major order
    ///
    /// Returned as a fixed-capacity list so spawning never allocates.
    pub fn empty_cells(&self) -> ArrayVec<(usize, usize), CELL_COUNT> {
        let mut out = ArrayVec::new();
        for (idx, &value) in self.cells.iter().enumerate() {
            if value == 0 {
                out.push((idx / BOARD_SIZE, idx % BOARD_SIZE));
            }
        }
        out
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    pub fn tile_count(&self) -> usize {
        CELL_COUNT - self.empty_count()
    }

    /// Largest tile on the board (0 when empty)
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Check if the board has no empty cell left
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    /// Check if any two horizontally or vertically adjacent cells are equal
    pub fn has_equal_neighbors(&self) -> bool {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let value = self.cells[row * BOARD_SIZE + col];
                if col + 1 < BOARD_SIZE && value == self.cells[row * BOARD_SIZE + col + 1] {
                    return true;
                }
                if row + 1 < BOARD_SIZE && value == self.cells[(row + 1) * BOARD_SIZE + col] {
                    return true;
                }
            }
        }
        false
    }

    /// Check if no move in any direction can change the board
    ///
    /// Compress only acts on empty cells and merge only on equal neighbours,
    /// so a full board without equal neighbours is stuck.
    pub fn is_terminal(&self) -> bool {
        self.is_full() && !self.has_equal_neighbors()
    }

    /// Check every cell is empty or a power of two in `2..=MAX_TILE`
    pub fn is_well_formed(&self) -> bool {
        self.cells
            .iter()
            .all(|&v| v == 0 || (v >= 2 && v <= MAX_TILE && v.is_power_of_two()))
    }

    /// Swap rows and columns in place
    pub fn transpose(&mut self) {
        for row in 0..BOARD_SIZE {
            for col in row + 1..BOARD_SIZE {
                self.cells
                    .swap(row * BOARD_SIZE + col, col * BOARD_SIZE + row);
            }
        }
    }

    /// Mirror every row left-to-right
    pub fn reverse_rows(&mut self) {
        for row in self.cells.chunks_exact_mut(BOARD_SIZE) {
            row.reverse();
        }
    }

    fn slide_rows_left(&mut self, score: &mut u32) {
        for row in 0..BOARD_SIZE {
            let slid = slide_line(self.row(row), score);
            self.set_row(row, slid);
        }
    }

    /// Slide and merge every line towards `dir`
    ///
    /// Merged values are added to `score`. Returns true if any cell changed.
    /// RIGHT is LEFT on mirrored rows, UP is LEFT on the transpose and DOWN
    /// is RIGHT on the transpose.
    pub fn shift(&mut self, dir: Direction, score: &mut u32) -> bool {
        let before = self.cells;

        if dir.is_vertical() {
            self.transpose();
        }
        if dir.is_reversed() {
            self.reverse_rows();
        }

        self.slide_rows_left(score);

        if dir.is_reversed() {
            self.reverse_rows();
        }
        if dir.is_vertical() {
            self.transpose();
        }

        self.cells != before
    }

    /// Write the board into a row-major grid
    pub fn write_grid(&self, out: &mut Grid) {
        for (row, values) in out.iter_mut().enumerate() {
            values.copy_from_slice(&self.cells[row * BOARD_SIZE..(row + 1) * BOARD_SIZE]);
        }
    }

    /// Row-major copy of the board
    pub fn to_grid(&self) -> Grid {
        let mut grid = [[0; BOARD_SIZE]; BOARD_SIZE];
        self.write_grid(&mut grid);
        grid
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Grid> for Board {
    fn from(grid: Grid) -> Self {
        Self::from_grid(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(0, 3), Some(3));
        assert_eq!(Board::index(1, 0), Some(4));
        assert_eq!(Board::index(3, 3), Some(15));
        assert_eq!(Board::index(4, 0), None);
        assert_eq!(Board::index(0, 4), None);
    }

    #[test]
    fn test_board_flat_array() {
        let mut board = Board::new();

        board.set(0, 0, 2);
        board.set(2, 1, 8);

        assert_eq!(board.get(0, 0), Some(2));
        assert_eq!(board.get(2, 1), Some(8));

        assert_eq!(board.cells[0], 2);
        assert_eq!(board.cells[2 * 4 + 1], 8);
    }

    #[test]
    fn test_board_from_grid_roundtrip() {
        let grid = [[2, 0, 0, 4], [0, 8, 0, 0], [0, 0, 16, 0], [32, 0, 0, 2]];
        let board = Board::from_grid(grid);
        assert_eq!(board.to_grid(), grid);
        assert_eq!(board.row(0), [2, 0, 0, 4]);
        assert_eq!(board.column(0), [2, 0, 0, 32]);
    }

    #[test]
    fn test_transpose_twice_is_identity() {
        let grid = [[2, 4, 8, 16], [32, 64, 128, 256], [0, 2, 0, 4], [4, 0, 2, 0]];
        let mut board = Board::from_grid(grid);
        board.transpose();
        assert_eq!(board.row(0), [2, 32, 0, 4]);
        board.transpose();
        assert_eq!(board.to_grid(), grid);
    }

    #[test]
    fn test_empty_cells_row_major() {
        let board = Board::from_grid([[2, 0, 2, 2], [2, 2, 2, 2], [2, 2, 2, 0], [2, 2, 2, 2]]);
        let empty = board.empty_cells();
        assert_eq!(empty.as_slice(), &[(0, 1), (2, 3)]);
        assert_eq!(board.empty_count(), 2);
        assert_eq!(board.tile_count(), 14);
    }

    #[test]
    fn test_shift_right_mirrors_left() {
        let mut board = Board::from_grid([[2, 2, 4, 0], [0; 4], [0; 4], [0; 4]]);
        let mut score = 0;
        assert!(board.shift(Direction::Right, &mut score));
        assert_eq!(board.row(0), [0, 0, 4, 4]);
        assert_eq!(score, 4);
    }

    #[test]
    fn test_shift_down_on_column() {
        let mut board = Board::from_grid([[2, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0], [0; 4]]);
        let mut score = 0;
        assert!(board.shift(Direction::Down, &mut score));
        assert_eq!(board.column(0), [0, 0, 4, 4]);
        assert_eq!(score, 4);
    }

    #[test]
    fn test_shift_unchanged_reports_false() {
        let mut board = Board::from_grid([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut score = 0;
        assert!(!board.shift(Direction::Left, &mut score));
        assert!(!board.shift(Direction::Up, &mut score));
        assert_eq!(score, 0);
    }

    #[test]
    fn test_well_formed() {
        assert!(Board::new().is_well_formed());
        assert!(Board::from_grid([[2, 4, 2048, 0], [0; 4], [0; 4], [0; 4]]).is_well_formed());
        assert!(!Board::from_grid([[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_well_formed());
        assert!(!Board::from_grid([[1, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_well_formed());
        assert!(Board::from_grid([[MAX_TILE, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_well_formed());
        assert!(!Board::from_grid([[MAX_TILE * 2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_well_formed());
        assert!(!Board::from_grid([[1 << 31, 1 << 31, 0, 0], [0; 4], [0; 4], [0; 4]]).is_well_formed());
    }
}
