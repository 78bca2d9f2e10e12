use twenty48::core::{board_hash, Board, GameSnapshot, GameState, ScriptedSource};
use twenty48::types::{Direction, Grid};

fn fnv1a64_bytes(bytes: impl Iterator<Item = u8>) -> u64 {
    // FNV-1a 64-bit.
    let mut h: u64 = 0xcbf29ce484222325;
    for b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(0x00000100000001B3);
    }
    h
}

fn fnv1a64_grid(grid: &Grid) -> u64 {
    fnv1a64_bytes(grid.iter().flatten().flat_map(|v| v.to_le_bytes()))
}

#[test]
fn snapshot_into_sets_board_hash() {
    let mut gs = GameState::new(1);

    let mut snap = GameSnapshot::default();
    gs.snapshot_into(&mut snap);
    assert_eq!(snap.board_hash, fnv1a64_grid(&snap.board));

    for dir in Direction::ALL {
        gs.apply_move(dir);
        gs.snapshot_into(&mut snap);
        assert_eq!(snap.board_hash, fnv1a64_grid(&snap.board));
    }
}

#[test]
fn board_hash_ignores_score_and_counters() {
    let board = Board::from_grid([[2, 4, 8, 0], [0; 4], [0; 4], [0, 0, 0, 2]]);
    let fresh = GameState::from_position(board, 0, ScriptedSource::first_cell());
    let played = GameState::from_position(board, 1234, ScriptedSource::first_cell());

    let a = fresh.snapshot();
    let b = played.snapshot();
    assert_ne!(a.score, b.score);
    assert_eq!(a.board_hash, b.board_hash);
}

#[test]
fn board_hash_distinguishes_transposed_boards() {
    let a: Grid = [[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]];
    let b: Grid = [[2, 0, 0, 0], [4, 0, 0, 0], [0; 4], [0; 4]];
    assert_ne!(board_hash(&a), board_hash(&b));
    assert_eq!(board_hash(&a), fnv1a64_grid(&a));
}
