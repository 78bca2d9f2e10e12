use twenty48::core::api::{get_board, get_score, is_terminal, make_move, make_move_raw, new_game_seeded, reset};
use twenty48::core::{Board, GameState, ScriptedSource};
use twenty48::types::{Direction, EngineError, GameStatus, Grid, NEW_TILE_VALUES};

const CHECKERBOARD: Grid = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];

fn scripted(grid: Grid, source: ScriptedSource) -> GameState<ScriptedSource> {
    GameState::from_position(Board::from_grid(grid), 0, source)
}

fn tiles(grid: &Grid) -> Vec<u32> {
    grid.iter().flatten().copied().filter(|&v| v != 0).collect()
}

#[test]
fn left_merges_pair_and_spawns_once() {
    // Spawn lands on the last empty cell so the merged row stays readable.
    let mut game = scripted(
        [[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]],
        ScriptedSource::new([14], [4]),
    );

    assert!(game.apply_move(Direction::Left));
    let grid = game.grid();
    assert_eq!(grid[0], [4, 0, 0, 0]);
    assert_eq!(grid[3], [0, 0, 0, 4]);
    assert_eq!(game.score(), 4);
    assert_eq!(tiles(&grid).len(), 2);
}

#[test]
fn up_merges_column_towards_top() {
    let mut game = scripted(
        [[0, 0, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0]],
        ScriptedSource::new([14], [2]),
    );

    assert!(game.apply_move(Direction::Up));
    assert_eq!(game.board().column(0), [4, 0, 0, 0]);
    assert_eq!(game.score(), 4);
}

#[test]
fn each_direction_uses_the_same_line_rule() {
    let grid = [[2, 2, 2, 2], [0; 4], [0; 4], [0; 4]];

    let mut board = Board::from_grid(grid);
    let mut score = 0;
    assert!(board.shift(Direction::Left, &mut score));
    assert_eq!(board.row(0), [4, 4, 0, 0]);

    let mut board = Board::from_grid(grid);
    assert!(board.shift(Direction::Right, &mut score));
    assert_eq!(board.row(0), [0, 0, 4, 4]);

    let column = [[2, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0], [4, 0, 0, 0]];
    let mut board = Board::from_grid(column);
    assert!(board.shift(Direction::Down, &mut score));
    assert_eq!(board.column(0), [0, 0, 4, 8]);

    assert_eq!(score, 8 + 8 + 12);
}

#[test]
fn checkerboard_is_terminal_and_stable() {
    let mut game = scripted(CHECKERBOARD, ScriptedSource::first_cell());
    assert!(game.is_terminal());
    assert_eq!(game.status(), GameStatus::Terminal);

    for dir in Direction::ALL {
        assert!(!game.can_move(dir));
        assert!(!game.apply_move(dir));
    }
    assert_eq!(game.grid(), CHECKERBOARD);
    assert_eq!(game.move_count(), 0);
}

#[test]
fn full_board_with_a_pair_is_not_terminal() {
    let mut grid = CHECKERBOARD;
    grid[0][1] = 2;
    let game = scripted(grid, ScriptedSource::first_cell());
    assert!(!game.is_terminal());
    assert!(game.can_move(Direction::Left));
    assert!(game.can_move(Direction::Right));
}

#[test]
fn reset_starts_fresh_session() {
    let mut handle = new_game_seeded(2024);
    for _ in 0..25 {
        for dir in Direction::ALL {
            make_move(&mut handle, dir);
        }
    }
    let episode = handle.episode_id();

    reset(&mut handle);

    let grid = get_board(&handle);
    let placed = tiles(&grid);
    assert_eq!(placed.len(), 2);
    assert!(placed.iter().all(|v| NEW_TILE_VALUES.contains(v)));
    assert_eq!(get_score(&handle), 0);
    assert_eq!(handle.move_count(), 0);
    assert_eq!(handle.episode_id(), episode + 1);
    assert!(!is_terminal(&handle));
}

#[test]
fn raw_input_is_validated_at_the_boundary() {
    let mut handle = new_game_seeded(7);
    let before = get_board(&handle);

    for bad in ["", "north", "left!", "7"] {
        let err = make_move_raw(&mut handle, bad).unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)), "{:?}", bad);
    }
    assert_eq!(get_board(&handle), before);
    assert_eq!(get_score(&handle), 0);

    assert!(make_move_raw(&mut handle, " Left ").is_ok());
}

#[test]
fn seeded_games_replay_identically() {
    let script = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Up,
        Direction::Left,
    ];

    let mut a = new_game_seeded(99);
    let mut b = new_game_seeded(99);
    for _ in 0..20 {
        for &dir in &script {
            assert_eq!(make_move(&mut a, dir), make_move(&mut b, dir));
        }
    }
    assert_eq!(get_board(&a), get_board(&b));
    assert_eq!(get_score(&a), get_score(&b));
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn play_until_terminal_keeps_board_well_formed() {
    let mut game = GameState::new(31337);
    let mut turns = 0;
    while !game.is_terminal() && turns < 10_000 {
        let dir = Direction::ALL
            .into_iter()
            .find(|&d| game.can_move(d))
            .expect("non-terminal board must have a legal move");
        assert!(game.apply_move(dir));
        assert!(game.board().is_well_formed());
        turns += 1;
    }

    assert!(game.is_terminal());
    assert_eq!(game.move_count(), turns);
    let snap = game.snapshot();
    assert!(snap.terminal());
    assert_eq!(snap.max_tile, game.max_tile());
}
