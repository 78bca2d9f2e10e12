use criterion::{black_box, criterion_group, criterion_main, Criterion};
use twenty48::core::{board_hash, slide_line, Board, GameState};
use twenty48::types::Direction;

fn crowded_board() -> Board {
    Board::from_grid([
        [2, 2, 4, 8],
        [4, 4, 8, 16],
        [0, 2, 2, 0],
        [16, 8, 0, 8],
    ])
}

fn bench_slide_line(c: &mut Criterion) {
    c.bench_function("slide_line", |b| {
        b.iter(|| {
            let mut score = 0;
            slide_line(black_box([2, 2, 4, 4]), &mut score)
        })
    });
}

fn bench_shift(c: &mut Criterion) {
    let board = crowded_board();

    for dir in Direction::ALL {
        c.bench_function(&format!("shift_{}", dir.as_str()), |b| {
            b.iter(|| {
                let mut board = black_box(board);
                let mut score = 0;
                board.shift(dir, &mut score)
            })
        });
    }
}

fn bench_apply_move(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    let mut i = 0usize;

    c.bench_function("apply_move", |b| {
        b.iter(|| {
            i = i.wrapping_add(1);
            if state.is_terminal() {
                state.reset();
            }
            state.apply_move(Direction::ALL[i % 4])
        })
    });
}

fn bench_spawn_tile(c: &mut Criterion) {
    let mut state = GameState::new(12345);

    c.bench_function("spawn_tile", |b| {
        b.iter(|| {
            if state.board().is_full() {
                state.reset();
            }
            state.spawn_tile()
        })
    });
}

fn bench_is_terminal(c: &mut Criterion) {
    let full = Board::from_grid([
        [2, 4, 2, 4],
        [4, 2, 4, 2],
        [2, 4, 2, 4],
        [4, 2, 4, 2],
    ]);

    c.bench_function("is_terminal_full", |b| b.iter(|| black_box(full).is_terminal()));
}

fn bench_snapshot(c: &mut Criterion) {
    let state = GameState::new(12345);

    c.bench_function("snapshot_and_hash", |b| {
        b.iter(|| {
            let snap = state.snapshot();
            board_hash(black_box(&snap.board))
        })
    });
}

criterion_group!(
    benches,
    bench_slide_line,
    bench_shift,
    bench_apply_move,
    bench_spawn_tile,
    bench_is_terminal,
    bench_snapshot
);
criterion_main!(benches);
