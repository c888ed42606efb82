use criterion::{black_box, criterion_group, criterion_main, Criterion};
use connecting_squares::core::grid::Grid;
use connecting_squares::core::region::find_regions;
use connecting_squares::core::replenish::refill_all;
use connecting_squares::core::{gravity, resolve_clears, BoardConfig, Game, SeededColors};
use connecting_squares::engine::{Autopilot, Session, StayOnScene};
use connecting_squares::types::{CellColor, InputFrame, Origin};

/// Full columns plus a checkerboard-ish interior, no spans
fn busy_board(config: &BoardConfig) -> Grid {
    let mut grid = Grid::new();
    let mut colors = SeededColors::new(12345);
    refill_all(&mut grid, config, &mut colors);
    for x in config.interior() {
        for y in 1..config.column_height {
            let color = ((x + y) % 3) as u8;
            let _ = grid.insert(x, y, CellColor::Palette(color), Origin::Piece);
        }
    }
    grid
}

fn bench_tick(c: &mut Criterion) {
    let mut game = Game::new(BoardConfig::default().headless(), 12345).unwrap();
    game.advance();

    c.bench_function("controlled_tick", |b| {
        b.iter(|| {
            game.tick(black_box(&InputFrame::default()));
        })
    });
}

fn bench_find_regions(c: &mut Criterion) {
    let config = BoardConfig::default();
    let grid = busy_board(&config);

    c.bench_function("find_regions_full_board", |b| {
        b.iter(|| black_box(find_regions(black_box(&grid))))
    });
}

fn bench_clear_and_settle(c: &mut Criterion) {
    let config = BoardConfig::default();

    c.bench_function("clear_bottom_row_and_settle", |b| {
        b.iter(|| {
            let mut grid = busy_board(&config);
            // Recolor row 1 so it spans both columns
            let ids: Vec<_> = grid
                .cells()
                .filter(|cell| cell.y == 1)
                .map(|cell| cell.id)
                .collect();
            for id in ids {
                if let Some(cell) = grid.get_mut(id) {
                    cell.color = CellColor::Palette(0);
                }
            }
            resolve_clears(&mut grid);
            gravity::settle(&mut grid)
        })
    });
}

fn bench_autopilot_turns(c: &mut Criterion) {
    c.bench_function("autopilot_10_turns", |b| {
        b.iter(|| {
            let game = Game::new(BoardConfig::default().headless(), 7).unwrap();
            let mut session = Session::new(game, Autopilot::new(), StayOnScene);
            session.run_until(1_000_000, |g| g.stats().turns >= 10)
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_find_regions,
    bench_clear_and_settle,
    bench_autopilot_turns
);
criterion_main!(benches);
