use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_match3::core::{
    has_any_valid_move, resolve_from, scan, validate_swap, Grid, LevelConfig, LevelSession,
    SpecialRules, TileBag,
};
use tui_match3::types::{Coord, TileKind};

fn random_grid(seed: u32) -> Grid {
    let mut grid = Grid::new(8, 8);
    let mut bag = TileBag::new(&[TileKind::Red, TileKind::Green, TileKind::Blue], seed);
    for at in grid.coords().collect::<Vec<_>>() {
        let tile = grid.spawn_tile(bag.draw(), None);
        grid.set(at, Some(tile));
    }
    grid
}

fn session() -> LevelSession {
    let config = LevelConfig::new(8, 8, 1_000)
        .with_objective(TileKind::Red, 1_000_000)
        .with_seed(12345);
    LevelSession::load_level(config).unwrap()
}

fn bench_scan(c: &mut Criterion) {
    let grid = random_grid(12345);

    c.bench_function("scan_8x8", |b| {
        b.iter(|| scan(black_box(&grid)))
    });
}

fn bench_validate(c: &mut Criterion) {
    let mut grid = session().grid().clone();

    c.bench_function("validate_swap", |b| {
        b.iter(|| validate_swap(&mut grid, black_box(Coord::new(3, 3)), Coord::new(3, 4)))
    });
}

fn bench_deadlock_check(c: &mut Criterion) {
    let mut grid = Grid::from_ascii(&[
        "RGBRGBRG", "BRGBRGBR", "GBRGBRGB", "RGBRGBRG", "BRGBRGBR", "GBRGBRGB", "RGBRGBRG",
        "BRGBRGBR",
    ]);

    c.bench_function("deadlock_check_no_moves", |b| {
        b.iter(|| has_any_valid_move(black_box(&mut grid)))
    });
}

fn bench_cascade(c: &mut Criterion) {
    let rules = SpecialRules::default();

    c.bench_function("resolve_random_board", |b| {
        b.iter(|| {
            let mut grid = random_grid(777);
            let mut bag = TileBag::new(&TileKind::ALL, 777);
            resolve_from(&mut grid, &mut bag, &rules)
        })
    });
}

fn bench_swap(c: &mut Criterion) {
    c.bench_function("attempt_swap", |b| {
        b.iter(|| {
            let mut session = session();
            if let Some((from, to)) = session.hint() {
                let _ = session.attempt_swap(from, to);
            }
        })
    });
}

criterion_group!(
    benches,
    bench_scan,
    bench_validate,
    bench_deadlock_check,
    bench_cascade,
    bench_swap
);
criterion_main!(benches);
