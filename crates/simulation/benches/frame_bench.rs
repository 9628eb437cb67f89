//! Criterion benchmark: one frame of the turn-based app.
//!
//! Measures `App::update` with the `TurnBasedPlugin` in the build phase,
//! idle and with a tap to process every frame.
//!
//! Run with: cargo bench -p simulation --bench frame_bench --features bench

use criterion::{criterion_group, criterion_main, Criterion};

use simulation::test_harness::TestGame;

fn game_in_build_phase() -> TestGame {
    let mut game = TestGame::new();
    game.play_to_build(4);
    for (x, y) in [(1, 1), (3, 3), (5, 5)] {
        let _ = game.build_at(x, y);
    }
    game
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("turn_based_frame");

    let mut idle = game_in_build_phase();
    group.bench_function("idle", |b| {
        b.iter(|| idle.tick(1));
    });

    let mut tapping = game_in_build_phase();
    group.bench_function("tap_cell", |b| {
        b.iter(|| tapping.tap_cell(3, 3));
    });

    group.finish();
}

criterion_group!(benches, bench_frame);
criterion_main!(benches);
