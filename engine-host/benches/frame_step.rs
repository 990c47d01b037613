//! Frame step benchmarks
//!
//! One `update` + `render` pass per registered game at 60 fps.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use engine_core::engine::ManualClock;
use engine_core::registry::create_game;
use engine_core::surface::Surface;
use engine_core::Engine;
use engine_host::registry_init::{initialize_registry, GAME_IDS};

fn bench_frame_step(c: &mut Criterion) {
    initialize_registry();
    let mut group = c.benchmark_group("frame_step");

    for id in GAME_IDS {
        let Some(game) = create_game(id) else {
            continue;
        };
        let clock = ManualClock::new(0.0);
        let mut engine = Engine::with_clock(Surface::new(1200, 800), clock.clone()).with_seed(42);
        engine.load_game(game);
        engine.start();

        group.bench_with_input(BenchmarkId::from_parameter(id), &id, |b, _| {
            b.iter(|| {
                clock.advance(1000.0 / 60.0);
                engine.tick();
                black_box(engine.canvas().len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_frame_step);
criterion_main!(benches);
