//! Benchmarks for the hot paths: height queries, collision and full steps.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use glam::DVec2;
use korovany::entity::PlayerInput;
use korovany::rng::SimRng;
use korovany::world::World;
use korovany::{Autopilot, AutopilotMode, Faction, GameState, SimConfig};

fn sample_points(n: usize) -> Vec<DVec2> {
    let mut rng = SimRng::from_seed_u64(7);
    (0..n)
        .map(|_| DVec2::new(rng.range_f64(-340.0, 340.0), rng.range_f64(-340.0, 340.0)))
        .collect()
}

fn bench_height(c: &mut Criterion) {
    let world = World::generate(&mut SimRng::from_seed_u64(42));
    let points = sample_points(1024);

    c.bench_function("height_lattice_1024", |b| {
        b.iter(|| points.iter().map(|&p| world.height(black_box(p))).sum::<f64>());
    });
    c.bench_function("height_visual_1024", |b| {
        b.iter(|| {
            points
                .iter()
                .map(|&p| world.terrain().visual(black_box(p)))
                .sum::<f64>()
        });
    });
}

fn bench_collision(c: &mut Criterion) {
    let world = World::generate(&mut SimRng::from_seed_u64(42));
    let points = sample_points(1024);

    c.bench_function("resolve_buildings_1024", |b| {
        b.iter(|| {
            for &p in &points {
                black_box(world.resolve_buildings(black_box(p), 0.5));
            }
        });
    });
}

fn bench_step(c: &mut Criterion) {
    c.bench_function("step_idle_100", |b| {
        b.iter_batched(
            || GameState::new(SimConfig::default(), Faction::Neutral, 42).unwrap(),
            |mut state| {
                for _ in 0..100 {
                    black_box(state.step(0.016, &PlayerInput::default()));
                }
                state
            },
            criterion::BatchSize::SmallInput,
        );
    });

    c.bench_function("step_raid_100", |b| {
        b.iter_batched(
            || {
                (
                    GameState::new(SimConfig::default(), Faction::Villain, 42).unwrap(),
                    Autopilot::new(AutopilotMode::Raid),
                )
            },
            |(mut state, mut pilot)| {
                for _ in 0..100 {
                    let input = pilot.input(&state);
                    black_box(state.step(0.016, &input));
                }
                state
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_world_build(c: &mut Criterion) {
    c.bench_function("world_generate", |b| {
        b.iter(|| World::generate(&mut SimRng::from_seed_u64(black_box(42))));
    });
}

criterion_group!(benches, bench_height, bench_collision, bench_step, bench_world_build);
criterion_main!(benches);
