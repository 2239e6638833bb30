//! ECS core benchmarks.
//!
//! Measures the hot paths: component add/remove churn (with entity-set
//! fan-out re-evaluation) and dense view iteration.
//!
//! Run with: `cargo bench --bench ecs_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use voxen_ecs::prelude::*;

// ---------------------------------------------------------------------------
// Benchmark component types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct Position {
    x: f32,
    y: f32,
    z: f32,
}
impl Component for Position {}

#[derive(Debug, Clone, PartialEq)]
struct Velocity {
    x: f32,
    y: f32,
    z: f32,
}
impl Component for Velocity {}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn manager() -> EntityManager {
    EntityManager::builder()
        .view::<(Position, Velocity)>()
        .build()
}

/// Populate `count` entities with Position + Velocity.
fn populate(manager: &mut EntityManager, count: usize) -> Vec<Entity> {
    manager.reserve(count);
    (0..count)
        .map(|i| {
            let e = manager.create_entity();
            manager
                .add_component(
                    e,
                    Position {
                        x: i as f32,
                        y: 0.0,
                        z: 0.0,
                    },
                )
                .unwrap();
            manager
                .add_component(
                    e,
                    Velocity {
                        x: 1.0,
                        y: 2.0,
                        z: 3.0,
                    },
                )
                .unwrap();
            e
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_spawn(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn");
    for count in [1_000usize, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut manager = manager();
                let entities = populate(&mut manager, count);
                black_box(entities.len())
            });
        });
    }
    group.finish();
}

fn bench_view_iteration(c: &mut Criterion) {
    let mut manager = manager();
    populate(&mut manager, 10_000);

    c.bench_function("view_iter_10k", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            for (_entity, (position, velocity)) in
                manager.view::<(&Position, &Velocity)>().unwrap()
            {
                sum += position.x + velocity.x;
            }
            black_box(sum)
        });
    });
}

fn bench_component_churn(c: &mut Criterion) {
    c.bench_function("component_churn_1k", |b| {
        let mut manager = manager();
        let entities = populate(&mut manager, 1_000);
        b.iter(|| {
            for &e in &entities {
                manager.remove_component::<Velocity>(e).unwrap();
                manager
                    .add_component(
                        e,
                        Velocity {
                            x: 0.0,
                            y: 0.0,
                            z: 0.0,
                        },
                    )
                    .unwrap();
            }
            black_box(manager.entity_set::<(Position, Velocity)>().unwrap().len())
        });
    });
}

criterion_group!(
    benches,
    bench_spawn,
    bench_view_iteration,
    bench_component_churn
);
criterion_main!(benches);
