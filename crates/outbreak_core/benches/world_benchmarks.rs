use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use outbreak_core::config::{AppConfig, WorldConfig};
use outbreak_core::lifecycle::{create_hostile, create_survivor};
use outbreak_core::{SimRng, World};
use outbreak_data::{Kind, Point};
use rand::Rng;

/// Builds a quiet world with `n` hostiles and `n / 4` survivors scattered
/// at random.
fn populated_world(n: usize) -> World {
    let config = AppConfig {
        world: WorldConfig {
            spawner_count: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut world = World::with_rng(config.clone(), SimRng::seeded(42)).unwrap();
    let mut rng = SimRng::seeded(7);
    for i in 0..n {
        let at = Point::new(rng.gen_range(0.0..800.0), rng.gen_range(0.0..600.0));
        world.spawn(create_hostile(at, &config));
        if i % 4 == 0 {
            world.spawn(create_survivor(at + Point::new(30.0, 0.0), &config));
        }
    }
    world
}

/// Benchmark proximity queries over registries of increasing size.
fn bench_registry_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_queries");
    for size in [100, 1000, 5000] {
        let world = populated_world(size);
        let center = Point::new(400.0, 300.0);

        group.bench_with_input(BenchmarkId::new("nearest_of_kind", size), &size, |b, _| {
            b.iter(|| {
                black_box(world.registry().nearest_of_kind(
                    Kind::Protected,
                    black_box(center),
                    100.0,
                ))
            })
        });

        group.bench_with_input(BenchmarkId::new("first_of_kind_any", size), &size, |b, _| {
            b.iter(|| black_box(world.registry().first_of_kind(None, black_box(center), 10.0, None)))
        });

        group.bench_with_input(BenchmarkId::new("count_of_kind", size), &size, |b, _| {
            b.iter(|| black_box(world.registry().count_of_kind(Kind::Hostile)))
        });
    }
    group.finish();
}

/// Benchmark full ticks at 30 fps.
fn bench_world_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_tick");
    group.sample_size(20);
    for size in [100, 500] {
        group.bench_with_input(BenchmarkId::new("tick", size), &size, |b, &size| {
            let mut world = populated_world(size);
            b.iter(|| black_box(world.tick(black_box(1.0 / 30.0)).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_registry_queries, bench_world_tick);
criterion_main!(benches);
