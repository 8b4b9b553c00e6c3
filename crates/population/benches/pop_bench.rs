//! Criterion benchmarks for the population engine.
//!
//!   - cold: every query misses the cache (cleared each iteration)
//!   - warm: every query hits the cache
//!   - distribute: tier split of a workplace total
//!
//! Run with: cargo bench -p population --bench pop_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use population::employment::distribute_for;
use population::prefab::{BuildingPrefab, Category, PrefabId, Service, SubService};
use population::PopData;

const KINDS: [(Service, SubService); 6] = [
    (Service::Residential, SubService::ResidentialLow),
    (Service::Residential, SubService::ResidentialHigh),
    (Service::Commercial, SubService::CommercialHigh),
    (Service::Industrial, SubService::IndustrialGeneric),
    (Service::Industrial, SubService::IndustrialForestry),
    (Service::Office, SubService::OfficeGeneric),
];

fn buildings(count: u32) -> Vec<(BuildingPrefab, u8)> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    (0..count)
        .map(|id| {
            let (service, sub_service) = KINDS[rng.gen_range(0..KINDS.len())];
            let prefab = BuildingPrefab {
                id: PrefabId(id),
                name: format!("bench_{id}"),
                service,
                sub_service,
                width: rng.gen_range(1..=4),
                length: rng.gen_range(1..=4),
                height: rng.gen_range(3.0..90.0),
                floor_area: rng.gen_range(50.0..1_500.0),
                extractor: rng.gen_bool(0.3),
                school_level: None,
                native_students: 0,
            };
            (prefab, rng.gen_range(0..5))
        })
        .collect()
}

fn query_all(data: &mut PopData, set: &[(BuildingPrefab, u8)]) -> u64 {
    set.iter()
        .map(|(prefab, level)| {
            u64::from(data.population(prefab, *level))
                + u64::from(data.workplaces(prefab, *level).total())
        })
        .sum()
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("pop_queries_1k");
    let set = buildings(1_000);
    let mut data = PopData::default();

    group.bench_function("cold", |b| {
        b.iter(|| {
            data.invalidate_caches();
            black_box(query_all(&mut data, black_box(&set)))
        });
    });

    query_all(&mut data, &set);
    group.bench_function("warm", |b| {
        b.iter(|| black_box(query_all(&mut data, black_box(&set))));
    });

    group.finish();
}

fn bench_distribute(c: &mut Criterion) {
    c.bench_function("distribute_for", |b| {
        b.iter(|| {
            black_box(distribute_for(
                black_box(Category::OfficeHighTech),
                black_box(0),
                black_box(1_234),
            ))
        });
    });
}

criterion_group!(benches, bench_queries, bench_distribute);
criterion_main!(benches);
