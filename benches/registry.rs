use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use sky_resolver::Registry;
use std::sync::Arc;

// ===== Micro Benchmarks =====

fn bench_resolve_leaf(c: &mut Criterion) {
    let registry = Registry::new();
    registry.register(|| 42u64).unwrap();

    c.bench_function("resolve_leaf_u64", |b| {
        b.iter(|| {
            let v = registry.resolve::<u64>().unwrap();
            black_box(v);
        })
    });
}

fn bench_resolve_chain(c: &mut Criterion) {
    struct Config { port: u16 }
    struct Repository { config: Config }
    struct Service { repo: Repository }

    let registry = Arc::new(Registry::new());
    registry.register(|| Config { port: 8080 }).unwrap();
    let r = registry.clone();
    registry.register(move || Repository { config: r.resolve_required() }).unwrap();
    let r = registry.clone();
    registry.register(move || Service { repo: r.resolve_required() }).unwrap();

    c.bench_function("resolve_chain_depth_3", |b| {
        b.iter(|| {
            let service = registry.resolve::<Service>().unwrap();
            black_box(service.repo.config.port);
        })
    });
}

fn bench_register(c: &mut Criterion) {
    c.bench_function("register_fresh", |b| {
        b.iter_batched(
            Registry::new,
            |registry| {
                registry.register(|| String::from("value")).unwrap();
                black_box(registry);
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_contains(c: &mut Criterion) {
    let registry = Registry::new();
    registry.register(|| 1u8).unwrap();

    c.bench_function("contains_hit", |b| {
        b.iter(|| black_box(registry.contains::<u8>()))
    });
    c.bench_function("contains_miss", |b| {
        b.iter(|| black_box(registry.contains::<u16>()))
    });
}

criterion_group!(benches, bench_resolve_leaf, bench_resolve_chain, bench_register, bench_contains);
criterion_main!(benches);
