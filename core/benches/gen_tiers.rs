use bombbox_core::*;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const TIERS: [(&str, BoxCount, BoxCount); 4] = [
    ("default", 20, 8),
    ("sparse", 1_000, 50),
    ("dense", 1_000, 950),
    ("full", 10_000, 9_999),
];

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (name, boxes, bombs) in TIERS {
        let config = GameConfig::new_unchecked(boxes, bombs);
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, &config| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                black_box(RandomBoardGenerator::new(seed).generate(config))
            })
        });
    }
    group.finish();
}

fn bench_full_game(c: &mut Criterion) {
    c.bench_function("policy_vs_policy_game", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut engine = TurnEngine::new();
            engine.start_game(GameConfig::default(), seed).unwrap();
            while !engine.is_finished() {
                let decision = decide(engine.state());
                engine.resolve_box(decision).unwrap();
            }
            black_box(engine.winner())
        })
    });
}

criterion_group!(benches, bench_generate, bench_full_game);
criterion_main!(benches);
