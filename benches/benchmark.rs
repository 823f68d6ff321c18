// Throughput benchmarks for similarity scoring, anchor selection and valuation
use compval::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

fn generate_record(rng: &mut StdRng, category: &str) -> FeatureRecord {
    FeatureRecord::new(category)
        .with("level", rng.random_range(1..=100) as f64)
        .with("damage", rng.random_range(1.0..500.0))
        .with("defense", rng.random_range(0.0..300.0))
        .with("strength", rng.random_range(0..50) as f64)
        .with("quality", ["common", "rare", "epic", "legendary"][rng.random_range(0..4)])
        .with("attribute_type", ["fire", "ice", "poison"][rng.random_range(0..3)])
}

fn generate_market(size: usize, category: &str) -> Vec<MarketRecord> {
    let mut rng = StdRng::seed_from_u64(1);
    (0..size as u64)
        .map(|i| {
            let price = rng.random_range(1.0..10_000.0);
            MarketRecord::new(i, price, generate_record(&mut rng, category))
        })
        .collect()
}

fn benchmark_score(c: &mut Criterion) {
    let registry = RuleRegistry::with_defaults().unwrap();
    let scorer = SimilarityScorer::default();
    let rules = registry.rules_for("sword");
    let mut rng = StdRng::seed_from_u64(2);
    let a = generate_record(&mut rng, "sword");
    let b = generate_record(&mut rng, "sword");

    c.bench_function("score_pair", |bench| {
        bench.iter(|| scorer.score(black_box(rules), black_box(&a), black_box(&b)))
    });
}

fn benchmark_find_anchors(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_anchors");
    let registry = RuleRegistry::with_defaults().unwrap();
    let scorer = SimilarityScorer::default();
    let selector = AnchorSelector::new(&registry, &scorer);
    let target = ValuationTarget::new(generate_record(&mut StdRng::seed_from_u64(3), "sword"));

    for size in [100, 1000, 10000].iter() {
        let candidates = generate_market(*size, "sword");
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |bench, _| {
            bench.iter(|| selector.find_anchors(black_box(&target), &candidates, 0.5, 30, "sword"))
        });
    }

    group.finish();
}

fn benchmark_batch_valuation(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_valuation");
    group.sample_size(20);

    let engine = ValuationEngine::new(
        Arc::new(RuleRegistry::with_defaults().unwrap()),
        InMemoryMarket::new(generate_market(5000, "sword")),
    );
    let mut rng = StdRng::seed_from_u64(4);
    let targets: Vec<ValuationTarget> = (0..100)
        .map(|_| ValuationTarget::new(generate_record(&mut rng, "sword")))
        .collect();

    for strategy in PriceStrategy::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(strategy), &strategy, |bench, s| {
            bench.iter(|| engine.batch_valuation(black_box(&targets), s.as_str()))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_score, benchmark_find_anchors, benchmark_batch_valuation);
criterion_main!(benches);
