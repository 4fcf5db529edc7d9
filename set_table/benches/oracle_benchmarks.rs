use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use set_table::game::{Card, LegalityOracle, SetOracle};
use std::hint::black_box;

/// A shuffled slice of the full 81-card deck
fn shuffled_pool(size: usize, seed: u64) -> Vec<Card> {
    let mut cards: Vec<Card> = (0..81).map(Card).collect();
    cards.shuffle(&mut StdRng::seed_from_u64(seed));
    cards.truncate(size);
    cards
}

/// Benchmark a single legality check
fn bench_is_set(c: &mut Criterion) {
    let oracle = SetOracle::new(3, 4);
    let set = [Card(0), Card(40), Card(80)];
    let not_set = [Card(1), Card(2), Card(3)];

    c.bench_function("is_set_hit", |b| b.iter(|| oracle.is_set(black_box(&set))));
    c.bench_function("is_set_miss", |b| {
        b.iter(|| oracle.is_set(black_box(&not_set)))
    });
}

/// Benchmark finding the first set, as the dealer does between rounds
fn bench_find_first_set(c: &mut Criterion) {
    let oracle = SetOracle::new(3, 4);
    let mut group = c.benchmark_group("find_first_set");

    for size in [12, 21, 81] {
        let pool = shuffled_pool(size, 17);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_cards", size)),
            &pool,
            |b, pool| b.iter(|| oracle.find_sets(black_box(pool), 1)),
        );
    }

    group.finish();
}

/// Benchmark enumerating every set on a table, as hints do
fn bench_find_all_sets(c: &mut Criterion) {
    let oracle = SetOracle::new(3, 4);
    let mut group = c.benchmark_group("find_all_sets");

    for size in [12, 15, 81] {
        let pool = shuffled_pool(size, 29);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_cards", size)),
            &pool,
            |b, pool| b.iter(|| oracle.find_sets(black_box(pool), usize::MAX)),
        );
    }

    group.finish();
}

/// Benchmark the generic search with a rule that has no pair shortcut
fn bench_four_valued_search(c: &mut Criterion) {
    let oracle = SetOracle::new(4, 3);
    let pool: Vec<Card> = (0..16).map(Card).collect();

    c.bench_function("find_all_sets_4x3_16_cards", |b| {
        b.iter(|| oracle.find_sets(black_box(&pool), usize::MAX))
    });
}

criterion_group!(legality, bench_is_set);

criterion_group!(
    search,
    bench_find_first_set,
    bench_find_all_sets,
    bench_four_valued_search
);

criterion_main!(legality, search);
