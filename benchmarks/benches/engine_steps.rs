use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use frontier_core::magnet::MagnetSet;
use frontier_core::state::{RuleStatus, StepRecord};
use frontier_search::hashdb::HashDb;
use frontier_search::statedb::StateDb;
use frontier_benchmarks::{build_line_engine, line_win_ruleset};

// ---------------------------------------------------------------------------
// StateDB: push/swap/pop through the free/current/next queues
// ---------------------------------------------------------------------------

fn bench_statedb_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("statedb_cycle");
    for &n in &[64usize, 512, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || StateDb::init(1, n * 2 + 8, 1, &MagnetSet::new(vec![])).unwrap(),
                |db| {
                    let mut handles = Vec::with_capacity(n);
                    for i in 0..n {
                        let handle = db.get_free().expect("pool sized for n slots");
                        let mut step = StepRecord::root(1);
                        #[allow(clippy::cast_possible_wrap)]
                        {
                            step.reward = i as i64;
                        }
                        db.write_slot(handle, frontier_core::StateBlob::zeroed(1), step, MagnetSet::new(vec![]));
                        handles.push(handle);
                    }
                    for h in &handles {
                        db.push_next(*h);
                    }
                    db.swap_frontiers(None);
                    while let Some(h) = db.pop_current() {
                        black_box(h);
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// HashDB: insert throughput
// ---------------------------------------------------------------------------

fn bench_hashdb_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("hashdb_insert");
    for &n in &[1_000u64, 50_000, 200_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || HashDb::init(usize::MAX),
                |db| {
                    for i in 0..n {
                        black_box(db.try_insert(frontier_core::fingerprint::Fingerprint::from_bits(i)));
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Rule evaluation
// ---------------------------------------------------------------------------

fn bench_rule_evaluate(c: &mut Criterion) {
    let ruleset = line_win_ruleset(200);
    c.bench_function("rule_evaluate_single_rule", |b| {
        let blob = [5u8];
        b.iter(|| {
            let mut status = RuleStatus::new(1);
            let mut magnets = MagnetSet::new(vec![]);
            black_box(ruleset.evaluate(black_box(&blob), &mut status, &mut magnets));
        });
    });
}

// ---------------------------------------------------------------------------
// Full engine run over the toy line world
// ---------------------------------------------------------------------------

fn bench_engine_run_to_win(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_run_to_win");
    for &target in &[10u8, 60, 120] {
        group.bench_with_input(BenchmarkId::from_parameter(target), &target, |b, &target| {
            b.iter_batched(
                || build_line_engine(target, 1 << 20),
                |engine| black_box(engine.run()),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_statedb_cycle,
    bench_hashdb_insert,
    bench_rule_evaluate,
    bench_engine_run_to_win,
);
criterion_main!(benches);
