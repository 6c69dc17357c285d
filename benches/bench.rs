use criterion::{Criterion, criterion_group, criterion_main};
use sat_explorer::sat::cnf::Cnf;
use sat_explorer::sat::dp::Dp;
use sat_explorer::sat::dpll::Dpll;
use sat_explorer::sat::generator::random_cnf;
use sat_explorer::sat::resolution::Resolution;
use sat_explorer::sat::solver::Solver;
use std::hint::black_box;
use std::time::Duration;

fn random_instances(count: usize, num_vars: usize, ratio: f64, seed: u64) -> Vec<Cnf> {
    let mut rng = fastrand::Rng::with_seed(seed);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let num_clauses = (num_vars as f64 * ratio).round() as usize;
    (0..count)
        .map(|_| random_cnf(num_vars, num_clauses, 3, &mut rng))
        .filter_map(Result::ok)
        .collect()
}

fn bench_random_three_sat(c: &mut Criterion) {
    let mut group = c.benchmark_group("random 3-SAT (30 vars, ratio 4.26) - Procedure");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(20));

    let cnfs = random_instances(20, 30, 4.26, 1);

    group.bench_function("DP", |b| {
        b.iter(|| {
            for cnf in &cnfs {
                let mut state = Dp::new(cnf.clone());
                black_box(state.solve());
            }
        });
    });

    group.bench_function("DPLL", |b| {
        b.iter(|| {
            for cnf in &cnfs {
                let mut state = Dpll::new(cnf.clone());
                black_box(state.solve());
            }
        });
    });

    group.finish();

    let mut group = c.benchmark_group("random 3-SAT (60 vars, ratio 2.0) - DPLL");
    group.sample_size(50);

    let cnfs = random_instances(20, 60, 2.0, 2);

    group.bench_function("DPLL", |b| {
        b.iter(|| {
            for cnf in &cnfs {
                let mut state = Dpll::new(cnf.clone());
                black_box(state.solve());
            }
        });
    });

    group.finish();
}

fn bench_tiny_instances(c: &mut Criterion) {
    let mut group = c.benchmark_group("random 3-SAT (5 vars, ratio 3.0) - Procedure");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(10));

    let cnfs = random_instances(10, 5, 3.0, 3);

    group.bench_function("Resolution", |b| {
        b.iter(|| {
            for cnf in &cnfs {
                let mut state = Resolution::new(cnf.clone());
                black_box(state.solve());
            }
        });
    });

    group.bench_function("DP", |b| {
        b.iter(|| {
            for cnf in &cnfs {
                let mut state = Dp::new(cnf.clone());
                black_box(state.solve());
            }
        });
    });

    group.bench_function("DPLL", |b| {
        b.iter(|| {
            for cnf in &cnfs {
                let mut state = Dpll::new(cnf.clone());
                black_box(state.solve());
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_random_three_sat, bench_tiny_instances);

criterion_main!(benches);
