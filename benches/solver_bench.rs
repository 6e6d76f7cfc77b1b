// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use itersolve::matrix::RowMatrix;
use itersolve::parallel::{EngineKind, ParallelDriver};
use itersolve::solver::{LinearSolver, SolverParams};
use itersolve::splitter::SplitterKind;
use itersolve::vector::{DenseVector, LinearVector};
use itersolve::{CgSolver, GaussSeidelSolver};

/// 5-point Laplacian on an n x n grid, Dirichlet boundaries.
fn poisson(n: usize) -> RowMatrix<f64> {
    let mut a = RowMatrix::new(n * n);
    for j in 0..n {
        for i in 0..n {
            let row = j * n + i;
            a.set_element(row, row, 4.0);
            if i > 0 {
                a.set_element(row, row - 1, -1.0);
            }
            if i + 1 < n {
                a.set_element(row, row + 1, -1.0);
            }
            if j > 0 {
                a.set_element(row, row - n, -1.0);
            }
            if j + 1 < n {
                a.set_element(row, row + n, -1.0);
            }
        }
    }
    a
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn cg_solver(threads: usize, splitter: SplitterKind, engine: EngineKind) -> CgSolver {
    let mut solver = CgSolver::new().with_parallel(
        ParallelDriver::new()
            .with_threads(threads)
            .with_splitter(splitter)
            .with_engine(engine),
    );
    LinearSolver::<f64, RowMatrix<f64>, DenseVector<f64>>::configure(
        &mut solver,
        SolverParams {
            residual: 1e-6,
            max_iterations: 30_000,
        },
    )
    .unwrap();
    solver
}

/// CG thread scaling on a 256^2 Poisson system.
fn bench_cg_thread_scaling(c: &mut Criterion) {
    let cpus = num_cpus();
    let a = poisson(256);
    let b = DenseVector::from_values(vec![1.0; 256 * 256]);
    let mut group = c.benchmark_group("cg_poisson_256x256");
    for &threads in &[1, 2, 4, 8] {
        if threads <= cpus {
            let solver = cg_solver(threads, SplitterKind::Sequential, EngineKind::Spawn);
            group.bench_function(format!("{}threads", threads), |bench| {
                bench.iter_with_setup(
                    || DenseVector::with_size(256 * 256),
                    |mut x| {
                        solver.solve(&a, &b, &mut x).unwrap();
                        black_box(x)
                    },
                );
            });
        }
    }
    group.finish();
}

/// Splitter and engine combinations at all-cores on a 256^2 system.
fn bench_cg_splitter_engine(c: &mut Criterion) {
    let cpus = num_cpus();
    let a = poisson(256);
    let b = DenseVector::from_values(vec![1.0; 256 * 256]);
    let mut group = c.benchmark_group("cg_splitter_engine_256x256");
    for splitter in [SplitterKind::Sequential, SplitterKind::Dispersed] {
        for engine in [EngineKind::Spawn, EngineKind::Pool] {
            let solver = cg_solver(cpus, splitter, engine);
            group.bench_function(format!("{}_{}", splitter.name(), engine.name()), |bench| {
                bench.iter_with_setup(
                    || DenseVector::with_size(256 * 256),
                    |mut x| {
                        solver.solve(&a, &b, &mut x).unwrap();
                        black_box(x)
                    },
                );
            });
        }
    }
    group.finish();
}

/// Gauss-Seidel baseline on a 64^2 Poisson system.
fn bench_gauss_seidel(c: &mut Criterion) {
    let a = poisson(64);
    let b = DenseVector::from_values(vec![1.0; 64 * 64]);
    let mut solver = GaussSeidelSolver::new();
    LinearSolver::<f64, RowMatrix<f64>, DenseVector<f64>>::configure(
        &mut solver,
        SolverParams {
            residual: 1e-6,
            max_iterations: 30_000,
        },
    )
    .unwrap();
    c.bench_function("gauss_seidel_poisson_64x64", |bench| {
        bench.iter_with_setup(
            || DenseVector::with_size(64 * 64),
            |mut x| {
                solver.solve(&a, &b, &mut x).unwrap();
                black_box(x)
            },
        );
    });
}

/// Raw parallel multiply throughput, 1 thread vs all-cores.
fn bench_multiply(c: &mut Criterion) {
    use itersolve::matrix::{FixedSparseMatrix, SparseMatrix};
    let cpus = num_cpus();
    let fixed = poisson(512).make_fixed();
    let x = DenseVector::from_values((0..512 * 512).map(|i| (i as f64).sin()).collect());
    let mut group = c.benchmark_group("multiply_512x512");
    for &threads in &[1, cpus] {
        let driver = ParallelDriver::new().with_threads(threads);
        group.bench_function(format!("{}threads", threads), |bench| {
            bench.iter_with_setup(
                || DenseVector::with_size(512 * 512),
                |mut out| {
                    fixed.multiply(&x, &mut out, &driver);
                    black_box(out)
                },
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_cg_thread_scaling,
    bench_cg_splitter_engine,
    bench_gauss_seidel,
    bench_multiply
);
criterion_main!(benches);
