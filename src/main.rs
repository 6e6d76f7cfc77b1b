// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use clap::Parser;

use itersolve::matrix::{FixedSparseMatrix, RowMatrix, SparseMatrix};
use itersolve::parallel::{EngineKind, ParallelDriver};
use itersolve::solver::{solver_from_name, SolverParams};
use itersolve::splitter::SplitterKind;
use itersolve::vector::{DenseVector, LinearVector};

#[derive(Parser)]
#[command(
    name = "itersolve",
    about = "Solve a 2D Poisson system with an iterative sparse solver"
)]
struct Cli {
    /// Grid edge length (the system has size*size unknowns)
    #[arg(short = 's', long, default_value = "64")]
    size: usize,

    /// Solver name ("cg" or "gauss-seidel")
    #[arg(long, default_value = "cg")]
    solver: String,

    /// Loop splitter name ("sequential" or "dispersed")
    #[arg(long, default_value = "sequential")]
    splitter: String,

    /// Parallel engine name ("spawn" or "pool")
    #[arg(long, default_value = "spawn")]
    engine: String,

    /// Number of worker threads (defaults to the number of CPU cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Relative residual tolerance
    #[arg(short = 't', long, default_value = "1e-4")]
    tolerance: f64,

    /// Maximum iteration count
    #[arg(long, default_value = "30000")]
    max_iterations: u32,
}

/// Assemble the 5-point Laplacian for an n x n grid with Dirichlet
/// boundaries. The result is symmetric positive-definite.
fn build_poisson(n: usize) -> RowMatrix<f64> {
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

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.size < 2 {
        bail!("--size must be at least 2, got {}", cli.size);
    }

    let splitter = SplitterKind::from_name(&cli.splitter)?;
    let engine = EngineKind::from_name(&cli.engine)?;
    let mut parallel = ParallelDriver::new()
        .with_splitter(splitter)
        .with_engine(engine);
    if let Some(threads) = cli.threads {
        parallel = parallel.with_threads(threads);
    }

    let mut solver = solver_from_name::<f64, RowMatrix<f64>, DenseVector<f64>>(
        &cli.solver,
        parallel.clone(),
    )?;
    solver.configure(SolverParams {
        residual: cli.tolerance,
        max_iterations: cli.max_iterations,
    })?;

    let a = build_poisson(cli.size);
    let rows = a.rows();
    let b = DenseVector::from_values(vec![1.0; rows]);
    let mut x = DenseVector::with_size(rows);

    let start = std::time::Instant::now();
    let iterations = solver.solve(&a, &b, &mut x)?;
    let elapsed = start.elapsed();

    // Residual check, independent of the solver's own bookkeeping
    let fixed = a.make_fixed();
    let mut ax = DenseVector::with_size(rows);
    fixed.multiply(&x, &mut ax, &parallel);
    ax.add_scaled(-1.0, &b);
    let relative_residual = ax.abs_max() / b.abs_max();

    println!(
        "solver={} splitter={} engine={} threads={}",
        cli.solver,
        splitter.name(),
        engine.name(),
        parallel.max_threads()
    );
    println!(
        "{} unknowns, {} iterations in {:.3?}, relative residual {:.3e}",
        rows, iterations, elapsed, relative_residual
    );

    if iterations as u32 == cli.max_iterations && relative_residual > cli.tolerance {
        bail!(
            "did not converge within {} iterations (relative residual {:.3e})",
            cli.max_iterations,
            relative_residual
        );
    }
    Ok(())
}
