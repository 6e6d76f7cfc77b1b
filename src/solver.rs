// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use crate::cg::CgSolver;
use crate::error::{Result, SolverError};
use crate::gauss_seidel::GaussSeidelSolver;
use crate::matrix::SparseMatrix;
use crate::parallel::ParallelDriver;
use crate::vector::{LinearVector, Scalar};

/// Convergence parameters shared by every iterative solver.
///
/// Populated once at configuration time and read-only during a solve; a
/// single solver instance can be reused across many solves with the same
/// parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverParams {
    /// Relative residual tolerance (dimensionless).
    pub residual: f64,
    /// Maximum iteration count before giving up.
    pub max_iterations: u32,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            residual: 1e-4,
            max_iterations: 30_000,
        }
    }
}

impl SolverParams {
    /// Check that the tolerance is positive and finite.
    ///
    /// # Errors
    /// Returns [`SolverError::InvalidTolerance`] otherwise.
    pub fn validate(&self) -> Result<()> {
        if !self.residual.is_finite() || self.residual <= 0.0 {
            return Err(SolverError::InvalidTolerance(self.residual));
        }
        Ok(())
    }
}

/// Contract satisfied by every iterative linear solver.
///
/// `solve` reads `x`'s initial contents as the starting guess (callers
/// wanting a cold start pass a zero vector) and mutates `x` in place. On
/// return, either the relative residual has reached the configured
/// tolerance, or the returned iteration count equals `max_iterations`:
/// non-convergence is reported through the return value, never as an
/// error. A numerically zero right-hand side terminates immediately with
/// zero iterations and `x` untouched.
pub trait LinearSolver<T, M, V>: Send + Sync
where
    T: Scalar,
    M: SparseMatrix<T>,
    V: LinearVector<T>,
{
    /// Replace the solver's convergence parameters.
    ///
    /// # Errors
    /// Returns an error if the parameters fail validation. Has no effect
    /// on any solve already in flight.
    fn configure(&mut self, params: SolverParams) -> Result<()>;

    /// The solver's current parameters.
    fn params(&self) -> SolverParams;

    /// Solve `A x = b`, returning the number of iterations performed.
    ///
    /// # Errors
    /// Fails fast on contract violations: `b` or `x` sized differently
    /// from `rows(A)`, or solver-specific preconditions such as a zero
    /// diagonal for Gauss-Seidel.
    fn solve(&self, a: &M, b: &V, x: &mut V) -> Result<usize>;

    /// Flat-array convenience overload of [`solve`](Self::solve):
    /// semantically identical, converting through the abstraction's
    /// lossless flat-array bridge on the way in and out.
    ///
    /// # Errors
    /// Same failure conditions as [`solve`](Self::solve).
    fn solve_flat(&self, a: &M, b: &[T], x: &mut Vec<T>) -> Result<usize> {
        let mut b_vec = V::with_size(b.len());
        b_vec.convert_from(b);
        let mut x_vec = V::with_size(x.len());
        x_vec.convert_from(x);
        let iterations = self.solve(a, &b_vec, &mut x_vec)?;
        x_vec.convert_to(x);
        Ok(iterations)
    }
}

/// Names accepted by [`solver_from_name`].
pub const SOLVER_NAMES: [&str; 2] = ["cg", "gauss-seidel"];

/// Instantiate a solver by its registered name, with default parameters.
///
/// `parallel` is handed to solvers that parallelize their internal matrix
/// products (currently only "cg"; Gauss-Seidel sweeps are inherently
/// sequential and ignore it).
///
/// # Errors
/// Returns [`SolverError::UnknownSolver`] for an unregistered name.
pub fn solver_from_name<T, M, V>(
    name: &str,
    parallel: ParallelDriver,
) -> Result<Box<dyn LinearSolver<T, M, V>>>
where
    T: Scalar,
    M: SparseMatrix<T>,
    V: LinearVector<T>,
{
    match name {
        "cg" => Ok(Box::new(CgSolver::new().with_parallel(parallel))),
        "gauss-seidel" => Ok(Box::new(GaussSeidelSolver::new())),
        _ => Err(SolverError::UnknownSolver {
            name: name.to_string(),
            available: SOLVER_NAMES.iter().map(|s| s.to_string()).collect(),
        }),
    }
}
