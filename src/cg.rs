// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Result, SolverError};
use crate::matrix::{FixedSparseMatrix, SparseMatrix};
use crate::parallel::ParallelDriver;
use crate::solver::{LinearSolver, SolverParams};
use crate::vector::{LinearVector, Scalar};

/// Conjugate Gradient solver for symmetric positive-definite systems.
///
/// The SPD requirement is a documented precondition, not verified: feeding
/// an indefinite or unsymmetric matrix yields undefined numerical behavior.
/// The matrix-vector product inside each iteration runs through the
/// configured [`ParallelDriver`]; in exact arithmetic the method reaches
/// the exact solution of an NxN system in at most N iterations.
#[derive(Clone, Debug, Default)]
pub struct CgSolver {
    params: SolverParams,
    parallel: ParallelDriver,
}

impl CgSolver {
    /// Create a solver with default parameters and a default driver.
    pub fn new() -> Self {
        CgSolver {
            params: SolverParams::default(),
            parallel: ParallelDriver::new(),
        }
    }

    /// Set the parallel driver used for the internal matrix products
    /// (builder method).
    pub fn with_parallel(mut self, parallel: ParallelDriver) -> Self {
        self.parallel = parallel;
        self
    }

    /// The driver used for the internal matrix products.
    pub fn parallel(&self) -> &ParallelDriver {
        &self.parallel
    }
}

impl<T, M, V> LinearSolver<T, M, V> for CgSolver
where
    T: Scalar,
    M: SparseMatrix<T>,
    V: LinearVector<T>,
{
    fn configure(&mut self, params: SolverParams) -> Result<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    fn params(&self) -> SolverParams {
        self.params
    }

    fn solve(&self, a: &M, b: &V, x: &mut V) -> Result<usize> {
        let n = a.rows();
        if b.len() != n {
            return Err(SolverError::SizeMismatch {
                expected: n,
                got: b.len(),
            });
        }
        if x.len() != n {
            return Err(SolverError::SizeMismatch {
                expected: n,
                got: x.len(),
            });
        }
        if b.abs_max() == T::zero() {
            return Ok(0);
        }

        let a_fixed = a.make_fixed();
        let mut r = V::with_size(n);
        let mut z = V::with_size(n);

        // r = b - A x, honoring a nonzero initial guess
        a_fixed.multiply(x, &mut z, &self.parallel);
        r.copy_from(b);
        r.add_scaled(-T::one(), &z);

        let residual_0 = r.abs_max();
        z.copy_from(&r);
        let mut p = z.clone();
        let mut delta = r.dot(&z);
        if delta < T::epsilon() {
            return Ok(0);
        }

        let tolerance = T::from_f64(self.params.residual);
        let max_iterations = self.params.max_iterations as usize;
        let mut iteration = 0;
        while iteration < max_iterations {
            // z = A * p
            a_fixed.multiply(&p, &mut z, &self.parallel);
            let alpha = delta / p.dot(&z);
            x.add_scaled(alpha, &p); // x += alpha * p
            r.add_scaled(-alpha, &z); // r -= alpha * z
            let residual_1 = r.abs_max();
            if residual_1 / residual_0 <= tolerance {
                return Ok(iteration + 1);
            }
            z.copy_from(&r);
            let beta = r.dot(&z);
            // p = z + (beta / delta) * p, realized without an extra buffer
            z.add_scaled(beta / delta, &p);
            p.swap(&mut z);
            delta = beta;
            iteration += 1;
        }
        Ok(iteration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::RowMatrix;
    use crate::vector::DenseVector;

    fn two_by_two() -> RowMatrix<f64> {
        // [ 4 1 ]
        // [ 1 3 ]
        let mut a = RowMatrix::new(2);
        a.set_element(0, 0, 4.0);
        a.set_element(0, 1, 1.0);
        a.set_element(1, 0, 1.0);
        a.set_element(1, 1, 3.0);
        a
    }

    #[test]
    fn two_by_two_scenario() {
        // Exact solution of the classic CG example: x = [1/11, 7/11]
        let a = two_by_two();
        let b = DenseVector::from_values(vec![1.0, 2.0]);
        let mut x = DenseVector::with_size(2);
        let solver = CgSolver::new();
        let iterations = solver.solve(&a, &b, &mut x).unwrap();
        assert!(iterations <= 2, "took {} iterations", iterations);
        assert!((x.at(0) - 1.0 / 11.0).abs() < 1e-3);
        assert!((x.at(1) - 7.0 / 11.0).abs() < 1e-3);
    }

    #[test]
    fn zero_rhs_returns_zero_iterations() {
        let a = two_by_two();
        let b = DenseVector::with_size(2);
        let mut x = DenseVector::from_values(vec![0.7, -0.3]);
        let solver = CgSolver::new();
        assert_eq!(solver.solve(&a, &b, &mut x).unwrap(), 0);
        // x untouched
        assert_eq!(x.as_slice(), &[0.7, -0.3]);
    }

    #[test]
    fn already_solved_input_returns_zero_iterations() {
        let a = two_by_two();
        let b = DenseVector::from_values(vec![1.0, 2.0]);
        let mut x = DenseVector::from_values(vec![1.0 / 11.0, 7.0 / 11.0]);
        let solver = CgSolver::new();
        assert_eq!(solver.solve(&a, &b, &mut x).unwrap(), 0);
    }

    #[test]
    fn warm_start_converges() {
        let a = two_by_two();
        let b = DenseVector::from_values(vec![1.0, 2.0]);
        let mut x = DenseVector::from_values(vec![5.0, -5.0]);
        let solver = CgSolver::new();
        let iterations = solver.solve(&a, &b, &mut x).unwrap();
        assert!(iterations <= 2);
        assert!((x.at(0) - 1.0 / 11.0).abs() < 1e-3);
        assert!((x.at(1) - 7.0 / 11.0).abs() < 1e-3);
    }

    #[test]
    fn non_convergence_reports_max_iterations() {
        // Poorly conditioned system with a 1-iteration budget
        let mut a = RowMatrix::new(3);
        a.set_element(0, 0, 1.0);
        a.set_element(1, 1, 1e-6);
        a.set_element(2, 2, 1e6);
        let b = DenseVector::from_values(vec![1.0, 1.0, 1.0]);
        let mut x = DenseVector::with_size(3);
        let mut solver = CgSolver::new();
        LinearSolver::<f64, RowMatrix<f64>, DenseVector<f64>>::configure(
            &mut solver,
            SolverParams {
                residual: 1e-12,
                max_iterations: 1,
            },
        )
        .unwrap();
        let iterations = solver.solve(&a, &b, &mut x).unwrap();
        assert_eq!(iterations, 1);
    }

    #[test]
    fn zero_iteration_budget_performs_no_iterations() {
        let a = two_by_two();
        let b = DenseVector::from_values(vec![1.0, 2.0]);
        let mut x = DenseVector::<f64>::with_size(2);
        let mut solver = CgSolver::new();
        LinearSolver::<f64, RowMatrix<f64>, DenseVector<f64>>::configure(
            &mut solver,
            SolverParams {
                residual: 1e-4,
                max_iterations: 0,
            },
        )
        .unwrap();
        assert_eq!(solver.solve(&a, &b, &mut x).unwrap(), 0);
        assert_eq!(x.as_slice(), &[0.0, 0.0]);
    }

    #[test]
    fn rhs_size_mismatch_is_an_error() {
        let a = two_by_two();
        let b = DenseVector::<f64>::with_size(3);
        let mut x = DenseVector::with_size(2);
        let solver = CgSolver::new();
        assert!(matches!(
            solver.solve(&a, &b, &mut x),
            Err(SolverError::SizeMismatch {
                expected: 2,
                got: 3
            })
        ));
    }

    #[test]
    fn solution_size_mismatch_is_an_error() {
        let a = two_by_two();
        let b = DenseVector::<f64>::with_size(2);
        let mut x = DenseVector::with_size(4);
        let solver = CgSolver::new();
        assert!(matches!(
            solver.solve(&a, &b, &mut x),
            Err(SolverError::SizeMismatch {
                expected: 2,
                got: 4
            })
        ));
    }

    #[test]
    fn single_precision_solve() {
        let mut a = RowMatrix::<f32>::new(2);
        a.set_element(0, 0, 4.0);
        a.set_element(0, 1, 1.0);
        a.set_element(1, 0, 1.0);
        a.set_element(1, 1, 3.0);
        let b = DenseVector::from_values(vec![1.0f32, 2.0]);
        let mut x = DenseVector::with_size(2);
        let solver = CgSolver::new();
        let iterations = solver.solve(&a, &b, &mut x).unwrap();
        assert!(iterations <= 2);
        assert!((x.at(0) - 1.0 / 11.0).abs() < 1e-3);
    }
}
