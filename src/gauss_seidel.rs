// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Result, SolverError};
use crate::matrix::SparseMatrix;
use crate::solver::{LinearSolver, SolverParams};
use crate::vector::{LinearVector, Scalar};

/// Gauss-Seidel solver.
///
/// Sweeps rows in increasing index order and updates each `x[row]` in
/// place, so later rows in the same sweep already see the fresh values.
/// That in-place update is what separates this from Jacobi, and it is also
/// why a sweep cannot be parallelized across rows. Every row must carry a
/// nonzero diagonal entry; a zero or missing diagonal is a fatal
/// configuration error.
///
/// Convergence is guaranteed for strictly diagonally dominant (and for
/// SPD) systems; elsewhere the sweep may diverge and the caller sees that
/// as an exhausted iteration budget.
#[derive(Clone, Copy, Debug, Default)]
pub struct GaussSeidelSolver {
    params: SolverParams,
}

impl GaussSeidelSolver {
    /// Create a solver with default parameters.
    pub fn new() -> Self {
        GaussSeidelSolver {
            params: SolverParams::default(),
        }
    }
}

impl<T, M, V> LinearSolver<T, M, V> for GaussSeidelSolver
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

        let max_iterations = self.params.max_iterations as usize;
        if max_iterations == 0 {
            return Ok(0);
        }

        let tolerance = T::from_f64(self.params.residual);
        let mut initial_error = T::zero();
        let mut iteration_count = 0;
        loop {
            let mut error = T::zero();
            iteration_count += 1;
            for row in 0..n {
                let mut diag = T::zero();
                let mut rhs = T::zero();
                let bi = b.at(row);
                a.for_each_in_row(row, |column, value| {
                    if column == row {
                        diag = value;
                    } else {
                        rhs = rhs + value * x.at(column);
                    }
                });
                if diag == T::zero() {
                    return Err(SolverError::ZeroDiagonal { row });
                }
                error = error.max((rhs + diag * x.at(row) - bi).abs());
                x.set(row, (bi - rhs) / diag);
            }
            // An exactly converged sweep stops here, before the relative
            // error is formed: initial_error may itself be zero.
            if error == T::zero() {
                break;
            }
            if initial_error == T::zero() {
                initial_error = error;
            }
            let relative_error = error / initial_error;
            if relative_error <= tolerance || iteration_count >= max_iterations {
                break;
            }
        }
        Ok(iteration_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::RowMatrix;
    use crate::vector::DenseVector;

    fn configured(residual: f64, max_iterations: u32) -> GaussSeidelSolver {
        let mut solver = GaussSeidelSolver::new();
        LinearSolver::<f64, RowMatrix<f64>, DenseVector<f64>>::configure(
            &mut solver,
            SolverParams {
                residual,
                max_iterations,
            },
        )
        .unwrap();
        solver
    }

    #[test]
    fn solves_diagonally_dominant_system() {
        // [ 4 1 ]
        // [ 1 3 ], b = [1, 2], x = [1/11, 7/11]
        let mut a = RowMatrix::<f64>::new(2);
        a.set_element(0, 0, 4.0);
        a.set_element(0, 1, 1.0);
        a.set_element(1, 0, 1.0);
        a.set_element(1, 1, 3.0);
        let b = DenseVector::from_values(vec![1.0, 2.0]);
        let mut x = DenseVector::with_size(2);
        let solver = configured(1e-8, 1000);
        let iterations = solver.solve(&a, &b, &mut x).unwrap();
        assert!(iterations < 1000);
        assert!((x.at(0) - 1.0 / 11.0).abs() < 1e-6);
        assert!((x.at(1) - 7.0 / 11.0).abs() < 1e-6);
    }

    #[test]
    fn diagonal_system_stops_on_exact_zero_error() {
        // A pure diagonal system is solved exactly by the first sweep; the
        // second sweep measures zero error and stops without touching the
        // relative-error path.
        let mut a = RowMatrix::new(3);
        a.set_element(0, 0, 2.0);
        a.set_element(1, 1, 4.0);
        a.set_element(2, 2, 8.0);
        let b = DenseVector::from_values(vec![2.0, 2.0, 2.0]);
        let mut x = DenseVector::with_size(3);
        let solver = configured(1e-4, 100);
        let iterations = solver.solve(&a, &b, &mut x).unwrap();
        assert_eq!(iterations, 2);
        assert_eq!(x.as_slice(), &[1.0, 0.5, 0.25]);
    }

    #[test]
    fn zero_diagonal_is_fatal() {
        let mut a = RowMatrix::new(2);
        a.set_element(0, 0, 1.0);
        a.set_element(1, 0, 1.0); // row 1 has no diagonal entry
        let b = DenseVector::from_values(vec![1.0, 1.0]);
        let mut x = DenseVector::with_size(2);
        let solver = GaussSeidelSolver::new();
        assert!(matches!(
            solver.solve(&a, &b, &mut x),
            Err(SolverError::ZeroDiagonal { row: 1 })
        ));
    }

    #[test]
    fn zero_rhs_returns_zero_iterations() {
        let mut a = RowMatrix::new(2);
        a.set_element(0, 0, 2.0);
        a.set_element(1, 1, 2.0);
        let b = DenseVector::<f64>::with_size(2);
        let mut x = DenseVector::from_values(vec![3.0, 4.0]);
        let solver = GaussSeidelSolver::new();
        assert_eq!(solver.solve(&a, &b, &mut x).unwrap(), 0);
        assert_eq!(x.as_slice(), &[3.0, 4.0]);
    }

    #[test]
    fn iteration_budget_is_respected() {
        // Dominant but slow: tight tolerance with a tiny budget
        let n = 20;
        let mut a = RowMatrix::new(n);
        for i in 0..n {
            a.set_element(i, i, 2.1);
            if i > 0 {
                a.set_element(i, i - 1, -1.0);
            }
            if i + 1 < n {
                a.set_element(i, i + 1, -1.0);
            }
        }
        let b = DenseVector::from_values(vec![1.0; n]);
        let mut x = DenseVector::with_size(n);
        let solver = configured(1e-14, 3);
        assert_eq!(solver.solve(&a, &b, &mut x).unwrap(), 3);
    }

    #[test]
    fn zero_iteration_budget_performs_no_sweeps() {
        let mut a = RowMatrix::new(2);
        a.set_element(0, 0, 2.0);
        a.set_element(1, 1, 2.0);
        let b = DenseVector::from_values(vec![1.0, 1.0]);
        let mut x = DenseVector::<f64>::with_size(2);
        let solver = configured(1e-8, 0);
        assert_eq!(solver.solve(&a, &b, &mut x).unwrap(), 0);
        assert_eq!(x.as_slice(), &[0.0, 0.0]);
    }

    #[test]
    fn size_mismatch_is_an_error() {
        let mut a = RowMatrix::new(2);
        a.set_element(0, 0, 1.0);
        a.set_element(1, 1, 1.0);
        let b = DenseVector::<f64>::with_size(2);
        let mut x = DenseVector::with_size(3);
        let solver = GaussSeidelSolver::new();
        assert!(matches!(
            solver.solve(&a, &b, &mut x),
            Err(SolverError::SizeMismatch {
                expected: 2,
                got: 3
            })
        ));
    }
}
