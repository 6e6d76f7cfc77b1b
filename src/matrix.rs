// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use crate::parallel::{DisjointSlice, ParallelDriver};
use crate::vector::{LinearVector, Scalar};

/// Row-compressed sparse matrix contract consumed by the solvers.
///
/// The row count is fixed for the matrix's lifetime, and within a row each
/// column appears at most once. Solvers treat the matrix as read-only for
/// the duration of one solve; they freeze it with
/// [`make_fixed`](Self::make_fixed) before entering the multiply loop.
///
/// Per-row iteration is a generic method on purpose: the per-nonzero loop
/// is the hottest path in the crate and must monomorphize, not dispatch.
pub trait SparseMatrix<T: Scalar>: Send + Sync {
    /// The frozen, multiply-optimized form of this matrix.
    type Fixed: FixedSparseMatrix<T>;

    /// Row count, invariant for the matrix's lifetime.
    fn rows(&self) -> usize;

    /// Invoke `f(column, value)` once per nonzero entry of `row`, in no
    /// particular order. A diagonal entry, if present, is visited like any
    /// other and is distinguishable by `column == row`.
    fn for_each_in_row<F: FnMut(usize, T)>(&self, row: usize, f: F);

    /// Produce an immutable snapshot optimized for repeated multiplies.
    /// Later mutation of this matrix has no effect on the snapshot.
    fn make_fixed(&self) -> Self::Fixed;
}

/// Frozen sparse matrix: supports only the matrix-vector product.
pub trait FixedSparseMatrix<T: Scalar>: Send + Sync {
    /// Row count.
    fn rows(&self) -> usize;

    /// Compute `result = self * rhs`, distributing rows across the
    /// driver's workers. Writes one output element per row; the splitter's
    /// exactly-once invariant keeps the writes disjoint.
    fn multiply<V: LinearVector<T>>(&self, rhs: &V, result: &mut V, parallel: &ParallelDriver);
}

/// Mutable row-compressed sparse matrix, the default [`SparseMatrix`]
/// implementation.
///
/// Each row holds its `(column, value)` pairs in insertion order. Intended
/// for assembly by an external caller (e.g. a pressure projection building
/// a Poisson system), then frozen and handed to a solver.
#[derive(Clone, Debug)]
pub struct RowMatrix<T> {
    rows: Vec<Vec<(usize, T)>>,
}

impl<T: Scalar> RowMatrix<T> {
    /// Create an empty matrix with a fixed number of rows.
    pub fn new(rows: usize) -> Self {
        RowMatrix {
            rows: vec![Vec::new(); rows],
        }
    }

    /// Set the entry at `(row, column)`, replacing any existing value.
    pub fn set_element(&mut self, row: usize, column: usize, value: T) {
        if let Some(entry) = self.rows[row].iter_mut().find(|(c, _)| *c == column) {
            entry.1 = value;
        } else {
            self.rows[row].push((column, value));
        }
    }

    /// Add `value` to the entry at `(row, column)`, inserting it if absent.
    pub fn add_to_element(&mut self, row: usize, column: usize, value: T) {
        if let Some(entry) = self.rows[row].iter_mut().find(|(c, _)| *c == column) {
            entry.1 = entry.1 + value;
        } else {
            self.rows[row].push((column, value));
        }
    }

    /// Get the entry at `(row, column)`, or zero if absent.
    pub fn get(&self, row: usize, column: usize) -> T {
        self.rows[row]
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| *v)
            .unwrap_or_else(T::zero)
    }

    /// Remove every entry of `row`. The row count is unchanged.
    pub fn clear_row(&mut self, row: usize) {
        self.rows[row].clear();
    }

    /// Number of stored entries in `row`.
    pub fn non_zeros_in_row(&self, row: usize) -> usize {
        self.rows[row].len()
    }

    /// Total number of stored entries.
    pub fn num_non_zeros(&self) -> usize {
        self.rows.iter().map(|row| row.len()).sum()
    }
}

impl<T: Scalar> SparseMatrix<T> for RowMatrix<T> {
    type Fixed = FixedRowMatrix<T>;

    fn rows(&self) -> usize {
        self.rows.len()
    }

    fn for_each_in_row<F: FnMut(usize, T)>(&self, row: usize, mut f: F) {
        for &(column, value) in &self.rows[row] {
            f(column, value);
        }
    }

    fn make_fixed(&self) -> FixedRowMatrix<T> {
        let non_zeros = self.num_non_zeros();
        let mut row_heads = Vec::with_capacity(self.rows.len() + 1);
        let mut columns = Vec::with_capacity(non_zeros);
        let mut values = Vec::with_capacity(non_zeros);
        row_heads.push(0);
        for row in &self.rows {
            for &(column, value) in row {
                columns.push(column);
                values.push(value);
            }
            row_heads.push(columns.len());
        }
        FixedRowMatrix {
            row_heads,
            columns,
            values,
        }
    }
}

/// Immutable CSR snapshot of a [`RowMatrix`], optimized for the repeated
/// matrix-vector products inside an iterative solve.
#[derive(Clone, Debug)]
pub struct FixedRowMatrix<T> {
    row_heads: Vec<usize>,
    columns: Vec<usize>,
    values: Vec<T>,
}

impl<T: Scalar> FixedSparseMatrix<T> for FixedRowMatrix<T> {
    fn rows(&self) -> usize {
        self.row_heads.len() - 1
    }

    fn multiply<V: LinearVector<T>>(&self, rhs: &V, result: &mut V, parallel: &ParallelDriver) {
        let num_rows = self.rows();
        assert_eq!(
            rhs.len(),
            num_rows,
            "multiply: rhs size does not match row count"
        );
        assert_eq!(
            result.len(),
            num_rows,
            "multiply: result size does not match row count"
        );
        let x = rhs.as_slice();
        let out = DisjointSlice::new(result.as_mut_slice());
        parallel.for_each(num_rows, |row, _thread_index| {
            let mut sum = T::zero();
            for k in self.row_heads[row]..self.row_heads[row + 1] {
                sum = sum + self.values[k] * x[self.columns[k]];
            }
            // row is visited exactly once per invocation
            unsafe { out.write(row, sum) };
        });
    }
}
