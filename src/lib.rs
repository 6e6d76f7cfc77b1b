// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

//! Parallel iterative sparse linear solvers.
//!
//! This crate is the numerical core of a physics simulation framework: a
//! parallel execution engine that splits index ranges across worker threads
//! under pluggable distribution policies, and iterative solvers (Conjugate
//! Gradient, Gauss-Seidel) for the sparse systems that implicit
//! discretizations such as pressure projection produce. Callers assemble a
//! [`RowMatrix`] and a right-hand side, pick a solver directly or by name
//! through [`solver_from_name`], and read back the mutated solution vector
//! and an iteration count.

#![warn(missing_docs)]

/// Conjugate Gradient solver.
pub mod cg;
/// Error types for the library.
pub mod error;
/// Gauss-Seidel solver.
pub mod gauss_seidel;
/// Sparse matrix abstraction and row-compressed storage.
pub mod matrix;
/// Parallel execution engine and driver.
pub mod parallel;
/// Iterative solver contract, parameters, and registry.
pub mod solver;
/// Loop-splitting strategies for parallel iteration.
pub mod splitter;
/// Dense vector abstraction and scalar types.
pub mod vector;

pub use crate::cg::CgSolver;
pub use crate::error::{Result, SolverError};
pub use crate::gauss_seidel::GaussSeidelSolver;
pub use crate::matrix::{FixedRowMatrix, FixedSparseMatrix, RowMatrix, SparseMatrix};
pub use crate::parallel::{EngineKind, ParallelDriver, ENGINE_NAMES};
pub use crate::solver::{solver_from_name, LinearSolver, SolverParams, SOLVER_NAMES};
pub use crate::splitter::{
    DispersedSplitter, LoopSplitter, SequentialSplitter, SplitterKind, SPLITTER_NAMES,
};
pub use crate::vector::{DenseVector, LinearVector, Scalar};
