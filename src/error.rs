// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

/// Errors that can occur during solver configuration, work splitting, or
/// a solve itself.
///
/// Non-convergence is deliberately not represented here: an iterative solver
/// that runs out of iterations reports that through its returned iteration
/// count, and the caller decides whether that is acceptable.
#[derive(Debug)]
pub enum SolverError {
    /// A vector's size does not match the row count of the system.
    SizeMismatch {
        /// The expected size (row count of the matrix).
        expected: usize,
        /// The size that was actually supplied.
        got: usize,
    },
    /// More worker threads were requested than there are work units.
    ThreadCountExceedsSize {
        /// The requested thread count.
        num_threads: usize,
        /// The number of work units to split.
        size: usize,
    },
    /// A thread count of zero was requested.
    ZeroThreadCount,
    /// A matrix row has a zero or missing diagonal entry.
    ZeroDiagonal {
        /// The offending row index.
        row: usize,
    },
    /// Solver tolerance is not positive and finite.
    InvalidTolerance(f64),
    /// No solver is registered under the given name.
    UnknownSolver {
        /// The name that was requested.
        name: String,
        /// The solver names that are available.
        available: Vec<String>,
    },
    /// No loop splitter is registered under the given name.
    UnknownSplitter {
        /// The name that was requested.
        name: String,
        /// The splitter names that are available.
        available: Vec<String>,
    },
    /// No parallel engine is registered under the given name.
    UnknownEngine {
        /// The name that was requested.
        name: String,
        /// The engine names that are available.
        available: Vec<String>,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::SizeMismatch { expected, got } => {
                write!(f, "size mismatch: expected {}, got {}", expected, got)
            }
            SolverError::ThreadCountExceedsSize { num_threads, size } => {
                write!(
                    f,
                    "thread count {} exceeds loop size {}",
                    num_threads, size
                )
            }
            SolverError::ZeroThreadCount => {
                write!(f, "thread count must be at least 1")
            }
            SolverError::ZeroDiagonal { row } => {
                write!(f, "zero or missing diagonal entry at row {}", row)
            }
            SolverError::InvalidTolerance(tol) => {
                write!(
                    f,
                    "invalid tolerance: {} (must be positive and finite)",
                    tol
                )
            }
            SolverError::UnknownSolver { name, available } => {
                write!(
                    f,
                    "unknown solver '{}'; available solvers: {:?}",
                    name, available
                )
            }
            SolverError::UnknownSplitter { name, available } => {
                write!(
                    f,
                    "unknown splitter '{}'; available splitters: {:?}",
                    name, available
                )
            }
            SolverError::UnknownEngine { name, available } => {
                write!(
                    f,
                    "unknown engine '{}'; available engines: {:?}",
                    name, available
                )
            }
        }
    }
}

impl std::error::Error for SolverError {}

/// Convenience type alias for Results with SolverError.
pub type Result<T> = std::result::Result<T, SolverError>;
