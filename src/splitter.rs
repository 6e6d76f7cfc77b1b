// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Result, SolverError};

/// Strategy for carving `size` independent work units across worker threads.
///
/// A splitter hands every thread a starting unit and an advance rule such
/// that each unit in `[0, size)` is visited by exactly one thread exactly
/// once. The context built by [`new_context`](LoopSplitter::new_context)
/// lives for a single parallel loop invocation and is dropped when the loop
/// returns.
///
/// Precondition for every policy: `1 <= num_threads <= size`. With that in
/// place every thread owns at least one unit, which the execution engine
/// relies on (it runs the unit function once before the first advance).
pub trait LoopSplitter {
    /// Per-invocation scheduling state.
    type Context: Send + Sync;

    /// Build the context for a loop of `size` units on `num_threads` threads.
    fn new_context(&self, size: usize, num_threads: usize) -> Result<Self::Context>;

    /// First unit assigned to `thread_index`.
    fn start(context: &Self::Context, thread_index: usize) -> usize;

    /// Advance `n` to the thread's next unit. Returns false once the thread
    /// has exhausted its assigned units.
    fn advance(context: &Self::Context, n: &mut usize, thread_index: usize) -> bool;
}

fn check_split(size: usize, num_threads: usize) -> Result<()> {
    if num_threads == 0 {
        return Err(SolverError::ZeroThreadCount);
    }
    if num_threads > size {
        return Err(SolverError::ThreadCountExceedsSize { num_threads, size });
    }
    Ok(())
}

/// Strided work distribution: thread `t` visits `t, t + T, t + 2T, ...`
/// for `T` threads.
///
/// Maximizes interleaving, which balances load when per-unit cost is uneven
/// across the index range.
#[derive(Clone, Copy, Debug, Default)]
pub struct DispersedSplitter;

/// Context for [`DispersedSplitter`].
#[derive(Debug)]
pub struct DispersedContext {
    size: usize,
    num_threads: usize,
}

impl LoopSplitter for DispersedSplitter {
    type Context = DispersedContext;

    fn new_context(&self, size: usize, num_threads: usize) -> Result<DispersedContext> {
        check_split(size, num_threads)?;
        Ok(DispersedContext { size, num_threads })
    }

    fn start(_context: &DispersedContext, thread_index: usize) -> usize {
        thread_index
    }

    fn advance(context: &DispersedContext, n: &mut usize, _thread_index: usize) -> bool {
        *n += context.num_threads;
        *n < context.size
    }
}

/// Blocked work distribution: thread `t` owns one contiguous sub-range.
///
/// Better cache locality than [`DispersedSplitter`] when nearby units touch
/// nearby memory. When `size` is not a multiple of the thread count, the
/// first `size % num_threads` threads own one extra unit.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialSplitter;

/// Context for [`SequentialSplitter`]: precomputed per-thread ranges.
#[derive(Debug)]
pub struct SequentialContext {
    ranges: Vec<std::ops::Range<usize>>,
}

impl LoopSplitter for SequentialSplitter {
    type Context = SequentialContext;

    fn new_context(&self, size: usize, num_threads: usize) -> Result<SequentialContext> {
        check_split(size, num_threads)?;
        let chunk = size / num_threads;
        let remainder = size % num_threads;
        let mut ranges = Vec::with_capacity(num_threads);
        let mut begin = 0;
        for t in 0..num_threads {
            let extra = usize::from(t < remainder);
            let end = begin + chunk + extra;
            ranges.push(begin..end);
            begin = end;
        }
        debug_assert_eq!(begin, size);
        Ok(SequentialContext { ranges })
    }

    fn start(context: &SequentialContext, thread_index: usize) -> usize {
        context.ranges[thread_index].start
    }

    fn advance(context: &SequentialContext, n: &mut usize, thread_index: usize) -> bool {
        *n += 1;
        *n < context.ranges[thread_index].end
    }
}

/// Names accepted by [`SplitterKind::from_name`].
pub const SPLITTER_NAMES: [&str; 2] = ["dispersed", "sequential"];

/// Runtime-selectable loop splitter, keyed by name.
///
/// This is the registry form of the splitter strategies: external
/// configuration picks one by string, everything downstream dispatches
/// through this tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitterKind {
    /// [`DispersedSplitter`] (strided).
    Dispersed,
    /// [`SequentialSplitter`] (blocked).
    Sequential,
}

/// Context for [`SplitterKind`], wrapping whichever policy was selected.
#[derive(Debug)]
pub enum SplitterContext {
    /// Context for the dispersed policy.
    Dispersed(DispersedContext),
    /// Context for the sequential policy.
    Sequential(SequentialContext),
}

impl SplitterKind {
    /// Look up a splitter by its registered name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "dispersed" => Ok(SplitterKind::Dispersed),
            "sequential" => Ok(SplitterKind::Sequential),
            _ => Err(SolverError::UnknownSplitter {
                name: name.to_string(),
                available: SPLITTER_NAMES.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }

    /// The name this splitter is registered under.
    pub fn name(&self) -> &'static str {
        match self {
            SplitterKind::Dispersed => "dispersed",
            SplitterKind::Sequential => "sequential",
        }
    }
}

impl SplitterContext {
    /// First unit assigned to `thread_index`.
    pub fn start(&self, thread_index: usize) -> usize {
        match self {
            SplitterContext::Dispersed(cx) => DispersedSplitter::start(cx, thread_index),
            SplitterContext::Sequential(cx) => SequentialSplitter::start(cx, thread_index),
        }
    }

    /// Advance `n` to the thread's next unit; false when exhausted.
    pub fn advance(&self, n: &mut usize, thread_index: usize) -> bool {
        match self {
            SplitterContext::Dispersed(cx) => DispersedSplitter::advance(cx, n, thread_index),
            SplitterContext::Sequential(cx) => SequentialSplitter::advance(cx, n, thread_index),
        }
    }
}

impl LoopSplitter for SplitterKind {
    type Context = SplitterContext;

    fn new_context(&self, size: usize, num_threads: usize) -> Result<SplitterContext> {
        match self {
            SplitterKind::Dispersed => DispersedSplitter
                .new_context(size, num_threads)
                .map(SplitterContext::Dispersed),
            SplitterKind::Sequential => SequentialSplitter
                .new_context(size, num_threads)
                .map(SplitterContext::Sequential),
        }
    }

    fn start(context: &SplitterContext, thread_index: usize) -> usize {
        context.start(thread_index)
    }

    fn advance(context: &SplitterContext, n: &mut usize, thread_index: usize) -> bool {
        context.advance(n, thread_index)
    }
}
