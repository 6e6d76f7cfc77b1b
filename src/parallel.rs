// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::marker::PhantomData;

use crate::error::{Result, SolverError};
use crate::splitter::{LoopSplitter, SplitterKind};

/// Drive `num_threads` workers through a splitter-provided iteration,
/// spawning one OS thread per worker.
///
/// Thread `q` computes `n = start_func(q)`, then alternates
/// `unit_func(n, q)` and `advance_func(&mut n, q)` until the advance
/// returns false. The call blocks until every worker finishes. No two
/// threads ever receive the same `n` (that is the splitter's invariant),
/// but nothing is guaranteed about ordering between units.
///
/// A panic inside `unit_func` is fatal: all workers are still joined,
/// then the panic propagates out of this call.
pub fn for_each<U, S, A>(unit_func: U, start_func: S, advance_func: A, num_threads: usize)
where
    U: Fn(usize, usize) + Sync,
    S: Fn(usize) -> usize + Sync,
    A: Fn(&mut usize, usize) -> bool + Sync,
{
    assert!(num_threads > 0, "num_threads must be at least 1");
    std::thread::scope(|scope| {
        for q in 0..num_threads {
            let unit_func = &unit_func;
            let start_func = &start_func;
            let advance_func = &advance_func;
            scope.spawn(move || {
                let mut n = start_func(q);
                loop {
                    unit_func(n, q);
                    if !advance_func(&mut n, q) {
                        break;
                    }
                }
            });
        }
    });
}

/// Pool-backed variant of [`for_each`]: one task per worker index on the
/// shared rayon pool instead of a freshly spawned thread per worker.
///
/// Visitation and blocking semantics are identical to [`for_each`]; only
/// the thread provisioning differs.
pub fn for_each_pooled<U, S, A>(unit_func: U, start_func: S, advance_func: A, num_threads: usize)
where
    U: Fn(usize, usize) + Sync,
    S: Fn(usize) -> usize + Sync,
    A: Fn(&mut usize, usize) -> bool + Sync,
{
    assert!(num_threads > 0, "num_threads must be at least 1");
    rayon::scope(|scope| {
        for q in 0..num_threads {
            let unit_func = &unit_func;
            let start_func = &start_func;
            let advance_func = &advance_func;
            scope.spawn(move |_| {
                let mut n = start_func(q);
                loop {
                    unit_func(n, q);
                    if !advance_func(&mut n, q) {
                        break;
                    }
                }
            });
        }
    });
}

/// Run heterogeneous tasks in parallel: one thread per closure, joined
/// before returning.
pub fn run<'env>(functions: Vec<Box<dyn FnOnce() + Send + 'env>>) {
    std::thread::scope(|scope| {
        for function in functions {
            scope.spawn(function);
        }
    });
}

/// Pool-backed variant of [`run`].
pub fn run_pooled<'env>(functions: Vec<Box<dyn FnOnce() + Send + 'env>>) {
    rayon::scope(|scope| {
        for function in functions {
            scope.spawn(move |_| function());
        }
    });
}

/// Names accepted by [`EngineKind::from_name`].
pub const ENGINE_NAMES: [&str; 2] = ["spawn", "pool"];

/// Runtime-selectable parallel execution backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineKind {
    /// Spawn-and-join OS threads per call ([`for_each`] / [`run`]).
    Spawn,
    /// Tasks on the shared rayon worker pool ([`for_each_pooled`] /
    /// [`run_pooled`]).
    Pool,
}

impl EngineKind {
    /// Look up an engine by its registered name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "spawn" => Ok(EngineKind::Spawn),
            "pool" => Ok(EngineKind::Pool),
            _ => Err(SolverError::UnknownEngine {
                name: name.to_string(),
                available: ENGINE_NAMES.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }

    /// The name this engine is registered under.
    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::Spawn => "spawn",
            EngineKind::Pool => "pool",
        }
    }
}

/// Convenience layer tying a splitter policy and an execution backend to a
/// thread budget.
///
/// The driver clamps the worker count to the loop size, builds the splitter
/// context for the duration of one call, and falls back to a plain serial
/// loop when only one thread is effective. This mirrors how grid kernels
/// and the matrix multiply consume the engine: they never touch splitter
/// contexts directly.
#[derive(Clone, Debug)]
pub struct ParallelDriver {
    splitter: SplitterKind,
    engine: EngineKind,
    max_threads: usize,
}

impl Default for ParallelDriver {
    fn default() -> Self {
        ParallelDriver::new()
    }
}

impl ParallelDriver {
    /// Create a driver with the sequential splitter, the spawn engine, and
    /// one worker per available CPU core.
    pub fn new() -> Self {
        ParallelDriver {
            splitter: SplitterKind::Sequential,
            engine: EngineKind::Spawn,
            max_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }

    /// Set the loop splitter policy (builder method).
    pub fn with_splitter(mut self, splitter: SplitterKind) -> Self {
        self.splitter = splitter;
        self
    }

    /// Set the execution backend (builder method).
    pub fn with_engine(mut self, engine: EngineKind) -> Self {
        self.engine = engine;
        self
    }

    /// Set the maximal worker thread count (builder method). Clamped to at
    /// least 1. A driver with 1 thread runs every loop serially, which
    /// guarantees bit-reproducible results.
    pub fn with_threads(mut self, max_threads: usize) -> Self {
        self.max_threads = max_threads.max(1);
        self
    }

    /// The configured splitter policy.
    pub fn splitter(&self) -> SplitterKind {
        self.splitter
    }

    /// The configured execution backend.
    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    /// The configured maximal thread count.
    pub fn max_threads(&self) -> usize {
        self.max_threads
    }

    /// Run `func(n, thread_index)` for every `n` in `[0, size)`, split
    /// across up to `max_threads` workers.
    ///
    /// `func` must be safe to invoke concurrently on distinct `n`; each `n`
    /// is visited exactly once. With an effective thread count of 1 the
    /// loop runs serially in index order on the calling thread.
    pub fn for_each<F>(&self, size: usize, func: F)
    where
        F: Fn(usize, usize) + Sync,
    {
        if size == 0 {
            return;
        }
        let num_threads = self.max_threads.min(size);
        if num_threads <= 1 {
            for n in 0..size {
                func(n, 0);
            }
            return;
        }
        let context = match self.splitter.new_context(size, num_threads) {
            Ok(context) => context,
            // num_threads is clamped to [1, size] above
            Err(_) => unreachable!("splitter rejected a clamped thread count"),
        };
        let start = |q: usize| context.start(q);
        let advance = |n: &mut usize, q: usize| context.advance(n, q);
        match self.engine {
            EngineKind::Spawn => for_each(&func, start, advance, num_threads),
            EngineKind::Pool => for_each_pooled(&func, start, advance, num_threads),
        }
    }

    /// Two-dimensional variant of [`for_each`](Self::for_each): runs
    /// `func(i, j, thread_index)` over a `width x height` index space.
    pub fn for_each2<F>(&self, width: usize, height: usize, func: F)
    where
        F: Fn(usize, usize, usize) + Sync,
    {
        self.for_each(width * height, |n, thread_index| {
            func(n % width, n / width, thread_index);
        });
    }

    /// Three-dimensional variant of [`for_each`](Self::for_each): runs
    /// `func(i, j, k, thread_index)` over a `width x height x depth`
    /// index space.
    pub fn for_each3<F>(&self, width: usize, height: usize, depth: usize, func: F)
    where
        F: Fn(usize, usize, usize, usize) + Sync,
    {
        let plane = width * height;
        self.for_each(plane * depth, |n, thread_index| {
            let m = n % plane;
            func(m % width, m / width, n / plane, thread_index);
        });
    }

    /// Run heterogeneous tasks, one worker per closure. With a thread
    /// budget of 1 the closures run serially in order on the calling
    /// thread.
    pub fn run<'env>(&self, functions: Vec<Box<dyn FnOnce() + Send + 'env>>) {
        if self.max_threads > 1 {
            match self.engine {
                EngineKind::Spawn => run(functions),
                EngineKind::Pool => run_pooled(functions),
            }
        } else {
            for function in functions {
                function();
            }
        }
    }
}

/// Shared mutable slice for kernels whose threads write disjoint indices.
///
/// The parallel matrix multiply writes one output element per row, and the
/// splitter guarantees each row is handed to exactly one thread, so the
/// writes never alias. That invariant is what makes the hot loop lock-free:
/// no atomics or mutexes are involved.
pub(crate) struct DisjointSlice<'a, T> {
    ptr: *mut T,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

// SAFETY: DisjointSlice hands out raw writes into a &mut [T] borrow. It is
// only shared across the workers of a single engine call, and every caller
// must uphold the disjoint-index contract of `write`, so sending/sharing
// the wrapper is sound whenever T itself is Send.
unsafe impl<T: Send> Send for DisjointSlice<'_, T> {}
unsafe impl<T: Send> Sync for DisjointSlice<'_, T> {}

impl<'a, T> DisjointSlice<'a, T> {
    pub(crate) fn new(slice: &'a mut [T]) -> Self {
        DisjointSlice {
            ptr: slice.as_mut_ptr(),
            len: slice.len(),
            _marker: PhantomData,
        }
    }

    /// Write `value` at `index`.
    ///
    /// # Safety
    /// No other thread may read or write `index` for the lifetime of the
    /// enclosing parallel call, and `index` must be in bounds.
    pub(crate) unsafe fn write(&self, index: usize, value: T) {
        debug_assert!(index < self.len);
        *self.ptr.add(index) = value;
    }
}
