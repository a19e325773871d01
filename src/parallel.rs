//! Fixed-fanout parallel loop used by the axis transforms and the
//! spectral divide.
//!
//! Work is split into contiguous chunks, one per worker state, and
//! dispatched on the rayon pool. A single worker (or a trivial workload)
//! degrades to in-thread execution so small problems never pay for
//! scheduling.

/// Resolve a requested worker count: 0 picks the runtime parallelism.
pub(crate) fn effective_workers(workers: usize) -> usize {
    if workers == 0 {
        rayon::current_num_threads().max(1)
    } else {
        workers
    }
}

/// Clamp a worker count to at least 1 and at most the task count.
pub(crate) fn clamp_workers(workers: usize, tasks: usize) -> usize {
    if tasks < 1 {
        return 1;
    }
    workers.clamp(1, tasks)
}

/// Run `f(state, start, end)` over `tasks` items split into one
/// contiguous range per state. All workers run to completion; the first
/// error (by worker order) is returned.
pub(crate) fn parallel_for_with<S, E, F>(states: &mut [S], tasks: usize, f: F) -> Result<(), E>
where
    S: Send,
    E: Send,
    F: Fn(&mut S, usize, usize) -> Result<(), E> + Sync,
{
    if tasks == 0 || states.is_empty() {
        return Ok(());
    }

    let workers = states.len().min(tasks);
    if workers <= 1 {
        return f(&mut states[0], 0, tasks);
    }

    let chunk = tasks.div_ceil(workers);
    let mut results: Vec<Result<(), E>> = Vec::with_capacity(workers);
    results.resize_with(workers, || Ok(()));

    rayon::scope(|scope| {
        for ((w, state), slot) in states[..workers]
            .iter_mut()
            .enumerate()
            .zip(results.iter_mut())
        {
            let start = w * chunk;
            if start >= tasks {
                break;
            }
            let end = tasks.min(start + chunk);
            let f = &f;
            scope.spawn(move |_| *slot = f(state, start, end));
        }
    });

    results.into_iter().find(|r| r.is_err()).unwrap_or(Ok(()))
}

/// Shared mutable view of a workspace for the parallel line loops.
///
/// Workers receive disjoint line ranges and every buffer element belongs
/// to exactly one line, so no index is ever touched by two workers. All
/// access goes through the unsafe accessors under that invariant; it is
/// the caller's job to keep the ranges disjoint.
pub(crate) struct SharedBuf<T> {
    ptr: *mut T,
}

unsafe impl<T: Send> Send for SharedBuf<T> {}
unsafe impl<T: Send> Sync for SharedBuf<T> {}

impl<T: Copy> SharedBuf<T> {
    pub(crate) fn new(data: &mut [T]) -> Self {
        SharedBuf {
            ptr: data.as_mut_ptr(),
        }
    }

    /// # Safety
    /// `i` must lie inside the wrapped buffer and inside the caller's
    /// assigned line range.
    #[inline]
    pub(crate) unsafe fn get(&self, i: usize) -> T {
        *self.ptr.add(i)
    }

    /// # Safety
    /// As [`SharedBuf::get`].
    #[inline]
    pub(crate) unsafe fn set(&self, i: usize, value: T) {
        *self.ptr.add(i) = value;
    }

    /// # Safety
    /// `start..start + len` must lie inside the wrapped buffer and inside
    /// the caller's assigned line range.
    #[allow(clippy::mut_from_ref)]
    #[inline]
    pub(crate) unsafe fn slice_mut(&self, start: usize, len: usize) -> &mut [T] {
        std::slice::from_raw_parts_mut(self.ptr.add(start), len)
    }
}
