use std::num::NonZeroUsize;

use rayon::prelude::*;

use crate::error::{Result, StitchError};

/// Fixed-size worker pool shared by every transform pass and scoring batch.
///
/// The thread count is fixed at construction. Work submitted through
/// [`for_each_strided`](Self::for_each_strided) or [`map`](Self::map) blocks
/// the caller until all of it has completed.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    threads: usize,
}

impl WorkerPool {
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(StitchError::ThreadPool(
                "worker pool needs at least one thread".into(),
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("phasestitch-worker-{i}"))
            .build()
            .map_err(|e| StitchError::ThreadPool(e.to_string()))?;
        Ok(Self { pool, threads })
    }

    /// Pool sized to the host's available hardware concurrency.
    pub fn with_available_parallelism() -> Result<Self> {
        let threads = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self::new(threads)
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Deal `items` out round-robin (item `i` goes to worker `i % threads`)
    /// and run `task` on each, with one `init()` scratch state per worker.
    ///
    /// Returns once every worker has finished. The first error reported by
    /// any worker is returned; the other workers still run to completion.
    pub fn for_each_strided<T, S, I, F>(&self, items: Vec<T>, init: I, task: F) -> Result<()>
    where
        T: Send,
        I: Fn() -> S + Sync,
        F: Fn(&mut S, T) -> Result<()> + Sync,
    {
        if self.threads == 1 || items.len() <= 1 {
            let mut state = init();
            return items.into_iter().try_for_each(|item| task(&mut state, item));
        }

        let mut buckets: Vec<Vec<T>> = (0..self.threads).map(|_| Vec::new()).collect();
        for (i, item) in items.into_iter().enumerate() {
            buckets[i % self.threads].push(item);
        }

        let results: Vec<Result<()>> = self.pool.install(|| {
            buckets
                .into_par_iter()
                .map(|bucket| {
                    let mut state = init();
                    bucket.into_iter().try_for_each(|item| task(&mut state, item))
                })
                .collect()
        });
        results.into_iter().collect()
    }

    /// Order-preserving parallel map.
    pub fn map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync,
    {
        self.pool.install(|| items.par_iter().map(&f).collect())
    }

    /// Run `op` inside the pool so nested rayon iterators use its threads.
    pub fn install<R, OP>(&self, op: OP) -> R
    where
        R: Send,
        OP: FnOnce() -> R + Send,
    {
        self.pool.install(op)
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.threads)
            .finish()
    }
}
