//! Bounded parallel I/O
//!
//! Writes and deletions fan out over a pool capped at the number of CPUs.
//! A session builds its pool once and reuses it for every flush. Every
//! task runs to completion; the first failure (in input order) is
//! returned afterwards.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{DeclError, DeclResult};

pub fn worker_count() -> usize {
    num_cpus::get().max(1)
}

pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    pub fn new(threads: usize) -> DeclResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|index| format!("declpack-io-{}", index))
            .build()
            .map_err(|e| DeclError::Io(std::io::Error::other(e.to_string())))?;
        Ok(Self { pool })
    }

    /// One worker per CPU
    pub fn with_default_size() -> DeclResult<Self> {
        Self::new(worker_count())
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn run<T, R, F>(&self, items: Vec<T>, task: F) -> DeclResult<Vec<R>>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> DeclResult<R> + Send + Sync,
    {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let results: Vec<DeclResult<R>> = self
            .pool
            .install(|| items.into_par_iter().map(&task).collect());
        results.into_iter().collect()
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.threads())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn preserves_input_order() {
        let pool = WorkerPool::new(4).unwrap();
        let out = pool.run((0..64).collect(), |n: i32| Ok(n * 2)).unwrap();
        assert_eq!(out, (0..64).map(|n| n * 2).collect::<Vec<_>>());
    }

    #[test]
    fn failures_do_not_stop_other_tasks() {
        let pool = WorkerPool::new(2).unwrap();
        let done = AtomicUsize::new(0);
        let result = pool.run((0..10).collect(), |n: i32| {
            done.fetch_add(1, Ordering::SeqCst);
            if n == 3 {
                Err(DeclError::SessionNotStarted)
            } else {
                Ok(n)
            }
        });
        assert!(matches!(result, Err(DeclError::SessionNotStarted)));
        assert_eq!(done.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn runs_reuse_the_same_workers() {
        let pool = WorkerPool::new(2).unwrap();
        let names = Mutex::new(HashSet::new());
        for _ in 0..3 {
            pool.run((0..32).collect(), |_: i32| {
                let name = std::thread::current().name().map(str::to_string);
                names.lock().unwrap().insert(name);
                Ok(())
            })
            .unwrap();
        }
        let names = names.into_inner().unwrap();
        assert!(names.len() <= 2);
        assert!(names
            .iter()
            .all(|name| name.as_deref().is_some_and(|n| n.starts_with("declpack-io-"))));
    }

    #[test]
    fn empty_input_spawns_nothing() {
        let pool = WorkerPool::new(1).unwrap();
        let out: Vec<i32> = pool.run(Vec::<i32>::new(), Ok).unwrap();
        assert!(out.is_empty());
        assert!(worker_count() >= 1);
        assert_eq!(pool.threads(), 1);
    }
}
