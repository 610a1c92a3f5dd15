/*!
 * Batch processing of translation tasks.
 *
 * Tasks are split into contiguous chunks of `max_workers`. All tasks of a
 * chunk run concurrently and the next chunk starts only once every task of
 * the current one has resolved, successfully or not.
 */

use futures::future::join_all;
use log::debug;
use std::future::Future;

/// Chunked concurrent task runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchScheduler {
    /// Maximum number of tasks in flight
    max_workers: usize,
}

impl BatchScheduler {
    /// Create a scheduler; a bound of zero is treated as one
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    /// Maximum number of tasks in flight
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Whether tasks run one at a time
    pub fn is_sequential(&self) -> bool {
        self.max_workers == 1
    }

    /// Number of chunks `task_count` tasks are split into
    pub fn chunk_count(&self, task_count: usize) -> usize {
        task_count.div_ceil(self.max_workers)
    }

    /// Run every task through `worker`, chunk by chunk
    ///
    /// Results come back in task order. `on_chunk` is called with the results
    /// of each chunk as soon as the whole chunk has resolved, together with the
    /// number of tasks completed so far and the total.
    pub async fn run<T, R, F, Fut>(
        &self,
        tasks: Vec<T>,
        mut worker: F,
        mut on_chunk: impl FnMut(&[R], usize, usize),
    ) -> Vec<R>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = R>,
    {
        let total = tasks.len();
        let mut results = Vec::with_capacity(total);
        let mut pending = tasks.into_iter().peekable();
        let mut chunk_index = 0;

        while pending.peek().is_some() {
            chunk_index += 1;
            // Futures are created per chunk so nothing from the next chunk exists yet
            let chunk: Vec<Fut> = pending.by_ref().take(self.max_workers).map(&mut worker).collect();
            debug!(
                "Starting chunk {}/{} ({} task(s))",
                chunk_index,
                self.chunk_count(total),
                chunk.len()
            );

            let chunk_results = join_all(chunk).await;
            on_chunk(&chunk_results, results.len() + chunk_results.len(), total);
            results.extend(chunk_results);
        }

        results
    }
}
