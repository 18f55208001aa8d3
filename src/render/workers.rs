use std::ops::Range;

use crate::foundation::error::{PadError, PadResult};

/// Split `[0, height)` into `workers` contiguous row ranges.
///
/// Every range has `height / workers` rows except the last, which also takes the remainder.
/// The ranges are disjoint, in order, and cover `[0, height)` exactly. `workers == 0` is
/// treated as one worker.
pub fn partition_rows(height: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let rows_per_worker = height / workers;
    (0..workers)
        .map(|i| {
            let start = i * rows_per_worker;
            let end = if i + 1 == workers {
                height
            } else {
                start + rows_per_worker
            };
            start..end
        })
        .collect()
}

/// Number of hardware threads, at least 1.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Fixed-size worker pool that runs one task per row range and joins before returning.
pub struct RowWorkers {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl std::fmt::Debug for RowWorkers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowWorkers")
            .field("workers", &self.workers)
            .finish()
    }
}

impl RowWorkers {
    /// Build a pool with `workers` threads; `None` uses the hardware concurrency.
    pub fn new(workers: Option<usize>) -> PadResult<Self> {
        if let Some(n) = workers
            && n == 0
        {
            return Err(PadError::validation("worker count must be >= 1 when set"));
        }
        let workers = workers.unwrap_or_else(default_worker_count);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("padbench-row-{i}"))
            .build()
            .map_err(|e| PadError::Other(anyhow::anyhow!("failed to build row worker pool: {e}")))?;
        Ok(Self { pool, workers })
    }

    /// Worker (and partition) count.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `job(rows, rows_bytes)` for every partition of a `height`-row buffer in parallel.
    ///
    /// `data` is split into disjoint mutable slices, one per range, so workers never alias.
    /// Returns once all workers have finished.
    pub fn for_each_range<F>(&self, data: &mut [u8], row_bytes: usize, height: usize, job: F)
    where
        F: Fn(Range<usize>, &mut [u8]) + Sync,
    {
        debug_assert_eq!(data.len(), row_bytes * height);
        let ranges = partition_rows(height, self.workers);
        let job = &job;
        self.pool.scope(|scope| {
            let mut rest = data;
            for rows in ranges {
                let (head, tail) = std::mem::take(&mut rest).split_at_mut(rows.len() * row_bytes);
                rest = tail;
                if rows.is_empty() {
                    continue;
                }
                scope.spawn(move |_| job(rows, head));
            }
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/workers.rs"]
mod tests;
