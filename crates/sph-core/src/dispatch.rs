//! Fork-join worker pool for the per-particle passes.
//!
//! Each pass hands every worker exclusive `&mut` access to the slots it
//! processes and shared access to everything else, so the "each particle
//! writes only its own slot" rule is checked by the borrow checker rather than
//! by convention. [`WorkerPool::for_each_slot`] returns only after every slot
//! has been processed, which is the barrier between passes.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::SimulationError;

/// Fixed-size pool of worker threads reused by every tick.
pub struct WorkerPool {
    workers: usize,
    #[cfg(feature = "parallel")]
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    /// Build a pool of `workers` threads.
    ///
    /// Without the `parallel` feature the passes run on the calling thread and
    /// `workers` is only recorded.
    pub fn new(workers: usize) -> Result<Self, SimulationError> {
        if workers == 0 {
            return Err(SimulationError::invalid("worker_count must be at least 1"));
        }

        #[cfg(feature = "parallel")]
        {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("sph-worker-{i}"))
                .build()
                .map_err(|e| SimulationError::WorkerPool {
                    message: e.to_string(),
                })?;
            Ok(Self { workers, pool })
        }

        #[cfg(not(feature = "parallel"))]
        {
            tracing::debug!(workers, "parallel feature disabled, passes run inline");
            Ok(Self { workers })
        }
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `job(index, &mut slots[index])` for every slot and wait for all of them.
    ///
    /// Slots are processed in no particular order.
    pub fn for_each_slot<T, F>(&self, slots: &mut [T], job: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Send + Sync,
    {
        #[cfg(feature = "parallel")]
        {
            self.pool.install(|| {
                slots
                    .par_iter_mut()
                    .enumerate()
                    .for_each(|(i, slot)| job(i, slot));
            });
        }

        #[cfg(not(feature = "parallel"))]
        {
            for (i, slot) in slots.iter_mut().enumerate() {
                job(i, slot);
            }
        }
    }
}
