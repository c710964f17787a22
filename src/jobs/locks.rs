use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per migration job.
///
/// A `process_batch` call holds its job's guard from loading the job until
/// the advanced counters are committed, so concurrent calls for the same job
/// run one after another. Different jobs never contend. An entry lives only
/// while some call holds or waits for it.
#[derive(Clone, Default)]
pub struct JobLocks {
    inner: Arc<StdMutex<HashMap<i32, Arc<Mutex<()>>>>>,
}

/// Exclusive access to one job. Dropping it releases the job and forgets
/// its lock once nobody else is waiting.
pub struct JobLockGuard {
    job_id: i32,
    locks: JobLocks,
    guard: Option<OwnedMutexGuard<()>>,
}

impl JobLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `job_id`.
    pub async fn acquire(&self, job_id: i32) -> JobLockGuard {
        let lock = {
            let mut locks = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(job_id).or_default().clone()
        };

        JobLockGuard {
            job_id,
            locks: self.clone(),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Number of jobs currently holding or waiting on a lock.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, job_id: i32) {
        let mut locks = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        // The map's own handle is the only one left: no holder, no waiter.
        if locks
            .get(&job_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&job_id);
        }
    }
}

impl Drop for JobLockGuard {
    fn drop(&mut self) {
        self.guard.take();
        self.locks.release(self.job_id);
    }
}
