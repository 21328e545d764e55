use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

pub const DEFAULT_CONCURRENCY: usize = 100;
pub const MAX_CONCURRENCY: usize = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("concurrency limit must be between 1 and {MAX_CONCURRENCY}, got {0}")]
pub struct LimiterError(pub usize);

/// Counting limiter shared by every probe of a run.
#[derive(Debug)]
pub struct ConcurrencyLimiter {
    sem: Arc<Semaphore>,
    limit: usize,
}

impl Clone for ConcurrencyLimiter {
    fn clone(&self) -> Self { ConcurrencyLimiter { sem: self.sem.clone(), limit: self.limit } }
}

impl Default for ConcurrencyLimiter {
    fn default() -> Self {
        ConcurrencyLimiter { sem: Arc::new(Semaphore::new(DEFAULT_CONCURRENCY)), limit: DEFAULT_CONCURRENCY }
    }
}

impl ConcurrencyLimiter {
    pub fn new(limit: usize) -> Result<Self, LimiterError> {
        if limit == 0 || limit > MAX_CONCURRENCY {
            return Err(LimiterError(limit));
        }
        Ok(ConcurrencyLimiter { sem: Arc::new(Semaphore::new(limit)), limit })
    }

    pub fn limit(&self) -> usize { self.limit }

    /// Wait for a free slot. The slot is released when the permit drops.
    pub async fn acquire(&self) -> OwnedSemaphorePermit {
        // the semaphore is never closed, so acquiring cannot fail
        match self.sem.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => unreachable!("limiter semaphore closed"),
        }
    }

    pub fn available(&self) -> usize { self.sem.available_permits() }
}
