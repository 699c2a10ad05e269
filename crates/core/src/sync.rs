// Counting semaphores with bounded-wait acquire

use std::time::Duration;

use tokio::sync::Semaphore;

use crate::error::{CoreError, Result};

/// Outcome of a bounded-wait acquire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    Acquired,
    TimedOut,
}

/// Counting semaphore used for slot signaling between producers and
/// consumers.
///
/// Unlike a permit-scoped semaphore, acquire and release are decoupled:
/// a producer acquires `empty` and a consumer later releases it. Permits
/// are therefore forgotten on acquire and restored with `release`.
#[derive(Debug)]
pub struct SlotSemaphore {
    inner: Semaphore,
    /// Counter name carried into wait-failure errors
    name: &'static str,
}

impl SlotSemaphore {
    pub fn new(name: &'static str, initial: usize) -> Self {
        Self {
            inner: Semaphore::new(initial),
            name,
        }
    }

    /// Block until the counter is positive, then decrement it.
    ///
    /// Returns `TimedOut` without modifying the counter if no decrement
    /// becomes possible within `timeout`. A wait that fails for any reason
    /// other than timeout (the semaphore was closed underneath the waiter)
    /// is fatal and maps to [`CoreError::WaitFailed`].
    pub async fn acquire_timeout(&self, timeout: Duration) -> Result<AcquireOutcome> {
        match tokio::time::timeout(timeout, self.inner.acquire()).await {
            Ok(Ok(permit)) => {
                permit.forget();
                Ok(AcquireOutcome::Acquired)
            }
            Ok(Err(_closed)) => Err(CoreError::WaitFailed { counter: self.name }),
            Err(_elapsed) => Ok(AcquireOutcome::TimedOut),
        }
    }

    /// Increment the counter, waking one waiter if any is blocked.
    pub fn release(&self) {
        self.inner.add_permits(1);
    }

    /// Number of currently available permits (observational, for tests
    /// and diagnostics only).
    pub fn available(&self) -> usize {
        self.inner.available_permits()
    }

    /// Close the semaphore, failing all current and future waiters.
    pub fn close(&self) {
        self.inner.close();
    }
}
