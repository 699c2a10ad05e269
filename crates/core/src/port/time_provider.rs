// Time Provider Port (for testability)

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{CoreError, Result};

/// Time provider interface (allows mocking in tests).
///
/// Workers read the clock to anchor each bounded wait; a clock that cannot
/// be read is fatal for the reading worker (it terminates rather than
/// retrying).
pub trait TimeProvider: Send + Sync {
    /// Current time in milliseconds since epoch
    fn now_millis(&self) -> Result<i64>;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> Result<i64> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| CoreError::ClockUnavailable(e.to_string()))?;
        Ok(since_epoch.as_millis() as i64)
    }
}

pub mod mocks {
    use super::*;

    /// Time provider whose every read fails, for exercising the fatal
    /// clock path.
    pub struct BrokenTimeProvider;

    impl TimeProvider for BrokenTimeProvider {
        fn now_millis(&self) -> Result<i64> {
            Err(CoreError::ClockUnavailable(
                "mock clock is unreadable".to_string(),
            ))
        }
    }
}
