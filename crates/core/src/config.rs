// Run Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::error::{DomainError, Result};

/// Bounded wait applied to empty/full acquisition (seconds)
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(20);
/// Upper bound on the arrival jitter a producer sleeps between jobs (time units)
pub const DEFAULT_MAX_ARRIVAL_DELAY: u64 = 5;
/// Upper bound on a job's execution duration (time units)
pub const DEFAULT_MAX_JOB_DURATION: u64 = 10;

/// Timing constants for a run.
///
/// Durations and delays are expressed in integer time units; `time_unit`
/// maps one unit onto wall-clock time. Production uses one-second units,
/// tests shrink the unit to run the same integer semantics in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timing {
    pub acquire_timeout: Duration,
    pub time_unit: Duration,
    pub max_arrival_delay: u64,
    pub max_job_duration: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            time_unit: Duration::from_secs(1),
            max_arrival_delay: DEFAULT_MAX_ARRIVAL_DELAY,
            max_job_duration: DEFAULT_MAX_JOB_DURATION,
        }
    }
}

impl Timing {
    /// Wall-clock duration of `units` time units, saturating rather than
    /// wrapping on pathological unit counts.
    pub fn units(&self, units: u64) -> Duration {
        let nanos = self.time_unit.as_nanos().saturating_mul(units as u128);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

/// Immutable configuration for one run of the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Capacity of the bounded queue
    pub queue_capacity: usize,
    /// Jobs each producer generates before quitting
    pub jobs_per_producer: u64,
    pub producers: usize,
    pub consumers: usize,
    #[serde(default)]
    pub timing: Timing,
}

impl RunConfig {
    pub fn new(
        queue_capacity: usize,
        jobs_per_producer: u64,
        producers: usize,
        consumers: usize,
    ) -> Self {
        Self {
            queue_capacity,
            jobs_per_producer,
            producers,
            consumers,
            timing: Timing::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(DomainError::InvalidCapacity(self.queue_capacity));
        }
        if self.timing.time_unit.is_zero() {
            return Err(DomainError::ValidationError(
                "time unit must be non-zero".to_string(),
            ));
        }
        if self.timing.max_job_duration == 0 {
            return Err(DomainError::ValidationError(
                "max job duration must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
