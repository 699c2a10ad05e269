// Job Domain Model

use serde::{Deserialize, Serialize};

/// Job ID: position in queue-insertion order, starting at 1
pub type JobId = u64;

/// A unit of work flowing through the bounded queue.
///
/// Created by a producer at enqueue time and consumed by exactly one
/// consumer. `duration` is measured in configured time units (seconds in
/// production, see [`crate::config::Timing`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub duration: u64,
}

impl Job {
    pub fn new(id: JobId, duration: u64) -> Self {
        Self { id, duration }
    }
}

impl std::fmt::Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Job id {} duration {}", self.id, self.duration)
    }
}
