// Central Error Type for the Core

use thiserror::Error;

/// Core-level error type
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Clock time cannot be retrieved: {0}")]
    ClockUnavailable(String),

    #[error(
        "Semaphore wait failed on '{counter}' for a reason other than timeout. \
         Clean up stale synchronization state before retrying the run."
    )]
    WaitFailed { counter: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;

/// Process exit code for a normal run
pub const EXIT_OK: i32 = 0;
/// Process exit code when the system clock cannot be read
pub const EXIT_CLOCK: i32 = 2;
/// Process exit code when a semaphore wait fails for a reason other than timeout
pub const EXIT_WAIT_FAILED: i32 = 3;

impl CoreError {
    /// Map a fatal worker error to the process exit code it surfaces as.
    pub fn exit_code(&self) -> i32 {
        match self {
            CoreError::ClockUnavailable(_) => EXIT_CLOCK,
            CoreError::WaitFailed { .. } => EXIT_WAIT_FAILED,
            // Validation and IO failures are surfaced before workers start
            // and share the generic usage exit code.
            _ => 1,
        }
    }
}
