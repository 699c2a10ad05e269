// Domain Layer - Pure queue logic and entities

pub mod error;
pub mod job;
pub mod queue;

// Re-exports
pub use error::DomainError;
pub use job::{Job, JobId};
pub use queue::BoundedQueue;
