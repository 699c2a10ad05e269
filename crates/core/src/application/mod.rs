// Application Layer - Shared context, workers, and the run engine

pub mod context;
pub mod engine;
pub mod worker;

// Re-exports
pub use context::WorkerContext;
pub use engine::{Engine, RunReport, WorkerKind, WorkerRecord};
pub use worker::{Outcome, Role, Worker};
