// Jobflow Core - Bounded-buffer producer/consumer coordination
// NO process glue here: argument parsing and startup live in the cli crate.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod notify;
pub mod port;
pub mod sync;

pub use application::{Engine, RunReport};
pub use config::{RunConfig, Timing};
pub use error::{CoreError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
