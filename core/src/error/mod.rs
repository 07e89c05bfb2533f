#[allow(clippy::module_inception)]
pub mod error;
pub mod scheduler;

pub use error::{CliError, ConfigError};
pub use scheduler::SchedulerError;
