//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `taskpool_core::api` instead of reaching into internal modules.

pub use crate::config::{
    load_default, load_from_path, AppConfig, DemoConfig, LoggingConfig, SchedulerConfig,
};
pub use crate::error::{CliError, ConfigError, SchedulerError};
pub use crate::executor::traits::{FaultPolicy, RenderEvent, ReportRendererPlugin};
pub use crate::executor::{
    ExecutionReport, FnTask, Progress, Scheduler, SchedulerBuilder, SchedulerOpts,
    SchedulerState, SharedTask, Task, TaskError, TaskResult,
};
