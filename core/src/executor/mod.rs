//! Bounded worker-pool scheduler
//!
//! Runs a batch of heterogeneous tasks on a fixed number of workers and
//! aggregates per-task outcome and timing into an execution report.
//!
//! # Architecture
//!
//! ```text
//! Scheduler::add_task() × N
//!   ↓
//! Scheduler::run()
//!   ↓ push N tasks, close                    (task conduit, capacity ≥ N)
//! worker 1..=concurrency  → execute + time → TaskResult
//!   ↓                                        (result conduit, fixed capacity)
//! aggregator → results + completed (one lock) → progress / renderer
//!   ↓ done signal
//! ExecutionReport
//! ```
//!
//! A failing (or panicking, or timed out) task only marks its own result as
//! failed; the rest of the batch keeps running.

mod aggregator;
mod engine;
mod output;
mod pool;
mod progress;
mod report;
mod state;
pub mod traits;
pub mod types;

pub use engine::{Scheduler, SchedulerBuilder};
pub use output::{emit_progress_update, emit_run_end, emit_run_start, emit_task_complete};
pub use progress::{Progress, ProgressMonitor};
pub use report::ExecutionReport;
pub use state::{SchedulerState, StateTransition};
pub use types::{
    FnTask, SchedulerError, SchedulerOpts, SharedTask, Task, TaskError, TaskResult, TaskRun,
    DEFAULT_RESULT_BUFFER,
};
