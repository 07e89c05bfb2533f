use thiserror::Error;

use crate::executor::SchedulerState;

/// Scheduler misuse and internal coordination errors.
///
/// Task failures are never reported through this type; they live on the
/// individual `TaskResult`.
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Concurrency must be at least 1 (got {0})")]
    InvalidConcurrency(usize),

    #[error("Result buffer capacity must be at least 1")]
    InvalidResultBuffer,

    #[error("Scheduler is already running")]
    AlreadyRunning,

    #[error("Scheduler has already completed its run")]
    AlreadyCompleted,

    #[error("Cannot add task '{0}': tasks are frozen once run has started")]
    TasksFrozen(String),

    #[error("Results are not available yet (state: {0:?})")]
    NotFinished(SchedulerState),

    #[error("Invalid state transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: SchedulerState,
        to: SchedulerState,
    },

    #[error("Worker error: {0}")]
    Worker(String),

    #[error("Aggregator error: {0}")]
    Aggregator(String),
}

impl SchedulerError {
    /// Whether the error comes from calling the scheduler the wrong way
    /// (as opposed to a failure inside the pool).
    pub fn is_misuse(&self) -> bool {
        !matches!(self, Self::Worker(_) | Self::Aggregator(_))
    }
}
