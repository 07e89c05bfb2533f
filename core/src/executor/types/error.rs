use std::any::Any;
use std::time::Duration;

use thiserror::Error;

/// Shared scheduler error type.
pub type SchedulerError = crate::error::SchedulerError;

/// Failure cause reported by a single task.
///
/// A task failure never aborts the batch; the worker records it on the
/// task's `TaskResult` and moves on to the next task.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("{0}")]
    Failed(String),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("panicked: {0}")]
    Panicked(String),
}

impl TaskError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    /// Build a `Panicked` error from a caught unwind payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        Self::Panicked(panic_message(payload.as_ref()))
    }
}

impl From<anyhow::Error> for TaskError {
    fn from(err: anyhow::Error) -> Self {
        Self::Failed(format!("{err:#}"))
    }
}

impl From<std::io::Error> for TaskError {
    fn from(err: std::io::Error) -> Self {
        Self::Failed(err.to_string())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_payloads() {
        let err = TaskError::from_panic(Box::new("boom"));
        assert_eq!(err, TaskError::Panicked("boom".to_string()));

        let err = TaskError::from_panic(Box::new(String::from("owned boom")));
        assert_eq!(err.to_string(), "panicked: owned boom");

        let err = TaskError::from_panic(Box::new(42_u8));
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn test_anyhow_conversion_keeps_context() {
        let err: TaskError = anyhow::anyhow!("disk full")
            .context("writing chunk")
            .into();
        assert_eq!(err, TaskError::Failed("writing chunk: disk full".to_string()));
    }
}
