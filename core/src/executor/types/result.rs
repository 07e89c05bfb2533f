use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};

use super::error::TaskError;

/// Outcome and timing of one executed task.
///
/// Built exactly once per task by the worker that ran it, then handed to the
/// aggregator. `success` is always `error.is_none()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskResult {
    /// Task name as reported by `Task::name`
    pub task_name: String,

    /// Position of the task in submission order
    pub task_index: usize,

    /// Worker that executed the task (1-based)
    pub worker_id: usize,

    /// Wall-clock timestamp taken right before `execute`
    pub started_at: DateTime<Local>,

    /// Wall-clock timestamp taken right after `execute`
    pub finished_at: DateTime<Local>,

    /// Monotonic time spent in `execute`
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,

    /// Failure cause (if any)
    pub error: Option<String>,

    pub success: bool,
}

fn serialize_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Identity and timing of a finished execution, before its outcome is known.
#[derive(Debug, Clone)]
pub struct TaskRun {
    pub task_name: String,
    pub task_index: usize,
    pub worker_id: usize,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub duration: Duration,
}

impl TaskResult {
    pub fn from_outcome(run: TaskRun, outcome: Result<(), TaskError>) -> Self {
        let error = outcome.err().map(|e| e.to_string());
        Self {
            task_name: run.task_name,
            task_index: run.task_index,
            worker_id: run.worker_id,
            started_at: run.started_at,
            finished_at: run.finished_at,
            duration: run.duration,
            success: error.is_none(),
            error,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }
}
