use std::fmt;
use std::time::Duration;

use super::types::TaskResult;

/// Aggregate statistics for a finished run.
///
/// `results` keeps completion order, which is whatever order the workers
/// happened to finish in.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub run_id: String,

    /// Worker count used for the run
    pub concurrency: usize,

    pub total_tasks: usize,
    pub succeeded: usize,
    pub failed: usize,

    /// Sum of per-task durations
    pub total_duration: Duration,

    /// `None` when there are no results
    pub mean_duration: Option<Duration>,

    /// Elapsed time of the whole run, scheduling overhead included
    pub wall_time: Duration,

    pub results: Vec<TaskResult>,
}

impl ExecutionReport {
    pub fn from_results(
        run_id: impl Into<String>,
        concurrency: usize,
        results: Vec<TaskResult>,
        wall_time: Duration,
    ) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        let failed = results.len() - succeeded;
        let total_duration: Duration = results.iter().map(|r| r.duration).sum();
        let mean_duration = mean(total_duration, results.len());

        Self {
            run_id: run_id.into(),
            concurrency,
            total_tasks: results.len(),
            succeeded,
            failed,
            total_duration,
            mean_duration,
            wall_time,
            results,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &TaskResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

fn mean(total: Duration, count: usize) -> Option<Duration> {
    if count == 0 {
        return None;
    }
    let nanos = total.as_nanos() / count as u128;
    Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Task Execution Report =====")?;

        for (i, result) in self.results.iter().enumerate() {
            match &result.error {
                Some(err) => writeln!(
                    f,
                    "{}. {}: {:?} (error: {})",
                    i + 1,
                    result.task_name,
                    result.duration,
                    err
                )?,
                None => writeln!(f, "{}. {}: {:?}", i + 1, result.task_name, result.duration)?,
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} succeeded, {} failed, {} total",
            self.succeeded, self.failed, self.total_tasks
        )?;
        match self.mean_duration {
            Some(mean) => writeln!(
                f,
                "Task time: {:?} total, {:?} mean",
                self.total_duration, mean
            )?,
            None => writeln!(f, "Task time: {:?} total, n/a mean (no data)", self.total_duration)?,
        }
        write!(
            f,
            "Wall time: {:?} (concurrency {})",
            self.wall_time, self.concurrency
        )
    }
}
