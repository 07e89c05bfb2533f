use std::time::Duration;

use crate::config::SchedulerConfig;

use super::error::SchedulerError;

/// Result conduit capacity used when nothing else is configured.
pub const DEFAULT_RESULT_BUFFER: usize = 100;

/// Runtime options for a `Scheduler`.
#[derive(Debug, Clone)]
pub struct SchedulerOpts {
    /// Number of workers (concurrency degree), at least 1
    pub concurrency: usize,

    /// Capacity of the result conduit, independent of the task count
    pub result_buffer: usize,

    /// Optional per-task execution limit. `None` lets a task run forever.
    pub task_timeout: Option<Duration>,

    /// Enable visual progress bar
    pub progress_bar: bool,

    /// Print per-task lines in the default text output
    pub verbose: bool,

    /// Suppress default text output (renderers are unaffected)
    pub quiet: bool,
}

impl SchedulerOpts {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency,
            ..Self::default()
        }
    }

    /// Build options from the `[scheduler]` config section.
    pub fn from_config(cfg: &SchedulerConfig) -> Self {
        // jsonl output must stay machine-readable, so no progress bar there
        let progress_bar = cfg.progress_bar && cfg.stream_format != "jsonl";

        Self {
            concurrency: cfg.concurrency,
            result_buffer: cfg.result_buffer,
            task_timeout: cfg.task_timeout_ms.map(Duration::from_millis),
            progress_bar,
            verbose: cfg.verbose,
            quiet: false,
        }
    }

    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.concurrency == 0 {
            return Err(SchedulerError::InvalidConcurrency(self.concurrency));
        }
        if self.result_buffer == 0 {
            return Err(SchedulerError::InvalidResultBuffer);
        }
        Ok(())
    }
}

impl Default for SchedulerOpts {
    fn default() -> Self {
        Self {
            concurrency: num_cpus::get().max(1),
            result_buffer: DEFAULT_RESULT_BUFFER,
            task_timeout: None,
            progress_bar: false,
            verbose: false,
            quiet: true,
        }
    }
}
