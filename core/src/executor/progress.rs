use indicatif::{ProgressBar, ProgressStyle};

/// Snapshot of aggregation progress after one more result was recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }
}

/// Visual progress bar for a run.
///
/// Owned by the aggregator, so it is only ever touched from one task.
pub struct ProgressMonitor {
    overall: ProgressBar,
    enabled: bool,
}

impl ProgressMonitor {
    /// Create a new progress monitor
    ///
    /// # Arguments
    ///
    /// * `total_tasks` - Total number of tasks to execute
    /// * `enabled` - Whether to enable visual progress (disabled for jsonl output)
    pub fn new(total_tasks: usize, enabled: bool) -> Self {
        if !enabled {
            return Self {
                overall: ProgressBar::hidden(),
                enabled: false,
            };
        }

        let overall = ProgressBar::new(total_tasks as u64);
        match ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} tasks ({percent}%) {msg}")
        {
            Ok(style) => overall.set_style(style.progress_chars("█▓▒░  ")),
            Err(e) => tracing::debug!("progress template rejected: {}", e),
        }
        overall.set_message("Starting...");

        Self {
            overall,
            enabled: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Mark a task as completed
    pub fn complete_task(&self, task_name: &str, success: bool, duration_ms: u64) {
        if !self.enabled {
            return;
        }

        let icon = if success { "✅" } else { "❌" };
        self.overall
            .set_message(format!("{} {} ({}ms)", icon, task_name, duration_ms));
        self.overall.inc(1);
    }

    /// Finish overall progress
    pub fn finish(&self, success: bool) {
        if !self.enabled {
            return;
        }

        let msg = if success {
            "✅ All tasks completed"
        } else {
            "❌ Some tasks failed"
        };

        self.overall.finish_with_message(msg.to_string());
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        if self.enabled && !self.overall.is_finished() {
            self.overall.finish_and_clear();
        }
    }
}
