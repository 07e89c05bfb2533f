use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub demo: DemoConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "scheduler.concurrency must be at least 1".to_string(),
            ));
        }
        if self.scheduler.result_buffer == 0 {
            return Err(ConfigError::Invalid(
                "scheduler.result_buffer must be at least 1".to_string(),
            ));
        }
        if !matches!(self.scheduler.stream_format.as_str(), "text" | "jsonl") {
            return Err(ConfigError::Invalid(format!(
                "scheduler.stream_format must be 'text' or 'jsonl' (got '{}')",
                self.scheduler.stream_format
            )));
        }
        if self.demo.fail_every == 0 {
            return Err(ConfigError::Invalid(
                "demo.fail_every must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "taskpool_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Worker count. Defaults to the number of logical CPUs.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default = "default_result_buffer")]
    pub result_buffer: usize,

    /// Per-task limit in milliseconds; unset means no limit.
    #[serde(default)]
    pub task_timeout_ms: Option<u64>,

    #[serde(default = "default_progress_bar")]
    pub progress_bar: bool,

    #[serde(default)]
    pub verbose: bool,

    /// Output stream format: "text" or "jsonl"
    #[serde(default = "default_stream_format")]
    pub stream_format: String,
}

fn default_concurrency() -> usize {
    num_cpus::get().max(1)
}

fn default_result_buffer() -> usize {
    crate::executor::DEFAULT_RESULT_BUFFER
}

fn default_progress_bar() -> bool {
    true
}

fn default_stream_format() -> String {
    "text".to_string()
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            result_buffer: default_result_buffer(),
            task_timeout_ms: None,
            progress_bar: default_progress_bar(),
            verbose: false,
            stream_format: default_stream_format(),
        }
    }
}

/// Shape of the built-in demo batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_simple_tasks")]
    pub simple_tasks: usize,

    #[serde(default = "default_faulty_tasks")]
    pub faulty_tasks: usize,

    /// Simple task `i` sleeps `i * simple_unit_ms`.
    #[serde(default = "default_simple_unit_ms")]
    pub simple_unit_ms: u64,

    /// Faulty task `i` sleeps `i * faulty_unit_ms`.
    #[serde(default = "default_faulty_unit_ms")]
    pub faulty_unit_ms: u64,

    /// Faulty task `i` fails when `i % fail_every == 0`.
    #[serde(default = "default_fail_every")]
    pub fail_every: usize,
}

fn default_simple_tasks() -> usize {
    10
}

fn default_faulty_tasks() -> usize {
    5
}

fn default_simple_unit_ms() -> u64 {
    100
}

fn default_faulty_unit_ms() -> u64 {
    150
}

fn default_fail_every() -> usize {
    5
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            simple_tasks: default_simple_tasks(),
            faulty_tasks: default_faulty_tasks(),
            simple_unit_ms: default_simple_unit_ms(),
            faulty_unit_ms: default_faulty_unit_ms(),
            fail_every: default_fail_every(),
        }
    }
}
