use std::path::PathBuf;

use thiserror::Error;

use super::scheduler::SchedulerError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
    #[error("batch error: {0}")]
    Batch(String),
    #[error("command failed: {0}")]
    Command(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot determine home directory")]
    NoHomeDir,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value for {var}: '{value}'")]
    Env { var: String, value: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}
