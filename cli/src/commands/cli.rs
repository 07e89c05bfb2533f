use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "taskpool", version, about = "Run task batches on a bounded worker pool")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of ~/.taskpool/config.toml / ./config.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Flags shared by every command that drives a scheduler.
/// Unset flags fall back to the `[scheduler]` config section.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SchedulerArgs {
    #[arg(long)]
    pub concurrency: Option<usize>,

    #[arg(long)]
    pub result_buffer: Option<usize>,

    #[arg(long, value_parser = ["text", "jsonl"])]
    pub stream_format: Option<String>,

    /// Per-task timeout; a task running longer is recorded as failed.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Print one line per finished task.
    #[arg(long, short, default_value_t = false)]
    pub verbose: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DemoArgs {
    #[command(flatten)]
    pub scheduler: SchedulerArgs,

    /// Number of sleeping tasks (task i sleeps i * unit).
    #[arg(long)]
    pub simple: Option<usize>,

    /// Number of fault-injecting tasks.
    #[arg(long)]
    pub faulty: Option<usize>,

    /// Faulty task i fails when i is a multiple of this.
    #[arg(long)]
    pub fail_every: Option<usize>,

    /// Explicit faulty task indices to fail; overrides --fail-every.
    #[arg(long, value_delimiter = ',')]
    pub fail_at: Vec<usize>,

    /// Sleep unit of the simple tasks, in milliseconds.
    #[arg(long)]
    pub unit_ms: Option<u64>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    /// TOML batch file with `[[task]]` entries.
    pub file: PathBuf,

    #[command(flatten)]
    pub scheduler: SchedulerArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the built-in showcase batch.
    Demo(DemoArgs),
    /// Run a batch file.
    Run(RunArgs),
}
