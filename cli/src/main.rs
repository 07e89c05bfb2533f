use clap::Parser;
mod app;
mod commands;
use commands::cli;
use taskpool_core::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, error::CliError> {
    let args = cli::Args::parse();
    let cfg = match args.config.as_deref() {
        Some(path) => taskpool_core::config::load_from_path(path)?,
        None => taskpool_core::config::load_default()?,
    };
    init_tracing(&cfg.logging).map_err(error::CliError::Command)?;

    match args.command {
        cli::Commands::Demo(demo_args) => app::run_demo(cfg, demo_args).await,
        cli::Commands::Run(run_args) => app::run_file(cfg, run_args).await,
    }
}

fn exit_code_for_error(e: &error::CliError) -> i32 {
    // 0: success
    // 1: batch finished with failed tasks (returned as a normal exit code)
    // 11: config error
    // 20: IO / batch file error
    // 30: scheduler misuse
    // 50: internal/uncategorized
    match e {
        error::CliError::Config(_) => 11,
        error::CliError::Scheduler(se) if se.is_misuse() => 30,
        error::CliError::Scheduler(_) => 50,
        error::CliError::Batch(_) => 20,
        error::CliError::Io(_) => 20,
        error::CliError::Command(_) => 20,
        error::CliError::Anyhow(_) => 50,
    }
}

fn init_tracing(logging: &taskpool_core::config::LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("taskpool"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("taskpool.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
