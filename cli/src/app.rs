//! CLI assembly: merge flag overrides into the config, build the task list
//! and scheduler, run it, and turn the report into an exit code.
use taskpool_core::api as core_api;
use taskpool_plugins::{factory, plan};

use crate::commands::cli::{DemoArgs, RunArgs, SchedulerArgs};

/// Flags win over config; config already carries env overrides.
pub fn apply_scheduler_args(cfg: &mut core_api::AppConfig, args: &SchedulerArgs) {
    let sched = &mut cfg.scheduler;
    if let Some(n) = args.concurrency {
        sched.concurrency = n;
    }
    if let Some(n) = args.result_buffer {
        sched.result_buffer = n;
    }
    if let Some(format) = &args.stream_format {
        sched.stream_format = format.clone();
    }
    if args.timeout_ms.is_some() {
        sched.task_timeout_ms = args.timeout_ms;
    }
    if args.no_progress {
        sched.progress_bar = false;
    }
    if args.verbose {
        sched.verbose = true;
    }
}

fn apply_demo_args(cfg: &mut core_api::AppConfig, args: &DemoArgs) {
    let demo = &mut cfg.demo;
    if let Some(n) = args.simple {
        demo.simple_tasks = n;
    }
    if let Some(n) = args.faulty {
        demo.faulty_tasks = n;
    }
    if let Some(n) = args.fail_every {
        demo.fail_every = n;
    }
    if let Some(ms) = args.unit_ms {
        demo.simple_unit_ms = ms;
    }
}

#[tracing::instrument(name = "cli.demo", skip_all)]
pub async fn run_demo(
    mut cfg: core_api::AppConfig,
    args: DemoArgs,
) -> Result<i32, core_api::CliError> {
    apply_scheduler_args(&mut cfg, &args.scheduler);
    apply_demo_args(&mut cfg, &args);
    cfg.validate()?;

    let policy = factory::build_fault_policy(Some(cfg.demo.fail_every), &args.fail_at);
    tracing::info!(
        simple = cfg.demo.simple_tasks,
        faulty = cfg.demo.faulty_tasks,
        policy = policy.name(),
        "building demo batch"
    );
    let tasks = plan::demo_tasks(&cfg.demo, policy);
    execute(&cfg.scheduler, tasks).await
}

#[tracing::instrument(name = "cli.run", skip_all, fields(file = %args.file.display()))]
pub async fn run_file(
    mut cfg: core_api::AppConfig,
    args: RunArgs,
) -> Result<i32, core_api::CliError> {
    apply_scheduler_args(&mut cfg, &args.scheduler);
    cfg.validate()?;

    let batch = plan::BatchFile::load(&args.file)
        .map_err(|e| core_api::CliError::Batch(format!("{e:#}")))?;
    tracing::info!(tasks = batch.tasks.len(), "loaded batch file");
    execute(&cfg.scheduler, batch.into_tasks()).await
}

async fn execute(
    cfg: &core_api::SchedulerConfig,
    tasks: Vec<core_api::SharedTask>,
) -> Result<i32, core_api::CliError> {
    let (scheduler, has_renderer) = factory::build_scheduler(cfg)?;
    scheduler.add_tasks(tasks)?;

    let report = scheduler.run().await?;
    // Renderers print their own run.end; otherwise show the report here.
    if !has_renderer {
        println!("{report}");
    }

    Ok(if report.all_succeeded() { 0 } else { 1 })
}
