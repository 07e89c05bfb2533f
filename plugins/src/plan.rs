//! Planner: turns the demo settings or a batch file into the task list handed
//! to the scheduler.
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use serde::Deserialize;
use taskpool_core::config::DemoConfig;
use taskpool_core::executor::traits::FaultPolicy;
use taskpool_core::executor::SharedTask;

use crate::executor::{AlwaysFaultPlugin, FaultyTask, SleepTask};

/// TOML batch file:
///
/// ```toml
/// [[task]]
/// name = "fetch"
/// duration_ms = 120
///
/// [[task]]
/// name = "flaky"
/// duration_ms = 40
/// fail = true
/// message = "upstream returned 503"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BatchFile {
    #[serde(default, rename = "task")]
    pub tasks: Vec<BatchTaskSpec>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BatchTaskSpec {
    pub name: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub fail: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl BatchFile {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let batch: BatchFile = toml::from_str(s).context("invalid batch file")?;
        for (i, spec) in batch.tasks.iter().enumerate() {
            if spec.name.trim().is_empty() {
                bail!("task #{} has an empty name", i + 1);
            }
        }
        Ok(batch)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read batch file {}", path.display()))?;
        Self::parse(&s).with_context(|| format!("in {}", path.display()))
    }

    pub fn into_tasks(self) -> Vec<SharedTask> {
        let always: Arc<dyn FaultPolicy> = Arc::new(AlwaysFaultPlugin);
        self.tasks
            .into_iter()
            .enumerate()
            .map(|(index, spec)| {
                let duration = Duration::from_millis(spec.duration_ms);
                if spec.fail {
                    let mut task = FaultyTask::new(spec.name, index, duration, always.clone());
                    if let Some(message) = spec.message {
                        task = task.with_message(message);
                    }
                    Arc::new(task) as SharedTask
                } else {
                    Arc::new(SleepTask::new(spec.name, duration)) as SharedTask
                }
            })
            .collect()
    }
}

/// The showcase batch: `simple_tasks` sleeping tasks of increasing length,
/// then `faulty_tasks` tasks whose failures come from `policy`.
///
/// Numbering starts at 1, so with `fail_every = 5` and 5 faulty tasks only
/// the last one fails.
pub fn demo_tasks(cfg: &DemoConfig, policy: Arc<dyn FaultPolicy>) -> Vec<SharedTask> {
    let simple = (1..=cfg.simple_tasks).map(|i| {
        Arc::new(SleepTask::new(
            format!("simple-{}", i),
            Duration::from_millis(cfg.simple_unit_ms * i as u64),
        )) as SharedTask
    });

    let faulty = (1..=cfg.faulty_tasks).map(|i| {
        Arc::new(FaultyTask::new(
            format!("faulty-{}", i),
            i,
            Duration::from_millis(cfg.faulty_unit_ms * i as u64),
            policy.clone(),
        )) as SharedTask
    });

    simple.chain(faulty).collect()
}
