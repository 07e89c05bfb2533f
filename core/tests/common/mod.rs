#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use taskpool_core::api::{SharedTask, Task, TaskError};

/// Sleeps for `delay`, then succeeds or fails as configured.
pub struct DelayTask {
    pub name: String,
    pub delay: Duration,
    pub fail: bool,
}

#[async_trait]
impl Task for DelayTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self) -> Result<(), TaskError> {
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(TaskError::failed(format!("{} failed on purpose", self.name)));
        }
        Ok(())
    }
}

pub fn delay_task(name: impl Into<String>, delay: Duration) -> SharedTask {
    Arc::new(DelayTask {
        name: name.into(),
        delay,
        fail: false,
    })
}

pub fn failing_task(name: impl Into<String>) -> SharedTask {
    Arc::new(DelayTask {
        name: name.into(),
        delay: Duration::ZERO,
        fail: true,
    })
}

/// Tracks how many tasks run at the same time, across all tasks sharing it.
#[derive(Default)]
pub struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub struct GaugedTask {
    pub name: String,
    pub delay: Duration,
    pub gauge: Arc<InFlight>,
}

#[async_trait]
impl Task for GaugedTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self) -> Result<(), TaskError> {
        let now = self.gauge.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.gauge.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.gauge.current.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("taskpool_core=debug")
        .with_test_writer()
        .try_init();
}
