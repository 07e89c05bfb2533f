use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use taskpool_core::executor::traits::FaultPolicy;
use taskpool_core::executor::types::{Task, TaskError};

/// Sleeps like `SleepTask`, then asks its `FaultPolicy` whether to fail.
#[derive(Clone)]
pub struct FaultyTask {
    name: String,
    index: usize,
    duration: Duration,
    policy: Arc<dyn FaultPolicy>,
    message: String,
}

impl FaultyTask {
    pub fn new(
        name: impl Into<String>,
        index: usize,
        duration: Duration,
        policy: Arc<dyn FaultPolicy>,
    ) -> Self {
        Self {
            name: name.into(),
            index,
            duration,
            policy,
            message: "injected fault".to_string(),
        }
    }

    /// Override the failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl std::fmt::Debug for FaultyTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaultyTask")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("duration", &self.duration)
            .field("policy", &self.policy.name())
            .finish()
    }
}

#[async_trait]
impl Task for FaultyTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self) -> Result<(), TaskError> {
        tokio::time::sleep(self.duration).await;
        if self.policy.should_fail(self.index, &self.name) {
            tracing::debug!(task = %self.name, policy = self.policy.name(), "injecting fault");
            return Err(TaskError::failed(self.message.clone()));
        }
        Ok(())
    }
}
