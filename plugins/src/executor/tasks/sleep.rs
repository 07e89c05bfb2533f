use std::time::Duration;

use async_trait::async_trait;
use taskpool_core::executor::types::{Task, TaskError};

/// Simulates work by sleeping for a fixed duration; always succeeds.
#[derive(Debug, Clone)]
pub struct SleepTask {
    name: String,
    duration: Duration,
}

impl SleepTask {
    pub fn new(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

#[async_trait]
impl Task for SleepTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self) -> Result<(), TaskError> {
        tokio::time::sleep(self.duration).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_sleep_task_waits() {
        let task = SleepTask::new("nap", Duration::from_millis(15));
        let started = Instant::now();
        task.execute().await.unwrap();
        assert!(started.elapsed() >= task.duration());
        assert_eq!(task.name(), "nap");
    }
}
