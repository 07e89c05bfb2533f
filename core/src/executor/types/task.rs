use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;

use super::error::TaskError;

/// A named unit of work the scheduler can run.
///
/// The scheduler only ever borrows a task immutably; implementations that
/// need to track state across runs must use interior mutability.
#[async_trait]
pub trait Task: Send + Sync {
    /// Human-readable identifier, echoed back on the `TaskResult`.
    fn name(&self) -> &str;

    /// Run the task once. `Err` marks the task as failed.
    async fn execute(&self) -> Result<(), TaskError>;
}

/// Shared, type-erased handle the scheduler queues and hands to workers.
pub type SharedTask = Arc<dyn Task>;

type AsyncRun = Box<dyn Fn() -> BoxFuture<'static, Result<(), TaskError>> + Send + Sync>;
type BlockingRun = Arc<dyn Fn() -> Result<(), TaskError> + Send + Sync>;

enum FnRun {
    Async(AsyncRun),
    Blocking(BlockingRun),
}

/// Task composed of a name and a closure.
pub struct FnTask {
    name: String,
    run: FnRun,
}

impl FnTask {
    /// Wrap an async closure.
    pub fn new<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            run: FnRun::Async(Box::new(move || f().boxed())),
        }
    }

    /// Wrap a closure that blocks the calling thread.
    ///
    /// The closure runs on tokio's blocking pool so it never stalls the
    /// worker's runtime thread.
    pub fn blocking<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> Result<(), TaskError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            run: FnRun::Blocking(Arc::new(f)),
        }
    }
}

impl fmt::Debug for FnTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.run {
            FnRun::Async(_) => "async",
            FnRun::Blocking(_) => "blocking",
        };
        f.debug_struct("FnTask")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}

#[async_trait]
impl Task for FnTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self) -> Result<(), TaskError> {
        match &self.run {
            FnRun::Async(f) => f().await,
            FnRun::Blocking(f) => {
                let f = f.clone();
                match tokio::task::spawn_blocking(move || f()).await {
                    Ok(outcome) => outcome,
                    Err(e) if e.is_panic() => Err(TaskError::from_panic(e.into_panic())),
                    Err(e) => Err(TaskError::failed(e.to_string())),
                }
            }
        }
    }
}
