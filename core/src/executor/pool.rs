use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use futures::FutureExt;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use super::types::{SharedTask, TaskError, TaskResult, TaskRun};

/// A task on the task conduit, tagged with its submission position.
#[derive(Clone)]
pub(crate) struct QueuedTask {
    pub index: usize,
    pub task: SharedTask,
}

/// Read side of the task conduit, shared by every worker.
pub(crate) type TaskReceiver = Arc<Mutex<mpsc::Receiver<QueuedTask>>>;

/// Start exactly `concurrency` workers draining `task_rx`.
///
/// Each handle resolves to the number of tasks that worker executed, once the
/// task conduit is closed and empty.
pub(crate) fn spawn_workers(
    concurrency: usize,
    task_rx: TaskReceiver,
    result_tx: mpsc::Sender<TaskResult>,
    task_timeout: Option<Duration>,
) -> Vec<JoinHandle<usize>> {
    (1..=concurrency)
        .map(|worker_id| {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            tokio::spawn(run_worker(worker_id, task_rx, result_tx, task_timeout))
        })
        .collect()
}

async fn run_worker(
    worker_id: usize,
    task_rx: TaskReceiver,
    result_tx: mpsc::Sender<TaskResult>,
    task_timeout: Option<Duration>,
) -> usize {
    let mut executed = 0;

    loop {
        // Only the receive is serialized; execution happens with the lock released
        let next = task_rx.lock().await.recv().await;
        let Some(queued) = next else {
            break;
        };

        let result = execute_task(worker_id, queued, task_timeout).await;
        if !result.success {
            tracing::warn!(
                worker_id,
                task = %result.task_name,
                error = result.error.as_deref().unwrap_or_default(),
                "task failed"
            );
        }

        if result_tx.send(result).await.is_err() {
            tracing::error!(worker_id, "result conduit closed while workers were running");
            break;
        }
        executed += 1;
    }

    tracing::debug!(worker_id, executed, "worker finished");
    executed
}

/// Run one task, timing it and converting panics and timeouts into failures.
pub(crate) async fn execute_task(
    worker_id: usize,
    queued: QueuedTask,
    task_timeout: Option<Duration>,
) -> TaskResult {
    let QueuedTask { index, task } = queued;
    tracing::debug!(worker_id, task = task.name(), index, "task started");

    let started_at = Local::now();
    let clock = Instant::now();

    // The call sits inside the guarded future so a panic raised before
    // `execute` hands back its future is caught too
    let guarded = AssertUnwindSafe(async { task.execute().await }).catch_unwind();
    let outcome = match task_timeout {
        Some(limit) => match tokio::time::timeout(limit, guarded).await {
            Ok(caught) => flatten(caught),
            Err(_) => Err(TaskError::TimedOut(limit)),
        },
        None => flatten(guarded.await),
    };

    let duration = clock.elapsed();
    let finished_at = Local::now();

    TaskResult::from_outcome(
        TaskRun {
            task_name: task.name().to_string(),
            task_index: index,
            worker_id,
            started_at,
            finished_at,
            duration,
        },
        outcome,
    )
}

fn flatten(
    caught: Result<Result<(), TaskError>, Box<dyn std::any::Any + Send>>,
) -> Result<(), TaskError> {
    caught.unwrap_or_else(|payload| Err(TaskError::from_panic(payload)))
}
