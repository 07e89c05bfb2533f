use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{mpsc, oneshot};

use super::output::Emitter;
use super::progress::{Progress, ProgressMonitor};
use super::types::TaskResult;

#[derive(Debug, Default)]
struct AggregateState {
    results: Vec<TaskResult>,
    completed: usize,
    total: usize,
}

/// Results and completion count of the current run.
///
/// Only the aggregator writes; everyone else gets copies, so `results` and
/// `completed` are always observed as a consistent pair.
#[derive(Debug, Clone, Default)]
pub(crate) struct Aggregate {
    inner: Arc<Mutex<AggregateState>>,
}

impl Aggregate {
    fn lock(&self) -> MutexGuard<'_, AggregateState> {
        // A poisoned lock still holds valid results; keep them
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn reset(&self, total: usize) {
        let mut state = self.lock();
        state.results = Vec::with_capacity(total);
        state.completed = 0;
        state.total = total;
    }

    fn record(&self, result: TaskResult) -> Progress {
        let mut state = self.lock();
        state.results.push(result);
        state.completed += 1;
        debug_assert!(state.completed <= state.total);
        Progress {
            completed: state.completed,
            total: state.total,
        }
    }

    pub(crate) fn progress(&self) -> Progress {
        let state = self.lock();
        Progress {
            completed: state.completed,
            total: state.total,
        }
    }

    pub(crate) fn results(&self) -> Vec<TaskResult> {
        self.lock().results.clone()
    }
}

/// Spawn the single consumer of the result conduit.
///
/// The returned receiver fires once the conduit is closed and every result
/// has been recorded.
pub(crate) fn spawn_aggregator(
    mut result_rx: mpsc::Receiver<TaskResult>,
    aggregate: Aggregate,
    emitter: Emitter,
    monitor: ProgressMonitor,
) -> oneshot::Receiver<()> {
    let (done_tx, done_rx) = oneshot::channel();

    tokio::spawn(async move {
        let mut all_success = true;

        while let Some(result) = result_rx.recv().await {
            all_success &= result.success;
            emitter.task_complete(&result);
            monitor.complete_task(&result.task_name, result.success, result.duration_ms());

            let progress = aggregate.record(result);
            emitter.progress(&progress);
        }

        monitor.finish(all_success);
        tracing::debug!("result conduit drained");
        let _ = done_tx.send(());
    });

    done_rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::traits::{RenderEvent, ReportRendererPlugin};
    use crate::executor::types::{SchedulerOpts, TaskRun};
    use chrono::Local;
    use std::time::Duration;

    fn result(i: usize) -> TaskResult {
        let now = Local::now();
        TaskResult::from_outcome(
            TaskRun {
                task_name: format!("t{i}"),
                task_index: i,
                worker_id: 1,
                started_at: now,
                finished_at: now,
                duration: Duration::from_millis(1),
            },
            Ok(()),
        )
    }

    #[tokio::test]
    async fn test_aggregator_drains_then_signals() {
        let aggregate = Aggregate::default();
        aggregate.reset(5);

        let (tx, rx) = mpsc::channel(2);
        let emitter = Emitter::new("run".to_string(), SchedulerOpts::new(1), None);
        let done = spawn_aggregator(rx, aggregate.clone(), emitter, ProgressMonitor::new(5, false));

        for i in 0..5 {
            tx.send(result(i)).await.unwrap();
        }
        drop(tx);
        done.await.unwrap();

        assert_eq!(
            aggregate.progress(),
            Progress {
                completed: 5,
                total: 5
            }
        );
        let names: Vec<String> = aggregate.results().into_iter().map(|r| r.task_name).collect();
        assert_eq!(names, vec!["t0", "t1", "t2", "t3", "t4"]);
    }

    /// Keeps `(completed, total)` of every progress event, in arrival order.
    #[derive(Default)]
    struct ProgressLog {
        seen: Mutex<Vec<(usize, usize)>>,
    }

    impl ReportRendererPlugin for ProgressLog {
        fn name(&self) -> &str {
            "progress-log"
        }

        fn format(&self) -> &str {
            "test"
        }

        fn render(&self, event: &RenderEvent) {
            if let RenderEvent::Progress {
                completed, total, ..
            } = event
            {
                self.seen.lock().unwrap().push((*completed, *total));
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_progress_events_count_up_in_order() {
        let total = 50;
        let aggregate = Aggregate::default();
        aggregate.reset(total);

        let log = Arc::new(ProgressLog::default());
        let emitter = Emitter::new("run".to_string(), SchedulerOpts::new(4), Some(log.clone()));
        let (tx, rx) = mpsc::channel(4);
        let done = spawn_aggregator(rx, aggregate.clone(), emitter, ProgressMonitor::new(total, false));

        let senders: Vec<_> = (0..5)
            .map(|p| {
                let tx = tx.clone();
                tokio::spawn(async move {
                    for i in 0..10 {
                        tx.send(result(p * 10 + i)).await.unwrap();
                    }
                })
            })
            .collect();
        drop(tx);
        for sender in senders {
            sender.await.unwrap();
        }
        done.await.unwrap();

        let expected: Vec<(usize, usize)> = (1..=total).map(|c| (c, total)).collect();
        assert_eq!(*log.seen.lock().unwrap(), expected);
    }

    #[test]
    fn test_reset_clears_previous_state() {
        let aggregate = Aggregate::default();
        aggregate.reset(1);
        aggregate.record(result(0));
        aggregate.reset(3);

        assert!(aggregate.results().is_empty());
        assert_eq!(aggregate.progress().completed, 0);
        assert_eq!(aggregate.progress().total, 3);
    }
}
