use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::Instrument;
use uuid::Uuid;

use super::aggregator::{spawn_aggregator, Aggregate};
use super::output::Emitter;
use super::pool::{spawn_workers, QueuedTask};
use super::progress::{Progress, ProgressMonitor};
use super::report::ExecutionReport;
use super::state::{SchedulerState, StateTransition};
use super::traits::ReportRendererPlugin;
use super::types::{SchedulerError, SchedulerOpts, SharedTask, Task, TaskResult};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Bounded worker-pool scheduler.
///
/// Tasks are added while the scheduler is `Idle`; a single `run` call then
/// executes all of them on exactly `concurrency` workers and freezes the
/// results. Every instance is independent, there is no global state.
pub struct Scheduler {
    inner: Arc<Shared>,
}

/// State reachable from the detached run task.
struct Shared {
    opts: SchedulerOpts,
    renderer: Option<Arc<dyn ReportRendererPlugin>>,
    tasks: Mutex<Vec<SharedTask>>,
    state: Mutex<SchedulerState>,
    aggregate: Aggregate,
    report: Mutex<Option<ExecutionReport>>,
}

pub struct SchedulerBuilder {
    opts: SchedulerOpts,
    renderer: Option<Arc<dyn ReportRendererPlugin>>,
}

impl Scheduler {
    /// Create a scheduler with `concurrency` workers and default options.
    pub fn new(concurrency: usize) -> Result<Self, SchedulerError> {
        Self::with_opts(SchedulerOpts::new(concurrency))
    }

    pub fn with_opts(opts: SchedulerOpts) -> Result<Self, SchedulerError> {
        Self::builder().opts(opts).build()
    }

    pub fn builder() -> SchedulerBuilder {
        SchedulerBuilder::new()
    }

    pub fn concurrency(&self) -> usize {
        self.inner.opts.concurrency
    }

    pub fn opts(&self) -> &SchedulerOpts {
        &self.inner.opts
    }

    pub fn state(&self) -> SchedulerState {
        *lock(&self.inner.state)
    }

    pub fn task_count(&self) -> usize {
        lock(&self.inner.tasks).len()
    }

    /// Live `completed/total` counters of the current (or last) run.
    pub fn progress(&self) -> Progress {
        self.inner.aggregate.progress()
    }

    /// Queue a task. Fails once `run` has started.
    pub fn add_task(&self, task: SharedTask) -> Result<(), SchedulerError> {
        let state = lock(&self.inner.state);
        if *state != SchedulerState::Idle {
            return Err(SchedulerError::TasksFrozen(task.name().to_string()));
        }
        lock(&self.inner.tasks).push(task);
        Ok(())
    }

    pub fn add<T: Task + 'static>(&self, task: T) -> Result<(), SchedulerError> {
        self.add_task(Arc::new(task))
    }

    pub fn add_tasks<I>(&self, tasks: I) -> Result<(), SchedulerError>
    where
        I: IntoIterator<Item = SharedTask>,
    {
        tasks.into_iter().try_for_each(|task| self.add_task(task))
    }

    /// Execute every queued task and wait until all results are collected.
    ///
    /// Task failures are recorded on the results and never surface here;
    /// the error path is reserved for misuse (running twice, concurrently)
    /// and broken workers.
    ///
    /// The run itself is a spawned task. Dropping this future (a caller-side
    /// timeout, a losing `select!` branch) stops the waiting, not the run:
    /// it still reaches `Done` and `results`/`report` become readable.
    #[tracing::instrument(name = "scheduler.run", skip(self), fields(concurrency = self.inner.opts.concurrency))]
    pub async fn run(&self) -> Result<ExecutionReport, SchedulerError> {
        let tasks = self.inner.begin()?;
        let shared = Arc::clone(&self.inner);

        tokio::spawn(async move { shared.execute(tasks).await }.in_current_span())
            .await
            .map_err(|e| SchedulerError::Worker(format!("run task failed: {e}")))?
    }

    /// Final report; available once `run` has completed.
    pub fn report(&self) -> Result<ExecutionReport, SchedulerError> {
        self.ensure_done()?;
        lock(&self.inner.report)
            .clone()
            .ok_or(SchedulerError::NotFinished(SchedulerState::Done))
    }

    /// Write the text report to stdout.
    pub fn print_report(&self) -> Result<(), SchedulerError> {
        let report = self.report()?;
        println!("\n{}", report);
        Ok(())
    }

    /// Results in completion order; available once `run` has completed.
    pub fn results(&self) -> Result<Vec<TaskResult>, SchedulerError> {
        self.ensure_done()?;
        Ok(self.inner.aggregate.results())
    }

    fn ensure_done(&self) -> Result<(), SchedulerError> {
        match self.state() {
            SchedulerState::Done => Ok(()),
            other => Err(SchedulerError::NotFinished(other)),
        }
    }
}

impl Shared {
    /// Idle -> Running, handing back a snapshot of the queued tasks.
    fn begin(&self) -> Result<Vec<SharedTask>, SchedulerError> {
        let mut state = lock(&self.state);
        StateTransition::validate(*state, SchedulerState::Running)?;
        *state = SchedulerState::Running;
        Ok(lock(&self.tasks).clone())
    }

    fn advance(&self, to: SchedulerState) -> Result<(), SchedulerError> {
        let mut state = lock(&self.state);
        StateTransition::validate(*state, to)?;
        tracing::debug!(from = ?*state, to = ?to, "scheduler state changed");
        *state = to;
        Ok(())
    }

    async fn execute(&self, tasks: Vec<SharedTask>) -> Result<ExecutionReport, SchedulerError> {
        let total = tasks.len();
        let concurrency = self.opts.concurrency;
        let run_id = Uuid::new_v4().to_string();
        let started = Instant::now();

        tracing::info!(run_id = %run_id, total, concurrency, "run started");
        self.aggregate.reset(total);

        let emitter = Emitter::new(run_id.clone(), self.opts.clone(), self.renderer.clone());
        emitter.run_start(total);

        // Capacity >= total, so queuing below never waits on a worker
        let (task_tx, task_rx) = mpsc::channel::<QueuedTask>(total.max(1));
        let (result_tx, result_rx) = mpsc::channel::<TaskResult>(self.opts.result_buffer);

        let monitor = ProgressMonitor::new(total, self.opts.progress_bar && !self.opts.quiet);
        let done = spawn_aggregator(result_rx, self.aggregate.clone(), emitter.clone(), monitor);
        let workers = spawn_workers(
            concurrency,
            Arc::new(tokio::sync::Mutex::new(task_rx)),
            result_tx.clone(),
            self.opts.task_timeout,
        );

        let mut failure: Option<SchedulerError> = None;

        for (index, task) in tasks.into_iter().enumerate() {
            if task_tx.send(QueuedTask { index, task }).await.is_err() {
                failure = Some(SchedulerError::Worker(
                    "task conduit closed before every task was queued".to_string(),
                ));
                break;
            }
        }
        drop(task_tx);
        self.advance(SchedulerState::Draining)?;

        for (i, handle) in workers.into_iter().enumerate() {
            match handle.await {
                Ok(executed) => tracing::trace!(worker_id = i + 1, executed, "worker joined"),
                Err(e) => {
                    tracing::error!(worker_id = i + 1, "worker failed: {}", e);
                    failure.get_or_insert(SchedulerError::Worker(e.to_string()));
                }
            }
        }
        self.advance(SchedulerState::Collecting)?;

        // Workers held the other senders; this closes the result conduit
        drop(result_tx);
        if done.await.is_err() {
            failure.get_or_insert(SchedulerError::Aggregator(
                "aggregator stopped without signalling completion".to_string(),
            ));
        }

        let report = ExecutionReport::from_results(
            run_id,
            concurrency,
            self.aggregate.results(),
            started.elapsed(),
        );
        *lock(&self.report) = Some(report.clone());
        self.advance(SchedulerState::Done)?;

        emitter.run_end(&report);
        tracing::info!(
            run_id = %report.run_id,
            succeeded = report.succeeded,
            failed = report.failed,
            wall_time_ms = duration_ms(report.wall_time),
            "run finished"
        );

        match failure {
            Some(err) => Err(err),
            None => Ok(report),
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    d.as_millis() as u64
}

impl SchedulerBuilder {
    pub fn new() -> Self {
        Self {
            opts: SchedulerOpts::default(),
            renderer: None,
        }
    }

    pub fn opts(mut self, opts: SchedulerOpts) -> Self {
        self.opts = opts;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.opts.concurrency = concurrency;
        self
    }

    pub fn result_buffer(mut self, capacity: usize) -> Self {
        self.opts.result_buffer = capacity;
        self
    }

    pub fn task_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.opts.task_timeout = timeout;
        self
    }

    pub fn progress_bar(mut self, enabled: bool) -> Self {
        self.opts.progress_bar = enabled;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.opts.quiet = quiet;
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn ReportRendererPlugin>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn build(self) -> Result<Scheduler, SchedulerError> {
        self.opts.validate()?;
        Ok(Scheduler {
            inner: Arc::new(Shared {
                opts: self.opts,
                renderer: self.renderer,
                tasks: Mutex::new(Vec::new()),
                state: Mutex::new(SchedulerState::Idle),
                aggregate: Aggregate::default(),
                report: Mutex::new(None),
            }),
        })
    }
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::types::{FnTask, TaskError};

    #[test]
    fn test_new_rejects_zero_concurrency() {
        assert!(matches!(
            Scheduler::new(0),
            Err(SchedulerError::InvalidConcurrency(0))
        ));
    }

    #[tokio::test]
    async fn test_run_collects_failures_without_aborting() {
        let scheduler = Scheduler::new(2).unwrap();
        scheduler
            .add(FnTask::new("good", || async { Ok(()) }))
            .unwrap();
        scheduler
            .add(FnTask::new("bad", || async { Err(TaskError::failed("nope")) }))
            .unwrap();
        scheduler
            .add(FnTask::new("also-good", || async { Ok(()) }))
            .unwrap();

        let report = scheduler.run().await.unwrap();
        assert_eq!((report.succeeded, report.failed), (2, 1));
        assert_eq!(scheduler.state(), SchedulerState::Done);
        assert_eq!(scheduler.results().unwrap().len(), 3);
        assert_eq!(scheduler.report().unwrap().run_id, report.run_id);
    }

    #[tokio::test]
    async fn test_results_before_run() {
        let scheduler = Scheduler::new(1).unwrap();
        assert!(matches!(
            scheduler.results(),
            Err(SchedulerError::NotFinished(SchedulerState::Idle))
        ));
        assert!(scheduler.report().is_err());
        assert!(scheduler.print_report().is_err());
    }

    #[tokio::test]
    async fn test_dropped_run_future_still_reaches_done() {
        let scheduler = Scheduler::new(1).unwrap();
        scheduler
            .add(FnTask::new("slow", || async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            }))
            .unwrap();

        let waited = tokio::time::timeout(Duration::from_millis(20), scheduler.run()).await;
        assert!(waited.is_err());
        assert!(scheduler.state().is_active());

        let deadline = Instant::now() + Duration::from_secs(5);
        while scheduler.state() != SchedulerState::Done && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(scheduler.state(), SchedulerState::Done);
        assert_eq!(scheduler.results().unwrap().len(), 1);
        assert_eq!(scheduler.report().unwrap().succeeded, 1);
        assert!(matches!(
            scheduler.run().await,
            Err(SchedulerError::AlreadyCompleted)
        ));
    }

    #[test]
    fn test_builder_overrides() {
        let scheduler = Scheduler::builder()
            .concurrency(4)
            .result_buffer(8)
            .task_timeout(Some(Duration::from_secs(1)))
            .quiet(true)
            .build()
            .unwrap();
        assert_eq!(scheduler.concurrency(), 4);
        assert_eq!(scheduler.opts().result_buffer, 8);
        assert_eq!(scheduler.task_count(), 0);
    }
}
