use std::io::Write;
use std::sync::Arc;

use super::progress::Progress;
use super::report::ExecutionReport;
use super::traits::{RenderEvent, ReportRendererPlugin};
use super::types::{SchedulerOpts, TaskResult};

/// Emit run start line
pub fn emit_run_start(opts: &SchedulerOpts, run_id: &str, total_tasks: usize) {
    if !opts.quiet {
        println!(
            "🚀 Starting run {}: {} tasks on {} workers",
            run_id, total_tasks, opts.concurrency
        );
    }
}

/// Emit task complete line (verbose only)
pub fn emit_task_complete(opts: &SchedulerOpts, result: &TaskResult) {
    if opts.verbose && !opts.quiet {
        // Keep the live progress line from swallowing this one
        if !opts.progress_bar {
            println!();
        }
        match &result.error {
            None => println!(
                "  ✅ [worker {}] {}: {}ms",
                result.worker_id,
                result.task_name,
                result.duration_ms()
            ),
            Some(err) => println!(
                "  ❌ [worker {}] {}: {}ms ({})",
                result.worker_id,
                result.task_name,
                result.duration_ms(),
                err
            ),
        }
    }
}

/// Emit in-place progress line; the progress bar replaces it when enabled
pub fn emit_progress_update(opts: &SchedulerOpts, progress: &Progress) {
    if opts.quiet || opts.progress_bar {
        return;
    }

    print!(
        "\r📊 Progress: {:.2}% ({}/{})",
        progress.percent(),
        progress.completed,
        progress.total
    );
    let _ = std::io::stdout().flush();
}

/// Emit run end line
pub fn emit_run_end(opts: &SchedulerOpts, report: &ExecutionReport) {
    if !opts.quiet {
        let icon = if report.all_succeeded() { "✅" } else { "❌" };
        println!(
            "\n{} All tasks finished: {}/{} succeeded in {:?}",
            icon, report.succeeded, report.total_tasks, report.wall_time
        );
    }
}

/// Routes run events to the injected renderer, or to the default text output.
#[derive(Clone)]
pub(crate) struct Emitter {
    run_id: String,
    opts: SchedulerOpts,
    renderer: Option<Arc<dyn ReportRendererPlugin>>,
}

impl Emitter {
    pub(crate) fn new(
        run_id: String,
        opts: SchedulerOpts,
        renderer: Option<Arc<dyn ReportRendererPlugin>>,
    ) -> Self {
        Self {
            run_id,
            opts,
            renderer,
        }
    }

    pub(crate) fn run_start(&self, total_tasks: usize) {
        if let Some(renderer) = &self.renderer {
            renderer.render(&RenderEvent::RunStart {
                run_id: self.run_id.clone(),
                total_tasks,
                concurrency: self.opts.concurrency,
            });
        } else {
            emit_run_start(&self.opts, &self.run_id, total_tasks);
        }
    }

    pub(crate) fn task_complete(&self, result: &TaskResult) {
        if let Some(renderer) = &self.renderer {
            renderer.render(&RenderEvent::TaskComplete {
                run_id: self.run_id.clone(),
                result: result.clone(),
            });
        } else {
            emit_task_complete(&self.opts, result);
        }
    }

    pub(crate) fn progress(&self, progress: &Progress) {
        if let Some(renderer) = &self.renderer {
            renderer.render(&RenderEvent::Progress {
                run_id: self.run_id.clone(),
                completed: progress.completed,
                total: progress.total,
                percent: progress.percent(),
            });
        } else {
            emit_progress_update(&self.opts, progress);
        }
    }

    pub(crate) fn run_end(&self, report: &ExecutionReport) {
        if let Some(renderer) = &self.renderer {
            renderer.render(&RenderEvent::RunEnd {
                run_id: self.run_id.clone(),
                report: report.clone(),
            });
        } else {
            emit_run_end(&self.opts, report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl ReportRendererPlugin for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn format(&self) -> &str {
            "test"
        }

        fn render(&self, event: &RenderEvent) {
            let tag = match event {
                RenderEvent::RunStart { .. } => "start",
                RenderEvent::TaskComplete { .. } => "task",
                RenderEvent::Progress { .. } => "progress",
                RenderEvent::RunEnd { .. } => "end",
            };
            self.events.lock().unwrap().push(tag.to_string());
        }
    }

    #[test]
    fn test_emitter_prefers_renderer() {
        let recorder = Arc::new(Recorder::default());
        let emitter = Emitter::new(
            "run".to_string(),
            SchedulerOpts::new(2),
            Some(recorder.clone()),
        );

        emitter.run_start(1);
        emitter.progress(&Progress {
            completed: 1,
            total: 1,
        });
        emitter.run_end(&ExecutionReport::from_results(
            "run",
            2,
            Vec::new(),
            Duration::ZERO,
        ));

        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec!["start", "progress", "end"]
        );
    }
}
