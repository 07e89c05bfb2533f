use crate::executor::report::ExecutionReport;
use crate::executor::types::TaskResult;

/// Output renderer plugin (controls how run events are shown).
pub trait ReportRendererPlugin: Send + Sync {
    fn name(&self) -> &str;
    fn format(&self) -> &str;
    fn render(&self, event: &RenderEvent);
}

/// Events emitted over the lifetime of one run.
#[derive(Debug, Clone)]
pub enum RenderEvent {
    RunStart {
        run_id: String,
        total_tasks: usize,
        concurrency: usize,
    },
    TaskComplete {
        run_id: String,
        result: TaskResult,
    },
    Progress {
        run_id: String,
        completed: usize,
        total: usize,
        percent: f64,
    },
    RunEnd {
        run_id: String,
        report: ExecutionReport,
    },
}
