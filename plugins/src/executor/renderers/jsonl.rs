use chrono::Local;
use serde_json::{json, Value};
use taskpool_core::executor::traits::{RenderEvent, ReportRendererPlugin};

pub struct JsonlRendererPlugin {
    pretty_print: bool,
}

impl JsonlRendererPlugin {
    pub fn new(pretty_print: bool) -> Self {
        Self { pretty_print }
    }

    fn event_to_json(&self, event: &RenderEvent) -> Value {
        let ts = Local::now().to_rfc3339();
        match event {
            RenderEvent::RunStart {
                run_id,
                total_tasks,
                concurrency,
            } => json!({
                "v": 1,
                "event_type": "run.start",
                "ts": ts,
                "run_id": run_id,
                "metadata": {
                    "total_tasks": total_tasks,
                    "concurrency": concurrency,
                }
            }),
            RenderEvent::TaskComplete { run_id, result } => json!({
                "v": 1,
                "event_type": "task.end",
                "ts": ts,
                "run_id": run_id,
                "task_id": result.task_name,
                "error": result.error,
                "metadata": result,
            }),
            RenderEvent::Progress {
                run_id,
                completed,
                total,
                percent,
            } => json!({
                "v": 1,
                "event_type": "run.progress",
                "ts": ts,
                "run_id": run_id,
                "progress": percent,
                "metadata": {
                    "completed": completed,
                    "total": total,
                }
            }),
            RenderEvent::RunEnd { run_id, report } => {
                let code = if report.all_succeeded() { 0 } else { 1 };
                let mean_ms = report.mean_duration.map(|d| d.as_millis() as u64);
                json!({
                    "v": 1,
                    "event_type": "run.end",
                    "ts": ts,
                    "run_id": run_id,
                    "code": code,
                    "metadata": {
                        "total_tasks": report.total_tasks,
                        "succeeded": report.succeeded,
                        "failed": report.failed,
                        "concurrency": report.concurrency,
                        "total_duration_ms": report.total_duration.as_millis() as u64,
                        "mean_duration_ms": mean_ms,
                        "wall_time_ms": report.wall_time.as_millis() as u64,
                    }
                })
            }
        }
    }
}

impl ReportRendererPlugin for JsonlRendererPlugin {
    fn name(&self) -> &str {
        "jsonl-renderer"
    }

    fn format(&self) -> &str {
        "jsonl"
    }

    fn render(&self, event: &RenderEvent) {
        let value = self.event_to_json(event);
        if self.pretty_print {
            println!("{}", serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".into()));
        } else {
            println!("{}", serde_json::to_string(&value).unwrap_or_else(|_| "{}".into()));
        }
    }
}
