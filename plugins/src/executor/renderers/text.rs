use taskpool_core::executor::traits::{RenderEvent, ReportRendererPlugin};

pub struct TextRendererPlugin {
    ascii_only: bool,
}

impl TextRendererPlugin {
    pub fn new(ascii_only: bool) -> Self {
        Self { ascii_only }
    }

    /// `None` for events this renderer stays silent on.
    fn format_event(&self, event: &RenderEvent) -> Option<String> {
        match event {
            RenderEvent::RunStart {
                run_id,
                total_tasks,
                concurrency,
            } => Some(format!(
                "RUN START {} (tasks: {}, workers: {})",
                run_id, total_tasks, concurrency
            )),
            RenderEvent::TaskComplete { run_id, result } => {
                let status = match (result.success, self.ascii_only) {
                    (true, true) => "OK",
                    (true, false) => "✅ SUCCESS",
                    (false, true) => "FAIL",
                    (false, false) => "❌ FAILED",
                };
                let mut line = format!(
                    "TASK END {} (task {}, worker {}, status {}, duration {}ms)",
                    run_id,
                    result.task_name,
                    result.worker_id,
                    status,
                    result.duration_ms()
                );
                if let Some(err) = &result.error {
                    line.push_str(&format!(": {}", err));
                }
                Some(line)
            }
            // One line per task already carries the count
            RenderEvent::Progress { .. } => None,
            RenderEvent::RunEnd { report, .. } => Some(format!("\n{}", report)),
        }
    }
}

impl ReportRendererPlugin for TextRendererPlugin {
    fn name(&self) -> &str {
        "text-renderer"
    }

    fn format(&self) -> &str {
        "text"
    }

    fn render(&self, event: &RenderEvent) {
        if let Some(line) = self.format_event(event) {
            println!("{}", line);
        }
    }
}
