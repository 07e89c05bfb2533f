use std::sync::Arc;

use taskpool_core::config::SchedulerConfig;
use taskpool_core::executor::traits::{FaultPolicy, ReportRendererPlugin};
use taskpool_core::executor::{Scheduler, SchedulerOpts};

use crate::executor::{
    EveryNthFaultPlugin, FaultSetPlugin, JsonlRendererPlugin, NeverFaultPlugin, TextRendererPlugin,
};

/// Pick the renderer for a stream format.
///
/// Text output with a live progress bar returns `None`: the scheduler's own
/// bar and the final report cover it, and per-task lines would fight the bar.
pub fn build_renderer(
    stream_format: &str,
    progress_bar: bool,
) -> Option<Arc<dyn ReportRendererPlugin>> {
    match stream_format {
        "jsonl" => Some(Arc::new(JsonlRendererPlugin::new(false))),
        _ if progress_bar => None,
        // Anything else behaves like text.
        _ => Some(Arc::new(TextRendererPlugin::new(false))),
    }
}

/// Explicit indices win over the modulo rule; neither means no faults.
pub fn build_fault_policy(fail_every: Option<usize>, fail_at: &[usize]) -> Arc<dyn FaultPolicy> {
    if !fail_at.is_empty() {
        return Arc::new(FaultSetPlugin::new(fail_at.iter().copied()));
    }
    match fail_every {
        Some(n) => Arc::new(EveryNthFaultPlugin::new(n)),
        None => Arc::new(NeverFaultPlugin),
    }
}

/// Build a scheduler wired with the renderer matching `cfg.stream_format`.
pub fn build_scheduler(cfg: &SchedulerConfig) -> anyhow::Result<(Scheduler, bool)> {
    let opts = SchedulerOpts::from_config(cfg);
    let renderer = build_renderer(&cfg.stream_format, opts.progress_bar);
    let has_renderer = renderer.is_some();

    let mut builder = Scheduler::builder().opts(opts);
    if let Some(renderer) = renderer {
        builder = builder.renderer(renderer);
    }
    Ok((builder.build()?, has_renderer))
}
