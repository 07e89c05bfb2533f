pub mod renderers;
pub mod strategies;
pub mod tasks;

pub use renderers::{JsonlRendererPlugin, TextRendererPlugin};
pub use strategies::{AlwaysFaultPlugin, EveryNthFaultPlugin, FaultSetPlugin, NeverFaultPlugin};
pub use tasks::{FaultyTask, SleepTask};
