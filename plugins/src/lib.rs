//! Pluggable pieces for taskpool: sample tasks, fault policies, renderers,
//! and the factory/planner that wires them into a `Scheduler`.

pub mod executor;
pub mod factory;
pub mod plan;
