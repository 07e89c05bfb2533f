//! Core of taskpool: task contract, worker pool, result aggregation and
//! reporting. Plugins (sample tasks, renderers) and the CLI build on top.

pub mod api;
pub mod config;
pub mod error;
pub mod executor;
