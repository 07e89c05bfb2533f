pub mod fault;

pub use fault::{AlwaysFaultPlugin, EveryNthFaultPlugin, FaultSetPlugin, NeverFaultPlugin};
