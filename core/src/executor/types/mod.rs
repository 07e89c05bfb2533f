pub mod config;
pub mod error;
pub mod result;
pub mod task;

pub use config::*;
pub use error::*;
pub use result::*;
pub use task::*;
