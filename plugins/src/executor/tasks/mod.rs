pub mod faulty;
pub mod sleep;

pub use faulty::FaultyTask;
pub use sleep::SleepTask;
