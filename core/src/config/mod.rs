mod load;
mod types;

pub use load::{
    apply_env_overrides, apply_env_overrides_from, get_taskpool_data_dir, load_default,
    load_from_path,
};
pub use types::{AppConfig, DemoConfig, LoggingConfig, SchedulerConfig};
