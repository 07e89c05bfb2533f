use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::AppConfig;

/// Get the default taskpool data directory: ~/.taskpool
pub fn get_taskpool_data_dir() -> Result<PathBuf, ConfigError> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| ConfigError::NoHomeDir)?;
    Ok(PathBuf::from(home).join(".taskpool"))
}

pub fn load_default() -> Result<AppConfig, ConfigError> {
    // Priority 1: ~/.taskpool/config.toml (highest)
    let user_config = get_taskpool_data_dir()?.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg = if user_config.exists() {
        read_config(&user_config)?
    } else if local_config.exists() {
        read_config(local_config)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load an explicit config file (`--config`), then apply env overrides.
pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let mut cfg = read_config(path)?;
    apply_env_overrides(&mut cfg)?;
    cfg.validate()?;
    Ok(cfg)
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<AppConfig>(&s).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn apply_env_overrides(cfg: &mut AppConfig) -> Result<(), ConfigError> {
    apply_env_overrides_from(cfg, |var| std::env::var(var).ok())
}

/// Environment variable overrides (Priority 0: highest).
pub fn apply_env_overrides_from<F>(cfg: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("TASKPOOL_CONCURRENCY") {
        cfg.scheduler.concurrency = v.trim().parse().map_err(|_| ConfigError::Env {
            var: "TASKPOOL_CONCURRENCY".to_string(),
            value: v.clone(),
        })?;
    }
    if let Some(v) = get("TASKPOOL_LOG_LEVEL") {
        cfg.logging.level = v;
    }
    if let Some(v) = get("TASKPOOL_STREAM_FORMAT") {
        cfg.scheduler.stream_format = v.trim().to_ascii_lowercase();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut cfg = AppConfig::default();
        apply_env_overrides_from(
            &mut cfg,
            env(&[
                ("TASKPOOL_CONCURRENCY", " 7 "),
                ("TASKPOOL_LOG_LEVEL", "debug"),
                ("TASKPOOL_STREAM_FORMAT", "JSONL"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.scheduler.concurrency, 7);
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.scheduler.stream_format, "jsonl");
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut cfg = AppConfig::default();
        let before = cfg.scheduler.concurrency;
        apply_env_overrides_from(&mut cfg, env(&[("TASKPOOL_CONCURRENCY", "  ")])).unwrap();
        assert_eq!(cfg.scheduler.concurrency, before);
    }

    #[test]
    fn test_bad_concurrency_env() {
        let mut cfg = AppConfig::default();
        let err = apply_env_overrides_from(&mut cfg, env(&[("TASKPOOL_CONCURRENCY", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { .. }));
    }
}
