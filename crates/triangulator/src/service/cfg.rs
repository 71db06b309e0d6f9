//! Service configuration, built once at process start and owned by the service.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Directory holding `<id>.bin` point sets.
pub const ENV_STORE: &str = "POINT_SET_STORE";
/// Compute deadline in milliseconds; unset or `0` disables it.
pub const ENV_COMPUTE_TIMEOUT_MS: &str = "TRIANGULATOR_COMPUTE_TIMEOUT_MS";

pub const DEFAULT_STORE: &str = "data/pointsets";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number of milliseconds, got {value:?}")]
    BadTimeout { var: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceCfg {
    pub store_root: PathBuf,
    /// Run the core on a worker thread and give up after this long.
    pub compute_timeout: Option<Duration>,
}

impl Default for ServiceCfg {
    fn default() -> Self {
        Self {
            store_root: PathBuf::from(DEFAULT_STORE),
            compute_timeout: None,
        }
    }
}

impl ServiceCfg {
    /// Defaults overridden by `POINT_SET_STORE` and `TRIANGULATOR_COMPUTE_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as `from_env` with an explicit variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(root) = lookup(ENV_STORE).filter(|s| !s.is_empty()) {
            cfg.store_root = PathBuf::from(root);
        }
        if let Some(raw) = lookup(ENV_COMPUTE_TIMEOUT_MS) {
            cfg.compute_timeout = parse_timeout_ms(&raw)?;
        }
        Ok(cfg)
    }
}

/// `""`/`"0"` mean no deadline.
pub fn parse_timeout_ms(raw: &str) -> Result<Option<Duration>, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let ms: u64 = raw.parse().map_err(|_| ConfigError::BadTimeout {
        var: ENV_COMPUTE_TIMEOUT_MS,
        value: raw.to_string(),
    })?;
    Ok((ms > 0).then(|| Duration::from_millis(ms)))
}
