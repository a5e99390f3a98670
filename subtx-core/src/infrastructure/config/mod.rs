//! Configuration loader using Figment for layered config management.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML config file
//! 3. Environment variables (SUBTX_* prefix)

use crate::foundation::{QueueError, ENV_PREFIX, REMOVE_TIMEOUT_MS};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_LOG_FILTERS: &str = "info";

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Grace period before terminal entries are swept, in milliseconds.
    pub remove_timeout_ms: u64,
}

impl QueueConfig {
    pub fn remove_timeout(&self) -> Duration {
        Duration::from_millis(self.remove_timeout_ms)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { remove_timeout_ms: REMOVE_TIMEOUT_MS }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter expression, e.g. `"info"` or `"info,subtx_core=debug"`.
    pub filters: String,
    /// Optional directory for log files; console-only when unset.
    pub log_dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filters: DEFAULT_LOG_FILTERS.to_string(), log_dir: None }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub queue: QueueConfig,
    pub logging: LoggingConfig,
}

/// Loads configuration from defaults, an optional TOML file, and the
/// environment.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, QueueError> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
    if let Some(path) = path {
        figment = figment.merge(Toml::file(path));
    }
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
    Ok(figment.extract()?)
}
