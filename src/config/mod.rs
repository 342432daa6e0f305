use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    core::utils::{app_data_dir, config_file_in, ensure_dir, ledger_file_in, write_atomic},
    errors::ConfigError,
};

const DEFAULT_THROTTLE_LIMIT: usize = 10;
const DEFAULT_THROTTLE_PERIOD_SECS: u64 = 60;
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 500;
const MAX_THROTTLE_PERIOD_SECS: u64 = 365 * 24 * 60 * 60;

/// Tunables for the recurring-transaction scheduler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Applications allowed per user within one throttle period.
    pub throttle_limit: usize,
    pub throttle_period_secs: u64,
    /// Attempts made when fetching candidates before the pass fails.
    pub retry_attempts: u32,
    pub retry_base_delay_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            throttle_limit: DEFAULT_THROTTLE_LIMIT,
            throttle_period_secs: DEFAULT_THROTTLE_PERIOD_SECS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            data_file: None,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.throttle_limit == 0 {
            return Err(ConfigError::Invalid(
                "throttle_limit must be at least 1".into(),
            ));
        }
        if self.throttle_period_secs == 0 {
            return Err(ConfigError::Invalid(
                "throttle_period_secs must be at least 1".into(),
            ));
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn throttle_period(&self) -> chrono::Duration {
        let secs = self.throttle_period_secs.min(MAX_THROTTLE_PERIOD_SECS);
        chrono::Duration::seconds(secs as i64)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

/// Loads and stores [`SchedulerConfig`] as JSON under the application data directory.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
            base,
        })
    }

    /// Uses an explicit config file; its parent directory becomes the data directory.
    pub fn with_config_file(path: PathBuf) -> Self {
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { base, path }
    }

    pub fn load(&self) -> Result<SchedulerConfig, ConfigError> {
        let config = if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data)?
        } else {
            SchedulerConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &SchedulerConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    /// Ledger file from the config, falling back to `ledger.json` in the data directory.
    pub fn ledger_path(&self, config: &SchedulerConfig) -> PathBuf {
        config
            .data_file
            .clone()
            .unwrap_or_else(|| ledger_file_in(&self.base))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
