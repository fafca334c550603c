use serde::Deserialize;
use std::{path::Path, time::Duration};

use crate::{
    constants::{
        CONFIG_FILE_PATH, DEFAULT_CONCURRENCY, DEFAULT_CONFIRMATIONS,
        DEFAULT_CONFIRMATION_TIMEOUT_MS, DEFAULT_DELAY_MAX_SECS, DEFAULT_DELAY_MIN_SECS,
    },
    errors::ConfigError,
};

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Config {
    pub rpc_url: String,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_delay_min_secs")]
    pub delay_min_secs: u64,
    #[serde(default = "default_delay_max_secs")]
    pub delay_max_secs: u64,
    #[serde(default = "default_shuffle_wallets")]
    pub shuffle_wallets: bool,
    #[serde(default = "default_confirmations")]
    pub confirmations: u64,
    #[serde(default = "default_confirmation_timeout_ms")]
    pub confirmation_timeout_ms: u64,
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_delay_min_secs() -> u64 {
    DEFAULT_DELAY_MIN_SECS
}

fn default_delay_max_secs() -> u64 {
    DEFAULT_DELAY_MAX_SECS
}

fn default_shuffle_wallets() -> bool {
    true
}

fn default_confirmations() -> u64 {
    DEFAULT_CONFIRMATIONS
}

fn default_confirmation_timeout_ms() -> u64 {
    DEFAULT_CONFIRMATION_TIMEOUT_MS
}

impl Config {
    async fn read_from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let cfg_str = tokio::fs::read_to_string(path).await?;
        Ok(toml::from_str(&cfg_str)?)
    }

    pub async fn read_default() -> eyre::Result<Self> {
        Self::read_from_file(CONFIG_FILE_PATH).await
    }

    pub fn run_configuration(&self) -> RunConfiguration {
        RunConfiguration {
            concurrency: self.concurrency,
            delay: DelayRange {
                min_secs: self.delay_min_secs,
                max_secs: self.delay_max_secs,
            },
            shuffle: self.shuffle_wallets,
            confirmations: self.confirmations,
            confirmation_timeout: Duration::from_millis(self.confirmation_timeout_ms),
        }
    }
}

/// Inclusive range of whole seconds to wait before an account starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayRange {
    pub min_secs: u64,
    pub max_secs: u64,
}

#[cfg(test)]
impl DelayRange {
    pub const fn fixed(secs: u64) -> Self {
        Self {
            min_secs: secs,
            max_secs: secs,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunConfiguration {
    pub concurrency: usize,
    pub delay: DelayRange,
    pub shuffle: bool,
    pub confirmations: u64,
    pub confirmation_timeout: Duration,
}

impl RunConfiguration {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.delay.min_secs > self.delay.max_secs {
            return Err(ConfigError::InvertedDelayRange {
                min: self.delay.min_secs,
                max: self.delay.max_secs,
            });
        }
        if self.confirmations == 0 {
            return Err(ConfigError::ZeroConfirmations);
        }
        if self.confirmation_timeout.is_zero() {
            return Err(ConfigError::ZeroConfirmationTimeout);
        }

        Ok(())
    }
}
