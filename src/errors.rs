use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("delay range is inverted: min {min}s > max {max}s")]
    InvertedDelayRange { min: u64, max: u64 },

    #[error("confirmations must be at least 1")]
    ZeroConfirmations,

    #[error("confirmation timeout must be positive")]
    ZeroConfirmationTimeout,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("network error: {0}")]
    Network(String),

    #[error("contract error: {0}")]
    Contract(String),

    #[error("transaction reverted: {0}")]
    Revert(String),

    #[error("no confirmation within {0:?}")]
    Timeout(Duration),
}

impl ChainError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::Network(err.to_string())
    }

    pub fn contract(err: impl std::fmt::Display) -> Self {
        Self::Contract(err.to_string())
    }
}
