use alloy::primitives::{address, Address};

pub const MINT_CONTRACT_ADDRESS: Address = address!("Eaea2Fa0dea2D1191a584CFBB227220822E29086");

pub const LINEA_CHAIN_ID: u64 = 59144;
pub const LINEA_EXPLORER_URL: &str = "https://lineascan.build";

// FILES
pub const CONFIG_FILE_PATH: &str = "data/config.toml";
pub const PRIVATE_KEYS_FILE_PATH: &str = "data/private_keys.txt";
pub const LOGS_DIR: &str = "logs";
pub const LOG_FILE_PREFIX: &str = "minter.log";

// DEFAULTS
pub const DEFAULT_CONCURRENCY: usize = 2;
pub const DEFAULT_DELAY_MIN_SECS: u64 = 150;
pub const DEFAULT_DELAY_MAX_SECS: u64 = 300;
pub const DEFAULT_CONFIRMATIONS: u64 = 1;
pub const DEFAULT_CONFIRMATION_TIMEOUT_MS: u64 = 150_000;

pub const RECEIPT_POLL_INTERVAL_MS: u64 = 2_000;
