use std::sync::Arc;

use chain::connect;
use config::Config;
use constants::MINT_CONTRACT_ADDRESS;
use logger::init_default_logger;
use reporter::LogReporter;
use scheduler::TaskScheduler;
use utils::read_accounts;

mod account;
mod chain;
mod config;
mod constants;
mod errors;
mod logger;
mod pacing;
mod reporter;
mod scheduler;
mod utils;
mod workflow;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let _guard = init_default_logger();

    let config = Config::read_default().await?;
    let run_config = config.run_configuration();

    let accounts = read_accounts().await?;
    let client = connect(&config.rpc_url, MINT_CONTRACT_ADDRESS)?;

    TaskScheduler::new(Arc::new(client), Arc::new(LogReporter))
        .run(accounts, &run_config)
        .await?;

    Ok(())
}
