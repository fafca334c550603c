use std::{fmt, time::Duration};

use alloy::primitives::{TxHash, U256};

use crate::{
    account::Account, chain::ChainClient, config::RunConfiguration, errors::ChainError,
    pacing::PacingPolicy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CheckingOwnership,
    Minting,
    Confirming,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::CheckingOwnership => "ownership check",
            Stage::Minting => "mint submission",
            Stage::Confirming => "confirmation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Chain { stage: Stage, error: ChainError },
    Panicked(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Chain { stage, error } => write!(f, "{error} during {stage}"),
            FailureReason::Panicked(msg) => write!(f, "workflow panicked: {msg}"),
        }
    }
}

/// How an account's workflow ended. Exactly one per dispatched account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    AlreadyOwned,
    Minted { tx_hash: TxHash },
    Failed(FailureReason),
}

enum State {
    Pending,
    Waiting(Duration),
    CheckingOwnership,
    Minting,
    Confirming(TxHash),
    Done(TaskOutcome),
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::Pending => "pending",
            State::Waiting(_) => "waiting",
            State::CheckingOwnership => "checking_ownership",
            State::Minting => "minting",
            State::Confirming(_) => "confirming",
            State::Done(_) => "done",
        }
    }

    fn failed(stage: Stage, error: ChainError) -> Self {
        State::Done(TaskOutcome::Failed(FailureReason::Chain { stage, error }))
    }
}

/// Drives one account from pacing delay to a terminal outcome. Chain errors
/// end this account only and are returned as [`TaskOutcome::Failed`].
pub async fn process_account(
    account: &Account,
    client: &dyn ChainClient,
    pacing: &PacingPolicy,
    config: &RunConfiguration,
) -> TaskOutcome {
    let address = account.address();
    let mut state = State::Pending;

    loop {
        state = match state {
            State::Pending => State::Waiting(pacing.delay_for(address)),
            State::Waiting(delay) => {
                tracing::info!("[{address}] Waiting {} sec.", delay.as_secs());
                tokio::time::sleep(delay).await;
                State::CheckingOwnership
            }
            State::CheckingOwnership => match client.query_owned_count(address).await {
                Ok(owned) if owned > U256::ZERO => State::Done(TaskOutcome::AlreadyOwned),
                Ok(_) => State::Minting,
                Err(error) => State::failed(Stage::CheckingOwnership, error),
            },
            State::Minting => match client.submit_mint(account).await {
                Ok(tx_hash) => {
                    tracing::info!("[{address}] Minting NFT... Hash: {tx_hash}");
                    State::Confirming(tx_hash)
                }
                Err(error) => State::failed(Stage::Minting, error),
            },
            State::Confirming(tx_hash) => {
                let confirmation = tokio::time::timeout(
                    config.confirmation_timeout,
                    client.await_confirmation(tx_hash, config.confirmations),
                );

                match confirmation.await {
                    Ok(Ok(())) => State::Done(TaskOutcome::Minted { tx_hash }),
                    Ok(Err(error)) => State::failed(Stage::Confirming, error),
                    Err(_elapsed) => State::failed(
                        Stage::Confirming,
                        ChainError::Timeout(config.confirmation_timeout),
                    ),
                }
            }
            State::Done(outcome) => return outcome,
        };

        tracing::debug!(%address, state = state.name(), "workflow transition");
    }
}

#[cfg(test)]
mod tests {
    use crate::{chain::mock::MockChainClient, config::DelayRange};

    use super::*;

    fn run_config(delay_secs: u64) -> RunConfiguration {
        RunConfiguration {
            concurrency: 1,
            delay: DelayRange::fixed(delay_secs),
            shuffle: false,
            confirmations: 1,
            confirmation_timeout: Duration::from_secs(150),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn mints_when_nothing_owned() {
        let account = Account::random();
        let client = MockChainClient::new();
        let config = run_config(0);
        let pacing = PacingPolicy::seeded(config.delay, 0);

        let outcome = process_account(&account, &client, &pacing, &config).await;

        assert_eq!(
            outcome,
            TaskOutcome::Minted {
                tx_hash: account.address().into_word()
            }
        );
        assert_eq!(client.submissions(), 1);
        assert_eq!(client.balance_of(account.address()), U256::from(1));
    }

    #[tokio::test(start_paused = true)]
    async fn already_owned_never_submits() {
        let account = Account::random();
        let client = MockChainClient::new().with_balance(account.address(), 1);
        let config = run_config(0);
        let pacing = PacingPolicy::seeded(config.delay, 0);

        let outcome = process_account(&account, &client, &pacing, &config).await;

        assert_eq!(outcome, TaskOutcome::AlreadyOwned);
        assert_eq!(client.queries(), 1);
        assert_eq!(client.submissions(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_pacing_delay_before_query() {
        let account = Account::random();
        let client = MockChainClient::new();
        let config = run_config(30);
        let pacing = PacingPolicy::seeded(config.delay, 0);
        let started = tokio::time::Instant::now();

        process_account(&account, &client, &pacing, &config).await;

        let queried_at = client.query_started_at.lock().unwrap()[0];
        assert_eq!(queried_at - started, Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn query_error_fails_without_minting() {
        let account = Account::random();
        let client = MockChainClient::new().with_failing_query(account.address());
        let config = run_config(0);
        let pacing = PacingPolicy::seeded(config.delay, 0);

        let outcome = process_account(&account, &client, &pacing, &config).await;

        assert_eq!(
            outcome,
            TaskOutcome::Failed(FailureReason::Chain {
                stage: Stage::CheckingOwnership,
                error: ChainError::Network("connection reset".to_string()),
            })
        );
        assert_eq!(client.submissions(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_confirmation_times_out() {
        let account = Account::random();
        let client = MockChainClient::new().with_stalled_confirmation(account.address());
        let config = run_config(0);
        let pacing = PacingPolicy::seeded(config.delay, 0);
        let started = tokio::time::Instant::now();

        let outcome = process_account(&account, &client, &pacing, &config).await;

        assert_eq!(
            outcome,
            TaskOutcome::Failed(FailureReason::Chain {
                stage: Stage::Confirming,
                error: ChainError::Timeout(Duration::from_secs(150)),
            })
        );
        assert_eq!(started.elapsed(), Duration::from_secs(150));
        assert_eq!(client.balance_of(account.address()), U256::ZERO);
    }
}
