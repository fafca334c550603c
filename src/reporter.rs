use std::time::Duration;

use alloy::primitives::Address;

use crate::{constants::LINEA_EXPLORER_URL, scheduler::RunStatistics, workflow::TaskOutcome};

/// Receives progress from the scheduler. Calls come from a single task,
/// one per finished account and one at the end of the run.
pub trait ResultReporter: Send + Sync {
    fn on_outcome(&self, address: Address, outcome: &TaskOutcome);

    fn on_finished(&self, stats: &RunStatistics, elapsed: Duration);
}

pub struct LogReporter;

fn elapsed_minutes(elapsed: Duration) -> u128 {
    (elapsed.as_millis() + 30_000) / 60_000
}

impl ResultReporter for LogReporter {
    fn on_outcome(&self, address: Address, outcome: &TaskOutcome) {
        match outcome {
            TaskOutcome::AlreadyOwned => tracing::info!("[{address}] Already holds the NFT"),
            TaskOutcome::Minted { tx_hash } => tracing::info!(
                "[{address}] NFT minted successfully: {LINEA_EXPLORER_URL}/tx/{tx_hash}"
            ),
            TaskOutcome::Failed(reason) => tracing::warn!("[{address}] Failed: {reason}"),
        }
    }

    fn on_finished(&self, stats: &RunStatistics, elapsed: Duration) {
        tracing::info!(
            "Work finished! {}/{} wallets hold the NFT ({} minted, {} already owned, {} failed). Elapsed: {} min.",
            stats.holders(),
            stats.total,
            stats.minted,
            stats.already_owned,
            stats.failed,
            elapsed_minutes(elapsed),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_minutes_round_to_nearest() {
        assert_eq!(elapsed_minutes(Duration::ZERO), 0);
        assert_eq!(elapsed_minutes(Duration::from_millis(29_999)), 0);
        assert_eq!(elapsed_minutes(Duration::from_secs(30)), 1);
        assert_eq!(elapsed_minutes(Duration::from_secs(89)), 1);
        assert_eq!(elapsed_minutes(Duration::from_secs(90)), 2);
        assert_eq!(elapsed_minutes(Duration::from_secs(3_600)), 60);
    }
}
