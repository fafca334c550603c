use std::{collections::VecDeque, sync::Arc};

use alloy::primitives::Address;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinSet,
    time::Instant,
};

use crate::{
    account::Account,
    chain::ChainClient,
    config::RunConfiguration,
    errors::ConfigError,
    pacing::PacingPolicy,
    reporter::ResultReporter,
    workflow::{process_account, FailureReason, TaskOutcome},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStatistics {
    pub minted: usize,
    pub already_owned: usize,
    pub failed: usize,
    pub total: usize,
}

impl RunStatistics {
    fn record(&mut self, outcome: &TaskOutcome) {
        match outcome {
            TaskOutcome::AlreadyOwned => self.already_owned += 1,
            TaskOutcome::Minted { .. } => self.minted += 1,
            TaskOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn holders(&self) -> usize {
        self.minted + self.already_owned
    }
}

pub struct TaskScheduler {
    client: Arc<dyn ChainClient>,
    reporter: Arc<dyn ResultReporter>,
    rng: StdRng,
}

impl TaskScheduler {
    pub fn new(client: Arc<dyn ChainClient>, reporter: Arc<dyn ResultReporter>) -> Self {
        Self {
            client,
            reporter,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Processes all `accounts` with at most `config.concurrency` workflows in
    /// flight and returns once every one of them has an outcome.
    ///
    /// Only an invalid configuration is an error. Failures of individual
    /// accounts are counted in the returned statistics.
    pub async fn run(
        &mut self,
        mut accounts: Vec<Account>,
        config: &RunConfiguration,
    ) -> Result<RunStatistics, ConfigError> {
        config.validate()?;

        let started_at = Instant::now();
        let mut stats = RunStatistics::default();

        if accounts.is_empty() {
            tracing::warn!("Loaded 0 wallets!");
            self.reporter.on_finished(&stats, started_at.elapsed());
            return Ok(stats);
        }

        tracing::info!("Loaded {} wallets. Starting...", accounts.len());

        if config.shuffle {
            accounts.shuffle(&mut self.rng);
        }

        stats.total = accounts.len();
        let worker_count = config.concurrency.min(accounts.len());

        let queue = Arc::new(Mutex::new(VecDeque::from(accounts)));
        let pacing = Arc::new(PacingPolicy::seeded(config.delay, self.rng.gen()));
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<(Address, TaskOutcome)>();

        let mut workers = JoinSet::new();
        for worker_id in 0..worker_count {
            let queue = queue.clone();
            let client = self.client.clone();
            let pacing = pacing.clone();
            let outcome_tx = outcome_tx.clone();
            let config = *config;

            workers.spawn(async move {
                loop {
                    let next = queue.lock().await.pop_front();
                    let Some(account) = next else { break };

                    let address = account.address();
                    let workflow = tokio::spawn({
                        let client = client.clone();
                        let pacing = pacing.clone();
                        async move {
                            process_account(&account, client.as_ref(), &pacing, &config).await
                        }
                    });

                    let outcome = workflow.await.unwrap_or_else(|e| {
                        tracing::error!("[{address}] Workflow task failed: {e}");
                        TaskOutcome::Failed(FailureReason::Panicked(e.to_string()))
                    });

                    if outcome_tx.send((address, outcome)).is_err() {
                        break;
                    }
                }
                tracing::debug!(worker_id, "worker drained the queue");
            });
        }
        drop(outcome_tx);

        while let Some((address, outcome)) = outcome_rx.recv().await {
            stats.record(&outcome);
            self.reporter.on_outcome(address, &outcome);
        }

        while let Some(res) = workers.join_next().await {
            if let Err(e) = res {
                tracing::error!("Worker task failed to join: {e}");
            }
        }

        self.reporter.on_finished(&stats, started_at.elapsed());

        Ok(stats)
    }
}
