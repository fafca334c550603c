use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use alloy::primitives::Address;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::DelayRange;

pub struct PacingPolicy {
    range: DelayRange,
    rng: Mutex<StdRng>,
}

impl PacingPolicy {
    pub fn seeded(range: DelayRange, seed: u64) -> Self {
        Self {
            range,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Whole seconds drawn uniformly from `[min, max]`. The range must already
    /// be validated.
    pub fn delay_for(&self, address: Address) -> Duration {
        let secs = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(self.range.min_secs..=self.range.max_secs);

        tracing::trace!(%address, secs, "pacing delay sampled");

        Duration::from_secs(secs)
    }
}
