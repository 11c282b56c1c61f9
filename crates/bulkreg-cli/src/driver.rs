//! Batch driver: walks the tracked records and registers pending ones.

use std::time::Duration;

use bulkreg_core::{Records, RecordStore, StoreError};
use tracing::{debug, info, warn};

use crate::executor::{Outcome, RegistrationExecutor};

/// How often a domain is tried within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per domain per run, at least 1.
    pub max_attempts: u32,
    /// Pause before retrying the same domain.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::from_secs(5),
        }
    }
}

/// Counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Registers every record that has not succeeded yet, one at a time.
pub struct BatchDriver<'a> {
    executor: &'a RegistrationExecutor,
    store: &'a RecordStore,
    retry: RetryPolicy,
}

impl<'a> BatchDriver<'a> {
    pub fn new(
        executor: &'a RegistrationExecutor,
        store: &'a RecordStore,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            executor,
            store,
            retry,
        }
    }

    /// Process `records` in order, saving the store after every attempt.
    ///
    /// Only a failure to save aborts the run.
    pub async fn run(&self, records: &mut Records) -> Result<BatchSummary, StoreError> {
        let mut summary = BatchSummary::default();
        let pending: Vec<(String, String)> = records
            .iter()
            .filter(|(_, record)| {
                if record.status.is_terminal() {
                    summary.skipped += 1;
                    debug!(domain = %record.domain, "Already registered, skipping");
                    false
                } else {
                    true
                }
            })
            .map(|(domain, record)| (domain.to_string(), record.owner.clone()))
            .collect();

        info!(
            pending = pending.len(),
            skipped = summary.skipped,
            "Starting registration batch"
        );

        for (domain, owner) in pending {
            info!(domain = %domain, owner = %owner, "Processing domain");
            summary.attempted += 1;

            let mut attempt = 1;
            loop {
                let outcome = self.executor.register(&domain, &owner).await;
                if let Some(record) = records.get_mut(&domain) {
                    outcome.apply_to(record);
                }
                self.store.save(records)?;

                match outcome {
                    Outcome::Success { .. } => {
                        summary.succeeded += 1;
                        break;
                    }
                    Outcome::Failed { .. } if attempt < self.retry.max_attempts => {
                        warn!(
                            domain = %domain,
                            attempt,
                            max_attempts = self.retry.max_attempts,
                            delay_secs = self.retry.delay.as_secs(),
                            "Retrying domain"
                        );
                        attempt += 1;
                        tokio::time::sleep(self.retry.delay).await;
                    }
                    Outcome::Failed { .. } => {
                        summary.failed += 1;
                        break;
                    }
                }
            }
        }

        info!(
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            "All domains processed"
        );
        Ok(summary)
    }
}
