//! Batch runner that applies due recurring transactions.
//!
//! A pass lists candidates once, then re-reads and re-checks each due record
//! before applying it. One record failing never stops the rest of the pass.
//! Records over a user's throttle wait for a free slot within the same pass.

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{retry::RetryPolicy, throttle::UserThrottle, time::Clock};
use crate::{
    config::SchedulerConfig,
    errors::{ItemError, SchedulerError},
    ledger::{apply_recurrence, is_due, select_due, RecurringTransaction},
    storage::RecurrenceStore,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub transaction_id: Uuid,
    pub reason: String,
}

/// Outcome counters for a single scheduler pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub triggered: usize,
    pub applied: Vec<Uuid>,
    pub skipped: Vec<Uuid>,
    /// Records that had to wait for their user's throttle window before running.
    pub throttled: Vec<Uuid>,
    pub failures: Vec<ItemFailure>,
}

impl PassReport {
    pub fn summary(&self) -> String {
        format!(
            "triggered {}, applied {}, skipped {}, throttled {}, failed {}",
            self.triggered,
            self.applied.len(),
            self.skipped.len(),
            self.throttled.len(),
            self.failures.len()
        )
    }
}

enum ItemOutcome {
    Applied,
    Skipped,
}

pub struct RecurrenceScheduler {
    throttle: UserThrottle,
    retry: RetryPolicy,
}

impl RecurrenceScheduler {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            throttle: UserThrottle::new(config.throttle_limit, config.throttle_period()),
            retry: RetryPolicy::new(config.retry_attempts, config.retry_base_delay()),
        }
    }

    /// Lists due records without applying anything.
    pub fn preview(
        &self,
        store: &dyn RecurrenceStore,
        clock: &dyn Clock,
    ) -> Result<Vec<RecurringTransaction>, SchedulerError> {
        let now = clock.now();
        let candidates = self.fetch_candidates(store, now)?;
        Ok(select_due(&candidates, now).into_iter().cloned().collect())
    }

    pub fn run_pass(
        &mut self,
        store: &dyn RecurrenceStore,
        clock: &dyn Clock,
    ) -> Result<PassReport, SchedulerError> {
        let now = clock.now();
        let candidates = self.fetch_candidates(store, now)?;
        let due = select_due(&candidates, now);

        let mut report = PassReport {
            triggered: due.len(),
            ..PassReport::default()
        };
        debug!(triggered = report.triggered, %now, "starting recurrence pass");

        for candidate in due {
            let requested = clock.now();
            let start = self.throttle.reserve(candidate.user_id, requested);
            if start > requested {
                debug!(
                    user_id = %candidate.user_id,
                    transaction_id = %candidate.id,
                    %start,
                    "throttled, waiting for a free slot"
                );
                report.throttled.push(candidate.id);
                clock.wait_until(start);
            }
            match self.process_one(store, candidate, clock) {
                Ok(ItemOutcome::Applied) => report.applied.push(candidate.id),
                Ok(ItemOutcome::Skipped) => report.skipped.push(candidate.id),
                Err(err) => {
                    warn!(transaction_id = %candidate.id, %err, "recurring transaction failed");
                    report.failures.push(ItemFailure {
                        transaction_id: candidate.id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!("recurrence pass finished: {}", report.summary());
        Ok(report)
    }

    fn fetch_candidates(
        &self,
        store: &dyn RecurrenceStore,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<RecurringTransaction>, SchedulerError> {
        self.retry
            .run("fetch recurring candidates", || store.list_candidates(now))
            .map_err(|(attempts, source)| SchedulerError::CandidateFetch { attempts, source })
    }

    fn process_one(
        &self,
        store: &dyn RecurrenceStore,
        candidate: &RecurringTransaction,
        clock: &dyn Clock,
    ) -> Result<ItemOutcome, ItemError> {
        let Some(current) = store.find(candidate.user_id, candidate.id)? else {
            return Ok(ItemOutcome::Skipped);
        };
        let now = clock.now();
        if !current.is_recurring || !is_due(&current, now) {
            return Ok(ItemOutcome::Skipped);
        }
        let result = apply_recurrence(&current, now)?;
        store.apply(&current, &result)?;
        Ok(ItemOutcome::Applied)
    }
}
