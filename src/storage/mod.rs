pub mod json_backend;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    errors::StoreError,
    ledger::{RecurrenceResult, RecurringTransaction},
};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence collaborator consumed by the recurrence scheduler.
pub trait RecurrenceStore: Send + Sync {
    /// Recurring, settled records that were never processed or whose next date is `<= now`.
    fn list_candidates(&self, now: DateTime<Utc>) -> Result<Vec<RecurringTransaction>>;

    fn find(&self, user_id: Uuid, transaction_id: Uuid) -> Result<Option<RecurringTransaction>>;

    /// Creates the occurrence, adjusts the account balance and advances the
    /// recurrence pointer as one all-or-nothing write.
    fn apply(&self, spec: &RecurringTransaction, result: &RecurrenceResult) -> Result<()>;
}

pub use json_backend::JsonStore;
