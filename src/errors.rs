use thiserror::Error;
use uuid::Uuid;

/// Failures raised by the recurrence engine for a single invocation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("Unsupported recurring interval: {0}")]
    UnsupportedInterval(String),
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),
}

/// Error type that captures persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors that abort a whole scheduler pass.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Fetching recurring candidates failed after {attempts} attempt(s): {source}")]
    CandidateFetch {
        attempts: u32,
        #[source]
        source: StoreError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Per-item failure recorded by the scheduler without aborting the pass.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
