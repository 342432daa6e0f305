use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    core::utils::write_atomic,
    errors::StoreError,
    ledger::{
        is_due, LedgerSnapshot, RecurrenceResult, RecurringTransaction, Transaction,
        TransactionStatus,
    },
};

use super::{RecurrenceStore, Result};

/// Ledger snapshot held in memory and optionally mirrored to a JSON file.
pub struct JsonStore {
    path: Option<PathBuf>,
    state: Mutex<LedgerSnapshot>,
}

impl JsonStore {
    pub fn in_memory(snapshot: LedgerSnapshot) -> Self {
        Self {
            path: None,
            state: Mutex::new(snapshot),
        }
    }

    /// Opens a ledger file, starting from an empty snapshot when it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let snapshot = if path.exists() {
            load_snapshot_from_path(&path)?
        } else {
            LedgerSnapshot::default()
        };
        debug!(path = %path.display(), "opened ledger file");
        Ok(Self {
            path: Some(path),
            state: Mutex::new(snapshot),
        })
    }

    pub fn snapshot(&self) -> Result<LedgerSnapshot> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerSnapshot>> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("ledger state lock poisoned".into()))
    }

    fn persist(&self, snapshot: &LedgerSnapshot) -> Result<()> {
        if let Some(path) = &self.path {
            save_snapshot_to_path(snapshot, path)?;
        }
        Ok(())
    }
}

impl RecurrenceStore for JsonStore {
    fn list_candidates(&self, now: DateTime<Utc>) -> Result<Vec<RecurringTransaction>> {
        let state = self.lock()?;
        Ok(state
            .transactions
            .iter()
            .filter(|txn| txn.is_recurring && txn.status == TransactionStatus::Completed)
            .map(Transaction::recurring_view)
            .filter(|spec| is_due(spec, now))
            .collect())
    }

    fn find(&self, user_id: Uuid, transaction_id: Uuid) -> Result<Option<RecurringTransaction>> {
        let state = self.lock()?;
        Ok(state
            .transactions
            .iter()
            .find(|txn| txn.id == transaction_id && txn.user_id == user_id)
            .map(Transaction::recurring_view))
    }

    fn apply(&self, spec: &RecurringTransaction, result: &RecurrenceResult) -> Result<()> {
        let mut state = self.lock()?;
        let mut staged = state.clone();

        let template = staged
            .transactions
            .iter_mut()
            .find(|txn| txn.id == spec.id && txn.user_id == spec.user_id)
            .ok_or(StoreError::TransactionNotFound(spec.id))?;
        template.last_processed = Some(result.updated_last_processed);
        template.next_recurring_date = result.updated_next_recurring_date;

        let account = staged
            .accounts
            .iter_mut()
            .find(|account| account.id == spec.account_id)
            .ok_or(StoreError::AccountNotFound(spec.account_id))?;
        account.apply_delta(result.balance_delta);

        if let Some(occurrence) = &result.new_occurrence {
            staged
                .transactions
                .push(Transaction::from_occurrence(occurrence));
        }

        self.persist(&staged)?;
        *state = staged;
        info!(
            transaction_id = %spec.id,
            account_id = %spec.account_id,
            delta = %result.balance_delta,
            "applied recurring transaction"
        );
        Ok(())
    }
}

pub fn save_snapshot_to_path(snapshot: &LedgerSnapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    write_atomic(path, &json)?;
    Ok(())
}

pub fn load_snapshot_from_path(path: &Path) -> Result<LedgerSnapshot> {
    let data = fs::read_to_string(path)?;
    let snapshot: LedgerSnapshot = serde_json::from_str(&data)?;
    Ok(snapshot)
}
