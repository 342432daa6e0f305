#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;
use trakeo_core::ledger::{
    Account, LedgerSnapshot, RecurringInterval, Transaction, TransactionType,
};
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_dir() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

/// A user with one account and a ledger to hang recurring templates on.
pub struct Fixture {
    pub user_id: Uuid,
    pub account_id: Uuid,
    pub snapshot: LedgerSnapshot,
}

impl Fixture {
    pub fn new(opening_balance: Decimal) -> Self {
        let user_id = Uuid::new_v4();
        let mut snapshot = LedgerSnapshot::default();
        let account_id =
            snapshot.add_account(Account::new(user_id, "Checking").with_balance(opening_balance));
        Self {
            user_id,
            account_id,
            snapshot,
        }
    }

    pub fn recurring(
        &mut self,
        kind: TransactionType,
        amount: Decimal,
        description: &str,
        interval: RecurringInterval,
        created: DateTime<Utc>,
    ) -> Uuid {
        let txn = Transaction::new(
            self.user_id,
            self.account_id,
            kind,
            amount,
            description,
            created,
        )
        .with_recurrence(interval);
        self.snapshot.add_transaction(txn)
    }

    pub fn balance(snapshot: &LedgerSnapshot, account_id: Uuid) -> Decimal {
        snapshot.account(account_id).expect("account").balance
    }
}
