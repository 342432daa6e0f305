//! Ledger records and the recurrence engine that operates on them.

pub mod account;
pub mod recurring;
pub mod time_interval;
pub mod transaction;

use serde::{Deserialize, Serialize};

pub use account::Account;
pub use recurring::{
    apply_recurrence, is_due, next_occurrence, select_due, RecurrenceResult, RecurrenceState,
};
pub use time_interval::RecurringInterval;
pub use transaction::{
    NewTransaction, RecurringTransaction, Transaction, TransactionStatus, TransactionType,
};

/// Serialized contents of a ledger file: every account and transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl LedgerSnapshot {
    pub fn add_account(&mut self, account: Account) -> uuid::Uuid {
        let id = account.id;
        self.accounts.push(account);
        id
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> uuid::Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        id
    }

    pub fn account(&self, id: uuid::Uuid) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn transaction(&self, id: uuid::Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }
}
