use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time_interval::RecurringInterval;

pub const RECURRING_SUFFIX: &str = " (Recurring)";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Signed balance change for `amount` flowing through an account.
    pub fn balance_delta(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionType::Income => amount,
            TransactionType::Expense => -amount,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    #[default]
    Completed,
    Failed,
}

/// Persisted transaction record, recurring templates and concrete occurrences alike.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    pub account_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<Uuid>,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_interval: Option<RecurringInterval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_recurring_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_processed: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn new(
        user_id: Uuid,
        account_id: Uuid,
        kind: TransactionType,
        amount: Decimal,
        description: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            amount,
            description: description.into(),
            date,
            account_id,
            category_id: None,
            subcategory_id: None,
            status: TransactionStatus::Completed,
            is_recurring: false,
            recurring_interval: None,
            next_recurring_date: None,
            last_processed: None,
        }
    }

    pub fn with_recurrence(mut self, interval: RecurringInterval) -> Self {
        self.is_recurring = true;
        self.recurring_interval = Some(interval);
        self
    }

    pub fn with_category(mut self, category_id: Uuid, subcategory_id: Option<Uuid>) -> Self {
        self.category_id = Some(category_id);
        self.subcategory_id = subcategory_id;
        self
    }

    /// Materializes a generated occurrence as a stored record.
    pub fn from_occurrence(occurrence: &NewTransaction) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: occurrence.user_id,
            kind: occurrence.kind,
            amount: occurrence.amount,
            description: occurrence.description.clone(),
            date: occurrence.date,
            account_id: occurrence.account_id,
            category_id: occurrence.category_id,
            subcategory_id: occurrence.subcategory_id,
            status: TransactionStatus::Completed,
            is_recurring: occurrence.is_recurring,
            recurring_interval: None,
            next_recurring_date: None,
            last_processed: None,
        }
    }

    pub fn recurring_view(&self) -> RecurringTransaction {
        RecurringTransaction::from(self)
    }
}

/// The slice of a transaction record the recurrence engine reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
    pub description: String,
    pub status: TransactionStatus,
    pub is_recurring: bool,
    pub last_processed: Option<DateTime<Utc>>,
    pub next_recurring_date: Option<DateTime<Utc>>,
    pub recurring_interval: Option<RecurringInterval>,
}

impl From<&Transaction> for RecurringTransaction {
    fn from(txn: &Transaction) -> Self {
        Self {
            id: txn.id,
            user_id: txn.user_id,
            kind: txn.kind,
            amount: txn.amount,
            account_id: txn.account_id,
            category_id: txn.category_id,
            subcategory_id: txn.subcategory_id,
            description: txn.description.clone(),
            status: txn.status,
            is_recurring: txn.is_recurring,
            last_processed: txn.last_processed,
            next_recurring_date: txn.next_recurring_date,
            recurring_interval: txn.recurring_interval.clone(),
        }
    }
}

/// Creation request for a concrete occurrence produced by a recurrence step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    pub description: String,
    pub date: DateTime<Utc>,
    pub account_id: Uuid,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
    pub is_recurring: bool,
}

impl NewTransaction {
    pub(crate) fn occurrence_of(spec: &RecurringTransaction, now: DateTime<Utc>) -> Self {
        Self {
            kind: spec.kind,
            amount: spec.amount,
            description: format!("{}{}", spec.description, RECURRING_SUFFIX),
            date: now,
            account_id: spec.account_id,
            user_id: spec.user_id,
            category_id: spec.category_id,
            subcategory_id: spec.subcategory_id,
            is_recurring: false,
        }
    }
}
