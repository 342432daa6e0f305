//! Recurrence scheduling for recurring transactions.
//!
//! Everything here is a pure function of the recurring record and the supplied
//! timestamp. Callers persist the returned [`RecurrenceResult`] atomically.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::{
    time_interval::RecurringInterval,
    transaction::{NewTransaction, RecurringTransaction, TransactionStatus},
};
use crate::errors::RecurrenceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecurrenceState {
    Pending,
    Due,
}

impl RecurrenceState {
    pub fn classify(spec: &RecurringTransaction, now: DateTime<Utc>) -> RecurrenceState {
        if is_due(spec, now) {
            RecurrenceState::Due
        } else {
            RecurrenceState::Pending
        }
    }
}

/// Writes needed to apply one recurrence step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurrenceResult {
    pub transaction_id: Uuid,
    pub should_apply: bool,
    pub new_occurrence: Option<NewTransaction>,
    pub balance_delta: Decimal,
    pub updated_last_processed: DateTime<Utc>,
    pub updated_next_recurring_date: Option<DateTime<Utc>>,
}

/// True when the record was never processed or its next date has arrived.
pub fn is_due(spec: &RecurringTransaction, now: DateTime<Utc>) -> bool {
    if spec.last_processed.is_none() {
        return true;
    }
    // A processed record without a pointer is repaired on the next pass.
    spec.next_recurring_date.map_or(true, |next| next <= now)
}

pub fn next_occurrence(
    from: DateTime<Utc>,
    interval: RecurringInterval,
) -> Result<DateTime<Utc>, RecurrenceError> {
    interval.next_date(from)
}

/// Computes the occurrence, balance change and pointer update for a due record.
///
/// The next date is measured from `now`, not from the previous pointer, so a
/// record that was missed for several periods produces a single occurrence.
pub fn apply_recurrence(
    spec: &RecurringTransaction,
    now: DateTime<Utc>,
) -> Result<RecurrenceResult, RecurrenceError> {
    if !spec.is_recurring {
        return Err(RecurrenceError::InvariantViolation(format!(
            "transaction {} is not recurring",
            spec.id
        )));
    }
    if !is_due(spec, now) {
        return Err(RecurrenceError::InvariantViolation(format!(
            "transaction {} is not due at {}",
            spec.id, now
        )));
    }
    let interval = spec.recurring_interval.clone().ok_or_else(|| {
        RecurrenceError::InvariantViolation(format!(
            "recurring transaction {} has no interval",
            spec.id
        ))
    })?;
    if spec.amount < Decimal::ZERO {
        return Err(RecurrenceError::InvariantViolation(format!(
            "recurring transaction {} has negative amount {}",
            spec.id, spec.amount
        )));
    }

    let next = next_occurrence(now, interval)?;

    Ok(RecurrenceResult {
        transaction_id: spec.id,
        should_apply: true,
        new_occurrence: Some(NewTransaction::occurrence_of(spec, now)),
        balance_delta: spec.kind.balance_delta(spec.amount),
        updated_last_processed: now,
        updated_next_recurring_date: Some(next),
    })
}

/// Keeps settled recurring records that are due at `now`.
pub fn select_due<'a, I>(candidates: I, now: DateTime<Utc>) -> Vec<&'a RecurringTransaction>
where
    I: IntoIterator<Item = &'a RecurringTransaction>,
{
    candidates
        .into_iter()
        .filter(|spec| spec.is_recurring)
        .filter(|spec| spec.status == TransactionStatus::Completed)
        .filter(|spec| is_due(spec, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::transaction::TransactionType;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn spec(kind: TransactionType, amount: Decimal) -> RecurringTransaction {
        RecurringTransaction {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind,
            amount,
            account_id: Uuid::new_v4(),
            category_id: Some(Uuid::new_v4()),
            subcategory_id: None,
            description: "Rent".into(),
            status: TransactionStatus::Completed,
            is_recurring: true,
            last_processed: None,
            next_recurring_date: None,
            recurring_interval: Some(RecurringInterval::Monthly),
        }
    }

    #[test]
    fn never_processed_is_always_due() {
        let record = spec(TransactionType::Expense, dec!(10));
        assert!(is_due(&record, at(1999, 1, 1)));
        assert!(is_due(&record, at(2099, 12, 31)));
    }

    #[test]
    fn due_boundary_is_inclusive() {
        let mut record = spec(TransactionType::Expense, dec!(10));
        record.last_processed = Some(at(2026, 1, 15));
        record.next_recurring_date = Some(at(2026, 2, 15));

        assert!(!is_due(&record, at(2026, 2, 14)));
        assert!(is_due(&record, at(2026, 2, 15)));
        assert!(is_due(&record, at(2026, 3, 1)));
        assert_eq!(
            RecurrenceState::classify(&record, at(2026, 2, 1)),
            RecurrenceState::Pending
        );
    }

    #[test]
    fn balance_delta_follows_type() {
        let expense = apply_recurrence(&spec(TransactionType::Expense, dec!(50.00)), at(2026, 1, 1))
            .unwrap();
        let income = apply_recurrence(&spec(TransactionType::Income, dec!(50.00)), at(2026, 1, 1))
            .unwrap();
        assert_eq!(expense.balance_delta, dec!(-50.00));
        assert_eq!(income.balance_delta, dec!(50.00));
    }

    #[test]
    fn occurrence_copies_template_fields() {
        let record = spec(TransactionType::Expense, dec!(20));
        let result = apply_recurrence(&record, at(2026, 1, 15)).unwrap();
        let occurrence = result.new_occurrence.expect("occurrence");

        assert_eq!(occurrence.description, "Rent (Recurring)");
        assert_eq!(occurrence.category_id, record.category_id);
        assert_eq!(occurrence.account_id, record.account_id);
        assert_eq!(occurrence.date, at(2026, 1, 15));
        assert!(!occurrence.is_recurring);
    }

    #[test]
    fn rejects_records_that_are_not_due() {
        let mut record = spec(TransactionType::Income, dec!(5));
        record.last_processed = Some(at(2026, 1, 1));
        record.next_recurring_date = Some(at(2026, 2, 1));

        let err = apply_recurrence(&record, at(2026, 1, 20)).unwrap_err();
        assert!(matches!(err, RecurrenceError::InvariantViolation(_)));
    }

    #[test]
    fn missing_interval_is_an_invariant_violation() {
        let mut record = spec(TransactionType::Income, dec!(5));
        record.recurring_interval = None;
        let err = apply_recurrence(&record, at(2026, 1, 20)).unwrap_err();
        assert!(matches!(err, RecurrenceError::InvariantViolation(_)));
    }

    #[test]
    fn custom_interval_produces_no_result() {
        let mut record = spec(TransactionType::Income, dec!(5));
        record.recurring_interval = Some(RecurringInterval::Custom);
        let err = apply_recurrence(&record, at(2026, 1, 20)).unwrap_err();
        assert!(matches!(err, RecurrenceError::UnsupportedInterval(_)));
    }

    #[test]
    fn select_due_skips_unsettled_and_pending_records() {
        let now = at(2026, 3, 1);
        let due = spec(TransactionType::Expense, dec!(1));
        let mut pending = spec(TransactionType::Expense, dec!(1));
        pending.last_processed = Some(at(2026, 2, 20));
        pending.next_recurring_date = Some(at(2026, 3, 20));
        let mut unsettled = spec(TransactionType::Expense, dec!(1));
        unsettled.status = TransactionStatus::Pending;
        let mut one_off = spec(TransactionType::Expense, dec!(1));
        one_off.is_recurring = false;

        let all = vec![due.clone(), pending, unsettled, one_off];
        let selected = select_due(&all, now);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, due.id);
    }
}
