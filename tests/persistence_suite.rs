mod common;

use std::fs;

use common::{at, temp_dir, Fixture};
use rust_decimal_macros::dec;
use trakeo_core::{
    errors::StoreError,
    ledger::{apply_recurrence, RecurringInterval, TransactionType},
    storage::{json_backend::save_snapshot_to_path, JsonStore, RecurrenceStore},
};
use uuid::Uuid;

#[test]
fn apply_is_persisted_to_the_ledger_file() {
    let mut fixture = Fixture::new(dec!(250.00));
    let salary = fixture.recurring(
        TransactionType::Income,
        dec!(1200.50),
        "Salary",
        RecurringInterval::Monthly,
        at(2026, 1, 1),
    );
    let path = temp_dir().join("ledger.json");
    {
        let store = JsonStore::open(&path).expect("open");
        assert!(store.snapshot().unwrap().transactions.is_empty());
    }
    save_snapshot_to_path(&fixture.snapshot, &path).expect("seed");

    let store = JsonStore::open(&path).expect("reopen");
    let spec = store.find(fixture.user_id, salary).unwrap().expect("template");
    let result = apply_recurrence(&spec, at(2026, 1, 31)).unwrap();
    store.apply(&spec, &result).expect("apply");

    let reloaded = JsonStore::open(&path).expect("reload").snapshot().unwrap();
    assert_eq!(Fixture::balance(&reloaded, fixture.account_id), dec!(1450.50));
    assert_eq!(reloaded.transactions.len(), 2);
    let template = reloaded.transaction(salary).unwrap();
    assert_eq!(template.next_recurring_date, Some(at(2026, 2, 28)));

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"MONTHLY\""));
    assert!(raw.contains("\"1200.50\""));
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn failed_apply_leaves_file_untouched() {
    let mut fixture = Fixture::new(dec!(10));
    let gym = fixture.recurring(
        TransactionType::Expense,
        dec!(30),
        "Gym",
        RecurringInterval::Monthly,
        at(2026, 1, 1),
    );
    let path = temp_dir().join("ledger.json");
    save_snapshot_to_path(&fixture.snapshot, &path).expect("seed");
    let before = fs::read(&path).unwrap();

    let store = JsonStore::open(&path).unwrap();
    let mut spec = store.find(fixture.user_id, gym).unwrap().unwrap();
    spec.account_id = Uuid::new_v4();
    let result = apply_recurrence(&spec, at(2026, 1, 2)).unwrap();

    let err = store.apply(&spec, &result).unwrap_err();
    assert!(matches!(err, StoreError::AccountNotFound(id) if id == spec.account_id));
    assert_eq!(fs::read(&path).unwrap(), before);
    assert_eq!(store.snapshot().unwrap(), fixture.snapshot);
}

#[test]
fn lookups_are_scoped_to_the_owner() {
    let mut fixture = Fixture::new(dec!(0));
    let id = fixture.recurring(
        TransactionType::Expense,
        dec!(1),
        "Tea",
        RecurringInterval::Daily,
        at(2026, 1, 1),
    );
    let store = JsonStore::in_memory(fixture.snapshot);
    assert!(store.find(fixture.user_id, id).unwrap().is_some());
    assert!(store.find(Uuid::new_v4(), id).unwrap().is_none());
}

#[test]
fn corrupt_ledger_file_is_reported() {
    let path = temp_dir().join("ledger.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(JsonStore::open(&path), Err(StoreError::Serde(_))));
}
