#![doc(test(attr(deny(warnings))))]

//! Trakeo core computes recurring-transaction schedules and applies due
//! occurrences to a ledger store, one pass per scheduler trigger.

pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Trakeo core tracing initialized.");
    });
}
