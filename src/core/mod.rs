//! Scheduling services that drive the recurrence engine against a store.

pub mod retry;
pub mod scheduler;
pub mod throttle;
pub mod time;
pub mod utils;

pub use retry::RetryPolicy;
pub use scheduler::{ItemFailure, PassReport, RecurrenceScheduler};
pub use throttle::UserThrottle;
pub use time::{Clock, FixedClock, SystemClock};
