use std::thread;

use chrono::{DateTime, Utc};

/// Clock abstracts access to the current timestamp so scheduler passes remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Blocks until `deadline` has passed. Returns at once for deadlines already reached.
    fn wait_until(&self, deadline: DateTime<Utc>) {
        if let Ok(delay) = (deadline - self.now()).to_std() {
            thread::sleep(delay);
        }
    }
}

/// Real-time clock backed by the system UTC time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant. Waiting never blocks.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }

    fn wait_until(&self, _deadline: DateTime<Utc>) {}
}
