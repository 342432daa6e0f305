use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::RecurrenceError;

/// Cadence at which a recurring transaction spawns occurrences.
///
/// Stored as its SCREAMING_SNAKE_CASE wire name. Names outside the known set
/// load as [`RecurringInterval::Unrecognized`] so one bad record cannot make a
/// whole ledger unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecurringInterval {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// Displayed by frontends but has no advancement rule.
    Custom,
    /// Raw wire value that matched no known interval.
    Unrecognized(String),
}

impl RecurringInterval {
    /// Advances `from` by exactly one interval step using calendar arithmetic.
    ///
    /// Month and year steps clamp the day to the last valid day of the target
    /// month (Jan 31 + 1 month lands on Feb 28 or 29). Time of day is preserved.
    pub fn next_date(&self, from: DateTime<Utc>) -> Result<DateTime<Utc>, RecurrenceError> {
        let date = from.date_naive();
        let next = match self {
            RecurringInterval::Daily => date.checked_add_days(Days::new(1)),
            RecurringInterval::Weekly => date.checked_add_days(Days::new(7)),
            RecurringInterval::Monthly => shift_month(date, 1),
            RecurringInterval::Yearly => shift_year(date, 1),
            RecurringInterval::Custom | RecurringInterval::Unrecognized(_) => {
                return Err(RecurrenceError::UnsupportedInterval(self.label().into()))
            }
        }
        .ok_or_else(|| {
            RecurrenceError::DateOutOfRange(format!("{} after {}", self.label(), from))
        })?;
        Ok(next.and_time(from.time()).and_utc())
    }

    pub fn label(&self) -> &str {
        match self {
            RecurringInterval::Daily => "Daily",
            RecurringInterval::Weekly => "Weekly",
            RecurringInterval::Monthly => "Monthly",
            RecurringInterval::Yearly => "Yearly",
            RecurringInterval::Custom => "Custom",
            RecurringInterval::Unrecognized(value) => value,
        }
    }

    pub fn wire_name(&self) -> &str {
        match self {
            RecurringInterval::Daily => "DAILY",
            RecurringInterval::Weekly => "WEEKLY",
            RecurringInterval::Monthly => "MONTHLY",
            RecurringInterval::Yearly => "YEARLY",
            RecurringInterval::Custom => "CUSTOM",
            RecurringInterval::Unrecognized(value) => value,
        }
    }
}

impl Serialize for RecurringInterval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_name())
    }
}

impl<'de> Deserialize<'de> for RecurringInterval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw
            .parse()
            .unwrap_or(RecurringInterval::Unrecognized(raw)))
    }
}

impl fmt::Display for RecurringInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RecurringInterval {
    type Err = RecurrenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Ok(RecurringInterval::Daily),
            "WEEKLY" => Ok(RecurringInterval::Weekly),
            "MONTHLY" => Ok(RecurringInterval::Monthly),
            "YEARLY" => Ok(RecurringInterval::Yearly),
            "CUSTOM" => Ok(RecurringInterval::Custom),
            _ => Err(RecurrenceError::UnsupportedInterval(value.to_string())),
        }
    }
}

fn shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    let day = date.day().min(days_in_month(year, month as u32)?);
    NaiveDate::from_ymd_opt(year, month as u32, day)
}

fn shift_year(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = date.year().checked_add(years)?;
    let month = date.month();
    let day = date.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    first_next.pred_opt().map(|last| last.day())
}
