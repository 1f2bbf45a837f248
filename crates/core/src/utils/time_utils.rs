//! Clock abstraction and date helpers.
//!
//! Every date-sensitive operation in the engine (future-date checks, the
//! default as-of date, the ten-year horizon) asks an injected [`Clock`] for
//! "today" instead of reading the wall clock directly.

use chrono::{Local, Months, NaiveDate, NaiveDateTime, Utc};

/// Source of the current instant and the current business date.
pub trait Clock: Send + Sync {
    /// Current instant in UTC, used to stamp `created_at` on insert.
    fn now(&self) -> NaiveDateTime;

    /// The current business date, used for future-date checks and as-of defaults.
    fn today(&self) -> NaiveDate;

    /// Clock name for debugging.
    fn name(&self) -> &str {
        "Clock"
    }
}

/// Wall clock. `today` follows the host's local calendar date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}

/// Clock pinned to a fixed instant, for deterministic tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Fixed clock at midday of the given date.
    pub fn on(date: NaiveDate) -> Self {
        Self {
            now: date.and_hms_opt(12, 0, 0).unwrap_or_default(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.now.date()
    }

    fn name(&self) -> &str {
        "FixedClock"
    }
}

/// Returns `date` shifted back by whole years, clamping to month end (Feb 29 -> Feb 28).
pub fn years_before(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN)
}

/// Returns `date` shifted back by whole months.
pub fn months_before(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}
