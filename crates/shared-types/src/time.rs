//! # UTC Day Arithmetic
//!
//! A draw date is a UTC calendar day. Its entropy target is the midnight
//! that opens the day, and tickets bought during day `D - 1` play in `D`.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use parking_lot::RwLock;

use crate::entities::Timestamp;

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Default time source using system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests and backfills.
#[derive(Debug)]
pub struct FixedTimeSource {
    now: RwLock<DateTime<Utc>>,
}

impl FixedTimeSource {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now += by;
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}

/// Midnight (UTC) opening `date`.
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Entropy target for a draw date: unix seconds of its opening midnight.
///
/// Dates before the epoch clamp to zero.
pub fn draw_timestamp(date: NaiveDate) -> Timestamp {
    day_start(date).timestamp().max(0) as Timestamp
}

/// The UTC day containing `now`.
pub fn current_draw_date(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

/// The draw date a ticket bought at `now` plays in: the next UTC midnight.
pub fn next_draw_date(now: DateTime<Utc>) -> NaiveDate {
    let today = now.date_naive();
    today.succ_opt().unwrap_or(today)
}

/// Next UTC midnight strictly after `now`.
pub fn next_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    day_start(current_draw_date(now)) + Duration::days(1)
}
