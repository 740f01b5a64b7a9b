//! Observing-night arithmetic.
//!
//! A SALT observing night is the 24-hour window starting at 12:00 UTC on the
//! night's calendar date. Files written shortly after midnight therefore
//! belong to the previous calendar day's night.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One observing night, identified by its starting calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Night(NaiveDate);

impl Night {
    pub fn new(date: NaiveDate) -> Self {
        Night(date)
    }

    /// The night owning the given instant.
    pub fn of(instant: DateTime<Utc>) -> Self {
        Night((instant - Duration::hours(12)).date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Start of the night window: 12:00 UTC on the night's date.
    pub fn start(&self) -> DateTime<Utc> {
        self.0
            .and_time(NaiveTime::from_hms_opt(12, 0, 0).expect("valid time"))
            .and_utc()
    }

    /// Exclusive end of the night window, 24 hours after [`start`](Night::start).
    pub fn end(&self) -> DateTime<Utc> {
        self.start() + Duration::hours(24)
    }

    /// Whether the given instant falls inside this night's window.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start() <= instant && instant < self.end()
    }
}

impl fmt::Display for Night {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
