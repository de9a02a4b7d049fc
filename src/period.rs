//! Calendar periods and the clock they are read from.
//!
//! Habit buckets and expenses are keyed by `(month, year)` of the server
//! clock at call time. Months are zero-based (January is 0), which is the
//! convention every stored record and `?month=` query uses. The clock is injected through [`Clock`] so tests can
//! move between months deterministically.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("month must be between 0 and 11, got {0}")]
    InvalidMonth(i32),
    #[error("year {0} is out of range")]
    InvalidYear(i32),
}

/// A calendar month. `month` is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: i32,
}

impl Period {
    pub fn new(month: i32, year: i32) -> Result<Self, PeriodError> {
        if !(0..=11).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        if !(1970..=9999).contains(&year) {
            return Err(PeriodError::InvalidYear(year));
        }
        Ok(Self { year, month })
    }

    pub fn containing(instant: DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            // month0() is 0..=11
            month: instant.month0() as i32,
        }
    }

    #[cfg(test)]
    pub fn next(self) -> Self {
        if self.month == 11 {
            Self { year: self.year + 1, month: 0 }
        } else {
            Self { month: self.month + 1, ..self }
        }
    }

    #[cfg(test)]
    pub fn previous(self) -> Self {
        if self.month == 0 {
            Self { year: self.year - 1, month: 11 }
        } else {
            Self { month: self.month - 1, ..self }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month + 1)
    }
}

/// Anything stored under a period
pub trait Bucketed {
    fn period(&self) -> Period;
}

/// The bucket matching `period` exactly, if one exists
pub fn find_bucket<T: Bucketed>(buckets: &[T], period: Period) -> Option<&T> {
    buckets.iter().find(|b| b.period() == period)
}

pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;

    fn current_period(&self) -> Period {
        Period::containing(self.now())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: RwLock::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        match self.now.write() {
            Ok(mut guard) => *guard = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
