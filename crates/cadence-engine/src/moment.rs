//! Per-instant calculation context.
//!
//! A [`Moment`] pairs an absolute instant with the [`TimeReference`] it is
//! read through. Calendar fields are computed once when the moment is
//! created; the more expensive derived values (week numbers, day of year,
//! week extents) are memoized lazily in the moment itself. A moment is a
//! short-lived value: every step of a search produces a new one, so a cache
//! never outlives the instant it describes. Callers of the public search API
//! only ever see plain `DateTime<Utc>` values.

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::calendar::{self, CivilFields, TimeReference};

/// Derived values worth caching per instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Memo {
    DayOfYear,
    WeekOfMonth,
    WeekOfMonthMax,
    WeekOfYear,
    WeekOfYearMax,
}

const MEMO_SLOTS: usize = 5;

impl Memo {
    fn slot(self) -> usize {
        match self {
            Memo::DayOfYear => 0,
            Memo::WeekOfMonth => 1,
            Memo::WeekOfMonthMax => 2,
            Memo::WeekOfYear => 3,
            Memo::WeekOfYearMax => 4,
        }
    }
}

/// An instant viewed through a time reference, with its own field cache.
pub struct Moment {
    at: DateTime<Utc>,
    reference: TimeReference,
    fields: CivilFields,
    memo: [Cell<Option<i64>>; MEMO_SLOTS],
}

impl Moment {
    pub fn new(at: DateTime<Utc>, reference: TimeReference) -> Self {
        Moment {
            at,
            reference,
            fields: CivilFields::of(&at, reference),
            memo: Default::default(),
        }
    }

    /// A moment read in UTC.
    pub fn utc(at: DateTime<Utc>) -> Self {
        Moment::new(at, TimeReference::Utc)
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    pub fn reference(&self) -> TimeReference {
        self.reference
    }

    pub fn fields(&self) -> &CivilFields {
        &self.fields
    }

    pub fn year(&self) -> i64 {
        self.fields.year
    }

    pub fn month(&self) -> i64 {
        self.fields.month
    }

    pub fn day(&self) -> i64 {
        self.fields.day
    }

    /// Day of week, Sunday = 0.
    pub fn weekday(&self) -> i64 {
        self.fields.weekday
    }

    pub fn hour(&self) -> i64 {
        self.fields.hour
    }

    pub fn minute(&self) -> i64 {
        self.fields.minute
    }

    pub fn second(&self) -> i64 {
        self.fields.second
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.at.timestamp_millis()
    }

    /// A fresh moment at `at`, read through the same reference.
    pub fn derive(&self, at: DateTime<Utc>) -> Moment {
        Moment::new(at, self.reference)
    }

    /// A fresh moment built from (possibly overflowing) calendar fields.
    pub fn build(&self, year: i64, month: i64, day: i64, hour: i64, minute: i64, second: i64) -> Moment {
        self.derive(calendar::build(
            self.reference,
            year,
            month,
            day,
            hour,
            minute,
            second,
        ))
    }

    /// First second of a civil day.
    pub fn day_start(&self, year: i64, month: i64, day: i64) -> Moment {
        self.build(year, month, day, 0, 0, 0)
    }

    /// Last second of a civil day.
    pub fn day_end(&self, year: i64, month: i64, day: i64) -> Moment {
        self.build(year, month, day, 23, 59, 59)
    }

    /// Last second of a civil month.
    pub fn month_end(&self, year: i64, month: i64) -> Moment {
        let (year, month) = calendar::normalize_month(year, month);
        self.day_end(year, month, calendar::days_in_month(year, month))
    }

    /// This instant shifted by whole seconds, saturating at chrono's range.
    pub fn plus_seconds(&self, seconds: i64) -> Moment {
        let at = Duration::try_seconds(seconds)
            .and_then(|delta| self.at.checked_add_signed(delta))
            .unwrap_or(if seconds < 0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            });
        self.derive(at)
    }

    /// Read a memoized derived value, computing it on first use.
    pub(crate) fn cached(&self, memo: Memo, compute: impl FnOnce() -> i64) -> i64 {
        let cell = &self.memo[memo.slot()];
        if let Some(value) = cell.get() {
            return value;
        }
        let value = compute();
        cell.set(Some(value));
        value
    }
}

impl Clone for Moment {
    fn clone(&self) -> Self {
        // The cache is per instance; a clone starts cold.
        Moment::new(self.at, self.reference)
    }
}

impl fmt::Debug for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Moment")
            .field("at", &self.at.to_rfc3339())
            .field("reference", &self.reference)
            .finish()
    }
}

impl PartialEq for Moment {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at
    }
}

impl Eq for Moment {}

impl PartialOrd for Moment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Moment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.at.cmp(&other.at)
    }
}
