//! Month, year and absolute full-date units.

use chrono::DateTime;

use super::{or_last, Dimension, Extent, Moment};

pub(crate) struct Month;

impl Dimension for Month {
    fn name(&self) -> &'static str {
        "month"
    }

    fn range(&self) -> i64 {
        2_629_740
    }

    fn val(&self, d: &Moment) -> i64 {
        d.month()
    }

    fn is_valid(&self, d: &Moment, value: i64) -> bool {
        d.month() == or_last(value, 12)
    }

    fn extent(&self, _d: &Moment) -> Extent {
        Extent::new(1, 12)
    }

    fn start(&self, d: &Moment) -> Moment {
        d.day_start(d.year(), d.month(), 1)
    }

    fn end(&self, d: &Moment) -> Moment {
        d.month_end(d.year(), d.month())
    }

    fn next(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = if value > 12 { 1 } else { or_last(value, 12) };
        let carry = if value > d.month() { 0 } else { 1 };
        Some(d.day_start(d.year() + carry, value, 1))
    }

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = if value > 12 { 12 } else { or_last(value, 12) };
        let carry = if value >= d.month() { 1 } else { 0 };
        Some(d.month_end(d.year() - carry, value))
    }
}

/// Calendar year, limited to the range where the `year % 4` leap rule holds.
pub(crate) struct Year;

impl Year {
    pub(crate) const FIRST: i64 = 1970;
    pub(crate) const LAST: i64 = 2099;
}

impl Dimension for Year {
    fn name(&self) -> &'static str {
        "year"
    }

    fn range(&self) -> i64 {
        31_556_900
    }

    fn val(&self, d: &Moment) -> i64 {
        d.year()
    }

    fn extent(&self, _d: &Moment) -> Extent {
        Extent::new(Year::FIRST, Year::LAST)
    }

    fn start(&self, d: &Moment) -> Moment {
        d.day_start(d.year(), 1, 1)
    }

    fn end(&self, d: &Moment) -> Moment {
        d.day_end(d.year(), 12, 31)
    }

    fn next(&self, d: &Moment, value: i64) -> Option<Moment> {
        (value > d.year() && value <= Year::LAST).then(|| d.day_start(value, 1, 1))
    }

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment> {
        (value < d.year() && value >= Year::FIRST).then(|| d.day_end(value, 12, 31))
    }
}

/// One exact instant, given as Unix milliseconds.
pub(crate) struct FullDate;

impl FullDate {
    /// 3000-01-01T00:00:00Z.
    pub(crate) const LAST: i64 = 32_503_680_000_000;

    fn at(d: &Moment, millis: i64) -> Option<Moment> {
        DateTime::from_timestamp_millis(millis).map(|at| d.derive(at))
    }
}

impl Dimension for FullDate {
    fn name(&self) -> &'static str {
        "full date"
    }

    fn range(&self) -> i64 {
        1
    }

    fn val(&self, d: &Moment) -> i64 {
        d.timestamp_millis()
    }

    fn extent(&self, _d: &Moment) -> Extent {
        Extent::new(0, FullDate::LAST)
    }

    fn start(&self, d: &Moment) -> Moment {
        d.clone()
    }

    fn end(&self, d: &Moment) -> Moment {
        d.clone()
    }

    fn next(&self, d: &Moment, value: i64) -> Option<Moment> {
        if self.val(d) < value {
            FullDate::at(d, value)
        } else {
            None
        }
    }

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment> {
        if self.val(d) > value {
            FullDate::at(d, value)
        } else {
            None
        }
    }
}
