//! Second, minute, hour and time-of-day.
//!
//! Forward steps are done in absolute seconds where possible. In a zone
//! with daylight saving, a step that does not move forward is retried with
//! the target bumped past the repeated or skipped interval.

use super::{Dimension, Extent, Moment};

/// Seconds in the widest DST shift that forward steps compensate for.
const DST_SHIFT: i64 = 7_200;

pub(crate) struct Second;

impl Dimension for Second {
    fn name(&self) -> &'static str {
        "second"
    }

    fn range(&self) -> i64 {
        1
    }

    fn val(&self, d: &Moment) -> i64 {
        d.second()
    }

    fn extent(&self, _d: &Moment) -> Extent {
        Extent::new(0, 59)
    }

    fn start(&self, d: &Moment) -> Moment {
        d.clone()
    }

    fn end(&self, d: &Moment) -> Moment {
        d.clone()
    }

    fn next(&self, d: &Moment, value: i64) -> Option<Moment> {
        let inc = step(value, d.second(), 59);
        let next = d.plus_seconds(inc);
        if !d.reference().is_utc() && next <= *d {
            return Some(d.plus_seconds(inc + DST_SHIFT));
        }
        Some(next)
    }

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = value.min(59);
        let carry = if value >= d.second() { -1 } else { 0 };
        Some(d.build(d.year(), d.month(), d.day(), d.hour(), d.minute() + carry, value))
    }
}

pub(crate) struct Minute;

impl Dimension for Minute {
    fn name(&self) -> &'static str {
        "minute"
    }

    fn range(&self) -> i64 {
        60
    }

    fn val(&self, d: &Moment) -> i64 {
        d.minute()
    }

    fn extent(&self, _d: &Moment) -> Extent {
        Extent::new(0, 59)
    }

    fn start(&self, d: &Moment) -> Moment {
        d.build(d.year(), d.month(), d.day(), d.hour(), d.minute(), 0)
    }

    fn end(&self, d: &Moment) -> Moment {
        d.build(d.year(), d.month(), d.day(), d.hour(), d.minute(), 59)
    }

    fn next(&self, d: &Moment, value: i64) -> Option<Moment> {
        let inc = step(value, d.minute(), 59);
        let next = d.plus_seconds(inc * 60 - d.second());
        if !d.reference().is_utc() && next <= *d {
            return Some(d.plus_seconds((inc + 120) * 60 - d.second()));
        }
        Some(next)
    }

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = value.min(59);
        let carry = if value >= d.minute() { -1 } else { 0 };
        Some(d.build(d.year(), d.month(), d.day(), d.hour() + carry, value, 59))
    }
}

pub(crate) struct Hour;

impl Dimension for Hour {
    fn name(&self) -> &'static str {
        "hour"
    }

    fn range(&self) -> i64 {
        3_600
    }

    fn val(&self, d: &Moment) -> i64 {
        d.hour()
    }

    fn extent(&self, _d: &Moment) -> Extent {
        Extent::new(0, 23)
    }

    fn start(&self, d: &Moment) -> Moment {
        d.build(d.year(), d.month(), d.day(), d.hour(), 0, 0)
    }

    fn end(&self, d: &Moment) -> Moment {
        d.build(d.year(), d.month(), d.day(), d.hour(), 59, 59)
    }

    fn next(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = if value > 23 { 0 } else { value };
        let carry = if value <= d.hour() { 1 } else { 0 };
        let next = d.build(d.year(), d.month(), d.day() + carry, value, 0, 0);
        if !d.reference().is_utc() && next <= *d {
            return Some(next.build(next.year(), next.month(), next.day(), value + 1, 0, 0));
        }
        Some(next)
    }

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = value.min(23);
        let carry = if value >= d.hour() { -1 } else { 0 };
        Some(d.build(d.year(), d.month(), d.day() + carry, value, 59, 59))
    }
}

pub(crate) struct Time;

impl Time {
    pub(crate) const LAST: i64 = 86_399;
}

impl Dimension for Time {
    fn name(&self) -> &'static str {
        "time"
    }

    fn range(&self) -> i64 {
        1
    }

    fn val(&self, d: &Moment) -> i64 {
        d.hour() * 3_600 + d.minute() * 60 + d.second()
    }

    fn extent(&self, _d: &Moment) -> Extent {
        Extent::new(0, Time::LAST)
    }

    fn start(&self, d: &Moment) -> Moment {
        d.clone()
    }

    fn end(&self, d: &Moment) -> Moment {
        d.clone()
    }

    fn next(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = if value > Time::LAST { 0 } else { value };
        let carry = if value <= self.val(d) { 1 } else { 0 };
        let next = d.build(d.year(), d.month(), d.day() + carry, 0, 0, value);
        if !d.reference().is_utc() && next < *d {
            return Some(next.build(
                next.year(),
                next.month(),
                next.day(),
                next.hour(),
                next.minute(),
                value + DST_SHIFT,
            ));
        }
        Some(next)
    }

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = value.min(Time::LAST);
        let carry = if value >= self.val(d) { -1 } else { 0 };
        Some(d.build(d.year(), d.month(), d.day() + carry, 0, 0, value))
    }
}

/// Distance from `cur` forward to `value` on a `0..=max` dial; a full turn
/// when they are equal, and to the top of the dial when `value` is out of range.
fn step(value: i64, cur: i64, max: i64) -> i64 {
    let turn = max + 1;
    if value > max {
        turn - cur
    } else if value <= cur {
        turn - cur + value
    } else {
        value - cur
    }
}
