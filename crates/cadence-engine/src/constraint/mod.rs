//! Constraint units: one temporal dimension each.
//!
//! Every unit answers the same questions about an instant: its value in
//! this dimension, whether a target value is satisfied, the valid extent in
//! the enclosing period, the boundaries of its own period, and how to jump
//! to the next or previous period holding a target value.
//!
//! | Key | Long key | Unit | Values |
//! |-----|----------|------|--------|
//! | `s` | `second` | [`Unit::Second`] | 0-59 |
//! | `m` | `minute` | [`Unit::Minute`] | 0-59 |
//! | `h` | `hour` | [`Unit::Hour`] | 0-23 |
//! | `t` | `time` | [`Unit::Time`] | 0-86399, seconds since midnight |
//! | `D` | `day` | [`Unit::Day`] | 1-31, 0 = last day |
//! | `dw`, `d` | `dayOfWeek` | [`Unit::DayOfWeek`] | 1-7 from Sunday |
//! | `dc` | `dayOfWeekCount` | [`Unit::DayOfWeekCount`] | 1-5, 0 = last |
//! | `dy` | `dayOfYear` | [`Unit::DayOfYear`] | 1-366, 0 = last |
//! | `wm` | `weekOfMonth` | [`Unit::WeekOfMonth`] | 1-6, 0 = last |
//! | `wy` | `weekOfYear` | [`Unit::WeekOfYear`] | 1-53 ISO, 0 = last |
//! | `M` | `month` | [`Unit::Month`] | 1-12 |
//! | `Y` | `year` | [`Unit::Year`] | 1970-2099 |
//! | `fd` | `fullDate` | [`Unit::FullDate`] | Unix milliseconds |

mod clock;
mod day;
mod period;
mod week;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calendar::SUPPORTED_YEARS;
use crate::error::CadenceError;
use crate::moment::Moment;
use crate::sequence::Extent;

pub(crate) use clock::{Hour, Minute, Second, Time};
pub(crate) use day::{Day, DayOfWeek, DayOfWeekCount, DayOfYear};
pub(crate) use period::{FullDate, Month, Year};
pub(crate) use week::{WeekOfMonth, WeekOfYear};

// ── Public trait ────────────────────────────────────────────────────────────

/// A temporal dimension that a schedule can restrict.
///
/// Only [`unit`](Constraint::unit), [`is_valid`](Constraint::is_valid),
/// [`next`](Constraint::next) and [`prev`](Constraint::prev) are required.
/// Value extraction and period boundaries default to the underlying unit,
/// which is what wrappers such as [`After`](crate::modifier::After) rely on.
///
/// `next` returns the first instant of the next period holding `value`, and
/// `prev` the last instant of the previous one. Both return `None` when no
/// such period exists (for example a year outside 1970-2099) or when the
/// step leaves [`SUPPORTED_YEARS`](crate::calendar::SUPPORTED_YEARS).
pub trait Constraint: Send + Sync {
    /// The dimension this constraint measures.
    fn unit(&self) -> Unit;

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(self.unit().dimension().name())
    }

    /// Approximate seconds spanned by one period. Only used for ordering.
    fn range(&self) -> i64 {
        self.unit().dimension().range()
    }

    fn val(&self, d: &Moment) -> i64 {
        self.unit().dimension().val(d)
    }

    fn is_valid(&self, d: &Moment, value: i64) -> bool;

    fn extent(&self, d: &Moment) -> Extent {
        self.unit().dimension().extent(d)
    }

    fn start(&self, d: &Moment) -> Moment {
        self.unit().dimension().start(d)
    }

    fn end(&self, d: &Moment) -> Moment {
        self.unit().dimension().end(d)
    }

    fn next(&self, d: &Moment, value: i64) -> Option<Moment>;

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment>;
}

// ── Unit table ──────────────────────────────────────────────────────────────

/// The closed set of constraint units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Unit {
    Second,
    Minute,
    Hour,
    Time,
    Day,
    DayOfWeek,
    DayOfWeekCount,
    DayOfYear,
    WeekOfMonth,
    WeekOfYear,
    Month,
    Year,
    FullDate,
}

impl Unit {
    pub const ALL: [Unit; 13] = [
        Unit::Second,
        Unit::Minute,
        Unit::Hour,
        Unit::Time,
        Unit::Day,
        Unit::DayOfWeek,
        Unit::DayOfWeekCount,
        Unit::DayOfYear,
        Unit::WeekOfMonth,
        Unit::WeekOfYear,
        Unit::Month,
        Unit::Year,
        Unit::FullDate,
    ];

    /// Resolve a short (`"dw"`) or long (`"dayOfWeek"`) key.
    pub fn from_key(key: &str) -> Option<Unit> {
        let unit = match key {
            "s" | "second" => Unit::Second,
            "m" | "minute" => Unit::Minute,
            "h" | "hour" => Unit::Hour,
            "t" | "time" => Unit::Time,
            "D" | "day" => Unit::Day,
            "d" | "dw" | "dayOfWeek" => Unit::DayOfWeek,
            "dc" | "dayOfWeekCount" => Unit::DayOfWeekCount,
            "dy" | "dayOfYear" => Unit::DayOfYear,
            "wm" | "weekOfMonth" => Unit::WeekOfMonth,
            "wy" | "weekOfYear" => Unit::WeekOfYear,
            "M" | "month" => Unit::Month,
            "Y" | "year" => Unit::Year,
            "fd" | "fullDate" => Unit::FullDate,
            _ => return None,
        };
        Some(unit)
    }

    /// The canonical short key.
    pub fn key(self) -> &'static str {
        match self {
            Unit::Second => "s",
            Unit::Minute => "m",
            Unit::Hour => "h",
            Unit::Time => "t",
            Unit::Day => "D",
            Unit::DayOfWeek => "dw",
            Unit::DayOfWeekCount => "dc",
            Unit::DayOfYear => "dy",
            Unit::WeekOfMonth => "wm",
            Unit::WeekOfYear => "wy",
            Unit::Month => "M",
            Unit::Year => "Y",
            Unit::FullDate => "fd",
        }
    }

    /// Largest value the unit can take in any period, used to size modifiers.
    pub fn nominal_max(self) -> i64 {
        match self {
            Unit::Second | Unit::Minute => 59,
            Unit::Hour => 23,
            Unit::Time => 86_399,
            Unit::Day => 31,
            Unit::DayOfWeek => 7,
            Unit::DayOfWeekCount => 5,
            Unit::DayOfYear => 366,
            Unit::WeekOfMonth => 6,
            Unit::WeekOfYear => 53,
            Unit::Month => 12,
            Unit::Year => Year::LAST,
            Unit::FullDate => FullDate::LAST,
        }
    }

    /// Whether a zero in this unit's value sets means "last of the period".
    ///
    /// True for every unit whose extent does not start at zero.
    pub fn zero_is_last(self) -> bool {
        !matches!(
            self,
            Unit::Second | Unit::Minute | Unit::Hour | Unit::Time | Unit::FullDate
        )
    }

    pub(crate) fn dimension(self) -> &'static dyn Dimension {
        match self {
            Unit::Second => &Second,
            Unit::Minute => &Minute,
            Unit::Hour => &Hour,
            Unit::Time => &Time,
            Unit::Day => &Day,
            Unit::DayOfWeek => &DayOfWeek,
            Unit::DayOfWeekCount => &DayOfWeekCount,
            Unit::DayOfYear => &DayOfYear,
            Unit::WeekOfMonth => &WeekOfMonth,
            Unit::WeekOfYear => &WeekOfYear,
            Unit::Month => &Month,
            Unit::Year => &Year,
            Unit::FullDate => &FullDate,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dimension().name())
    }
}

impl FromStr for Unit {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::from_key(s).ok_or_else(|| CadenceError::UnknownConstraint(s.to_string()))
    }
}

impl Constraint for Unit {
    fn unit(&self) -> Unit {
        *self
    }

    fn is_valid(&self, d: &Moment, value: i64) -> bool {
        self.dimension().is_valid(d, value)
    }

    fn next(&self, d: &Moment, value: i64) -> Option<Moment> {
        self.dimension()
            .next(d, value)
            .filter(|m| m.year() <= *SUPPORTED_YEARS.end())
    }

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment> {
        self.dimension()
            .prev(d, value)
            .filter(|m| m.year() >= *SUPPORTED_YEARS.start())
    }
}

// ── Unit implementations ────────────────────────────────────────────────────

/// Behavior shared by the concrete unit types in the submodules.
pub(crate) trait Dimension: Sync {
    fn name(&self) -> &'static str;

    fn range(&self) -> i64;

    fn val(&self, d: &Moment) -> i64;

    fn is_valid(&self, d: &Moment, value: i64) -> bool {
        self.val(d) == value
    }

    fn extent(&self, d: &Moment) -> Extent;

    fn start(&self, d: &Moment) -> Moment;

    fn end(&self, d: &Moment) -> Moment;

    fn next(&self, d: &Moment, value: i64) -> Option<Moment>;

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment>;
}

/// `value`, or `last` when `value` is the zero placeholder.
pub(crate) fn or_last(value: i64, last: i64) -> i64 {
    if value == 0 {
        last
    } else {
        value
    }
}

/// The instant to continue from when stepping `constraint` forward to
/// `value`: the start of the current `period` if the value still lies ahead
/// in it, otherwise the start of the following period.
pub(crate) fn next_rollover(
    d: &Moment,
    value: i64,
    constraint: &dyn Dimension,
    period: &dyn Dimension,
) -> Moment {
    let cur = constraint.val(d);
    let max = constraint.extent(d).max;
    if or_last(value, max) <= cur || value > max {
        period.end(d).plus_seconds(1)
    } else {
        period.start(d)
    }
}

/// Mirror of [`next_rollover`]: the start of the current `period`, or of the
/// previous one when `value` is not behind us in this period. `None` when
/// the previous period does not exist.
pub(crate) fn prev_rollover(
    d: &Moment,
    value: i64,
    constraint: &dyn Dimension,
    period: &dyn Dimension,
) -> Option<Moment> {
    let cur = constraint.val(d);
    if value >= cur || value == 0 {
        let previous = period.prev(d, period.val(d) - 1)?;
        Some(period.start(&previous))
    } else {
        Some(period.start(d))
    }
}

#[cfg(test)]
mod tests;
