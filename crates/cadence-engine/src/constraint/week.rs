//! Week of month and ISO week of year.
//!
//! The two units use different week definitions. Weeks of the month start
//! on Sunday, with week 1 running from the 1st to the first Saturday. ISO
//! weeks run Monday to Sunday and week 1 holds the year's first Thursday.

use chrono::{Datelike, Duration};

use super::{
    next_rollover, or_last, prev_rollover, Day, DayOfWeek, Dimension, Extent, Month, Moment, Year,
};
use crate::calendar;
use crate::moment::Memo;

const THURSDAY: i64 = 4;

/// Day of week (1 = Sunday) of a civil date.
fn day_of_week(year: i64, month: i64, day: i64) -> i64 {
    calendar::weekday(year, month, day) + 1
}

pub(crate) struct WeekOfMonth;

impl WeekOfMonth {
    /// First day of week `value` in the month starting at `month`.
    fn first_day(value: i64, month: &Moment) -> i64 {
        ((value - 1) * 7 - (DayOfWeek.val(month) - 2)).max(1)
    }
}

impl Dimension for WeekOfMonth {
    fn name(&self) -> &'static str {
        "week of month"
    }

    fn range(&self) -> i64 {
        604_800
    }

    fn val(&self, d: &Moment) -> i64 {
        d.cached(Memo::WeekOfMonth, || {
            let first = day_of_week(d.year(), d.month(), 1);
            (d.day() + (first - 1) + (7 - DayOfWeek.val(d))) / 7
        })
    }

    fn is_valid(&self, d: &Moment, value: i64) -> bool {
        self.val(d) == or_last(value, self.extent(d).max)
    }

    fn extent(&self, d: &Moment) -> Extent {
        let max = d.cached(Memo::WeekOfMonthMax, || {
            let last_day = Day::last(d);
            let first = day_of_week(d.year(), d.month(), 1);
            let last = day_of_week(d.year(), d.month(), last_day);
            (last_day + (first - 1) + (7 - last)) / 7
        });
        Extent::new(1, max)
    }

    fn start(&self, d: &Moment) -> Moment {
        let day = (d.day() - DayOfWeek.val(d) + 1).max(1);
        d.day_start(d.year(), d.month(), day)
    }

    fn end(&self, d: &Moment) -> Moment {
        let day = (d.day() + (7 - DayOfWeek.val(d))).min(Day::last(d));
        d.day_end(d.year(), d.month(), day)
    }

    fn next(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = if value > self.extent(d).max { 1 } else { value };
        let month = next_rollover(d, value, self, &Month);
        let max = self.extent(&month).max;
        let value = if value > max { 1 } else { or_last(value, max) };
        Some(month.day_start(
            month.year(),
            month.month(),
            WeekOfMonth::first_day(value, &month),
        ))
    }

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment> {
        let month = prev_rollover(d, value, self, &Month)?;
        let max = self.extent(&month).max;
        let value = if value > max { max } else { or_last(value, max) };
        let week = month.day_start(
            month.year(),
            month.month(),
            WeekOfMonth::first_day(value, &month),
        );
        Some(self.end(&week))
    }
}

/// ISO 8601 week of year. Zero means the last week (52 or 53).
pub(crate) struct WeekOfYear;

impl WeekOfYear {
    /// Days back from `d` to the Monday of its ISO week.
    fn days_since_monday(d: &Moment) -> i64 {
        let dw = DayOfWeek.val(d);
        if dw > 1 {
            dw - 2
        } else {
            6
        }
    }

    /// Moves a year boundary forward to the following Monday when it still
    /// belongs to the last ISO week of the previous year.
    fn anchor(&self, year: Moment) -> Option<Moment> {
        if self.val(&year) != 1 {
            DayOfWeek.next(&year, 2)
        } else {
            Some(year)
        }
    }
}

impl Dimension for WeekOfYear {
    fn name(&self) -> &'static str {
        "week of year (ISO)"
    }

    fn range(&self) -> i64 {
        604_800
    }

    fn val(&self, d: &Moment) -> i64 {
        d.cached(Memo::WeekOfYear, || {
            let monday = d.day() - WeekOfYear::days_since_monday(d);
            let Some(thursday) = calendar::civil_date(d.year(), d.month(), monday + 3) else {
                return 1;
            };
            let year = i64::from(thursday.year());
            let first_thursday = 1 + (THURSDAY - calendar::weekday(year, 1, 1)).rem_euclid(7);
            let Some(first_thursday) = calendar::civil_date(year, 1, first_thursday) else {
                return 1;
            };
            1 + (thursday - first_thursday).num_days().div_euclid(7)
        })
    }

    fn is_valid(&self, d: &Moment, value: i64) -> bool {
        self.val(d) == or_last(value, self.extent(d).max)
    }

    fn extent(&self, d: &Moment) -> Extent {
        let max = d.cached(Memo::WeekOfYearMax, || {
            let monday = d.day() - WeekOfYear::days_since_monday(d);
            let year = calendar::civil_date(d.year(), d.month(), monday)
                .and_then(|m| m.checked_add_signed(Duration::days(3)))
                .map_or(d.year(), |thursday| i64::from(thursday.year()));
            if calendar::weekday(year, 1, 1) == THURSDAY
                || calendar::weekday(year, 12, 31) == THURSDAY
            {
                53
            } else {
                52
            }
        });
        Extent::new(1, max)
    }

    fn start(&self, d: &Moment) -> Moment {
        d.day_start(
            d.year(),
            d.month(),
            d.day() - WeekOfYear::days_since_monday(d),
        )
    }

    fn end(&self, d: &Moment) -> Moment {
        let dw = DayOfWeek.val(d);
        let to_sunday = if dw > 1 { 8 - dw } else { 0 };
        d.day_end(d.year(), d.month(), d.day() + to_sunday)
    }

    fn next(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = if value > self.extent(d).max { 1 } else { value };
        let thursday = DayOfWeek.next(&self.start(d), 5)?;
        let year = self.anchor(next_rollover(&thursday, value, self, &Year))?;
        let max = self.extent(&year).max;
        let first = self.start(&year);
        let value = if value > max { 1 } else { or_last(value, max) };
        Some(first.day_start(first.year(), first.month(), first.day() + 7 * (value - 1)))
    }

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment> {
        let thursday = DayOfWeek.next(&self.start(d), 5)?;
        let year = self.anchor(prev_rollover(&thursday, value, self, &Year)?)?;
        let max = self.extent(&year).max;
        let first = self.end(&year);
        let value = if value > max { max } else { or_last(value, max) };
        let week = first.day_start(first.year(), first.month(), first.day() + 7 * (value - 1));
        Some(self.end(&week))
    }
}
