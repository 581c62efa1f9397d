//! Day-granular units: day of month, day of week, nth weekday of the month
//! and day of year.

use super::{
    next_rollover, or_last, prev_rollover, Dimension, Extent, Moment, Month, Year,
};
use crate::calendar;
use crate::moment::Memo;

pub(crate) struct Day;

impl Day {
    /// Number of days in the month containing `d`.
    pub(crate) fn last(d: &Moment) -> i64 {
        calendar::days_in_month(d.year(), d.month())
    }
}

impl Dimension for Day {
    fn name(&self) -> &'static str {
        "day"
    }

    fn range(&self) -> i64 {
        86_400
    }

    fn val(&self, d: &Moment) -> i64 {
        d.day()
    }

    fn is_valid(&self, d: &Moment, value: i64) -> bool {
        d.day() == or_last(value, Day::last(d))
    }

    fn extent(&self, d: &Moment) -> Extent {
        Extent::new(1, Day::last(d))
    }

    fn start(&self, d: &Moment) -> Moment {
        d.day_start(d.year(), d.month(), d.day())
    }

    fn end(&self, d: &Moment) -> Moment {
        d.day_end(d.year(), d.month(), d.day())
    }

    fn next(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = if value > Day::last(d) { 1 } else { value };
        let month = next_rollover(d, value, self, &Month);
        let last = Day::last(&month);
        let value = if value > last { 1 } else { or_last(value, last) };
        Some(month.day_start(month.year(), month.month(), value))
    }

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment> {
        let month = prev_rollover(d, value, self, &Month)?;
        let last = Day::last(&month);
        let value = if value > last { last } else { or_last(value, last) };
        Some(month.day_end(month.year(), month.month(), value))
    }
}

/// Day of week, 1 (Sunday) through 7 (Saturday). Zero means Saturday.
pub(crate) struct DayOfWeek;

impl Dimension for DayOfWeek {
    fn name(&self) -> &'static str {
        "day of week"
    }

    fn range(&self) -> i64 {
        86_400
    }

    fn val(&self, d: &Moment) -> i64 {
        d.weekday() + 1
    }

    fn is_valid(&self, d: &Moment, value: i64) -> bool {
        self.val(d) == or_last(value, 7)
    }

    fn extent(&self, _d: &Moment) -> Extent {
        Extent::new(1, 7)
    }

    fn start(&self, d: &Moment) -> Moment {
        Day.start(d)
    }

    fn end(&self, d: &Moment) -> Moment {
        Day.end(d)
    }

    fn next(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = if value > 7 { 1 } else { or_last(value, 7) };
        let cur = self.val(d);
        let wrap = if value <= cur { 7 } else { 0 };
        Some(d.day_start(d.year(), d.month(), d.day() + (value - cur) + wrap))
    }

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = if value > 7 { 7 } else { or_last(value, 7) };
        let cur = self.val(d);
        let wrap = if value >= cur { -7 } else { 0 };
        Some(d.day_end(d.year(), d.month(), d.day() + (value - cur) + wrap))
    }
}

/// The nth seven-day block of the month ("2nd Tuesday" is day of week 3 in
/// block 2). Zero means the last seven days of the month.
pub(crate) struct DayOfWeekCount;

impl DayOfWeekCount {
    fn first_day(value: i64, month: &Moment) -> i64 {
        if value == 0 {
            Day::last(month) - 6
        } else {
            1 + 7 * (value - 1)
        }
    }
}

impl Dimension for DayOfWeekCount {
    fn name(&self) -> &'static str {
        "day of week count"
    }

    fn range(&self) -> i64 {
        604_800
    }

    fn val(&self, d: &Moment) -> i64 {
        (d.day() - 1).div_euclid(7) + 1
    }

    fn is_valid(&self, d: &Moment, value: i64) -> bool {
        self.val(d) == value || (value == 0 && d.day() > Day::last(d) - 7)
    }

    fn extent(&self, d: &Moment) -> Extent {
        Extent::new(1, (Day::last(d) + 6) / 7)
    }

    fn start(&self, d: &Moment) -> Moment {
        let day = ((self.val(d) - 1) * 7 + 1).max(1);
        d.day_start(d.year(), d.month(), day)
    }

    fn end(&self, d: &Moment) -> Moment {
        let day = (self.val(d) * 7).min(Day::last(d));
        d.day_end(d.year(), d.month(), day)
    }

    fn next(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = if value > self.extent(d).max { 1 } else { value };
        let month = next_rollover(d, value, self, &Month);
        let value = if value > self.extent(&month).max { 1 } else { value };
        let next = month.day_start(
            month.year(),
            month.month(),
            DayOfWeekCount::first_day(value, &month),
        );
        if next <= *d {
            // The last-week block of this month starts before `d`.
            let month = Month.next(d, d.month() + 1)?;
            return Some(month.day_start(
                month.year(),
                month.month(),
                DayOfWeekCount::first_day(value, &month),
            ));
        }
        Some(next)
    }

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment> {
        let month = prev_rollover(d, value, self, &Month)?;
        let max = self.extent(&month).max;
        let value = if value > max { max } else { or_last(value, max) };
        let block = month.day_end(month.year(), month.month(), 1 + 7 * (value - 1));
        Some(self.end(&block))
    }
}

/// Day of year, 1-based. Zero means the last day of the year.
pub(crate) struct DayOfYear;

impl DayOfYear {
    fn last(d: &Moment) -> i64 {
        calendar::days_in_year(d.year())
    }
}

impl Dimension for DayOfYear {
    fn name(&self) -> &'static str {
        "day of year"
    }

    fn range(&self) -> i64 {
        86_400
    }

    fn val(&self, d: &Moment) -> i64 {
        d.cached(Memo::DayOfYear, || {
            calendar::ordinal(d.year(), d.month(), d.day())
        })
    }

    fn is_valid(&self, d: &Moment, value: i64) -> bool {
        self.val(d) == or_last(value, DayOfYear::last(d))
    }

    fn extent(&self, d: &Moment) -> Extent {
        Extent::new(1, DayOfYear::last(d))
    }

    fn start(&self, d: &Moment) -> Moment {
        Day.start(d)
    }

    fn end(&self, d: &Moment) -> Moment {
        Day.end(d)
    }

    fn next(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = if value > DayOfYear::last(d) { 1 } else { value };
        let year = next_rollover(d, value, self, &Year);
        let last = DayOfYear::last(&year);
        let value = if value > last { 1 } else { or_last(value, last) };
        Some(year.day_start(year.year(), year.month(), value))
    }

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment> {
        let year = prev_rollover(d, value, self, &Year)?;
        let last = DayOfYear::last(&year);
        let value = if value > last { last } else { or_last(value, last) };
        Some(year.day_end(year.year(), year.month(), value))
    }
}
