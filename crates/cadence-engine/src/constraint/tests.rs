use chrono::{DateTime, Utc};

use super::*;
use crate::calendar::{parse_instant, TimeReference};

fn at(s: &str) -> DateTime<Utc> {
    parse_instant(s).unwrap()
}

fn utc(s: &str) -> Moment {
    Moment::utc(at(s))
}

/// Thursday, 2013-03-21 03:10:05 UTC.
fn sample() -> Moment {
    utc("2013-03-21T03:10:05Z")
}

fn next_at(unit: Unit, d: &Moment, value: i64) -> Option<DateTime<Utc>> {
    unit.next(d, value).map(|m| m.at())
}

fn prev_at(unit: Unit, d: &Moment, value: i64) -> Option<DateTime<Utc>> {
    unit.prev(d, value).map(|m| m.at())
}

// ── lookup ──────────────────────────────────────────────────────────────

#[test]
fn test_unit_from_short_and_long_keys() {
    assert_eq!(Unit::from_key("dw"), Some(Unit::DayOfWeek));
    assert_eq!(Unit::from_key("d"), Some(Unit::DayOfWeek));
    assert_eq!(Unit::from_key("dayOfWeek"), Some(Unit::DayOfWeek));
    assert_eq!(Unit::from_key("D"), Some(Unit::Day));
    assert_eq!(Unit::from_key("M"), Some(Unit::Month));
    assert_eq!(Unit::from_key("m"), Some(Unit::Minute));
    assert_eq!(Unit::from_key("fullDate"), Some(Unit::FullDate));
    assert_eq!(Unit::from_key("fortnight"), None);
}

#[test]
fn test_unit_from_str_error() {
    assert_eq!(
        "q".parse::<Unit>(),
        Err(CadenceError::UnknownConstraint("q".to_string()))
    );
}

#[test]
fn test_unit_keys_round_trip() {
    for unit in Unit::ALL {
        assert_eq!(Unit::from_key(unit.key()), Some(unit));
    }
}

#[test]
fn test_unit_names() {
    assert_eq!(Unit::DayOfWeekCount.name(), "day of week count");
    assert_eq!(Unit::WeekOfYear.name(), "week of year (ISO)");
    assert_eq!(Unit::FullDate.to_string(), "full date");
}

#[test]
fn test_ranges_order_coarse_to_fine() {
    assert!(Unit::Year.range() > Unit::Month.range());
    assert!(Unit::Month.range() > Unit::WeekOfYear.range());
    assert!(Unit::WeekOfYear.range() > Unit::Day.range());
    assert!(Unit::Day.range() > Unit::Hour.range());
    assert!(Unit::Hour.range() > Unit::Minute.range());
    assert!(Unit::Minute.range() > Unit::Second.range());
}

#[test]
fn test_zero_is_last_matches_extent_minimum() {
    let d = sample();
    for unit in Unit::ALL {
        assert_eq!(unit.zero_is_last(), unit.extent(&d).min != 0, "{unit}");
    }
}

// ── values and extents ──────────────────────────────────────────────────

#[test]
fn test_values_at_sample() {
    let d = sample();
    let expected = [
        (Unit::Second, 5),
        (Unit::Minute, 10),
        (Unit::Hour, 3),
        (Unit::Time, 11_405),
        (Unit::Day, 21),
        (Unit::DayOfWeek, 5),
        (Unit::DayOfWeekCount, 3),
        (Unit::DayOfYear, 80),
        (Unit::WeekOfMonth, 4),
        (Unit::WeekOfYear, 12),
        (Unit::Month, 3),
        (Unit::Year, 2013),
        (Unit::FullDate, 1_363_835_405_000),
    ];
    for (unit, value) in expected {
        assert_eq!(unit.val(&d), value, "{unit}");
    }
}

#[test]
fn test_extents_at_sample() {
    let d = sample();
    let expected = [
        (Unit::Second, (0, 59)),
        (Unit::Time, (0, 86_399)),
        (Unit::Day, (1, 31)),
        (Unit::DayOfWeek, (1, 7)),
        (Unit::DayOfWeekCount, (1, 5)),
        (Unit::DayOfYear, (1, 365)),
        (Unit::WeekOfMonth, (1, 6)),
        (Unit::WeekOfYear, (1, 52)),
        (Unit::Month, (1, 12)),
        (Unit::Year, (1970, 2099)),
    ];
    for (unit, (min, max)) in expected {
        assert_eq!(unit.extent(&d), Extent::new(min, max), "{unit}");
    }
}

#[test]
fn test_day_extent_in_leap_february() {
    let d = utc("2012-02-10T00:00:00Z");
    assert_eq!(Unit::Day.extent(&d), Extent::new(1, 29));
    assert_eq!(Unit::DayOfWeekCount.extent(&d), Extent::new(1, 5));
    assert_eq!(Unit::DayOfYear.extent(&d), Extent::new(1, 366));
}

#[test]
fn test_zero_means_last_for_validity() {
    let last_day = utc("2013-02-28T12:00:00Z");
    assert!(Unit::Day.is_valid(&last_day, 0));
    assert!(Unit::Day.is_valid(&last_day, 28));
    assert!(!Unit::Day.is_valid(&sample(), 0));

    let saturday = utc("2013-03-23T12:00:00Z");
    assert!(Unit::DayOfWeek.is_valid(&saturday, 0));
    assert!(Unit::DayOfWeek.is_valid(&saturday, 7));

    let dec = utc("2013-12-05T00:00:00Z");
    assert!(Unit::Month.is_valid(&dec, 0));
}

#[test]
fn test_day_of_week_count_last_week() {
    // March 25-31 are the last seven days of the month.
    assert!(Unit::DayOfWeekCount.is_valid(&utc("2013-03-25T00:00:00Z"), 0));
    assert!(Unit::DayOfWeekCount.is_valid(&utc("2013-03-29T00:00:00Z"), 5));
    assert!(Unit::DayOfWeekCount.is_valid(&utc("2013-03-29T00:00:00Z"), 0));
    assert!(!Unit::DayOfWeekCount.is_valid(&utc("2013-03-24T00:00:00Z"), 0));
}

// ── period boundaries ───────────────────────────────────────────────────

#[test]
fn test_boundaries_at_sample() {
    let d = sample();
    let expected = [
        (Unit::Second, "2013-03-21T03:10:05Z", "2013-03-21T03:10:05Z"),
        (Unit::Minute, "2013-03-21T03:10:00Z", "2013-03-21T03:10:59Z"),
        (Unit::Hour, "2013-03-21T03:00:00Z", "2013-03-21T03:59:59Z"),
        (Unit::Time, "2013-03-21T03:10:05Z", "2013-03-21T03:10:05Z"),
        (Unit::Day, "2013-03-21T00:00:00Z", "2013-03-21T23:59:59Z"),
        (Unit::DayOfWeek, "2013-03-21T00:00:00Z", "2013-03-21T23:59:59Z"),
        (Unit::DayOfWeekCount, "2013-03-15T00:00:00Z", "2013-03-21T23:59:59Z"),
        (Unit::DayOfYear, "2013-03-21T00:00:00Z", "2013-03-21T23:59:59Z"),
        (Unit::WeekOfMonth, "2013-03-17T00:00:00Z", "2013-03-23T23:59:59Z"),
        (Unit::WeekOfYear, "2013-03-18T00:00:00Z", "2013-03-24T23:59:59Z"),
        (Unit::Month, "2013-03-01T00:00:00Z", "2013-03-31T23:59:59Z"),
        (Unit::Year, "2013-01-01T00:00:00Z", "2013-12-31T23:59:59Z"),
        (Unit::FullDate, "2013-03-21T03:10:05Z", "2013-03-21T03:10:05Z"),
    ];
    for (unit, start, end) in expected {
        assert_eq!(unit.start(&d).at(), at(start), "{unit} start");
        assert_eq!(unit.end(&d).at(), at(end), "{unit} end");
    }
}

#[test]
fn test_week_of_month_first_week_is_clipped() {
    // 2013-03-01 is a Friday; week 1 is March 1-2.
    let d = utc("2013-03-02T10:00:00Z");
    assert_eq!(Unit::WeekOfMonth.val(&d), 1);
    assert_eq!(Unit::WeekOfMonth.start(&d).at(), at("2013-03-01T00:00:00Z"));
    assert_eq!(Unit::WeekOfMonth.end(&d).at(), at("2013-03-02T23:59:59Z"));
}

// ── stepping ────────────────────────────────────────────────────────────

#[test]
fn test_clock_next() {
    let d = sample();
    assert_eq!(next_at(Unit::Second, &d, 30), Some(at("2013-03-21T03:10:30Z")));
    assert_eq!(next_at(Unit::Second, &d, 5), Some(at("2013-03-21T03:11:05Z")));
    assert_eq!(next_at(Unit::Second, &d, 60), Some(at("2013-03-21T03:11:00Z")));
    assert_eq!(next_at(Unit::Minute, &d, 15), Some(at("2013-03-21T03:15:00Z")));
    assert_eq!(next_at(Unit::Minute, &d, 10), Some(at("2013-03-21T04:10:00Z")));
    assert_eq!(next_at(Unit::Hour, &d, 3), Some(at("2013-03-22T03:00:00Z")));
    assert_eq!(next_at(Unit::Hour, &d, 24), Some(at("2013-03-22T00:00:00Z")));
    assert_eq!(next_at(Unit::Time, &d, 11_405), Some(at("2013-03-22T03:10:05Z")));
    assert_eq!(next_at(Unit::Time, &d, 43_200), Some(at("2013-03-21T12:00:00Z")));
}

#[test]
fn test_clock_prev() {
    let d = sample();
    assert_eq!(prev_at(Unit::Second, &d, 2), Some(at("2013-03-21T03:10:02Z")));
    assert_eq!(prev_at(Unit::Second, &d, 5), Some(at("2013-03-21T03:09:05Z")));
    assert_eq!(prev_at(Unit::Minute, &d, 10), Some(at("2013-03-21T02:10:59Z")));
    assert_eq!(prev_at(Unit::Minute, &d, 5), Some(at("2013-03-21T03:05:59Z")));
    assert_eq!(prev_at(Unit::Hour, &d, 1), Some(at("2013-03-21T01:59:59Z")));
    assert_eq!(prev_at(Unit::Hour, &d, 4), Some(at("2013-03-20T04:59:59Z")));
    assert_eq!(prev_at(Unit::Time, &d, 0), Some(at("2013-03-21T00:00:00Z")));
    assert_eq!(prev_at(Unit::Time, &d, 43_200), Some(at("2013-03-20T12:00:00Z")));
}

#[test]
fn test_day_next_and_prev() {
    let d = sample();
    assert_eq!(next_at(Unit::Day, &d, 25), Some(at("2013-03-25T00:00:00Z")));
    assert_eq!(next_at(Unit::Day, &d, 21), Some(at("2013-04-21T00:00:00Z")));
    assert_eq!(next_at(Unit::Day, &d, 0), Some(at("2013-03-31T00:00:00Z")));
    assert_eq!(prev_at(Unit::Day, &d, 0), Some(at("2013-02-28T23:59:59Z")));
    assert_eq!(prev_at(Unit::Day, &d, 30), Some(at("2013-02-28T23:59:59Z")));
    assert_eq!(prev_at(Unit::Day, &d, 3), Some(at("2013-03-03T23:59:59Z")));
}

#[test]
fn test_day_next_rolls_over_short_month() {
    // No January 31st carries into February; February has no 30th.
    let d = utc("2013-01-31T10:00:00Z");
    assert_eq!(next_at(Unit::Day, &d, 30), Some(at("2013-02-01T00:00:00Z")));
}

#[test]
fn test_day_of_week_next_and_prev() {
    let d = sample();
    assert_eq!(next_at(Unit::DayOfWeek, &d, 6), Some(at("2013-03-22T00:00:00Z")));
    assert_eq!(next_at(Unit::DayOfWeek, &d, 5), Some(at("2013-03-28T00:00:00Z")));
    assert_eq!(next_at(Unit::DayOfWeek, &d, 0), Some(at("2013-03-23T00:00:00Z")));
    assert_eq!(prev_at(Unit::DayOfWeek, &d, 5), Some(at("2013-03-14T23:59:59Z")));
    assert_eq!(prev_at(Unit::DayOfWeek, &d, 1), Some(at("2013-03-17T23:59:59Z")));
}

#[test]
fn test_day_of_week_count_next_and_prev() {
    let d = sample();
    assert_eq!(next_at(Unit::DayOfWeekCount, &d, 4), Some(at("2013-03-22T00:00:00Z")));
    assert_eq!(next_at(Unit::DayOfWeekCount, &d, 0), Some(at("2013-03-25T00:00:00Z")));
    assert_eq!(next_at(Unit::DayOfWeekCount, &d, 2), Some(at("2013-04-08T00:00:00Z")));
    assert_eq!(prev_at(Unit::DayOfWeekCount, &d, 2), Some(at("2013-03-14T23:59:59Z")));
    assert_eq!(prev_at(Unit::DayOfWeekCount, &d, 0), Some(at("2013-02-28T23:59:59Z")));
}

#[test]
fn test_day_of_week_count_last_block_already_started() {
    // On March 26th the last-seven-days block of March has begun.
    let d = utc("2013-03-26T10:00:00Z");
    assert_eq!(next_at(Unit::DayOfWeekCount, &d, 0), Some(at("2013-04-24T00:00:00Z")));
}

#[test]
fn test_day_of_year_next_and_prev() {
    let d = sample();
    assert_eq!(next_at(Unit::DayOfYear, &d, 81), Some(at("2013-03-22T00:00:00Z")));
    assert_eq!(next_at(Unit::DayOfYear, &d, 1), Some(at("2014-01-01T00:00:00Z")));
    assert_eq!(next_at(Unit::DayOfYear, &d, 0), Some(at("2013-12-31T00:00:00Z")));
    assert_eq!(next_at(Unit::DayOfYear, &d, 366), Some(at("2014-01-01T00:00:00Z")));
    assert_eq!(prev_at(Unit::DayOfYear, &d, 366), Some(at("2012-12-31T23:59:59Z")));
    assert_eq!(prev_at(Unit::DayOfYear, &d, 79), Some(at("2013-03-20T23:59:59Z")));
}

#[test]
fn test_week_of_month_next_and_prev() {
    let d = sample();
    assert_eq!(next_at(Unit::WeekOfMonth, &d, 5), Some(at("2013-03-24T00:00:00Z")));
    assert_eq!(next_at(Unit::WeekOfMonth, &d, 0), Some(at("2013-03-31T00:00:00Z")));
    assert_eq!(next_at(Unit::WeekOfMonth, &d, 1), Some(at("2013-04-01T00:00:00Z")));
    assert_eq!(prev_at(Unit::WeekOfMonth, &d, 1), Some(at("2013-03-02T23:59:59Z")));
    assert_eq!(prev_at(Unit::WeekOfMonth, &d, 0), Some(at("2013-02-28T23:59:59Z")));
}

#[test]
fn test_month_next_and_prev() {
    let d = sample();
    assert_eq!(next_at(Unit::Month, &d, 5), Some(at("2013-05-01T00:00:00Z")));
    assert_eq!(next_at(Unit::Month, &d, 1), Some(at("2014-01-01T00:00:00Z")));
    assert_eq!(next_at(Unit::Month, &d, 0), Some(at("2013-12-01T00:00:00Z")));
    assert_eq!(prev_at(Unit::Month, &d, 3), Some(at("2012-03-31T23:59:59Z")));
    assert_eq!(prev_at(Unit::Month, &d, 2), Some(at("2013-02-28T23:59:59Z")));
}

#[test]
fn test_year_next_and_prev() {
    let d = sample();
    assert_eq!(next_at(Unit::Year, &d, 2015), Some(at("2015-01-01T00:00:00Z")));
    assert_eq!(next_at(Unit::Year, &d, 2013), None);
    assert_eq!(next_at(Unit::Year, &d, 2100), None);
    assert_eq!(prev_at(Unit::Year, &d, 2012), Some(at("2012-12-31T23:59:59Z")));
    assert_eq!(prev_at(Unit::Year, &d, 1969), None);
}

#[test]
fn test_full_date_next_and_prev() {
    let d = sample();
    let later = 1_363_900_000_000;
    let earlier = 1_363_800_000_000;
    assert_eq!(
        next_at(Unit::FullDate, &d, later),
        DateTime::from_timestamp_millis(later)
    );
    assert_eq!(next_at(Unit::FullDate, &d, earlier), None);
    assert_eq!(
        prev_at(Unit::FullDate, &d, earlier),
        DateTime::from_timestamp_millis(earlier)
    );
    assert_eq!(prev_at(Unit::FullDate, &d, later), None);
}

// ── ISO weeks at year boundaries ────────────────────────────────────────

#[test]
fn test_iso_week_values_around_new_year() {
    let cases = [
        ("2008-12-29T00:00:00Z", 1, 53),
        ("2012-12-31T12:00:00Z", 1, 52),
        ("2015-12-31T12:00:00Z", 53, 53),
        ("2016-01-03T23:59:59Z", 53, 53),
        ("2016-01-04T00:00:00Z", 1, 52),
        ("2021-01-03T00:00:00Z", 53, 53),
        ("2021-01-04T00:00:00Z", 1, 52),
    ];
    for (date, week, max) in cases {
        let d = utc(date);
        assert_eq!(Unit::WeekOfYear.val(&d), week, "{date}");
        assert_eq!(Unit::WeekOfYear.extent(&d).max, max, "{date}");
    }
}

#[test]
fn test_iso_week_next_crosses_into_new_iso_year() {
    let d = utc("2015-12-20T00:00:00Z");
    assert_eq!(next_at(Unit::WeekOfYear, &d, 1), Some(at("2016-01-04T00:00:00Z")));
    assert_eq!(next_at(Unit::WeekOfYear, &d, 53), Some(at("2015-12-28T00:00:00Z")));
}

#[test]
fn test_iso_week_prev_reaches_week_53() {
    let d = utc("2016-01-10T00:00:00Z");
    assert_eq!(prev_at(Unit::WeekOfYear, &d, 53), Some(at("2016-01-03T23:59:59Z")));
    assert_eq!(prev_at(Unit::WeekOfYear, &d, 0), Some(at("2016-01-03T23:59:59Z")));
}

#[test]
fn test_iso_week_valid_in_1970() {
    // 1970-01-01 is a Thursday, so it opens ISO week 1 of 1970.
    let d = utc("1970-01-02T00:00:00Z");
    assert_eq!(Unit::WeekOfYear.val(&d), 1);
    assert_eq!(Unit::WeekOfYear.extent(&d).max, 53);
}

// ── time zones ──────────────────────────────────────────────────────────

#[test]
fn test_hour_next_into_spring_forward_gap() {
    // 02:00 does not exist in New York on 2013-03-10; 03:00 EDT follows 01:59 EST.
    let tz = TimeReference::Zone(chrono_tz::America::New_York);
    let d = Moment::new(at("2013-03-10T06:30:00Z"), tz);
    let next = Unit::Hour.next(&d, 2).unwrap();
    assert_eq!(next.at(), at("2013-03-10T07:00:00Z"));
    assert_eq!(next.hour(), 3);
}

#[test]
fn test_day_boundaries_follow_zone() {
    let tz = TimeReference::Zone(chrono_tz::Asia::Tokyo);
    let d = Moment::new(at("2013-03-21T20:00:00Z"), tz);
    assert_eq!(Unit::Day.val(&d), 22);
    assert_eq!(Unit::Day.start(&d).at(), at("2013-03-21T15:00:00Z"));
    assert_eq!(Unit::Day.end(&d).at(), at("2013-03-22T14:59:59Z"));
}

#[test]
fn test_steps_stop_at_supported_window() {
    let late = utc("3001-12-15T00:00:00Z");
    assert_eq!(next_at(Unit::Month, &late, 1), None);
    assert_eq!(next_at(Unit::DayOfYear, &late, 231), None);
    assert!(prev_at(Unit::Month, &late, 1).is_some());

    let early = utc("1969-01-15T00:00:00Z");
    assert_eq!(prev_at(Unit::Month, &early, 12), None);
    assert!(next_at(Unit::Month, &early, 12).is_some());
}

// ── sweeps ──────────────────────────────────────────────────────────────

const SWEEP_DATES: [&str; 8] = [
    "2013-03-21T03:10:05Z",
    "2012-02-29T12:00:00Z",
    "2013-12-31T23:59:59Z",
    "2014-01-01T00:00:00Z",
    "2016-01-03T10:00:00Z",
    "2015-12-31T00:00:00Z",
    "2020-06-30T18:30:45Z",
    "2008-12-29T00:00:00Z",
];

const SWEPT: [Unit; 12] = [
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
];

/// Target values from below the extent to one past it, at most ~200 of them.
fn sweep_values(unit: Unit, d: &Moment) -> Vec<i64> {
    let extent = unit.extent(d);
    let min = if extent.min == 1 { 0 } else { extent.min };
    let max = extent.max + 1;
    let step = ((max - min) as usize).div_ceil(200).max(1);
    (min..=max).step_by(step).collect()
}

#[test]
fn test_next_lands_on_period_start_with_target_value() {
    for date in SWEEP_DATES {
        let d = utc(date);
        for unit in SWEPT {
            for amt in sweep_values(unit, &d) {
                let next = unit.next(&d, amt);
                if unit == Unit::Year && (amt <= unit.val(&d) || amt > 2099) {
                    assert!(next.is_none(), "{unit} {date} {amt}");
                    continue;
                }
                let next = next.unwrap_or_else(|| panic!("{unit} {date} {amt}"));
                let out_of_bounds = amt > unit.extent(&d).max || amt > unit.extent(&next).max;
                let expected = if out_of_bounds { unit.extent(&next).min } else { amt };
                assert!(unit.is_valid(&next, expected), "{unit} {date} {amt} -> {next:?}");
                assert!(next > d, "{unit} {date} {amt} -> {next:?}");
                if unit != Unit::DayOfWeekCount || amt != 0 {
                    assert_eq!(unit.start(&next), next, "{unit} {date} {amt}");
                }
            }
        }
    }
}

#[test]
fn test_prev_lands_on_period_end_with_target_value() {
    for date in SWEEP_DATES {
        let d = utc(date);
        for unit in SWEPT {
            for amt in sweep_values(unit, &d) {
                let prev = unit.prev(&d, amt);
                if unit == Unit::Year && (amt >= unit.val(&d) || amt < 1970) {
                    assert!(prev.is_none(), "{unit} {date} {amt}");
                    continue;
                }
                let prev = prev.unwrap_or_else(|| panic!("{unit} {date} {amt}"));
                let max = unit.extent(&prev).max;
                let expected = if amt > max { max } else { amt };
                assert!(unit.is_valid(&prev, expected), "{unit} {date} {amt} -> {prev:?}");
                assert!(prev < d, "{unit} {date} {amt} -> {prev:?}");
                assert_eq!(unit.end(&prev), prev, "{unit} {date} {amt}");
            }
        }
    }
}

#[test]
fn test_start_and_end_bracket_instant() {
    for date in SWEEP_DATES {
        let d = utc(date);
        for unit in Unit::ALL {
            let start = unit.start(&d);
            assert!(start <= d, "{unit} {date}");
            assert!(d <= unit.end(&d), "{unit} {date}");
            assert!(unit.is_valid(&start, unit.val(&d)), "{unit} {date}");
        }
    }
}

mod properties {
    use proptest::prelude::*;

    use super::*;

    /// Whole seconds from 1972 through 2096, UTC.
    fn instant() -> impl Strategy<Value = Moment> {
        (63_072_000i64..4_007_836_800).prop_map(|secs| {
            Moment::utc(DateTime::from_timestamp(secs, 0).unwrap())
        })
    }

    proptest! {
        #[test]
        fn prop_start_end_bracket(d in instant(), i in 0usize..12) {
            let unit = SWEPT[i];
            prop_assert!(unit.start(&d) <= d);
            prop_assert!(d <= unit.end(&d));
            prop_assert!(unit.is_valid(&unit.start(&d), unit.val(&d)));
        }

        #[test]
        fn prop_next_is_later_period_start(d in instant(), i in 0usize..11, pick in 0i64..1000) {
            let unit = SWEPT[i];
            let extent = unit.extent(&d);
            let amt = extent.min + pick % (extent.max - extent.min + 1);
            let next = unit.next(&d, amt).unwrap();
            prop_assert!(next > d);
            prop_assert_eq!(unit.start(&next), next);
        }

        #[test]
        fn prop_prev_is_earlier_period_end(d in instant(), i in 0usize..11, pick in 0i64..1000) {
            let unit = SWEPT[i];
            let extent = unit.extent(&d);
            let amt = extent.min + pick % (extent.max - extent.min + 1);
            let prev = unit.prev(&d, amt).unwrap();
            prop_assert!(prev < d);
            prop_assert_eq!(unit.end(&prev), prev);
        }
    }
}
