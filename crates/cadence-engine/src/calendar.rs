//! Civil-calendar arithmetic under an explicit time reference.
//!
//! Every constraint reads calendar fields (year, month, day, ...) from an
//! instant and builds new instants from calendar fields. Both directions go
//! through this module so that one search always uses one interpretation.
//!
//! # Functions
//!
//! - [`build`] — Build an instant from possibly out-of-range calendar fields
//! - [`days_in_month`] — Length of a month under the `year % 4` leap rule
//! - [`weekday`] — Day of week (Sunday = 0) of a normalized civil date
//! - [`ordinal`] — Day of year of a normalized civil date
//! - [`parse_instant`] — Parse an RFC 3339 string into a UTC instant
//! - [`parse_timezone`] — Parse an IANA zone name
//!
//! # Normalization
//!
//! Builders accept out-of-range fields and carry them into the next larger
//! field in either direction: month 13 is January of the following year,
//! day 0 is the last day of the previous month, hour -1 is 23:00 of the
//! previous day. Constraint stepping relies on this heavily.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone,
    Timelike, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{CadenceError, Result};

/// Day lengths of a common year, January first.
const DAYS_IN_MONTH: [i64; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Civil years a search may step into. Constraint jumps that land outside
/// this window in their direction of travel report no result.
///
/// One year of slack below 1970 absorbs zone offsets; the upper edge covers
/// every full-date value.
pub const SUPPORTED_YEARS: RangeInclusive<i64> = 1969..=3001;

// ── Time reference ──────────────────────────────────────────────────────────

/// How calendar fields are read from and written to absolute instants.
///
/// Bound to a [`Recurrence`](crate::Recurrence) when it is compiled; there
/// is no process-wide setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeReference {
    /// Coordinated Universal Time. DST never applies.
    #[default]
    Utc,
    /// The host's local civil time.
    Local,
    /// A named IANA zone.
    Zone(Tz),
}

impl TimeReference {
    /// `true` when no daylight-saving correction can ever be needed.
    pub fn is_utc(&self) -> bool {
        matches!(self, TimeReference::Utc)
    }
}

impl fmt::Display for TimeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeReference::Utc => f.write_str("utc"),
            TimeReference::Local => f.write_str("local"),
            TimeReference::Zone(tz) => f.write_str(tz.name()),
        }
    }
}

impl FromStr for TimeReference {
    type Err = CadenceError;

    /// Accepts `"utc"`, `"local"` (any case) or an IANA zone name.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" | "z" => Ok(TimeReference::Utc),
            "local" => Ok(TimeReference::Local),
            _ => parse_timezone(s.trim()).map(TimeReference::Zone),
        }
    }
}

impl TryFrom<String> for TimeReference {
    type Error = CadenceError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeReference> for String {
    fn from(value: TimeReference) -> Self {
        value.to_string()
    }
}

// ── Calendar fields ─────────────────────────────────────────────────────────

/// The calendar fields of an instant under a [`TimeReference`].
///
/// Months are 1-based, weekdays are 0-based from Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilFields {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub weekday: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
}

impl CivilFields {
    /// Read the fields of `at` as seen through `reference`.
    pub fn of(at: &DateTime<Utc>, reference: TimeReference) -> Self {
        let local = match reference {
            TimeReference::Utc => at.naive_utc(),
            TimeReference::Local => wall_clock(&chrono::Local, at),
            TimeReference::Zone(tz) => wall_clock(&tz, at),
        };
        CivilFields {
            year: i64::from(local.year()),
            month: i64::from(local.month()),
            day: i64::from(local.day()),
            weekday: i64::from(local.weekday().num_days_from_sunday()),
            hour: i64::from(local.hour()),
            minute: i64::from(local.minute()),
            second: i64::from(local.second()),
        }
    }
}

/// Wall-clock time of `at` in `zone`. Instants at the edge of chrono's range
/// whose local time would overflow are read as UTC.
fn wall_clock<Z: TimeZone>(zone: &Z, at: &DateTime<Utc>) -> NaiveDateTime {
    let naive = at.naive_utc();
    let offset = zone.offset_from_utc_datetime(&naive).fix();
    naive.checked_add_offset(offset).unwrap_or(naive)
}

// ── Builders ────────────────────────────────────────────────────────────────

/// Build an instant from calendar fields, normalizing overflow in every field.
///
/// `month` is 1-based. Wall-clock times skipped by a DST transition are read
/// with the offset in force before the transition; repeated wall-clock times
/// resolve to the earlier instant. Results outside chrono's range saturate.
///
/// # Examples
///
/// ```
/// use cadence_engine::calendar::{build, TimeReference};
///
/// // Day 0 of March is the last day of February.
/// let d = build(TimeReference::Utc, 2013, 3, 0, 0, 0, 0);
/// assert_eq!(d.to_rfc3339(), "2013-02-28T00:00:00+00:00");
/// ```
pub fn build(
    reference: TimeReference,
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
) -> DateTime<Utc> {
    let Some(naive) = normalize(year, month, day, hour, minute, second) else {
        return saturate(year);
    };
    match reference {
        TimeReference::Utc => naive.and_utc(),
        TimeReference::Local => resolve(&chrono::Local, naive),
        TimeReference::Zone(tz) => resolve(&tz, naive),
    }
}

fn normalize(
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
) -> Option<NaiveDateTime> {
    let (year, month) = normalize_month(year, month);
    let first = NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        1,
    )?
    .and_hms_opt(0, 0, 0)?;
    let seconds = (day - 1)
        .checked_mul(86_400)?
        .checked_add(hour.checked_mul(3_600)?)?
        .checked_add(minute.checked_mul(60)?)?
        .checked_add(second)?;
    first.checked_add_signed(Duration::try_seconds(seconds)?)
}

fn resolve<Z: TimeZone>(zone: &Z, naive: NaiveDateTime) -> DateTime<Utc> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            // Gap: apply the offset that held a day earlier.
            let before = naive.checked_sub_signed(Duration::days(1)).unwrap_or(naive);
            let offset = zone.offset_from_utc_datetime(&before).fix().local_minus_utc();
            naive
                .checked_sub_signed(Duration::seconds(i64::from(offset)))
                .map(|utc| utc.and_utc())
                .unwrap_or_else(|| saturate(i64::from(naive.year())))
        }
    }
}

fn saturate(year: i64) -> DateTime<Utc> {
    if year < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    }
}

/// Fold a 1-based month that may be out of range into its year.
pub fn normalize_month(year: i64, month: i64) -> (i64, i64) {
    let zero_based = month - 1;
    (year + zero_based.div_euclid(12), zero_based.rem_euclid(12) + 1)
}

// ── Calendar facts ──────────────────────────────────────────────────────────

/// Leap years are every fourth year. Exact for 1901 through 2099.
pub fn is_leap_year(year: i64) -> bool {
    year.rem_euclid(4) == 0
}

/// Number of days in `month` of `year`; the month is normalized first.
pub fn days_in_month(year: i64, month: i64) -> i64 {
    let (year, month) = normalize_month(year, month);
    let days = DAYS_IN_MONTH[(month - 1) as usize];
    if month == 2 && is_leap_year(year) {
        days + 1
    } else {
        days
    }
}

/// Number of days in `year`.
pub fn days_in_year(year: i64) -> i64 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Day of week of a civil date, Sunday = 0. The date is normalized first.
pub fn weekday(year: i64, month: i64, day: i64) -> i64 {
    civil_date(year, month, day)
        .map(|d| i64::from(d.weekday().num_days_from_sunday()))
        .unwrap_or(0)
}

/// One-based day of the year of a civil date. The date is normalized first.
pub fn ordinal(year: i64, month: i64, day: i64) -> i64 {
    civil_date(year, month, day)
        .map(|d| i64::from(d.ordinal()))
        .unwrap_or(1)
}

/// Normalized civil date, or `None` outside chrono's range.
pub fn civil_date(year: i64, month: i64, day: i64) -> Option<NaiveDate> {
    normalize(year, month, day, 0, 0, 0).map(|dt| dt.date())
}

// ── Parsing ─────────────────────────────────────────────────────────────────

/// Parse an RFC 3339 datetime string into a UTC instant.
///
/// # Errors
///
/// Returns [`CadenceError::InvalidDatetime`] if the string is not RFC 3339.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CadenceError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// Parse an IANA timezone string into `Tz`.
///
/// # Errors
///
/// Returns [`CadenceError::InvalidTimezone`] for unknown zone names.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| CadenceError::InvalidTimezone(format!("'{}'", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        parse_instant(s).unwrap()
    }

    // ── build ───────────────────────────────────────────────────────────

    #[test]
    fn test_build_plain_fields() {
        let d = build(TimeReference::Utc, 2013, 3, 21, 10, 5, 30);
        assert_eq!(d, utc("2013-03-21T10:05:30Z"));
    }

    #[test]
    fn test_build_month_overflow_carries_into_year() {
        assert_eq!(
            build(TimeReference::Utc, 2013, 13, 1, 0, 0, 0),
            utc("2014-01-01T00:00:00Z")
        );
        assert_eq!(
            build(TimeReference::Utc, 2013, 0, 1, 0, 0, 0),
            utc("2012-12-01T00:00:00Z")
        );
    }

    #[test]
    fn test_build_day_zero_is_previous_month_end() {
        assert_eq!(
            build(TimeReference::Utc, 2012, 3, 0, 0, 0, 0),
            utc("2012-02-29T00:00:00Z")
        );
    }

    #[test]
    fn test_build_negative_hour_borrows_from_day() {
        assert_eq!(
            build(TimeReference::Utc, 2013, 3, 1, -1, 59, 59),
            utc("2013-02-28T23:59:59Z")
        );
    }

    #[test]
    fn test_build_large_seconds_carry() {
        assert_eq!(
            build(TimeReference::Utc, 2013, 3, 21, 0, 0, 86_400 + 61),
            utc("2013-03-22T00:01:01Z")
        );
    }

    #[test]
    fn test_build_in_zone_gap_uses_pre_transition_offset() {
        // 2013-03-10 02:30 does not exist in New York; EST (-05:00) applies.
        let tz = TimeReference::Zone(parse_timezone("America/New_York").unwrap());
        let d = build(tz, 2013, 3, 10, 2, 30, 0);
        assert_eq!(d, utc("2013-03-10T07:30:00Z"));
    }

    #[test]
    fn test_build_in_zone_overlap_uses_earliest() {
        // 2013-11-03 01:30 happens twice in New York; EDT (-04:00) comes first.
        let tz = TimeReference::Zone(parse_timezone("America/New_York").unwrap());
        let d = build(tz, 2013, 11, 3, 1, 30, 0);
        assert_eq!(d, utc("2013-11-03T05:30:00Z"));
    }

    #[test]
    fn test_build_out_of_range_saturates() {
        let d = build(TimeReference::Utc, i64::from(i32::MAX), 1, 1, 0, 0, 0);
        assert_eq!(d, DateTime::<Utc>::MAX_UTC);
    }

    // ── fields ──────────────────────────────────────────────────────────

    #[test]
    fn test_fields_utc() {
        let f = CivilFields::of(&utc("2013-03-21T03:10:05Z"), TimeReference::Utc);
        assert_eq!(
            f,
            CivilFields {
                year: 2013,
                month: 3,
                day: 21,
                weekday: 4,
                hour: 3,
                minute: 10,
                second: 5,
            }
        );
    }

    #[test]
    fn test_fields_in_zone() {
        let tz = TimeReference::Zone(parse_timezone("Asia/Tokyo").unwrap());
        let f = CivilFields::of(&utc("2013-03-21T20:00:00Z"), tz);
        assert_eq!((f.day, f.hour), (22, 5));
    }

    #[test]
    fn test_fields_at_range_edges_in_zone() {
        let tokyo = TimeReference::Zone(parse_timezone("Asia/Tokyo").unwrap());
        let new_york = TimeReference::Zone(parse_timezone("America/New_York").unwrap());
        let max = CivilFields::of(&DateTime::<Utc>::MAX_UTC, tokyo);
        let min = CivilFields::of(&DateTime::<Utc>::MIN_UTC, new_york);
        assert!(!SUPPORTED_YEARS.contains(&max.year));
        assert!(!SUPPORTED_YEARS.contains(&min.year));
    }

    // ── calendar facts ──────────────────────────────────────────────────

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2013, 2), 28);
        assert_eq!(days_in_month(2012, 2), 29);
        assert_eq!(days_in_month(2013, 4), 30);
        assert_eq!(days_in_month(2013, 13), 31);
    }

    #[test]
    fn test_weekday_and_ordinal() {
        assert_eq!(weekday(2013, 3, 21), 4);
        assert_eq!(weekday(2013, 3, 24), 0);
        assert_eq!(ordinal(2013, 3, 21), 80);
        assert_eq!(ordinal(2012, 12, 31), 366);
    }

    // ── parsing ─────────────────────────────────────────────────────────

    #[test]
    fn test_time_reference_from_str() {
        assert_eq!("UTC".parse::<TimeReference>().unwrap(), TimeReference::Utc);
        assert_eq!("local".parse::<TimeReference>().unwrap(), TimeReference::Local);
        assert_eq!(
            "Europe/Berlin".parse::<TimeReference>().unwrap(),
            TimeReference::Zone(chrono_tz::Europe::Berlin)
        );
        assert!(matches!(
            "Mars/Olympus".parse::<TimeReference>(),
            Err(CadenceError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_time_reference_serde_round_trip() {
        let json = serde_json::to_string(&TimeReference::Zone(chrono_tz::Asia::Tokyo)).unwrap();
        assert_eq!(json, "\"Asia/Tokyo\"");
        let back: TimeReference = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TimeReference::Zone(chrono_tz::Asia::Tokyo));
    }

    #[test]
    fn test_parse_instant_rejects_garbage() {
        assert!(matches!(
            parse_instant("yesterday"),
            Err(CadenceError::InvalidDatetime(_))
        ));
    }
}
