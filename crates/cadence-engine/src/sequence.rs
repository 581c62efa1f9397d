//! Search primitives over the accepted values of one constraint.
//!
//! Value sets are sorted ascending with no duplicates. A value of `0` in a
//! set whose extent does not start at zero means "the last value of the
//! period" (last day of the month, last week of the year, ...) and is kept
//! at the end of the set so that it compares as the largest member.
//!
//! # Functions
//!
//! - [`sort`] — Sort a value set, optionally moving a leading zero to the end
//! - [`next`] — Smallest accepted value at or after a target, wrapping
//! - [`prev`] — Largest accepted value at or before a target, wrapping
//! - [`next_invalid`] — First value after a target that is not accepted
//! - [`prev_invalid`] — Last value before a target that is not accepted

use serde::{Deserialize, Serialize};

/// Inclusive `[min, max]` range of values a constraint can take in the
/// period containing some instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub min: i64,
    pub max: i64,
}

impl Extent {
    pub const fn new(min: i64, max: i64) -> Self {
        Extent { min, max }
    }

    /// Whether a zero in a value set stands for the last value of the period.
    pub fn zero_is_largest(&self) -> bool {
        self.min != 0
    }
}

/// Sort `values` ascending. With `zero_is_last`, a zero ends up last.
///
/// # Examples
///
/// ```
/// use cadence_engine::sequence::sort;
///
/// let mut values = vec![6, 9, 2, 0, 4, 3];
/// sort(&mut values, true);
/// assert_eq!(values, vec![2, 3, 4, 6, 9, 0]);
/// ```
pub fn sort(values: &mut Vec<i64>, zero_is_last: bool) {
    values.sort_unstable();
    if zero_is_last && values.first() == Some(&0) {
        let zero = values.remove(0);
        values.push(zero);
    }
}

/// The next accepted value at or after `val`, wrapping to the first member.
///
/// Returns `None` only for an empty set.
pub fn next(val: i64, values: &[i64], extent: Extent) -> Option<i64> {
    let zero_is_largest = extent.zero_is_largest();
    let mut found = 0;
    for (i, &cur) in values.iter().enumerate().rev() {
        if cur == val {
            return Some(cur);
        }
        if cur > val || (cur == 0 && zero_is_largest && extent.max > val) {
            found = i;
            continue;
        }
        break;
    }
    values.get(found).copied()
}

/// The previous accepted value at or before `val`, wrapping to the last member.
///
/// Returns `None` only for an empty set.
pub fn prev(val: i64, values: &[i64], extent: Extent) -> Option<i64> {
    let zero_is_largest = extent.zero_is_largest();
    let mut found = values.len().checked_sub(1)?;
    for (i, &cur) in values.iter().enumerate() {
        if cur == val {
            return Some(cur);
        }
        if cur < val || (cur == 0 && zero_is_largest && extent.max < val) {
            found = i;
            continue;
        }
        break;
    }
    values.get(found).copied()
}

/// Value that the member at `index` covers; a trailing zero covers `zero_value`.
fn covered(values: &[i64], index: i64, zero_value: i64) -> i64 {
    usize::try_from(index)
        .ok()
        .and_then(|i| values.get(i).copied())
        .filter(|&v| v != 0)
        .unwrap_or(zero_value)
}

fn zero_value(values: &[i64], extent: Extent) -> i64 {
    if values.last() == Some(&0) && extent.min != 0 {
        extent.max
    } else {
        0
    }
}

fn position(values: &[i64], val: i64) -> i64 {
    values
        .iter()
        .position(|&v| v == val)
        .map_or(-1, |i| i as i64)
}

/// The first value after `val`, cycling through the extent, that is not
/// covered by `values`. Returns `val` itself when it is not covered.
///
/// Returns `None` when every value of the extent is covered.
pub fn next_invalid(val: i64, values: &[i64], extent: Extent) -> Option<i64> {
    let len = values.len() as i64;
    let zero_value = zero_value(values, extent);
    let mut next = val;
    let mut i = position(values, val);
    let start = next;

    while next == covered(values, i, zero_value) {
        next += 1;
        if next > extent.max {
            next = extent.min;
        }
        i += 1;
        if i == len {
            i = 0;
        }
        if next == start {
            return None;
        }
    }
    Some(next)
}

/// The last value before `val`, cycling backwards through the extent, that
/// is not covered by `values`. Returns `val` itself when it is not covered.
///
/// Returns `None` when every value of the extent is covered.
pub fn prev_invalid(val: i64, values: &[i64], extent: Extent) -> Option<i64> {
    let len = values.len() as i64;
    let zero_value = zero_value(values, extent);
    let mut prev = val;
    let mut i = position(values, val);
    let start = prev;

    while prev == covered(values, i, zero_value) {
        prev -= 1;
        if prev < extent.min {
            prev = extent.max;
        }
        i -= 1;
        if i == -1 {
            i = len - 1;
        }
        if prev == start {
            return None;
        }
    }
    Some(prev)
}
