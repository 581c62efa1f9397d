//! Open-ended constraint modifiers.
//!
//! A modifier wraps a [`Unit`] and turns a single pivot value into an
//! open interval: [`After`] accepts every value at or above the pivot,
//! [`Before`] every value strictly below it. Value extraction, extents and
//! period boundaries pass straight through to the wrapped unit.
//!
//! In a schedule, a modifier is selected with a key suffix: `m_a` or
//! `minute_after` for [`After`], `h_b` or `hour_before` for [`Before`].
//!
//! # Functions
//!
//! - [`Modifier::from_suffix`] — Resolve a key suffix to a modifier kind
//! - [`Modifier::pivot`] — Pick the pivot from a value list
//! - [`Modifier::wrap`] — Build the boxed constraint for a unit and pivot

use std::borrow::Cow;

use crate::constraint::{Constraint, Unit};
use crate::moment::Moment;

/// The two modifier kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    After,
    Before,
}

impl Modifier {
    /// `a`/`after` or `b`/`before`.
    pub fn from_suffix(suffix: &str) -> Option<Modifier> {
        match suffix {
            "a" | "after" => Some(Modifier::After),
            "b" | "before" => Some(Modifier::Before),
            _ => None,
        }
    }

    /// The pivot of a value list: the smallest value for `After`, the
    /// largest for `Before`. Zero counts as zero here, even for units where
    /// it otherwise means "last". `None` for an empty list.
    pub fn pivot(self, values: &[i64]) -> Option<i64> {
        match self {
            Modifier::After => values.iter().copied().min(),
            Modifier::Before => values.iter().copied().max(),
        }
    }

    /// Wrap `unit` around `pivot`.
    pub fn wrap(self, unit: Unit, pivot: i64) -> Box<dyn Constraint> {
        match self {
            Modifier::After => Box::new(After::new(unit, pivot)),
            Modifier::Before => Box::new(Before::new(unit, pivot)),
        }
    }
}

// ── After ───────────────────────────────────────────────────────────────────

/// Valid whenever the unit's value is at least `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct After {
    unit: Unit,
    value: i64,
}

impl After {
    pub fn new(unit: Unit, value: i64) -> Self {
        After { unit, value }
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

impl Constraint for After {
    fn unit(&self) -> Unit {
        self.unit
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Owned(format!("after {}", self.unit))
    }

    fn range(&self) -> i64 {
        self.unit
            .nominal_max()
            .saturating_sub(self.value)
            .saturating_mul(self.unit.range())
    }

    fn is_valid(&self, d: &Moment, _value: i64) -> bool {
        self.unit.val(d) >= self.value
    }

    /// Steps to the pivot, or to the start of the next period when asked
    /// for any other value.
    fn next(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = if value == self.value {
            value
        } else {
            self.unit.extent(d).min
        };
        self.unit.next(d, value)
    }

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = if value == self.value {
            self.unit.extent(d).max
        } else {
            self.value - 1
        };
        self.unit.prev(d, value)
    }
}

// ── Before ──────────────────────────────────────────────────────────────────

/// Valid whenever the unit's value is below `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Before {
    unit: Unit,
    value: i64,
}

impl Before {
    pub fn new(unit: Unit, value: i64) -> Self {
        Before { unit, value }
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

impl Constraint for Before {
    fn unit(&self) -> Unit {
        self.unit
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Owned(format!("before {}", self.unit))
    }

    fn range(&self) -> i64 {
        self.unit.range().saturating_mul(self.value.saturating_sub(1))
    }

    fn is_valid(&self, d: &Moment, _value: i64) -> bool {
        self.unit.val(d) < self.value
    }

    /// Steps to the start of the next period when asked for the pivot,
    /// otherwise to the pivot itself (the first invalid value).
    fn next(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = if value == self.value {
            self.unit.extent(d).min
        } else {
            self.value
        };
        self.unit.next(d, value)
    }

    fn prev(&self, d: &Moment, value: i64) -> Option<Moment> {
        let value = if value == self.value {
            self.value - 1
        } else {
            self.unit.extent(d).max
        };
        self.unit.prev(d, value)
    }
}
