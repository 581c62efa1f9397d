//! Schedule definitions and their compiled, searchable form.
//!
//! A [`ScheduleDef`] maps constraint keys (`"h"`, `"dayOfWeek"`, `"m_a"`, ...)
//! to the values each dimension accepts. An instant satisfies the schedule
//! when it satisfies every entry. [`CompiledSchedule::compile`] resolves the
//! keys, normalises the value sets and orders the constraints from the
//! coarsest to the finest, so that a search always makes the largest jump
//! available first. The finest constraint is the *tick* unit used to step
//! from one occurrence to the next.
//!
//! # Functions
//!
//! - [`CompiledSchedule::start`] — First valid instant at or beyond a position
//! - [`CompiledSchedule::end`] — First instant beyond a valid position that is no longer valid
//! - [`CompiledSchedule::tick`] — Step one tick-unit period past a position
//! - [`CompiledSchedule::tick_start`] — Start of the tick-unit period holding a position

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constraint::{Constraint, Unit};
use crate::error::{CadenceError, Result};
use crate::modifier::Modifier;
use crate::moment::Moment;
use crate::sequence::{self, Extent};

/// Default budget for [`CompiledSchedule::start`].
pub const DEFAULT_RESOLVE_ATTEMPTS: usize = 1_000_000;

// ── Direction ───────────────────────────────────────────────────────────────

/// Search direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    /// Whether `a` lies strictly beyond `b` when moving in this direction.
    pub fn is_beyond(self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        match self {
            Direction::Next => a > b,
            Direction::Prev => a < b,
        }
    }

    fn seek(self, val: i64, values: &[i64], extent: Extent) -> Option<i64> {
        match self {
            Direction::Next => sequence::next(val, values, extent),
            Direction::Prev => sequence::prev(val, values, extent),
        }
    }

    fn seek_invalid(self, val: i64, values: &[i64], extent: Extent) -> Option<i64> {
        match self {
            Direction::Next => sequence::next_invalid(val, values, extent),
            Direction::Prev => sequence::prev_invalid(val, values, extent),
        }
    }

    fn jump(self, constraint: &dyn Constraint, d: &Moment, value: i64) -> Option<Moment> {
        match self {
            Direction::Next => constraint.next(d, value),
            Direction::Prev => constraint.prev(d, value),
        }
    }
}

// ── Definition ──────────────────────────────────────────────────────────────

/// An uncompiled schedule: constraint keys with their accepted values, in
/// insertion order.
///
/// Order matters when two constraints span the same range (day of month and
/// day of week, say): the one inserted last becomes the tick unit.
///
/// # Examples
///
/// ```
/// use cadence_engine::ScheduleDef;
///
/// let def: ScheduleDef = serde_json::from_str(r#"{"dw": [3, 5], "h": [4], "m": [30]}"#).unwrap();
/// assert_eq!(def, ScheduleDef::new().with("dw", [3, 5]).with("h", [4]).with("m", [30]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleDef {
    entries: Vec<(String, Vec<i64>)>,
}

impl ScheduleDef {
    pub fn new() -> Self {
        ScheduleDef::default()
    }

    /// Builder form of [`insert`](ScheduleDef::insert).
    pub fn with(mut self, key: impl Into<String>, values: impl Into<Vec<i64>>) -> Self {
        self.insert(key, values);
        self
    }

    /// Set the values for `key`, keeping its original position if present.
    pub fn insert(&mut self, key: impl Into<String>, values: impl Into<Vec<i64>>) {
        let key = key.into();
        let values = values.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = values,
            None => self.entries.push((key, values)),
        }
    }

    pub fn entries(&self) -> &[(String, Vec<i64>)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ScheduleDef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScheduleDef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct DefVisitor;

        impl<'de> Visitor<'de> for DefVisitor {
            type Value = ScheduleDef;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of constraint keys to integer lists")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<ScheduleDef, A::Error> {
                let mut def = ScheduleDef::new();
                while let Some((key, values)) = map.next_entry::<String, Vec<i64>>()? {
                    def.insert(key, values);
                }
                Ok(def)
            }
        }

        deserializer.deserialize_map(DefVisitor)
    }
}

// ── Compiled schedule ───────────────────────────────────────────────────────

struct Entry {
    constraint: Box<dyn Constraint>,
    values: Vec<i64>,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("constraint", &self.constraint.name())
            .field("values", &self.values)
            .finish()
    }
}

/// A schedule ready for searching. Immutable and reusable.
#[derive(Debug)]
pub struct CompiledSchedule {
    /// Every constraint but the tick unit, coarsest first.
    coarse: Vec<Entry>,
    tick: Entry,
    resolve_attempts: usize,
}

impl CompiledSchedule {
    /// Compile a definition.
    ///
    /// # Errors
    ///
    /// - [`CadenceError::UnknownConstraint`] for an unrecognised key
    /// - [`CadenceError::UnknownModifier`] for a suffix other than `a`, `after`, `b` or `before`
    /// - [`CadenceError::InvalidValue`] for a negative value
    /// - [`CadenceError::EmptySchedule`] when no entry has any values
    ///
    /// # Examples
    ///
    /// ```
    /// use cadence_engine::{CompiledSchedule, ScheduleDef};
    ///
    /// let schedule = CompiledSchedule::compile(&ScheduleDef::new().with("h", [9]).with("dw", [2])).unwrap();
    /// assert_eq!(schedule.tick_unit().name(), "hour");
    /// ```
    pub fn compile(def: &ScheduleDef) -> Result<CompiledSchedule> {
        let mut entries = Vec::with_capacity(def.entries().len());
        for (key, values) in def.entries() {
            if let Some(entry) = compile_entry(key, values)? {
                entries.push(entry);
            }
        }

        // Stable, so equal ranges keep definition order.
        entries.sort_by(|a, b| b.constraint.range().cmp(&a.constraint.range()));

        let tick = entries
            .pop()
            .ok_or_else(|| CadenceError::EmptySchedule("no constraint has any values".to_string()))?;

        Ok(CompiledSchedule {
            coarse: entries,
            tick,
            resolve_attempts: DEFAULT_RESOLVE_ATTEMPTS,
        })
    }

    /// Replace the iteration budget of [`start`](CompiledSchedule::start).
    pub fn with_resolve_attempts(mut self, attempts: usize) -> Self {
        self.resolve_attempts = attempts;
        self
    }

    /// The finest constraint, which steps the search between occurrences.
    pub fn tick_unit(&self) -> &dyn Constraint {
        self.tick.constraint.as_ref()
    }

    /// Constraints with their normalised value sets, coarsest first.
    pub fn constraints(&self) -> impl Iterator<Item = (&dyn Constraint, &[i64])> {
        self.entries()
            .map(|entry| (entry.constraint.as_ref(), entry.values.as_slice()))
    }

    fn entries(&self) -> impl DoubleEndedIterator<Item = &Entry> {
        self.coarse.iter().chain(std::iter::once(&self.tick))
    }

    /// The first valid instant at or beyond `d`, snapped to the start (next)
    /// or end (prev) of its tick-unit period.
    ///
    /// Each pass checks the constraints coarsest first and jumps on the
    /// first one that fails, then starts over. `None` when a jump runs out of
    /// range or the iteration budget is spent.
    pub fn start(&self, dir: Direction, d: &Moment) -> Option<Moment> {
        let mut next = d.clone();
        let mut attempts = self.resolve_attempts;

        'resolve: loop {
            if attempts == 0 {
                tracing::debug!(
                    budget = self.resolve_attempts,
                    at = %next.at(),
                    "schedule start exhausted its iteration budget"
                );
                return None;
            }
            attempts -= 1;

            for entry in self.entries() {
                let constraint = entry.constraint.as_ref();
                let target = dir.seek(
                    constraint.val(&next),
                    &entry.values,
                    constraint.extent(&next),
                )?;
                if !constraint.is_valid(&next, target) {
                    next = dir.jump(constraint, &next, target)?;
                    continue 'resolve;
                }
            }
            break;
        }

        let tick = self.tick_unit();
        Some(match dir {
            Direction::Next => tick.start(&next),
            Direction::Prev => tick.end(&next),
        })
    }

    /// For a valid instant `d`, the nearest instant beyond it at which some
    /// constraint stops being satisfied. `None` when the schedule stays valid
    /// indefinitely.
    pub fn end(&self, dir: Direction, d: &Moment) -> Option<Moment> {
        let mut result: Option<Moment> = None;
        for entry in self.entries().rev() {
            let constraint = entry.constraint.as_ref();
            let Some(target) = dir.seek_invalid(
                constraint.val(d),
                &entry.values,
                constraint.extent(d),
            ) else {
                continue;
            };
            let Some(candidate) = dir.jump(constraint, d, target) else {
                continue;
            };
            let nearer = result
                .as_ref()
                .map_or(true, |r| dir.is_beyond(r.at(), candidate.at()));
            if nearer {
                result = Some(candidate);
            }
        }
        result
    }

    /// One second past the end (next) or before the start (prev) of the
    /// tick-unit period containing `d`.
    pub fn tick(&self, dir: Direction, d: &Moment) -> Moment {
        let tick = self.tick_unit();
        match dir {
            Direction::Next => tick.end(d).plus_seconds(1),
            Direction::Prev => tick.start(d).plus_seconds(-1),
        }
    }

    pub fn tick_start(&self, d: &Moment) -> Moment {
        self.tick_unit().start(d)
    }
}

/// Resolve one definition entry. `Ok(None)` for an empty value list, which
/// places no restriction on its dimension.
fn compile_entry(key: &str, values: &[i64]) -> Result<Option<Entry>> {
    let (name, suffix) = match key.split_once('_') {
        Some((name, suffix)) => (name, Some(suffix)),
        None => (key, None),
    };
    let unit =
        Unit::from_key(name).ok_or_else(|| CadenceError::UnknownConstraint(key.to_string()))?;
    let modifier = suffix
        .map(|s| Modifier::from_suffix(s).ok_or_else(|| CadenceError::UnknownModifier(key.to_string())))
        .transpose()?;

    if let Some(negative) = values.iter().find(|&&v| v < 0) {
        return Err(CadenceError::InvalidValue(format!(
            "{key}: {negative} is negative"
        )));
    }
    if values.is_empty() {
        tracing::trace!(key, "dropping constraint with no values");
        return Ok(None);
    }

    let mut values = values.to_vec();
    values.sort_unstable();
    values.dedup();

    let entry = match modifier {
        // A modified entry is searched by its pivot alone.
        Some(modifier) => {
            let pivot = modifier
                .pivot(&values)
                .ok_or_else(|| CadenceError::EmptySchedule(key.to_string()))?;
            Entry {
                constraint: modifier.wrap(unit, pivot),
                values: vec![pivot],
            }
        }
        None => {
            sequence::sort(&mut values, unit.zero_is_last());
            Entry {
                constraint: Box::new(unit),
                values,
            }
        }
    };
    Ok(Some(entry))
}
