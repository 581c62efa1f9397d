//! Occurrence search over a full recurrence definition.
//!
//! A [`Recurrence`] combines any number of compiled schedules (an instant
//! is an occurrence when *any* of them matches) with any number of
//! exception schedules (an instant inside the valid range of *any*
//! exception is excluded). Searches run forward or backward from a start
//! instant, optionally stop at an end bound, and return either points or
//! [`Span`]s.
//!
//! # Functions
//!
//! - [`Recurrence::is_valid`] — Whether an instant is an occurrence
//! - [`Recurrence::next`] / [`Recurrence::prev`] — The next or previous `count` occurrences
//! - [`Recurrence::next_range`] / [`Recurrence::prev_range`] — The next or previous `count` valid spans
//! - [`Recurrence::all`] — Every occurrence between two instants
//!
//! # Examples
//!
//! ```
//! use cadence_engine::{Occurrences, Recurrence, RecurrenceDef};
//! use chrono::{TimeZone, Utc};
//!
//! let def = RecurrenceDef::from_json(
//!     r#"{"recurrences": [{"Y": [2015, 2016, 2017]}], "exceptions": [{"Y": [2015]}]}"#,
//! )
//! .unwrap();
//! let recurrence = Recurrence::new(&def).unwrap();
//!
//! let start = Utc.with_ymd_and_hms(2013, 3, 21, 0, 0, 5).unwrap();
//! assert_eq!(
//!     recurrence.next(1, Some(start), None),
//!     Occurrences::One(Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap())
//! );
//! ```

use std::cmp;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{CadenceError, Result};
use crate::moment::Moment;
use crate::schedule::{CompiledSchedule, Direction, ScheduleDef};

// ── Definition ──────────────────────────────────────────────────────────────

/// Uncompiled recurrence: `{"recurrences": [...], "exceptions": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceDef {
    #[serde(default)]
    pub recurrences: Vec<ScheduleDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<ScheduleDef>,
}

impl RecurrenceDef {
    pub fn new(recurrences: impl IntoIterator<Item = ScheduleDef>) -> Self {
        RecurrenceDef {
            recurrences: recurrences.into_iter().collect(),
            exceptions: Vec::new(),
        }
    }

    /// Add an exception schedule.
    pub fn except(mut self, exception: ScheduleDef) -> Self {
        self.exceptions.push(exception);
        self
    }

    /// Parse the JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::InvalidDefinition`] when the document does not
    /// have the expected shape. A missing `recurrences` list parses as empty
    /// and is rejected later by [`Recurrence::new`].
    pub fn from_json(json: &str) -> Result<RecurrenceDef> {
        serde_json::from_str(json).map_err(|e| CadenceError::InvalidDefinition(e.to_string()))
    }
}

// ── Results ─────────────────────────────────────────────────────────────────

/// The outcome of a search.
///
/// `One` is only produced when exactly one result was asked for. Serializes
/// as `null`, a bare value, or an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Occurrences<T> {
    /// Nothing satisfies the recurrence within the bounds and budget.
    Never,
    One(T),
    Many(Vec<T>),
}

impl<T> Occurrences<T> {
    fn from_found(mut found: Vec<T>, single: bool) -> Self {
        match found.len() {
            0 => Occurrences::Never,
            1 if single => found.pop().map_or(Occurrences::Never, Occurrences::One),
            _ => Occurrences::Many(found),
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Occurrences::Never)
    }

    pub fn len(&self) -> usize {
        match self {
            Occurrences::Never => 0,
            Occurrences::One(_) => 1,
            Occurrences::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first(&self) -> Option<&T> {
        match self {
            Occurrences::Never => None,
            Occurrences::One(item) => Some(item),
            Occurrences::Many(items) => items.first(),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Occurrences::Never => Vec::new(),
            Occurrences::One(item) => vec![item],
            Occurrences::Many(items) => items,
        }
    }
}

/// A maximal interval during which the recurrence holds. The start is
/// inclusive and the end exclusive. `None` on either side means the span is
/// unbounded in that direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl Span {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Span { start, end }
    }
}

// ── Recurrence ──────────────────────────────────────────────────────────────

/// A compiled recurrence bound to a time reference and search budgets.
/// Immutable; searches may run concurrently on a shared instance.
#[derive(Debug)]
pub struct Recurrence {
    schedules: Vec<CompiledSchedule>,
    exceptions: Vec<CompiledSchedule>,
    config: EngineConfig,
}

impl Recurrence {
    /// Compile a definition under the default configuration (UTC).
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::MissingRecurrences`] if the definition has no
    /// recurrence schedules, or any error of
    /// [`CompiledSchedule::compile`] for a malformed schedule.
    pub fn new(def: &RecurrenceDef) -> Result<Recurrence> {
        Recurrence::with_config(def, EngineConfig::default())
    }

    pub fn with_config(def: &RecurrenceDef, config: EngineConfig) -> Result<Recurrence> {
        if def.recurrences.is_empty() {
            return Err(CadenceError::MissingRecurrences);
        }
        let compile = |schedule: &ScheduleDef| {
            CompiledSchedule::compile(schedule)
                .map(|s| s.with_resolve_attempts(config.limits.resolve_attempts))
        };
        let schedules = def.recurrences.iter().map(&compile).collect::<Result<Vec<_>>>()?;
        let exceptions = def.exceptions.iter().map(&compile).collect::<Result<Vec<_>>>()?;
        tracing::trace!(
            schedules = schedules.len(),
            exceptions = exceptions.len(),
            reference = %config.reference,
            "compiled recurrence"
        );
        Ok(Recurrence {
            schedules,
            exceptions,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether `at` is itself an occurrence.
    pub fn is_valid(&self, at: DateTime<Utc>) -> bool {
        !self.next(1, Some(at), Some(at)).is_never()
    }

    /// The next `count` occurrences at or after `start` (default: now), not
    /// later than `end`. A count of zero is treated as one.
    pub fn next(
        &self,
        count: usize,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Occurrences<DateTime<Utc>> {
        self.points(Direction::Next, count, start, end)
    }

    /// The previous `count` occurrences at or before `start`, not earlier
    /// than `end`. Each result is the start of its tick-unit period.
    pub fn prev(
        &self,
        count: usize,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Occurrences<DateTime<Utc>> {
        self.points(Direction::Prev, count, start, end)
    }

    /// The next `count` maximal valid spans. Adjacent spans are merged and
    /// count once.
    pub fn next_range(
        &self,
        count: usize,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Occurrences<Span> {
        self.spans(Direction::Next, count, start, end)
    }

    pub fn prev_range(
        &self,
        count: usize,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Occurrences<Span> {
        self.spans(Direction::Prev, count, start, end)
    }

    /// Every occurrence from `start` up to `end`, limited only by the
    /// `all_attempts` budget. Never collapses to [`Occurrences::One`].
    pub fn all(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Occurrences<DateTime<Utc>> {
        let from = start.unwrap_or_else(Utc::now);
        let found = Cursor::new(
            self,
            Direction::Next,
            from,
            end,
            self.config.limits.all_attempts,
        )
        .points(None);
        Occurrences::from_found(found, false)
    }

    fn points(
        &self,
        dir: Direction,
        count: usize,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Occurrences<DateTime<Utc>> {
        let count = count.max(1);
        let from = start.unwrap_or_else(Utc::now);
        let found = Cursor::new(self, dir, from, end, self.config.limits.search_attempts)
            .points(Some(count));
        Occurrences::from_found(found, count == 1)
    }

    fn spans(
        &self,
        dir: Direction,
        count: usize,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Occurrences<Span> {
        let count = count.max(1);
        let from = start.unwrap_or_else(Utc::now);
        let found =
            Cursor::new(self, dir, from, end, self.config.limits.search_attempts).spans(count);
        Occurrences::from_found(found, count == 1)
    }
}

// ── Search state ────────────────────────────────────────────────────────────

/// The valid range of one exception schedule. `end` is `None` when the
/// exception never stops holding.
#[derive(Debug)]
struct Excluded {
    start: Moment,
    end: Option<Moment>,
}

impl Excluded {
    fn resolve(schedule: &CompiledSchedule, dir: Direction, d: &Moment) -> Option<Excluded> {
        let start = schedule.start(dir, d)?;
        let end = schedule.end(dir, &start);
        Some(Excluded { start, end })
    }
}

enum Overlap {
    Clear,
    Until(Moment),
    Forever,
}

/// One search in progress: the pending start of every schedule and the
/// pending range of every exception, all relative to the search position.
struct Cursor<'r> {
    dir: Direction,
    from: DateTime<Utc>,
    bound: Option<DateTime<Utc>>,
    schedules: &'r [CompiledSchedule],
    exceptions: &'r [CompiledSchedule],
    starts: Vec<Option<Moment>>,
    ranges: Vec<Option<Excluded>>,
    budget: usize,
    attempts: usize,
}

fn is_at(start: &Option<Moment>, at: &Moment) -> bool {
    start.as_ref().is_some_and(|s| s.at() == at.at())
}

fn one_second_after(at: DateTime<Utc>) -> DateTime<Utc> {
    at.checked_add_signed(Duration::seconds(1)).unwrap_or(at)
}

impl<'r> Cursor<'r> {
    fn new(
        recurrence: &'r Recurrence,
        dir: Direction,
        from: DateTime<Utc>,
        bound: Option<DateTime<Utc>>,
        attempts: usize,
    ) -> Self {
        let origin = Moment::new(from, recurrence.config.reference);
        let starts = recurrence
            .schedules
            .iter()
            .map(|schedule| schedule.start(dir, &origin))
            .collect();
        let ranges = recurrence
            .exceptions
            .iter()
            .map(|exception| Excluded::resolve(exception, dir, &origin))
            .collect();
        Cursor {
            dir,
            from,
            bound,
            schedules: &recurrence.schedules,
            exceptions: &recurrence.exceptions,
            starts,
            ranges,
            budget: attempts,
            attempts,
        }
    }

    /// Collect points until `count` are found (or without limit).
    fn points(mut self, count: Option<usize>) -> Vec<DateTime<Utc>> {
        let mut found = Vec::new();
        while count.map_or(true, |count| found.len() < count) {
            let Some(next) = self.candidate() else {
                break;
            };
            let point = match self.dir {
                Direction::Next => cmp::max(self.from, next.at()),
                Direction::Prev => self.point_start(&next),
            };
            tracing::trace!(at = %point, "accepted occurrence");
            found.push(point);
            self.tick_starts(&next);
        }
        found
    }

    fn spans(mut self, count: usize) -> Vec<Span> {
        let mut found: Vec<Span> = Vec::new();
        while found.len() < count {
            let Some(next) = self.candidate() else {
                break;
            };
            let end = self.range_end(&next);
            let span = self.span(&next, end.as_ref());

            let merged = match (found.last_mut(), self.dir) {
                (Some(last), Direction::Next) if last.end.is_some() && last.end == span.start => {
                    last.end = span.end;
                    true
                }
                (Some(last), Direction::Prev) if last.start.is_some() && last.start == span.end => {
                    last.start = span.start;
                    true
                }
                _ => false,
            };
            if !merged {
                tracing::trace!(start = ?span.start, end = ?span.end, "accepted span");
                found.push(span);
            }

            let Some(end) = end else {
                break;
            };
            self.advance_starts(&end);
        }
        found
    }

    /// Span for an accepted candidate whose valid range stops at `end`,
    /// clamped to the search start and end bound.
    fn span(&self, next: &Moment, end: Option<&Moment>) -> Span {
        match self.dir {
            Direction::Next => Span {
                start: Some(cmp::max(self.from, next.at())),
                end: match (end, self.bound) {
                    (Some(end), Some(bound)) => Some(cmp::min(end.at(), bound)),
                    (Some(end), None) => Some(end.at()),
                    (None, bound) => bound,
                },
            },
            Direction::Prev => Span {
                start: match (end, self.bound) {
                    (Some(end), Some(bound)) => Some(cmp::max(bound, one_second_after(end.at()))),
                    (Some(end), None) => Some(one_second_after(end.at())),
                    (None, bound) => bound,
                },
                end: Some(cmp::min(self.from, one_second_after(next.at()))),
            },
        }
    }

    /// The nearest schedule start that is inside the bound and outside
    /// every exception range. `None` ends the search.
    fn candidate(&mut self) -> Option<Moment> {
        while self.attempts > 0 {
            self.attempts -= 1;

            let next = self.nearest_start()?;
            if let Some(bound) = self.bound {
                if self.dir.is_beyond(next.at(), bound) {
                    return None;
                }
            }
            if self.exceptions.is_empty() {
                return Some(next);
            }

            self.refresh_ranges(&next);
            match self.overlap(&next) {
                Overlap::Clear => return Some(next),
                Overlap::Until(end) => {
                    tracing::trace!(at = %next.at(), until = %end.at(), "candidate excluded");
                    self.advance_starts(&end);
                }
                Overlap::Forever => {
                    tracing::debug!(at = %next.at(), "unbounded exception range ends the search");
                    return None;
                }
            }
        }
        tracing::debug!(budget = self.budget, "occurrence search exhausted its iteration budget");
        None
    }

    fn nearest_start(&self) -> Option<Moment> {
        let mut nearest: Option<&Moment> = None;
        for start in self.starts.iter().flatten() {
            if nearest.map_or(true, |n| self.dir.is_beyond(n.at(), start.at())) {
                nearest = Some(start);
            }
        }
        nearest.cloned()
    }

    /// Re-resolve every schedule whose pending start is not beyond `at`.
    fn advance_starts(&mut self, at: &Moment) {
        let dir = self.dir;
        for (schedule, start) in self.schedules.iter().zip(self.starts.iter_mut()) {
            if start.as_ref().is_some_and(|s| !dir.is_beyond(s.at(), at.at())) {
                *start = schedule.start(dir, at);
            }
        }
    }

    /// Re-resolve every exception range that starts at or before `at`.
    fn refresh_ranges(&mut self, at: &Moment) {
        let dir = self.dir;
        for (exception, range) in self.exceptions.iter().zip(self.ranges.iter_mut()) {
            if range
                .as_ref()
                .is_some_and(|r| !dir.is_beyond(r.start.at(), at.at()))
            {
                *range = Excluded::resolve(exception, dir, at);
            }
        }
    }

    /// Whether `at` falls inside an exception range, and if so where the
    /// furthest such range ends.
    fn overlap(&self, at: &Moment) -> Overlap {
        let mut until: Option<&Moment> = None;
        for range in self.ranges.iter().flatten() {
            if self.dir.is_beyond(range.start.at(), at.at()) {
                continue;
            }
            match &range.end {
                None => return Overlap::Forever,
                Some(end) if self.dir.is_beyond(end.at(), at.at()) => {
                    if until.map_or(true, |u| self.dir.is_beyond(end.at(), u.at())) {
                        until = Some(end);
                    }
                }
                Some(_) => {}
            }
        }
        until.cloned().map_or(Overlap::Clear, Overlap::Until)
    }

    fn nearest_exception_start(&self) -> Option<&Moment> {
        let mut nearest: Option<&Moment> = None;
        for range in self.ranges.iter().flatten() {
            if nearest.map_or(true, |n| self.dir.is_beyond(n.at(), range.start.at())) {
                nearest = Some(&range.start);
            }
        }
        nearest
    }

    /// Where the valid range beginning at `next` stops: the furthest end
    /// among the schedules starting there, cut short by the nearest
    /// exception. `None` when the range never ends.
    fn range_end(&self, next: &Moment) -> Option<Moment> {
        let limit = self.nearest_exception_start();
        let mut result: Option<Option<Moment>> = None;
        for (schedule, start) in self.schedules.iter().zip(&self.starts) {
            if !is_at(start, next) {
                continue;
            }
            let end = schedule.end(self.dir, next);
            if let Some(limit) = limit {
                let past_limit = end
                    .as_ref()
                    .map_or(true, |e| self.dir.is_beyond(e.at(), limit.at()));
                if past_limit {
                    return Some(limit.clone());
                }
            }
            result = match (result, end) {
                (Some(None), _) | (_, None) => Some(None),
                (Some(Some(current)), Some(end)) => {
                    if self.dir.is_beyond(end.at(), current.at()) {
                        Some(Some(end))
                    } else {
                        Some(Some(current))
                    }
                }
                (None, Some(end)) => Some(Some(end)),
            };
        }
        result.flatten()
    }

    /// Start of the tick period of an occurrence found searching backward,
    /// clamped to the end bound.
    fn point_start(&self, next: &Moment) -> DateTime<Utc> {
        let mut result: Option<DateTime<Utc>> = None;
        for (schedule, start) in self.schedules.iter().zip(&self.starts) {
            if !is_at(start, next) {
                continue;
            }
            let start = schedule.tick_start(next).at();
            if let Some(bound) = self.bound {
                if start < bound {
                    return bound;
                }
            }
            if result.map_or(true, |r| start > r) {
                result = Some(start);
            }
        }
        result.unwrap_or(next.at())
    }

    /// Step every schedule that produced `next` one tick past it.
    fn tick_starts(&mut self, next: &Moment) {
        let dir = self.dir;
        for (schedule, start) in self.schedules.iter().zip(self.starts.iter_mut()) {
            if is_at(start, next) {
                *start = schedule.start(dir, &schedule.tick(dir, next));
            }
        }
    }
}
