//! # cadence-engine
//!
//! Deterministic recurrence evaluation.
//!
//! A recurrence is described declaratively: each schedule restricts some
//! temporal dimensions (hour, day of week, ISO week, ...) to a set of
//! values, several schedules are OR-combined, and exception schedules cut
//! ranges out of the result. The engine finds the next or previous
//! occurrences, or the valid spans, from any instant, in either direction,
//! with a bounded amount of work.
//!
//! ## Modules
//!
//! - [`calendar`] — Civil-calendar arithmetic under an explicit time reference
//! - [`moment`] — Instant plus per-instant field cache
//! - [`sequence`] — Wrap-around search over sorted value sets
//! - [`constraint`] — The temporal units (second through year, full date)
//! - [`modifier`] — After/before wrappers turning a unit into an open interval
//! - [`schedule`] — Schedule definitions and the compiled, searchable form
//! - [`recurrence`] — Occurrence search across schedules and exceptions
//! - [`config`] — Time reference and iteration budgets
//! - [`timer`] — tokio timers firing at occurrences
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use cadence_engine::{Recurrence, RecurrenceDef, ScheduleDef};
//! use chrono::{TimeZone, Utc};
//!
//! // 04:30 every Tuesday and Thursday.
//! let def = RecurrenceDef::new([ScheduleDef::new().with("dw", [3, 5]).with("h", [4]).with("m", [30])]);
//! let recurrence = Recurrence::new(&def).unwrap();
//!
//! let start = Utc.with_ymd_and_hms(2018, 10, 1, 0, 0, 0).unwrap();
//! let end = Utc.with_ymd_and_hms(2018, 11, 1, 0, 0, 0).unwrap();
//! assert_eq!(recurrence.all(Some(start), Some(end)).len(), 9);
//! ```

pub mod calendar;
pub mod config;
pub mod constraint;
pub mod error;
pub mod modifier;
pub mod moment;
pub mod recurrence;
pub mod schedule;
pub mod sequence;
pub mod timer;

pub use calendar::{parse_instant, parse_timezone, TimeReference};
pub use config::{EngineConfig, SearchLimits};
pub use constraint::{Constraint, Unit};
pub use error::{CadenceError, Result};
pub use modifier::{After, Before, Modifier};
pub use moment::Moment;
pub use recurrence::{Occurrences, Recurrence, RecurrenceDef, Span};
pub use schedule::{CompiledSchedule, Direction, ScheduleDef};
pub use sequence::Extent;
pub use timer::{delay_until_next, set_interval, set_timeout, TimerHandle};
