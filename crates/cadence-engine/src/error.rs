//! Error types for cadence-engine operations.
//!
//! Only structurally invalid input is an error. A schedule that simply has
//! no matching instant is reported through `Option::None` or
//! [`Occurrences::Never`](crate::Occurrences::Never), never through
//! [`CadenceError`].

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CadenceError {
    #[error("Definition must include at least one recurrence")]
    MissingRecurrences,

    #[error("Unknown constraint: {0}")]
    UnknownConstraint(String),

    #[error("Unknown modifier: {0}")]
    UnknownModifier(String),

    #[error("Empty schedule: {0}")]
    EmptySchedule(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

pub type Result<T> = std::result::Result<T, CadenceError>;
