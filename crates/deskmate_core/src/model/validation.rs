//! Input validation errors shared by every record kind and the timer.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected caller input. Raised before any side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace only.
    EmptyField(&'static str),
    /// Time-of-day text is not `HH:MM`.
    InvalidTime(String),
    /// Date text is not `YYYY-MM-DD`.
    InvalidDate(String),
    /// Priority text is not one of `high|medium|low`.
    InvalidPriority(String),
    /// A countdown must last at least one second.
    ZeroDuration,
    /// A countdown too long to schedule on this clock.
    DurationTooLong,
    /// Event date-time is earlier than the current time.
    EventInPast,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "`{field}` must not be empty"),
            Self::InvalidTime(value) => {
                write!(f, "invalid time `{value}`; expected HH:MM")
            }
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidPriority(value) => {
                write!(f, "invalid priority `{value}`; expected high|medium|low")
            }
            Self::ZeroDuration => write!(f, "timer duration must be greater than zero"),
            Self::DurationTooLong => write!(f, "timer duration is too long"),
            Self::EventInPast => write!(f, "events cannot be added in the past"),
        }
    }
}

impl Error for ValidationError {}

/// Fails with `EmptyField(field)` when `value` has no visible characters.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}
