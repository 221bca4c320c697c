//! Calendar event record.
//!
//! # Invariants
//! - `notified` moves from `false` to `true` once and never back.

use super::validation::{require_text, ValidationError};
use super::RecordId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One persisted calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub event_datetime: NaiveDateTime,
    pub notified: bool,
}

impl CalendarEvent {
    /// Whether the poller should announce this event at `now`.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        !self.notified && self.event_datetime <= now
    }
}

/// Caller-supplied fields of an event that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub event_datetime: NaiveDateTime,
}

impl NewEvent {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        event_datetime: NaiveDateTime,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            event_datetime,
        }
    }

    /// Only the title is required; an empty description is stored as-is.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)
    }
}
