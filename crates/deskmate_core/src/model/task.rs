//! Task record and priority levels.
//!
//! # Invariants
//! - `priority` is persisted as `high|medium|low`.
//! - `is_completed` starts `false` and may flip any number of times.

use super::validation::{require_text, ValidationError};
use super::RecordId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Task urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Storage/wire key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Human-facing label for list rendering.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High priority",
            Self::Medium => "Medium priority",
            Self::Low => "Low priority",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ValidationError::InvalidPriority(value.to_string())),
        }
    }
}

/// One persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    pub priority: Priority,
    pub due_date: NaiveDateTime,
    pub is_completed: bool,
}

/// Caller-supplied fields of a task that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub priority: Priority,
    pub due_date: NaiveDateTime,
}

impl NewTask {
    pub fn new(title: impl Into<String>, priority: Priority, due_date: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            priority,
            due_date,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)
    }
}
