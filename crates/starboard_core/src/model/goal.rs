//! Goal ("star") domain model.
//!
//! # Responsibility
//! - Define the canonical goal record and its canvas position.
//! - Provide validation and partial-update helpers.
//!
//! # Invariants
//! - `id` is stable and never reused for another goal.
//! - `title` is non-empty after trim.
//! - `due_date`, when set, is a `YYYY-MM-DD` calendar date.
//! - `position` coordinates are finite.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static DUE_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("valid due date regex")
});

/// Stable identifier for a goal.
pub type GoalId = Uuid;

/// Point on the board canvas, in screen/canvas units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance between two points.
    pub fn distance_to(self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Returns `self - origin` as a vector stored in a `Position`.
    pub fn offset_from(self, origin: Position) -> Position {
        Position::new(self.x - origin.x, self.y - origin.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Validation failures for goal records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    /// Title is empty after trim.
    EmptyTitle,
    /// Due date is not a `YYYY-MM-DD` value.
    InvalidDueDate(String),
    /// Position contains NaN or infinity.
    NonFinitePosition,
}

impl Display for GoalValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "goal title must not be empty"),
            Self::InvalidDueDate(value) => {
                write!(f, "invalid due date `{value}`; expected YYYY-MM-DD")
            }
            Self::NonFinitePosition => write!(f, "goal position must be finite"),
        }
    }
}

impl Error for GoalValidationError {}

/// Canonical goal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    pub description: Option<String>,
    /// Calendar date in `YYYY-MM-DD` form.
    pub due_date: Option<String>,
    pub completed: bool,
    pub position: Position,
    /// Soft "black hole" flag. Archived goals are hidden from the board.
    pub archived: bool,
    /// Epoch milliseconds, assigned by storage.
    pub created_at: i64,
    /// Epoch milliseconds, assigned by storage. Strictly increases per write.
    pub updated_at: i64,
}

impl Goal {
    /// Creates an active, incomplete goal with a generated stable ID.
    ///
    /// Timestamps stay `0` until the record is persisted and read back.
    pub fn new(title: impl Into<String>, position: Position) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            due_date: None,
            completed: false,
            position,
            archived: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Validates record invariants before persistence.
    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.title.trim().is_empty() {
            return Err(GoalValidationError::EmptyTitle);
        }
        if let Some(due_date) = self.due_date.as_deref() {
            validate_due_date(due_date)?;
        }
        if !self.position.is_finite() {
            return Err(GoalValidationError::NonFinitePosition);
        }
        Ok(())
    }

    /// Returns whether the goal belongs on the active board.
    pub fn is_active(&self) -> bool {
        !self.archived
    }
}

/// Checks the `YYYY-MM-DD` shape of a due date.
pub fn validate_due_date(value: &str) -> Result<(), GoalValidationError> {
    if DUE_DATE_RE.is_match(value) {
        Ok(())
    } else {
        Err(GoalValidationError::InvalidDueDate(value.to_string()))
    }
}

/// Partial goal update. `None` leaves a field untouched.
///
/// Nullable fields use `Option<Option<_>>` so callers can clear them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<String>>,
    pub completed: Option<bool>,
    pub position: Option<Position>,
    pub archived: Option<bool>,
}

impl GoalPatch {
    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn archived(archived: bool) -> Self {
        Self {
            archived: Some(archived),
            ..Self::default()
        }
    }

    /// Unarchives and moves the goal in one write.
    pub fn restore_at(position: Position) -> Self {
        Self {
            archived: Some(false),
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Copies every set field onto `goal`. Does not validate.
    pub fn apply_to(&self, goal: &mut Goal) {
        if let Some(title) = self.title.as_ref() {
            goal.title = title.trim().to_string();
        }
        if let Some(description) = self.description.as_ref() {
            goal.description = normalize_optional_text(description.as_deref());
        }
        if let Some(due_date) = self.due_date.as_ref() {
            goal.due_date = normalize_optional_text(due_date.as_deref());
        }
        if let Some(completed) = self.completed {
            goal.completed = completed;
        }
        if let Some(position) = self.position {
            goal.position = position;
        }
        if let Some(archived) = self.archived {
            goal.archived = archived;
        }
    }
}

/// Trims optional free text and maps blank values to `None`.
pub fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}
