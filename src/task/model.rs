//! Task data model

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Numeric task ID, assigned by the store starting at 1.
///
/// IDs are never reused, even after the task they named is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Create a task ID from a raw number
    pub fn new(n: u64) -> Self {
        Self(n)
    }

    /// Parse a task ID from user input (plain number, optional `#` prefix)
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('#');
        match s.parse::<u64>() {
            Ok(n) if n > 0 => Some(Self(n)),
            _ => None,
        }
    }

    /// Get the numeric value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Parse priority from text
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" | "med" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Get the text label
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Get the short indicator used in table output
    pub fn indicator(&self) -> &'static str {
        match self {
            Self::High => "[H]",
            Self::Medium => "[M]",
            Self::Low => "[L]",
        }
    }

    /// Sort rank: High sorts before Medium sorts before Low
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How often a task repeats.
///
/// Completing a task with a recurrence other than `None` spawns a fresh
/// incomplete copy with the due date advanced by one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    /// Parse recurrence from text
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Some(Self::None),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    /// Get the text label
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Whether this value schedules a repeat at all
    pub fn repeats(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task ID
    pub id: TaskId,

    /// Task title (never empty after validation)
    pub title: String,

    /// Free-form description, may be empty
    #[serde(default)]
    pub description: String,

    /// Completion state
    #[serde(default)]
    pub completed: bool,

    /// Priority level
    #[serde(default)]
    pub priority: Priority,

    /// Tags in insertion order, deduplicated case-insensitively
    #[serde(default)]
    pub tags: Vec<String>,

    /// Due date (if any)
    #[serde(default)]
    pub due_date: Option<NaiveDateTime>,

    /// Recurrence interval
    #[serde(default)]
    pub recurrence: Recurrence,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last mutated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Validate the task against the model invariants
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_parts(&self.title, &self.tags, self.due_date, self.recurrence)
    }

    /// Whether any tag matches `tag` case-insensitively
    pub fn has_tag(&self, tag: &str) -> bool {
        let needle = tag.trim().to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == needle)
    }
}

/// Fields for creating a new task. The store assigns the id and timestamps.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDateTime>,
    pub recurrence: Recurrence,
}

impl TaskDraft {
    /// Start a draft with just a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_due_date(mut self, due: NaiveDateTime) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    /// Validate the draft against the model invariants
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_parts(&self.title, &self.tags, self.due_date, self.recurrence)
    }
}

/// Partial update for an existing task. `None` fields keep their current
/// value; a patch cannot clear a due date once set.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
    pub due_date: Option<NaiveDateTime>,
    pub recurrence: Option<Recurrence>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn due_date(mut self, due: NaiveDateTime) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }
}

/// Rejected input on create and update
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task title must not be empty")]
    EmptyTitle,

    #[error("unknown priority '{0}' (expected high, medium, or low)")]
    InvalidPriority(String),

    #[error("unknown recurrence '{0}' (expected none, daily, weekly, or monthly)")]
    InvalidRecurrence(String),

    #[error("recurring tasks must have a due date")]
    MissingDueDate,

    #[error("tags must not be empty")]
    EmptyTag,

    #[error("invalid due date '{0}' (expected YYYY-MM-DD or YYYY-MM-DD HH:MM)")]
    InvalidDueDate(String),
}

fn validate_parts(
    title: &str,
    tags: &[String],
    due_date: Option<NaiveDateTime>,
    recurrence: Recurrence,
) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if tags.iter().any(|t| t.trim().is_empty()) {
        return Err(ValidationError::EmptyTag);
    }
    if recurrence.repeats() && due_date.is_none() {
        return Err(ValidationError::MissingDueDate);
    }
    Ok(())
}

/// Trim tags and drop case-insensitive duplicates, keeping the first
/// occurrence's spelling and position.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(trimmed.to_string());
    }
    out
}
