//! Search, filter, and sort over task snapshots
//!
//! All functions take a slice and return fresh vectors; nothing here
//! mutates the store. Filter and sort selectors parse from user text and
//! reject anything they do not recognize.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::task::{Priority, Task};

/// Rejected filter or sort selectors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown filter '{0}' (expected status, priority, or tag)")]
    UnknownFilterKind(String),

    #[error("unknown status '{0}' (expected completed or pending)")]
    UnknownStatusValue(String),

    #[error("unknown priority '{0}' (expected high, medium, or low)")]
    UnknownPriorityValue(String),

    #[error("tag filter must not be empty")]
    EmptyTagFilter,

    #[error("unknown sort key '{0}' (expected priority, title, status, or due_date_priority)")]
    UnknownSortKey(String),
}

/// Completion-state filter values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Completed,
    Pending,
}

impl StatusFilter {
    /// Parse a status filter value from text
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "completed" | "done" => Some(Self::Completed),
            "pending" | "incomplete" => Some(Self::Pending),
            _ => None,
        }
    }

    fn matches(&self, task: &Task) -> bool {
        match self {
            Self::Completed => task.completed,
            Self::Pending => !task.completed,
        }
    }
}

/// A single-criterion filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Status(StatusFilter),
    Priority(Priority),
    Tag(String),
}

impl Filter {
    /// Parse a `kind value` pair, e.g. `("priority", "high")`
    pub fn parse(kind: &str, value: &str) -> Result<Self, QueryError> {
        match kind.trim().to_lowercase().as_str() {
            "status" => StatusFilter::parse(value)
                .map(Self::Status)
                .ok_or_else(|| QueryError::UnknownStatusValue(value.trim().to_string())),
            "priority" => Priority::parse(value)
                .map(Self::Priority)
                .ok_or_else(|| QueryError::UnknownPriorityValue(value.trim().to_string())),
            "tag" => {
                let tag = value.trim();
                if tag.is_empty() {
                    Err(QueryError::EmptyTagFilter)
                } else {
                    Ok(Self::Tag(tag.to_string()))
                }
            }
            _ => Err(QueryError::UnknownFilterKind(kind.trim().to_string())),
        }
    }

    fn matches(&self, task: &Task) -> bool {
        match self {
            Self::Status(status) => status.matches(task),
            Self::Priority(priority) => task.priority == *priority,
            Self::Tag(tag) => task.has_tag(tag),
        }
    }
}

/// Available sort orders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// High before medium before low; ties keep store order
    Priority,
    /// Case-insensitive title, ascending
    Title,
    /// Incomplete before completed, then by ID
    Status,
    /// Due date ascending with undated tasks last, then priority, then ID
    DueDatePriority,
}

impl SortKey {
    /// Parse a sort key from text
    pub fn parse(s: &str) -> Result<Self, QueryError> {
        match s.trim().to_lowercase().as_str() {
            "priority" => Ok(Self::Priority),
            "title" => Ok(Self::Title),
            "status" => Ok(Self::Status),
            "due_date_priority" | "due" => Ok(Self::DueDatePriority),
            _ => Err(QueryError::UnknownSortKey(s.trim().to_string())),
        }
    }

    /// Get the text label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::Title => "title",
            Self::Status => "status",
            Self::DueDatePriority => "due_date_priority",
        }
    }
}

/// Case-insensitive substring search over title and description.
///
/// An empty query matches every task.
pub fn search(tasks: &[Task], query: &str) -> Vec<Task> {
    let needle = query.to_lowercase();
    tasks
        .iter()
        .filter(|t| {
            t.title.to_lowercase().contains(&needle)
                || t.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Keep only tasks matching the filter, preserving store order
pub fn filter(tasks: &[Task], filter: &Filter) -> Vec<Task> {
    tasks.iter().filter(|t| filter.matches(t)).cloned().collect()
}

/// Return a copy of `tasks` ordered by `key`
pub fn sort(tasks: &[Task], key: SortKey) -> Vec<Task> {
    let mut out = tasks.to_vec();
    match key {
        // Vec::sort_by_key is stable, so equal ranks keep store order
        SortKey::Priority => out.sort_by_key(|t| t.priority.rank()),
        SortKey::Title => out.sort_by_key(|t| t.title.to_lowercase()),
        SortKey::Status => out.sort_by_key(|t| (t.completed, t.id)),
        SortKey::DueDatePriority => out.sort_by_key(|t| {
            (
                t.due_date.unwrap_or(NaiveDateTime::MAX),
                t.priority.rank(),
                t.id,
            )
        }),
    }
    out
}
