//! Due-date classification
//!
//! Sorts tasks into reminder buckets against a caller-supplied clock.
//! A task lands in at most one bucket: overdue wins over due-today,
//! which wins over upcoming. Completed tasks and tasks without a due
//! date never produce a reminder.

use chrono::{Duration, NaiveDateTime};
use std::fmt;

use crate::task::Task;

/// Days ahead that count as "upcoming" unless the caller overrides it
pub const DEFAULT_HORIZON_DAYS: i64 = 3;

/// Which reminder bucket a task falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderKind {
    /// Due date is in the past
    Overdue,
    /// Due later today (or right now)
    DueToday,
    /// Due within the horizon, but not today
    Upcoming,
}

impl ReminderKind {
    /// Get the text label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::DueToday => "due today",
            Self::Upcoming => "upcoming",
        }
    }

    /// Get the emoji for this bucket
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Overdue => "🔴",
            Self::DueToday => "⏰",
            Self::Upcoming => "📅",
        }
    }
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}

/// Classify a single task against `now`.
///
/// The buckets are mutually exclusive. A task due earlier today is
/// overdue, not due-today; a task due at `now` exactly is due-today.
/// Upcoming covers `now < due <= now + horizon_days`, excluding today.
pub fn classify(task: &Task, now: NaiveDateTime, horizon_days: i64) -> Option<ReminderKind> {
    if task.completed {
        return None;
    }
    let due = task.due_date?;

    if due < now {
        Some(ReminderKind::Overdue)
    } else if due.date() == now.date() {
        Some(ReminderKind::DueToday)
    } else if due <= horizon_end(now, horizon_days) {
        Some(ReminderKind::Upcoming)
    } else {
        None
    }
}

/// End of the upcoming window. A horizon too large for date arithmetic
/// saturates at the edge of representable time instead of overflowing.
fn horizon_end(now: NaiveDateTime, horizon_days: i64) -> NaiveDateTime {
    Duration::try_days(horizon_days)
        .and_then(|window| now.checked_add_signed(window))
        .unwrap_or(if horizon_days > 0 {
            NaiveDateTime::MAX
        } else {
            NaiveDateTime::MIN
        })
}

/// One task's entry in the reminder report
#[derive(Debug, Clone)]
pub struct Reminder {
    pub task: Task,
    pub kind: ReminderKind,
    /// Signed offset from `now` to the due date; negative when overdue
    pub time_until_due: Duration,
}

impl Reminder {
    /// Short human description of how far out the deadline is
    pub fn describe(&self) -> String {
        let dur = self.time_until_due;
        if dur < Duration::zero() {
            format!("overdue by {}", describe_offset(-dur))
        } else if dur == Duration::zero() {
            "due now".to_string()
        } else {
            format!("due in {}", describe_offset(dur))
        }
    }
}

fn describe_offset(dur: Duration) -> String {
    let minutes = dur.num_minutes();
    if minutes < 60 {
        format!("{}m", minutes.max(1))
    } else if minutes < 24 * 60 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}d", minutes / (24 * 60))
    }
}

/// Reminder report for a whole task list at one instant.
///
/// Buckets keep store order; use [`Reminders::sorted_for_display`] for a
/// deadline-ordered view.
#[derive(Debug, Clone, Default)]
pub struct Reminders {
    pub overdue: Vec<Reminder>,
    pub due_today: Vec<Reminder>,
    pub upcoming: Vec<Reminder>,
}

impl Reminders {
    /// Classify every task in `tasks` against `now`
    pub fn collect<'a>(
        tasks: impl IntoIterator<Item = &'a Task>,
        now: NaiveDateTime,
        horizon_days: i64,
    ) -> Self {
        let mut report = Self::default();
        for task in tasks {
            let Some(kind) = classify(task, now, horizon_days) else {
                continue;
            };
            let Some(due) = task.due_date else {
                continue;
            };
            let reminder = Reminder {
                task: task.clone(),
                kind,
                time_until_due: due - now,
            };
            match kind {
                ReminderKind::Overdue => report.overdue.push(reminder),
                ReminderKind::DueToday => report.due_today.push(reminder),
                ReminderKind::Upcoming => report.upcoming.push(reminder),
            }
        }
        report
    }

    /// Bucket counts
    pub fn summary(&self) -> ReminderSummary {
        ReminderSummary {
            overdue: self.overdue.len(),
            due_today: self.due_today.len(),
            upcoming: self.upcoming.len(),
        }
    }

    /// Whether no task needs attention
    pub fn is_empty(&self) -> bool {
        self.overdue.is_empty() && self.due_today.is_empty() && self.upcoming.is_empty()
    }

    /// All reminders, most urgent bucket first, each bucket ordered by
    /// due date ascending
    pub fn sorted_for_display(&self) -> Vec<&Reminder> {
        let mut out = Vec::with_capacity(self.summary().total());
        for bucket in [&self.overdue, &self.due_today, &self.upcoming] {
            let mut entries: Vec<&Reminder> = bucket.iter().collect();
            entries.sort_by_key(|r| r.task.due_date);
            out.extend(entries);
        }
        out
    }
}

/// Per-bucket counts for a reminder report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReminderSummary {
    pub overdue: usize,
    pub due_today: usize,
    pub upcoming: usize,
}

impl ReminderSummary {
    /// Total reminders across all buckets
    pub fn total(&self) -> usize {
        self.overdue + self.due_today + self.upcoming
    }

    /// Whether every bucket is empty
    pub fn all_clear(&self) -> bool {
        self.total() == 0
    }

    /// One-line summary, e.g. "2 overdue, 1 due today, 3 upcoming"
    pub fn status_line(&self) -> String {
        if self.all_clear() {
            return "all clear".to_string();
        }
        let mut parts = Vec::new();
        if self.overdue > 0 {
            parts.push(format!("{} overdue", self.overdue));
        }
        if self.due_today > 0 {
            parts.push(format!("{} due today", self.due_today));
        }
        if self.upcoming > 0 {
            parts.push(format!("{} upcoming", self.upcoming));
        }
        parts.join(", ")
    }
}
