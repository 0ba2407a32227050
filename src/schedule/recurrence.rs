//! Recurrence date arithmetic
//!
//! Pure functions that compute when the next instance of a repeating
//! task falls due. Daily and weekly are fixed offsets. Monthly replaces
//! the month number (rolling the year past December) and falls back to
//! a 30-day offset when the day does not exist in the target month
//! (a task due Jan 31 repeats on Mar 2).

use chrono::{Datelike, Duration, NaiveDateTime};

use crate::task::{Recurrence, Task, TaskDraft};

/// Compute the due date of the next occurrence.
///
/// Returns `None` for `Recurrence::None`. The time of day is preserved.
pub fn next_occurrence(due: NaiveDateTime, recurrence: Recurrence) -> Option<NaiveDateTime> {
    match recurrence {
        Recurrence::None => None,
        Recurrence::Daily => Some(due + Duration::days(1)),
        Recurrence::Weekly => Some(due + Duration::days(7)),
        Recurrence::Monthly => Some(next_month(due)),
    }
}

/// Build the draft for the follow-up instance of a recurring task.
///
/// Copies everything except completion state and moves the due date one
/// interval forward. Returns `None` when the task does not repeat or
/// carries no due date.
pub fn next_instance(task: &Task) -> Option<TaskDraft> {
    if !task.recurrence.repeats() {
        return None;
    }
    let due = task.due_date?;
    let next_due = next_occurrence(due, task.recurrence)?;

    Some(
        TaskDraft::new(task.title.clone())
            .with_description(task.description.clone())
            .with_priority(task.priority)
            .with_tags(task.tags.clone())
            .with_due_date(next_due)
            .with_recurrence(task.recurrence),
    )
}

fn next_month(due: NaiveDateTime) -> NaiveDateTime {
    let month = due.month() % 12 + 1;
    let rolled = if month == 1 {
        // December wraps into January of the next year
        due.with_month(1).and_then(|d| d.with_year(d.year() + 1))
    } else {
        due.with_month(month)
    };
    rolled.unwrap_or_else(|| due + Duration::days(30))
}
