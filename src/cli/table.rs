//! Table and detail rendering
//!
//! Pure formatting: every function returns the text to print, so the
//! interactive loop and the tests share one code path. Column layout
//! follows fixed widths with width-aware truncation for long values.

use chrono::{NaiveDateTime, NaiveTime};

use crate::schedule::{Reminder, ReminderKind, Reminders};
use crate::task::Task;

use super::{pad, truncate};

const TABLE_COL_ID: usize = 4;
const TABLE_COL_DONE: usize = 4;
const TABLE_COL_PRIORITY: usize = 10;
const TABLE_COL_TITLE: usize = 24;
const TABLE_COL_DUE: usize = 16;
const TABLE_COL_TAGS: usize = 14;

/// Format a due date for display; midnight renders date-only
pub fn format_due(due: Option<NaiveDateTime>) -> String {
    match due {
        None => "-".to_string(),
        Some(dt) if dt.time() == NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
    }
}

fn table_header() -> Vec<String> {
    let header = format!(
        "{} {} {} {} {} {} DESCRIPTION",
        pad("ID", TABLE_COL_ID),
        pad("DONE", TABLE_COL_DONE),
        pad("PRIORITY", TABLE_COL_PRIORITY),
        pad("TITLE", TABLE_COL_TITLE),
        pad("DUE", TABLE_COL_DUE),
        pad("TAGS", TABLE_COL_TAGS),
    );
    let rule = "-".repeat(
        TABLE_COL_ID
            + TABLE_COL_DONE
            + TABLE_COL_PRIORITY
            + TABLE_COL_TITLE
            + TABLE_COL_DUE
            + TABLE_COL_TAGS
            + "DESCRIPTION".len()
            + 6,
    );
    vec![header, rule]
}

fn table_row(task: &Task) -> String {
    let done = if task.completed { "[X]" } else { "[ ]" };
    let priority = format!("{} {}", task.priority.indicator(), task.priority.label());
    format!(
        "{} {} {} {} {} {} {}",
        pad(&task.id.to_string(), TABLE_COL_ID),
        pad(done, TABLE_COL_DONE),
        pad(&priority, TABLE_COL_PRIORITY),
        pad(&truncate(&task.title, TABLE_COL_TITLE), TABLE_COL_TITLE),
        pad(&format_due(task.due_date), TABLE_COL_DUE),
        pad(&truncate(&task.tags.join(","), TABLE_COL_TAGS), TABLE_COL_TAGS),
        truncate(&task.description, TABLE_COL_TITLE),
    )
}

/// Render tasks as a fixed-width table
pub fn render_table(tasks: &[Task]) -> String {
    let mut lines = table_header();
    for task in tasks {
        lines.push(table_row(task));
    }
    lines.join("\n")
}

/// Render the reminder block shown above the task list.
///
/// Empty reports render as an empty string so the caller can skip the
/// block entirely.
pub fn render_reminders(reminders: &Reminders) -> String {
    if reminders.is_empty() {
        return String::new();
    }

    let mut lines = vec![format!("Reminders: {}", reminders.summary().status_line())];
    let mut current: Option<ReminderKind> = None;
    for reminder in reminders.sorted_for_display() {
        if current != Some(reminder.kind) {
            let count = match reminder.kind {
                ReminderKind::Overdue => reminders.overdue.len(),
                ReminderKind::DueToday => reminders.due_today.len(),
                ReminderKind::Upcoming => reminders.upcoming.len(),
            };
            lines.push(format!(
                "{} {} ({})",
                reminder.kind.emoji(),
                reminder.kind.label(),
                count
            ));
            current = Some(reminder.kind);
        }
        lines.push(format!(
            "  #{} {} ({})",
            reminder.task.id,
            truncate(&reminder.task.title, TABLE_COL_TITLE),
            reminder.describe()
        ));
    }
    lines.join("\n")
}

/// Render the full detail view for one task
pub fn render_task_details(task: &Task, reminder: Option<&Reminder>) -> String {
    let mut lines = vec![format!("Task #{}: {}", task.id, task.title)];
    if !task.description.is_empty() {
        lines.push(format!("  Description: {}", task.description));
    }
    lines.push(format!(
        "  Status:      {}",
        if task.completed { "completed" } else { "pending" }
    ));
    lines.push(format!(
        "  Priority:    {} {}",
        task.priority.indicator(),
        task.priority.label()
    ));
    lines.push(format!("  Due:         {}", format_due(task.due_date)));
    lines.push(format!(
        "  Tags:        {}",
        if task.tags.is_empty() {
            "-".to_string()
        } else {
            task.tags.join(", ")
        }
    ));
    lines.push(format!("  Recurrence:  {}", task.recurrence.label()));
    lines.push(format!(
        "  Created:     {}",
        task.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    lines.push(format!(
        "  Updated:     {}",
        task.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    if let Some(reminder) = reminder {
        lines.push(format!(
            "  Reminder:    {} ({})",
            reminder.kind,
            reminder.describe()
        ));
    }
    lines.join("\n")
}
