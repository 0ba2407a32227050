//! Scheduling module
//!
//! This module provides the time-based half of the engine:
//! - Reminder classification (overdue / due today / upcoming)
//! - Recurrence arithmetic for repeating tasks
//!
//! Everything here is pure; callers pass the reference clock in.

pub mod recurrence;
pub mod reminders;

pub use recurrence::{next_instance, next_occurrence};
pub use reminders::{
    classify, Reminder, ReminderKind, ReminderSummary, Reminders, DEFAULT_HORIZON_DAYS,
};
