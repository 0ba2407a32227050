//! Taskmill library - in-memory task tracking with scheduling
//!
//! The engine keeps every task in memory for one process run: CRUD with
//! strict validation, due-date reminders against a caller-supplied
//! clock, recurring tasks that respawn on completion, and search/filter/
//! sort over snapshots. The `cli` module wraps it in an interactive
//! shell; nothing below `cli` ever prints.

pub mod cli;
pub mod engine;
pub mod query;
pub mod schedule;
pub mod task;

pub use engine::{Completion, TaskEngine};
