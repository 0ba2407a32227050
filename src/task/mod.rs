//! Task management module
//!
//! This module provides the task data model and the in-memory store:
//! - Task, priority, recurrence, and tag types
//! - Strict validation for creates and updates
//! - ID allocation (monotonic, never reused)

pub mod model;
pub mod store;

pub use model::{
    normalize_tags, Priority, Recurrence, Task, TaskDraft, TaskId, TaskPatch, ValidationError,
};
pub use store::TaskStore;
