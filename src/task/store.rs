//! In-memory task store
//!
//! Owns the task list and the ID counter. All mutations validate before
//! they commit, so a failed call leaves the store exactly as it was.

use chrono::Utc;

use super::model::{normalize_tags, Task, TaskDraft, TaskId, TaskPatch, ValidationError};

/// Ordered collection of tasks with monotonically increasing IDs.
///
/// IDs start at 1 and are never reused, even after deletes.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Validate a draft and add it as a new task.
    ///
    /// The ID is only consumed once the draft passes validation, so a
    /// rejected create does not leave a gap in the sequence.
    pub fn create(&mut self, draft: TaskDraft) -> Result<Task, ValidationError> {
        draft.validate()?;

        let id = TaskId::new(self.next_id);
        self.next_id += 1;

        let now = Utc::now();
        let task = Task {
            id,
            title: draft.title,
            description: draft.description,
            completed: false,
            priority: draft.priority,
            tags: normalize_tags(&draft.tags),
            due_date: draft.due_date,
            recurrence: draft.recurrence,
            created_at: now,
            updated_at: now,
        };

        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Look up a task by ID
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Snapshot of all tasks in insertion order.
    ///
    /// Callers can mutate the result freely without touching the store.
    pub fn list_all(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    /// Iterate tasks in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Number of tasks currently stored
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store holds no tasks
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Apply a partial update to a task.
    ///
    /// The patch is merged into a copy of the current task and the merged
    /// result is validated as a whole. On failure nothing changes, not
    /// even `updated_at`. Returns `Ok(None)` when the ID is unknown.
    pub fn update(
        &mut self,
        id: TaskId,
        patch: TaskPatch,
    ) -> Result<Option<Task>, ValidationError> {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return Ok(None);
        };

        let mut candidate = self.tasks[index].clone();
        if let Some(title) = patch.title {
            candidate.title = title;
        }
        if let Some(description) = patch.description {
            candidate.description = description;
        }
        if let Some(completed) = patch.completed {
            candidate.completed = completed;
        }
        if let Some(priority) = patch.priority {
            candidate.priority = priority;
        }
        if let Some(tags) = patch.tags {
            candidate.tags = tags;
        }
        if let Some(due) = patch.due_date {
            candidate.due_date = Some(due);
        }
        if let Some(recurrence) = patch.recurrence {
            candidate.recurrence = recurrence;
        }

        candidate.validate()?;
        candidate.tags = normalize_tags(&candidate.tags);
        candidate.updated_at = Utc::now();

        self.tasks[index] = candidate.clone();
        Ok(Some(candidate))
    }

    /// Flip the completion flag without going through a patch
    pub fn set_completed(&mut self, id: TaskId, completed: bool) -> Option<Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = completed;
        task.updated_at = Utc::now();
        Some(task.clone())
    }

    /// Remove a task, returning it if it existed
    pub fn delete(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index))
    }
}
