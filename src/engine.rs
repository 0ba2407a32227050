//! Engine facade
//!
//! [`TaskEngine`] owns the store and fronts every operation the
//! interfaces need: CRUD, completion with recurrence, search, filter,
//! sort, and reminder reports. One engine per process; callers that
//! share it across threads wrap it in their own lock.

use chrono::{Local, NaiveDateTime};

use crate::query::{self, Filter, SortKey};
use crate::schedule::{self, Reminder, ReminderKind, Reminders, DEFAULT_HORIZON_DAYS};
use crate::task::{Task, TaskDraft, TaskId, TaskPatch, TaskStore, ValidationError};

/// Outcome of completing a task
#[derive(Debug, Clone)]
pub enum Completion {
    /// The task was marked complete (or already was)
    Completed(Task),
    /// The task was marked complete and, being recurring, spawned the
    /// next instance
    Recurred { completed: Task, next: Task },
}

impl Completion {
    /// The instance that was completed
    pub fn task(&self) -> &Task {
        match self {
            Self::Completed(task) => task,
            Self::Recurred { completed, .. } => completed,
        }
    }

    /// The freshly spawned instance, if any
    pub fn spawned(&self) -> Option<&Task> {
        match self {
            Self::Completed(_) => None,
            Self::Recurred { next, .. } => Some(next),
        }
    }
}

/// In-memory task engine
#[derive(Debug)]
pub struct TaskEngine {
    store: TaskStore,
    horizon_days: i64,
}

impl Default for TaskEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskEngine {
    /// Create an empty engine with the default reminder horizon
    pub fn new() -> Self {
        Self {
            store: TaskStore::new(),
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }

    /// Wrap an existing store
    pub fn from_store(store: TaskStore) -> Self {
        Self {
            store,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }

    /// Override how many days ahead count as "upcoming"
    pub fn with_horizon_days(mut self, days: i64) -> Self {
        self.horizon_days = days;
        self
    }

    /// The configured upcoming window in days
    pub fn horizon_days(&self) -> i64 {
        self.horizon_days
    }

    /// Validate and add a new task
    pub fn create(&mut self, draft: TaskDraft) -> Result<Task, ValidationError> {
        self.store.create(draft)
    }

    /// Look up a task by ID
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.store.get(id)
    }

    /// Snapshot of all tasks in creation order
    pub fn list_all(&self) -> Vec<Task> {
        self.store.list_all()
    }

    /// Number of tasks
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the engine holds no tasks
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Apply a partial update; `Ok(None)` when the ID is unknown
    pub fn update(
        &mut self,
        id: TaskId,
        patch: TaskPatch,
    ) -> Result<Option<Task>, ValidationError> {
        self.store.update(id, patch)
    }

    /// Remove a task, returning it if it existed
    pub fn delete(&mut self, id: TaskId) -> Option<Task> {
        self.store.delete(id)
    }

    /// Mark a task complete.
    ///
    /// Completing a recurring task also creates its next instance, with
    /// the due date advanced by one interval. Completing a task that is
    /// already complete changes nothing and never spawns a duplicate.
    pub fn complete(&mut self, id: TaskId) -> Option<Completion> {
        let current = self.store.get(id)?.clone();
        if current.completed {
            return Some(Completion::Completed(current));
        }

        let completed = self.store.set_completed(id, true)?;
        match schedule::next_instance(&completed) {
            Some(draft) => match self.store.create(draft) {
                Ok(next) => Some(Completion::Recurred { completed, next }),
                // The draft copies fields the store already accepted
                Err(err) => unreachable!("next instance rejected: {err}"),
            },
            None => Some(Completion::Completed(completed)),
        }
    }

    /// Mark a task incomplete again
    pub fn set_incomplete(&mut self, id: TaskId) -> Option<Task> {
        self.store.set_completed(id, false)
    }

    /// Case-insensitive substring search over titles and descriptions
    pub fn search(&self, query: &str) -> Vec<Task> {
        query::search(&self.store.list_all(), query)
    }

    /// Tasks matching a parsed filter, in creation order
    pub fn filter(&self, filter: &Filter) -> Vec<Task> {
        query::filter(&self.store.list_all(), filter)
    }

    /// All tasks ordered by the given key
    pub fn sort(&self, key: SortKey) -> Vec<Task> {
        query::sort(&self.store.list_all(), key)
    }

    /// The main listing order: due date, then priority, then ID
    pub fn sorted_for_display(&self) -> Vec<Task> {
        self.sort(SortKey::DueDatePriority)
    }

    /// Reminder report against an explicit clock
    pub fn reminders_at(&self, now: NaiveDateTime) -> Reminders {
        Reminders::collect(self.store.iter(), now, self.horizon_days)
    }

    /// Reminder report against the local wall clock
    pub fn reminders_now(&self) -> Reminders {
        self.reminders_at(Local::now().naive_local())
    }

    /// Overdue tasks at `now`, in creation order
    pub fn overdue(&self, now: NaiveDateTime) -> Vec<Task> {
        self.bucket(now, ReminderKind::Overdue)
    }

    /// Tasks due on the same calendar day as `now`, in creation order
    pub fn due_today(&self, now: NaiveDateTime) -> Vec<Task> {
        self.bucket(now, ReminderKind::DueToday)
    }

    /// Tasks inside the upcoming horizon at `now`, in creation order
    pub fn upcoming(&self, now: NaiveDateTime) -> Vec<Task> {
        self.bucket(now, ReminderKind::Upcoming)
    }

    fn bucket(&self, now: NaiveDateTime, kind: ReminderKind) -> Vec<Task> {
        self.store
            .iter()
            .filter(|t| schedule::classify(t, now, self.horizon_days) == Some(kind))
            .cloned()
            .collect()
    }

    /// Classify a single task against an explicit clock
    pub fn reminder(&self, id: TaskId, now: NaiveDateTime) -> Option<Reminder> {
        let task = self.store.get(id)?;
        let kind = schedule::classify(task, now, self.horizon_days)?;
        let due = task.due_date?;
        Some(Reminder {
            task: task.clone(),
            kind,
            time_until_due: due - now,
        })
    }
}
