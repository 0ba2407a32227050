//! End-to-end engine lifecycle tests
//!
//! Drives the public engine API through the flows users hit most:
//! create/update/delete round-trips, completion with recurrence, and
//! the combined sort and reminder scenarios.

use chrono::{NaiveDate, NaiveDateTime};
use taskmill::query::SortKey;
use taskmill::schedule::ReminderKind;
use taskmill::task::{Priority, Recurrence, TaskDraft, TaskId, TaskPatch, ValidationError};
use taskmill::TaskEngine;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

#[test]
fn test_ids_survive_delete_without_reuse() {
    let mut engine = TaskEngine::new();
    let first = engine.create(TaskDraft::new("First")).unwrap();
    let second = engine.create(TaskDraft::new("Second")).unwrap();
    assert_eq!(first.id, TaskId::new(1));
    assert_eq!(second.id, TaskId::new(2));

    engine.delete(first.id).unwrap();
    let third = engine.create(TaskDraft::new("Third")).unwrap();
    assert_eq!(
        third.id,
        TaskId::new(3),
        "a deleted id must never be handed out again"
    );
    assert!(engine.get(first.id).is_none());
}

#[test]
fn test_create_get_round_trip() {
    let mut engine = TaskEngine::new();
    let created = engine
        .create(
            TaskDraft::new("Round trip")
                .with_description("All fields set")
                .with_priority(Priority::High)
                .with_tags(vec!["alpha".into(), "beta".into()])
                .with_due_date(at(2025, 6, 10, 9, 0))
                .with_recurrence(Recurrence::Weekly),
        )
        .unwrap();

    let fetched = engine.get(created.id).unwrap();
    assert_eq!(fetched, &created);
    assert_eq!(fetched.tags, vec!["alpha", "beta"]);
    assert!(!fetched.completed);
}

#[test]
fn test_create_empty_title_leaves_engine_empty() {
    let mut engine = TaskEngine::new();
    let err = engine.create(TaskDraft::new("   ")).unwrap_err();
    assert_eq!(err, ValidationError::EmptyTitle);
    assert!(engine.is_empty());
}

#[test]
fn test_update_is_all_or_nothing() {
    let mut engine = TaskEngine::new();
    let task = engine
        .create(TaskDraft::new("Stable").with_priority(Priority::Low))
        .unwrap();
    let before = engine.get(task.id).unwrap().clone();

    // The merged candidate is invalid (recurring without a due date),
    // so neither field may stick
    let err = engine
        .update(
            task.id,
            TaskPatch::new()
                .priority(Priority::High)
                .recurrence(Recurrence::Daily),
        )
        .unwrap_err();
    assert_eq!(err, ValidationError::MissingDueDate);
    assert_eq!(engine.get(task.id).unwrap(), &before);

    // The same patch with a due date goes through atomically
    let updated = engine
        .update(
            task.id,
            TaskPatch::new()
                .priority(Priority::High)
                .recurrence(Recurrence::Daily)
                .due_date(at(2025, 6, 10, 9, 0)),
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.recurrence, Recurrence::Daily);
}

#[test]
fn test_complete_is_idempotent_for_plain_tasks() {
    let mut engine = TaskEngine::new();
    let task = engine.create(TaskDraft::new("Once")).unwrap();

    let first = engine.complete(task.id).unwrap();
    assert!(first.task().completed);
    let second = engine.complete(task.id).unwrap();
    assert!(second.task().completed);
    assert!(second.spawned().is_none());
    assert_eq!(engine.len(), 1, "repeat completion must not clone the task");
}

#[test]
fn test_weekly_completion_schedules_next_week() {
    let mut engine = TaskEngine::new();
    let task = engine
        .create(
            TaskDraft::new("Weekly review")
                .with_due_date(at(2025, 6, 2, 0, 0))
                .with_recurrence(Recurrence::Weekly),
        )
        .unwrap();

    let outcome = engine.complete(task.id).unwrap();
    let next = outcome.spawned().expect("weekly task must spawn a successor");

    assert!(engine.get(task.id).unwrap().completed);
    assert!(!next.completed);
    assert_eq!(next.due_date, Some(at(2025, 6, 9, 0, 0)));
    assert_eq!(next.title, "Weekly review");
    assert_ne!(next.id, task.id);
}

#[test]
fn test_spawned_instance_tags_are_independent() {
    let mut engine = TaskEngine::new();
    let task = engine
        .create(
            TaskDraft::new("Tagged repeat")
                .with_tags(vec!["home".into()])
                .with_due_date(at(2025, 6, 2, 9, 0))
                .with_recurrence(Recurrence::Daily),
        )
        .unwrap();

    let outcome = engine.complete(task.id).unwrap();
    let next_id = outcome.spawned().unwrap().id;

    // Retagging the successor must not touch the completed original
    engine
        .update(next_id, TaskPatch::new().tags(vec!["office".into()]))
        .unwrap()
        .unwrap();
    assert_eq!(engine.get(task.id).unwrap().tags, vec!["home"]);
    assert_eq!(engine.get(next_id).unwrap().tags, vec!["office"]);
}

#[test]
fn test_monthly_edge_dates() {
    let mut engine = TaskEngine::new();

    // Jan 31 has no counterpart in February, so the successor lands a
    // flat 30 days out
    let jan = engine
        .create(
            TaskDraft::new("Rent")
                .with_due_date(at(2025, 1, 31, 8, 0))
                .with_recurrence(Recurrence::Monthly),
        )
        .unwrap();
    let outcome = engine.complete(jan.id).unwrap();
    assert_eq!(outcome.spawned().unwrap().due_date, Some(at(2025, 3, 2, 8, 0)));

    // December wraps into January of the next year
    let dec = engine
        .create(
            TaskDraft::new("Year end")
                .with_due_date(at(2025, 12, 15, 8, 0))
                .with_recurrence(Recurrence::Monthly),
        )
        .unwrap();
    let outcome = engine.complete(dec.id).unwrap();
    assert_eq!(
        outcome.spawned().unwrap().due_date,
        Some(at(2026, 1, 15, 8, 0))
    );
}

#[test]
fn test_daily_completion_crosses_month_boundary() {
    let mut engine = TaskEngine::new();
    let task = engine
        .create(
            TaskDraft::new("Journal")
                .with_due_date(at(2025, 1, 31, 21, 0))
                .with_recurrence(Recurrence::Daily),
        )
        .unwrap();
    let outcome = engine.complete(task.id).unwrap();
    assert_eq!(outcome.spawned().unwrap().due_date, Some(at(2025, 2, 1, 21, 0)));
}

#[test]
fn test_listing_scenario_sorts_and_classifies_together() {
    let mut engine = TaskEngine::new();
    let now = at(2025, 6, 2, 12, 0);

    let a = engine
        .create(
            TaskDraft::new("A report")
                .with_priority(Priority::High)
                .with_due_date(at(2025, 6, 4, 9, 0)),
        )
        .unwrap();
    let b = engine
        .create(
            TaskDraft::new("B errand")
                .with_priority(Priority::Medium)
                .with_due_date(at(2025, 6, 2, 18, 0)),
        )
        .unwrap();
    let c = engine
        .create(TaskDraft::new("C someday").with_priority(Priority::Low))
        .unwrap();

    let sorted = engine.sort(SortKey::DueDatePriority);
    let order: Vec<_> = sorted.iter().map(|t| t.id).collect();
    assert_eq!(order, vec![b.id, a.id, c.id], "due today, then upcoming, then undated");

    let report = engine.reminders_at(now);
    assert_eq!(report.due_today.len(), 1);
    assert_eq!(report.due_today[0].task.id, b.id);
    assert_eq!(report.due_today[0].kind, ReminderKind::DueToday);
    assert_eq!(report.upcoming.len(), 1);
    assert_eq!(report.upcoming[0].task.id, a.id);
    assert!(report.overdue.is_empty());

    // C has no due date and must not appear anywhere
    let all_ids: Vec<_> = report
        .sorted_for_display()
        .into_iter()
        .map(|r| r.task.id)
        .collect();
    assert!(!all_ids.contains(&c.id));
}

#[test]
fn test_search_spans_title_and_description() {
    let mut engine = TaskEngine::new();
    engine
        .create(TaskDraft::new("Call the Bank").with_description("about the mortgage"))
        .unwrap();
    engine
        .create(TaskDraft::new("Groceries").with_description("bank holiday stock-up"))
        .unwrap();
    engine.create(TaskDraft::new("Unrelated")).unwrap();

    let hits = engine.search("BANK");
    assert_eq!(hits.len(), 2);
    assert!(engine.search("nothing like this").is_empty());
}
