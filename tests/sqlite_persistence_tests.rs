#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use planner_recurrence::{Frequency, RecurrencePattern, SqliteTaskStore, Task, TaskStore};
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn sqlite_store_round_trip_tasks() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteTaskStore::new(file.path()).unwrap();
    assert!(store.load_tasks().expect("load empty store").is_none());

    let tasks = vec![
        Task::new("b", "Second by id, first by position", d(2024, 3, 1))
            .with_category("property")
            .with_recurrence(RecurrencePattern::new(Frequency::BiAnnual).in_months([4, 10])),
        Task::new("a", "One off", d(2024, 3, 2)),
    ];
    store.save_tasks(&tasks).expect("save tasks");

    let reopened = SqliteTaskStore::new(file.path()).unwrap();
    let loaded = reopened
        .load_tasks()
        .expect("load tasks")
        .expect("tasks exist");
    assert_eq!(loaded, tasks);
}

#[test]
fn saving_replaces_previous_snapshot() {
    let store = SqliteTaskStore::in_memory().unwrap();
    store
        .save_tasks(&[Task::new("1", "Old", d(2024, 1, 1))])
        .unwrap();
    store.save_tasks(&[]).unwrap();

    assert_eq!(store.load_tasks().unwrap(), Some(Vec::new()));
}

#[test]
fn invalid_tasks_are_not_written() {
    let store = SqliteTaskStore::in_memory().unwrap();
    let tasks = vec![
        Task::new("1", "Fine", d(2024, 1, 1)),
        Task::new("1", "Duplicate", d(2024, 1, 2)),
    ];
    assert!(store.save_tasks(&tasks).is_err());
    assert!(store.load_tasks().unwrap().is_none());
}
