use chrono::NaiveDate;
use planner_recurrence::{
    Frequency, JsonFileStore, PersistenceError, RecurrencePattern, Task, TaskStore,
    load_tasks_from_csv, load_tasks_from_json, save_tasks_to_csv, save_tasks_to_json,
};
use std::io::Write;
use tempfile::{NamedTempFile, tempdir};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_tasks() -> Vec<Task> {
    let mut notes_task = Task::new("2", "Flip mattress", d(2024, 1, 1)).with_recurrence(
        RecurrencePattern::new(Frequency::Seasonal)
            .in_months([3, 9])
            .until(d(2030, 1, 1)),
    );
    notes_task.notes = Some("both sides, rotate too".into());
    vec![
        Task::new("1", "Trash, recycling", d(2024, 1, 1))
            .with_category("home")
            .with_recurrence(RecurrencePattern::new(Frequency::Weekly).on_weekdays([1, 4])),
        notes_task,
        Task::new("3", "Dentist", d(2024, 2, 3)),
        Task::new("4", "Garden", d(2024, 4, 1))
            .with_recurrence(RecurrencePattern::new(Frequency::Monthly).every(2)),
    ]
}

#[test]
fn json_export_import_preserves_tasks() {
    let tmp = NamedTempFile::new().unwrap();
    let tasks = sample_tasks();
    save_tasks_to_json(&tasks, tmp.path()).unwrap();
    let loaded = load_tasks_from_json(tmp.path()).unwrap();
    assert_eq!(loaded, tasks);
}

#[test]
fn csv_export_import_preserves_tasks() {
    let tmp = NamedTempFile::new().unwrap();
    let tasks = sample_tasks();
    save_tasks_to_csv(&tasks, tmp.path()).unwrap();
    let loaded = load_tasks_from_csv(tmp.path()).unwrap();
    assert_eq!(loaded, tasks);
}

#[test]
fn csv_import_accepts_sparse_columns() {
    let mut tmp = NamedTempFile::new().unwrap();
    writeln!(tmp, "id,title,due_date,frequency,specific_month").unwrap();
    writeln!(tmp, "7,Service boiler,2024-01-01T00:00:00.000Z,annual,10").unwrap();
    writeln!(tmp, "8,Buy stamps,2024-01-02,,").unwrap();
    tmp.flush().unwrap();

    let loaded = load_tasks_from_csv(tmp.path()).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].due_date, d(2024, 1, 1));
    assert_eq!(
        loaded[0].recurring,
        Some(RecurrencePattern::new(Frequency::Annual).in_month(10))
    );
    assert_eq!(loaded[1].recurring, None);
}

#[test]
fn json_import_keeps_tasks_with_broken_patterns() {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(
        tmp,
        r#"[{{"id": 1, "title": "Odd", "dueDate": "2024-01-01",
            "recurring": {{"frequency": "daily", "interval": 0}}}}]"#
    )
    .unwrap();
    tmp.flush().unwrap();

    let loaded = load_tasks_from_json(tmp.path()).unwrap();
    assert_eq!(loaded[0].id, "1");
    assert!(loaded[0].recurring.as_ref().unwrap().validate().is_err());
}

#[test]
fn json_import_rejects_duplicate_ids() {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(
        tmp,
        r#"[{{"id": "a", "dueDate": "2024-01-01"}}, {{"id": "a", "dueDate": "2024-01-02"}}]"#
    )
    .unwrap();
    tmp.flush().unwrap();

    assert!(matches!(
        load_tasks_from_json(tmp.path()),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn saving_invalid_tasks_fails() {
    let tmp = NamedTempFile::new().unwrap();
    let tasks = vec![
        Task::new("1", "Bad", d(2024, 1, 1))
            .with_recurrence(RecurrencePattern::new(Frequency::Weekly).on_weekdays([7])),
    ];
    assert!(save_tasks_to_json(&tasks, tmp.path()).is_err());
    assert!(save_tasks_to_csv(&tasks, tmp.path()).is_err());
}

#[test]
fn json_file_store_reports_missing_file_as_empty() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("tasks.json"));
    assert!(store.load_tasks().unwrap().is_none());

    store.save_tasks(&sample_tasks()).unwrap();
    assert_eq!(store.load_tasks().unwrap(), Some(sample_tasks()));
}
