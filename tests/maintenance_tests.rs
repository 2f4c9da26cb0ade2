use chrono::NaiveDate;
use planner_recurrence::{
    Frequency, MaintenanceGrouper, RecurrencePattern, Task, group_by_upcoming_month,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn quarterly_task_lands_in_the_month_after_next() {
    let tasks = vec![
        Task::new("1", "Replace HVAC filter", d(2024, 1, 15))
            .with_recurrence(RecurrencePattern::new(Frequency::Quarterly)),
    ];
    let buckets = group_by_upcoming_month(&tasks, 3, d(2024, 2, 1));

    assert_eq!(buckets.len(), 3);
    assert!(buckets[0].tasks.is_empty());
    assert!(buckets[1].tasks.is_empty());
    assert_eq!(buckets[2].tasks.len(), 1);
    assert_eq!(buckets[2].tasks[0].task.id, "1");
    assert_eq!(buckets[2].tasks[0].next_occurrence, d(2024, 4, 15));
}

#[test]
fn buckets_are_labelled_and_wrap_the_year() {
    let buckets = group_by_upcoming_month(&[], 4, d(2024, 11, 20));
    let labels = buckets
        .iter()
        .map(|b| (b.label.as_str(), b.year, b.month))
        .collect::<Vec<_>>();
    assert_eq!(
        labels,
        vec![
            ("This Month", 2024, 11),
            ("Next Month", 2024, 12),
            ("January", 2025, 1),
            ("February", 2025, 2),
        ]
    );
}

#[test]
fn zero_months_ahead_yields_no_buckets() {
    let tasks = vec![
        Task::new("1", "Gutters", d(2024, 1, 1))
            .with_recurrence(RecurrencePattern::new(Frequency::Annual)),
    ];
    assert!(group_by_upcoming_month(&tasks, 0, d(2024, 6, 1)).is_empty());
}

#[test]
fn only_maintenance_tasks_are_grouped() {
    let tasks = vec![
        Task::new("daily", "Feed chickens", d(2024, 3, 1))
            .with_recurrence(RecurrencePattern::new(Frequency::Daily)),
        Task::new("farm", "Check fences", d(2024, 3, 1))
            .with_category("Farm")
            .with_recurrence(RecurrencePattern::new(Frequency::Weekly)),
        Task::new("seasonal", "Flip mattress", d(2024, 1, 1))
            .with_recurrence(RecurrencePattern::new(Frequency::Seasonal).in_months([4, 10])),
        Task::new("one-off", "Paint shed", d(2024, 3, 20)).with_category("home"),
    ];
    let buckets = group_by_upcoming_month(&tasks, 3, d(2024, 3, 10));

    let this_month = buckets[0]
        .tasks
        .iter()
        .map(|t| t.task.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(this_month, vec!["farm"]);
    assert_eq!(buckets[0].tasks[0].next_occurrence, d(2024, 3, 15));

    let next_month = buckets[1]
        .tasks
        .iter()
        .map(|t| t.task.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(next_month, vec!["seasonal"]);
    assert!(buckets[2].tasks.is_empty());
}

#[test]
fn occurrences_past_the_last_bucket_are_dropped() {
    let tasks = vec![
        Task::new("1", "Service generator", d(2024, 1, 1))
            .with_recurrence(RecurrencePattern::new(Frequency::Annual).in_month(9)),
    ];
    let buckets = group_by_upcoming_month(&tasks, 3, d(2024, 2, 1));
    assert!(buckets.iter().all(|b| b.tasks.is_empty()));
}

#[test]
fn tasks_keep_input_order_within_a_bucket() {
    let tasks = vec![
        Task::new("b", "Later in month", d(2024, 1, 25))
            .with_recurrence(RecurrencePattern::new(Frequency::Quarterly)),
        Task::new("a", "Earlier in month", d(2024, 1, 5))
            .with_recurrence(RecurrencePattern::new(Frequency::Quarterly)),
    ];
    let buckets = group_by_upcoming_month(&tasks, 3, d(2024, 2, 1));
    let ids = buckets[2]
        .tasks
        .iter()
        .map(|t| t.task.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["b", "a"]);
}

#[test]
fn custom_categories_replace_the_defaults() {
    let tasks = vec![
        Task::new("1", "Wax car", d(2024, 2, 3))
            .with_category("Garage")
            .with_recurrence(RecurrencePattern::new(Frequency::Monthly)),
        Task::new("2", "Mow lawn", d(2024, 2, 3))
            .with_category("home")
            .with_recurrence(RecurrencePattern::new(Frequency::Monthly)),
    ];
    let grouper = MaintenanceGrouper::new().with_categories(["garage"]);
    assert!(grouper.is_maintenance_task(&tasks[0]));
    assert!(!grouper.is_maintenance_task(&tasks[1]));

    let buckets = grouper.group(&tasks, 2, d(2024, 2, 10));
    assert_eq!(buckets[1].tasks.len(), 1);
    assert_eq!(buckets[1].tasks[0].next_occurrence, d(2024, 3, 3));
}

#[test]
fn oversized_boards_are_clamped() {
    use planner_recurrence::calculations::maintenance::MAX_MONTHS_AHEAD;

    let buckets = group_by_upcoming_month(&[], u32::MAX, d(2024, 1, 1));
    assert_eq!(buckets.len(), MAX_MONTHS_AHEAD as usize);
    let last = buckets.last().unwrap();
    assert_eq!((last.year, last.month), (2033, 12));
}
