use chrono::NaiveDate;
use planner_recurrence::{AdvanceRule, Frequency, RecurrencePattern, Task};
use serde_json::json;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn dashboard_task_json_is_accepted() {
    let raw = json!({
        "id": 1712345678901u64,
        "title": "Clean gutters",
        "dueDate": "2024-03-01T00:00:00.000Z",
        "category": "home",
        "completed": false,
        "recurring": {
            "frequency": "bi-annual",
            "seasonalMonths": [10, 4],
            "endDate": ""
        }
    });
    let task: Task = serde_json::from_value(raw).unwrap();

    assert_eq!(task.id, "1712345678901");
    assert_eq!(task.due_date, d(2024, 3, 1));
    let pattern = task.recurring.as_ref().unwrap();
    assert_eq!(pattern.frequency, Frequency::BiAnnual);
    assert_eq!(pattern.interval, 1);
    assert_eq!(pattern.end_date, None);
    assert_eq!(pattern.rule().unwrap(), AdvanceRule::MonthSet(vec![4, 10]));
}

#[test]
fn patterns_serialize_with_camel_case_keys() {
    let pattern = RecurrencePattern::new(Frequency::Weekly)
        .every(2)
        .on_weekdays([1, 3])
        .until(d(2024, 12, 31));
    let value = serde_json::to_value(&pattern).unwrap();
    assert_eq!(
        value,
        json!({
            "frequency": "weekly",
            "interval": 2,
            "daysOfWeek": [1, 3],
            "endDate": "2024-12-31"
        })
    );

    let back: RecurrencePattern = serde_json::from_value(value).unwrap();
    assert_eq!(back, pattern);
}

#[test]
fn default_interval_is_omitted() {
    let value = serde_json::to_value(RecurrencePattern::new(Frequency::Annual).in_month(6)).unwrap();
    assert_eq!(value, json!({ "frequency": "annual", "specificMonth": 6 }));
}

#[test]
fn unknown_frequency_is_rejected() {
    let raw = json!({ "frequency": "fortnightly" });
    assert!(serde_json::from_value::<RecurrencePattern>(raw).is_err());
    assert!("fortnightly".parse::<Frequency>().is_err());
    assert_eq!("Bi-Annual".parse::<Frequency>().unwrap(), Frequency::BiAnnual);
}

#[test]
fn rules_follow_the_frequency() {
    let cases = [
        (RecurrencePattern::new(Frequency::Daily).every(3), AdvanceRule::Days(3)),
        (RecurrencePattern::new(Frequency::Weekly), AdvanceRule::Weeks(1)),
        (RecurrencePattern::new(Frequency::Quarterly).every(5), AdvanceRule::Months(3)),
        (RecurrencePattern::new(Frequency::Seasonal), AdvanceRule::Years(1)),
        (RecurrencePattern::new(Frequency::Annual).in_month(2), AdvanceRule::FixedMonth(2)),
        (
            RecurrencePattern::new(Frequency::Weekly).every(4).on_weekdays([5, 0, 5]),
            AdvanceRule::Weekdays([true, false, false, false, false, true, false]),
        ),
    ];
    for (pattern, expected) in cases {
        assert_eq!(pattern.rule().unwrap(), expected, "{pattern}");
    }
}

#[test]
fn pattern_display_is_readable() {
    let pattern = RecurrencePattern::new(Frequency::Weekly).on_weekdays([1, 3]);
    assert_eq!(pattern.to_string(), "weekly on Mon, Wed");
    let annual = RecurrencePattern::new(Frequency::Annual)
        .in_month(6)
        .until(d(2030, 1, 1));
    assert_eq!(annual.to_string(), "annual in June until 2030-01-01");
}
