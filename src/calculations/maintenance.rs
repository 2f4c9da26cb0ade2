use super::UpcomingTask;
use super::next_occurrence::Calculator;
use crate::calendar::{month_name, shift_month};
use crate::task::Task;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const DEFAULT_MONTHS_AHEAD: u32 = 3;
/// Widest board `group` will build; larger requests are clamped to it.
pub const MAX_MONTHS_AHEAD: u32 = 120;
pub const MAINTENANCE_CATEGORIES: [&str; 3] = ["home", "property", "farm"];

/// One column of the planning board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBucket<'a> {
    pub label: String,
    pub year: i32,
    pub month: u32,
    /// Insertion order of the input slice.
    pub tasks: Vec<UpcomingTask<'a>>,
}

impl MonthBucket<'_> {
    fn new(offset: u32, year: i32, month: u32) -> Self {
        let label = match offset {
            0 => "This Month".to_string(),
            1 => "Next Month".to_string(),
            _ => month_name(month).unwrap_or_default().to_string(),
        };
        Self {
            label,
            year,
            month,
            tasks: Vec::new(),
        }
    }
}

/// Buckets maintenance-style tasks by the month of their next occurrence.
#[derive(Debug, Clone)]
pub struct MaintenanceGrouper {
    calculator: Calculator,
    categories: Vec<String>,
}

impl Default for MaintenanceGrouper {
    fn default() -> Self {
        Self::new()
    }
}

impl MaintenanceGrouper {
    pub fn new() -> Self {
        Self {
            calculator: Calculator::new(),
            categories: MAINTENANCE_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn with_calculator(self, calculator: Calculator) -> Self {
        Self { calculator, ..self }
    }

    pub fn with_categories<I, S>(self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    /// Maintenance-shaped frequency, or a maintenance category (compared
    /// case-insensitively).
    pub fn is_maintenance_task(&self, task: &Task) -> bool {
        let by_frequency = task
            .recurring
            .as_ref()
            .is_some_and(|pattern| pattern.frequency.is_maintenance());
        by_frequency
            || self
                .categories
                .iter()
                .any(|category| category.eq_ignore_ascii_case(task.category.trim()))
    }

    /// Exactly `months_ahead` buckets (at most [`MAX_MONTHS_AHEAD`]) starting
    /// at `now`'s month, empty ones included. Tasks without a next
    /// occurrence, or whose next occurrence falls beyond the last bucket, are
    /// left out.
    pub fn group<'a>(
        &self,
        tasks: &'a [Task],
        months_ahead: u32,
        now: NaiveDate,
    ) -> Vec<MonthBucket<'a>> {
        let mut buckets = (0..months_ahead.min(MAX_MONTHS_AHEAD))
            .map_while(|offset| {
                shift_month(now.year(), now.month(), offset)
                    .map(|(year, month)| MonthBucket::new(offset, year, month))
            })
            .collect::<Vec<_>>();

        for task in tasks.iter().filter(|task| self.is_maintenance_task(task)) {
            let Some(next_occurrence) = self.calculator.next_for_task(task, now) else {
                continue;
            };
            let Ok(offset) = usize::try_from(month_offset(now, next_occurrence)) else {
                continue;
            };
            let Some(bucket) = buckets.get_mut(offset) else {
                continue;
            };
            bucket.tasks.push(UpcomingTask {
                task,
                next_occurrence,
            });
        }

        buckets
    }
}

fn month_offset(from: NaiveDate, to: NaiveDate) -> i64 {
    let from_index = i64::from(from.year()) * 12 + i64::from(from.month());
    let to_index = i64::from(to.year()) * 12 + i64::from(to.month());
    to_index - from_index
}

pub fn group_by_upcoming_month(
    tasks: &[Task],
    months_ahead: u32,
    now: NaiveDate,
) -> Vec<MonthBucket<'_>> {
    MaintenanceGrouper::new().group(tasks, months_ahead, now)
}
