use super::UpcomingTask;
use super::next_occurrence::Calculator;
use crate::calendar::add_days;
use crate::task::Task;
use chrono::NaiveDate;

pub const DEFAULT_HORIZON_DAYS: u32 = 7;

/// Decides whether recurring tasks belong in a "next N days" view.
#[derive(Debug, Clone, Copy)]
pub struct HorizonFilter {
    calculator: Calculator,
    horizon_days: u32,
}

impl Default for HorizonFilter {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZON_DAYS)
    }
}

impl HorizonFilter {
    pub fn new(horizon_days: u32) -> Self {
        Self {
            calculator: Calculator::new(),
            horizon_days,
        }
    }

    pub fn with_calculator(self, calculator: Calculator) -> Self {
        Self { calculator, ..self }
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    /// Next occurrence of `task` if it falls within the horizon.
    pub fn occurrence_within(&self, task: &Task, now: NaiveDate) -> Option<NaiveDate> {
        let next = self.calculator.next_for_task(task, now)?;
        let limit = add_days(now, i64::from(self.horizon_days)).unwrap_or(NaiveDate::MAX);
        (next <= limit).then_some(next)
    }

    pub fn is_visible(&self, task: &Task, now: NaiveDate) -> bool {
        self.occurrence_within(task, now).is_some()
    }

    /// Visible tasks ordered by occurrence date, ties kept in input order.
    pub fn visible<'a>(&self, tasks: &'a [Task], now: NaiveDate) -> Vec<UpcomingTask<'a>> {
        let mut upcoming = tasks
            .iter()
            .filter_map(|task| {
                self.occurrence_within(task, now)
                    .map(|next_occurrence| UpcomingTask {
                        task,
                        next_occurrence,
                    })
            })
            .collect::<Vec<_>>();
        upcoming.sort_by_key(|item| item.next_occurrence);
        upcoming
    }
}

/// True when a recurring task has an occurrence in `(now, now + horizon_days]`.
pub fn is_visible_within_horizon(task: &Task, horizon_days: u32, now: NaiveDate) -> bool {
    HorizonFilter::new(horizon_days).is_visible(task, now)
}

pub fn visible_within_horizon(
    tasks: &[Task],
    horizon_days: u32,
    now: NaiveDate,
) -> Vec<UpcomingTask<'_>> {
    HorizonFilter::new(horizon_days).visible(tasks, now)
}
