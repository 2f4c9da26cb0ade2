use crate::calculations::UpcomingTask;
use crate::calculations::maintenance::MonthBucket;
use crate::calculations::visibility::HorizonFilter;
use crate::config::PlannerConfig;
use crate::error::RecurrenceError;
use crate::task::Task;
use crate::task_validation::{self, TaskValidationError};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Validation(#[from] TaskValidationError),
    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),
    #[error("task {0} not found")]
    NotFound(String),
}

/// Result of marking a task done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Completion {
    /// A recurring task moved its due date to the following occurrence.
    Rescheduled { due_date: NaiveDate },
    /// One-off task, or a recurrence that has run past its end date.
    Completed,
}

/// In-memory snapshot of the user's task list plus the settings the views
/// run with. Persistence happens outside, by saving `tasks()` back whole.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    tasks: Vec<Task>,
    config: PlannerConfig,
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        Self {
            tasks: Vec::new(),
            config,
        }
    }

    /// Adopt a stored task list. Only ids are checked, see
    /// [`task_validation::validate_task_ids`].
    pub fn from_tasks(tasks: Vec<Task>, config: PlannerConfig) -> Result<Self, PlannerError> {
        task_validation::validate_task_ids(&tasks)?;
        Ok(Self { tasks, config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn replace_tasks(&mut self, tasks: Vec<Task>) -> Result<(), PlannerError> {
        task_validation::validate_task_ids(&tasks)?;
        tracing::debug!(count = tasks.len(), "replacing planner tasks");
        self.tasks = tasks;
        Ok(())
    }

    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Insert or replace by id. Returns `true` when the task is new.
    pub fn upsert_task(&mut self, task: Task) -> Result<bool, PlannerError> {
        task_validation::validate_task(&task)?;
        match self.tasks.iter_mut().find(|existing| existing.id == task.id) {
            Some(existing) => {
                *existing = task;
                Ok(false)
            }
            None => {
                tracing::debug!(task_id = %task.id, "adding task");
                self.tasks.push(task);
                Ok(true)
            }
        }
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        before != self.tasks.len()
    }

    /// Strict next-occurrence query for one task: pattern errors surface
    /// instead of being folded into `None`. One-off tasks yield `None`.
    pub fn next_occurrence_for(
        &self,
        id: &str,
        now: NaiveDate,
    ) -> Result<Option<NaiveDate>, PlannerError> {
        let task = self
            .find_task(id)
            .ok_or_else(|| PlannerError::NotFound(id.to_string()))?;
        let Some(pattern) = &task.recurring else {
            return Ok(None);
        };
        Ok(self
            .config
            .calculator()
            .next_occurrence(pattern, task.due_date, now)?)
    }

    pub fn upcoming(&self, now: NaiveDate) -> Vec<UpcomingTask<'_>> {
        self.config.horizon_filter().visible(&self.tasks, now)
    }

    pub fn upcoming_within(&self, horizon_days: u32, now: NaiveDate) -> Vec<UpcomingTask<'_>> {
        HorizonFilter::new(horizon_days)
            .with_calculator(self.config.calculator())
            .visible(&self.tasks, now)
    }

    pub fn maintenance_board(&self, now: NaiveDate) -> Vec<MonthBucket<'_>> {
        self.maintenance_board_for(self.config.months_ahead, now)
    }

    pub fn maintenance_board_for(
        &self,
        months_ahead: u32,
        now: NaiveDate,
    ) -> Vec<MonthBucket<'_>> {
        self.config
            .maintenance_grouper()
            .group(&self.tasks, months_ahead, now)
    }

    /// Mark a task done as of `now`. A recurring task rolls its due date to
    /// the first occurrence after both `now` and its current due date; when
    /// there is none left it is marked completed like a one-off task.
    pub fn complete_occurrence(
        &mut self,
        id: &str,
        now: NaiveDate,
    ) -> Result<Completion, PlannerError> {
        let calculator = self.config.calculator();
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| PlannerError::NotFound(id.to_string()))?;

        let Some(pattern) = &task.recurring else {
            task.completed = true;
            return Ok(Completion::Completed);
        };

        let as_of = now.max(task.due_date);
        match calculator.next_occurrence(pattern, task.due_date, as_of)? {
            Some(due_date) => {
                tracing::debug!(task_id = %task.id, %due_date, "recurring task rescheduled");
                task.due_date = due_date;
                task.completed = false;
                Ok(Completion::Rescheduled { due_date })
            }
            None => {
                task.completed = true;
                Ok(Completion::Completed)
            }
        }
    }
}
