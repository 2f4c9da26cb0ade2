pub mod maintenance;
pub mod next_occurrence;
pub mod visibility;

use crate::task::Task;
use chrono::NaiveDate;
use serde::Serialize;

/// A task paired with the occurrence a view decided to show it for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingTask<'a> {
    pub task: &'a Task,
    pub next_occurrence: NaiveDate,
}
