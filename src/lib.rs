pub mod calculations;
pub mod calendar;
pub mod config;
pub mod error;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod interop;
pub mod pattern;
pub mod persistence;
pub mod planner;
pub mod task;
pub(crate) mod task_validation;

pub use calculations::UpcomingTask;
pub use calculations::maintenance::{
    MaintenanceGrouper, MonthBucket, group_by_upcoming_month,
};
pub use calculations::next_occurrence::{Calculator, Occurrences, next_occurrence};
pub use calculations::visibility::{
    HorizonFilter, is_visible_within_horizon, visible_within_horizon,
};
pub use config::{ConfigError, PlannerConfig};
pub use error::{RecurrenceError, RecurrenceResult};
pub use pattern::{AdvanceRule, Frequency, RecurrencePattern};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteTaskStore;
pub use persistence::{
    JsonFileStore, PersistenceError, PersistenceResult, TaskStore, load_tasks_from_csv,
    load_tasks_from_json, save_tasks_to_csv, save_tasks_to_json,
};
pub use planner::{Completion, Planner, PlannerError};
pub use task::Task;
pub use task_validation::TaskValidationError;
