use crate::Task;
use crate::task_validation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Whole-list storage: every save replaces what was stored before.
pub trait TaskStore {
    fn save_tasks(&self, tasks: &[Task]) -> PersistenceResult<()>;
    /// `None` when nothing has been stored yet.
    fn load_tasks(&self) -> PersistenceResult<Option<Vec<Task>>>;
}

/// Checks applied before writing: unique ids plus per-task validation.
pub fn validate_tasks(tasks: &[Task]) -> PersistenceResult<()> {
    task_validation::validate_task_collection(tasks)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

/// Checks applied after reading: ids only.
pub fn validate_loaded_tasks(tasks: &[Task]) -> PersistenceResult<()> {
    task_validation::validate_task_ids(tasks)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    JsonFileStore, load_tasks_from_csv, load_tasks_from_json, save_tasks_to_csv,
    save_tasks_to_json,
};
