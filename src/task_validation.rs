use crate::task::Task;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TaskValidationError {
    message: String,
}

impl TaskValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn validate_task(task: &Task) -> Result<(), TaskValidationError> {
    if task.id.trim().is_empty() {
        return Err(TaskValidationError::new("task id must not be empty"));
    }

    if task.title.trim().is_empty() {
        return Err(TaskValidationError::new(format!(
            "task {} has an empty title",
            task.id
        )));
    }

    if let Some(pattern) = &task.recurring {
        pattern
            .validate()
            .map_err(|err| TaskValidationError::new(format!("task {}: {err}", task.id)))?;
    }

    Ok(())
}

/// Ids only: unique and non-empty. Used when reading stored data, where a
/// malformed pattern should degrade to "no next occurrence" instead of
/// refusing the whole list.
pub fn validate_task_ids(tasks: &[Task]) -> Result<(), TaskValidationError> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if task.id.trim().is_empty() {
            return Err(TaskValidationError::new("task id must not be empty"));
        }
        if !seen_ids.insert(task.id.as_str()) {
            return Err(TaskValidationError::new(format!(
                "duplicate task id {}",
                task.id
            )));
        }
    }
    Ok(())
}

pub fn validate_task_collection(tasks: &[Task]) -> Result<(), TaskValidationError> {
    validate_task_ids(tasks)?;
    for task in tasks {
        validate_task(task)?;
    }
    Ok(())
}
