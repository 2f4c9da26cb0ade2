use super::{PersistenceError, PersistenceResult, TaskStore};
use crate::interop;
use crate::pattern::{Frequency, RecurrencePattern};
use crate::task::Task;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A task list kept as one JSON array in a single file, the same shape the
/// browser dashboard writes under its storage key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStore for JsonFileStore {
    fn save_tasks(&self, tasks: &[Task]) -> PersistenceResult<()> {
        save_tasks_to_json(tasks, &self.path)
    }

    fn load_tasks(&self) -> PersistenceResult<Option<Vec<Task>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        load_tasks_from_json(&self.path).map(Some)
    }
}

pub fn save_tasks_to_json<P: AsRef<Path>>(tasks: &[Task], path: P) -> PersistenceResult<()> {
    super::validate_tasks(tasks)?;
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, tasks)?;
    tracing::debug!(count = tasks.len(), path = %path.as_ref().display(), "tasks saved as json");
    Ok(())
}

pub fn load_tasks_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Task>> {
    let file = File::open(path.as_ref())?;
    let tasks: Vec<Task> = serde_json::from_reader(file)?;
    super::validate_loaded_tasks(&tasks)?;
    Ok(tasks)
}

#[derive(Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    id: String,
    title: String,
    due_date: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    completed: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    frequency: String,
    #[serde(default)]
    interval: String,
    #[serde(default)]
    days_of_week: String,
    #[serde(default)]
    seasonal_months: String,
    #[serde(default)]
    specific_month: String,
    #[serde(default)]
    end_date: String,
}

impl From<&Task> for TaskCsvRecord {
    fn from(task: &Task) -> Self {
        let mut record = TaskCsvRecord {
            id: task.id.clone(),
            title: task.title.clone(),
            due_date: format_date(Some(task.due_date)),
            category: task.category.clone(),
            completed: task.completed.to_string(),
            notes: task.notes.clone().unwrap_or_default(),
            ..TaskCsvRecord::default()
        };
        if let Some(pattern) = &task.recurring {
            record.frequency = pattern.frequency.as_str().to_string();
            record.interval = pattern.interval.to_string();
            record.days_of_week = pattern.days_of_week.as_deref().map(join_u32).unwrap_or_default();
            record.seasonal_months = pattern
                .seasonal_months
                .as_deref()
                .map(join_u32)
                .unwrap_or_default();
            record.specific_month = pattern
                .specific_month
                .map(|m| m.to_string())
                .unwrap_or_default();
            record.end_date = format_date(pattern.end_date);
        }
        record
    }
}

impl TaskCsvRecord {
    fn into_task(self) -> PersistenceResult<Task> {
        let due_date = parse_date(&self.due_date)?.ok_or_else(|| {
            PersistenceError::InvalidData(format!("task {} is missing due_date", self.id))
        })?;
        let mut task = Task::new(self.id, self.title, due_date);
        task.category = self.category;
        task.completed = parse_bool(&self.completed)?.unwrap_or(false);
        task.notes = parse_string_option(self.notes);

        if !self.frequency.trim().is_empty() {
            let frequency = Frequency::from_str(&self.frequency)
                .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
            let mut pattern = RecurrencePattern::new(frequency);
            if let Some(interval) = parse_i64(&self.interval)? {
                pattern.interval = interval;
            }
            pattern.days_of_week = split_u32(&self.days_of_week)?;
            pattern.seasonal_months = split_u32(&self.seasonal_months)?;
            pattern.specific_month = parse_u32(&self.specific_month)?;
            pattern.end_date = parse_date(&self.end_date)?;
            task.recurring = Some(pattern);
        }
        Ok(task)
    }
}

pub fn save_tasks_to_csv<P: AsRef<Path>>(tasks: &[Task], path: P) -> PersistenceResult<()> {
    super::validate_tasks(tasks)?;
    let file = File::create(path.as_ref())?;
    let mut writer = csv::Writer::from_writer(file);
    for task in tasks {
        writer.serialize(TaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    tracing::debug!(count = tasks.len(), path = %path.as_ref().display(), "tasks saved as csv");
    Ok(())
}

pub fn load_tasks_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Task>> {
    let file = File::open(path.as_ref())?;
    let mut reader = csv::Reader::from_reader(file);
    let mut tasks = Vec::new();
    for record in reader.deserialize::<TaskCsvRecord>() {
        tasks.push(record?.into_task()?);
    }
    super::validate_loaded_tasks(&tasks)?;
    Ok(tasks)
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn parse_date(input: &str) -> PersistenceResult<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    interop::parse_date(input)
        .map(Some)
        .ok_or_else(|| PersistenceError::InvalidData(format!("invalid date '{input}'")))
}

fn parse_i64(input: &str) -> PersistenceResult<Option<i64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid integer '{input}': {e}")))
}

fn parse_u32(input: &str) -> PersistenceResult<Option<u32>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<u32>()
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid integer '{input}': {e}")))
}

fn parse_bool(input: &str) -> PersistenceResult<Option<bool>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    match input.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        other => Err(PersistenceError::InvalidData(format!(
            "invalid boolean '{other}'"
        ))),
    }
}

fn join_u32(values: &[u32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

// An empty cell means "not set"; a present list is kept even if it parses
// to nothing, so validation can still flag it.
fn split_u32(input: &str) -> PersistenceResult<Option<Vec<u32>>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            part.trim().parse::<u32>().map_err(|e| {
                PersistenceError::InvalidData(format!("invalid integer '{part}': {e}"))
            })
        })
        .collect::<PersistenceResult<Vec<_>>>()
        .map(Some)
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
