use crate::interop;
use crate::pattern::RecurrencePattern;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A dashboard to-do as stored by the persistence layer. `due_date` is the
/// recurrence anchor: the first occurrence and the start of every search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(deserialize_with = "interop::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(deserialize_with = "interop::date")]
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<RecurrencePattern>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            due_date,
            recurring: None,
            category: String::new(),
            completed: false,
            notes: None,
        }
    }

    pub fn with_recurrence(mut self, pattern: RecurrencePattern) -> Self {
        self.recurring = Some(pattern);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.recurring.is_some()
    }
}
