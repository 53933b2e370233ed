use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::error::{ApiError, Result};

pub const DEFAULT_PRIORITY: &str = "medium";
pub const DEFAULT_CATEGORY: &str = "general";

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    /// Conventionally "low", "medium" or "high", but any string is stored as given.
    pub priority: String,
    /// Matched against category names by value only.
    pub category: String,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// POST /api/tasks body
#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<String>,
}

/// A create request that passed validation, with defaults filled in.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub category: String,
    pub due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    pub fn validate(self) -> Result<NewTask> {
        let title = match self.title {
            Some(title) if !title.is_empty() => title,
            _ => return Err(ApiError::validation("Title is required")),
        };
        let due_date = match self.due_date.as_deref() {
            Some(raw) if !raw.is_empty() => Some(parse_due_date(raw)?),
            _ => None,
        };

        Ok(NewTask {
            title,
            description: self.description.unwrap_or_default(),
            priority: self.priority.unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
            category: self.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            due_date,
        })
    }
}

/// PUT /api/tasks/{id} body.
///
/// Nullable fields are `Option<Option<_>>`: the outer `None` means the key was
/// absent, `Some(None)` means it was sent as `null`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<String>>,
}

fn present<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Validated merge-patch for a task. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateTaskRequest {
    pub fn validate(self) -> Result<TaskPatch> {
        if matches!(self.title.as_deref(), Some("")) {
            return Err(ApiError::validation("Title cannot be empty"));
        }
        let due_date = match self.due_date {
            None => None,
            Some(Some(raw)) if !raw.is_empty() => Some(Some(parse_due_date(&raw)?)),
            Some(_) => Some(None),
        };

        Ok(TaskPatch {
            title: self.title,
            description: self.description.map(Option::unwrap_or_default),
            completed: self.completed,
            priority: self.priority,
            category: self.category,
            due_date,
        })
    }
}

/// Parses an ISO-8601 timestamp. Offsets (including a trailing `Z`) are honoured;
/// values without an offset, and bare dates, are read as UTC.
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(ApiError::validation("Invalid date format"))
}

/// GET /api/tasks query string, as sent.
#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    pub category: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<String>,
    pub search: Option<String>,
}

/// Filters applied by `TaskStore::list`; all present filters must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub category: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
    pub search: Option<String>,
}

impl From<TaskQuery> for TaskFilter {
    fn from(query: TaskQuery) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            category: non_empty(query.category),
            priority: non_empty(query.priority),
            completed: query.completed.map(|c| c.to_lowercase() == "true"),
            search: non_empty(query.search),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskStats {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    pub completion_rate: f64,
}

impl TaskStats {
    pub fn from_counts(total: i64, completed: i64) -> Self {
        let completion_rate = if total > 0 {
            (completed as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
        } else {
            0.0
        };
        Self {
            total_tasks: total,
            completed_tasks: completed,
            pending_tasks: total - completed,
            completion_rate,
        }
    }
}
