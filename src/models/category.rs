use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{ApiError, Result};

pub const DEFAULT_COLOR: &str = "#3B82F6";

/// Seeded into an empty category table on startup.
pub const DEFAULT_CATEGORIES: [(&str, &str); 5] = [
    ("Work", "#3B82F6"),
    ("Personal", "#10B981"),
    ("Shopping", "#F59E0B"),
    ("Health", "#EF4444"),
    ("General", "#6B7280"),
];

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// POST /api/categories body
#[derive(Debug, Default, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub color: String,
}

impl CreateCategoryRequest {
    pub fn validate(self) -> Result<NewCategory> {
        match self.name {
            Some(name) if !name.is_empty() => Ok(NewCategory {
                name,
                color: self.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            }),
            _ => Err(ApiError::validation("Name is required")),
        }
    }
}
