use chrono::Utc;
use log::info;
use sqlx::SqlitePool;

use crate::error::{ApiError, Result};
use crate::models::category::DEFAULT_CATEGORIES;
use crate::models::{Category, NewCategory};

#[derive(Debug, Clone)]
pub struct CategoryStore {
    pool: SqlitePool,
}

impl CategoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, color, created_at FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    /// Fails with `Conflict` when a category with the same name exists.
    pub async fn create(&self, new_category: NewCategory) -> Result<Category> {
        let mut tx = self.pool.begin().await?;

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, color, created_at)
            VALUES (?, ?, ?)
            RETURNING id, name, color, created_at
            "#,
        )
        .bind(&new_category.name)
        .bind(&new_category.color)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            ApiError::from_insert(e, || {
                format!("Category '{}' already exists", new_category.name)
            })
        })?;

        tx.commit().await?;
        Ok(category)
    }

    /// Inserts the default categories when the table is empty. Returns how many were added.
    pub async fn seed_defaults(&self) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            return Ok(0);
        }

        let now = Utc::now();
        for (name, color) in DEFAULT_CATEGORIES {
            sqlx::query("INSERT INTO categories (name, color, created_at) VALUES (?, ?, ?)")
                .bind(name)
                .bind(color)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!("Seeded {} default categories", DEFAULT_CATEGORIES.len());
        Ok(DEFAULT_CATEGORIES.len())
    }
}
