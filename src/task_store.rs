use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::{ApiError, Result};
use crate::models::{NewTask, Task, TaskFilter, TaskStats, UpdateTaskRequest};

const TASK_COLUMNS: &str =
    "id, title, description, completed, priority, category, due_date, created_at, updated_at";

/// Task persistence. Every write is a single statement or runs in its own transaction;
/// returning early with an error drops the transaction, which rolls it back.
#[derive(Debug, Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Tasks matching every filter present, newest first.
    pub async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks WHERE 1 = 1"));

        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(priority) = &filter.priority {
            query.push(" AND priority = ").push_bind(priority.clone());
        }
        if let Some(completed) = filter.completed {
            query.push(" AND completed = ").push_bind(completed);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", escape_like(search));
            query
                .push(" AND (title LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR description LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }
        query.push(" ORDER BY created_at DESC, id DESC");

        let tasks = query.build_query_as::<Task>().fetch_all(&self.pool).await?;
        Ok(tasks)
    }

    pub async fn get(&self, id: i64) -> Result<Task> {
        sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Task", id))
    }

    pub async fn create(&self, new_task: NewTask) -> Result<Task> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (title, description, completed, priority, category, due_date, created_at, updated_at)
            VALUES (?, ?, 0, ?, ?, ?, ?, ?)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(&new_task.title)
        .bind(&new_task.description)
        .bind(&new_task.priority)
        .bind(&new_task.category)
        .bind(new_task.due_date)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(task)
    }

    /// Applies a merge-patch as one `UPDATE ... RETURNING` statement.
    ///
    /// A missing id is reported before any problem with the request body. The write
    /// itself never reads first, so concurrent updates wait on the busy timeout
    /// instead of failing on a stale snapshot.
    pub async fn update(&self, id: i64, request: UpdateTaskRequest) -> Result<Task> {
        self.get(id).await?;
        let patch = request.validate()?;

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE tasks SET updated_at = ");
        query.push_bind(Utc::now());
        if let Some(title) = patch.title {
            query.push(", title = ").push_bind(title);
        }
        if let Some(description) = patch.description {
            query.push(", description = ").push_bind(description);
        }
        if let Some(completed) = patch.completed {
            query.push(", completed = ").push_bind(completed);
        }
        if let Some(priority) = patch.priority {
            query.push(", priority = ").push_bind(priority);
        }
        if let Some(category) = patch.category {
            query.push(", category = ").push_bind(category);
        }
        if let Some(due_date) = patch.due_date {
            query.push(", due_date = ").push_bind(due_date);
        }
        query.push(" WHERE id = ").push_bind(id);
        query.push(format!(" RETURNING {TASK_COLUMNS}"));

        // The row may have been deleted since the existence check.
        let task = query
            .build_query_as::<Task>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Task", id))?;
        Ok(task)
    }

    /// Removes the task permanently and returns its title.
    pub async fn delete(&self, id: i64) -> Result<String> {
        let mut tx = self.pool.begin().await?;

        let title: Option<String> =
            sqlx::query_scalar("DELETE FROM tasks WHERE id = ? RETURNING title")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let title = title.ok_or_else(|| ApiError::not_found("Task", id))?;

        tx.commit().await?;
        Ok(title)
    }

    pub async fn stats(&self) -> Result<TaskStats> {
        let (total, completed): (i64, i64) =
            sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(completed), 0) FROM tasks")
                .fetch_one(&self.pool)
                .await?;
        Ok(TaskStats::from_counts(total, completed))
    }
}

fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
