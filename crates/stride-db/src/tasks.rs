//! Task repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};

use stride_core::{Error, NewTask, Result, Task, TaskRepository, TaskSort};

/// PostgreSQL implementation of TaskRepository.
pub struct PgTaskRepository {
    pool: Pool<Postgres>,
}

impl PgTaskRepository {
    /// Create a new PgTaskRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_row(row: &PgRow) -> Task {
        Task {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            completed_at: row.get("completed_at"),
        }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn insert(&self, new: NewTask) -> Result<Task> {
        let row = sqlx::query(
            "INSERT INTO task (title, description)
             VALUES ($1, $2)
             RETURNING id, title, description, completed_at",
        )
        .bind(&new.title)
        .bind(&new.description)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Self::parse_row(&row))
    }

    async fn get(&self, id: i64) -> Result<Option<Task>> {
        let row = sqlx::query(
            "SELECT id, title, description, completed_at
             FROM task WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(Self::parse_row))
    }

    async fn list(&self, sort: TaskSort) -> Result<Vec<Task>> {
        // Store order is insertion order (id). Title ordering only when
        // explicitly requested.
        let query = match sort {
            TaskSort::Unsorted => {
                "SELECT id, title, description, completed_at FROM task ORDER BY id"
            }
            TaskSort::TitleAsc => {
                "SELECT id, title, description, completed_at FROM task ORDER BY title ASC, id"
            }
            TaskSort::TitleDesc => {
                "SELECT id, title, description, completed_at FROM task ORDER BY title DESC, id"
            }
        };

        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.iter().map(Self::parse_row).collect())
    }

    async fn update(&self, id: i64, title: &str, description: &str) -> Result<Task> {
        let row = sqlx::query(
            "UPDATE task SET title = $1, description = $2
             WHERE id = $3
             RETURNING id, title, description, completed_at",
        )
        .bind(title)
        .bind(description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref()
            .map(Self::parse_row)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    async fn set_completed(&self, id: i64, completed_at: Option<DateTime<Utc>>) -> Result<Task> {
        let row = sqlx::query(
            "UPDATE task SET completed_at = $1
             WHERE id = $2
             RETURNING id, title, description, completed_at",
        )
        .bind(completed_at)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref()
            .map(Self::parse_row)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM task WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::TaskNotFound(id.to_string()));
        }
        Ok(())
    }
}
