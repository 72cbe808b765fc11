//! Goal repository implementation, including the goal↔task association.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};

use stride_core::{Error, Goal, GoalRepository, NewGoal, Result, Task};

/// PostgreSQL implementation of GoalRepository.
pub struct PgGoalRepository {
    pool: Pool<Postgres>,
}

impl PgGoalRepository {
    /// Create a new PgGoalRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_row(row: &PgRow) -> Goal {
        Goal {
            id: row.get("id"),
            title: row.get("title"),
        }
    }
}

#[async_trait]
impl GoalRepository for PgGoalRepository {
    async fn insert(&self, new: NewGoal) -> Result<Goal> {
        let row = sqlx::query(
            "INSERT INTO goal (title)
             VALUES ($1)
             RETURNING id, title",
        )
        .bind(&new.title)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Self::parse_row(&row))
    }

    async fn get(&self, id: i64) -> Result<Option<Goal>> {
        let row = sqlx::query("SELECT id, title FROM goal WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.as_ref().map(Self::parse_row))
    }

    async fn list(&self) -> Result<Vec<Goal>> {
        let rows = sqlx::query("SELECT id, title FROM goal ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.iter().map(Self::parse_row).collect())
    }

    async fn update(&self, id: i64, title: &str) -> Result<Goal> {
        let row = sqlx::query(
            "UPDATE goal SET title = $1
             WHERE id = $2
             RETURNING id, title",
        )
        .bind(title)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref()
            .map(Self::parse_row)
            .ok_or_else(|| Error::GoalNotFound(id.to_string()))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM goal WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::GoalNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn add_tasks(&self, goal_id: i64, task_ids: &[i64]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        for &task_id in task_ids {
            // The whole batch aborts on the first unknown id; rolling back
            // the transaction discards any join rows inserted before it.
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM task WHERE id = $1)")
                .bind(task_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(Error::Database)?;

            if !exists {
                return Err(Error::TaskNotFound(task_id.to_string()));
            }

            // Composite primary key dedupes re-association.
            sqlx::query(
                "INSERT INTO goal_task (goal_id, task_id)
                 VALUES ($1, $2)
                 ON CONFLICT (goal_id, task_id) DO NOTHING",
            )
            .bind(goal_id)
            .bind(task_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    async fn tasks_of(&self, goal_id: i64) -> Result<Vec<Task>> {
        let rows = sqlx::query(
            "SELECT t.id, t.title, t.description, t.completed_at
             FROM task t
             JOIN goal_task gt ON gt.task_id = t.id
             WHERE gt.goal_id = $1
             ORDER BY t.id",
        )
        .bind(goal_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .iter()
            .map(|r| Task {
                id: r.get("id"),
                title: r.get("title"),
                description: r.get("description"),
                completed_at: r.get("completed_at"),
            })
            .collect())
    }
}
