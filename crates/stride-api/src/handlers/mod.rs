//! HTTP request handlers for the task and goal endpoints.

pub mod goals;
pub mod tasks;

use stride_core::{Goal, GoalRepository, Task, TaskRepository};
use stride_db::Database;

use crate::ApiError;

/// Resolve a raw path identifier to a task.
///
/// Non-integer ids yield 400, integer ids with no matching row yield 404.
/// Both carry the same `{"message": "task {raw} not found"}` body — the
/// identical wording is part of the external contract.
pub(crate) async fn resolve_task(db: &Database, raw: &str) -> Result<Task, ApiError> {
    let id: i64 = raw
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("task {raw} not found")))?;

    db.tasks
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("task {raw} not found")))
}

/// Resolve a raw path identifier to a goal. Same contract as
/// [`resolve_task`], substituting "goal" in the message.
pub(crate) async fn resolve_goal(db: &Database, raw: &str) -> Result<Goal, ApiError> {
    let id: i64 = raw
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("goal {raw} not found")))?;

    db.goals
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("goal {raw} not found")))
}
