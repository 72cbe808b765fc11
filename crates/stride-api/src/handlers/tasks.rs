//! Task HTTP handlers.
//!
//! CRUD endpoints plus the two completion actions. Completion state is
//! only reachable through `mark_complete`/`mark_incomplete`; regular
//! updates overwrite title and description and nothing else.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use stride_core::{ServerEvent, TaskBody, TaskRepository, TaskSort};

use crate::handlers::resolve_task;
use crate::{ApiError, AppState};

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

/// Query parameters for `GET /tasks`.
#[derive(Debug, Deserialize, Default)]
pub struct ListTasksQuery {
    /// `asc` or `desc` for title ordering; anything else keeps store order.
    pub sort: Option<String>,
}

/// Response envelope `{"task": {...}}`.
#[derive(Debug, Serialize)]
pub struct TaskEnvelope {
    pub task: TaskBody,
}

/// Response for `DELETE /tasks/:id`.
#[derive(Debug, Serialize)]
pub struct DeleteConfirmation {
    pub details: String,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Create a new task.
///
/// Requires `title` and `description`; a missing key yields 400
/// `{"details": "Invalid data"}`. New tasks start incomplete.
pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<stride_core::TaskPayload>,
) -> Result<(StatusCode, Json<TaskEnvelope>), ApiError> {
    let new_task = payload.into_new_task()?;
    let task = state.db.tasks.insert(new_task).await?;

    tracing::info!(task_id = task.id, op = "create", "Task created");
    Ok((
        StatusCode::CREATED,
        Json(TaskEnvelope {
            task: task.to_body(),
        }),
    ))
}

/// List all tasks, optionally ordered by title.
///
/// Returns a bare JSON array. `sort=asc`/`sort=desc` order by title;
/// absent or unrecognized values preserve store order.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<Vec<TaskBody>>, ApiError> {
    let sort = TaskSort::from_query(query.sort.as_deref());
    let tasks = state.db.tasks.list(sort).await?;

    Ok(Json(tasks.iter().map(|t| t.to_body()).collect()))
}

/// Get a single task by id.
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskEnvelope>, ApiError> {
    let task = resolve_task(&state.db, &id).await?;
    Ok(Json(TaskEnvelope {
        task: task.to_body(),
    }))
}

/// Overwrite a task's title and description.
///
/// No partial update: both keys are required, matching create semantics.
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<stride_core::TaskPayload>,
) -> Result<Json<TaskEnvelope>, ApiError> {
    let task = resolve_task(&state.db, &id).await?;
    let fields = payload.into_new_task()?;

    let updated = state
        .db
        .tasks
        .update(task.id, &fields.title, &fields.description)
        .await?;

    Ok(Json(TaskEnvelope {
        task: updated.to_body(),
    }))
}

/// Delete a task. Association rows are removed by the store's cascade.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteConfirmation>, ApiError> {
    let task = resolve_task(&state.db, &id).await?;
    state.db.tasks.delete(task.id).await?;

    tracing::info!(task_id = task.id, op = "delete", "Task deleted");
    Ok(Json(DeleteConfirmation {
        details: format!("Task {} \"{}\" successfully deleted", task.id, task.title),
    }))
}

/// Mark a task complete and emit a completion event.
///
/// The completion timestamp is committed before the event is emitted, and
/// notification delivery never affects the response.
pub async fn mark_complete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskEnvelope>, ApiError> {
    let task = resolve_task(&state.db, &id).await?;
    let updated = state
        .db
        .tasks
        .set_completed(task.id, Some(Utc::now()))
        .await?;

    tracing::info!(task_id = updated.id, op = "mark_complete", "Task completed");
    state.event_bus.emit(ServerEvent::TaskCompleted {
        task_id: updated.id,
        title: updated.title.clone(),
    });

    Ok(Json(TaskEnvelope {
        task: updated.to_body(),
    }))
}

/// Mark a task incomplete.
pub async fn mark_incomplete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskEnvelope>, ApiError> {
    let task = resolve_task(&state.db, &id).await?;
    let updated = state.db.tasks.set_completed(task.id, None).await?;

    Ok(Json(TaskEnvelope {
        task: updated.to_body(),
    }))
}
