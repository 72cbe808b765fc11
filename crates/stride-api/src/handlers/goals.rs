//! Goal HTTP handlers.
//!
//! CRUD endpoints plus the goal↔task association pair: assigning a batch
//! of tasks and listing a goal's tasks.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use stride_core::{AssignTasksBody, AssignTasksPayload, GoalBody, GoalRepository, GoalWithTasks};

use crate::handlers::resolve_goal;
use crate::{ApiError, AppState};

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

/// Response envelope `{"goal": {...}}`.
#[derive(Debug, Serialize)]
pub struct GoalEnvelope {
    pub goal: GoalBody,
}

/// Response for `DELETE /goals/:id`.
#[derive(Debug, Serialize)]
pub struct DeleteConfirmation {
    pub details: String,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Create a new goal.
///
/// Requires `title`; a missing key yields 400 `{"details": "Invalid data"}`.
pub async fn create_goal(
    State(state): State<AppState>,
    Json(payload): Json<stride_core::GoalPayload>,
) -> Result<(StatusCode, Json<GoalEnvelope>), ApiError> {
    let new_goal = payload.into_new_goal()?;
    let goal = state.db.goals.insert(new_goal).await?;

    tracing::info!(goal_id = goal.id, op = "create", "Goal created");
    Ok((
        StatusCode::CREATED,
        Json(GoalEnvelope {
            goal: goal.to_body(),
        }),
    ))
}

/// List all goals as a bare JSON array.
pub async fn list_goals(State(state): State<AppState>) -> Result<Json<Vec<GoalBody>>, ApiError> {
    let goals = state.db.goals.list().await?;
    Ok(Json(goals.iter().map(|g| g.to_body()).collect()))
}

/// Get a single goal by id.
pub async fn get_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GoalEnvelope>, ApiError> {
    let goal = resolve_goal(&state.db, &id).await?;
    Ok(Json(GoalEnvelope {
        goal: goal.to_body(),
    }))
}

/// Overwrite a goal's title.
pub async fn update_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<stride_core::GoalPayload>,
) -> Result<Json<GoalEnvelope>, ApiError> {
    let goal = resolve_goal(&state.db, &id).await?;
    let fields = payload.into_new_goal()?;

    let updated = state.db.goals.update(goal.id, &fields.title).await?;

    Ok(Json(GoalEnvelope {
        goal: updated.to_body(),
    }))
}

/// Delete a goal. Association rows are removed by the store's cascade;
/// the tasks themselves survive.
pub async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteConfirmation>, ApiError> {
    let goal = resolve_goal(&state.db, &id).await?;
    state.db.goals.delete(goal.id).await?;

    tracing::info!(goal_id = goal.id, op = "delete", "Goal deleted");
    Ok(Json(DeleteConfirmation {
        details: format!("Goal {} \"{}\" successfully deleted", goal.id, goal.title),
    }))
}

/// Associate a batch of tasks with a goal.
///
/// All-or-nothing: the first unresolvable task id fails the whole request
/// and no association from the batch is committed. The response echoes the
/// input ids.
pub async fn assign_tasks(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AssignTasksPayload>,
) -> Result<Json<AssignTasksBody>, ApiError> {
    let goal = resolve_goal(&state.db, &id).await?;

    state.db.goals.add_tasks(goal.id, &payload.task_ids).await?;

    tracing::info!(
        goal_id = goal.id,
        result_count = payload.task_ids.len(),
        op = "assign_tasks",
        "Tasks associated with goal"
    );
    Ok(Json(AssignTasksBody {
        id: goal.id,
        task_ids: payload.task_ids,
    }))
}

/// List a goal's associated tasks: `{"id", "title", "tasks": [...]}`.
pub async fn goal_tasks(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GoalWithTasks>, ApiError> {
    let goal = resolve_goal(&state.db, &id).await?;
    let tasks = state.db.goals.tasks_of(goal.id).await?;

    Ok(Json(goal.to_body_with_tasks(&tasks)))
}
