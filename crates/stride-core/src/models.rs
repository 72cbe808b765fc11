//! Core data models for stride.
//!
//! These types are shared across all stride crates and represent the two
//! domain entities (tasks and goals) plus the typed request/response
//! bodies each endpoint exchanges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// =============================================================================
// TASK TYPES
// =============================================================================

/// A task row as stored in the database.
///
/// `completed_at` is the single source of truth for completion state:
/// a non-null timestamp means the task is complete. The raw timestamp is
/// never exposed over the API; clients only see the derived boolean.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Completion state, derived from `completed_at` nullity.
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// External JSON representation of this task.
    pub fn to_body(&self) -> TaskBody {
        TaskBody {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            is_complete: self.is_complete(),
        }
    }
}

/// Serialized task shape: `{id, title, description, is_complete}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskBody {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_complete: bool,
}

/// Fields for inserting a new task. Always starts incomplete.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
}

// =============================================================================
// GOAL TYPES
// =============================================================================

/// A goal row as stored in the database. Associated tasks live in the
/// `goal_task` join table and are loaded separately.
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub id: i64,
    pub title: String,
}

impl Goal {
    /// External JSON representation of this goal (without tasks).
    pub fn to_body(&self) -> GoalBody {
        GoalBody {
            id: self.id,
            title: self.title.clone(),
        }
    }

    /// External JSON representation including associated tasks.
    pub fn to_body_with_tasks(&self, tasks: &[Task]) -> GoalWithTasks {
        GoalWithTasks {
            id: self.id,
            title: self.title.clone(),
            tasks: tasks.iter().map(Task::to_body).collect(),
        }
    }
}

/// Serialized goal shape: `{id, title}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalBody {
    pub id: i64,
    pub title: String,
}

/// Serialized goal with its associated tasks: `{id, title, tasks}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalWithTasks {
    pub id: i64,
    pub title: String,
    pub tasks: Vec<TaskBody>,
}

/// Fields for inserting a new goal.
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub title: String,
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

/// Body for `POST /tasks` and `PUT /tasks/:id`.
///
/// Both fields are required; updates are whole-record overwrites, matching
/// create semantics. Fields are `Option` so that a missing key surfaces as
/// the contract's 400 `{"details": "Invalid data"}` instead of a
/// deserialization rejection.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TaskPayload {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TaskPayload {
    /// Validate the required-field set and produce insert fields.
    pub fn into_new_task(self) -> Result<NewTask> {
        match (self.title, self.description) {
            (Some(title), Some(description)) => Ok(NewTask { title, description }),
            _ => Err(Error::InvalidInput("Invalid data".to_string())),
        }
    }
}

/// Body for `POST /goals` and `PUT /goals/:id`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GoalPayload {
    pub title: Option<String>,
}

impl GoalPayload {
    /// Validate the required-field set and produce insert fields.
    pub fn into_new_goal(self) -> Result<NewGoal> {
        match self.title {
            Some(title) => Ok(NewGoal { title }),
            None => Err(Error::InvalidInput("Invalid data".to_string())),
        }
    }
}

/// Body for `POST /goals/:id/tasks`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignTasksPayload {
    pub task_ids: Vec<i64>,
}

/// Response for `POST /goals/:id/tasks`: echoes the goal id and the
/// task ids from the request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignTasksBody {
    pub id: i64,
    pub task_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_task(completed_at: Option<DateTime<Utc>>) -> Task {
        Task {
            id: 1,
            title: "Walk".to_string(),
            description: "outside".to_string(),
            completed_at,
        }
    }

    #[test]
    fn test_is_complete_derived_from_completed_at() {
        assert!(!sample_task(None).is_complete());

        let ts = Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap();
        assert!(sample_task(Some(ts)).is_complete());
    }

    #[test]
    fn test_task_body_never_exposes_timestamp() {
        let ts = Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap();
        let body = sample_task(Some(ts)).to_body();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "title": "Walk",
                "description": "outside",
                "is_complete": true
            })
        );
        assert!(json.get("completed_at").is_none());
    }

    #[test]
    fn test_mark_complete_then_incomplete_round_trip() {
        let mut task = sample_task(None);
        assert!(!task.to_body().is_complete);

        task.completed_at = Some(Utc::now());
        assert!(task.to_body().is_complete);

        task.completed_at = None;
        assert!(!task.to_body().is_complete);
    }

    #[test]
    fn test_goal_body_shape() {
        let goal = Goal {
            id: 3,
            title: "Habit".to_string(),
        };
        let json = serde_json::to_value(goal.to_body()).unwrap();
        assert_eq!(json, serde_json::json!({"id": 3, "title": "Habit"}));
    }

    #[test]
    fn test_goal_with_tasks_serializes_nested_bodies() {
        let goal = Goal {
            id: 3,
            title: "Habit".to_string(),
        };
        let tasks = vec![sample_task(None)];
        let json = serde_json::to_value(goal.to_body_with_tasks(&tasks)).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["title"], "Habit");
        assert_eq!(json["tasks"][0]["is_complete"], false);
        assert_eq!(json["tasks"][0]["title"], "Walk");
    }

    #[test]
    fn test_task_payload_requires_both_fields() {
        let full: TaskPayload =
            serde_json::from_str(r#"{"title": "Walk", "description": "outside"}"#).unwrap();
        let new_task = full.into_new_task().unwrap();
        assert_eq!(new_task.title, "Walk");
        assert_eq!(new_task.description, "outside");

        let missing_description: TaskPayload =
            serde_json::from_str(r#"{"title": "Walk"}"#).unwrap();
        assert!(matches!(
            missing_description.into_new_task(),
            Err(Error::InvalidInput(msg)) if msg == "Invalid data"
        ));

        let missing_title: TaskPayload =
            serde_json::from_str(r#"{"description": "outside"}"#).unwrap();
        assert!(missing_title.into_new_task().is_err());

        let empty: TaskPayload = serde_json::from_str("{}").unwrap();
        assert!(empty.into_new_task().is_err());
    }

    #[test]
    fn test_goal_payload_requires_title() {
        let full: GoalPayload = serde_json::from_str(r#"{"title": "Habit"}"#).unwrap();
        assert_eq!(full.into_new_goal().unwrap().title, "Habit");

        let empty: GoalPayload = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            empty.into_new_goal(),
            Err(Error::InvalidInput(msg)) if msg == "Invalid data"
        ));
    }

    #[test]
    fn test_assign_tasks_body_echo() {
        let body = AssignTasksBody {
            id: 1,
            task_ids: vec![2, 3],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "task_ids": [2, 3]}));
    }
}
