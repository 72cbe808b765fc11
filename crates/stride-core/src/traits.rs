//! Repository traits for stride's persistence layer.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability. Handlers
//! receive repositories through injected state rather than module-level
//! globals.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Goal, NewGoal, NewTask, Task};

/// Ordering for task listings.
///
/// `Unsorted` preserves store order. Anything other than `asc`/`desc` in
/// the query string maps to `Unsorted`, matching the external contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    #[default]
    Unsorted,
    TitleAsc,
    TitleDesc,
}

impl TaskSort {
    /// Parse the `sort` query parameter.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("asc") => TaskSort::TitleAsc,
            Some("desc") => TaskSort::TitleDesc,
            _ => TaskSort::Unsorted,
        }
    }
}

/// Repository for task CRUD operations.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a new task. New tasks start incomplete.
    async fn insert(&self, new: NewTask) -> Result<Task>;

    /// Fetch a task by id, or `None` if no row matches.
    async fn get(&self, id: i64) -> Result<Option<Task>>;

    /// List all tasks with the requested ordering.
    async fn list(&self, sort: TaskSort) -> Result<Vec<Task>>;

    /// Overwrite title and description. Returns the updated row.
    async fn update(&self, id: i64, title: &str, description: &str) -> Result<Task>;

    /// Set or clear the completion timestamp. Returns the updated row.
    async fn set_completed(&self, id: i64, completed_at: Option<DateTime<Utc>>) -> Result<Task>;

    /// Delete a task. Join rows referencing it are removed by the store.
    async fn delete(&self, id: i64) -> Result<()>;
}

/// Repository for goal CRUD operations and the goal↔task association.
#[async_trait]
pub trait GoalRepository: Send + Sync {
    /// Insert a new goal with no associated tasks.
    async fn insert(&self, new: NewGoal) -> Result<Goal>;

    /// Fetch a goal by id, or `None` if no row matches.
    async fn get(&self, id: i64) -> Result<Option<Goal>>;

    /// List all goals in store order.
    async fn list(&self) -> Result<Vec<Goal>>;

    /// Overwrite the title. Returns the updated row.
    async fn update(&self, id: i64, title: &str) -> Result<Goal>;

    /// Delete a goal. Join rows referencing it are removed by the store.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Associate tasks with a goal in a single transaction.
    ///
    /// Every id must reference an existing task; the first missing id
    /// aborts the whole batch with `Error::TaskNotFound` and no join row
    /// from the request survives. Re-adding an already linked task is a
    /// no-op.
    async fn add_tasks(&self, goal_id: i64, task_ids: &[i64]) -> Result<()>;

    /// Tasks associated with a goal, ordered by task id.
    async fn tasks_of(&self, goal_id: i64) -> Result<Vec<Task>>;
}
