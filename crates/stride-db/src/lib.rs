//! # stride-db
//!
//! PostgreSQL database layer for stride.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for tasks and goals
//! - The `goal_task` join table behind the goal↔task association
//!
//! ## Example
//!
//! ```rust,ignore
//! use stride_core::{NewTask, TaskRepository};
//! use stride_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/stride").await?;
//!
//!     let task = db.tasks.insert(NewTask {
//!         title: "Walk".to_string(),
//!         description: "outside".to_string(),
//!     }).await?;
//!
//!     println!("Created task: {}", task.id);
//!     Ok(())
//! }
//! ```

pub mod goals;
pub mod pool;
pub mod tasks;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use stride_core::*;

// Re-export repository implementations
pub use goals::PgGoalRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use tasks::PgTaskRepository;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Task repository for CRUD operations.
    pub tasks: PgTaskRepository,
    /// Goal repository for CRUD and association operations.
    pub goals: PgGoalRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            tasks: PgTaskRepository::new(pool.clone()),
            goals: PgGoalRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            tasks: PgTaskRepository::new(self.pool.clone()),
            goals: PgGoalRepository::new(self.pool.clone()),
        }
    }
}
