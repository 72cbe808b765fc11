//! stride-api - HTTP API server for stride

mod handlers;
mod notifier;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use stride_core::EventBus;
use stride_db::Database;

use handlers::{
    goals::{
        assign_tasks, create_goal, delete_goal, get_goal, goal_tasks, list_goals, update_goal,
    },
    tasks::{
        create_task, delete_task, get_task, list_tasks, mark_complete, mark_incomplete,
        update_task,
    },
};
use notifier::NotifierConfig;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful
/// for log correlation and debugging.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Event bus decoupling completion notifications from the request path.
    pub event_bus: Arc<EventBus>,
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   RUST_LOG    - standard env filter (default: "stride_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stride_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    info!(log_format = %log_format, "Logging initialized");

    // Get configuration from environment
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/stride".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    // Connect to database
    info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;
    info!("Database connected");

    // Run pending database migrations on startup
    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    // Event bus and completion notifier (fire-and-forget side channel)
    let event_bus = Arc::new(EventBus::new(256));
    let notifier_config = NotifierConfig::from_env();
    tokio::spawn(notifier::run(event_bus.subscribe(), notifier_config));

    let state = AppState {
        db,
        event_bus: event_bus.clone(),
    };

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Tasks
        .route("/tasks", post(create_task).get(list_tasks))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/:id/mark_complete", patch(mark_complete))
        .route("/tasks/:id/mark_incomplete", patch(mark_incomplete))
        // Goals
        .route("/goals", post(create_goal).get(list_goals))
        .route(
            "/goals/:id",
            get(get_goal).put(update_goal).delete(delete_goal),
        )
        .route("/goals/:id/tasks", post(assign_tasks).get(goal_tasks))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]),
        )
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// =============================================================================
// HEALTH CHECK
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

/// API error with the three body shapes of the external contract:
/// id-resolution failures use `{"message": ...}`, payload-shape failures
/// use `{"details": "Invalid data"}`, everything else `{"error": ...}`.
#[derive(Debug)]
pub enum ApiError {
    Database(stride_core::Error),
    /// 404 with `{"message": ...}`.
    NotFound(String),
    /// 400 with `{"message": ...}` (malformed path id).
    BadRequest(String),
    /// 400 with `{"details": "Invalid data"}` (malformed create/update body).
    InvalidData,
}

impl From<stride_core::Error> for ApiError {
    fn from(err: stride_core::Error) -> Self {
        match &err {
            stride_core::Error::TaskNotFound(_) | stride_core::Error::GoalNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            stride_core::Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            stride_core::Error::InvalidInput(_) => ApiError::InvalidData,
            _ => ApiError::Database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Database(err) => {
                tracing::error!(error = %err, "Unhandled database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": err.to_string() })),
                )
                    .into_response()
            }
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "message": message })),
            )
                .into_response(),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "message": message })),
            )
                .into_response(),
            ApiError::InvalidData => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "details": "Invalid data" })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_body_shape() {
        let (status, json) = body_json(ApiError::NotFound("task 42 not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, serde_json::json!({"message": "task 42 not found"}));
    }

    #[tokio::test]
    async fn test_bad_request_body_shape() {
        let (status, json) = body_json(ApiError::BadRequest("task abc not found".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, serde_json::json!({"message": "task abc not found"}));
    }

    #[tokio::test]
    async fn test_invalid_data_body_shape() {
        let (status, json) = body_json(ApiError::InvalidData).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, serde_json::json!({"details": "Invalid data"}));
    }

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = stride_core::Error::TaskNotFound("9".into()).into();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "task 9 not found"));

        let err: ApiError = stride_core::Error::GoalNotFound("9".into()).into();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "goal 9 not found"));

        let err: ApiError = stride_core::Error::InvalidInput("Invalid data".into()).into();
        assert!(matches!(err, ApiError::InvalidData));

        let err: ApiError = stride_core::Error::Internal("boom".into()).into();
        assert!(matches!(err, ApiError::Database(_)));
    }
}
