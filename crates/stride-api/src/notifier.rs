//! Completion notifier: delivers task-completion messages to a Slack
//! channel.
//!
//! Runs as a spawned task subscribed to the event bus, so delivery sits
//! entirely outside the request path: the completing request has already
//! committed and responded by the time delivery is attempted. Failures
//! are logged and swallowed — at-most-once delivery.

use reqwest::Client;
use tokio::sync::broadcast;

use stride_core::ServerEvent;

/// Default chat endpoint (Slack-compatible `chat.postMessage`).
pub const DEFAULT_API_URL: &str = "https://slack.com/api/chat.postMessage";

/// Default channel for completion notifications.
pub const DEFAULT_CHANNEL: &str = "task-notification";

/// Notifier configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Chat endpoint URL.
    pub api_url: String,
    /// Bearer credential. Without one the notifier drains events without
    /// delivering.
    pub token: Option<String>,
    /// Target channel.
    pub channel: String,
}

impl NotifierConfig {
    /// Read `SLACK_API_URL`, `SLACK_TOKEN`, `SLACK_CHANNEL`.
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("SLACK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            token: std::env::var("SLACK_TOKEN").ok(),
            channel: std::env::var("SLACK_CHANNEL").unwrap_or_else(|_| DEFAULT_CHANNEL.to_string()),
        }
    }
}

/// Message text for a completed task.
fn message_text(title: &str) -> String {
    format!("Someone just completed the task {title}")
}

/// Notifier loop: subscribes to the bus and delivers each completion event.
pub async fn run(mut rx: broadcast::Receiver<ServerEvent>, config: NotifierConfig) {
    if config.token.is_none() {
        tracing::warn!(
            subsystem = "notifier",
            "SLACK_TOKEN not configured; completion notifications disabled"
        );
    }

    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .unwrap_or_default();

    loop {
        match rx.recv().await {
            Ok(ServerEvent::TaskCompleted { task_id, title }) => {
                let Some(token) = config.token.as_deref() else {
                    continue;
                };
                deliver(&client, &config.api_url, token, &config.channel, task_id, &title).await;
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(
                    subsystem = "notifier",
                    missed = n,
                    "Notifier lagged, missed events"
                );
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Deliver a single completion message. Never propagates errors.
async fn deliver(
    client: &Client,
    api_url: &str,
    token: &str,
    channel: &str,
    task_id: i64,
    title: &str,
) {
    let body = serde_json::json!({
        "channel": channel,
        "text": message_text(title),
    });

    let result = client.post(api_url).bearer_auth(token).json(&body).send().await;

    match result {
        Ok(response) if response.status().is_success() => {
            tracing::debug!(
                subsystem = "notifier",
                task_id,
                op = "deliver",
                success = true,
                "Completion notification delivered"
            );
        }
        Ok(response) => {
            tracing::warn!(
                subsystem = "notifier",
                task_id,
                status = response.status().as_u16(),
                "Completion notification rejected"
            );
        }
        Err(e) => {
            tracing::warn!(
                subsystem = "notifier",
                task_id,
                error = %e,
                "Completion notification failed"
            );
        }
    }
}
