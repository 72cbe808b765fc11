//! Server event types and event bus for notification side-effects.
//!
//! Completion notifications are decoupled from the request path: handlers
//! emit a [`ServerEvent`] after the database commit, and the notifier task
//! in stride-api subscribes and performs the outbound delivery. Delivery
//! outcome never reaches the HTTP response.

use tokio::sync::broadcast;

/// Events emitted by request handlers after a state change is persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// A task was marked complete. Emitted after the completion timestamp
    /// is committed.
    TaskCompleted { task_id: i64, title: String },
}

impl ServerEvent {
    /// Namespaced event type for logging.
    pub fn event_type(&self) -> &'static str {
        match self {
            ServerEvent::TaskCompleted { .. } => "task.completed",
        }
    }
}

/// Broadcast-based event bus for distributing server events to consumers.
///
/// Uses `tokio::sync::broadcast` with a configurable buffer size. Slow
/// receivers that fall behind receive a `Lagged` error and miss events —
/// acceptable here since notification delivery is at-most-once.
pub struct EventBus {
    tx: broadcast::Sender<ServerEvent>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    ///
    /// Recommended: 256 for production, 32 for tests.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// the emitting request has already succeeded either way.
    pub fn emit(&self, event: ServerEvent) {
        let subscriber_count = self.tx.receiver_count();
        tracing::debug!(
            event_type = %event.event_type(),
            subscriber_count,
            "EventBus emit"
        );
        let _ = self.tx.send(event);
    }

    /// Subscribe to receive events. Each subscriber gets its own
    /// independent stream.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.tx.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_emit_subscribe() {
        let bus = EventBus::new(32);
        let mut rx = bus.subscribe();

        bus.emit(ServerEvent::TaskCompleted {
            task_id: 7,
            title: "Walk".to_string(),
        });

        let event = rx.recv().await.expect("event delivered");
        assert_eq!(
            event,
            ServerEvent::TaskCompleted {
                task_id: 7,
                title: "Walk".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_is_silent() {
        let bus = EventBus::new(32);
        assert_eq!(bus.subscriber_count(), 0);

        // Must not panic or error.
        bus.emit(ServerEvent::TaskCompleted {
            task_id: 1,
            title: "Walk".to_string(),
        });
    }

    #[tokio::test]
    async fn test_multiple_subscribers_each_receive() {
        let bus = EventBus::new(32);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(ServerEvent::TaskCompleted {
            task_id: 2,
            title: "Read".to_string(),
        });

        assert!(rx1.recv().await.is_ok());
        assert!(rx2.recv().await.is_ok());
    }

    #[test]
    fn test_event_type_names() {
        let event = ServerEvent::TaskCompleted {
            task_id: 1,
            title: "Walk".to_string(),
        };
        assert_eq!(event.event_type(), "task.completed");
    }
}
