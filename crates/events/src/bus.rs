//! In-process event bus backed by `tokio::sync::broadcast` channels.
//!
//! [`EventBus`] fans out two kinds of messages: [`StudioEvent`]s describing
//! domain changes (a project was created, its state changed) and
//! [`Notification`]s meant for the user (a save failed, a step is
//! incomplete). Publishing never blocks and never fails; with no subscribers
//! a message is dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use studio_core::types::ProjectId;
use tokio::sync::broadcast;

use crate::notification::Notification;

// ---------------------------------------------------------------------------
// Event names
// ---------------------------------------------------------------------------

pub const PROJECT_CREATED: &str = "project.created";
pub const PROJECT_UPDATED: &str = "project.updated";
pub const PROJECT_DELETED: &str = "project.deleted";
pub const PROJECT_STATE_CHANGED: &str = "project.state_changed";
pub const TEAM_CHANGED: &str = "team.changed";

// ---------------------------------------------------------------------------
// StudioEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred in the studio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioEvent {
    /// Dot-separated event name, e.g. `"project.created"`.
    pub event_type: String,

    /// Project the event concerns, if any.
    pub project_id: Option<ProjectId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl StudioEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            project_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the project the event concerns.
    pub fn with_project(mut self, project_id: impl Into<ProjectId>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for each broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out bus for events and user notifications.
///
/// Shared via `Arc<EventBus>` between the stores, the wizard and the
/// catalog.
///
/// ```rust
/// use studio_events::bus::{EventBus, StudioEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(StudioEvent::new("project.created"));
/// assert_eq!(rx.try_recv().unwrap().event_type, "project.created");
/// ```
pub struct EventBus {
    events: broadcast::Sender<StudioEvent>,
    notifications: broadcast::Sender<Notification>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When a buffer is full the oldest unread messages are dropped and
    /// slow receivers observe `Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        let (notifications, _) = broadcast::channel(capacity);
        Self {
            events,
            notifications,
        }
    }

    /// Publish a domain event to all current subscribers.
    pub fn publish(&self, event: StudioEvent) {
        tracing::debug!(event_type = %event.event_type, "Publishing studio event");
        // A send error only means there are zero receivers.
        let _ = self.events.send(event);
    }

    /// Deliver a notification to the user-facing side channel.
    pub fn notify(&self, notification: Notification) {
        tracing::debug!(
            level = ?notification.level,
            title = %notification.title,
            "Posting notification"
        );
        let _ = self.notifications.send(notification);
    }

    /// Subscribe to domain events.
    pub fn subscribe(&self) -> broadcast::Receiver<StudioEvent> {
        self.events.subscribe()
    }

    /// Subscribe to user notifications.
    pub fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationLevel;
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            StudioEvent::new(PROJECT_CREATED)
                .with_project("p1")
                .with_payload(serde_json::json!({ "title": "Demo" })),
        );

        let event = rx.try_recv().unwrap();
        assert_eq!(event.event_type, PROJECT_CREATED);
        assert_eq!(event.project_id.as_deref(), Some("p1"));
        assert_eq!(event.payload["title"], "Demo");
    }

    #[test]
    fn every_subscriber_sees_every_event() {
        let bus = EventBus::default();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish(StudioEvent::new(PROJECT_DELETED));

        assert_eq!(a.try_recv().unwrap().event_type, PROJECT_DELETED);
        assert_eq!(b.try_recv().unwrap().event_type, PROJECT_DELETED);
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::default();
        bus.publish(StudioEvent::new(PROJECT_UPDATED));
        bus.notify(Notification::info("Saved", "Project saved"));
    }

    #[test]
    fn notifications_use_their_own_channel() {
        let bus = EventBus::default();
        let mut events = bus.subscribe();
        let mut notes = bus.subscribe_notifications();

        bus.notify(Notification::error("Save failed", "quota exceeded"));

        let note = notes.try_recv().unwrap();
        assert_eq!(note.level, NotificationLevel::Error);
        assert_eq!(note.message, "quota exceeded");
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn slow_receiver_observes_lag() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for _ in 0..5 {
            bus.publish(StudioEvent::new(PROJECT_UPDATED));
        }
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(_))));
    }
}
