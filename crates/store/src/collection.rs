//! Load and persist whole JSON collections with best-effort durability.
//!
//! Failures never propagate to the caller. They are logged and posted to the
//! event bus as notifications; the in-memory collection stays authoritative.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use studio_events::{EventBus, Notification};

use crate::storage::{KeyValueStorage, StorageError};

/// Storage key of the project collection.
pub const PROJECTS_KEY: &str = "videoProjects";
/// Storage key of the team roster.
pub const TEAM_MEMBERS_KEY: &str = "teamMembers";
/// Storage key of pending and past invites.
pub const TEAM_INVITES_KEY: &str = "teamInvites";

/// Read the collection stored under `key`.
///
/// A missing key yields an empty collection. An unreadable or corrupt
/// payload also yields an empty collection, with a warning and a
/// notification; the payload itself is left untouched.
pub fn load<T, S>(storage: &S, key: &str, events: Option<&Arc<EventBus>>) -> Vec<T>
where
    T: DeserializeOwned,
    S: KeyValueStorage,
{
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read stored collection");
            notify(
                events,
                Notification::warning("Could not load saved data", e.to_string()),
            );
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => {
            tracing::debug!(key, count = items.len(), "Loaded stored collection");
            items
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Stored collection is corrupt, starting empty");
            notify(
                events,
                Notification::warning(
                    "Saved data is unreadable",
                    format!("Ignoring corrupt '{key}' data: {e}"),
                ),
            );
            Vec::new()
        }
    }
}

/// Serialize and write the whole collection under `key`.
pub fn write<T, S>(storage: &S, key: &str, items: &[T]) -> Result<(), StorageError>
where
    T: Serialize,
    S: KeyValueStorage,
{
    let json = serde_json::to_string(items)?;
    storage.write(key, &json)
}

/// Like [`write`], but failures are logged and posted as a notification.
///
/// Returns whether the write succeeded.
pub fn persist<T, S>(storage: &S, key: &str, items: &[T], events: Option<&Arc<EventBus>>) -> bool
where
    T: Serialize,
    S: KeyValueStorage,
{
    match write(storage, key, items) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(key, count = items.len(), error = %e, "Failed to persist collection");
            notify(
                events,
                Notification::error(
                    "Changes were not saved",
                    format!("Saving '{key}' failed: {e}"),
                ),
            );
            false
        }
    }
}

pub(crate) fn notify(events: Option<&Arc<EventBus>>, notification: Notification) {
    if let Some(bus) = events {
        bus.notify(notification);
    }
}
