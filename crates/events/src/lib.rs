//! Studio event bus and notification side channel.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`StudioEvent`]: domain event envelope (project created, updated, ...).
//! - [`Notification`]: user-facing message for persistence, validation and
//!   catalog failures.

pub mod bus;
pub mod notification;

pub use bus::{EventBus, StudioEvent};
pub use notification::{Notification, NotificationLevel};
