//! Persistence for the creator studio.
//!
//! - [`storage`]: the [`KeyValueStorage`] trait with file and in-memory
//!   backends.
//! - [`ProjectStore`]: the canonical project collection.
//! - [`TeamStore`]: the team roster and invites.
//!
//! Every mutation re-serializes the affected collection. Storage failures
//! are logged and reported on the event bus; they never fail the caller.

pub mod collection;
pub mod project_store;
pub mod repository;
pub mod storage;
pub mod team_store;

pub use project_store::{ProjectStats, ProjectStore};
pub use repository::ProjectRepository;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use team_store::TeamStore;
