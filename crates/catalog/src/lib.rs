//! Equipment catalog collaborator.
//!
//! Cameras, lenses and account profiles live in a hosted backend reached
//! through its table interface ([`TableBackend`]). [`EquipmentCatalog`] wraps
//! a backend and turns every failure into a notification instead of an
//! error. Shots in a project reference catalog rows by id only.

pub mod backend;
pub mod catalog;
pub mod memory;
pub mod model;
pub mod rest;

pub use backend::{CatalogError, Table, TableBackend};
pub use catalog::EquipmentCatalog;
pub use memory::InMemoryTables;
pub use model::{Camera, CameraFields, Lens, LensFields, Profile};
pub use rest::RestTableBackend;
