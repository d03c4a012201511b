//! Camera and lens CRUD for the equipment catalog.
//!
//! Every operation returns `None` (or an empty list) on failure and reports
//! the failure through the event bus. Nothing is cached locally, so a failed
//! write leaves no optimistic state behind.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use studio_events::{EventBus, Notification};

use crate::backend::{CatalogError, Table, TableBackend};
use crate::model::{Camera, CameraFields, Lens, LensFields, Profile};

pub struct EquipmentCatalog<B> {
    backend: B,
    events: Option<Arc<EventBus>>,
}

impl<B: TableBackend> EquipmentCatalog<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            events: None,
        }
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ---------------------------------------------------------------------------
    // Cameras
    // ---------------------------------------------------------------------------

    pub async fn add_camera(&self, owner_id: &str, fields: &CameraFields) -> Option<Camera> {
        let result = match required_name(fields.name.as_deref(), "Camera") {
            Ok(()) => self.insert(Table::Cameras, owner_id, fields).await,
            Err(e) => Err(e),
        };
        self.finish("add camera", result)
    }

    pub async fn update_camera(
        &self,
        owner_id: &str,
        camera_id: &str,
        fields: &CameraFields,
    ) -> Option<Camera> {
        let result = self.update(Table::Cameras, owner_id, camera_id, fields).await;
        self.finish("update camera", result)
    }

    pub async fn remove_camera(&self, owner_id: &str, camera_id: &str) -> Option<Camera> {
        let result = self
            .backend
            .delete(Table::Cameras, &[("id", camera_id), ("owner_id", owner_id)])
            .await;
        self.finish("remove camera", result)
    }

    pub async fn list_cameras(&self, owner_id: &str) -> Vec<Camera> {
        self.list(Table::Cameras, owner_id, "list cameras").await
    }

    // ---------------------------------------------------------------------------
    // Lenses
    // ---------------------------------------------------------------------------

    pub async fn add_lens(&self, owner_id: &str, fields: &LensFields) -> Option<Lens> {
        let result = match required_name(fields.name.as_deref(), "Lens") {
            Ok(()) => self.insert(Table::Lenses, owner_id, fields).await,
            Err(e) => Err(e),
        };
        self.finish("add lens", result)
    }

    pub async fn update_lens(
        &self,
        owner_id: &str,
        lens_id: &str,
        fields: &LensFields,
    ) -> Option<Lens> {
        let result = self.update(Table::Lenses, owner_id, lens_id, fields).await;
        self.finish("update lens", result)
    }

    pub async fn remove_lens(&self, owner_id: &str, lens_id: &str) -> Option<Lens> {
        let result = self
            .backend
            .delete(Table::Lenses, &[("id", lens_id), ("owner_id", owner_id)])
            .await;
        self.finish("remove lens", result)
    }

    pub async fn list_lenses(&self, owner_id: &str) -> Vec<Lens> {
        self.list(Table::Lenses, owner_id, "list lenses").await
    }

    // ---------------------------------------------------------------------------
    // Profiles
    // ---------------------------------------------------------------------------

    pub async fn fetch_profile(&self, user_id: &str) -> Option<Profile> {
        let result = self
            .backend
            .select(Table::Profiles, &[("id", user_id)])
            .await
            .and_then(|rows| {
                rows.into_iter()
                    .next()
                    .ok_or(CatalogError::NoRows { table: Table::Profiles })
            });
        self.finish("load profile", result)
    }

    // ---- private helpers ----

    async fn insert<F: serde::Serialize>(
        &self,
        table: Table,
        owner_id: &str,
        fields: &F,
    ) -> Result<serde_json::Value, CatalogError> {
        let mut row = serde_json::to_value(fields)?;
        if let Some(object) = row.as_object_mut() {
            object.insert("owner_id".to_string(), owner_id.into());
        }
        self.backend.insert(table, row).await
    }

    async fn update<F: serde::Serialize>(
        &self,
        table: Table,
        owner_id: &str,
        id: &str,
        fields: &F,
    ) -> Result<serde_json::Value, CatalogError> {
        let changes = serde_json::to_value(fields)?;
        self.backend
            .update(table, &[("id", id), ("owner_id", owner_id)], changes)
            .await
    }

    async fn list<T: DeserializeOwned>(
        &self,
        table: Table,
        owner_id: &str,
        action: &str,
    ) -> Vec<T> {
        let rows = self
            .backend
            .select(table, &[("owner_id", owner_id)])
            .await
            .and_then(|rows| {
                rows.into_iter()
                    .map(|row| serde_json::from_value(row).map_err(CatalogError::from))
                    .collect::<Result<Vec<T>, _>>()
            });
        match rows {
            Ok(items) => items,
            Err(e) => {
                self.report(action, &e);
                Vec::new()
            }
        }
    }

    /// Decode a returned row, or report the failure and yield `None`.
    fn finish<T: DeserializeOwned>(
        &self,
        action: &str,
        result: Result<serde_json::Value, CatalogError>,
    ) -> Option<T> {
        match result.and_then(|row| serde_json::from_value(row).map_err(CatalogError::from)) {
            Ok(item) => {
                tracing::debug!(action, "Catalog call succeeded");
                Some(item)
            }
            Err(e) => {
                self.report(action, &e);
                None
            }
        }
    }

    fn report(&self, action: &str, error: &CatalogError) {
        tracing::error!(action, error = %error, "Equipment catalog call failed");
        if let Some(bus) = &self.events {
            bus.notify(Notification::error(
                "Equipment catalog error",
                format!("Could not {action}: {error}"),
            ));
        }
    }
}

fn required_name(name: Option<&str>, kind: &str) -> Result<(), CatalogError> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(()),
        _ => Err(CatalogError::Invalid(format!("{kind} name is required"))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
