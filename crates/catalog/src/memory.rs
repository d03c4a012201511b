//! In-process table backend for tests and offline use.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::backend::{CatalogError, Filters, Table, TableBackend};

/// Tables held in memory. Inserted rows get an `id` and `created_at` when
/// they lack one.
#[derive(Default)]
pub struct InMemoryTables {
    rows: Mutex<HashMap<Table, Vec<serde_json::Value>>>,
    offline: AtomicBool,
}

impl InMemoryTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with [`CatalogError::Unavailable`] until switched
    /// back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn row_count(&self, table: Table) -> usize {
        self.rows.lock().await.get(&table).map_or(0, Vec::len)
    }

    fn check_online(&self) -> Result<(), CatalogError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(CatalogError::Unavailable("backend is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

fn matches(row: &serde_json::Value, filters: Filters<'_>) -> bool {
    filters
        .iter()
        .all(|(column, value)| row.get(*column).and_then(|v| v.as_str()) == Some(*value))
}

#[async_trait]
impl TableBackend for InMemoryTables {
    async fn insert(
        &self,
        table: Table,
        mut row: serde_json::Value,
    ) -> Result<serde_json::Value, CatalogError> {
        self.check_online()?;
        let object = row
            .as_object_mut()
            .ok_or_else(|| CatalogError::Invalid("row must be a JSON object".to_string()))?;
        object
            .entry("id")
            .or_insert_with(|| Uuid::new_v4().to_string().into());
        object
            .entry("created_at")
            .or_insert_with(|| Utc::now().to_rfc3339().into());

        self.rows
            .lock()
            .await
            .entry(table)
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: Table,
        filters: Filters<'_>,
        changes: serde_json::Value,
    ) -> Result<serde_json::Value, CatalogError> {
        self.check_online()?;
        let changes = changes
            .as_object()
            .ok_or_else(|| CatalogError::Invalid("changes must be a JSON object".to_string()))?;

        let mut rows = self.rows.lock().await;
        let row = rows
            .get_mut(&table)
            .and_then(|rows| rows.iter_mut().find(|row| matches(row, filters)))
            .ok_or(CatalogError::NoRows { table })?;
        if let Some(object) = row.as_object_mut() {
            for (key, value) in changes {
                object.insert(key.clone(), value.clone());
            }
        }
        Ok(row.clone())
    }

    async fn delete(
        &self,
        table: Table,
        filters: Filters<'_>,
    ) -> Result<serde_json::Value, CatalogError> {
        self.check_online()?;
        let mut rows = self.rows.lock().await;
        let table_rows = rows.get_mut(&table).ok_or(CatalogError::NoRows { table })?;
        let index = table_rows
            .iter()
            .position(|row| matches(row, filters))
            .ok_or(CatalogError::NoRows { table })?;
        Ok(table_rows.remove(index))
    }

    async fn select(
        &self,
        table: Table,
        filters: Filters<'_>,
    ) -> Result<Vec<serde_json::Value>, CatalogError> {
        self.check_online()?;
        let rows = self.rows.lock().await;
        Ok(rows
            .get(&table)
            .map(|rows| rows.iter().filter(|row| matches(row, filters)).cloned().collect())
            .unwrap_or_default())
    }
}
