//! The table interface of the hosted backend.
//!
//! Rows travel as JSON objects. Filters are `column = value` equalities,
//! combined with AND.

use std::fmt;

use async_trait::async_trait;

/// Tables the studio reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Cameras,
    Lenses,
    Profiles,
}

impl Table {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cameras => "cameras",
            Self::Lenses => "lenses",
            Self::Profiles => "profiles",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equality filters, `(column, value)`.
pub type Filters<'a> = &'a [(&'a str, &'a str)];

/// Errors from a [`TableBackend`].
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Catalog API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// A row could not be decoded into the expected type.
    #[error("Invalid catalog row: {0}")]
    Decode(#[from] serde_json::Error),

    /// No row matched the filters.
    #[error("No matching row in {table}")]
    NoRows { table: Table },

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("Catalog backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait TableBackend: Send + Sync {
    /// Insert `row`, returning the stored row.
    async fn insert(
        &self,
        table: Table,
        row: serde_json::Value,
    ) -> Result<serde_json::Value, CatalogError>;

    /// Apply `changes` to the first row matching `filters`, returning it.
    async fn update(
        &self,
        table: Table,
        filters: Filters<'_>,
        changes: serde_json::Value,
    ) -> Result<serde_json::Value, CatalogError>;

    /// Delete the first row matching `filters`, returning it.
    async fn delete(
        &self,
        table: Table,
        filters: Filters<'_>,
    ) -> Result<serde_json::Value, CatalogError>;

    /// All rows matching `filters`.
    async fn select(
        &self,
        table: Table,
        filters: Filters<'_>,
    ) -> Result<Vec<serde_json::Value>, CatalogError>;
}
