//! REST client for the hosted backend's table API.
//!
//! Speaks the PostgREST conventions: `GET/POST/PATCH/DELETE
//! {base}/rest/v1/{table}`, equality filters as `column=eq.value` query
//! parameters, and `Prefer: return=representation` so writes return the
//! affected rows.

use async_trait::async_trait;

use crate::backend::{CatalogError, Filters, Table, TableBackend};

/// HTTP client for a hosted table API.
pub struct RestTableBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestTableBackend {
    /// * `base_url` - Project URL, e.g. `https://example.supabase.co`.
    /// * `api_key` - Key sent as both `apikey` and bearer token.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: reqwest::Method, table: Table) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CatalogError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CatalogError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_rows(
        response: reqwest::Response,
    ) -> Result<Vec<serde_json::Value>, CatalogError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<Vec<serde_json::Value>>().await?)
    }

    async fn first_row(
        table: Table,
        response: reqwest::Response,
    ) -> Result<serde_json::Value, CatalogError> {
        Self::parse_rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or(CatalogError::NoRows { table })
    }
}

/// Encode equality filters as PostgREST query parameters.
pub fn filter_params(filters: Filters<'_>) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|(column, value)| (column.to_string(), format!("eq.{value}")))
        .collect()
}

#[async_trait]
impl TableBackend for RestTableBackend {
    async fn insert(
        &self,
        table: Table,
        row: serde_json::Value,
    ) -> Result<serde_json::Value, CatalogError> {
        let response = self
            .request(reqwest::Method::POST, table)
            .json(&row)
            .send()
            .await?;
        Self::first_row(table, response).await
    }

    async fn update(
        &self,
        table: Table,
        filters: Filters<'_>,
        changes: serde_json::Value,
    ) -> Result<serde_json::Value, CatalogError> {
        let response = self
            .request(reqwest::Method::PATCH, table)
            .query(&filter_params(filters))
            .json(&changes)
            .send()
            .await?;
        Self::first_row(table, response).await
    }

    async fn delete(
        &self,
        table: Table,
        filters: Filters<'_>,
    ) -> Result<serde_json::Value, CatalogError> {
        let response = self
            .request(reqwest::Method::DELETE, table)
            .query(&filter_params(filters))
            .send()
            .await?;
        Self::first_row(table, response).await
    }

    async fn select(
        &self,
        table: Table,
        filters: Filters<'_>,
    ) -> Result<Vec<serde_json::Value>, CatalogError> {
        let mut params = filter_params(filters);
        params.push(("select".to_string(), "*".to_string()));
        let response = self
            .request(reqwest::Method::GET, table)
            .query(&params)
            .send()
            .await?;
        Self::parse_rows(response).await
    }
}
