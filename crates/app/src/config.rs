use std::path::PathBuf;

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "studio-data";

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "studio=info";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}")]
    InvalidValue { var: &'static str, value: String },

    #[error("STUDIO_CATALOG_URL is set but STUDIO_CATALOG_KEY is missing")]
    MissingCatalogKey,
}

/// Application configuration loaded from environment variables.
///
/// All fields have defaults suitable for local use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioConfig {
    /// Directory holding one JSON file per storage namespace.
    pub data_dir: PathBuf,
    /// `tracing` filter directive.
    pub log_filter: String,
    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,
    /// Hosted backend for the equipment catalog. The catalog is disabled
    /// when unset.
    pub catalog_url: Option<String>,
    pub catalog_api_key: Option<String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            json_logs: false,
            catalog_url: None,
            catalog_api_key: None,
        }
    }
}

impl StudioConfig {
    /// Load configuration from the environment, after reading `.env` if
    /// present.
    ///
    /// | Env Var              | Default        |
    /// |----------------------|----------------|
    /// | `STUDIO_DATA_DIR`    | `studio-data`  |
    /// | `RUST_LOG`           | `studio=info`  |
    /// | `STUDIO_LOG_JSON`    | `false`        |
    /// | `STUDIO_CATALOG_URL` | unset          |
    /// | `STUDIO_CATALOG_KEY` | unset          |
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let data_dir = non_empty("STUDIO_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let log_filter = non_empty("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let json_logs = match non_empty("STUDIO_LOG_JSON") {
            Some(value) => parse_flag("STUDIO_LOG_JSON", &value)?,
            None => false,
        };

        let catalog_url = non_empty("STUDIO_CATALOG_URL");
        let catalog_api_key = non_empty("STUDIO_CATALOG_KEY");
        if catalog_url.is_some() && catalog_api_key.is_none() {
            return Err(ConfigError::MissingCatalogKey);
        }

        Ok(Self {
            data_dir,
            log_filter,
            json_logs,
            catalog_url,
            catalog_api_key,
        })
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        }),
    }
}
