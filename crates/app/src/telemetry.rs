use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{StudioConfig, DEFAULT_LOG_FILTER};

/// Install the global tracing subscriber.
///
/// An invalid filter directive falls back to the default filter. Fails only
/// if a global subscriber is already installed.
pub fn init_tracing(config: &StudioConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|e| {
        eprintln!("Invalid log filter '{}': {e}", config.log_filter);
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    }
}
