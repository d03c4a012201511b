//! Application shell for the creator studio.
//!
//! Loads [`StudioConfig`] from the environment, installs tracing with
//! [`init_tracing`], and wires the stores, event bus, wizard and equipment
//! catalog together in [`Studio`].

pub mod config;
pub mod studio;
pub mod telemetry;

pub use config::{ConfigError, StudioConfig};
pub use studio::{Studio, StudioError, StudioWizard};
pub use telemetry::init_tracing;
