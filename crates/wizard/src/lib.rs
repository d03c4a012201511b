//! Authoring wizard for video projects.
//!
//! See [`WizardController`] for the step flow and when the project store is
//! written.

pub mod controller;
pub mod error;

pub use controller::WizardController;
pub use error::WizardError;
