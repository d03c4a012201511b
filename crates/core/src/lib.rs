//! Domain model and pure logic for the creator studio project lifecycle.
//!
//! This crate has zero internal dependencies so that the store, the wizard
//! and any future shell can share the same entity definitions, lifecycle
//! state machine and validation rules.

pub mod error;
pub mod ids;
pub mod lifecycle;
pub mod overview;
pub mod project;
pub mod roles;
pub mod team;
pub mod types;
pub mod validation;
pub mod wizard_steps;
