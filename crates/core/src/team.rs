//! Team roster records.
//!
//! Projects reference members by id only; the roster itself is owned by the
//! team store.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::roles::ProductionRole;
use crate::types::{MemberId, Timestamp};

/// A member of the production team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    /// Primary role shown on the team page. Project roles are assigned separately.
    pub role: ProductionRole,
    pub joined_at: Timestamp,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Input for adding a member directly.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTeamMember {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: ProductionRole,
}

/// Status of a pending team invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Revoked,
}

/// An invitation sent to someone who is not yet on the team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInvite {
    pub id: String,
    pub email: String,
    pub role: ProductionRole,
    pub invited_at: Timestamp,
    pub status: InviteStatus,
}

/// Input for inviting someone by email.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewInvite {
    #[validate(email)]
    pub email: String,
    pub role: ProductionRole,
}

/// Run derived validation, mapping failures to [`CoreError::Validation`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))
}

/// Normalise an email for comparisons.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
