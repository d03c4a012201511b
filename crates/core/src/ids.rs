//! Identifier generation for projects, scenes, shots and team records.
//!
//! Project ids are full v4 UUIDs. Scene and shot ids are short prefixes of a
//! UUID, checked against the ids already taken in the parent scope.

use uuid::Uuid;

use crate::types::ProjectId;

/// Length of a short (scene / shot) identifier.
pub const SHORT_ID_LEN: usize = 8;

/// How many short candidates are tried before falling back to a full id.
pub const MAX_SHORT_ID_ATTEMPTS: usize = 16;

/// Generate a fresh project identifier.
pub fn new_project_id() -> ProjectId {
    Uuid::new_v4().to_string()
}

/// Generate an identifier for a team member or invite.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a short identifier that `is_taken` does not reject.
///
/// After [`MAX_SHORT_ID_ATTEMPTS`] collisions the full 32-character simple
/// form of a UUID is returned instead.
pub fn unique_short_id(is_taken: impl Fn(&str) -> bool) -> String {
    for _ in 0..MAX_SHORT_ID_ATTEMPTS {
        let candidate = Uuid::new_v4().simple().to_string()[..SHORT_ID_LEN].to_string();
        if !is_taken(&candidate) {
            return candidate;
        }
    }
    Uuid::new_v4().simple().to_string()
}
