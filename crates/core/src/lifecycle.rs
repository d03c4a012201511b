//! Project lifecycle states and the transition table.
//!
//! The authoring wizard writes `Planning`, `Production` and `Scheduled`
//! directly when it saves a draft. Every other state change (for example
//! marking a project as uploaded once the video-hosting studio confirms it)
//! goes through [`state_machine::validate_transition`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Project state
// ---------------------------------------------------------------------------

/// Lifecycle state of a video project.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ProjectState {
    #[default]
    Planning,
    Production,
    Scheduled,
    Uploaded,
}

impl ProjectState {
    /// Every state, in lifecycle order.
    pub const ALL: [ProjectState; 4] = [
        Self::Planning,
        Self::Production,
        Self::Scheduled,
        Self::Uploaded,
    ];

    /// Parse a state name as it appears in persisted records.
    ///
    /// Matching is case-insensitive so hand-edited data still loads.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid project state '{s}'. Must be one of: Planning, Production, Scheduled, Uploaded"
                ))
            })
    }

    /// Persisted name of the state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::Production => "Production",
            Self::Scheduled => "Scheduled",
            Self::Uploaded => "Uploaded",
        }
    }

    /// Whether the project has left the authoring phase for publishing.
    pub fn is_published(self) -> bool {
        matches!(self, Self::Scheduled | Self::Uploaded)
    }
}

impl fmt::Display for ProjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

pub mod state_machine {
    use super::ProjectState;
    use crate::error::CoreError;

    /// Returns the states reachable from `from`.
    ///
    /// `Uploaded` is terminal. `Production` and `Scheduled` toggle between
    /// each other when the publishing mode changes.
    pub fn valid_transitions(from: ProjectState) -> &'static [ProjectState] {
        match from {
            ProjectState::Planning => &[ProjectState::Production, ProjectState::Scheduled],
            ProjectState::Production => &[ProjectState::Scheduled, ProjectState::Uploaded],
            ProjectState::Scheduled => &[ProjectState::Production, ProjectState::Uploaded],
            ProjectState::Uploaded => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: ProjectState, to: ProjectState) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a state transition, returning a conflict error for invalid ones.
    pub fn validate_transition(from: ProjectState, to: ProjectState) -> Result<(), CoreError> {
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Invalid project state transition: {from} -> {to}"
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::state_machine::*;
    use super::*;
    use assert_matches::assert_matches;

    // -- ProjectState --

    #[test]
    fn parse_accepts_persisted_names() {
        for state in ProjectState::ALL {
            assert_eq!(ProjectState::parse(state.as_str()).unwrap(), state);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(
            ProjectState::parse("scheduled").unwrap(),
            ProjectState::Scheduled
        );
        assert_eq!(
            ProjectState::parse(" PRODUCTION ").unwrap(),
            ProjectState::Production
        );
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_matches!(ProjectState::parse("archived"), Err(CoreError::Validation(_)));
        assert!(ProjectState::parse("").is_err());
    }

    #[test]
    fn default_is_planning() {
        assert_eq!(ProjectState::default(), ProjectState::Planning);
    }

    #[test]
    fn serializes_as_plain_name() {
        let json = serde_json::to_string(&ProjectState::Scheduled).unwrap();
        assert_eq!(json, "\"Scheduled\"");
    }

    #[test]
    fn published_states() {
        assert!(!ProjectState::Planning.is_published());
        assert!(!ProjectState::Production.is_published());
        assert!(ProjectState::Scheduled.is_published());
        assert!(ProjectState::Uploaded.is_published());
    }

    // -- transitions --

    #[test]
    fn planning_moves_forward_only() {
        assert!(can_transition(ProjectState::Planning, ProjectState::Production));
        assert!(can_transition(ProjectState::Planning, ProjectState::Scheduled));
        assert!(!can_transition(ProjectState::Planning, ProjectState::Uploaded));
    }

    #[test]
    fn production_and_scheduled_toggle() {
        assert!(can_transition(ProjectState::Production, ProjectState::Scheduled));
        assert!(can_transition(ProjectState::Scheduled, ProjectState::Production));
    }

    #[test]
    fn uploaded_reachable_from_production_and_scheduled() {
        assert!(can_transition(ProjectState::Production, ProjectState::Uploaded));
        assert!(can_transition(ProjectState::Scheduled, ProjectState::Uploaded));
    }

    #[test]
    fn uploaded_is_terminal() {
        assert!(valid_transitions(ProjectState::Uploaded).is_empty());
        for to in ProjectState::ALL {
            assert!(!can_transition(ProjectState::Uploaded, to));
        }
    }

    #[test]
    fn no_self_transitions() {
        for state in ProjectState::ALL {
            assert!(!can_transition(state, state));
        }
    }

    #[test]
    fn invalid_transition_is_conflict() {
        assert_matches!(
            validate_transition(ProjectState::Production, ProjectState::Planning),
            Err(CoreError::Conflict(_))
        );
        assert!(validate_transition(ProjectState::Production, ProjectState::Uploaded).is_ok());
    }
}
