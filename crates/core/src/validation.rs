//! Wizard step validation.
//!
//! Pure functions over a [`ProjectDraft`]. Missing fields are reported as
//! data so the caller can list them and focus the first offending section.

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::project::ProjectDraft;

// ---------------------------------------------------------------------------
// Missing fields and sections
// ---------------------------------------------------------------------------

/// A required field that is blank on the schedule step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    Title,
    Description,
    Schedule,
}

impl MissingField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Schedule => "schedule",
        }
    }

    /// The schedule-step section that holds this field.
    pub fn section(self) -> WizardSection {
        match self {
            Self::Title | Self::Description => WizardSection::Details,
            Self::Schedule => WizardSection::Publishing,
        }
    }
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A section of the schedule step the UI can scroll to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardSection {
    /// Title and description.
    Details,
    /// Date, time and publishing mode.
    Publishing,
}

/// Section of the first missing field, if any.
pub fn first_section(missing: &[MissingField]) -> Option<WizardSection> {
    missing.first().map(|field| field.section())
}

// ---------------------------------------------------------------------------
// Step checks
// ---------------------------------------------------------------------------

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Whether the draft carries both a date and a non-blank time.
pub fn has_schedule(draft: &ProjectDraft) -> bool {
    draft.scheduled_date.is_some()
        && draft
            .scheduled_time
            .as_deref()
            .is_some_and(|t| !is_blank(t))
}

/// Report the missing required fields of the schedule step.
///
/// Order is always title, description, schedule.
pub fn validate_schedule_step(draft: &ProjectDraft) -> Vec<MissingField> {
    let mut missing = Vec::new();
    if is_blank(&draft.metadata.title) {
        missing.push(MissingField::Title);
    }
    if is_blank(&draft.metadata.description) {
        missing.push(MissingField::Description);
    }
    if !has_schedule(draft) && !draft.upload_now {
        missing.push(MissingField::Schedule);
    }
    missing
}

/// Whether the plan step holds any sign of intent worth saving.
///
/// A single non-blank field, file, scene or role assignment is enough.
pub fn is_plan_step_meaningful(draft: &ProjectDraft) -> bool {
    !is_blank(&draft.title)
        || !is_blank(&draft.ideas)
        || !is_blank(&draft.script)
        || !draft.storyboard_files.is_empty()
        || !draft.scenes.is_empty()
        || draft.team_assignments.has_any_assignment()
}

// ---------------------------------------------------------------------------
// Schedule time parsing
// ---------------------------------------------------------------------------

/// Accepted time formats, tried in order.
const TIME_FORMATS: &[&str] = &["%I:%M %p", "%H:%M"];

/// Parse a scheduled time such as `"10:00 AM"` or `"14:30"`.
pub fn parse_schedule_time(time: &str) -> Result<NaiveTime, CoreError> {
    let time = time.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(time, fmt).ok())
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid scheduled time '{time}'. Expected e.g. '10:00 AM' or '14:30'"
            ))
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
