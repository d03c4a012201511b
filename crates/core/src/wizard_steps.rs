//! Authoring wizard step definitions and transition rules.
//!
//! The wizard walks Plan -> Schedule -> Overview. Steps are numbered from 1
//! so they can be shown as "Step 2 of 3".

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The three steps of the authoring wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Plan,
    Schedule,
    Overview,
}

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 3;

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

/// Maximum step number (1-based).
pub const MAX_STEP: u8 = 3;

impl WizardStep {
    /// Convert a 1-based step number to a `WizardStep`.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::Plan),
            2 => Ok(Self::Schedule),
            3 => Ok(Self::Overview),
            _ => Err(CoreError::Validation(format!(
                "Invalid step number {n}. Must be between {MIN_STEP} and {MAX_STEP}"
            ))),
        }
    }

    /// Convert to a 1-based step number.
    pub fn to_number(self) -> u8 {
        match self {
            Self::Plan => 1,
            Self::Schedule => 2,
            Self::Overview => 3,
        }
    }

    /// Human-readable label for the step.
    pub fn label(self) -> &'static str {
        match self {
            Self::Plan => "Plan",
            Self::Schedule => "Schedule",
            Self::Overview => "Overview",
        }
    }

    /// The step after this one, if any.
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.to_number() + 1).ok()
    }

    /// The step before this one, if any.
    pub fn previous(self) -> Option<Self> {
        self.to_number()
            .checked_sub(1)
            .and_then(|n| Self::from_number(n).ok())
    }

    pub fn is_final(self) -> bool {
        self.to_number() == MAX_STEP
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validate a step transition.
///
/// A transition is valid if the next step is exactly one step forward or
/// one step backward from the current step.
pub fn validate_step_transition(current: WizardStep, next: WizardStep) -> Result<(), CoreError> {
    let diff = next.to_number() as i16 - current.to_number() as i16;
    if diff != 1 && diff != -1 {
        return Err(CoreError::Validation(format!(
            "Cannot move from the {current} step to the {next} step. \
             Must advance or go back exactly one step."
        )));
    }
    Ok(())
}
