use studio_core::error::CoreError;
use studio_core::types::ProjectId;
use studio_core::validation::{MissingField, WizardSection};
use studio_core::wizard_steps::WizardStep;

/// Reasons the wizard refuses an action. None of them end the session.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    /// The schedule step is missing required fields.
    #[error("Schedule step is incomplete, missing: {}", join_fields(.missing))]
    Incomplete {
        /// Missing fields in title, description, schedule order.
        missing: Vec<MissingField>,
        /// Section holding the first missing field.
        focus: WizardSection,
    },

    #[error("Nothing to save yet")]
    NothingToSave,

    #[error("Cannot {action} on the {step} step")]
    NotAvailable {
        action: &'static str,
        step: WizardStep,
    },

    #[error("Project {0} not found")]
    ProjectNotFound(ProjectId),

    #[error(transparent)]
    Core(#[from] CoreError),
}

fn join_fields(fields: &[MissingField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
