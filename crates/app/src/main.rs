use std::process::ExitCode;

use studio_app::{init_tracing, Studio, StudioConfig};
use studio_core::lifecycle::ProjectState;

fn main() -> ExitCode {
    let config = match StudioConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&config) {
        eprintln!("Failed to initialise tracing: {e}");
    }

    let studio = match Studio::open(&config) {
        Ok(studio) => studio,
        Err(e) => {
            tracing::error!(error = %e, "Failed to open studio");
            return ExitCode::FAILURE;
        }
    };

    let stats = studio.projects().stats();
    for state in ProjectState::ALL {
        tracing::info!(state = %state, count = stats.count(state), "Projects by state");
    }
    for project in studio.projects().list() {
        tracing::info!(
            project_id = %project.id,
            title = %project.title,
            state = %project.state,
            updated_at = %project.updated_at,
            "Project"
        );
    }
    ExitCode::SUCCESS
}
