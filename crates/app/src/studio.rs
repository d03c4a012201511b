//! Composition root: stores, event bus, wizard and catalog wired together.

use std::sync::Arc;

use studio_catalog::{EquipmentCatalog, RestTableBackend};
use studio_core::error::CoreError;
use studio_core::overview::ProjectOverview;
use studio_core::project::Project;
use studio_events::EventBus;
use studio_store::{FileStorage, KeyValueStorage, ProjectStore, StorageError, TeamStore};
use studio_wizard::{WizardController, WizardError};

use crate::config::StudioConfig;

#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    #[error("Failed to open data directory: {0}")]
    Storage(#[from] StorageError),
}

/// The wizard type handed out by [`Studio`].
pub type StudioWizard<'a, S> = WizardController<&'a mut ProjectStore<S>>;

pub struct Studio<S = FileStorage> {
    projects: ProjectStore<S>,
    team: TeamStore<S>,
    events: Arc<EventBus>,
    catalog: Option<EquipmentCatalog<RestTableBackend>>,
}

impl Studio<FileStorage> {
    /// Open the studio on the configured data directory.
    pub fn open(config: &StudioConfig) -> Result<Self, StudioError> {
        let storage = FileStorage::open(&config.data_dir)?;
        let mut studio = Self::with_storage(storage, Arc::new(EventBus::default()));

        if let (Some(url), Some(key)) = (&config.catalog_url, &config.catalog_api_key) {
            let backend = RestTableBackend::new(url.as_str(), key.as_str());
            let catalog = EquipmentCatalog::new(backend).with_events(Arc::clone(&studio.events));
            studio.catalog = Some(catalog);
            tracing::info!(catalog_url = %url, "Equipment catalog enabled");
        }

        tracing::info!(
            data_dir = %config.data_dir.display(),
            projects = studio.projects.len(),
            members = studio.team.members().len(),
            "Studio opened"
        );
        Ok(studio)
    }
}

impl<S: KeyValueStorage + Clone> Studio<S> {
    /// Build a studio over any storage backend. The catalog is disabled.
    pub fn with_storage(storage: S, events: Arc<EventBus>) -> Self {
        let projects = ProjectStore::open(storage.clone(), Some(Arc::clone(&events)));
        let team = TeamStore::open(storage, Some(Arc::clone(&events)));
        Self {
            projects,
            team,
            events,
            catalog: None,
        }
    }

    pub fn projects(&self) -> &ProjectStore<S> {
        &self.projects
    }

    pub fn projects_mut(&mut self) -> &mut ProjectStore<S> {
        &mut self.projects
    }

    pub fn team(&self) -> &TeamStore<S> {
        &self.team
    }

    pub fn team_mut(&mut self) -> &mut TeamStore<S> {
        &mut self.team
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn catalog(&self) -> Option<&EquipmentCatalog<RestTableBackend>> {
        self.catalog.as_ref()
    }

    // -- wizard --

    /// Open the wizard on a blank draft.
    pub fn authoring_wizard(&mut self) -> StudioWizard<'_, S> {
        WizardController::new(&mut self.projects).with_events(Arc::clone(&self.events))
    }

    /// Open the wizard on a stored project.
    pub fn edit_wizard(&mut self, project_id: &str) -> Result<StudioWizard<'_, S>, WizardError> {
        Ok(WizardController::edit(&mut self.projects, project_id)?
            .with_events(Arc::clone(&self.events)))
    }

    // -- projects --

    pub fn overview(&self, project_id: &str) -> Option<ProjectOverview> {
        self.projects.get(project_id).map(ProjectOverview::from_project)
    }

    pub fn delete_project(&mut self, project_id: &str) -> bool {
        self.projects.delete(project_id)
    }

    pub fn mark_uploaded(&mut self, project_id: &str) -> Result<Project, CoreError> {
        self.projects.mark_uploaded(project_id)
    }

    // -- team --

    /// Remove a member from the roster and from every project assignment.
    pub fn remove_member(&mut self, member_id: &str) -> bool {
        if !self.team.remove_member(member_id) {
            return false;
        }
        self.projects.prune_member(member_id);
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
