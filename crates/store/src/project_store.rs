//! The canonical collection of video projects.
//!
//! [`ProjectStore`] keeps every project in memory in insertion order and
//! re-serializes the whole collection to storage after each successful
//! mutation. Storage failures are best-effort: they are logged and posted as
//! notifications, and the in-memory state is not rolled back.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use studio_core::error::CoreError;
use studio_core::ids;
use studio_core::lifecycle::{state_machine, ProjectState};
use studio_core::project::{untitled_title, Project, ProjectDraft, ProjectPatch};
use studio_core::types::{ProjectId, Timestamp};
use studio_events::bus::{
    PROJECT_CREATED, PROJECT_DELETED, PROJECT_STATE_CHANGED, PROJECT_UPDATED,
};
use studio_events::{EventBus, StudioEvent};

use crate::collection::{self, PROJECTS_KEY};
use crate::repository::ProjectRepository;
use crate::storage::KeyValueStorage;

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Number of projects in each lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectStats {
    pub total: usize,
    pub by_state: BTreeMap<ProjectState, usize>,
}

impl ProjectStats {
    pub fn count(&self, state: ProjectState) -> usize {
        self.by_state.get(&state).copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// ProjectStore
// ---------------------------------------------------------------------------

/// Owns the project collection and its persistence.
pub struct ProjectStore<S> {
    storage: S,
    projects: Vec<Project>,
    events: Option<Arc<EventBus>>,
}

impl<S: KeyValueStorage> ProjectStore<S> {
    /// Load the collection from `storage`.
    ///
    /// Missing or corrupt data starts an empty collection.
    pub fn open(storage: S, events: Option<Arc<EventBus>>) -> Self {
        let projects: Vec<Project> = collection::load(&storage, PROJECTS_KEY, events.as_ref());
        tracing::info!(count = projects.len(), "Project store opened");
        Self {
            storage,
            projects,
            events,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // -- queries --

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// All projects in insertion order.
    pub fn list(&self) -> &[Project] {
        &self.projects
    }

    pub fn list_by_state(&self, state: ProjectState) -> Vec<&Project> {
        self.projects.iter().filter(|p| p.state == state).collect()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Counts by lifecycle state. Every state is present, possibly with 0.
    pub fn stats(&self) -> ProjectStats {
        let mut by_state: BTreeMap<ProjectState, usize> =
            ProjectState::ALL.into_iter().map(|s| (s, 0)).collect();
        for project in &self.projects {
            *by_state.entry(project.state).or_default() += 1;
        }
        ProjectStats {
            total: self.projects.len(),
            by_state,
        }
    }

    // -- mutations --

    /// Create a project from `patch` on top of the defaults.
    ///
    /// The new project gets a fresh id, state `Planning` and both timestamps
    /// set to now. A blank title becomes `Untitled Project N`.
    pub fn create(&mut self, patch: &ProjectPatch) -> Project {
        self.insert(patch, ProjectState::Planning)
    }

    /// Merge `patch` into the project `id`.
    ///
    /// Returns `None` if no project has that id.
    pub fn update(&mut self, id: &str, patch: &ProjectPatch) -> Option<Project> {
        let index = self.index_of(id)?;
        let project = &mut self.projects[index];
        let previous_state = project.state;

        patch.apply(project);
        project.updated_at = next_timestamp(project.updated_at);
        let updated = project.clone();

        self.persist();
        if previous_state != updated.state {
            self.publish_state_change(&updated.id, previous_state, updated.state);
        }
        self.publish(StudioEvent::new(PROJECT_UPDATED).with_project(updated.id.clone()));
        tracing::debug!(project_id = %updated.id, "Project updated");
        Some(updated)
    }

    /// Remove the project `id`. Returns whether anything was removed.
    ///
    /// Deleting an unknown id is a no-op.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let removed = self.projects.remove(index);
        self.persist();
        self.publish(StudioEvent::new(PROJECT_DELETED).with_project(removed.id.clone()));
        tracing::info!(project_id = %removed.id, title = %removed.title, "Project deleted");
        true
    }

    /// Update the draft's project if its id resolves, otherwise create one.
    ///
    /// Unlike [`create`](Self::create), a newly created project keeps the
    /// draft's state.
    pub fn save(&mut self, draft: &ProjectDraft) -> Project {
        let patch = draft.to_patch();
        if let Some(id) = draft.id.as_deref() {
            if let Some(project) = self.update(id, &patch) {
                return project;
            }
            tracing::warn!(project_id = %id, "Draft id no longer resolves, creating a new project");
        }
        self.insert(&patch, draft.state)
    }

    /// Move a project to `to`, enforcing the lifecycle transition table.
    pub fn transition(&mut self, id: &str, to: ProjectState) -> Result<Project, CoreError> {
        let index = self.index_of(id).ok_or_else(|| CoreError::NotFound {
            entity: "project",
            id: id.to_string(),
        })?;
        let project = &mut self.projects[index];
        let from = project.state;
        state_machine::validate_transition(from, to)?;

        project.state = to;
        project.updated_at = next_timestamp(project.updated_at);
        let updated = project.clone();

        self.persist();
        self.publish_state_change(&updated.id, from, to);
        Ok(updated)
    }

    /// Record that the video-hosting studio confirmed the upload.
    pub fn mark_uploaded(&mut self, id: &str) -> Result<Project, CoreError> {
        self.transition(id, ProjectState::Uploaded)
    }

    /// Drop `member_id` from every project's team assignments.
    ///
    /// Returns the number of projects that changed.
    pub fn prune_member(&mut self, member_id: &str) -> usize {
        let mut changed = Vec::new();
        for project in &mut self.projects {
            if project.team_assignments.prune_members(|m| m != member_id) > 0 {
                project.updated_at = next_timestamp(project.updated_at);
                changed.push(project.id.clone());
            }
        }
        if !changed.is_empty() {
            self.persist();
            for id in &changed {
                self.publish(StudioEvent::new(PROJECT_UPDATED).with_project(id.clone()));
            }
            tracing::info!(member_id, projects = changed.len(), "Pruned member from projects");
        }
        changed.len()
    }

    // -- internals --

    fn insert(&mut self, patch: &ProjectPatch, state: ProjectState) -> Project {
        let id = self.fresh_id();
        let mut project = Project::new(id, patch, self.next_untitled_title(), Utc::now());
        project.state = state;
        self.projects.push(project.clone());

        self.persist();
        self.publish(
            StudioEvent::new(PROJECT_CREATED)
                .with_project(project.id.clone())
                .with_payload(serde_json::json!({
                    "title": project.title,
                    "state": project.state.as_str(),
                })),
        );
        tracing::info!(project_id = %project.id, title = %project.title, "Project created");
        project
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.projects.iter().position(|p| p.id == id)
    }

    fn fresh_id(&self) -> ProjectId {
        loop {
            let id = ids::new_project_id();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    /// `Untitled Project N` with N starting at the collection size plus one
    /// and bumped past any title already in use.
    fn next_untitled_title(&self) -> String {
        let mut n = self.projects.len() + 1;
        loop {
            let title = untitled_title(n);
            if !self.projects.iter().any(|p| p.title == title) {
                return title;
            }
            n += 1;
        }
    }

    fn persist(&self) -> bool {
        collection::persist(&self.storage, PROJECTS_KEY, &self.projects, self.events.as_ref())
    }

    fn publish(&self, event: StudioEvent) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }

    fn publish_state_change(&self, id: &str, from: ProjectState, to: ProjectState) {
        tracing::info!(project_id = %id, from = %from, to = %to, "Project state changed");
        self.publish(
            StudioEvent::new(PROJECT_STATE_CHANGED)
                .with_project(id)
                .with_payload(serde_json::json!({
                    "from": from.as_str(),
                    "to": to.as_str(),
                })),
        );
    }
}

impl<S: KeyValueStorage> ProjectRepository for ProjectStore<S> {
    fn get(&self, id: &str) -> Option<&Project> {
        ProjectStore::get(self, id)
    }

    fn save(&mut self, draft: &ProjectDraft) -> Project {
        ProjectStore::save(self, draft)
    }
}

/// `updatedAt` never moves backwards, even if the wall clock does.
fn next_timestamp(previous: Timestamp) -> Timestamp {
    Utc::now().max(previous)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
