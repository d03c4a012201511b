//! The three-step authoring wizard: Plan -> Schedule -> Overview.
//!
//! [`WizardController`] holds an unsaved [`ProjectDraft`] that step editors
//! mutate. Moving from Schedule to Overview is gated by the schedule-step
//! validation; every other move is unconditional and keeps the draft. The
//! project store is only touched by [`save`](WizardController::save) on the
//! plan step and by [`finish`](WizardController::finish) on the overview.

use std::sync::Arc;

use studio_core::lifecycle::ProjectState;
use studio_core::project::{Project, ProjectDraft, PublishMode, StoryboardFile};
use studio_core::roles::ProductionRole;
use studio_core::types::{SceneId, ShotId};
use studio_core::validation::{
    first_section, is_plan_step_meaningful, validate_schedule_step, MissingField,
};
use studio_core::wizard_steps::{validate_step_transition, WizardStep};
use studio_events::{EventBus, Notification};
use studio_store::ProjectRepository;

use crate::error::WizardError;

pub struct WizardController<R> {
    repo: R,
    draft: ProjectDraft,
    step: WizardStep,
    events: Option<Arc<EventBus>>,
}

impl<R: ProjectRepository> WizardController<R> {
    /// Start authoring a new project. Nothing is stored until the first save.
    pub fn new(repo: R) -> Self {
        tracing::debug!("Authoring wizard opened");
        Self {
            repo,
            draft: ProjectDraft::default(),
            step: WizardStep::Plan,
            events: None,
        }
    }

    /// Re-open a stored project at the plan step.
    ///
    /// Storyboard files come back as descriptors without their content.
    pub fn edit(repo: R, id: &str) -> Result<Self, WizardError> {
        let project = repo
            .get(id)
            .ok_or_else(|| WizardError::ProjectNotFound(id.to_string()))?;
        let draft = ProjectDraft::from_project(project);
        tracing::debug!(project_id = %id, "Wizard opened in edit mode");
        Ok(Self {
            repo,
            draft,
            step: WizardStep::Plan,
            events: None,
        })
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    // ---------------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------------

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &ProjectDraft {
        &self.draft
    }

    /// Direct access for step editors.
    pub fn draft_mut(&mut self) -> &mut ProjectDraft {
        &mut self.draft
    }

    /// Id of the stored project, once the draft has been saved.
    pub fn project_id(&self) -> Option<&str> {
        self.draft.id.as_deref()
    }

    /// Whether save is offered: on the plan step with something worth keeping.
    pub fn can_save(&self) -> bool {
        self.step == WizardStep::Plan && is_plan_step_meaningful(&self.draft)
    }

    /// Schedule-step fields still missing, in display order.
    pub fn missing_fields(&self) -> Vec<MissingField> {
        validate_schedule_step(&self.draft)
    }

    // ---------------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------------

    /// Advance one step.
    ///
    /// Leaving the schedule step requires a title, a description, and
    /// either a date and time or an immediate upload.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let Some(next) = self.step.next() else {
            return Err(WizardError::NotAvailable {
                action: "advance",
                step: self.step,
            });
        };
        validate_step_transition(self.step, next)?;

        if self.step == WizardStep::Schedule {
            self.check_schedule_step()?;
        }

        tracing::debug!(from_step = %self.step, to_step = %next, "Wizard advanced");
        self.step = next;
        Ok(next)
    }

    /// Go back one step. The draft is kept as is.
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let Some(previous) = self.step.previous() else {
            return Err(WizardError::NotAvailable {
                action: "go back",
                step: self.step,
            });
        };
        validate_step_transition(self.step, previous)?;

        tracing::debug!(from_step = %self.step, to_step = %previous, "Wizard went back");
        self.step = previous;
        Ok(previous)
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Save the plan without advancing. The stored state is forced to
    /// `Planning`.
    pub fn save(&mut self) -> Result<Project, WizardError> {
        if self.step != WizardStep::Plan {
            return Err(WizardError::NotAvailable {
                action: "save",
                step: self.step,
            });
        }
        if !is_plan_step_meaningful(&self.draft) {
            return Err(WizardError::NothingToSave);
        }

        self.draft.state = ProjectState::Planning;
        let project = self.commit();
        self.notify(Notification::success(
            "Project saved",
            format!("'{}' was saved", project.title),
        ));
        Ok(project)
    }

    /// Commit the draft from the overview step.
    ///
    /// The stored state becomes `Production` for an immediate upload and
    /// `Scheduled` otherwise, which the schedule gate only lets through with
    /// a date and time. `Uploaded` is never set here.
    pub fn finish(&mut self) -> Result<Project, WizardError> {
        if !self.step.is_final() {
            return Err(WizardError::NotAvailable {
                action: "finish",
                step: self.step,
            });
        }
        self.check_schedule_step()?;

        self.draft.state = if self.draft.upload_now {
            ProjectState::Production
        } else {
            ProjectState::Scheduled
        };
        let project = self.commit();
        tracing::info!(
            project_id = %project.id,
            state = %project.state,
            "Wizard finished"
        );
        self.notify(Notification::success(
            "Project ready",
            format!("'{}' is now {}", project.title, project.state),
        ));
        Ok(project)
    }

    /// Abandon the wizard. Unsaved changes are discarded.
    pub fn close(self) {
        tracing::debug!(
            project_id = ?self.draft.id,
            step = %self.step,
            "Wizard closed, draft discarded"
        );
    }

    // ---------------------------------------------------------------------------
    // Plan step editors
    // ---------------------------------------------------------------------------

    pub fn add_storyboard_file(&mut self, file: StoryboardFile) {
        self.draft.add_storyboard_file(file);
    }

    pub fn remove_storyboard_file(&mut self, name: &str) -> bool {
        self.draft.remove_storyboard_file(name)
    }

    pub fn add_scene(&mut self, name: impl Into<String>) -> SceneId {
        self.draft.add_scene(name)
    }

    pub fn rename_scene(&mut self, scene_id: &str, name: impl Into<String>) -> bool {
        match self.draft.scene_mut(scene_id) {
            Some(scene) => {
                scene.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn remove_scene(&mut self, scene_id: &str) -> bool {
        self.draft.remove_scene(scene_id)
    }

    pub fn tag_scene(&mut self, scene_id: &str, tag: &str) -> bool {
        self.draft
            .scene_mut(scene_id)
            .is_some_and(|scene| scene.add_tag(tag))
    }

    pub fn untag_scene(&mut self, scene_id: &str, tag: &str) -> bool {
        self.draft
            .scene_mut(scene_id)
            .is_some_and(|scene| scene.remove_tag(tag))
    }

    /// Append a shot to a scene. `None` if the scene does not exist.
    pub fn add_shot(&mut self, scene_id: &str, description: impl Into<String>) -> Option<ShotId> {
        self.draft
            .scene_mut(scene_id)
            .map(|scene| scene.add_shot(description))
    }

    pub fn remove_shot(&mut self, scene_id: &str, shot_id: &str) -> bool {
        self.draft
            .scene_mut(scene_id)
            .is_some_and(|scene| scene.remove_shot(shot_id))
    }

    /// Set the catalog camera and lens of a shot.
    pub fn attach_equipment(
        &mut self,
        scene_id: &str,
        shot_id: &str,
        camera_id: Option<String>,
        lens_id: Option<String>,
    ) -> bool {
        let Some(shot) = self
            .draft
            .scene_mut(scene_id)
            .and_then(|scene| scene.shot_mut(shot_id))
        else {
            return false;
        };
        shot.camera_id = camera_id;
        shot.lens_id = lens_id;
        true
    }

    pub fn toggle_role(&mut self, role: ProductionRole, member_id: &str) -> bool {
        self.draft.toggle_role(role, member_id)
    }

    // ---------------------------------------------------------------------------
    // Schedule step editors
    // ---------------------------------------------------------------------------

    pub fn select_mode(&mut self, mode: PublishMode) {
        self.draft.select_mode(mode);
    }

    pub fn add_metadata_tag(&mut self, tag: &str) -> bool {
        self.draft.metadata.add_tag(tag)
    }

    pub fn remove_metadata_tag(&mut self, tag: &str) -> bool {
        self.draft.metadata.remove_tag(tag)
    }

    // ---------------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------------

    fn check_schedule_step(&self) -> Result<(), WizardError> {
        let missing = validate_schedule_step(&self.draft);
        let Some(focus) = first_section(&missing) else {
            return Ok(());
        };
        let error = WizardError::Incomplete { missing, focus };
        tracing::debug!(error = %error, "Schedule step incomplete");
        self.notify(Notification::warning(
            "Missing required fields",
            error.to_string(),
        ));
        Err(error)
    }

    fn commit(&mut self) -> Project {
        let project = self.repo.save(&self.draft);
        self.draft.id = Some(project.id.clone());
        // Keep a generated title so later saves do not blank it.
        self.draft.title.clone_from(&project.title);
        tracing::info!(project_id = %project.id, state = %project.state, "Draft committed");
        project
    }

    fn notify(&self, notification: Notification) {
        if let Some(bus) = &self.events {
            bus.notify(notification);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use studio_core::validation::WizardSection;
    use studio_store::{MemoryStorage, ProjectStore};

    fn store() -> ProjectStore<MemoryStorage> {
        ProjectStore::open(MemoryStorage::new(), None)
    }

    fn fill_details(wizard: &mut WizardController<&mut ProjectStore<MemoryStorage>>) {
        let draft = wizard.draft_mut();
        draft.metadata.title = "Title".into();
        draft.metadata.description = "Description".into();
    }

    // -- navigation --

    #[test]
    fn plan_to_schedule_is_unconditional() {
        let mut store = store();
        let mut wizard = WizardController::new(&mut store);
        assert_eq!(wizard.next().unwrap(), WizardStep::Schedule);
    }

    #[test]
    fn schedule_gate_reports_missing_fields_in_order() {
        let mut store = store();
        let mut wizard = WizardController::new(&mut store);
        wizard.next().unwrap();

        assert_matches!(
            wizard.next(),
            Err(WizardError::Incomplete { missing, focus: WizardSection::Details })
                if missing == vec![
                    MissingField::Title,
                    MissingField::Description,
                    MissingField::Schedule,
                ]
        );
        assert_eq!(wizard.step(), WizardStep::Schedule);
    }

    #[test]
    fn schedule_gate_focuses_publishing_when_only_schedule_missing() {
        let mut store = store();
        let mut wizard = WizardController::new(&mut store);
        wizard.next().unwrap();
        fill_details(&mut wizard);

        assert_matches!(
            wizard.next(),
            Err(WizardError::Incomplete { focus: WizardSection::Publishing, .. })
        );
    }

    #[test]
    fn upload_now_satisfies_schedule() {
        let mut store = store();
        let mut wizard = WizardController::new(&mut store);
        wizard.next().unwrap();
        fill_details(&mut wizard);
        wizard.select_mode(PublishMode::Upload);

        assert_eq!(wizard.next().unwrap(), WizardStep::Overview);
    }

    #[test]
    fn back_keeps_draft() {
        let mut store = store();
        let mut wizard = WizardController::new(&mut store);
        wizard.draft_mut().ideas = "Keep me".into();
        wizard.next().unwrap();

        assert_eq!(wizard.back().unwrap(), WizardStep::Plan);
        assert_eq!(wizard.draft().ideas, "Keep me");
        assert_matches!(
            wizard.back(),
            Err(WizardError::NotAvailable { action: "go back", step: WizardStep::Plan })
        );
    }

    #[test]
    fn overview_cannot_advance() {
        let mut store = store();
        let mut wizard = WizardController::new(&mut store);
        wizard.next().unwrap();
        fill_details(&mut wizard);
        wizard.select_mode(PublishMode::Upload);
        wizard.next().unwrap();

        assert_matches!(wizard.next(), Err(WizardError::NotAvailable { .. }));
    }

    // -- save --

    #[test]
    fn empty_plan_cannot_be_saved() {
        let mut store = store();
        let mut wizard = WizardController::new(&mut store);
        assert!(!wizard.can_save());
        assert_matches!(wizard.save(), Err(WizardError::NothingToSave));
    }

    #[test]
    fn save_only_on_plan_step() {
        let mut store = store();
        let mut wizard = WizardController::new(&mut store);
        wizard.draft_mut().ideas = "x".into();
        wizard.next().unwrap();
        assert!(!wizard.can_save());
        assert_matches!(
            wizard.save(),
            Err(WizardError::NotAvailable { action: "save", .. })
        );
    }

    #[test]
    fn save_twice_updates_the_same_project() {
        let mut store = store();
        let id = {
            let mut wizard = WizardController::new(&mut store);
            wizard.draft_mut().title = "Vlog".into();
            let first = wizard.save().unwrap();
            wizard.draft_mut().script = "Line".into();
            let second = wizard.save().unwrap();
            assert_eq!(first.id, second.id);
            second.id
        };
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().script, "Line");
    }

    #[test]
    fn finish_only_from_overview() {
        let mut store = store();
        let mut wizard = WizardController::new(&mut store);
        assert_matches!(
            wizard.finish(),
            Err(WizardError::NotAvailable { action: "finish", .. })
        );
    }

    #[test]
    fn finish_revalidates_edits_made_on_overview() {
        let mut store = store();
        let mut wizard = WizardController::new(&mut store);
        wizard.next().unwrap();
        fill_details(&mut wizard);
        wizard
            .draft_mut()
            .set_schedule(NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(), "09:00 AM");
        wizard.next().unwrap();

        wizard.draft_mut().metadata.description.clear();
        assert_matches!(wizard.finish(), Err(WizardError::Incomplete { .. }));
        assert!(wizard.project_id().is_none());
    }

    #[test]
    fn generated_title_survives_later_commits() {
        let mut store = store();
        let id = {
            let mut wizard = WizardController::new(&mut store);
            wizard.draft_mut().ideas = "Studio tour".into();
            assert_eq!(wizard.save().unwrap().title, "Untitled Project 1");
            assert_eq!(wizard.draft().title, "Untitled Project 1");
            assert_eq!(wizard.save().unwrap().title, "Untitled Project 1");

            wizard.next().unwrap();
            fill_details(&mut wizard);
            wizard.select_mode(PublishMode::Upload);
            wizard.next().unwrap();
            let finished = wizard.finish().unwrap();
            assert_eq!(finished.title, "Untitled Project 1");
            finished.id
        };
        assert_eq!(store.get(&id).unwrap().title, "Untitled Project 1");
    }

    #[test]
    fn upload_flag_without_schedule_is_never_scheduled() {
        let mut store = store();
        let mut wizard = WizardController::new(&mut store);
        wizard.next().unwrap();
        fill_details(&mut wizard);
        wizard.draft_mut().upload_now = true;
        assert_eq!(wizard.draft().selected_mode, PublishMode::Schedule);
        wizard.next().unwrap();

        let project = wizard.finish().unwrap();
        assert_eq!(project.state, ProjectState::Production);
        assert!(project.scheduled_date.is_none());
    }

    // -- editors --

    #[test]
    fn scene_and_shot_editors() {
        let mut store = store();
        let mut wizard = WizardController::new(&mut store);
        let scene = wizard.add_scene("Intro");
        let shot = wizard.add_shot(&scene, "Wide").unwrap();

        assert!(wizard.rename_scene(&scene, "Opening"));
        assert!(wizard.tag_scene(&scene, "outdoor"));
        assert!(wizard.attach_equipment(
            &scene,
            &shot,
            Some("cam-1".into()),
            Some("lens-1".into())
        ));
        assert!(wizard.add_shot("missing", "x").is_none());
        assert!(!wizard.attach_equipment(&scene, "missing", None, None));

        let stored = wizard.draft().scene(&scene).unwrap();
        assert_eq!(stored.name, "Opening");
        assert_eq!(stored.shots[0].camera_id.as_deref(), Some("cam-1"));

        assert!(wizard.remove_shot(&scene, &shot));
        assert!(wizard.untag_scene(&scene, "outdoor"));
        assert!(wizard.remove_scene(&scene));
        assert!(!wizard.rename_scene(&scene, "Gone"));
    }

    #[test]
    fn role_toggled_twice_is_unassigned() {
        let mut store = store();
        let mut wizard = WizardController::new(&mut store);
        assert!(wizard.toggle_role(ProductionRole::Director, "m1"));
        assert!(!wizard.toggle_role(ProductionRole::Director, "m1"));
        assert!(wizard.draft().team_assignments.roles_for_member("m1").is_empty());
    }

    #[test]
    fn incomplete_step_posts_warning() {
        let bus = Arc::new(EventBus::default());
        let mut notes = bus.subscribe_notifications();
        let mut store = store();
        let mut wizard = WizardController::new(&mut store).with_events(bus);
        wizard.next().unwrap();

        assert!(wizard.next().is_err());
        let note = notes.try_recv().unwrap();
        assert_eq!(note.level, studio_events::NotificationLevel::Warning);
        assert!(note.message.contains("title, description, schedule"));
    }
}
