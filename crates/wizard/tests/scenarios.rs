//! End-to-end authoring scenarios.
//!
//! Drives the wizard against a real project store to verify that:
//! - Authoring then scheduling yields "Untitled Project 1" in `Scheduled`
//! - Choosing an immediate upload yields `Production`, never `Uploaded`
//! - Edit mode reloads the stored project at the plan step
//! - Closing the wizard never writes anything

use chrono::NaiveDate;
use studio_core::lifecycle::ProjectState;
use studio_core::project::{PublishMode, StoryboardFile};
use studio_core::roles::ProductionRole;
use studio_core::wizard_steps::WizardStep;
use studio_store::{FileStorage, MemoryStorage, ProjectStore};
use studio_wizard::{WizardController, WizardError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fill_schedule_details<R: studio_store::ProjectRepository>(wizard: &mut WizardController<R>) {
    let draft = wizard.draft_mut();
    draft.metadata.title = "My Video".into();
    draft.metadata.description = "All about it".into();
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn author_then_schedule() {
    let mut store = ProjectStore::open(MemoryStorage::new(), None);
    {
        let mut wizard = WizardController::new(&mut store);
        wizard.draft_mut().ideas = "A day in the studio".into();
        let saved = wizard.save().unwrap();
        assert_eq!(saved.title, "Untitled Project 1");
        assert_eq!(saved.state, ProjectState::Planning);

        wizard.next().unwrap();
        fill_schedule_details(&mut wizard);
        wizard
            .draft_mut()
            .set_schedule(NaiveDate::from_ymd_opt(2026, 11, 15).unwrap(), "10:00 AM");
        assert_eq!(wizard.next().unwrap(), WizardStep::Overview);

        let finished = wizard.finish().unwrap();
        assert_eq!(finished.id, saved.id);
    }

    assert_eq!(store.len(), 1);
    let project = &store.list()[0];
    assert_eq!(project.title, "Untitled Project 1");
    assert_eq!(project.state, ProjectState::Scheduled);
    assert_eq!(project.metadata.title, "My Video");
    assert_eq!(project.metadata.description, "All about it");
    assert_eq!(project.ideas, "A day in the studio");
    assert_eq!(
        project.scheduled_date,
        Some(NaiveDate::from_ymd_opt(2026, 11, 15).unwrap())
    );
    assert_eq!(project.scheduled_time.as_deref(), Some("10:00 AM"));
}

#[test]
fn immediate_upload_goes_to_production() {
    let mut store = ProjectStore::open(MemoryStorage::new(), None);
    let project = {
        let mut wizard = WizardController::new(&mut store);
        wizard.next().unwrap();
        fill_schedule_details(&mut wizard);
        wizard.select_mode(PublishMode::Upload);
        wizard.next().unwrap();
        wizard.finish().unwrap()
    };

    assert_eq!(project.state, ProjectState::Production);
    assert!(project.upload_now);
    assert_eq!(store.stats().count(ProjectState::Uploaded), 0);
}

#[test]
fn edit_mode_reloads_stored_project() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let mut store = ProjectStore::open(FileStorage::open(dir.path()).unwrap(), None);
        let mut wizard = WizardController::new(&mut store);
        wizard.draft_mut().title = "Studio tour".into();
        wizard.add_storyboard_file(
            StoryboardFile::new("frame.jpg", 512, "image/jpeg", 1).with_content(vec![1; 512]),
        );
        wizard.toggle_role(ProductionRole::Videographer, "m7");
        wizard.save().unwrap().id
    };

    let mut store = ProjectStore::open(FileStorage::open(dir.path()).unwrap(), None);
    let wizard = WizardController::edit(&mut store, &id).unwrap();

    assert_eq!(wizard.step(), WizardStep::Plan);
    assert_eq!(wizard.project_id(), Some(id.as_str()));
    assert_eq!(wizard.draft().title, "Studio tour");
    assert_eq!(wizard.draft().storyboard_files[0].name, "frame.jpg");
    assert!(!wizard.draft().storyboard_files[0].is_loaded());
    assert!(wizard
        .draft()
        .team_assignments
        .holds(ProductionRole::Videographer, "m7"));
}

#[test]
fn edit_unknown_project_fails() {
    let mut store = ProjectStore::open(MemoryStorage::new(), None);
    assert!(matches!(
        WizardController::edit(&mut store, "missing"),
        Err(WizardError::ProjectNotFound(id)) if id == "missing"
    ));
}

#[test]
fn closing_discards_the_draft() {
    let mut store = ProjectStore::open(MemoryStorage::new(), None);
    let mut wizard = WizardController::new(&mut store);
    wizard.draft_mut().title = "Never saved".into();
    wizard.next().unwrap();
    wizard.close();

    assert!(store.is_empty());
}

#[test]
fn saving_at_plan_resets_state_to_planning() {
    let mut store = ProjectStore::open(MemoryStorage::new(), None);
    let id = {
        let mut wizard = WizardController::new(&mut store);
        wizard.next().unwrap();
        fill_schedule_details(&mut wizard);
        wizard.select_mode(PublishMode::Upload);
        wizard.next().unwrap();
        wizard.finish().unwrap().id
    };

    let mut wizard = WizardController::edit(&mut store, &id).unwrap();
    wizard.draft_mut().script = "Revised".into();
    let saved = wizard.save().unwrap();

    assert_eq!(saved.id, id);
    assert_eq!(saved.state, ProjectState::Planning);
}
