//! Video project entity, partial updates and the wizard draft.
//!
//! [`Project`] is the committed record owned by the project store.
//! [`ProjectPatch`] carries the partial updates that wizard steps submit.
//! [`ProjectDraft`] is the unsaved, in-memory copy the authoring wizard edits.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids;
use crate::lifecycle::ProjectState;
use crate::roles::{ProductionRole, TeamAssignments, TeamAssignmentsPatch};
use crate::types::{ProjectId, SceneId, ShotId, Timestamp};

/// Prefix of the title generated for projects created without one.
pub const UNTITLED_PREFIX: &str = "Untitled Project";

/// Build the generated title for the `n`th untitled project.
pub fn untitled_title(n: usize) -> String {
    format!("{UNTITLED_PREFIX} {n}")
}

// ---------------------------------------------------------------------------
// Storyboard files
// ---------------------------------------------------------------------------

/// A storyboard file attached to a project.
///
/// Only the descriptive fields are persisted. The file content is a live
/// handle held while authoring and is gone after a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardFile {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Milliseconds since the Unix epoch.
    pub last_modified: i64,
    #[serde(skip)]
    pub content: Option<Vec<u8>>,
}

impl StoryboardFile {
    pub fn new(
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        last_modified: i64,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            last_modified,
            content: None,
        }
    }

    pub fn with_content(mut self, content: Vec<u8>) -> Self {
        self.content = Some(content);
        self
    }

    /// Whether the live file content is still available.
    pub fn is_loaded(&self) -> bool {
        self.content.is_some()
    }

    /// Copy of the descriptive fields only, as they survive persistence.
    pub fn descriptor(&self) -> Self {
        Self {
            content: None,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Scenes and shots
// ---------------------------------------------------------------------------

/// A single shot within a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shot {
    pub id: ShotId,
    #[serde(default)]
    pub description: String,
    /// Camera from the equipment catalog.
    #[serde(default)]
    pub camera_id: Option<String>,
    /// Lens from the equipment catalog.
    #[serde(default)]
    pub lens_id: Option<String>,
}

/// A tagged group of shots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: SceneId,
    pub name: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub shots: Vec<Shot>,
}

impl Scene {
    pub fn new(id: SceneId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tags: BTreeSet::new(),
            shots: Vec::new(),
        }
    }

    /// Append a shot with a fresh id unique within this scene.
    pub fn add_shot(&mut self, description: impl Into<String>) -> ShotId {
        let id = ids::unique_short_id(|candidate| self.shot(candidate).is_some());
        self.shots.push(Shot {
            id: id.clone(),
            description: description.into(),
            camera_id: None,
            lens_id: None,
        });
        id
    }

    pub fn shot(&self, id: &str) -> Option<&Shot> {
        self.shots.iter().find(|s| s.id == id)
    }

    pub fn shot_mut(&mut self, id: &str) -> Option<&mut Shot> {
        self.shots.iter_mut().find(|s| s.id == id)
    }

    /// Remove a shot. Returns `false` if no shot has that id.
    pub fn remove_shot(&mut self, id: &str) -> bool {
        let before = self.shots.len();
        self.shots.retain(|s| s.id != id);
        self.shots.len() != before
    }

    /// Add a trimmed, non-empty tag. Returns `true` if it was not present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        !tag.is_empty() && self.tags.insert(tag.to_string())
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.tags.remove(tag.trim())
    }
}

// ---------------------------------------------------------------------------
// Publishing metadata
// ---------------------------------------------------------------------------

/// Visibility of the published video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Unlisted,
    #[default]
    Private,
}

/// How the project will be published once authoring finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishMode {
    /// Publish at the scheduled date and time.
    #[default]
    Schedule,
    /// Upload manually right away through the video-hosting studio.
    Upload,
}

/// Video metadata entered on the schedule step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub visibility: Visibility,
}

impl Metadata {
    /// Append a trimmed tag unless it is blank or already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag.trim());
        self.tags.len() != before
    }
}

/// Partial update to [`Metadata`]. `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    /// `Some(None)` clears the category.
    pub category: Option<Option<String>>,
    pub visibility: Option<Visibility>,
}

impl MetadataPatch {
    /// A patch that overwrites every metadata field.
    pub fn replace_all(metadata: &Metadata) -> Self {
        Self {
            title: Some(metadata.title.clone()),
            description: Some(metadata.description.clone()),
            tags: Some(metadata.tags.clone()),
            category: Some(metadata.category.clone()),
            visibility: Some(metadata.visibility),
        }
    }

    pub fn apply(&self, target: &mut Metadata) {
        if let Some(title) = &self.title {
            target.title = title.clone();
        }
        if let Some(description) = &self.description {
            target.description = description.clone();
        }
        if let Some(tags) = &self.tags {
            target.tags = tags.clone();
        }
        if let Some(category) = &self.category {
            target.category = category.clone();
        }
        if let Some(visibility) = self.visibility {
            target.visibility = visibility;
        }
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A committed video project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub ideas: String,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub storyboard_files: Vec<StoryboardFile>,
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub team_assignments: TeamAssignments,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    /// Wall-clock time as entered, e.g. `"10:00 AM"`.
    #[serde(default)]
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub upload_now: bool,
    #[serde(default)]
    pub selected_mode: PublishMode,
    #[serde(default)]
    pub state: ProjectState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Build a new record from defaults, then apply `patch` on top.
    ///
    /// A blank title after the patch is replaced with `fallback_title`.
    /// The state always starts at [`ProjectState::Planning`].
    pub fn new(
        id: ProjectId,
        patch: &ProjectPatch,
        fallback_title: String,
        now: Timestamp,
    ) -> Self {
        let mut project = Self {
            id,
            title: String::new(),
            ideas: String::new(),
            script: String::new(),
            storyboard_files: Vec::new(),
            scenes: Vec::new(),
            team_assignments: TeamAssignments::default(),
            metadata: Metadata::default(),
            scheduled_date: None,
            scheduled_time: None,
            upload_now: false,
            selected_mode: PublishMode::default(),
            state: ProjectState::Planning,
            created_at: now,
            updated_at: now,
        };
        patch.apply(&mut project);
        if project.title.trim().is_empty() {
            project.title = fallback_title;
        }
        project.state = ProjectState::Planning;
        project
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    /// Total number of shots across all scenes.
    pub fn shot_count(&self) -> usize {
        self.scenes.iter().map(|s| s.shots.len()).sum()
    }
}

/// Partial update to a [`Project`].
///
/// Top-level fields are replaced when present. Metadata and team
/// assignments merge key by key. Identity and timestamps are not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub ideas: Option<String>,
    pub script: Option<String>,
    pub storyboard_files: Option<Vec<StoryboardFile>>,
    pub scenes: Option<Vec<Scene>>,
    pub team_assignments: Option<TeamAssignmentsPatch>,
    pub metadata: Option<MetadataPatch>,
    pub scheduled_date: Option<Option<NaiveDate>>,
    pub scheduled_time: Option<Option<String>>,
    pub upload_now: Option<bool>,
    pub selected_mode: Option<PublishMode>,
    pub state: Option<ProjectState>,
}

impl ProjectPatch {
    pub fn apply(&self, target: &mut Project) {
        if let Some(title) = &self.title {
            target.title = title.clone();
        }
        if let Some(ideas) = &self.ideas {
            target.ideas = ideas.clone();
        }
        if let Some(script) = &self.script {
            target.script = script.clone();
        }
        if let Some(files) = &self.storyboard_files {
            target.storyboard_files = files.clone();
        }
        if let Some(scenes) = &self.scenes {
            target.scenes = scenes.clone();
        }
        if let Some(assignments) = &self.team_assignments {
            assignments.apply(&mut target.team_assignments);
        }
        if let Some(metadata) = &self.metadata {
            metadata.apply(&mut target.metadata);
        }
        if let Some(date) = self.scheduled_date {
            target.scheduled_date = date;
        }
        if let Some(time) = &self.scheduled_time {
            target.scheduled_time = time.clone();
        }
        if let Some(upload_now) = self.upload_now {
            target.upload_now = upload_now;
        }
        if let Some(mode) = self.selected_mode {
            target.selected_mode = mode;
        }
        if let Some(state) = self.state {
            target.state = state;
        }
    }
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// Unsaved project data held by the authoring wizard.
///
/// Mirrors [`Project`] field for field, except that the id is absent until
/// the first save and the timestamps are left to the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDraft {
    pub id: Option<ProjectId>,
    pub title: String,
    pub ideas: String,
    pub script: String,
    pub storyboard_files: Vec<StoryboardFile>,
    pub scenes: Vec<Scene>,
    pub team_assignments: TeamAssignments,
    pub metadata: Metadata,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<String>,
    pub upload_now: bool,
    pub selected_mode: PublishMode,
    pub state: ProjectState,
}

impl ProjectDraft {
    /// Load a committed project for editing.
    ///
    /// Storyboard files come back as descriptors only.
    pub fn from_project(project: &Project) -> Self {
        Self {
            id: Some(project.id.clone()),
            title: project.title.clone(),
            ideas: project.ideas.clone(),
            script: project.script.clone(),
            storyboard_files: project
                .storyboard_files
                .iter()
                .map(StoryboardFile::descriptor)
                .collect(),
            scenes: project.scenes.clone(),
            team_assignments: project.team_assignments.clone(),
            metadata: project.metadata.clone(),
            scheduled_date: project.scheduled_date,
            scheduled_time: project.scheduled_time.clone(),
            upload_now: project.upload_now,
            selected_mode: project.selected_mode,
            state: project.state,
        }
    }

    /// A patch that writes every field of the draft.
    pub fn to_patch(&self) -> ProjectPatch {
        ProjectPatch {
            title: Some(self.title.clone()),
            ideas: Some(self.ideas.clone()),
            script: Some(self.script.clone()),
            storyboard_files: Some(self.storyboard_files.clone()),
            scenes: Some(self.scenes.clone()),
            team_assignments: Some(TeamAssignmentsPatch::replace_all(&self.team_assignments)),
            metadata: Some(MetadataPatch::replace_all(&self.metadata)),
            scheduled_date: Some(self.scheduled_date),
            scheduled_time: Some(self.scheduled_time.clone()),
            upload_now: Some(self.upload_now),
            selected_mode: Some(self.selected_mode),
            state: Some(self.state),
        }
    }

    // -- plan step editors --

    pub fn add_storyboard_file(&mut self, file: StoryboardFile) {
        self.storyboard_files.push(file);
    }

    /// Remove every storyboard file named `name`.
    pub fn remove_storyboard_file(&mut self, name: &str) -> bool {
        let before = self.storyboard_files.len();
        self.storyboard_files.retain(|f| f.name != name);
        self.storyboard_files.len() != before
    }

    /// Append a scene with a fresh id unique within this project.
    pub fn add_scene(&mut self, name: impl Into<String>) -> SceneId {
        let id = ids::unique_short_id(|candidate| self.scene(candidate).is_some());
        self.scenes.push(Scene::new(id.clone(), name));
        id
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    pub fn scene_mut(&mut self, id: &str) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.id == id)
    }

    pub fn remove_scene(&mut self, id: &str) -> bool {
        let before = self.scenes.len();
        self.scenes.retain(|s| s.id != id);
        self.scenes.len() != before
    }

    /// Toggle a member in a role. Returns `true` if the member now holds it.
    pub fn toggle_role(&mut self, role: ProductionRole, member: &str) -> bool {
        self.team_assignments.toggle(role, member)
    }

    // -- schedule step editors --

    pub fn set_schedule(&mut self, date: NaiveDate, time: impl Into<String>) {
        self.scheduled_date = Some(date);
        self.scheduled_time = Some(time.into());
    }

    pub fn clear_schedule(&mut self) {
        self.scheduled_date = None;
        self.scheduled_time = None;
    }

    /// Select the publishing mode, keeping the upload-now flag in step.
    pub fn select_mode(&mut self, mode: PublishMode) {
        self.selected_mode = mode;
        self.upload_now = mode == PublishMode::Upload;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn project_with(patch: &ProjectPatch) -> Project {
        Project::new(
            ids::new_project_id(),
            patch,
            untitled_title(1),
            Utc::now(),
        )
    }

    // -- Project::new --

    #[test]
    fn new_project_fills_defaults() {
        let project = project_with(&ProjectPatch::default());
        assert_eq!(project.title, "Untitled Project 1");
        assert_eq!(project.state, ProjectState::Planning);
        assert_eq!(project.metadata, Metadata::default());
        assert!(!project.team_assignments.has_any_assignment());
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn new_project_keeps_given_title() {
        let project = project_with(&ProjectPatch {
            title: Some("Launch vlog".into()),
            ..Default::default()
        });
        assert_eq!(project.title, "Launch vlog");
    }

    #[test]
    fn blank_title_falls_back() {
        let project = project_with(&ProjectPatch {
            title: Some("   ".into()),
            ..Default::default()
        });
        assert_eq!(project.title, "Untitled Project 1");
    }

    #[test]
    fn new_project_ignores_requested_state() {
        let project = project_with(&ProjectPatch {
            state: Some(ProjectState::Uploaded),
            ..Default::default()
        });
        assert_eq!(project.state, ProjectState::Planning);
    }

    // -- patches --

    #[test]
    fn metadata_patch_keeps_unspecified_keys() {
        let mut project = project_with(&ProjectPatch::default());
        project.metadata.description = "Desc".into();
        project.metadata.tags = vec!["tech".into()];

        ProjectPatch {
            metadata: Some(MetadataPatch {
                title: Some("X".into()),
                ..Default::default()
            }),
            ..Default::default()
        }
        .apply(&mut project);

        assert_eq!(project.metadata.title, "X");
        assert_eq!(project.metadata.description, "Desc");
        assert_eq!(project.metadata.tags, vec!["tech".to_string()]);
    }

    #[test]
    fn category_can_be_cleared() {
        let mut metadata = Metadata {
            category: Some("Education".into()),
            ..Default::default()
        };
        MetadataPatch {
            category: Some(None),
            ..Default::default()
        }
        .apply(&mut metadata);
        assert_eq!(metadata.category, None);
    }

    // -- draft --

    #[test]
    fn draft_round_trips_through_patch() {
        let mut draft = ProjectDraft {
            title: "Demo".into(),
            ideas: "A walk through the workshop".into(),
            ..Default::default()
        };
        let scene = draft.add_scene("Intro");
        draft.scene_mut(&scene).unwrap().add_shot("Wide establishing");
        draft.toggle_role(ProductionRole::Director, "m1");
        draft.metadata.title = "Demo".into();
        draft.set_schedule(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), "10:00 AM");

        let project = project_with(&draft.to_patch());
        let reloaded = ProjectDraft::from_project(&project);

        assert_eq!(reloaded.id.as_deref(), Some(project.id.as_str()));
        assert_eq!(
            ProjectDraft {
                id: None,
                ..reloaded
            },
            draft
        );
    }

    #[test]
    fn draft_from_project_drops_file_content() {
        let mut project = project_with(&ProjectPatch::default());
        project.storyboard_files.push(
            StoryboardFile::new("board.png", 2048, "image/png", 1_700_000_000_000)
                .with_content(vec![1, 2, 3]),
        );

        let draft = ProjectDraft::from_project(&project);
        assert!(!draft.storyboard_files[0].is_loaded());
        assert_eq!(draft.storyboard_files[0].name, "board.png");
    }

    #[test]
    fn scene_ids_are_unique_within_project() {
        let mut draft = ProjectDraft::default();
        let ids: BTreeSet<_> = (0..50).map(|i| draft.add_scene(format!("Scene {i}"))).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn shot_ids_are_unique_within_scene() {
        let mut scene = Scene::new("s1".into(), "Intro");
        let ids: BTreeSet<_> = (0..50).map(|i| scene.add_shot(format!("Shot {i}"))).collect();
        assert_eq!(ids.len(), 50);
        assert_eq!(scene.shots.len(), 50);
    }

    #[test]
    fn remove_scene_and_shot() {
        let mut draft = ProjectDraft::default();
        let scene_id = draft.add_scene("Intro");
        let shot_id = draft.scene_mut(&scene_id).unwrap().add_shot("Close-up");

        assert!(draft.scene_mut(&scene_id).unwrap().remove_shot(&shot_id));
        assert!(!draft.scene_mut(&scene_id).unwrap().remove_shot(&shot_id));
        assert!(draft.remove_scene(&scene_id));
        assert!(draft.scenes.is_empty());
    }

    #[test]
    fn scene_tags_are_trimmed_and_unique() {
        let mut scene = Scene::new("s1".into(), "Intro");
        assert!(scene.add_tag(" outdoor "));
        assert!(!scene.add_tag("outdoor"));
        assert!(!scene.add_tag("  "));
        assert!(scene.remove_tag("outdoor"));
        assert!(scene.tags.is_empty());
    }

    #[test]
    fn metadata_tags_keep_insertion_order() {
        let mut metadata = Metadata::default();
        assert!(metadata.add_tag("rust"));
        assert!(metadata.add_tag("tutorial"));
        assert!(!metadata.add_tag("rust"));
        assert_eq!(metadata.tags, vec!["rust".to_string(), "tutorial".to_string()]);
        assert!(metadata.remove_tag("rust"));
        assert_eq!(metadata.tags, vec!["tutorial".to_string()]);
    }

    #[test]
    fn select_mode_syncs_upload_flag() {
        let mut draft = ProjectDraft::default();
        draft.select_mode(PublishMode::Upload);
        assert!(draft.upload_now);
        draft.select_mode(PublishMode::Schedule);
        assert!(!draft.upload_now);
    }

    #[test]
    fn remove_storyboard_file_by_name() {
        let mut draft = ProjectDraft::default();
        draft.add_storyboard_file(StoryboardFile::new("a.png", 1, "image/png", 0));
        draft.add_storyboard_file(StoryboardFile::new("b.png", 1, "image/png", 0));
        assert!(draft.remove_storyboard_file("a.png"));
        assert!(!draft.remove_storyboard_file("a.png"));
        assert_eq!(draft.storyboard_files.len(), 1);
    }

    // -- serialization --

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut project = project_with(&ProjectPatch::default());
        project
            .storyboard_files
            .push(StoryboardFile::new("board.png", 10, "image/png", 5).with_content(vec![9]));
        let value = serde_json::to_value(&project).unwrap();

        for key in [
            "id",
            "title",
            "storyboardFiles",
            "teamAssignments",
            "scheduledDate",
            "scheduledTime",
            "uploadNow",
            "selectedMode",
            "state",
            "createdAt",
            "updatedAt",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }

        let file = &value["storyboardFiles"][0];
        assert_eq!(file["type"], "image/png");
        assert_eq!(file["lastModified"], 5);
        assert!(file.get("content").is_none());
        assert_eq!(value["selectedMode"], "schedule");
        assert_eq!(value["state"], "Planning");
    }
}
