//! Read-only summary of a committed project for the overview renderer.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::lifecycle::ProjectState;
use crate::project::{Project, PublishMode, Visibility};
use crate::roles::ProductionRole;
use crate::types::{MemberId, ProjectId, Timestamp};
use crate::validation::parse_schedule_time;

/// When and how the project will be published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PublishPlan {
    /// Scheduled for a date and time. `at` is `None` if the time did not parse.
    Scheduled {
        date: NaiveDate,
        time: String,
        at: Option<NaiveDateTime>,
    },
    /// To be uploaded manually right away.
    UploadNow,
    /// Nothing chosen yet.
    Undecided,
}

/// One member of the project roster with the roles they hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub member_id: MemberId,
    pub roles: Vec<ProductionRole>,
}

/// Flattened view of a project for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectOverview {
    pub id: ProjectId,
    pub title: String,
    pub state: ProjectState,
    pub video_title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub visibility: Visibility,
    pub publish: PublishPlan,
    pub scene_count: usize,
    pub shot_count: usize,
    pub storyboard_count: usize,
    pub roster: Vec<RosterEntry>,
    pub updated_at: Timestamp,
}

impl ProjectOverview {
    pub fn from_project(project: &Project) -> Self {
        let assignments = &project.team_assignments;
        let roster = assignments
            .assigned_members()
            .into_iter()
            .map(|member_id| RosterEntry {
                roles: assignments.roles_for_member(&member_id),
                member_id,
            })
            .collect();

        Self {
            id: project.id.clone(),
            title: project.title.clone(),
            state: project.state,
            video_title: project.metadata.title.clone(),
            description: project.metadata.description.clone(),
            tags: project.metadata.tags.clone(),
            category: project.metadata.category.clone(),
            visibility: project.metadata.visibility,
            publish: publish_plan(project),
            scene_count: project.scenes.len(),
            shot_count: project.shot_count(),
            storyboard_count: project.storyboard_files.len(),
            roster,
            updated_at: project.updated_at,
        }
    }
}

fn publish_plan(project: &Project) -> PublishPlan {
    if project.selected_mode == PublishMode::Upload && project.upload_now {
        return PublishPlan::UploadNow;
    }
    match (project.scheduled_date, project.scheduled_time.as_deref()) {
        (Some(date), Some(time)) if !time.trim().is_empty() => PublishPlan::Scheduled {
            date,
            time: time.to_string(),
            at: parse_schedule_time(time).ok().map(|t| date.and_time(t)),
        },
        _ if project.upload_now => PublishPlan::UploadNow,
        _ => PublishPlan::Undecided,
    }
}
