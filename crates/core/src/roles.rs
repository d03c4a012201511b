//! Production roles and per-project team assignments.
//!
//! A project assigns team members to eight fixed production roles. A member
//! may hold any number of roles. [`TeamAssignments`] always carries all eight
//! role sets; a role nobody holds is an empty set, never a missing key.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::MemberId;

// ---------------------------------------------------------------------------
// Production role
// ---------------------------------------------------------------------------

/// The eight fixed production responsibilities on a video project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductionRole {
    Scriptwriter,
    StoryboardArtist,
    Researcher,
    Director,
    VideoEditor,
    ThumbnailDesigner,
    Videographer,
    InsightsLead,
}

impl ProductionRole {
    /// Every role, in display order.
    pub const ALL: [ProductionRole; 8] = [
        Self::Scriptwriter,
        Self::StoryboardArtist,
        Self::Researcher,
        Self::Director,
        Self::VideoEditor,
        Self::ThumbnailDesigner,
        Self::Videographer,
        Self::InsightsLead,
    ];

    /// Persisted key of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scriptwriter => "scriptwriter",
            Self::StoryboardArtist => "storyboardArtist",
            Self::Researcher => "researcher",
            Self::Director => "director",
            Self::VideoEditor => "videoEditor",
            Self::ThumbnailDesigner => "thumbnailDesigner",
            Self::Videographer => "videographer",
            Self::InsightsLead => "insightsLead",
        }
    }

    /// Human-readable label for the role.
    pub fn label(self) -> &'static str {
        match self {
            Self::Scriptwriter => "Scriptwriter",
            Self::StoryboardArtist => "Storyboard Artist",
            Self::Researcher => "Researcher",
            Self::Director => "Director",
            Self::VideoEditor => "Video Editor",
            Self::ThumbnailDesigner => "Thumbnail Designer",
            Self::Videographer => "Videographer",
            Self::InsightsLead => "Insights Lead",
        }
    }

    /// Parse either the persisted key or the display label.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s || role.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::Validation(format!("Unknown production role '{s}'")))
    }
}

impl fmt::Display for ProductionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Team assignments
// ---------------------------------------------------------------------------

/// Member ids assigned to each production role on one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamAssignments {
    pub scriptwriter: BTreeSet<MemberId>,
    pub storyboard_artist: BTreeSet<MemberId>,
    pub researcher: BTreeSet<MemberId>,
    pub director: BTreeSet<MemberId>,
    pub video_editor: BTreeSet<MemberId>,
    pub thumbnail_designer: BTreeSet<MemberId>,
    pub videographer: BTreeSet<MemberId>,
    pub insights_lead: BTreeSet<MemberId>,
}

impl TeamAssignments {
    /// Members currently holding `role`.
    pub fn members_for_role(&self, role: ProductionRole) -> &BTreeSet<MemberId> {
        match role {
            ProductionRole::Scriptwriter => &self.scriptwriter,
            ProductionRole::StoryboardArtist => &self.storyboard_artist,
            ProductionRole::Researcher => &self.researcher,
            ProductionRole::Director => &self.director,
            ProductionRole::VideoEditor => &self.video_editor,
            ProductionRole::ThumbnailDesigner => &self.thumbnail_designer,
            ProductionRole::Videographer => &self.videographer,
            ProductionRole::InsightsLead => &self.insights_lead,
        }
    }

    fn members_mut(&mut self, role: ProductionRole) -> &mut BTreeSet<MemberId> {
        match role {
            ProductionRole::Scriptwriter => &mut self.scriptwriter,
            ProductionRole::StoryboardArtist => &mut self.storyboard_artist,
            ProductionRole::Researcher => &mut self.researcher,
            ProductionRole::Director => &mut self.director,
            ProductionRole::VideoEditor => &mut self.video_editor,
            ProductionRole::ThumbnailDesigner => &mut self.thumbnail_designer,
            ProductionRole::Videographer => &mut self.videographer,
            ProductionRole::InsightsLead => &mut self.insights_lead,
        }
    }

    /// Iterate over all eight roles with their member sets.
    pub fn iter(&self) -> impl Iterator<Item = (ProductionRole, &BTreeSet<MemberId>)> {
        ProductionRole::ALL
            .into_iter()
            .map(move |role| (role, self.members_for_role(role)))
    }

    /// Toggle `member` in `role`. Returns `true` if the member now holds the role.
    pub fn toggle(&mut self, role: ProductionRole, member: &str) -> bool {
        let set = self.members_mut(role);
        if set.remove(member) {
            false
        } else {
            set.insert(member.to_string());
            true
        }
    }

    /// Replace the member set of a single role.
    pub fn set_members(&mut self, role: ProductionRole, members: BTreeSet<MemberId>) {
        *self.members_mut(role) = members;
    }

    /// Whether `member` holds `role`.
    pub fn holds(&self, role: ProductionRole, member: &str) -> bool {
        self.members_for_role(role).contains(member)
    }

    /// Roles held by `member`, in display order.
    pub fn roles_for_member(&self, member: &str) -> Vec<ProductionRole> {
        self.iter()
            .filter(|(_, set)| set.contains(member))
            .map(|(role, _)| role)
            .collect()
    }

    /// Every member holding at least one role.
    pub fn assigned_members(&self) -> BTreeSet<MemberId> {
        self.iter().flat_map(|(_, set)| set.iter().cloned()).collect()
    }

    /// Whether any role has at least one member.
    pub fn has_any_assignment(&self) -> bool {
        self.iter().any(|(_, set)| !set.is_empty())
    }

    /// Drop every assignment whose member `keep` rejects.
    ///
    /// Returns the number of (role, member) pairs removed.
    pub fn prune_members(&mut self, keep: impl Fn(&str) -> bool) -> usize {
        let mut removed = 0;
        for role in ProductionRole::ALL {
            let set = self.members_mut(role);
            let before = set.len();
            set.retain(|m| keep(m.as_str()));
            removed += before - set.len();
        }
        removed
    }
}

/// Partial update to [`TeamAssignments`]: only the listed roles are replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamAssignmentsPatch {
    roles: BTreeMap<ProductionRole, BTreeSet<MemberId>>,
}

impl TeamAssignmentsPatch {
    /// Replace the member set of `role` when this patch is applied.
    pub fn set(mut self, role: ProductionRole, members: BTreeSet<MemberId>) -> Self {
        self.roles.insert(role, members);
        self
    }

    /// A patch that replaces every role with the values in `assignments`.
    pub fn replace_all(assignments: &TeamAssignments) -> Self {
        let roles = assignments
            .iter()
            .map(|(role, set)| (role, set.clone()))
            .collect();
        Self { roles }
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Merge into `target` key by key; roles not in the patch keep their members.
    pub fn apply(&self, target: &mut TeamAssignments) {
        for (role, members) in &self.roles {
            target.set_members(*role, members.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
