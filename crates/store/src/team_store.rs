//! Team roster and invites.
//!
//! Persisted independently of projects under `teamMembers` and
//! `teamInvites`, with the same wholesale, best-effort discipline.

use std::sync::Arc;

use chrono::Utc;
use studio_core::error::CoreError;
use studio_core::ids;
use studio_core::team::{
    normalize_email, validate_input, InviteStatus, NewInvite, NewTeamMember, TeamInvite,
    TeamMember,
};
use studio_events::bus::TEAM_CHANGED;
use studio_events::{EventBus, StudioEvent};

use crate::collection::{self, TEAM_INVITES_KEY, TEAM_MEMBERS_KEY};
use crate::storage::KeyValueStorage;

pub struct TeamStore<S> {
    storage: S,
    members: Vec<TeamMember>,
    invites: Vec<TeamInvite>,
    events: Option<Arc<EventBus>>,
}

impl<S: KeyValueStorage> TeamStore<S> {
    pub fn open(storage: S, events: Option<Arc<EventBus>>) -> Self {
        let members: Vec<TeamMember> =
            collection::load(&storage, TEAM_MEMBERS_KEY, events.as_ref());
        let invites: Vec<TeamInvite> =
            collection::load(&storage, TEAM_INVITES_KEY, events.as_ref());
        Self {
            storage,
            members,
            invites,
            events,
        }
    }

    // ---------------------------------------------------------------------------
    // Members
    // ---------------------------------------------------------------------------

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn active_members(&self) -> impl Iterator<Item = &TeamMember> {
        self.members.iter().filter(|m| m.active)
    }

    pub fn member(&self, id: &str) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.member(id).is_some()
    }

    pub fn find_by_email(&self, email: &str) -> Option<&TeamMember> {
        let email = normalize_email(email);
        self.members.iter().find(|m| normalize_email(&m.email) == email)
    }

    /// Add a member after validating the input. Emails must be unique.
    pub fn add_member(&mut self, input: NewTeamMember) -> Result<TeamMember, CoreError> {
        validate_input(&input)?;
        if self.find_by_email(&input.email).is_some() {
            return Err(CoreError::Conflict(format!(
                "A team member with email '{}' already exists",
                input.email
            )));
        }

        let member = TeamMember {
            id: ids::new_record_id(),
            name: input.name.trim().to_string(),
            email: normalize_email(&input.email),
            role: input.role,
            joined_at: Utc::now(),
            active: true,
        };
        self.members.push(member.clone());
        self.persist_members();
        self.publish("member_added", &member.id);
        tracing::info!(member_id = %member.id, role = %member.role, "Team member added");
        Ok(member)
    }

    /// Remove a member. Returns whether anything was removed.
    ///
    /// Project assignments are not touched here; see
    /// `ProjectStore::prune_member`.
    pub fn remove_member(&mut self, id: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.id != id);
        if self.members.len() == before {
            return false;
        }
        self.persist_members();
        self.publish("member_removed", id);
        tracing::info!(member_id = %id, "Team member removed");
        true
    }

    pub fn set_active(&mut self, id: &str, active: bool) -> Option<TeamMember> {
        let member = self.members.iter_mut().find(|m| m.id == id)?;
        member.active = active;
        let member = member.clone();
        self.persist_members();
        self.publish("member_updated", id);
        Some(member)
    }

    // ---------------------------------------------------------------------------
    // Invites
    // ---------------------------------------------------------------------------

    pub fn invites(&self) -> &[TeamInvite] {
        &self.invites
    }

    pub fn pending_invites(&self) -> impl Iterator<Item = &TeamInvite> {
        self.invites
            .iter()
            .filter(|i| i.status == InviteStatus::Pending)
    }

    /// Invite someone by email.
    ///
    /// Fails if the email is invalid, already on the team, or already has a
    /// pending invite.
    pub fn invite(&mut self, input: NewInvite) -> Result<TeamInvite, CoreError> {
        validate_input(&input)?;
        let email = normalize_email(&input.email);
        if self.find_by_email(&email).is_some() {
            return Err(CoreError::Conflict(format!(
                "'{email}' is already on the team"
            )));
        }
        if self.pending_invites().any(|i| i.email == email) {
            return Err(CoreError::Conflict(format!(
                "'{email}' already has a pending invite"
            )));
        }

        let invite = TeamInvite {
            id: ids::new_record_id(),
            email,
            role: input.role,
            invited_at: Utc::now(),
            status: InviteStatus::Pending,
        };
        self.invites.push(invite.clone());
        self.persist_invites();
        tracing::info!(invite_id = %invite.id, role = %invite.role, "Team invite created");
        Ok(invite)
    }

    /// Accept a pending invite, turning it into a team member.
    pub fn accept_invite(&mut self, invite_id: &str, name: &str) -> Result<TeamMember, CoreError> {
        let invite = self.pending_invite(invite_id)?.clone();
        let member = self.add_member(NewTeamMember {
            name: name.to_string(),
            email: invite.email,
            role: invite.role,
        })?;
        self.set_invite_status(invite_id, InviteStatus::Accepted);
        Ok(member)
    }

    pub fn revoke_invite(&mut self, invite_id: &str) -> Result<(), CoreError> {
        self.pending_invite(invite_id)?;
        self.set_invite_status(invite_id, InviteStatus::Revoked);
        tracing::info!(invite_id, "Team invite revoked");
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------------

    fn pending_invite(&self, invite_id: &str) -> Result<&TeamInvite, CoreError> {
        let invite = self
            .invites
            .iter()
            .find(|i| i.id == invite_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "invite",
                id: invite_id.to_string(),
            })?;
        if invite.status != InviteStatus::Pending {
            return Err(CoreError::Conflict(format!(
                "Invite {invite_id} is no longer pending"
            )));
        }
        Ok(invite)
    }

    fn set_invite_status(&mut self, invite_id: &str, status: InviteStatus) {
        if let Some(invite) = self.invites.iter_mut().find(|i| i.id == invite_id) {
            invite.status = status;
            self.persist_invites();
        }
    }

    fn persist_members(&self) -> bool {
        collection::persist(&self.storage, TEAM_MEMBERS_KEY, &self.members, self.events.as_ref())
    }

    fn persist_invites(&self) -> bool {
        collection::persist(&self.storage, TEAM_INVITES_KEY, &self.invites, self.events.as_ref())
    }

    fn publish(&self, change: &str, member_id: &str) {
        if let Some(bus) = &self.events {
            bus.publish(
                StudioEvent::new(TEAM_CHANGED)
                    .with_payload(serde_json::json!({ "change": change, "memberId": member_id })),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use assert_matches::assert_matches;
    use studio_core::roles::ProductionRole;

    fn new_member(name: &str, email: &str) -> NewTeamMember {
        NewTeamMember {
            name: name.into(),
            email: email.into(),
            role: ProductionRole::VideoEditor,
        }
    }

    fn store() -> TeamStore<MemoryStorage> {
        TeamStore::open(MemoryStorage::new(), None)
    }

    // -- members --

    #[test]
    fn add_member_normalizes_email() {
        let mut team = store();
        let member = team.add_member(new_member(" Ada ", "Ada@Example.com")).unwrap();
        assert_eq!(member.name, "Ada");
        assert_eq!(member.email, "ada@example.com");
        assert!(member.active);
        assert_eq!(team.find_by_email("ADA@example.com").unwrap().id, member.id);
    }

    #[test]
    fn duplicate_email_conflicts() {
        let mut team = store();
        team.add_member(new_member("Ada", "ada@example.com")).unwrap();
        assert_matches!(
            team.add_member(new_member("Ada Two", "ada@example.com")),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn invalid_member_is_rejected() {
        let mut team = store();
        assert_matches!(
            team.add_member(new_member("Ada", "nope")),
            Err(CoreError::Validation(_))
        );
        assert!(team.members().is_empty());
    }

    #[test]
    fn remove_and_deactivate() {
        let mut team = store();
        let a = team.add_member(new_member("Ada", "ada@example.com")).unwrap();
        let b = team.add_member(new_member("Bo", "bo@example.com")).unwrap();

        assert!(!team.set_active(&b.id, false).unwrap().active);
        assert_eq!(team.active_members().count(), 1);

        assert!(team.remove_member(&a.id));
        assert!(!team.remove_member(&a.id));
        assert!(!team.contains(&a.id));
        assert!(team.set_active("missing", true).is_none());
    }

    // -- invites --

    #[test]
    fn invite_then_accept_creates_member() {
        let mut team = store();
        let invite = team
            .invite(NewInvite {
                email: "cy@example.com".into(),
                role: ProductionRole::Videographer,
            })
            .unwrap();
        assert_eq!(team.pending_invites().count(), 1);

        let member = team.accept_invite(&invite.id, "Cy").unwrap();
        assert_eq!(member.role, ProductionRole::Videographer);
        assert_eq!(team.pending_invites().count(), 0);
        assert_eq!(team.invites()[0].status, InviteStatus::Accepted);
        assert_matches!(
            team.accept_invite(&invite.id, "Cy"),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn invite_rejects_bad_or_duplicate_email() {
        let mut team = store();
        team.add_member(new_member("Ada", "ada@example.com")).unwrap();

        assert_matches!(
            team.invite(NewInvite {
                email: "bad".into(),
                role: ProductionRole::Director,
            }),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            team.invite(NewInvite {
                email: "ADA@example.com".into(),
                role: ProductionRole::Director,
            }),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn revoke_invite() {
        let mut team = store();
        let invite = team
            .invite(NewInvite {
                email: "dee@example.com".into(),
                role: ProductionRole::Researcher,
            })
            .unwrap();
        team.revoke_invite(&invite.id).unwrap();
        assert_eq!(team.invites()[0].status, InviteStatus::Revoked);
        assert_matches!(
            team.revoke_invite("missing"),
            Err(CoreError::NotFound { entity: "invite", .. })
        );
    }

    // -- persistence --

    #[test]
    fn roster_survives_reopen() {
        let storage = MemoryStorage::new();
        let mut team = TeamStore::open(storage.clone(), None);
        let member = team.add_member(new_member("Ada", "ada@example.com")).unwrap();
        team.invite(NewInvite {
            email: "eve@example.com".into(),
            role: ProductionRole::InsightsLead,
        })
        .unwrap();

        let reopened = TeamStore::open(storage, None);
        assert_eq!(reopened.members(), &[member]);
        assert_eq!(reopened.pending_invites().count(), 1);
    }
}
