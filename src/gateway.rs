//! Repository gateway: the read-only boundary to the shared knowledge graph.
//!
//! The engine never talks to the graph store directly; every meta-list,
//! identity lookup, and raw event fetch goes through [`RepositoryGateway`].
//! A production implementation translates [`EventQuery`] into the store's own
//! query language and may push the window and viewer filters down; the
//! collector re-applies the canonical filtering semantics either way, so a
//! gateway that returns a superset of matching rows is still correct.
//!
//! [`MemoryGateway`] is the in-memory implementation backing tests and the
//! CLI, deserialized from a JSON fixture document.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::GatewayError;
use crate::model::{
    CommentEvent, GroupId, GroupMeta, IndividualEvent, OrganizationMeta, ProjectId, ProjectMeta,
    RoleId, Timestamp, UserId,
};

/// Result type for gateway operations.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Parameters for a raw event fetch.
///
/// Carries enough context for a gateway to narrow its query at the source.
#[derive(Debug, Clone)]
pub struct EventQuery {
    pub project_ids: Vec<ProjectId>,
    pub viewer_id: UserId,
    /// The viewer's memberships unioned with the scope's group universe.
    pub effective_group_ids: Vec<GroupId>,
    pub is_super_admin: bool,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

/// Read-only access to the shared knowledge graph.
///
/// All methods are snapshot reads; the engine issues them fresh per request
/// and never caches across requests. Implementations own their timeouts and
/// retries — a returned error is terminal for the report.
pub trait RepositoryGateway {
    /// All ontology projects.
    fn list_projects(&self) -> GatewayResult<Vec<ProjectMeta>>;

    /// All groups with their memberships.
    fn list_groups(&self) -> GatewayResult<Vec<GroupMeta>>;

    /// All organizations.
    fn list_organizations(&self) -> GatewayResult<Vec<OrganizationMeta>>;

    /// Role grants for a user from the identity layer.
    fn user_roles(&self, user_id: &str) -> GatewayResult<Vec<RoleId>>;

    /// Group memberships for a user.
    fn user_groups(&self, user_id: &str) -> GatewayResult<Vec<GroupId>>;

    /// Raw individual rows for the given projects, one row per
    /// (entity, attribute) binding.
    fn fetch_individual_events(&self, query: &EventQuery) -> GatewayResult<Vec<IndividualEvent>>;

    /// Raw comment rows for the given projects.
    fn fetch_comment_events(&self, query: &EventQuery) -> GatewayResult<Vec<CommentEvent>>;
}

// ---------------------------------------------------------------------------
// In-memory fixture store
// ---------------------------------------------------------------------------

/// In-memory gateway backed by a JSON fixture document.
///
/// Group membership lookups derive from [`GroupMeta::member_ids`], so the
/// fixture states memberships in one place. Event fetches narrow by project
/// id only; window and ACL filtering stay with the collector.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryGateway {
    pub projects: Vec<ProjectMeta>,
    pub groups: Vec<GroupMeta>,
    pub organizations: Vec<OrganizationMeta>,
    /// Per-user role grants.
    pub roles: HashMap<UserId, Vec<RoleId>>,
    pub individuals: Vec<IndividualEvent>,
    pub comments: Vec<CommentEvent>,
}

impl MemoryGateway {
    /// Deserialize a store from a JSON document.
    pub fn from_json(raw: &str) -> GatewayResult<Self> {
        serde_json::from_str(raw).map_err(|e| GatewayError::Fixture {
            path: "<inline>".into(),
            message: e.to_string(),
        })
    }

    /// Load a store from a JSON fixture file.
    pub fn load(path: &Path) -> GatewayResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GatewayError::Fixture {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| GatewayError::Fixture {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl RepositoryGateway for MemoryGateway {
    fn list_projects(&self) -> GatewayResult<Vec<ProjectMeta>> {
        Ok(self.projects.clone())
    }

    fn list_groups(&self) -> GatewayResult<Vec<GroupMeta>> {
        Ok(self.groups.clone())
    }

    fn list_organizations(&self) -> GatewayResult<Vec<OrganizationMeta>> {
        Ok(self.organizations.clone())
    }

    fn user_roles(&self, user_id: &str) -> GatewayResult<Vec<RoleId>> {
        Ok(self.roles.get(user_id).cloned().unwrap_or_default())
    }

    fn user_groups(&self, user_id: &str) -> GatewayResult<Vec<GroupId>> {
        Ok(self
            .groups
            .iter()
            .filter(|g| g.has_member(user_id))
            .map(|g| g.id.clone())
            .collect())
    }

    fn fetch_individual_events(&self, query: &EventQuery) -> GatewayResult<Vec<IndividualEvent>> {
        Ok(self
            .individuals
            .iter()
            .filter(|e| query.project_ids.contains(&e.project_id))
            .cloned()
            .collect())
    }

    fn fetch_comment_events(&self, query: &EventQuery) -> GatewayResult<Vec<CommentEvent>> {
        Ok(self
            .comments
            .iter()
            .filter(|c| query.project_ids.contains(&c.project_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORE: &str = r#"{
        "projects": [
            { "id": "P1", "label": "Botany", "createdBy": "alice" },
            { "id": "P2", "visibleToGroupIds": ["G1"] }
        ],
        "groups": [
            { "id": "G1", "organizationId": "ORG1", "memberIds": ["alice", "bob"] }
        ],
        "organizations": [
            { "id": "ORG1", "ownerId": "bob" }
        ],
        "roles": { "root": ["super-admin"] },
        "individuals": [
            {
                "entityId": "E1",
                "projectId": "P1",
                "createdBy": "alice",
                "createdAt": "2026-01-10T12:00:00Z"
            }
        ],
        "comments": []
    }"#;

    fn query(project_ids: &[&str]) -> EventQuery {
        EventQuery {
            project_ids: project_ids.iter().map(|p| p.to_string()).collect(),
            viewer_id: "alice".into(),
            effective_group_ids: vec![],
            is_super_admin: false,
            start: None,
            end: None,
        }
    }

    #[test]
    fn store_parses_from_json() {
        let store = MemoryGateway::from_json(STORE).unwrap();
        assert_eq!(store.projects.len(), 2);
        assert_eq!(store.groups.len(), 1);
        assert_eq!(store.individuals.len(), 1);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let store = MemoryGateway::from_json(r#"{ "projects": [] }"#).unwrap();
        assert!(store.comments.is_empty());
        assert!(store.roles.is_empty());
    }

    #[test]
    fn invalid_json_is_a_fixture_error() {
        let err = MemoryGateway::from_json("{ not json").unwrap_err();
        assert!(matches!(err, GatewayError::Fixture { .. }));
    }

    #[test]
    fn user_groups_derive_from_memberships() {
        let store = MemoryGateway::from_json(STORE).unwrap();
        assert_eq!(store.user_groups("alice").unwrap(), vec!["G1"]);
        assert!(store.user_groups("stranger").unwrap().is_empty());
    }

    #[test]
    fn user_roles_default_to_empty() {
        let store = MemoryGateway::from_json(STORE).unwrap();
        assert_eq!(store.user_roles("root").unwrap(), vec!["super-admin"]);
        assert!(store.user_roles("alice").unwrap().is_empty());
    }

    #[test]
    fn fetches_narrow_by_project_id() {
        let store = MemoryGateway::from_json(STORE).unwrap();
        assert_eq!(
            store.fetch_individual_events(&query(&["P1"])).unwrap().len(),
            1
        );
        assert!(store
            .fetch_individual_events(&query(&["P2"]))
            .unwrap()
            .is_empty());
    }
}
