//! Core data model: scope metadata, event rows, timestamps, and request filters.
//!
//! Everything here is a read-only projection constructed fresh per request from
//! the repository gateway; nothing is cached across requests or persisted by the
//! engine. Optional row fields are `Option<T>`, never sentinel values, so the
//! merge precedence rule in [`crate::merge`] stays mechanically checkable.

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// User identifier as issued by the identity layer.
pub type UserId = String;
/// Group identifier.
pub type GroupId = String;
/// Ontology project identifier.
pub type ProjectId = String;
/// Organization identifier.
pub type OrgId = String;
/// Role identifier from the identity layer.
pub type RoleId = String;

/// Role that bypasses ACL and ownership checks. It never bypasses scope-id
/// existence checks: an unknown scope id stays a not-found condition.
pub const SUPER_ADMIN_ROLE: &str = "super-admin";

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// ISO-8601 UTC timestamp.
///
/// Ordering is derived from the underlying string. For this format
/// lexicographic order coincides with chronological order, and every ordering
/// rule in the engine (window bounds, most-recently-touched, recent threads)
/// is defined as the string comparison, not a parsed-date comparison. Only the
/// request boundary parses: [`Timestamp::parse`] validates RFC 3339 before a
/// report runs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Wrap a timestamp string without validation. Gateway rows are trusted;
    /// the store already normalizes them to UTC.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse and validate an RFC 3339 timestamp arriving from the boundary.
    pub fn parse(raw: &str) -> Result<Self, FilterError> {
        chrono::DateTime::parse_from_rfc3339(raw).map_err(|e| FilterError::MalformedTimestamp {
            value: raw.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self(raw.to_string()))
    }

    /// The raw timestamp string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Scope metadata
// ---------------------------------------------------------------------------

/// Snapshot of an ontology project as listed by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    pub id: ProjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
    /// Group ids permitted to view this project. Empty means public.
    #[serde(default)]
    pub visible_to_group_ids: Vec<GroupId>,
}

/// Snapshot of a group and its membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMeta {
    pub id: GroupId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrgId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
    #[serde(default)]
    pub member_ids: Vec<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl GroupMeta {
    /// Whether `user_id` is a member of this group.
    pub fn has_member(&self, user_id: &str) -> bool {
        self.member_ids.iter().any(|m| m == user_id)
    }
}

/// Snapshot of an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationMeta {
    pub id: OrgId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Event rows
// ---------------------------------------------------------------------------

/// One raw query row describing an individual's lifecycle and, after merging,
/// its canonical record.
///
/// The store answers one row per (entity, attribute) binding, so several rows
/// for the same `entity_id` are expected; [`crate::merge`] collapses them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualEvent {
    pub entity_id: String,
    pub project_id: ProjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub created_by: UserId,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    /// Visibility set carried from the store; empty means public. Consumed by
    /// the collector's ACL filter, never emitted in report output.
    #[serde(default, skip_serializing)]
    pub visible_to: Vec<GroupId>,
}

impl IndividualEvent {
    /// Most recent touch: `updated_at` falling back to `created_at`.
    pub fn touched_at(&self) -> &Timestamp {
        self.updated_at.as_ref().unwrap_or(&self.created_at)
    }
}

/// One raw query row describing a comment and, after merging, its canonical
/// record. Comments are graph entities themselves: `entity_id` is the comment
/// id and `reply_to_id` references the parent comment's `entity_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentEvent {
    pub entity_id: String,
    pub project_id: ProjectId,
    /// The individual (or other resource) the comment is attached to.
    pub on_resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub created_by: UserId,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
    /// Visibility set carried from the store; empty means public.
    #[serde(default, skip_serializing)]
    pub visible_to: Vec<GroupId>,
}

impl CommentEvent {
    /// Whether this comment starts a thread rather than replying to one.
    pub fn is_root(&self) -> bool {
        self.reply_to_id.is_none()
    }

    /// Most recent touch: `updated_at` falling back to `created_at`.
    pub fn touched_at(&self) -> &Timestamp {
        self.updated_at.as_ref().unwrap_or(&self.created_at)
    }
}

// ---------------------------------------------------------------------------
// Requester identity
// ---------------------------------------------------------------------------

/// The requesting identity as seen by the resolver and collector.
#[derive(Debug, Clone)]
pub struct Requester {
    pub id: UserId,
    pub group_ids: Vec<GroupId>,
    pub is_super_admin: bool,
}

impl Requester {
    /// Build from the identity layer's role and group lookups.
    pub fn new(id: impl Into<UserId>, roles: &[RoleId], group_ids: Vec<GroupId>) -> Self {
        Self {
            id: id.into(),
            group_ids,
            is_super_admin: roles.iter().any(|r| r == SUPER_ADMIN_ROLE),
        }
    }
}

// ---------------------------------------------------------------------------
// Request filters
// ---------------------------------------------------------------------------

/// Requested reporting scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeSelection {
    /// Everything the requester may see.
    All,
    /// A single ontology project.
    Ontology { id: ProjectId },
    /// A single organization and its groups.
    Organization { id: OrgId },
    /// A single group.
    Group { id: GroupId },
}

impl ScopeSelection {
    /// Build from the boundary's `scopeType`/`scopeId` pair. A missing scope
    /// type defaults to `all`; every other type requires an id.
    pub fn from_request(
        scope_type: Option<&str>,
        scope_id: Option<&str>,
    ) -> Result<Self, FilterError> {
        let scope_type = scope_type.unwrap_or("all");
        if scope_type == "all" {
            return Ok(Self::All);
        }
        let id = scope_id
            .ok_or_else(|| FilterError::MissingScopeId {
                scope_type: scope_type.to_string(),
            })?
            .to_string();
        match scope_type {
            "ontology" => Ok(Self::Ontology { id }),
            "organization" => Ok(Self::Organization { id }),
            "group" => Ok(Self::Group { id }),
            other => Err(FilterError::UnknownScopeType {
                value: other.to_string(),
            }),
        }
    }

    /// The wire name of the scope type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Ontology { .. } => "ontology",
            Self::Organization { .. } => "organization",
            Self::Group { .. } => "group",
        }
    }

    /// The target id, if the selection names one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Ontology { id } | Self::Organization { id } | Self::Group { id } => Some(id),
        }
    }
}

/// Validated request filters: optional inclusive time window plus scope.
#[derive(Debug, Clone)]
pub struct DashboardFilters {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    pub scope: ScopeSelection,
}

impl DashboardFilters {
    /// Validate and assemble filters from raw boundary input. Rejects
    /// malformed timestamps, inverted windows, and incomplete scopes before
    /// the engine issues any gateway call.
    pub fn from_request(
        start: Option<&str>,
        end: Option<&str>,
        scope_type: Option<&str>,
        scope_id: Option<&str>,
    ) -> Result<Self, FilterError> {
        let start = start.map(Timestamp::parse).transpose()?;
        let end = end.map(Timestamp::parse).transpose()?;
        if let (Some(s), Some(e)) = (&start, &end) {
            if s > e {
                return Err(FilterError::InvertedWindow {
                    start: s.to_string(),
                    end: e.to_string(),
                });
            }
        }
        let scope = ScopeSelection::from_request(scope_type, scope_id)?;
        Ok(Self { start, end, scope })
    }
}
