//! Scope resolution: narrow the universe of projects, groups, and
//! organizations to what the requester may report on.
//!
//! Resolution is a pure function over the gateway's meta-lists and the
//! requester's identity. Failures are fatal for the request: an unknown scope
//! id is [`ScopeError::NotFound`] (even for super-admins) and an unauthorized
//! target is [`ScopeError::Forbidden`]; no partial scope is ever substituted.

use std::collections::HashSet;

use crate::acl::is_visible_to;
use crate::error::ScopeError;
use crate::model::{
    GroupId, GroupMeta, OrganizationMeta, ProjectId, ProjectMeta, Requester, ScopeSelection,
};

/// Result type for scope resolution.
pub type ScopeResult<T> = std::result::Result<T, ScopeError>;

/// The authorization-narrowed universe a report is computed over.
#[derive(Debug, Clone)]
pub struct ResolvedScope {
    pub projects: Vec<ProjectMeta>,
    pub groups: Vec<GroupMeta>,
    pub organizations: Vec<OrganizationMeta>,
}

impl ResolvedScope {
    /// Ids of the admissible projects, in resolved order.
    pub fn project_ids(&self) -> Vec<ProjectId> {
        self.projects.iter().map(|p| p.id.clone()).collect()
    }

    /// Ids of the groups whose content is admissible, in resolved order.
    pub fn group_ids(&self) -> Vec<GroupId> {
        self.groups.iter().map(|g| g.id.clone()).collect()
    }
}

/// Resolve the requested scope against the full meta-lists.
pub fn resolve(
    requester: &Requester,
    all_projects: Vec<ProjectMeta>,
    all_groups: Vec<GroupMeta>,
    all_orgs: Vec<OrganizationMeta>,
    selection: &ScopeSelection,
) -> ScopeResult<ResolvedScope> {
    let viewer_groups: HashSet<GroupId> = requester.group_ids.iter().cloned().collect();
    match selection {
        ScopeSelection::All => Ok(resolve_all(
            requester,
            &viewer_groups,
            all_projects,
            all_groups,
            all_orgs,
        )),
        ScopeSelection::Ontology { id } => resolve_ontology(
            requester,
            &viewer_groups,
            all_projects,
            all_groups,
            all_orgs,
            id,
        ),
        ScopeSelection::Group { id } => resolve_group(
            requester,
            &viewer_groups,
            all_projects,
            all_groups,
            all_orgs,
            id,
        ),
        ScopeSelection::Organization { id } => resolve_organization(
            requester,
            &viewer_groups,
            all_projects,
            all_groups,
            all_orgs,
            id,
        ),
    }
}

/// The single admissibility predicate for projects, shared with the event
/// collector through [`crate::acl::is_visible_to`].
fn project_visible(
    project: &ProjectMeta,
    requester: &Requester,
    viewer_groups: &HashSet<GroupId>,
) -> bool {
    is_visible_to(
        project.created_by.as_deref(),
        &project.visible_to_group_ids,
        &requester.id,
        viewer_groups,
        requester.is_super_admin,
    )
}

fn resolve_all(
    requester: &Requester,
    viewer_groups: &HashSet<GroupId>,
    all_projects: Vec<ProjectMeta>,
    all_groups: Vec<GroupMeta>,
    all_orgs: Vec<OrganizationMeta>,
) -> ResolvedScope {
    if requester.is_super_admin {
        return ResolvedScope {
            projects: all_projects,
            groups: all_groups,
            organizations: all_orgs,
        };
    }

    let projects = all_projects
        .into_iter()
        .filter(|p| project_visible(p, requester, viewer_groups))
        .collect();

    let groups: Vec<GroupMeta> = all_groups
        .into_iter()
        .filter(|g| g.has_member(&requester.id))
        .collect();

    // Organizations owned by the requester or reachable through a membership.
    let reachable: HashSet<String> = groups
        .iter()
        .filter_map(|g| g.organization_id.clone())
        .collect();
    let organizations = all_orgs
        .into_iter()
        .filter(|o| {
            o.owner_id.as_deref() == Some(requester.id.as_str()) || reachable.contains(&o.id)
        })
        .collect();

    ResolvedScope {
        projects,
        groups,
        organizations,
    }
}

fn resolve_ontology(
    requester: &Requester,
    viewer_groups: &HashSet<GroupId>,
    all_projects: Vec<ProjectMeta>,
    all_groups: Vec<GroupMeta>,
    all_orgs: Vec<OrganizationMeta>,
    id: &str,
) -> ScopeResult<ResolvedScope> {
    let project = all_projects
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| ScopeError::NotFound {
            kind: "ontology",
            id: id.to_string(),
        })?;

    if !project_visible(&project, requester, viewer_groups) {
        return Err(ScopeError::Forbidden {
            kind: "ontology",
            id: id.to_string(),
        });
    }

    // The group and organization universes pass through unchanged for a
    // single-ontology report.
    Ok(ResolvedScope {
        projects: vec![project],
        groups: all_groups,
        organizations: all_orgs,
    })
}

fn resolve_group(
    requester: &Requester,
    viewer_groups: &HashSet<GroupId>,
    all_projects: Vec<ProjectMeta>,
    all_groups: Vec<GroupMeta>,
    all_orgs: Vec<OrganizationMeta>,
    id: &str,
) -> ScopeResult<ResolvedScope> {
    let group = all_groups
        .iter()
        .find(|g| g.id == id)
        .cloned()
        .ok_or_else(|| ScopeError::NotFound {
            kind: "group",
            id: id.to_string(),
        })?;

    if !requester.is_super_admin && !group.has_member(&requester.id) {
        return Err(ScopeError::Forbidden {
            kind: "group",
            id: id.to_string(),
        });
    }

    let projects = all_projects
        .into_iter()
        .filter(|p| {
            p.visible_to_group_ids.contains(&group.id)
                || project_visible(p, requester, viewer_groups)
        })
        .collect();

    let organizations = all_orgs
        .into_iter()
        .filter(|o| group.organization_id.as_deref() == Some(o.id.as_str()))
        .collect();

    Ok(ResolvedScope {
        projects,
        groups: vec![group],
        organizations,
    })
}

fn resolve_organization(
    requester: &Requester,
    viewer_groups: &HashSet<GroupId>,
    all_projects: Vec<ProjectMeta>,
    all_groups: Vec<GroupMeta>,
    all_orgs: Vec<OrganizationMeta>,
    id: &str,
) -> ScopeResult<ResolvedScope> {
    let organization = all_orgs
        .into_iter()
        .find(|o| o.id == id)
        .ok_or_else(|| ScopeError::NotFound {
            kind: "organization",
            id: id.to_string(),
        })?;

    if !requester.is_super_admin
        && organization.owner_id.as_deref() != Some(requester.id.as_str())
    {
        return Err(ScopeError::Forbidden {
            kind: "organization",
            id: id.to_string(),
        });
    }

    let groups: Vec<GroupMeta> = all_groups
        .into_iter()
        .filter(|g| g.organization_id.as_deref() == Some(organization.id.as_str()))
        .collect();
    let org_group_ids: HashSet<&str> = groups.iter().map(|g| g.id.as_str()).collect();

    let projects = all_projects
        .into_iter()
        .filter(|p| {
            p.visible_to_group_ids
                .iter()
                .any(|g| org_group_ids.contains(g.as_str()))
                || project_visible(p, requester, viewer_groups)
        })
        .collect();

    Ok(ResolvedScope {
        projects,
        groups,
        organizations: vec![organization],
    })
}
