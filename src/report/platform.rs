//! Platform section: cross-cutting KPIs, activity counts, top contributors,
//! and per-project health.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{CommentEvent, IndividualEvent, ProjectId, ProjectMeta, Timestamp};
use crate::scope::ResolvedScope;

use super::{ContributorRank, TOP_FIVE, contributor_counts, contributor_ranks, rank_top_n};

/// Headline counts for the resolved scope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformKpis {
    pub ontologies: usize,
    pub organizations: usize,
    pub groups: usize,
    /// Distinct creators and updaters across both event kinds, in-window.
    pub active_users: usize,
}

/// In-window creation and update counts over the canonical event sets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub individuals_created: usize,
    pub individuals_updated: usize,
    pub comments_created: usize,
    pub comments_updated: usize,
}

/// Per-project activity row, one per in-scope project.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectHealth {
    pub project_id: ProjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub individuals: usize,
    pub comments: usize,
    pub active_users: usize,
    /// Most recent touch across the project's events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSection {
    pub kpis: PlatformKpis,
    pub activity: ActivitySummary,
    pub top_contributors: Vec<ContributorRank>,
    pub project_health: Vec<ProjectHealth>,
}

/// Build the platform section from the resolved scope and canonical events.
pub fn build(
    scope: &ResolvedScope,
    individuals: &IndexMap<String, IndividualEvent>,
    comments: &IndexMap<String, CommentEvent>,
) -> PlatformSection {
    let counts = contributor_counts(individuals, comments);

    let kpis = PlatformKpis {
        ontologies: scope.projects.len(),
        organizations: scope.organizations.len(),
        groups: scope.groups.len(),
        active_users: counts.len(),
    };

    let activity = ActivitySummary {
        individuals_created: individuals.len(),
        individuals_updated: individuals
            .values()
            .filter(|e| e.updated_at.is_some() || e.updated_by.is_some())
            .count(),
        comments_created: comments.len(),
        comments_updated: comments
            .values()
            .filter(|c| c.updated_at.is_some() || c.updated_by.is_some())
            .count(),
    };

    let top_contributors = contributor_ranks(rank_top_n(counts, TOP_FIVE));

    let project_health = scope
        .projects
        .iter()
        .map(|project| health_row(project, individuals, comments))
        .collect();

    PlatformSection {
        kpis,
        activity,
        top_contributors,
        project_health,
    }
}

fn health_row(
    project: &ProjectMeta,
    individuals: &IndexMap<String, IndividualEvent>,
    comments: &IndexMap<String, CommentEvent>,
) -> ProjectHealth {
    let mut users: HashSet<&str> = HashSet::new();
    let mut last: Option<&Timestamp> = None;
    let mut individual_count = 0;
    let mut comment_count = 0;

    for event in individuals.values().filter(|e| e.project_id == project.id) {
        individual_count += 1;
        users.insert(event.created_by.as_str());
        if let Some(updater) = &event.updated_by {
            users.insert(updater.as_str());
        }
        let touched = event.touched_at();
        if last.is_none_or(|t| touched > t) {
            last = Some(touched);
        }
    }

    for comment in comments.values().filter(|c| c.project_id == project.id) {
        comment_count += 1;
        users.insert(comment.created_by.as_str());
        if let Some(updater) = &comment.updated_by {
            users.insert(updater.as_str());
        }
        let touched = comment.touched_at();
        if last.is_none_or(|t| touched > t) {
            last = Some(touched);
        }
    }

    ProjectHealth {
        project_id: project.id.clone(),
        label: project.label.clone(),
        individuals: individual_count,
        comments: comment_count,
        active_users: users.len(),
        last_activity: last.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge;

    fn scope_with(projects: Vec<ProjectMeta>) -> ResolvedScope {
        ResolvedScope {
            projects,
            groups: vec![],
            organizations: vec![],
        }
    }

    fn project(id: &str) -> ProjectMeta {
        ProjectMeta {
            id: id.into(),
            label: Some(format!("{id} ontology")),
            created_by: None,
            visible_to_group_ids: vec![],
        }
    }

    fn individual(entity: &str, project: &str, creator: &str, at: &str) -> IndividualEvent {
        IndividualEvent {
            entity_id: entity.into(),
            project_id: project.into(),
            label: None,
            class_id: None,
            class_name: None,
            created_by: creator.into(),
            created_at: Timestamp::new(at),
            updated_by: None,
            updated_at: None,
            visible_to: vec![],
        }
    }

    fn comment(id: &str, project: &str, on: &str, creator: &str, at: &str) -> CommentEvent {
        CommentEvent {
            entity_id: id.into(),
            project_id: project.into(),
            on_resource_id: on.into(),
            body: None,
            class_id: None,
            class_name: None,
            created_by: creator.into(),
            created_at: Timestamp::new(at),
            updated_by: None,
            updated_at: None,
            reply_to_id: None,
            visible_to: vec![],
        }
    }

    #[test]
    fn kpis_count_scope_and_active_users() {
        let scope = scope_with(vec![project("P1"), project("P2")]);
        let mut updated = individual("E2", "P1", "alice", "2026-01-10T00:00:00Z");
        updated.updated_by = Some("bob".into());
        updated.updated_at = Some(Timestamp::new("2026-01-12T00:00:00Z"));

        let individuals = merge(vec![
            individual("E1", "P1", "alice", "2026-01-09T00:00:00Z"),
            updated,
        ]);
        let comments = merge(vec![comment(
            "C1",
            "P2",
            "E1",
            "carol",
            "2026-01-11T00:00:00Z",
        )]);

        let section = build(&scope, &individuals, &comments);
        assert_eq!(section.kpis.ontologies, 2);
        assert_eq!(section.kpis.active_users, 3); // alice, bob, carol
        assert_eq!(section.activity.individuals_created, 2);
        assert_eq!(section.activity.individuals_updated, 1);
        assert_eq!(section.activity.comments_created, 1);
        assert_eq!(section.activity.comments_updated, 0);
    }

    #[test]
    fn top_contributors_capped_at_five() {
        let scope = scope_with(vec![project("P1")]);
        let rows: Vec<IndividualEvent> = (0..8)
            .map(|i| {
                individual(
                    &format!("E{i}"),
                    "P1",
                    &format!("user{i}"),
                    "2026-01-10T00:00:00Z",
                )
            })
            .collect();
        let individuals = merge(rows);
        let comments = merge(Vec::<CommentEvent>::new());

        let section = build(&scope, &individuals, &comments);
        assert_eq!(section.top_contributors.len(), 5);
        // Equal scores keep merged-map order.
        assert_eq!(section.top_contributors[0].user_id, "user0");
    }

    #[test]
    fn project_health_rows_follow_scope_order() {
        let scope = scope_with(vec![project("P1"), project("P2")]);
        let mut updated = individual("E1", "P2", "alice", "2026-01-10T00:00:00Z");
        updated.updated_at = Some(Timestamp::new("2026-01-20T00:00:00Z"));
        updated.updated_by = Some("bob".into());

        let individuals = merge(vec![updated]);
        let comments = merge(vec![comment(
            "C1",
            "P2",
            "E1",
            "carol",
            "2026-01-15T00:00:00Z",
        )]);

        let section = build(&scope, &individuals, &comments);
        assert_eq!(section.project_health.len(), 2);

        let idle = &section.project_health[0];
        assert_eq!(idle.project_id, "P1");
        assert_eq!(idle.individuals, 0);
        assert!(idle.last_activity.is_none());

        let busy = &section.project_health[1];
        assert_eq!(busy.project_id, "P2");
        assert_eq!(busy.individuals, 1);
        assert_eq!(busy.comments, 1);
        assert_eq!(busy.active_users, 3);
        assert_eq!(
            busy.last_activity.as_ref().map(Timestamp::as_str),
            Some("2026-01-20T00:00:00Z")
        );
    }
}
