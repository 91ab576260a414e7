//! Dashboard orchestration: one entry point that sequences scope resolution,
//! event collection, merging, and section construction into a full report.
//!
//! The orchestrator holds no state between requests. Every call re-fetches
//! the meta-lists and identity, resolves the scope, and computes all four
//! sections; a failure anywhere aborts the whole request — there is no
//! partial-report mode.

use tracing::info;

use crate::collect::{CollectRequest, EventCollector, EventWindow};
use crate::error::WadjetResult;
use crate::gateway::RepositoryGateway;
use crate::merge::merge;
use crate::model::{DashboardFilters, Requester, ScopeSelection};
use crate::report::{FilterEcho, Report, ScopeMeta, activity, comments, governance, platform};
use crate::scope;

/// Per-user report facade over a repository gateway.
pub struct Dashboard<'a, G: RepositoryGateway + ?Sized> {
    gateway: &'a G,
}

impl<'a, G: RepositoryGateway + ?Sized> Dashboard<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Compute the full report for `requester_id` under the given filters.
    pub fn report(&self, requester_id: &str, filters: &DashboardFilters) -> WadjetResult<Report> {
        let all_projects = self.gateway.list_projects()?;
        let all_groups = self.gateway.list_groups()?;
        let all_orgs = self.gateway.list_organizations()?;
        let roles = self.gateway.user_roles(requester_id)?;
        let group_ids = self.gateway.user_groups(requester_id)?;
        let requester = Requester::new(requester_id, &roles, group_ids);

        let resolved = scope::resolve(&requester, all_projects, all_groups, all_orgs, &filters.scope)?;
        info!(
            requester = requester_id,
            scope = filters.scope.type_name(),
            projects = resolved.projects.len(),
            groups = resolved.groups.len(),
            organizations = resolved.organizations.len(),
            "resolved report scope"
        );

        let window = EventWindow::new(filters.start.clone(), filters.end.clone());
        let project_ids = resolved.project_ids();
        let scope_group_ids = resolved.group_ids();
        let narrowed = matches!(
            filters.scope,
            ScopeSelection::Group { .. } | ScopeSelection::Organization { .. }
        );
        let request = CollectRequest {
            project_ids: &project_ids,
            requester: &requester,
            window: &window,
            scope_group_ids: &scope_group_ids,
            narrowed,
        };

        let collector = EventCollector::new(self.gateway);
        let individual_rows = collector.fetch_individual_events(&request)?;
        let comment_rows = collector.fetch_comment_events(&request)?;

        let individuals = merge(individual_rows);
        let comment_map = merge(comment_rows);
        info!(
            individuals = individuals.len(),
            comments = comment_map.len(),
            "merged canonical events"
        );

        Ok(Report {
            filters: FilterEcho {
                start: filters.start.clone(),
                end: filters.end.clone(),
                scope_type: filters.scope.type_name().to_string(),
                scope_id: filters.scope.id().map(str::to_string),
            },
            platform: platform::build(&resolved, &individuals, &comment_map),
            governance: governance::build(&individuals, &comment_map),
            my_activity: activity::build(&requester.id, &individuals, &comment_map),
            comments: comments::build(&comment_map),
            meta: ScopeMeta {
                accessible_ontologies: resolved.projects.len(),
                accessible_groups: resolved.groups.len(),
                accessible_organizations: resolved.organizations.len(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;

    #[test]
    fn empty_store_yields_an_empty_report() {
        let store = MemoryGateway::default();
        let filters = DashboardFilters {
            start: None,
            end: None,
            scope: ScopeSelection::All,
        };
        let report = Dashboard::new(&store).report("alice", &filters).unwrap();

        assert_eq!(report.platform.kpis.ontologies, 0);
        assert_eq!(report.governance.kpis.active_members, 0);
        assert!(report.comments.top_threads.is_empty());
        assert_eq!(report.meta.accessible_ontologies, 0);
        assert_eq!(report.filters.scope_type, "all");
    }

    #[test]
    fn report_serializes_with_camel_case_wire_names() {
        let store = MemoryGateway::default();
        let filters = DashboardFilters {
            start: None,
            end: None,
            scope: ScopeSelection::All,
        };
        let report = Dashboard::new(&store).report("alice", &filters).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert!(json.get("myActivity").is_some());
        assert!(json["meta"].get("accessibleOntologies").is_some());
        assert!(json["platform"]["kpis"].get("activeUsers").is_some());
    }
}
