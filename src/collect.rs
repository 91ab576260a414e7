//! Event collection: fetch raw rows for the resolved scope and apply the
//! canonical time-window and ACL filters.
//!
//! The collector owns the filtering semantics regardless of how much a
//! gateway pushed down: every row is re-checked against the window, the
//! shared visibility predicate, and — for group- and organization-scoped
//! reports — the scope's group universe.

use std::collections::HashSet;

use tracing::debug;

use crate::acl::{effective_groups, is_visible_to};
use crate::gateway::{EventQuery, GatewayResult, RepositoryGateway};
use crate::model::{CommentEvent, GroupId, IndividualEvent, ProjectId, Requester, Timestamp};

// ---------------------------------------------------------------------------
// Time window
// ---------------------------------------------------------------------------

/// Inclusive time window over event timestamps, open-ended where a bound is
/// omitted.
///
/// Both bounds are evaluated against `created_at`; `updated_at`, when
/// present, must merely not fall outside the same window. An event created
/// before the window but updated inside it is therefore excluded. Callers
/// depend on this exact shape; widening it to admit update-only matches
/// changes every section's contents.
#[derive(Debug, Clone, Default)]
pub struct EventWindow {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl EventWindow {
    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self { start, end }
    }

    /// Whether an event with the given timestamps falls inside the window.
    pub fn admits(&self, created_at: &Timestamp, updated_at: Option<&Timestamp>) -> bool {
        if self.start.as_ref().is_some_and(|s| created_at < s) {
            return false;
        }
        if self.end.as_ref().is_some_and(|e| created_at > e) {
            return false;
        }
        if let Some(updated) = updated_at {
            if self.start.as_ref().is_some_and(|s| updated < s) {
                return false;
            }
            if self.end.as_ref().is_some_and(|e| updated > e) {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Collector
// ---------------------------------------------------------------------------

/// Everything a fetch needs besides the gateway: the admissible projects,
/// the viewer, the window, and the scope's group universe.
#[derive(Debug, Clone)]
pub struct CollectRequest<'r> {
    pub project_ids: &'r [ProjectId],
    pub requester: &'r Requester,
    pub window: &'r EventWindow,
    /// Group ids admitted by the resolved scope. Always unioned into the
    /// viewer's effective group set; additionally enforced against each
    /// event's visibility set when `narrowed` is true.
    pub scope_group_ids: &'r [GroupId],
    /// True for group- and organization-scoped reports. The narrowing filter
    /// defines the scope universe, so it applies to super-admins as well.
    pub narrowed: bool,
}

/// Fetches and filters raw event rows through a repository gateway.
pub struct EventCollector<'a, G: RepositoryGateway + ?Sized> {
    gateway: &'a G,
}

impl<'a, G: RepositoryGateway + ?Sized> EventCollector<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Fetch individual rows for the scope. An empty project set returns
    /// empty without issuing a query.
    pub fn fetch_individual_events(
        &self,
        request: &CollectRequest<'_>,
    ) -> GatewayResult<Vec<IndividualEvent>> {
        if request.project_ids.is_empty() {
            return Ok(Vec::new());
        }
        let effective = effective_groups(&request.requester.group_ids, request.scope_group_ids);
        let rows = self
            .gateway
            .fetch_individual_events(&build_query(request, &effective))?;
        let total = rows.len();
        let kept: Vec<IndividualEvent> = rows
            .into_iter()
            .filter(|row| {
                admits_row(
                    request,
                    &effective,
                    &row.created_by,
                    &row.created_at,
                    row.updated_at.as_ref(),
                    &row.visible_to,
                )
            })
            .collect();
        debug!(total, kept = kept.len(), "filtered individual rows");
        Ok(kept)
    }

    /// Fetch comment rows for the scope, symmetric to
    /// [`Self::fetch_individual_events`].
    pub fn fetch_comment_events(
        &self,
        request: &CollectRequest<'_>,
    ) -> GatewayResult<Vec<CommentEvent>> {
        if request.project_ids.is_empty() {
            return Ok(Vec::new());
        }
        let effective = effective_groups(&request.requester.group_ids, request.scope_group_ids);
        let rows = self
            .gateway
            .fetch_comment_events(&build_query(request, &effective))?;
        let total = rows.len();
        let kept: Vec<CommentEvent> = rows
            .into_iter()
            .filter(|row| {
                admits_row(
                    request,
                    &effective,
                    &row.created_by,
                    &row.created_at,
                    row.updated_at.as_ref(),
                    &row.visible_to,
                )
            })
            .collect();
        debug!(total, kept = kept.len(), "filtered comment rows");
        Ok(kept)
    }
}

fn build_query(request: &CollectRequest<'_>, effective: &HashSet<GroupId>) -> EventQuery {
    EventQuery {
        project_ids: request.project_ids.to_vec(),
        viewer_id: request.requester.id.clone(),
        effective_group_ids: effective.iter().cloned().collect(),
        is_super_admin: request.requester.is_super_admin,
        start: request.window.start.clone(),
        end: request.window.end.clone(),
    }
}

/// The canonical row filter: time window, shared visibility predicate, and
/// the independent scope-narrowing check.
fn admits_row(
    request: &CollectRequest<'_>,
    effective: &HashSet<GroupId>,
    created_by: &str,
    created_at: &Timestamp,
    updated_at: Option<&Timestamp>,
    visible_to: &[GroupId],
) -> bool {
    if !request.window.admits(created_at, updated_at) {
        return false;
    }
    if !is_visible_to(
        Some(created_by),
        visible_to,
        &request.requester.id,
        effective,
        request.requester.is_super_admin,
    ) {
        return false;
    }
    if request.narrowed
        && !visible_to.is_empty()
        && !visible_to.iter().any(|g| request.scope_group_ids.contains(g))
    {
        return false;
    }
    true
}
