//! Shared visibility predicate for per-project and per-event admissibility.
//!
//! Scope resolution and event collection must agree on what "visible to the
//! viewer" means; both go through [`is_visible_to`] so the rule cannot drift
//! between the two call sites.

use std::collections::HashSet;

use crate::model::GroupId;

/// Whether a resource is visible to the viewer.
///
/// A resource is visible when the viewer is a super-admin, is its creator,
/// the resource carries no visibility restriction (empty set means public),
/// or the viewer's group set intersects the resource's visibility set.
pub fn is_visible_to(
    owner: Option<&str>,
    visible_to: &[GroupId],
    viewer_id: &str,
    viewer_groups: &HashSet<GroupId>,
    is_super_admin: bool,
) -> bool {
    if is_super_admin {
        return true;
    }
    if owner.is_some_and(|o| o == viewer_id) {
        return true;
    }
    if visible_to.is_empty() {
        return true;
    }
    visible_to.iter().any(|g| viewer_groups.contains(g))
}

/// Effective viewer group set: the viewer's own memberships unioned with the
/// groups admitted by the resolved scope, deduplicated.
pub fn effective_groups(viewer_groups: &[GroupId], scope_groups: &[GroupId]) -> HashSet<GroupId> {
    viewer_groups
        .iter()
        .chain(scope_groups.iter())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(ids: &[&str]) -> HashSet<GroupId> {
        ids.iter().map(|g| g.to_string()).collect()
    }

    #[test]
    fn super_admin_sees_everything() {
        assert!(is_visible_to(
            Some("bob"),
            &["G9".into()],
            "alice",
            &groups(&[]),
            true
        ));
    }

    #[test]
    fn creator_sees_own_resource() {
        assert!(is_visible_to(
            Some("alice"),
            &["G9".into()],
            "alice",
            &groups(&[]),
            false
        ));
    }

    #[test]
    fn empty_visibility_set_is_public() {
        assert!(is_visible_to(Some("bob"), &[], "alice", &groups(&[]), false));
        assert!(is_visible_to(None, &[], "alice", &groups(&[]), false));
    }

    #[test]
    fn group_intersection_grants_access() {
        assert!(is_visible_to(
            Some("bob"),
            &["G1".into(), "G2".into()],
            "alice",
            &groups(&["G2", "G7"]),
            false
        ));
    }

    #[test]
    fn disjoint_groups_deny_access() {
        assert!(!is_visible_to(
            Some("bob"),
            &["G1".into()],
            "alice",
            &groups(&["G2"]),
            false
        ));
    }

    #[test]
    fn effective_groups_union_deduplicates() {
        let effective = effective_groups(
            &["G1".into(), "G2".into()],
            &["G2".into(), "G3".into()],
        );
        assert_eq!(effective, groups(&["G1", "G2", "G3"]));
    }
}
