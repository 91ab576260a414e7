//! Report assembly: section types, shared ranking helpers, and rendering.
//!
//! Section builders are pure functions over the merged canonical event maps
//! plus the resolved scope; they perform no I/O and do not depend on each
//! other. Every ranking uses a stable descending sort so equal scores keep
//! the merged map's insertion order, then truncates to its cap.

pub mod activity;
pub mod comments;
pub mod governance;
pub mod platform;

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{CommentEvent, IndividualEvent, Timestamp, UserId};

/// Cap for the five-slot rankings (contributors, governance lists).
pub(crate) const TOP_FIVE: usize = 5;
/// Cap for the ten-slot comment rankings.
pub(crate) const TOP_TEN: usize = 10;

// ---------------------------------------------------------------------------
// Ranking helpers
// ---------------------------------------------------------------------------

/// Sort an accumulator's entries by score descending and truncate to `cap`.
/// The sort is stable, so equal scores keep the accumulator's insertion
/// order.
pub(crate) fn rank_top_n<K>(counts: IndexMap<K, usize>, cap: usize) -> Vec<(K, usize)> {
    let mut entries: Vec<(K, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(cap);
    entries
}

/// Contribution counts per user: one per creation and one per update,
/// across both event kinds. The key set doubles as the distinct
/// active-account set.
pub(crate) fn contributor_counts(
    individuals: &IndexMap<String, IndividualEvent>,
    comments: &IndexMap<String, CommentEvent>,
) -> IndexMap<UserId, usize> {
    let touches = individuals
        .values()
        .map(|e| (&e.created_by, e.updated_by.as_ref()))
        .chain(
            comments
                .values()
                .map(|c| (&c.created_by, c.updated_by.as_ref())),
        );

    let mut counts: IndexMap<UserId, usize> = IndexMap::new();
    for (creator, updater) in touches {
        *counts.entry(creator.clone()).or_insert(0) += 1;
        if let Some(updater) = updater {
            *counts.entry(updater.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Direct-reply counts keyed by every canonical comment id, in map order.
/// Replies whose parent is outside the merged set are not counted anywhere.
pub(crate) fn reply_counts(comments: &IndexMap<String, CommentEvent>) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> =
        comments.keys().map(|id| (id.clone(), 0)).collect();
    for comment in comments.values() {
        if let Some(parent) = &comment.reply_to_id {
            if let Some(slot) = counts.get_mut(parent) {
                *slot += 1;
            }
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Shared ranking rows
// ---------------------------------------------------------------------------

/// One user's position in a contributor ranking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorRank {
    pub user_id: UserId,
    /// Creations plus updates attributed to the user across both event kinds.
    pub contributions: usize,
}

pub(crate) fn contributor_ranks(ranked: Vec<(UserId, usize)>) -> Vec<ContributorRank> {
    ranked
        .into_iter()
        .map(|(user_id, contributions)| ContributorRank {
            user_id,
            contributions,
        })
        .collect()
}

/// One comment's position in a thread ranking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadRank {
    pub comment_id: String,
    /// The individual (or other resource) the thread hangs off.
    pub on_resource_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub created_at: Timestamp,
    /// Direct replies only; nested replies count toward their own parent.
    pub replies: usize,
}

pub(crate) fn thread_rank(comment: &CommentEvent, replies: usize) -> ThreadRank {
    ThreadRank {
        comment_id: comment.entity_id.clone(),
        on_resource_id: comment.on_resource_id.clone(),
        body: comment.body.clone(),
        created_at: comment.created_at.clone(),
        replies,
    }
}

/// Resolve ranked (comment id, replies) pairs back into display rows.
pub(crate) fn thread_ranks(
    comments: &IndexMap<String, CommentEvent>,
    ranked: Vec<(String, usize)>,
) -> Vec<ThreadRank> {
    ranked
        .into_iter()
        .filter_map(|(id, replies)| comments.get(&id).map(|c| thread_rank(c, replies)))
        .collect()
}

// ---------------------------------------------------------------------------
// Report envelope
// ---------------------------------------------------------------------------

/// Echo of the request filters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterEcho {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Timestamp>,
    pub scope_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<String>,
}

/// Scope-size metadata: how wide the universe behind the numbers is.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeMeta {
    pub accessible_ontologies: usize,
    pub accessible_groups: usize,
    pub accessible_organizations: usize,
}

/// The assembled per-user report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub filters: FilterEcho,
    pub platform: platform::PlatformSection,
    pub governance: governance::GovernanceSection,
    pub my_activity: activity::MyActivitySection,
    pub comments: comments::CommentsSection,
    pub meta: ScopeMeta,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "wadjet report ({} scope)", self.filters.scope_type)?;
        if let Some(id) = &self.filters.scope_id {
            writeln!(f, "  scope id:      {id}")?;
        }
        if let Some(start) = &self.filters.start {
            writeln!(f, "  from:          {start}")?;
        }
        if let Some(end) = &self.filters.end {
            writeln!(f, "  until:         {end}")?;
        }

        let kpis = &self.platform.kpis;
        writeln!(f, "  ontologies:    {}", kpis.ontologies)?;
        writeln!(f, "  organizations: {}", kpis.organizations)?;
        writeln!(f, "  groups:        {}", kpis.groups)?;
        writeln!(f, "  active users:  {}", kpis.active_users)?;

        let activity = &self.platform.activity;
        writeln!(
            f,
            "  individuals:   {} created, {} updated",
            activity.individuals_created, activity.individuals_updated
        )?;
        writeln!(
            f,
            "  comments:      {} created, {} updated",
            activity.comments_created, activity.comments_updated
        )?;

        if !self.platform.top_contributors.is_empty() {
            writeln!(f, "  top contributors:")?;
            for (i, c) in self.platform.top_contributors.iter().enumerate() {
                writeln!(f, "    {}. {} ({})", i + 1, c.user_id, c.contributions)?;
            }
        }

        if !self.governance.top_classes.is_empty() {
            writeln!(f, "  top classes:")?;
            for (i, c) in self.governance.top_classes.iter().enumerate() {
                let name = c.class_name.as_deref().unwrap_or(&c.class_id);
                writeln!(f, "    {}. {} ({})", i + 1, name, c.events)?;
            }
        }

        if !self.comments.top_threads.is_empty() {
            writeln!(f, "  top threads:")?;
            for (i, t) in self.comments.top_threads.iter().enumerate() {
                writeln!(
                    f,
                    "    {}. {} on {} ({} replies)",
                    i + 1,
                    t.comment_id,
                    t.on_resource_id,
                    t.replies
                )?;
            }
        }

        let mine = &self.my_activity.kpis;
        writeln!(
            f,
            "  my activity:   {} individuals, {} comments",
            mine.individuals, mine.comments
        )?;
        Ok(())
    }
}
