//! Governance section: who and what is driving change — members, threads,
//! individuals, and classes.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{CommentEvent, IndividualEvent};

use super::{
    ContributorRank, TOP_FIVE, ThreadRank, contributor_counts, contributor_ranks, rank_top_n,
    reply_counts, thread_ranks,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceKpis {
    /// Distinct creators and updaters across both event kinds.
    pub active_members: usize,
    pub individuals: usize,
    pub comments: usize,
}

/// One entity's position in the interaction ranking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualRank {
    pub entity_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// One per comment referencing the entity plus one per individual event
    /// on it.
    pub interactions: usize,
}

/// One class's position in the tagging ranking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRank {
    pub class_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Individual and comment events tagged with the class.
    pub events: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceSection {
    pub kpis: GovernanceKpis,
    pub top_users: Vec<ContributorRank>,
    pub top_threads: Vec<ThreadRank>,
    pub top_individuals: Vec<IndividualRank>,
    pub top_classes: Vec<ClassRank>,
}

/// Build the governance section from the canonical event maps.
pub fn build(
    individuals: &IndexMap<String, IndividualEvent>,
    comments: &IndexMap<String, CommentEvent>,
) -> GovernanceSection {
    let counts = contributor_counts(individuals, comments);

    let kpis = GovernanceKpis {
        active_members: counts.len(),
        individuals: individuals.len(),
        comments: comments.len(),
    };

    let top_users = contributor_ranks(rank_top_n(counts, TOP_FIVE));
    let top_threads = thread_ranks(comments, rank_top_n(reply_counts(comments), TOP_FIVE));

    GovernanceSection {
        kpis,
        top_users,
        top_threads,
        top_individuals: top_individuals(individuals, comments),
        top_classes: top_classes(individuals, comments),
    }
}

/// Entities ranked by interaction count: one per individual event on the
/// entity plus one per comment attached to it. Entities only ever mentioned
/// by comments still rank.
fn top_individuals(
    individuals: &IndexMap<String, IndividualEvent>,
    comments: &IndexMap<String, CommentEvent>,
) -> Vec<IndividualRank> {
    let mut interactions: IndexMap<String, usize> =
        individuals.keys().map(|id| (id.clone(), 1)).collect();
    for comment in comments.values() {
        *interactions
            .entry(comment.on_resource_id.clone())
            .or_insert(0) += 1;
    }

    rank_top_n(interactions, TOP_FIVE)
        .into_iter()
        .map(|(entity_id, count)| IndividualRank {
            label: individuals.get(&entity_id).and_then(|e| e.label.clone()),
            entity_id,
            interactions: count,
        })
        .collect()
}

/// Classes ranked by how many events carry their tag. The first non-null
/// class name seen for a class id labels the row.
fn top_classes(
    individuals: &IndexMap<String, IndividualEvent>,
    comments: &IndexMap<String, CommentEvent>,
) -> Vec<ClassRank> {
    let mut events: IndexMap<String, usize> = IndexMap::new();
    let mut names: HashMap<String, String> = HashMap::new();

    let tagged = individuals
        .values()
        .map(|e| (&e.class_id, &e.class_name))
        .chain(comments.values().map(|c| (&c.class_id, &c.class_name)));
    for (class_id, class_name) in tagged {
        let Some(class_id) = class_id else { continue };
        *events.entry(class_id.clone()).or_insert(0) += 1;
        if let Some(name) = class_name {
            names.entry(class_id.clone()).or_insert_with(|| name.clone());
        }
    }

    rank_top_n(events, TOP_FIVE)
        .into_iter()
        .map(|(class_id, count)| ClassRank {
            class_name: names.get(&class_id).cloned(),
            class_id,
            events: count,
        })
        .collect()
}
