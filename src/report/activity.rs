//! My-activity section: the requester's own footprint inside the scope.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{CommentEvent, IndividualEvent};

use super::TOP_FIVE;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyActivityKpis {
    /// Individuals the requester created or edited, in-window.
    pub individuals: usize,
    /// Comments the requester created or edited, in-window.
    pub comments: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyActivitySection {
    pub kpis: MyActivityKpis,
    /// The five most recently touched individuals, newest first.
    pub last_individuals: Vec<IndividualEvent>,
    /// The five most recently touched comments, newest first.
    pub last_comments: Vec<CommentEvent>,
}

/// Build the my-activity section for `requester_id`.
///
/// Events qualify when the requester authored or edited them; recency is
/// `updated_at` falling back to `created_at`, compared as ISO strings
/// descending. The sort is stable, so equal stamps keep merged-map order.
pub fn build(
    requester_id: &str,
    individuals: &IndexMap<String, IndividualEvent>,
    comments: &IndexMap<String, CommentEvent>,
) -> MyActivitySection {
    let mut mine_individuals: Vec<IndividualEvent> = individuals
        .values()
        .filter(|e| touched_by(requester_id, &e.created_by, e.updated_by.as_deref()))
        .cloned()
        .collect();
    let mut mine_comments: Vec<CommentEvent> = comments
        .values()
        .filter(|c| touched_by(requester_id, &c.created_by, c.updated_by.as_deref()))
        .cloned()
        .collect();

    let kpis = MyActivityKpis {
        individuals: mine_individuals.len(),
        comments: mine_comments.len(),
    };

    mine_individuals.sort_by(|a, b| b.touched_at().cmp(a.touched_at()));
    mine_individuals.truncate(TOP_FIVE);
    mine_comments.sort_by(|a, b| b.touched_at().cmp(a.touched_at()));
    mine_comments.truncate(TOP_FIVE);

    MyActivitySection {
        kpis,
        last_individuals: mine_individuals,
        last_comments: mine_comments,
    }
}

fn touched_by(requester_id: &str, created_by: &str, updated_by: Option<&str>) -> bool {
    created_by == requester_id || updated_by == Some(requester_id)
}
