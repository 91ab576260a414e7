//! Comments section: thread activity across the scope.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::CommentEvent;

use super::{TOP_TEN, ThreadRank, rank_top_n, reply_counts, thread_rank, thread_ranks};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsSection {
    /// Comments ranked by direct replies, top ten.
    pub top_threads: Vec<ThreadRank>,
    /// Root comments nobody has answered, in map order.
    pub threads_without_reply: Vec<ThreadRank>,
    /// Root comments newest first, top ten, each with its reply count.
    pub recent_threads: Vec<ThreadRank>,
}

/// Build the comments section from the canonical comment map.
pub fn build(comments: &IndexMap<String, CommentEvent>) -> CommentsSection {
    let replies = reply_counts(comments);

    let top_threads = thread_ranks(comments, rank_top_n(replies.clone(), TOP_TEN));

    let threads_without_reply = comments
        .values()
        .filter(|c| c.is_root() && replies.get(&c.entity_id).copied().unwrap_or(0) == 0)
        .map(|c| thread_rank(c, 0))
        .collect();

    let mut roots: Vec<&CommentEvent> = comments.values().filter(|c| c.is_root()).collect();
    roots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    roots.truncate(TOP_TEN);
    let recent_threads = roots
        .into_iter()
        .map(|c| thread_rank(c, replies.get(&c.entity_id).copied().unwrap_or(0)))
        .collect();

    CommentsSection {
        top_threads,
        threads_without_reply,
        recent_threads,
    }
}
