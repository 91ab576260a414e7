//! Merge/deduplication: collapse raw query rows into canonical per-entity
//! records.
//!
//! The store answers one row per (entity, attribute) binding, so an entity
//! with a label, a class, and an update shows up as several partial rows. The
//! reducer here folds them into one record per entity id, preserving
//! first-sight insertion order — every downstream ranking breaks ties on that
//! order.
//!
//! Precedence is first-non-null-wins: the first row for an entity becomes the
//! canonical record, and later rows only fill fields still unset. Later rows
//! never overwrite, even when they carry newer timestamps; when rows disagree
//! the first-encountered value stands. Callers wanting a different precedence
//! must sort rows before merging.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::model::{CommentEvent, IndividualEvent};

/// A row type that can be folded into a canonical per-entity record.
pub trait Canonical {
    /// Entity identifier the record is keyed by.
    fn entity_id(&self) -> &str;

    /// Fill fields still unset on `self` from a later row for the same
    /// entity. Populated fields must be left untouched.
    fn fill_from(&mut self, later: Self);
}

/// Fold raw rows, in arrival order, into an insertion-ordered map of
/// canonical records. Pure: the same rows in the same order always produce
/// the same map.
pub fn merge<T: Canonical>(rows: impl IntoIterator<Item = T>) -> IndexMap<String, T> {
    let mut canonical: IndexMap<String, T> = IndexMap::new();
    for row in rows {
        match canonical.entry(row.entity_id().to_string()) {
            Entry::Occupied(mut slot) => slot.get_mut().fill_from(row),
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
        }
    }
    canonical
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

impl Canonical for IndividualEvent {
    fn entity_id(&self) -> &str {
        &self.entity_id
    }

    fn fill_from(&mut self, later: Self) {
        fill(&mut self.label, later.label);
        fill(&mut self.class_id, later.class_id);
        fill(&mut self.class_name, later.class_name);
        fill(&mut self.updated_by, later.updated_by);
        fill(&mut self.updated_at, later.updated_at);
    }
}

impl Canonical for CommentEvent {
    fn entity_id(&self) -> &str {
        &self.entity_id
    }

    fn fill_from(&mut self, later: Self) {
        fill(&mut self.body, later.body);
        fill(&mut self.class_id, later.class_id);
        fill(&mut self.class_name, later.class_name);
        fill(&mut self.updated_by, later.updated_by);
        fill(&mut self.updated_at, later.updated_at);
        fill(&mut self.reply_to_id, later.reply_to_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Timestamp;

    fn row(entity: &str, label: Option<&str>, updated_at: Option<&str>) -> IndividualEvent {
        IndividualEvent {
            entity_id: entity.into(),
            project_id: "P1".into(),
            label: label.map(str::to_string),
            class_id: None,
            class_name: None,
            created_by: "alice".into(),
            created_at: Timestamp::new("2026-01-10T00:00:00Z"),
            updated_by: None,
            updated_at: updated_at.map(Timestamp::new),
            visible_to: vec![],
        }
    }

    #[test]
    fn partial_rows_collapse_into_one_record() {
        let mut classed = row("E1", None, None);
        classed.class_id = Some("C1".into());
        classed.class_name = Some("Person".into());

        let merged = merge(vec![
            row("E1", Some("Imhotep"), None),
            classed,
            row("E1", None, Some("2026-01-12T00:00:00Z")),
        ]);

        assert_eq!(merged.len(), 1);
        let canonical = &merged["E1"];
        assert_eq!(canonical.label.as_deref(), Some("Imhotep"));
        assert_eq!(canonical.class_id.as_deref(), Some("C1"));
        assert_eq!(
            canonical.updated_at.as_ref().map(Timestamp::as_str),
            Some("2026-01-12T00:00:00Z")
        );
    }

    #[test]
    fn first_non_null_wins_on_disagreement() {
        // Later rows never overwrite, even with a newer update timestamp.
        let merged = merge(vec![
            row("E1", Some("first"), Some("2026-01-11T00:00:00Z")),
            row("E1", Some("second"), Some("2026-01-19T00:00:00Z")),
        ]);
        let canonical = &merged["E1"];
        assert_eq!(canonical.label.as_deref(), Some("first"));
        assert_eq!(
            canonical.updated_at.as_ref().map(Timestamp::as_str),
            Some("2026-01-11T00:00:00Z")
        );
    }

    #[test]
    fn merge_is_idempotent() {
        let rows = vec![
            row("E1", Some("a"), None),
            row("E1", None, Some("2026-01-12T00:00:00Z")),
            row("E2", None, None),
        ];
        let once = merge(rows.clone());
        let twice = merge(once.values().cloned().chain(rows).collect::<Vec<_>>());

        assert_eq!(once.len(), twice.len());
        for (id, canonical) in &once {
            assert_eq!(canonical.label, twice[id].label);
            assert_eq!(canonical.updated_at, twice[id].updated_at);
        }
    }

    #[test]
    fn permutations_agree_when_fields_do_not_collide() {
        let labelled = row("E1", Some("a"), None);
        let updated = row("E1", None, Some("2026-01-12T00:00:00Z"));

        let forward = merge(vec![labelled.clone(), updated.clone()]);
        let backward = merge(vec![updated, labelled]);

        assert_eq!(forward["E1"].label, backward["E1"].label);
        assert_eq!(forward["E1"].updated_at, backward["E1"].updated_at);
    }

    #[test]
    fn insertion_order_is_first_sight_order() {
        let merged = merge(vec![
            row("E2", None, None),
            row("E1", None, None),
            row("E2", Some("late detail"), None),
            row("E3", None, None),
        ]);
        let order: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["E2", "E1", "E3"]);
    }

    #[test]
    fn comment_rows_fill_reply_and_body() {
        let base = CommentEvent {
            entity_id: "C1".into(),
            project_id: "P1".into(),
            on_resource_id: "E1".into(),
            body: None,
            class_id: None,
            class_name: None,
            created_by: "alice".into(),
            created_at: Timestamp::new("2026-01-10T00:00:00Z"),
            updated_by: None,
            updated_at: None,
            reply_to_id: None,
            visible_to: vec![],
        };
        let mut with_body = base.clone();
        with_body.body = Some("looks wrong".into());
        let mut with_parent = base.clone();
        with_parent.reply_to_id = Some("C0".into());

        let merged = merge(vec![base, with_body, with_parent]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged["C1"].body.as_deref(), Some("looks wrong"));
        assert_eq!(merged["C1"].reply_to_id.as_deref(), Some("C0"));
    }
}
