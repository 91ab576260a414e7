//! Benchmarks for merge and section construction.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use wadjet::merge::merge;
use wadjet::model::{CommentEvent, IndividualEvent, Timestamp};
use wadjet::report::{comments, governance};

fn individual_rows(count: usize) -> Vec<IndividualEvent> {
    (0..count)
        .map(|i| IndividualEvent {
            // Every entity shows up as two partial rows.
            entity_id: format!("E{}", i / 2),
            project_id: format!("P{}", i % 7),
            label: (i % 2 == 0).then(|| format!("label {i}")),
            class_id: (i % 3 == 0).then(|| format!("C{}", i % 11)),
            class_name: None,
            created_by: format!("user{}", i % 23),
            created_at: Timestamp::new(format!("2026-01-{:02}T00:00:00Z", i % 28 + 1)),
            updated_by: (i % 5 == 0).then(|| format!("user{}", (i + 1) % 23)),
            updated_at: (i % 5 == 0).then(|| Timestamp::new("2026-01-29T00:00:00Z")),
            visible_to: vec![],
        })
        .collect()
}

fn comment_rows(count: usize) -> Vec<CommentEvent> {
    (0..count)
        .map(|i| CommentEvent {
            entity_id: format!("C{i}"),
            project_id: format!("P{}", i % 7),
            on_resource_id: format!("E{}", i % 50),
            body: Some("bench body".into()),
            class_id: None,
            class_name: None,
            created_by: format!("user{}", i % 23),
            created_at: Timestamp::new(format!("2026-01-{:02}T00:00:00Z", i % 28 + 1)),
            updated_by: None,
            updated_at: None,
            reply_to_id: (i % 3 == 0 && i > 0).then(|| format!("C{}", i - 1)),
            visible_to: vec![],
        })
        .collect()
}

fn bench_merge(c: &mut Criterion) {
    let rows = individual_rows(10_000);
    c.bench_function("merge_10k_rows", |bench| {
        bench.iter(|| black_box(merge(rows.clone())))
    });
}

fn bench_governance(c: &mut Criterion) {
    let individuals = merge(individual_rows(10_000));
    let comment_map = merge(comment_rows(2_000));
    c.bench_function("governance_section_5k_entities", |bench| {
        bench.iter(|| black_box(governance::build(&individuals, &comment_map)))
    });
}

fn bench_comment_threads(c: &mut Criterion) {
    let comment_map = merge(comment_rows(5_000));
    c.bench_function("comment_threads_5k", |bench| {
        bench.iter(|| black_box(comments::build(&comment_map)))
    });
}

criterion_group!(benches, bench_merge, bench_governance, bench_comment_threads);
criterion_main!(benches);
