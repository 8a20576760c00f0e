//! Benchmarks for building, finishing and releasing hint trees.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use pdf_tagging::config::TaggingConfig;
use pdf_tagging::structure::{StructTree, TagCursor};
use pdf_tagging::tagging::{AccessibleElement, HintKey, LayoutTaggingHelper, TaggableNode};

const SECTIONS: usize = 200;
const PARAGRAPHS_PER_SECTION: usize = 20;
const TABLE_ROWS: usize = 100;
const TABLE_COLS: usize = 8;

fn new_hint(helper: &mut LayoutTaggingHelper, element: AccessibleElement) -> HintKey {
    helper.get_or_create(&TaggableNode::renderer(Some(element)))
}

/// Sections with paragraphs; every paragraph gets its element in reverse order.
fn build_sections() -> (LayoutTaggingHelper, Vec<HintKey>) {
    let mut helper = LayoutTaggingHelper::new(TaggingConfig::default(), StructTree::new());
    let mut sections = Vec::with_capacity(SECTIONS);
    for _ in 0..SECTIONS {
        let section = new_hint(&mut helper, AccessibleElement::new("Sect"));
        let paragraphs: Vec<HintKey> = (0..PARAGRAPHS_PER_SECTION)
            .map(|_| new_hint(&mut helper, AccessibleElement::new("P")))
            .collect();
        helper.add_kids(section, &paragraphs, None);
        sections.push(section);
    }
    (helper, sections)
}

fn build_table() -> (LayoutTaggingHelper, HintKey) {
    let mut helper = LayoutTaggingHelper::new(TaggingConfig::default(), StructTree::new());
    let table = new_hint(&mut helper, AccessibleElement::table(true, false));
    let cells: Vec<HintKey> = (0..TABLE_ROWS * TABLE_COLS)
        .map(|i| new_hint(&mut helper, AccessibleElement::cell("TD", i / TABLE_COLS, i % TABLE_COLS)))
        .collect();
    helper.add_kids(table, &cells, None);
    (helper, table)
}

fn bench_build_sections(c: &mut Criterion) {
    c.bench_function("bench_build_sections", |b| {
        b.iter(|| {
            let (helper, sections) = build_sections();
            black_box((helper.tree().len(), sections.len()));
        });
    });
}

fn bench_materialize_reverse_order(c: &mut Criterion) {
    c.bench_function("bench_materialize_reverse_order", |b| {
        b.iter_batched(
            build_sections,
            |(mut helper, sections)| {
                for section in &sections {
                    let mut cursor = TagCursor::at_root(helper.structure());
                    helper.create_node(*section, &mut cursor);
                    for kid in helper.get_kids(*section).to_vec().into_iter().rev() {
                        let mut cursor = TagCursor::at_root(helper.structure());
                        helper.create_node(kid, &mut cursor);
                    }
                }
                black_box(helper);
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_table_grouping(c: &mut Criterion) {
    c.bench_function("bench_table_grouping", |b| {
        b.iter_batched(
            build_table,
            |(mut helper, table)| {
                black_box(helper.finish(table));
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_release_all(c: &mut Criterion) {
    c.bench_function("bench_release_all", |b| {
        b.iter_batched(
            build_sections,
            |(mut helper, sections)| {
                for section in sections {
                    for kid in helper.get_kids(section).to_vec() {
                        helper.finish(kid);
                    }
                    helper.finish(section);
                }
                black_box(helper.release_all().is_ok());
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_build_sections,
    bench_materialize_reverse_order,
    bench_table_grouping,
    bench_release_all
);
criterion_main!(benches);
