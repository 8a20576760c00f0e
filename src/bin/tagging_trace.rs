//! Tagging Trace
//!
//! Builds a small tagged document (a heading with a nested paragraph and a
//! table with a header row), finishes and releases it, and prints the hint
//! tree and the resulting structure tree as JSON.
//!
//! Usage:
//!   cargo run --bin tagging_trace
//!   cargo run --bin tagging_trace -- --pdf-version 1.4
//!   cargo run --bin tagging_trace -- --config tagging.json
//!   RUST_LOG=debug cargo run --bin tagging_trace

use pdf_tagging::config::{PdfVersion, TaggingConfig};
use pdf_tagging::structure::{StructTree, StructureTree, TagCursor, traverse_structure_tree};
use pdf_tagging::tagging::{
    AccessibleElement, FinishTrigger, HintKey, HintOwner, LayoutTaggingHelper, TaggableNode,
};

fn config_from_args() -> Result<TaggingConfig, Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let mut config = TaggingConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                if let Some(path) = args.get(i) {
                    config = TaggingConfig::from_file(path)?;
                }
            },
            "--pdf-version" => {
                i += 1;
                if let Some(version) = args.get(i) {
                    let version = PdfVersion::from_str(version)
                        .ok_or_else(|| format!("Unknown PDF version: {}", version))?;
                    config = config.with_pdf_version(version);
                }
            },
            _ => {},
        }
        i += 1;
    }
    Ok(config)
}

fn draw(helper: &mut LayoutTaggingHelper, key: HintKey) {
    let mut cursor = TagCursor::at_root(helper.structure());
    helper.create_node(key, &mut cursor);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = config_from_args()?;
    println!("Tagging for {}", config.pdf_version);
    let mut helper = LayoutTaggingHelper::new(config, StructTree::new());

    // Heading with a paragraph nested in it
    let heading = TaggableNode::element(AccessibleElement::new("H1"));
    let subtitle = TaggableNode::element(AccessibleElement::new("P"));
    helper.add_owner_kids(&heading, &[&subtitle], None);

    // Table with a header row and two body rows
    let table = TaggableNode::element(AccessibleElement::table(true, false));
    let header = TaggableNode::element(AccessibleElement::new("THead"));
    let header_cells: Vec<TaggableNode> = (0..2)
        .map(|col| TaggableNode::element(AccessibleElement::cell("TH", 0, col)))
        .collect();
    let body_cells: Vec<TaggableNode> = (0..4)
        .map(|i| TaggableNode::element(AccessibleElement::cell("TD", i / 2, i % 2)))
        .collect();

    let header_refs: Vec<&dyn HintOwner> = header_cells.iter().map(|c| c as &dyn HintOwner).collect();
    helper.add_owner_kids(&header, &header_refs, None);

    let mut table_kids: Vec<&dyn HintOwner> = vec![&header];
    table_kids.extend(body_cells.iter().map(|c| c as &dyn HintOwner));
    helper.add_owner_kids(&table, &table_kids, None);

    let h1 = helper.get_or_create(&heading);
    helper.resolve_role_conflicts_in_subtree(h1);

    // Draw content out of order: the table first, then the heading.
    for cell in body_cells.iter().rev() {
        let mut cursor = TagCursor::at_root(helper.structure());
        helper.create_owner_node(cell, &mut cursor);
    }
    let table_key = helper.get_or_create(&table);
    draw(&mut helper, table_key);
    draw(&mut helper, h1);
    let p = helper.get_or_create(&subtitle);
    draw(&mut helper, p);

    for owner in header_cells.iter().chain(body_cells.iter()) {
        helper.finish_owner(owner, FinishTrigger::Element);
    }
    helper.finish_owner(&header, FinishTrigger::Element);
    helper.finish_owner(&table, FinishTrigger::Element);

    println!("\nHint tree before release:");
    println!("{}", serde_json::to_string_pretty(&helper.hint_tree_dump())?);

    let released = helper.release_finished();
    println!("\nReleased {} hint(s) while the heading is still open", released.len());

    helper.finish_owner(&subtitle, FinishTrigger::Element);
    helper.finish_owner(&heading, FinishTrigger::Element);
    helper.release_all()?;

    for problem in helper.diagnostics() {
        println!("Diagnostic: {}", problem);
    }

    let structure = helper
        .structure_as::<StructTree>()
        .ok_or("structure tree has an unexpected type")?;
    println!("\nStructure tree:");
    println!("{}", serde_json::to_string_pretty(&structure.dump(structure.root()))?);
    println!("\nReading order:");
    for element in traverse_structure_tree(structure, structure.root()) {
        println!("{}/{}", "  ".repeat(element.depth - 1), element.role);
    }
    println!("\nFlushed {} element(s)", structure.flush_order().len());

    Ok(())
}
