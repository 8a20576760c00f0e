//! PDF Logical Structure (Tagged PDF) target tree.
//!
//! This module holds the structure tree the tagging engine writes into,
//! according to ISO 32000-1:2008 Section 14.7.
//!
//! ## Overview
//!
//! Tagged PDFs contain explicit document structure that defines reading order,
//! semantic meaning, and accessibility information. While a document is being
//! laid out, structure elements are created before their final position in
//! the tree is known. Such elements are kept in a *waiting* state: they stay
//! reachable by the hint they were created for and are not flushed until that
//! hint is released.
//!
//! ## Components
//!
//! - [`StructureTree`] / [`WaitingTagManager`]: the capabilities the tagging
//!   engine relies on, addressed through a [`TagCursor`]
//! - [`StructTree`]: in-memory implementation of both
//! - [`StructType`] / [`StructAttributes`]: standard roles and attribute objects
//! - [`traverse_structure_tree`]: pre-order (reading order) traversal
//!
//! ## Example
//!
//! ```
//! use pdf_tagging::structure::{StructTree, StructureTree, TagCursor};
//!
//! let mut tree = StructTree::new();
//! let mut cursor = TagCursor::at_root(&tree);
//! let table = tree.add_tag(&mut cursor, "Table", Vec::new());
//! tree.add_tag(&mut cursor, "TR", Vec::new());
//!
//! assert_eq!(tree.kid_roles(table), vec!["TR"]);
//! ```

mod tag_structure;
pub mod traversal;
mod tree;
mod types;

pub use tag_structure::{StructNodeId, StructureTree, TagCursor, TagStructure, WaitingTagManager};
pub use traversal::{OrderedElement, extract_reading_order, traverse_structure_tree};
pub use tree::{StructNodeDump, StructTree};
pub use types::{StructAttributes, StructType};
