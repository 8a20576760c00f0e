//! Structure tree traversal for extracting reading order.
//!
//! Implements pre-order traversal of a [`StructureTree`] to list elements in
//! document order.

use super::tag_structure::{StructNodeId, StructureTree};
use super::types::StructType;

/// An element visited during pre-order traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedElement {
    /// Element handle
    pub node: StructNodeId,

    /// Structure role
    pub role: String,

    /// Depth below the traversal start (its direct kids have depth 1)
    pub depth: usize,

    /// Is this a heading?
    pub is_heading: bool,
}

/// Traverse the tree below `start` and list its descendants in reading order.
///
/// This performs a pre-order traversal: each element is listed before its
/// kids, kids are visited in order. `start` itself is not listed.
pub fn traverse_structure_tree(
    tree: &(impl StructureTree + ?Sized),
    start: StructNodeId,
) -> Vec<OrderedElement> {
    let mut result = Vec::new();
    traverse_element(tree, start, 1, &mut result);
    result
}

/// Recursively traverse the kids of a structure element.
fn traverse_element(
    tree: &(impl StructureTree + ?Sized),
    elem: StructNodeId,
    depth: usize,
    result: &mut Vec<OrderedElement>,
) {
    for kid in tree.kids(elem) {
        let role = tree.role(*kid).unwrap_or_default().to_string();
        let is_heading = StructType::from_str(&role).is_heading();
        result.push(OrderedElement {
            node: *kid,
            role,
            depth,
            is_heading,
        });
        traverse_element(tree, *kid, depth + 1, result);
    }
}

/// List the roles of all elements in reading order.
///
/// This is a simpler interface that just returns the role names, which is
/// handy for comparing tree shapes.
pub fn extract_reading_order(tree: &(impl StructureTree + ?Sized)) -> Vec<String> {
    traverse_structure_tree(tree, tree.root())
        .into_iter()
        .map(|e| e.role)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{StructTree, TagCursor};

    #[test]
    fn test_simple_traversal() {
        // Document
        //   ├─ P
        //   └─ P
        let mut tree = StructTree::new();
        let mut cursor = TagCursor::at_root(&tree);
        tree.add_tag(&mut cursor, "P", Vec::new());
        let mut cursor = TagCursor::at_root(&tree);
        tree.add_tag(&mut cursor, "P", Vec::new());

        assert_eq!(extract_reading_order(&tree), vec!["P", "P"]);
    }

    #[test]
    fn test_nested_structure() {
        // Document
        //   └─ Sect
        //       ├─ H1
        //       └─ P
        let mut tree = StructTree::new();
        let mut cursor = TagCursor::at_root(&tree);
        let sect = tree.add_tag(&mut cursor, "Sect", Vec::new());
        tree.add_tag(&mut cursor, "H1", Vec::new());
        let mut cursor = TagCursor::new(sect);
        tree.add_tag(&mut cursor, "P", Vec::new());

        let ordered = traverse_structure_tree(&tree, tree.root());
        let shape: Vec<(&str, usize)> = ordered.iter().map(|e| (e.role.as_str(), e.depth)).collect();
        assert_eq!(shape, vec![("Sect", 1), ("H1", 2), ("P", 2)]);
        assert!(ordered[1].is_heading);
        assert!(!ordered[2].is_heading);
    }
}
