//! Collaborator interfaces of the target structure tree.
//!
//! The tagging engine never touches the document object model directly. It
//! works through a [`TagCursor`] (a position in the structure tree) and two
//! capabilities:
//!
//! - [`StructureTree`]: create, move, re-role and remove structure elements.
//! - [`WaitingTagManager`]: associate a hint with a structure element that must
//!   not be flushed yet ("waiting tag"), and find that element again later.
//!
//! [`crate::structure::StructTree`] implements both in memory.

use super::types::StructAttributes;
use crate::tagging::HintKey;
use serde::Serialize;
use std::any::Any;
use std::fmt;

/// Handle of a structure element inside a [`StructureTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StructNodeId(pub(crate) u32);

impl StructNodeId {
    /// Arena index of this element.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StructNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "elem{}", self.0)
    }
}

/// A position in the structure tree.
///
/// The cursor points at one structure element and optionally remembers the
/// kid index at which the next new element will be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagCursor {
    node: StructNodeId,
    next_kid_index: Option<usize>,
}

impl TagCursor {
    /// Create a cursor pointing at `node`.
    pub fn new(node: StructNodeId) -> Self {
        Self {
            node,
            next_kid_index: None,
        }
    }

    /// Create a cursor pointing at the root of `tree`.
    pub fn at_root(tree: &(impl StructureTree + ?Sized)) -> Self {
        Self::new(tree.root())
    }

    /// Element the cursor points at.
    pub fn node(&self) -> StructNodeId {
        self.node
    }

    /// Move the cursor onto another element. Resets the insertion index.
    pub fn move_to(&mut self, node: StructNodeId) {
        self.node = node;
        self.next_kid_index = None;
    }

    /// Index at which the next added kid is inserted (`None` = append).
    pub fn next_kid_index(&self) -> Option<usize> {
        self.next_kid_index
    }

    /// Set the index for the next kid insertion.
    pub fn set_next_kid_index(&mut self, index: Option<usize>) {
        self.next_kid_index = index;
    }

    /// Check whether both cursors point at the same element.
    pub fn is_pointing_to_same_tag(&self, other: &TagCursor) -> bool {
        self.node == other.node
    }
}

/// Structure element operations the tagging engine needs.
pub trait StructureTree {
    /// Root element of the tree.
    fn root(&self) -> StructNodeId;

    /// Add a new element as a kid of the cursor's element, at the cursor's
    /// next-kid index (append when unset), and move the cursor onto it.
    fn add_tag(
        &mut self,
        cursor: &mut TagCursor,
        role: &str,
        attributes: Vec<StructAttributes>,
    ) -> StructNodeId;

    /// Role of an element, `None` for unknown or removed elements.
    fn role(&self, node: StructNodeId) -> Option<&str>;

    /// Change the role of an element.
    fn set_role(&mut self, node: StructNodeId, role: &str);

    /// Attribute objects of an element.
    fn attributes(&self, node: StructNodeId) -> &[StructAttributes];

    /// Mutable attribute objects of an element (`None` if flushed or removed).
    fn attributes_mut(&mut self, node: StructNodeId) -> Option<&mut Vec<StructAttributes>>;

    /// Parent element, `None` for the root and detached elements.
    fn parent(&self, node: StructNodeId) -> Option<StructNodeId>;

    /// Kid elements in order.
    fn kids(&self, node: StructNodeId) -> &[StructNodeId];

    /// Position of an element among its parent's kids.
    fn index_in_parent(&self, node: StructNodeId) -> Option<usize>;

    /// Move `node` under the cursor's element at the cursor's next-kid index.
    ///
    /// Returns false when the move is impossible (flushed element, or the
    /// target lies inside `node`).
    fn relocate(&mut self, node: StructNodeId, target: &TagCursor) -> bool;

    /// Remove an element; its kids take its place in the parent.
    fn remove_tag(&mut self, node: StructNodeId);

    /// Whether the element has been flushed (finally written).
    fn is_flushed(&self, node: StructNodeId) -> bool;
}

/// Waiting-state bookkeeping: hints whose elements must stay unflushed.
pub trait WaitingTagManager {
    /// Move the cursor onto the element waiting for `hint`.
    ///
    /// Returns false (cursor untouched) when no such element exists yet.
    fn try_attach(&self, cursor: &mut TagCursor, hint: HintKey) -> bool;

    /// Associate the cursor's element with `hint`.
    fn assign(&mut self, cursor: &TagCursor, hint: HintKey);

    /// Drop the waiting state of `hint`, returning its element.
    fn remove(&mut self, hint: HintKey) -> Option<StructNodeId>;

    /// Flush the cursor's element and then its ancestors, as long as each is
    /// not waiting and all of its kids are flushed.
    fn flush_if_all_kids_flushed(&mut self, cursor: &TagCursor);
}

/// A structure tree with waiting-tag support.
pub trait TagStructure: StructureTree + WaitingTagManager {
    /// The implementation as [`Any`], for access to its concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl<T: StructureTree + WaitingTagManager + 'static> TagStructure for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
