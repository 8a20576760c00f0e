//! In-memory structure tree.
//!
//! [`StructTree`] is the arena-backed target of the tagging engine. It keeps
//! the StructTreeRoot-like hierarchy, the waiting-tag associations and the
//! order in which elements were flushed. Encoding the flushed elements into
//! PDF objects is left to the writer.

use super::tag_structure::{StructNodeId, StructureTree, TagCursor, WaitingTagManager};
use super::types::{StructAttributes, StructType};
use crate::tagging::HintKey;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct StructNode {
    role: String,
    attributes: Vec<StructAttributes>,
    parent: Option<StructNodeId>,
    kids: Vec<StructNodeId>,
    flushed: bool,
    removed: bool,
}

impl StructNode {
    fn new(role: &str, attributes: Vec<StructAttributes>, parent: Option<StructNodeId>) -> Self {
        Self {
            role: role.to_string(),
            attributes,
            parent,
            kids: Vec::new(),
            flushed: false,
            removed: false,
        }
    }
}

/// Arena-backed structure tree with waiting-tag bookkeeping.
#[derive(Debug, Clone)]
pub struct StructTree {
    nodes: Vec<StructNode>,
    waiting: HashMap<HintKey, StructNodeId>,
    waiting_hints: HashMap<StructNodeId, HintKey>,
    flush_order: Vec<StructNodeId>,
}

impl StructTree {
    /// Create a tree whose root element is a `Document`.
    pub fn new() -> Self {
        Self::with_root_role(StructType::Document.as_str())
    }

    /// Create a tree with a custom root role.
    pub fn with_root_role(role: &str) -> Self {
        Self {
            nodes: vec![StructNode::new(role, Vec::new(), None)],
            waiting: HashMap::new(),
            waiting_hints: HashMap::new(),
            flush_order: Vec::new(),
        }
    }

    /// Number of live (not removed) elements, root included.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| !n.removed).count()
    }

    /// Check if the tree only holds its root.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].kids.is_empty()
    }

    /// Elements in the order they were flushed.
    pub fn flush_order(&self) -> &[StructNodeId] {
        &self.flush_order
    }

    /// Element currently waiting for `hint`.
    pub fn waiting_node(&self, hint: HintKey) -> Option<StructNodeId> {
        self.waiting.get(&hint).copied()
    }

    /// Number of elements in waiting state.
    pub fn waiting_count(&self) -> usize {
        self.waiting.len()
    }

    /// Whether the element was removed from the tree.
    pub fn is_removed(&self, node: StructNodeId) -> bool {
        self.node(node).map_or(true, |n| n.removed)
    }

    /// Roles of an element's kids, in order.
    pub fn kid_roles(&self, node: StructNodeId) -> Vec<&str> {
        self.kids(node)
            .iter()
            .filter_map(|kid| self.role(*kid))
            .collect()
    }

    /// Flush every remaining element, leaves first. Waiting states are
    /// dropped. Used when the document is closed.
    pub fn flush_all(&mut self) {
        self.waiting.clear();
        self.waiting_hints.clear();
        let root = self.root();
        self.flush_subtree(root);
    }

    /// Snapshot of the subtree under `node` for diagnostics.
    pub fn dump(&self, node: StructNodeId) -> StructNodeDump {
        let (role, attributes, flushed) = match self.node(node) {
            Some(n) => (n.role.clone(), n.attributes.clone(), n.flushed),
            None => (String::new(), Vec::new(), false),
        };
        StructNodeDump {
            id: node,
            role,
            attributes,
            flushed,
            waiting: self.waiting_hints.contains_key(&node),
            kids: self.kids(node).iter().map(|kid| self.dump(*kid)).collect(),
        }
    }

    fn flush_subtree(&mut self, node: StructNodeId) {
        let kids = self.kids(node).to_vec();
        for kid in kids {
            self.flush_subtree(kid);
        }
        if node != self.root() {
            self.mark_flushed(node);
        }
    }

    fn mark_flushed(&mut self, node: StructNodeId) {
        if let Some(n) = self.nodes.get_mut(node.index()) {
            if !n.flushed {
                n.flushed = true;
                self.flush_order.push(node);
            }
        }
    }

    fn node(&self, node: StructNodeId) -> Option<&StructNode> {
        self.nodes.get(node.index())
    }

    fn node_mut(&mut self, node: StructNodeId) -> Option<&mut StructNode> {
        self.nodes.get_mut(node.index()).filter(|n| !n.removed)
    }

    fn is_inside(&self, node: StructNodeId, ancestor: StructNodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    fn detach(&mut self, node: StructNodeId) -> Option<(StructNodeId, usize)> {
        let parent = self.parent(node)?;
        let index = self.index_in_parent(node)?;
        if let Some(p) = self.node_mut(parent) {
            p.kids.remove(index);
        }
        if let Some(n) = self.node_mut(node) {
            n.parent = None;
        }
        Some((parent, index))
    }

    fn insert_kid(&mut self, parent: StructNodeId, index: Option<usize>, kid: StructNodeId) {
        if let Some(p) = self.node_mut(parent) {
            let at = index.map_or(p.kids.len(), |i| i.min(p.kids.len()));
            p.kids.insert(at, kid);
        }
        if let Some(n) = self.node_mut(kid) {
            n.parent = Some(parent);
        }
    }

    fn drop_waiting_of_node(&mut self, node: StructNodeId) {
        if let Some(hint) = self.waiting_hints.remove(&node) {
            self.waiting.remove(&hint);
        }
    }
}

impl Default for StructTree {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureTree for StructTree {
    fn root(&self) -> StructNodeId {
        StructNodeId(0)
    }

    fn add_tag(
        &mut self,
        cursor: &mut TagCursor,
        role: &str,
        attributes: Vec<StructAttributes>,
    ) -> StructNodeId {
        let parent = cursor.node();
        if self.node(parent).map_or(true, |n| n.flushed) {
            log::warn!("Adding a kid to flushed or unknown structure element {}", parent);
        }
        let id = StructNodeId(self.nodes.len() as u32);
        self.nodes.push(StructNode::new(role, attributes, None));
        self.insert_kid(parent, cursor.next_kid_index(), id);
        cursor.move_to(id);
        log::debug!("Created structure element {} /{} under {}", id, role, parent);
        id
    }

    fn role(&self, node: StructNodeId) -> Option<&str> {
        self.node(node)
            .filter(|n| !n.removed)
            .map(|n| n.role.as_str())
    }

    fn set_role(&mut self, node: StructNodeId, role: &str) {
        match self.node_mut(node) {
            Some(n) if !n.flushed => n.role = role.to_string(),
            _ => log::warn!("Cannot change role of flushed or removed element {}", node),
        }
    }

    fn attributes(&self, node: StructNodeId) -> &[StructAttributes] {
        self.node(node).map_or(&[], |n| n.attributes.as_slice())
    }

    fn attributes_mut(&mut self, node: StructNodeId) -> Option<&mut Vec<StructAttributes>> {
        self.node_mut(node)
            .filter(|n| !n.flushed)
            .map(|n| &mut n.attributes)
    }

    fn parent(&self, node: StructNodeId) -> Option<StructNodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    fn kids(&self, node: StructNodeId) -> &[StructNodeId] {
        self.node(node).map_or(&[], |n| n.kids.as_slice())
    }

    fn index_in_parent(&self, node: StructNodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.kids(parent).iter().position(|k| *k == node)
    }

    fn relocate(&mut self, node: StructNodeId, target: &TagCursor) -> bool {
        if node == self.root() || self.is_removed(node) {
            return false;
        }
        if self.node(node).map_or(true, |n| n.flushed) {
            log::warn!("Cannot relocate flushed structure element {}", node);
            return false;
        }
        if self.is_inside(target.node(), node) {
            log::warn!("Cannot relocate {} into its own subtree", node);
            return false;
        }
        let mut index = target.next_kid_index();
        if let Some((old_parent, old_index)) = self.detach(node) {
            // Indices were computed with `node` still in place.
            if old_parent == target.node() {
                index = index.map(|i| if old_index < i { i - 1 } else { i });
            }
        }
        self.insert_kid(target.node(), index, node);
        true
    }

    fn remove_tag(&mut self, node: StructNodeId) {
        if node == self.root() || self.is_removed(node) {
            return;
        }
        self.drop_waiting_of_node(node);
        let kids = self.kids(node).to_vec();
        match self.detach(node) {
            Some((parent, index)) => {
                for (offset, kid) in kids.iter().enumerate() {
                    self.insert_kid(parent, Some(index + offset), *kid);
                }
            },
            None => {
                for kid in &kids {
                    if let Some(n) = self.node_mut(*kid) {
                        n.parent = None;
                    }
                }
            },
        }
        if let Some(n) = self.node_mut(node) {
            n.kids.clear();
            n.removed = true;
        }
        log::debug!("Removed structure element {}", node);
    }

    fn is_flushed(&self, node: StructNodeId) -> bool {
        self.node(node).map_or(false, |n| n.flushed)
    }
}

impl WaitingTagManager for StructTree {
    fn try_attach(&self, cursor: &mut TagCursor, hint: HintKey) -> bool {
        match self.waiting.get(&hint) {
            Some(node) if !self.is_removed(*node) => {
                cursor.move_to(*node);
                true
            },
            _ => false,
        }
    }

    fn assign(&mut self, cursor: &TagCursor, hint: HintKey) {
        let node = cursor.node();
        if let Some(previous) = self.waiting.remove(&hint) {
            self.waiting_hints.remove(&previous);
        }
        self.drop_waiting_of_node(node);
        self.waiting.insert(hint, node);
        self.waiting_hints.insert(node, hint);
    }

    fn remove(&mut self, hint: HintKey) -> Option<StructNodeId> {
        let node = self.waiting.remove(&hint)?;
        self.waiting_hints.remove(&node);
        Some(node)
    }

    fn flush_if_all_kids_flushed(&mut self, cursor: &TagCursor) {
        let mut current = Some(cursor.node());
        while let Some(node) = current {
            if node == self.root() || self.waiting_hints.contains_key(&node) {
                break;
            }
            let Some(n) = self.node(node).filter(|n| !n.removed) else {
                break;
            };
            if !n.flushed {
                let all_kids_flushed = n.kids.iter().all(|k| self.is_flushed(*k));
                if !all_kids_flushed {
                    break;
                }
                self.mark_flushed(node);
            }
            current = self.parent(node);
        }
    }
}

/// Serializable snapshot of a structure subtree.
#[derive(Debug, Clone, Serialize)]
pub struct StructNodeDump {
    /// Element handle
    pub id: StructNodeId,
    /// Structure role
    pub role: String,
    /// Attribute objects
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<StructAttributes>,
    /// Whether the element was flushed
    pub flushed: bool,
    /// Whether the element is in waiting state
    pub waiting: bool,
    /// Kid elements
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kids: Vec<StructNodeDump>,
}
