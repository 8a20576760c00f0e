//! Lazy creation of structure elements for hints.
//!
//! A hint gets its structure element the first time tagged content is drawn
//! for it (or for one of its kids). Elements are always placed relative to
//! the nearest following sibling that already has an element, so that the
//! kid order of every structure element follows the accessible kid order of
//! its hint, no matter in which order the elements were created.

use super::helper::LayoutTaggingHelper;
use super::hint::{HintKey, HintOwner};
use crate::error::{Error, Result};
use crate::structure::{StructNodeId, TagCursor};
use log::debug;

impl LayoutTaggingHelper {
    /// Create the structure element of a hint, moving `cursor` onto it.
    ///
    /// Returns false if nothing was created: artifacts, hints that already
    /// have an element (the cursor is moved onto it), and non-accessible
    /// hints (the cursor is moved onto the element of the nearest accessible
    /// ancestor, if there is one).
    pub fn create_node(&mut self, hint: HintKey, cursor: &mut TagCursor) -> bool {
        let data = self.tree.data(hint);
        if data.is_artifact() {
            return false;
        }
        if !data.is_accessible() {
            if let Some(parent) = self.tree.accessible_parent(hint) {
                self.structure.try_attach(cursor, parent);
            }
            return false;
        }
        if self.structure.try_attach(cursor, hint) {
            return false;
        }

        let role = data.effective_role().unwrap_or_default().to_string();
        let attributes = data.element().map(|e| e.attributes.clone()).unwrap_or_default();

        if let Some(parent) = self.tree.accessible_parent(hint) {
            if let Some(parent_node) = self.node_of(parent) {
                cursor.move_to(parent_node);
                let index = self.nearest_next_sibling_index(hint, parent_node);
                cursor.set_next_kid_index(index);
            }
        }

        let node = self.structure.add_tag(cursor, &role, attributes);
        self.structure.assign(cursor, hint);
        debug!("Materialized hint {} as {} /{}", hint, node, role);

        for kid in self.tree.accessible_kids(hint) {
            if self.tree.data(kid).is_dummy() {
                let mut kid_cursor = *cursor;
                self.create_node(kid, &mut kid_cursor);
            }
            self.move_kid_node_if_created(hint, kid);
        }
        true
    }

    /// Create the structure element for an owner's hint.
    ///
    /// An owner without a hint gets one on the fly; that hint is not part of
    /// the tree, so it is finished at once and its element is not kept waiting.
    pub fn create_owner_node(&mut self, owner: &dyn HintOwner, cursor: &mut TagCursor) -> bool {
        let had_key = self.get_key(owner).is_some();
        let key = self.get_or_create(owner);
        let created = self.create_node(key, cursor);
        if !had_key {
            self.set_finished(key);
            self.structure.remove(key);
        }
        created
    }

    /// Structure element of a hint.
    ///
    /// Fails with [`Error::MaterializationDeferred`] while the element has not
    /// been created; retry after [`create_node`](Self::create_node).
    pub fn structure_node(&self, key: HintKey) -> Result<StructNodeId> {
        self.node_of(key).ok_or(Error::MaterializationDeferred(key))
    }

    /// Check if a structure element exists for a hint.
    pub fn has_node(&self, key: HintKey) -> bool {
        self.node_of(key).is_some()
    }

    /// Attach kids below a structure element that exists outside the hint
    /// tree.
    ///
    /// The element is represented by one dummy hint with the element's role;
    /// the kids are added to that dummy.
    pub fn add_kids_to_existing_tag(&mut self, cursor: &TagCursor, kids: &[HintKey]) {
        let node = cursor.node();
        let dummy = match self.existing_tag_dummies.get(&node) {
            Some(dummy) => *dummy,
            None => {
                let role = self.structure.role(node).map(str::to_string);
                let dummy = self.create_dummy(role.as_deref());
                self.structure.assign(cursor, dummy);
                self.existing_tag_dummies.insert(node, dummy);
                debug!("Hint {} stands in for existing element {}", dummy, node);
                dummy
            },
        };
        self.add_kids(dummy, kids, None);
    }

    pub(super) fn node_of(&self, key: HintKey) -> Option<StructNodeId> {
        let mut cursor = TagCursor::at_root(&*self.structure);
        self.structure
            .try_attach(&mut cursor, key)
            .then(|| cursor.node())
    }

    /// Remove the element of a hint, lifting its kids into its parent.
    pub fn discard_node(&mut self, key: HintKey) {
        if let Some(node) = self.structure.remove(key) {
            debug!("Discarding element {} of hint {}", node, key);
            self.structure.remove_tag(node);
        }
    }

    /// Index before which the element of `hint` belongs among the kids of
    /// `parent_node`: the position of the nearest following accessible
    /// sibling that already has an element there. `None` appends.
    pub(super) fn nearest_next_sibling_index(&self, hint: HintKey, parent_node: StructNodeId) -> Option<usize> {
        let parent = self.tree.accessible_parent(hint)?;
        let siblings = self.tree.accessible_kids(parent);
        let position = siblings.iter().position(|k| *k == hint)?;
        siblings[position + 1..]
            .iter()
            .filter_map(|sibling| self.node_of(*sibling))
            .find(|node| self.structure.parent(*node) == Some(parent_node))
            .and_then(|node| self.structure.index_in_parent(node))
    }

    /// Move the element of `kid` (if it has one) under the element of
    /// `parent`, at its hint-order position.
    pub(super) fn move_kid_node_if_created(&mut self, parent: HintKey, kid: HintKey) {
        let (Some(kid_node), Some(parent_node)) = (self.node_of(kid), self.node_of(parent)) else {
            return;
        };
        let mut target = TagCursor::new(parent_node);
        target.set_next_kid_index(self.nearest_next_sibling_index(kid, parent_node));
        if !self.structure.relocate(kid_node, &target) {
            debug!("Element {} of hint {} stays in place", kid_node, kid);
        }
    }

    /// Place freshly linked kids below the element of their accessible
    /// parent, if that element exists already.
    pub(super) fn attach_to_existing_parent_node(&mut self, parent: HintKey, kids: &[HintKey]) {
        let accessible_parent = if self.tree.is_accessible(parent) {
            Some(parent)
        } else {
            self.tree.accessible_parent(parent)
        };
        let Some(accessible_parent) = accessible_parent else {
            return;
        };
        if !self.has_node(accessible_parent) {
            return;
        }

        for kid in kids {
            let accessible_kids = if self.tree.is_accessible(*kid) {
                vec![*kid]
            } else {
                self.tree.accessible_kids(*kid)
            };
            for accessible_kid in accessible_kids {
                if self.tree.data(accessible_kid).is_dummy() {
                    let mut cursor = TagCursor::at_root(&*self.structure);
                    self.create_node(accessible_kid, &mut cursor);
                }
                self.move_kid_node_if_created(accessible_parent, accessible_kid);
            }
        }
    }
}
