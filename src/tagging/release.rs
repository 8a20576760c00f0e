//! Releasing finished hints.
//!
//! Once a hint is finished and nothing before it in document order is still
//! pending, it can leave the hint tree. Its structure element (if one was
//! created) loses its waiting state and is flushed as soon as all of its
//! kids are flushed. Releasing is irreversible, so a finished hint is held
//! back while an earlier sibling or its parent is still unfinished.

use super::helper::{FinishTrigger, LayoutTaggingHelper};
use super::hint::HintKey;
use crate::error::{Error, Result};
use crate::structure::TagCursor;
use log::{debug, error};
use std::collections::HashSet;

impl LayoutTaggingHelper {
    /// Release every finished hint that no longer blocks document order.
    ///
    /// Returns the released hints in release (document) order.
    pub fn release_finished(&mut self) -> Vec<HintKey> {
        // Finished wrappers no longer need their synthetic kids open.
        for key in self.tree.unreleased_preorder() {
            let data = self.tree.data(key);
            if data.is_finished() && (data.is_dummy() || data.is_accessible()) {
                self.finish_dummy_kids(key);
            }
        }

        let held = self.held_hints();
        let order = self.tree.unreleased_preorder();
        let blocked = self.blocked_hints(&order, &held);

        let mut released = Vec::new();
        for key in order {
            if !self.tree.data(key).is_finished() || held.contains(&key) || blocked.contains(&key) {
                continue;
            }
            if self.has_unfinished_parent(key) {
                continue;
            }
            self.release_hint(key);
            released.push(key);
        }
        if !released.is_empty() {
            debug!("Released {} hint(s), {} held", released.len(), held.len());
        }
        released
    }

    /// Release everything at document close.
    ///
    /// Dummy placeholders are finished first, then the regular release runs,
    /// and whatever is left is released regardless of order. The hint tree
    /// is empty afterwards.
    pub fn release_all(&mut self) -> Result<()> {
        let existing: Vec<HintKey> = self.existing_tag_dummies.values().copied().collect();
        for dummy in existing {
            self.finish_hint(dummy, FinishTrigger::Element);
            self.finish_dummy_kids(dummy);
        }
        for key in self.tree.unreleased_preorder() {
            if self.tree.data(key).is_dummy() {
                self.finish_hint(key, FinishTrigger::Element);
            }
        }
        self.existing_tag_dummies.clear();

        self.release_finished();
        for key in self.tree.unreleased_preorder() {
            self.release_hint(key);
        }

        let (parent_links, kid_lists) = self.tree.link_counts();
        debug_assert!(
            parent_links == 0 && kid_lists == 0,
            "hint tree not empty after release_all"
        );
        if parent_links != 0 || kid_lists != 0 {
            error!(
                "Hint tree not empty after release: {} parent links, {} kid lists",
                parent_links, kid_lists
            );
            return Err(Error::ConsistencyAssertion {
                parent_links,
                kid_lists,
            });
        }
        Ok(())
    }

    /// Finish the dummy descendants of a hint, looking through
    /// non-accessible wrappers.
    pub(super) fn finish_dummy_kids(&mut self, key: HintKey) {
        for kid in self.tree.kids(key).to_vec() {
            let data = self.tree.data(kid);
            let is_dummy = data.is_dummy();
            let is_wrapper = !data.is_accessible();
            if is_dummy {
                self.finish_hint(kid, FinishTrigger::Element);
            }
            if is_dummy || is_wrapper {
                self.finish_dummy_kids(kid);
            }
        }
    }

    /// Finished hints that must wait for an earlier unfinished sibling.
    fn held_hints(&self) -> HashSet<HintKey> {
        let mut held = HashSet::new();
        for key in self.tree.unreleased_preorder() {
            if !self.tree.is_accessible(key) && self.tree.parent(key).is_some() {
                continue;
            }
            let mut pending = false;
            for kid in self.tree.accessible_kids(key) {
                if !self.tree.data(kid).is_finished() {
                    pending = true;
                } else if pending {
                    held.insert(kid);
                }
            }
        }
        held
    }

    /// Hints with an unfinished or held hint somewhere below them.
    fn blocked_hints(&self, order: &[HintKey], held: &HashSet<HintKey>) -> HashSet<HintKey> {
        let mut blocked = HashSet::new();
        // Reverse pre-order visits kids before their parents.
        for key in order.iter().rev() {
            let is_blocked = self.tree.kids(*key).iter().any(|kid| {
                !self.tree.data(*kid).is_finished() || held.contains(kid) || blocked.contains(kid)
            });
            if is_blocked {
                blocked.insert(*key);
            }
        }
        blocked
    }

    /// Check if the accessible parent, or a wrapper on the way to it, is
    /// still unfinished.
    ///
    /// An open parent may still be materialized or receive earlier kids, so
    /// its kids stay in the tree until it is finished.
    fn has_unfinished_parent(&self, key: HintKey) -> bool {
        let mut current = self.tree.parent(key);
        while let Some(parent) = current {
            if !self.tree.data(parent).is_finished() {
                return true;
            }
            if self.tree.is_accessible(parent) {
                return false;
            }
            current = self.tree.parent(parent);
        }
        false
    }

    fn release_hint(&mut self, key: HintKey) {
        self.tree.data_mut(key).set_released();
        self.tree.detach(key);
        self.tree.take_kids(key);
        self.existing_tag_dummies.retain(|_, dummy| *dummy != key);

        if let Some(node) = self.structure.remove(key) {
            if self.config.immediate_flush {
                self.structure.flush_if_all_kids_flushed(&TagCursor::new(node));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::TaggingConfig;
    use crate::structure::{StructTree, StructureTree, TagCursor};
    use crate::tagging::{AccessibleElement, HintKey, LayoutTaggingHelper, TaggableNode};

    fn helper() -> LayoutTaggingHelper {
        LayoutTaggingHelper::new(TaggingConfig::default(), StructTree::new())
    }

    fn hint(helper: &mut LayoutTaggingHelper, role: &str) -> HintKey {
        helper.get_or_create(&TaggableNode::renderer(Some(AccessibleElement::new(role))))
    }

    #[test]
    fn test_unfinished_kid_blocks_parent() {
        let mut helper = helper();
        let parent = hint(&mut helper, "Sect");
        let kid = hint(&mut helper, "P");
        helper.add_kids(parent, &[kid], None);
        helper.finish(parent);

        assert!(helper.release_finished().is_empty());
        helper.finish(kid);
        assert_eq!(helper.release_finished(), vec![parent, kid]);
        assert_eq!(helper.tree().link_counts(), (0, 0));
    }

    #[test]
    fn test_unfinished_wrapper_keeps_kids() {
        let mut helper = helper();
        let parent = hint(&mut helper, "Sect");
        let wrapper = helper.get_or_create(&TaggableNode::renderer(Some(AccessibleElement::role_less())));
        let kid = hint(&mut helper, "P");
        helper.add_kids(parent, &[wrapper], None);
        helper.add_kids(wrapper, &[kid], None);
        helper.finish(parent);
        helper.finish(kid);

        assert!(helper.release_finished().is_empty());
        helper.finish(wrapper);
        assert_eq!(helper.release_finished(), vec![parent, wrapper, kid]);
        assert_eq!(helper.get_kids(parent), &[] as &[HintKey]);
    }

    #[test]
    fn test_unfinished_parent_keeps_finished_kid() {
        let mut helper = helper();
        let parent = hint(&mut helper, "Sect");
        let kid = hint(&mut helper, "P");
        helper.add_kids(parent, &[kid], None);
        helper.finish(kid);

        assert!(helper.release_finished().is_empty());
        assert_eq!(helper.get_kids(parent), &[kid]);
        assert!(!helper.hint(kid).is_released());
    }

    #[test]
    fn test_finished_dummy_finishes_dummy_kids() {
        let mut helper = helper();
        let table = hint(&mut helper, "Table");
        let body = helper.create_dummy(None);
        let row = helper.create_dummy(Some("TR"));
        helper.add_kids(table, &[body], None);
        helper.add_kids(body, &[row], None);
        helper.set_finished(table);

        helper.release_finished();
        assert!(helper.hint(body).is_finished());
        assert!(helper.hint(row).is_finished());
        assert_eq!(helper.tree().link_counts(), (0, 0));
    }

    #[test]
    fn test_release_flushes_element() {
        let mut helper = helper();
        let key = hint(&mut helper, "P");
        let mut cursor = TagCursor::at_root(helper.structure());
        helper.create_node(key, &mut cursor);
        let node = cursor.node();
        helper.finish(key);

        assert_eq!(helper.release_finished(), vec![key]);
        assert!(helper.structure().is_flushed(node));
        assert!(!helper.has_node(key));
    }

    #[test]
    fn test_release_without_immediate_flush() {
        let config = TaggingConfig::new().with_immediate_flush(false);
        let mut helper = LayoutTaggingHelper::new(config, StructTree::new());
        let key = hint(&mut helper, "P");
        let mut cursor = TagCursor::at_root(helper.structure());
        helper.create_node(key, &mut cursor);
        helper.finish(key);

        helper.release_finished();
        assert!(!helper.structure().is_flushed(cursor.node()));
        assert!(!helper.has_node(key));
    }

    #[test]
    fn test_release_all_empties_tree() {
        let mut helper = helper();
        let parent = hint(&mut helper, "Sect");
        let kids: Vec<HintKey> = (0..3).map(|_| hint(&mut helper, "P")).collect();
        helper.add_kids(parent, &kids, None);
        helper.finish(kids[1]);

        helper.release_all().unwrap();
        assert_eq!(helper.tree().link_counts(), (0, 0));
        assert!(helper.hint_tree_dump().is_empty());
    }
}
