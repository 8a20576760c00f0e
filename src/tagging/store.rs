//! Hint tree storage.
//!
//! [`HintTree`] owns every hint of a conversion (an arena indexed by
//! [`HintKey`]) and the two edge maps `parent_of` and `children_of`. It
//! performs raw edge bookkeeping only; the usage rules (finished parents,
//! artifacts, structure element updates) live in
//! [`super::LayoutTaggingHelper`].

use super::hint::{AccessibleElement, HintData, HintFlags, HintKey};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

/// Outcome of detaching a hint from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The hint was detached; this was its index among its siblings
    Removed(usize),
    /// The hint had no parent
    NoParent,
    /// Hint, parent and accessible parent are all finished; nothing changed
    BothFinished,
}

/// Arena of hints plus parent/kid edges.
///
/// Every tree gets a process-unique id. Owner slots remember the id of the
/// tree that keyed them, so a key never resolves in another tree.
#[derive(Debug, Clone)]
pub struct HintTree {
    id: u64,
    hints: Vec<HintData>,
    parent_of: HashMap<HintKey, HintKey>,
    children_of: HashMap<HintKey, Vec<HintKey>>,
}

impl Default for HintTree {
    fn default() -> Self {
        Self::new()
    }
}

impl HintTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            hints: Vec::new(),
            parent_of: HashMap::new(),
            children_of: HashMap::new(),
        }
    }

    /// Process-unique id of this tree.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn create(&mut self, element: Option<AccessibleElement>, flags: HintFlags) -> HintKey {
        let key = HintKey::from_index(self.hints.len());
        self.hints.push(HintData::new(element, flags));
        key
    }

    /// Check if the key was created by this tree.
    pub fn contains(&self, key: HintKey) -> bool {
        key.index() < self.hints.len()
    }

    /// Number of hints ever created.
    pub fn len(&self) -> usize {
        self.hints.len()
    }

    /// Check if no hint was created yet.
    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    /// Data of a hint.
    ///
    /// # Panics
    ///
    /// Panics if the key belongs to another tree.
    pub fn data(&self, key: HintKey) -> &HintData {
        &self.hints[key.index()]
    }

    pub(crate) fn data_mut(&mut self, key: HintKey) -> &mut HintData {
        &mut self.hints[key.index()]
    }

    /// Check if the hint gets its own structure element.
    pub fn is_accessible(&self, key: HintKey) -> bool {
        self.data(key).is_accessible()
    }

    /// Parent of a hint.
    pub fn parent(&self, key: HintKey) -> Option<HintKey> {
        self.parent_of.get(&key).copied()
    }

    /// Kids of a hint in document order.
    pub fn kids(&self, key: HintKey) -> &[HintKey] {
        self.children_of.get(&key).map_or(&[], Vec::as_slice)
    }

    /// Kids of a hint where non-accessible kids are replaced, recursively,
    /// by their own accessible kids.
    pub fn accessible_kids(&self, key: HintKey) -> Vec<HintKey> {
        let mut result = Vec::new();
        self.collect_accessible_kids(key, &mut result);
        result
    }

    fn collect_accessible_kids(&self, key: HintKey, result: &mut Vec<HintKey>) {
        for kid in self.kids(key) {
            if self.is_accessible(*kid) {
                result.push(*kid);
            } else {
                self.collect_accessible_kids(*kid, result);
            }
        }
    }

    /// Nearest accessible ancestor of a hint.
    pub fn accessible_parent(&self, key: HintKey) -> Option<HintKey> {
        let mut current = self.parent(key);
        while let Some(parent) = current {
            if self.is_accessible(parent) {
                return Some(parent);
            }
            current = self.parent(parent);
        }
        None
    }

    /// Check if `ancestor` is `key` itself or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: HintKey, key: HintKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.parent(k);
        }
        false
    }

    /// Check if the hint has a parent or kids.
    pub fn is_linked(&self, key: HintKey) -> bool {
        self.parent_of.contains_key(&key) || self.children_of.contains_key(&key)
    }

    /// Number of `parent_of` and `children_of` entries.
    pub fn link_counts(&self) -> (usize, usize) {
        (self.parent_of.len(), self.children_of.len())
    }

    /// Detach a kid from its parent unless kid and parents are all finished.
    pub fn remove_parent(&mut self, kid: HintKey) -> RemoveOutcome {
        let Some(parent) = self.parent(kid) else {
            return RemoveOutcome::NoParent;
        };
        let accessible_parent_finished = self
            .accessible_parent(kid)
            .map_or(true, |p| self.data(p).is_finished());
        if self.data(kid).is_finished() && self.data(parent).is_finished() && accessible_parent_finished {
            return RemoveOutcome::BothFinished;
        }
        match self.detach(kid) {
            Some(index) => RemoveOutcome::Removed(index),
            None => RemoveOutcome::NoParent,
        }
    }

    /// Unconditionally detach a kid, returning its former index.
    pub(crate) fn detach(&mut self, kid: HintKey) -> Option<usize> {
        let parent = self.parent_of.remove(&kid)?;
        let siblings = self.children_of.get_mut(&parent)?;
        let index = siblings.iter().position(|k| *k == kid)?;
        siblings.remove(index);
        if siblings.is_empty() {
            self.children_of.remove(&parent);
        }
        Some(index)
    }

    /// Insert a parentless kid at `index` (append when `None` or out of range).
    pub(crate) fn insert_kid(&mut self, parent: HintKey, index: Option<usize>, kid: HintKey) {
        let siblings = self.children_of.entry(parent).or_default();
        let at = index.map_or(siblings.len(), |i| i.min(siblings.len()));
        siblings.insert(at, kid);
        self.parent_of.insert(kid, parent);
    }

    /// Remove the kid list of a hint, detaching every kid.
    pub(crate) fn take_kids(&mut self, key: HintKey) -> Vec<HintKey> {
        let kids = self.children_of.remove(&key).unwrap_or_default();
        for kid in &kids {
            self.parent_of.remove(kid);
        }
        kids
    }

    /// All linked hints in document order.
    ///
    /// Roots (linked hints without a parent) are visited in creation order,
    /// each followed by its subtree in pre-order.
    pub fn preorder(&self) -> Vec<HintKey> {
        let mut linked: Vec<HintKey> = self
            .parent_of
            .iter()
            .flat_map(|(kid, parent)| [*kid, *parent])
            .chain(self.children_of.keys().copied())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        linked.sort();

        let mut visited = HashSet::new();
        let mut order = Vec::with_capacity(linked.len());
        for root in linked.iter().filter(|k| self.parent(**k).is_none()) {
            self.visit_preorder(*root, &mut visited, &mut order);
        }
        // Anything unreachable from a root sits on a cycle; list it anyway so
        // that it can still be released.
        for key in linked {
            if visited.insert(key) {
                order.push(key);
            }
        }
        order
    }

    /// Every hint that was not released yet, in document order.
    ///
    /// Like [`preorder`](Self::preorder), but hints without any edge are
    /// included as roots of their own.
    pub fn unreleased_preorder(&self) -> Vec<HintKey> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let unreleased = (0..self.hints.len())
            .map(HintKey::from_index)
            .filter(|key| !self.data(*key).is_released());
        for root in unreleased.clone().filter(|k| self.parent(*k).is_none()) {
            self.visit_preorder(root, &mut visited, &mut order);
        }
        for key in unreleased {
            if visited.insert(key) {
                order.push(key);
            }
        }
        order
    }

    fn visit_preorder(&self, key: HintKey, visited: &mut HashSet<HintKey>, order: &mut Vec<HintKey>) {
        if !visited.insert(key) {
            return;
        }
        order.push(key);
        for kid in self.kids(key) {
            self.visit_preorder(*kid, visited, order);
        }
    }
}
