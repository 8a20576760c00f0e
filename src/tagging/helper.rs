//! The layout tagging helper.
//!
//! [`LayoutTaggingHelper`] is created once per conversion. The layout pass
//! registers owners and their parent/kid relationships, finishes hints as
//! content completes, asks for structure elements when it draws tagged
//! content, and periodically releases finished hints so that their
//! structure elements can be flushed.

use super::conflicts::RoleConflictTable;
use super::hint::{AccessibleElement, HintData, HintFlags, HintKey, HintOwner};
use super::roles::{RoleMapNormalizer, RoleNormalizer};
use super::rules::{RuleRegistry, TaggingRule};
use super::store::{HintTree, RemoveOutcome};
use crate::config::TaggingConfig;
use crate::error::{Error, Violation};
use crate::structure::{StructNodeId, TagCursor, TagStructure};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;
use std::rc::Rc;

/// Who asks for a hint to be finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishTrigger {
    /// The owning model element completed (the canonical, explicit finish)
    Element,
    /// Generic layout traversal, e.g. a renderer that ran out of content
    Traversal,
}

/// Serializable snapshot of one hint and its subtree.
#[derive(Debug, Clone, Serialize)]
pub struct HintNodeDump {
    /// Hint handle
    pub key: HintKey,
    /// Effective role
    pub role: Option<String>,
    /// Finished flag
    pub finished: bool,
    /// Artifact flag
    pub artifact: bool,
    /// Synthetic wrapper
    pub dummy: bool,
    /// A structure element exists for the hint
    pub has_node: bool,
    /// Kid hints
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kids: Vec<HintNodeDump>,
}

/// Builds the hint tree of one conversion and materializes it into a
/// structure tree.
pub struct LayoutTaggingHelper {
    pub(super) config: TaggingConfig,
    pub(super) tree: HintTree,
    pub(super) structure: Box<dyn TagStructure>,
    rules: RuleRegistry,
    pub(super) conflicts: RoleConflictTable,
    pub(super) normalizer: Box<dyn RoleNormalizer>,
    /// Dummy hints standing in for structure elements created outside the hint tree
    pub(super) existing_tag_dummies: IndexMap<StructNodeId, HintKey>,
    diagnostics: Vec<Error>,
}

impl LayoutTaggingHelper {
    /// Create a helper writing into `structure`.
    ///
    /// The built-in rules and the role conflict table are selected by the
    /// configured PDF version.
    pub fn new(config: TaggingConfig, structure: impl TagStructure + 'static) -> Self {
        let rules = RuleRegistry::with_builtin_rules(config.pdf_version);
        let conflicts = RoleConflictTable::new(config.pdf_version, &config.role_conflict_overrides);
        debug!(
            "Tagging helper for {} (immediate flush: {})",
            config.pdf_version, config.immediate_flush
        );
        Self {
            config,
            tree: HintTree::new(),
            structure: Box::new(structure),
            rules,
            conflicts,
            normalizer: Box::new(RoleMapNormalizer::new()),
            existing_tag_dummies: IndexMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Use a custom role normalizer for conflict resolution.
    pub fn with_normalizer(mut self, normalizer: impl RoleNormalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    /// Configuration the helper was created with.
    pub fn config(&self) -> &TaggingConfig {
        &self.config
    }

    /// The hint tree.
    pub fn tree(&self) -> &HintTree {
        &self.tree
    }

    /// Data of a hint.
    pub fn hint(&self, key: HintKey) -> &HintData {
        self.tree.data(key)
    }

    /// The target structure tree.
    pub fn structure(&self) -> &dyn TagStructure {
        &*self.structure
    }

    /// Mutable access to the target structure tree.
    pub fn structure_mut(&mut self) -> &mut dyn TagStructure {
        &mut *self.structure
    }

    /// The target structure tree as its concrete type.
    pub fn structure_as<T: 'static>(&self) -> Option<&T> {
        self.structure.as_any().downcast_ref::<T>()
    }

    /// Consume the helper and return the structure tree.
    pub fn into_structure(self) -> Box<dyn TagStructure> {
        self.structure
    }

    // ---- Keys ----

    /// Key of an owner, if it has one.
    pub fn get_key(&self, owner: &dyn HintOwner) -> Option<HintKey> {
        owner
            .hint_slot()
            .key_in(self.tree.id())
            .filter(|key| self.tree.contains(*key))
    }

    /// Key of an owner, created on first use.
    ///
    /// Model elements get strict-finish hints. Owners whose element has the
    /// `Artifact` role get finished artifact hints.
    pub fn get_or_create(&mut self, owner: &dyn HintOwner) -> HintKey {
        if let Some(key) = self.get_key(owner) {
            return key;
        }
        let element = owner.accessible_element();
        let mut flags = HintFlags::empty();
        if owner.is_element() {
            flags |= HintFlags::STRICT_FINISH_ONLY;
        }
        if element.as_ref().map_or(false, AccessibleElement::is_artifact) {
            flags |= HintFlags::ARTIFACT | HintFlags::FINISHED;
        }
        let key = self.tree.create(element, flags);
        owner.hint_slot().set(self.tree.id(), key);
        debug!("Created hint {} ({:?})", key, self.tree.data(key).role());
        key
    }

    /// Create a synthetic wrapper hint. `None` creates a non-accessible wrapper.
    pub fn create_dummy(&mut self, role: Option<&str>) -> HintKey {
        let element = match role {
            Some(role) => AccessibleElement::new(role),
            None => AccessibleElement::role_less(),
        };
        let key = self.tree.create(Some(element), HintFlags::DUMMY);
        debug!("Created dummy hint {} ({:?})", key, role);
        key
    }

    // ---- Edges ----

    /// Add kids to a parent at `index` (append when `None`).
    ///
    /// Kids of an artifact parent become artifacts themselves. Adding to a
    /// finished parent, re-parenting a kid or creating a cycle is reported
    /// and skipped.
    pub fn add_kids(&mut self, parent: HintKey, kids: &[HintKey], index: Option<usize>) {
        self.link_kids(parent, kids, index, false);
    }

    /// [`add_kids`](Self::add_kids) for owners, creating their keys as needed.
    pub fn add_owner_kids(&mut self, parent: &dyn HintOwner, kids: &[&dyn HintOwner], index: Option<usize>) {
        let parent = self.get_or_create(parent);
        let kids: Vec<HintKey> = kids.iter().map(|kid| self.get_or_create(*kid)).collect();
        self.add_kids(parent, &kids, index);
    }

    pub(crate) fn link_kids(
        &mut self,
        parent: HintKey,
        kids: &[HintKey],
        index: Option<usize>,
        skip_finished_checks: bool,
    ) {
        if self.tree.data(parent).is_artifact() {
            for kid in kids {
                self.mark_artifact(*kid);
            }
            return;
        }
        if self.tree.data(parent).is_finished() && !skip_finished_checks {
            self.report(Violation::AddKidsToFinishedParent { parent });
            return;
        }

        let mut insert_at = index;
        let mut added = Vec::with_capacity(kids.len());
        for &kid in kids {
            if self.tree.data(kid).is_artifact() {
                continue;
            }
            if let Some(current) = self.tree.parent(kid) {
                self.report(Violation::KidAlreadyHasParent { kid, parent: current });
                continue;
            }
            if self.tree.is_ancestor_or_self(kid, parent) {
                self.report(Violation::CyclicKid { kid, parent });
                continue;
            }
            self.tree.insert_kid(parent, insert_at, kid);
            insert_at = insert_at.map(|i| i + 1);
            added.push(kid);
        }

        if !added.is_empty() {
            debug!("Added {} kid hint(s) to {}", added.len(), parent);
            self.attach_to_existing_parent_node(parent, &added);
        }
    }

    /// Detach a kid from its parent.
    pub fn remove_parent(&mut self, kid: HintKey) -> RemoveOutcome {
        self.tree.remove_parent(kid)
    }

    /// Move a kid under another parent at `index` (append when `None`).
    ///
    /// Returns false if the move was rejected.
    pub fn move_kid(&mut self, kid: HintKey, new_parent: HintKey, index: Option<usize>) -> bool {
        if self.tree.data(new_parent).is_finished() {
            self.report(Violation::MoveToFinishedParent { kid, parent: new_parent });
            return false;
        }
        if self.tree.is_ancestor_or_self(kid, new_parent) {
            self.report(Violation::CyclicKid { kid, parent: new_parent });
            return false;
        }
        if !self.detach_movable(kid) {
            return false;
        }
        self.link_kids(new_parent, &[kid], index, true);
        self.tree.parent(kid) == Some(new_parent)
    }

    /// Replace a kid by other hints, at the kid's position.
    ///
    /// Returns the former index of the kid, or `None` if the kid has no
    /// parent or is finished.
    pub fn replace_kid(&mut self, kid: HintKey, replacements: &[HintKey]) -> Option<usize> {
        let parent = self.tree.parent(kid)?;
        if self.tree.data(kid).is_finished() {
            self.report(Violation::ReplaceFinishedKid { kid });
            return None;
        }
        let index = match self.tree.remove_parent(kid) {
            RemoveOutcome::Removed(index) => index,
            _ => return None,
        };
        let movable: Vec<HintKey> = replacements
            .iter()
            .copied()
            .filter(|r| self.detach_movable(*r))
            .collect();
        self.link_kids(parent, &movable, Some(index), true);
        Some(index)
    }

    /// Detach a hint so it can be linked elsewhere. Finished hints that
    /// cannot leave their place are reported.
    fn detach_movable(&mut self, kid: HintKey) -> bool {
        match self.tree.remove_parent(kid) {
            RemoveOutcome::BothFinished => {
                self.report(Violation::MoveFinishedKid { kid });
                false
            },
            RemoveOutcome::NoParent if self.tree.data(kid).is_finished() => {
                self.report(Violation::MoveFinishedKid { kid });
                false
            },
            _ => true,
        }
    }

    /// Kids of a hint in document order.
    pub fn get_kids(&self, parent: HintKey) -> &[HintKey] {
        self.tree.kids(parent)
    }

    /// Accessible kids of a hint, looking through non-accessible wrappers.
    pub fn get_accessible_kids(&self, parent: HintKey) -> Vec<HintKey> {
        self.tree.accessible_kids(parent)
    }

    /// Parent of a hint.
    pub fn get_parent(&self, kid: HintKey) -> Option<HintKey> {
        self.tree.parent(kid)
    }

    /// Nearest accessible ancestor of a hint.
    pub fn get_accessible_parent(&self, kid: HintKey) -> Option<HintKey> {
        self.tree.accessible_parent(kid)
    }

    // ---- Roles and artifacts ----

    /// Override the role of a hint.
    pub fn set_role_hint(&mut self, key: HintKey, role: &str) {
        if self.tree.data(key).is_artifact() {
            self.report(Violation::ModifyFinishedArtifact { hint: key });
            return;
        }
        self.tree.data_mut(key).set_overridden_role(role);
    }

    /// Check if an owner is (or will be) an artifact.
    pub fn is_artifact(&self, owner: &dyn HintOwner) -> bool {
        match self.get_key(owner) {
            Some(key) => self.tree.data(key).is_artifact(),
            None => owner
                .accessible_element()
                .map_or(false, |element| element.is_artifact()),
        }
    }

    /// Exclude a hint and its whole subtree from the structure tree.
    ///
    /// A structure element that was already created for the hint is removed;
    /// this is reported because its content was tagged already.
    pub fn mark_artifact(&mut self, key: HintKey) {
        self.tree.data_mut(key).set_artifact();

        let mut orphaned_parent = None;
        if let Some(node) = self.structure.remove(key) {
            self.report(Violation::TaggedHintMarkedArtifact { hint: key });
            orphaned_parent = self.structure.parent(node);
            self.structure.remove_tag(node);
        }

        for kid in self.tree.kids(key).to_vec() {
            self.mark_artifact(kid);
        }
        self.tree.detach(key);

        if let Some(parent) = orphaned_parent {
            if self.config.immediate_flush {
                self.structure.flush_if_all_kids_flushed(&TagCursor::new(parent));
            }
        }
    }

    /// [`mark_artifact`](Self::mark_artifact) for an owner.
    pub fn mark_owner_artifact(&mut self, owner: &dyn HintOwner) {
        let key = self.get_or_create(owner);
        self.mark_artifact(key);
    }

    // ---- Finishing ----

    /// Finish a hint on behalf of its owning element.
    ///
    /// Returns true if the hint is finished afterwards.
    pub fn finish(&mut self, key: HintKey) -> bool {
        self.finish_hint(key, FinishTrigger::Element)
    }

    /// Finish the hint of an owner, if it has one.
    pub fn finish_owner(&mut self, owner: &dyn HintOwner, trigger: FinishTrigger) -> bool {
        match self.get_key(owner) {
            Some(key) => self.finish_hint(key, trigger),
            None => false,
        }
    }

    /// Finish a hint.
    ///
    /// The rules registered for the effective role run in registration
    /// order; the first rule returning false stops the evaluation and leaves
    /// the hint unfinished. Strict hints ignore [`FinishTrigger::Traversal`].
    pub fn finish_hint(&mut self, key: HintKey, trigger: FinishTrigger) -> bool {
        let data = self.tree.data(key);
        if data.is_finished() || data.is_artifact() {
            return data.is_finished();
        }
        if data.is_strict_finish_only() && trigger == FinishTrigger::Traversal {
            debug!("Hint {} only finishes with its element", key);
            return false;
        }

        if data.is_accessible() {
            let role = data.effective_role().unwrap_or_default().to_string();
            for rule in self.rules.rules_for(&role) {
                if !rule.on_finish(self, key) {
                    debug!("Rule '{}' kept hint {} /{} open", rule.name(), key, role);
                    return false;
                }
            }
        }

        self.tree.data_mut(key).set_finished();
        debug!("Finished hint {}", key);
        true
    }

    /// Mark a hint finished without running rules.
    pub(crate) fn set_finished(&mut self, key: HintKey) {
        self.tree.data_mut(key).set_finished();
    }

    /// Register an additional rule for a role.
    pub fn register_rule(&mut self, role: &str, rule: impl TaggingRule + 'static) {
        self.rules.register(role, Rc::new(rule));
    }

    /// Register one rule instance under a role; the same `Rc` may be
    /// registered under several roles to share state.
    pub fn register_shared_rule(&mut self, role: &str, rule: Rc<dyn TaggingRule>) {
        self.rules.register(role, rule);
    }

    // ---- Diagnostics ----

    pub(crate) fn report(&mut self, violation: Violation) {
        warn!("{}", violation);
        self.diagnostics.push(Error::from(violation));
    }

    /// Problems reported so far.
    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    /// Take and clear the reported problems.
    pub fn take_diagnostics(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Snapshot of the live hint forest.
    pub fn hint_tree_dump(&self) -> Vec<HintNodeDump> {
        self.tree
            .preorder()
            .into_iter()
            .filter(|key| self.tree.parent(*key).is_none())
            .map(|root| self.dump_hint(root))
            .collect()
    }

    fn dump_hint(&self, key: HintKey) -> HintNodeDump {
        let data = self.tree.data(key);
        HintNodeDump {
            key,
            role: data.effective_role().map(str::to_string),
            finished: data.is_finished(),
            artifact: data.is_artifact(),
            dummy: data.is_dummy(),
            has_node: self.has_node(key),
            kids: self.tree.kids(key).iter().map(|kid| self.dump_hint(*kid)).collect(),
        }
    }
}

impl std::fmt::Debug for LayoutTaggingHelper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutTaggingHelper")
            .field("config", &self.config)
            .field("hints", &self.tree.len())
            .field("rules", &self.rules)
            .field("diagnostics", &self.diagnostics.len())
            .finish()
    }
}
