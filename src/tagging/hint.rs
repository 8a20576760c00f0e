//! Hint keys, hint data and the owner side of the identity slot.

use crate::structure::{StructAttributes, StructType};
use bitflags::bitflags;
use serde::Serialize;
use std::cell::Cell;
use std::fmt;

/// Opaque handle of one hint in a [`super::LayoutTaggingHelper`].
///
/// Keys are only meaningful for the helper that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct HintKey(u32);

impl HintKey {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Arena index of this hint (creation order).
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for HintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// State flags of a hint.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HintFlags: u8 {
        /// Excluded from the structure tree (terminal)
        const ARTIFACT = 1 << 0;

        /// Finished: rules ran and accepted the hint
        const FINISHED = 1 << 1;

        /// Only the owning element may finish the hint
        const STRICT_FINISH_ONLY = 1 << 2;

        /// Synthetic wrapper without content
        const DUMMY = 1 << 3;

        /// Released: left the hint tree for good
        const RELEASED = 1 << 4;
    }
}

/// Model-level details the built-in rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ElementKind {
    /// Any element without table-specific details
    #[default]
    Generic,
    /// A table (or a table header/footer) and whether its row groups are used
    Table {
        /// A header is drawn for this table
        header_in_use: bool,
        /// A footer is drawn for this table
        footer_in_use: bool,
    },
    /// A table cell with its grid position
    TableCell {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
    },
}

/// The accessibility side of a layout object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessibleElement {
    /// Structure role, `None` for purely visual wrappers
    pub role: Option<String>,

    /// Namespace of the role, if not the default standard namespace
    pub namespace: Option<String>,

    /// Structure attribute objects
    pub attributes: Vec<StructAttributes>,

    /// Table details
    pub kind: ElementKind,
}

impl AccessibleElement {
    /// Element with the given role.
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            ..Default::default()
        }
    }

    /// Element without a role (non-accessible wrapper).
    pub fn role_less() -> Self {
        Self::default()
    }

    /// Table element.
    pub fn table(header_in_use: bool, footer_in_use: bool) -> Self {
        Self::new(StructType::Table.as_str()).with_kind(ElementKind::Table {
            header_in_use,
            footer_in_use,
        })
    }

    /// Table cell (`TD` or `TH`) at a grid position.
    pub fn cell(role: impl Into<String>, row: usize, col: usize) -> Self {
        Self::new(role).with_kind(ElementKind::TableCell { row, col })
    }

    /// Set the element kind.
    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }

    /// Add an attribute object.
    pub fn with_attributes(mut self, attributes: StructAttributes) -> Self {
        self.attributes.push(attributes);
        self
    }

    /// Set the role namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Check if the element is marked as an artifact.
    pub fn is_artifact(&self) -> bool {
        self.role.as_deref() == Some(StructType::Artifact.as_str())
    }
}

/// State of one hint.
#[derive(Debug, Clone)]
pub struct HintData {
    element: Option<AccessibleElement>,
    flags: HintFlags,
    overridden_role: Option<String>,
}

impl HintData {
    pub(crate) fn new(element: Option<AccessibleElement>, flags: HintFlags) -> Self {
        Self {
            element,
            flags,
            overridden_role: None,
        }
    }

    /// Accessible element the hint was created for.
    pub fn element(&self) -> Option<&AccessibleElement> {
        self.element.as_ref()
    }

    /// Role of the element, ignoring overrides.
    pub fn role(&self) -> Option<&str> {
        self.element.as_ref().and_then(|e| e.role.as_deref())
    }

    /// Role override set by role hints or conflict resolution.
    pub fn overridden_role(&self) -> Option<&str> {
        self.overridden_role.as_deref()
    }

    /// Role used for rules and structure elements: the override wins.
    pub fn effective_role(&self) -> Option<&str> {
        self.overridden_role.as_deref().or_else(|| self.role())
    }

    /// Namespace of the element role.
    pub fn namespace(&self) -> Option<&str> {
        self.element.as_ref().and_then(|e| e.namespace.as_deref())
    }

    /// Current flags.
    pub fn flags(&self) -> HintFlags {
        self.flags
    }

    /// Check if the hint is an artifact.
    pub fn is_artifact(&self) -> bool {
        self.flags.contains(HintFlags::ARTIFACT)
    }

    /// Check if the hint is finished.
    pub fn is_finished(&self) -> bool {
        self.flags.contains(HintFlags::FINISHED)
    }

    /// Check if the hint is a synthetic wrapper.
    pub fn is_dummy(&self) -> bool {
        self.flags.contains(HintFlags::DUMMY)
    }

    /// Check if the hint was released.
    pub fn is_released(&self) -> bool {
        self.flags.contains(HintFlags::RELEASED)
    }

    /// Check if only the owning element may finish the hint.
    pub fn is_strict_finish_only(&self) -> bool {
        self.flags.contains(HintFlags::STRICT_FINISH_ONLY)
    }

    /// Accessible hints get their own structure element.
    pub fn is_accessible(&self) -> bool {
        !self.is_artifact() && self.effective_role().map_or(false, |r| !r.is_empty())
    }

    pub(crate) fn set_finished(&mut self) {
        self.flags.insert(HintFlags::FINISHED);
    }

    pub(crate) fn set_released(&mut self) {
        self.flags.insert(HintFlags::RELEASED);
    }

    pub(crate) fn set_artifact(&mut self) {
        self.flags.insert(HintFlags::ARTIFACT | HintFlags::FINISHED);
    }

    pub(crate) fn set_overridden_role(&mut self, role: impl Into<String>) {
        self.overridden_role = Some(role.into());
    }
}

/// Storage slot for the hint key of an owner.
///
/// The slot gives owners identity semantics: two structurally equal owners
/// still get distinct hints.
///
/// A slot holds one key together with the id of the hint tree it belongs
/// to. Keying an owner in a second helper replaces its key in the first.
#[derive(Debug, Default)]
pub struct HintSlot(Cell<Option<(u64, HintKey)>>);

impl HintSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Key stored in the slot, whichever tree it belongs to.
    pub fn get(&self) -> Option<HintKey> {
        self.0.get().map(|(_, key)| key)
    }

    /// Key stored in the slot if it was created by the tree with `tree_id`.
    pub(crate) fn key_in(&self, tree_id: u64) -> Option<HintKey> {
        self.0.get().filter(|(id, _)| *id == tree_id).map(|(_, key)| key)
    }

    pub(crate) fn set(&self, tree_id: u64, key: HintKey) {
        self.0.set(Some((tree_id, key)));
    }
}

/// A layout object that takes part in the hint tree.
pub trait HintOwner {
    /// Slot holding the owner's hint key.
    fn hint_slot(&self) -> &HintSlot;

    /// Accessibility properties of the owner, if it has any.
    fn accessible_element(&self) -> Option<AccessibleElement>;

    /// True for model elements, false for renderers and other helpers.
    ///
    /// Hints created for model elements can only be finished by the element.
    fn is_element(&self) -> bool {
        false
    }
}

/// Plain [`HintOwner`] for callers without their own layout objects.
#[derive(Debug, Default)]
pub struct TaggableNode {
    slot: HintSlot,
    element: Option<AccessibleElement>,
    is_element: bool,
}

impl TaggableNode {
    /// Model element owner.
    pub fn element(element: AccessibleElement) -> Self {
        Self {
            slot: HintSlot::new(),
            element: Some(element),
            is_element: true,
        }
    }

    /// Renderer-like owner, optionally exposing an accessible element.
    pub fn renderer(element: Option<AccessibleElement>) -> Self {
        Self {
            slot: HintSlot::new(),
            element,
            is_element: false,
        }
    }
}

impl HintOwner for TaggableNode {
    fn hint_slot(&self) -> &HintSlot {
        &self.slot
    }

    fn accessible_element(&self) -> Option<AccessibleElement> {
        self.element.clone()
    }

    fn is_element(&self) -> bool {
        self.is_element
    }
}
