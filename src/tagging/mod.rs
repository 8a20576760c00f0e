//! Layout tagging: the accessibility hint tree.
//!
//! While a layout is converted into a tagged PDF, the final structure of the
//! document is not known up front. Tables are split across pages, headers are
//! repeated, content is drawn out of order, and some objects turn out to be
//! artifacts only after they were laid out. This module keeps an intermediate
//! *hint tree* of "what should be tagged how" and turns it into structure
//! elements lazily:
//!
//! 1. The layout pass registers owners ([`HintOwner`]) and their kids
//!    ([`LayoutTaggingHelper::add_kids`]).
//! 2. When content is drawn, [`LayoutTaggingHelper::create_node`] creates the
//!    structure element of a hint at its document-order position.
//! 3. When an element completes, [`LayoutTaggingHelper::finish`] runs the
//!    [`rules`] for its role. Rules may restructure the tree (tables) or keep
//!    the hint open.
//! 4. [`LayoutTaggingHelper::release_finished`] lets finished hints go, in
//!    document order, so their elements can be flushed.
//!
//! ## Example
//!
//! ```
//! use pdf_tagging::config::TaggingConfig;
//! use pdf_tagging::structure::StructTree;
//! use pdf_tagging::tagging::{AccessibleElement, LayoutTaggingHelper, TaggableNode};
//!
//! let mut helper = LayoutTaggingHelper::new(TaggingConfig::default(), StructTree::new());
//! let section = TaggableNode::element(AccessibleElement::new("Sect"));
//! let paragraph = TaggableNode::element(AccessibleElement::new("P"));
//!
//! let sect = helper.get_or_create(&section);
//! let p = helper.get_or_create(&paragraph);
//! helper.add_kids(sect, &[p], None);
//!
//! helper.finish(p);
//! helper.finish(sect);
//! assert_eq!(helper.release_finished(), vec![sect, p]);
//! ```

mod conflicts;
mod helper;
mod hint;
mod materializer;
mod release;
pub mod roles;
pub mod rules;
mod store;

pub use conflicts::RoleConflictTable;
pub use helper::{FinishTrigger, HintNodeDump, LayoutTaggingHelper};
pub use hint::{AccessibleElement, ElementKind, HintData, HintFlags, HintKey, HintOwner, HintSlot, TaggableNode};
pub use roles::{RoleMapNormalizer, RoleNormalizer};
pub use rules::{LegacyGroupingRule, RuleRegistry, TableTaggingRule, TaggingRule, ThTaggingRule};
pub use store::{HintTree, RemoveOutcome};
