// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::should_implement_trait)]
#![allow(clippy::new_without_default)]
#![allow(clippy::unnecessary_lazy_evaluations)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]
#![cfg_attr(test, allow(unused_variables))]

//! # PDF Tagging
//!
//! Structure tagging for layout-to-PDF conversion: builds the accessibility
//! hint tree of a layout pass and materializes it into a Tagged PDF
//! structure tree (ISO 32000-1:2008 Section 14.7-14.8, ISO 32000-2:2020).
//!
//! ## Core Features
//!
//! - **Hint Tree**: Identity-keyed hints for layout objects, with ordered kids
//!   and non-accessible wrappers that are looked through
//! - **Lazy Materialization**: Structure elements are created when content is
//!   drawn and always placed in document order
//! - **Rules**: Per-role callbacks on finish; built-in table row grouping,
//!   `TH` scope defaults and PDF 1.4 row group removal
//! - **Role Conflicts**: Illegal parent/kid role pairs are fixed per PDF
//!   version (`Sub` in PDF 2.0, `Span` before)
//! - **Incremental Release**: Finished hints are released (and their elements
//!   flushed) without ever overtaking pending content
//!
//! ## Architecture
//!
//! - [`tagging`]: hint tree, lifecycle, materializer, rules, role conflicts
//! - [`structure`]: the target structure tree and its collaborator traits
//! - [`config`]: PDF version and tagging options
//! - [`error`]: error types
//!
//! ## Quick Start
//!
//! ```
//! use pdf_tagging::config::{PdfVersion, TaggingConfig};
//! use pdf_tagging::structure::{StructTree, TagCursor};
//! use pdf_tagging::tagging::{AccessibleElement, FinishTrigger, LayoutTaggingHelper, TaggableNode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TaggingConfig::new().with_pdf_version(PdfVersion::Pdf20);
//! let mut helper = LayoutTaggingHelper::new(config, StructTree::new());
//!
//! let heading = TaggableNode::element(AccessibleElement::new("H1"));
//! let paragraph = TaggableNode::element(AccessibleElement::new("P"));
//! helper.add_owner_kids(&heading, &[&paragraph], None);
//!
//! // A paragraph inside a heading is not allowed in PDF 2.0.
//! let h1 = helper.get_or_create(&heading);
//! helper.resolve_role_conflicts(h1);
//!
//! let mut cursor = TagCursor::at_root(helper.structure());
//! helper.create_owner_node(&paragraph, &mut cursor);
//!
//! helper.finish_owner(&paragraph, FinishTrigger::Element);
//! helper.finish(h1);
//! helper.release_all()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

/// PDF logical structure (Tagged PDFs)
pub mod structure;

// Hint tree and tagging lifecycle
pub mod tagging;

// Re-exports
pub use config::{PdfVersion, TaggingConfig};
pub use error::{Error, Result};
pub use tagging::{HintKey, LayoutTaggingHelper};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
