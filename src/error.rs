//! Error types for the tagging engine.
//!
//! Hint tree inconsistencies are not fatal. They are reported as
//! [`Error::ContractViolation`], logged, recorded in the helper's diagnostics,
//! and the offending operation is skipped.

use crate::tagging::HintKey;
use std::fmt;

/// Result type alias for tagging operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building and releasing the hint tree.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A hint tree operation broke one of the tree's usage rules
    #[error("Tagging contract violation: {0}")]
    ContractViolation(Violation),

    /// The hint tree was not empty after all hints were released
    #[error("Hint tree not empty after release: {parent_links} parent links, {kid_lists} kid lists left")]
    ConsistencyAssertion {
        /// Remaining kid -> parent entries
        parent_links: usize,
        /// Remaining parent -> kids entries
        kid_lists: usize,
    },

    /// The structure element of a hint does not exist yet
    #[error("Structure element for hint {0} is not available yet")]
    MaterializationDeferred(HintKey),

    /// Invalid tagging configuration
    #[error("Invalid tagging configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The usage rule a hint tree operation violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Kids were added to a finished parent
    AddKidsToFinishedParent {
        /// Finished parent
        parent: HintKey,
    },
    /// A kid was added while it already had a parent
    KidAlreadyHasParent {
        /// Rejected kid
        kid: HintKey,
        /// Its current parent
        parent: HintKey,
    },
    /// Adding the kid would make the hint tree cyclic
    CyclicKid {
        /// Rejected kid
        kid: HintKey,
        /// Intended parent
        parent: HintKey,
    },
    /// A hint was moved under a finished parent
    MoveToFinishedParent {
        /// Hint to move
        kid: HintKey,
        /// Finished destination
        parent: HintKey,
    },
    /// A finished hint was moved away from its finished parent
    MoveFinishedKid {
        /// Finished hint
        kid: HintKey,
    },
    /// A finished hint was replaced
    ReplaceFinishedKid {
        /// Finished hint
        kid: HintKey,
    },
    /// A hint was marked artifact after its structure element was created
    TaggedHintMarkedArtifact {
        /// Affected hint
        hint: HintKey,
    },
    /// The role of a finished artifact was changed
    ModifyFinishedArtifact {
        /// Affected hint
        hint: HintKey,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::AddKidsToFinishedParent { parent } => {
                write!(f, "cannot add kid hints to finished hint {}", parent)
            },
            Violation::KidAlreadyHasParent { kid, parent } => {
                write!(f, "hint {} is already a kid of hint {}", kid, parent)
            },
            Violation::CyclicKid { kid, parent } => {
                write!(f, "hint {} is an ancestor of (or equal to) hint {}", kid, parent)
            },
            Violation::MoveToFinishedParent { kid, parent } => {
                write!(f, "cannot move hint {} to finished hint {}", kid, parent)
            },
            Violation::MoveFinishedKid { kid } => {
                write!(f, "cannot move finished hint {}", kid)
            },
            Violation::ReplaceFinishedKid { kid } => {
                write!(f, "cannot replace finished hint {}", kid)
            },
            Violation::TaggedHintMarkedArtifact { hint } => {
                write!(f, "hint {} was marked artifact after its structure element was created", hint)
            },
            Violation::ModifyFinishedArtifact { hint } => {
                write!(f, "cannot change finished artifact hint {}", hint)
            },
        }
    }
}

impl From<Violation> for Error {
    fn from(violation: Violation) -> Self {
        Error::ContractViolation(violation)
    }
}
