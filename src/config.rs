//! Configuration for structure tagging.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Target PDF version of the tagged document.
///
/// The version selects the structure grammar: table row groups exist from
/// PDF 1.5 on, and PDF 2.0 introduces a new standard structure namespace
/// with different nesting rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum PdfVersion {
    /// PDF 1.3
    #[serde(rename = "1.3")]
    Pdf13,
    /// PDF 1.4
    #[serde(rename = "1.4")]
    Pdf14,
    /// PDF 1.5
    #[serde(rename = "1.5")]
    Pdf15,
    /// PDF 1.6
    #[serde(rename = "1.6")]
    Pdf16,
    /// PDF 1.7 (ISO 32000-1)
    #[default]
    #[serde(rename = "1.7")]
    Pdf17,
    /// PDF 2.0 (ISO 32000-2)
    #[serde(rename = "2.0")]
    Pdf20,
}

impl PdfVersion {
    /// Parse a version string such as "1.7" or "2.0".
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "1.3" => Some(PdfVersion::Pdf13),
            "1.4" => Some(PdfVersion::Pdf14),
            "1.5" => Some(PdfVersion::Pdf15),
            "1.6" => Some(PdfVersion::Pdf16),
            "1.7" => Some(PdfVersion::Pdf17),
            "2.0" => Some(PdfVersion::Pdf20),
            _ => None,
        }
    }

    /// Version string as written in the file header.
    pub fn as_str(&self) -> &'static str {
        match self {
            PdfVersion::Pdf13 => "1.3",
            PdfVersion::Pdf14 => "1.4",
            PdfVersion::Pdf15 => "1.5",
            PdfVersion::Pdf16 => "1.6",
            PdfVersion::Pdf17 => "1.7",
            PdfVersion::Pdf20 => "2.0",
        }
    }

    /// Check if the PDF 2.0 nesting rules apply.
    pub fn uses_current_grammar(&self) -> bool {
        *self >= PdfVersion::Pdf20
    }

    /// Check if THead/TBody/TFoot row groups are available (PDF 1.5+).
    pub fn supports_table_grouping(&self) -> bool {
        *self >= PdfVersion::Pdf15
    }
}

impl fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PDF-{}", self.as_str())
    }
}

/// Caller-supplied replacement for an illegal parent/child role pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConflictOverride {
    /// Role of the parent element
    pub parent: String,
    /// Role of the offending child element
    pub child: String,
    /// Role the child is given instead
    pub replacement: String,
}

/// Tagging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    /// Target PDF version.
    pub pdf_version: PdfVersion,

    /// Flush structure elements as soon as their hints are released.
    pub immediate_flush: bool,

    /// Role conflict replacements that take precedence over the built-in table.
    pub role_conflict_overrides: Vec<RoleConflictOverride>,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TaggingConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            pdf_version: PdfVersion::default(),
            immediate_flush: true,
            role_conflict_overrides: Vec::new(),
        }
    }

    /// Set the target PDF version.
    pub fn with_pdf_version(mut self, version: PdfVersion) -> Self {
        self.pdf_version = version;
        self
    }

    /// Enable or disable immediate flushing of released elements.
    pub fn with_immediate_flush(mut self, enable: bool) -> Self {
        self.immediate_flush = enable;
        self
    }

    /// Add a role conflict replacement.
    pub fn with_role_conflict_override(
        mut self,
        parent: impl Into<String>,
        child: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        self.role_conflict_overrides.push(RoleConflictOverride {
            parent: parent.into(),
            child: child.into(),
            replacement: replacement.into(),
        });
        self
    }

    /// Check the configuration for unusable values.
    pub fn validate(&self) -> Result<()> {
        for entry in &self.role_conflict_overrides {
            if entry.parent.is_empty() || entry.child.is_empty() || entry.replacement.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "role conflict override has an empty role: {:?}",
                    entry
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON.
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TaggingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
