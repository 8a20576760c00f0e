//! Standard structure types and structure attributes.
//!
//! Structure types follow ISO 32000-1:2008 Section 14.8.4, extended with the
//! PDF 2.0 additions (ISO 32000-2:2020 Section 14.8.4) that the nesting rules
//! of this crate rely on.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard structure types.
///
/// Custom types can be mapped to standard types via a role map
/// (see [`crate::tagging::RoleMapNormalizer`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StructType {
    // Document-level structure types
    /// Document root
    Document,
    /// Part (major division)
    Part,
    /// Article
    Art,
    /// Section
    Sect,
    /// Division
    Div,
    /// Non-structural grouping element (transparent)
    NonStruct,

    // Paragraph-level structure types
    /// Paragraph
    P,
    /// Heading
    H,
    /// Heading level 1
    H1,
    /// Heading level 2
    H2,
    /// Heading level 3
    H3,
    /// Heading level 4
    H4,
    /// Heading level 5
    H5,
    /// Heading level 6
    H6,
    /// Sub-paragraph (PDF 2.0)
    Sub,
    /// Caption
    Caption,

    // List structure types
    /// List
    L,
    /// List item
    LI,
    /// Label (list item marker, form label)
    Lbl,
    /// List body (list item content)
    LBody,

    // Table structure types
    /// Table
    Table,
    /// Table row
    TR,
    /// Table header cell
    TH,
    /// Table data cell
    TD,
    /// Table header group
    THead,
    /// Table body group
    TBody,
    /// Table footer group
    TFoot,

    // Inline structure types
    /// Span (inline generic)
    Span,
    /// Quote
    Quote,
    /// Note
    Note,
    /// Reference
    Reference,
    /// Code
    Code,
    /// Link
    Link,
    /// Annotation
    Annot,

    // Illustration structure types
    /// Figure
    Figure,
    /// Formula
    Formula,
    /// Form (input field)
    Form,

    /// Pseudo-role marking content excluded from the structure tree
    Artifact,

    /// Custom structure type not defined in the PDF specification
    Custom(String),
}

impl StructType {
    /// Parse structure type from a role name (e.g., "P" -> StructType::P)
    pub fn from_str(s: &str) -> Self {
        match s {
            "Document" => Self::Document,
            "Part" => Self::Part,
            "Art" => Self::Art,
            "Sect" => Self::Sect,
            "Div" => Self::Div,
            "NonStruct" => Self::NonStruct,
            "P" => Self::P,
            "H" => Self::H,
            "H1" => Self::H1,
            "H2" => Self::H2,
            "H3" => Self::H3,
            "H4" => Self::H4,
            "H5" => Self::H5,
            "H6" => Self::H6,
            "Sub" => Self::Sub,
            "Caption" => Self::Caption,
            "L" => Self::L,
            "LI" => Self::LI,
            "Lbl" => Self::Lbl,
            "LBody" => Self::LBody,
            "Table" => Self::Table,
            "TR" => Self::TR,
            "TH" => Self::TH,
            "TD" => Self::TD,
            "THead" => Self::THead,
            "TBody" => Self::TBody,
            "TFoot" => Self::TFoot,
            "Span" => Self::Span,
            "Quote" => Self::Quote,
            "Note" => Self::Note,
            "Reference" => Self::Reference,
            "Code" => Self::Code,
            "Link" => Self::Link,
            "Annot" => Self::Annot,
            "Figure" => Self::Figure,
            "Formula" => Self::Formula,
            "Form" => Self::Form,
            "Artifact" => Self::Artifact,
            _ => Self::Custom(s.to_string()),
        }
    }

    /// Role name as written into the structure tree.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Document => "Document",
            Self::Part => "Part",
            Self::Art => "Art",
            Self::Sect => "Sect",
            Self::Div => "Div",
            Self::NonStruct => "NonStruct",
            Self::P => "P",
            Self::H => "H",
            Self::H1 => "H1",
            Self::H2 => "H2",
            Self::H3 => "H3",
            Self::H4 => "H4",
            Self::H5 => "H5",
            Self::H6 => "H6",
            Self::Sub => "Sub",
            Self::Caption => "Caption",
            Self::L => "L",
            Self::LI => "LI",
            Self::Lbl => "Lbl",
            Self::LBody => "LBody",
            Self::Table => "Table",
            Self::TR => "TR",
            Self::TH => "TH",
            Self::TD => "TD",
            Self::THead => "THead",
            Self::TBody => "TBody",
            Self::TFoot => "TFoot",
            Self::Span => "Span",
            Self::Quote => "Quote",
            Self::Note => "Note",
            Self::Reference => "Reference",
            Self::Code => "Code",
            Self::Link => "Link",
            Self::Annot => "Annot",
            Self::Figure => "Figure",
            Self::Formula => "Formula",
            Self::Form => "Form",
            Self::Artifact => "Artifact",
            Self::Custom(s) => s,
        }
    }

    /// Check if this is a heading type (H, H1-H6)
    pub fn is_heading(&self) -> bool {
        matches!(self, Self::H | Self::H1 | Self::H2 | Self::H3 | Self::H4 | Self::H5 | Self::H6)
    }

    /// Check if this is a table cell (TH or TD)
    pub fn is_table_cell(&self) -> bool {
        matches!(self, Self::TH | Self::TD)
    }

    /// Check if this is a table row group (THead, TBody, TFoot).
    ///
    /// Row groups were introduced in PDF 1.5.
    pub fn is_table_row_group(&self) -> bool {
        matches!(self, Self::THead | Self::TBody | Self::TFoot)
    }

    /// Check if this role is a transparent grouping element.
    ///
    /// Transparent elements do not take part in parent/child legality checks:
    /// their kids are judged against the nearest non-transparent ancestor.
    pub fn is_transparent(&self) -> bool {
        matches!(self, Self::NonStruct | Self::Div)
    }
}

impl fmt::Display for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attribute object of a structure element (the `/A` entry).
///
/// Each attribute object belongs to an owner (`/O`), e.g. `Table` or
/// `Layout`, and holds name/value pairs in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructAttributes {
    /// Attribute owner (e.g., "Table", "Layout", "List")
    pub owner: String,

    /// Attribute entries in insertion order
    pub entries: IndexMap<String, String>,
}

impl StructAttributes {
    /// Create an empty attribute object for the given owner.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            entries: IndexMap::new(),
        }
    }

    /// Add (or replace) an enum-valued attribute.
    pub fn with_enum(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    /// Get an attribute value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Remove an attribute, keeping the order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.shift_remove(name)
    }

    /// Check if the attribute object has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
