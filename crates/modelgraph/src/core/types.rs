//! Core type definitions for schema graph processing
//!
//! This module contains the closed enumerations shared by every stage:
//! relationship kinds, edge kinds, naming conventions and output formats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::GraphError;

/// Kind of a relationship declared on a model
///
/// Resolved once when the schema is loaded; nothing downstream inspects
/// relationship objects for capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Inverse side of a foreign key: `has_many`
    OneToMany,
    /// Single associated record: `has_one`
    OneToOne,
    /// Owning side of a foreign key: `belongs_to`
    ManyToOne,
    /// Chained through another relationship, no storage of its own
    Through,
}

impl RelationshipKind {
    /// Returns true if the relationship stores a key on the declaring model
    pub fn owns_foreign_key(&self) -> bool {
        matches!(self, RelationshipKind::ManyToOne | RelationshipKind::OneToOne)
    }

    /// Returns true if the relationship is derived from another one
    pub fn is_derived(&self) -> bool {
        matches!(self, RelationshipKind::Through)
    }

    /// The edge kind a relationship of this kind is drawn with
    pub fn edge_kind(&self) -> Option<EdgeKind> {
        match self {
            RelationshipKind::OneToMany => Some(EdgeKind::OneToMany),
            RelationshipKind::OneToOne => Some(EdgeKind::OneToOne),
            RelationshipKind::ManyToOne => Some(EdgeKind::ManyToOne),
            RelationshipKind::Through => None,
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipKind::OneToMany => write!(f, "one_to_many"),
            RelationshipKind::OneToOne => write!(f, "one_to_one"),
            RelationshipKind::ManyToOne => write!(f, "many_to_one"),
            RelationshipKind::Through => write!(f, "through"),
        }
    }
}

/// Kind of an edge in the built graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    OneToMany,
    OneToOne,
    ManyToOne,
    /// Ancestor → descendant, never labeled
    Inheritance,
}

impl EdgeKind {
    /// All edge kinds, in style-table order
    pub fn all() -> &'static [EdgeKind] {
        &[
            EdgeKind::OneToMany,
            EdgeKind::OneToOne,
            EdgeKind::ManyToOne,
            EdgeKind::Inheritance,
        ]
    }

    /// Returns true for edges that come from a relationship
    pub fn is_relationship(&self) -> bool {
        !matches!(self, EdgeKind::Inheritance)
    }

    /// Returns true if edges of this kind may carry a label
    pub fn is_labelable(&self) -> bool {
        self.is_relationship()
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::OneToMany => write!(f, "one_to_many"),
            EdgeKind::OneToOne => write!(f, "one_to_one"),
            EdgeKind::ManyToOne => write!(f, "many_to_one"),
            EdgeKind::Inheritance => write!(f, "inheritance"),
        }
    }
}

impl FromStr for EdgeKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "one_to_many" => Ok(EdgeKind::OneToMany),
            "one_to_one" => Ok(EdgeKind::OneToOne),
            "many_to_one" => Ok(EdgeKind::ManyToOne),
            // the original tool spelled it this way
            "inheritance" | "inheritence" => Ok(EdgeKind::Inheritance),
            _ => Err(GraphError::InvalidEdgeKind {
                value: s.to_string(),
            }),
        }
    }
}

/// Naming convention used to display models and keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NamingConvention {
    /// Identifiers as declared in code: `User`, `user`
    #[default]
    Language,
    /// Identifiers as stored: `blogdb.blog_users`, `user_id`
    Storage,
}

impl NamingConvention {
    /// Returns true for the storage-style convention
    pub fn is_storage(&self) -> bool {
        matches!(self, NamingConvention::Storage)
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingConvention::Language => write!(f, "language-style"),
            NamingConvention::Storage => write!(f, "storage-style"),
        }
    }
}

impl FromStr for NamingConvention {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "language-style" | "language" | "ruby" | "relational" => Ok(NamingConvention::Language),
            "storage-style" | "storage" | "sql" | "schema" => Ok(NamingConvention::Storage),
            _ => Err(GraphError::InvalidConvention {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for NamingConvention {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NamingConvention> for String {
    fn from(value: NamingConvention) -> Self {
        value.to_string()
    }
}

/// Output file format handed to a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    Png,
    #[default]
    Svg,
    Pdf,
    /// Graphviz source text, no external program needed
    Dot,
    /// Box-drawing text preview
    Txt,
}

impl OutputFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Dot => "dot",
            OutputFormat::Txt => "txt",
        }
    }

    /// Returns true if the format needs the Graphviz `dot` program
    pub fn needs_graphviz(&self) -> bool {
        matches!(self, OutputFormat::Png | OutputFormat::Svg | OutputFormat::Pdf)
    }

    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["png", "svg", "pdf", "dot", "txt"]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            "pdf" => Ok(OutputFormat::Pdf),
            "dot" | "gv" | "graphviz" => Ok(OutputFormat::Dot),
            "txt" | "text" | "ascii" => Ok(OutputFormat::Txt),
            _ => Err(GraphError::InvalidFormat {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputFormat> for String {
    fn from(value: OutputFormat) -> Self {
        value.to_string()
    }
}
