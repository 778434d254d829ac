//! Core error types for schema graph processing
//!
//! Configuration errors (bad names, unresolvable targets) abort a build.
//! Render errors are propagated unchanged to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Core error types for schema graph processing
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Unresolvable target: {model}.{relationship} refers to {target}, which is not in the model set")]
    UnresolvableTarget {
        model: String,
        relationship: String,
        target: String,
    },

    #[error("Invalid naming convention: {value} (expected language-style or storage-style)")]
    InvalidConvention { value: String },

    #[error("Invalid edge kind: {value} (expected one_to_many, one_to_one, many_to_one or inheritance)")]
    InvalidEdgeKind { value: String },

    #[error("Invalid style: {message}")]
    InvalidStyle { message: String },

    #[error("Invalid output format: {value} (expected png, svg, pdf, dot or txt)")]
    InvalidFormat { value: String },

    #[error("Parse error in {}: {message} at line {line}, column {column}", .file.display())]
    Parse {
        file: PathBuf,
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl GraphError {
    /// Create a new unresolvable-target error
    pub fn unresolvable_target(
        model: impl Into<String>,
        relationship: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::UnresolvableTarget {
            model: model.into(),
            relationship: relationship.into(),
            target: target.into(),
        }
    }

    /// Create a new parse error
    pub fn parse_error(file: impl Into<PathBuf>, message: String, line: usize, column: usize) -> Self {
        Self::Parse {
            file: file.into(),
            message,
            line,
            column,
        }
    }

    /// Create a new render error
    pub fn render_error(message: String) -> Self {
        Self::Render { message }
    }

    /// Create a new style error
    pub fn style_error(message: String) -> Self {
        Self::InvalidStyle { message }
    }

    /// Returns true for errors caused by the caller's configuration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnresolvableTarget { .. }
                | Self::InvalidConvention { .. }
                | Self::InvalidEdgeKind { .. }
                | Self::InvalidStyle { .. }
                | Self::InvalidFormat { .. }
        )
    }
}
