//! Renderer boundary
//!
//! The graph builder hands a renderer structured data only: the graph, the
//! edge style table and an output target. How a record node is drawn or an
//! edge routed is the renderer's business.

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{EdgeStyles, OutputFormat};
use crate::graph::Graph;

/// Where a renderer writes its output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    base: PathBuf,
    format: OutputFormat,
}

impl OutputTarget {
    /// Create a target; the written file is `<base>.<extension>`
    pub fn new(base: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            base: base.into(),
            format,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Full path of the file the renderer produces
    pub fn path(&self) -> PathBuf {
        let mut file = self.base.clone().into_os_string();
        file.push(".");
        file.push(self.format.extension());
        PathBuf::from(file)
    }

    /// Create the parent directory of the output file if needed
    pub fn ensure_parent_dir(&self) -> std::io::Result<()> {
        match self.path().parent() {
            Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

/// Everything a renderer receives for one diagram
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub graph: &'a Graph,
    pub styles: &'a EdgeStyles,
    pub target: &'a OutputTarget,
}

impl<'a> RenderRequest<'a> {
    pub fn new(graph: &'a Graph, styles: &'a EdgeStyles, target: &'a OutputTarget) -> Self {
        Self {
            graph,
            styles,
            target,
        }
    }
}

/// Core trait for diagram renderers
///
/// Implementations write one file per request and return its path. Errors
/// are returned to the caller unchanged; nothing retries a render.
pub trait Renderer: Send + Sync {
    /// Render the graph to the request's output target
    fn render(&self, request: &RenderRequest<'_>) -> Result<PathBuf>;

    /// Short renderer name for logs
    fn name(&self) -> &'static str;

    /// Returns true if this renderer can produce the given format
    fn supports(&self, format: OutputFormat) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_target_path() {
        let target = OutputTarget::new("doc/relational_diagram", OutputFormat::Svg);
        assert_eq!(target.path(), PathBuf::from("doc/relational_diagram.svg"));
        assert_eq!(target.base(), Path::new("doc/relational_diagram"));
        assert_eq!(target.format(), OutputFormat::Svg);
    }

    #[test]
    fn test_output_target_keeps_dots_in_base() {
        let target = OutputTarget::new("out/schema.v2", OutputFormat::Png);
        assert_eq!(target.path(), PathBuf::from("out/schema.v2.png"));
    }

    #[test]
    fn test_ensure_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = OutputTarget::new(dir.path().join("nested/deeper/diagram"), OutputFormat::Dot);
        target.ensure_parent_dir().unwrap();
        assert!(dir.path().join("nested/deeper").is_dir());

        let bare = OutputTarget::new("diagram", OutputFormat::Dot);
        assert!(bare.ensure_parent_dir().is_ok());
    }
}
