//! Graphviz renderer
//!
//! Writes DOT source directly, or pipes it through the `dot` program for
//! image formats.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::{debug, info, span, Level};

use super::dot::to_dot;
use crate::core::{GraphError, OutputFormat, RenderRequest, Renderer};

/// Renders graphs with Graphviz
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    program: String,
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self {
            program: "dot".to_string(),
        }
    }
}

impl GraphvizRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different Graphviz layout program, e.g. `neato`
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn run_graphviz(&self, source: &str, format: OutputFormat, output_path: &Path) -> Result<(), GraphError> {
        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", format.extension()))
            .arg("-o")
            .arg(output_path)
            .stdin(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    GraphError::render_error(format!(
                        "Graphviz '{}' command not found. Install Graphviz or use --format dot instead.",
                        self.program
                    ))
                } else {
                    GraphError::render_error(format!("failed to run {}: {}", self.program, e))
                }
            })?;

        // The program may exit before reading all of its input, so a failed
        // write is reported only after its exit status and stderr.
        let write_result = child
            .stdin
            .take()
            .map_or(Ok(()), |mut stdin| stdin.write_all(source.as_bytes()));

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GraphError::render_error(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        write_result.map_err(|e| {
            GraphError::render_error(format!("failed to send DOT source to {}: {}", self.program, e))
        })
    }
}

impl Renderer for GraphvizRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<PathBuf> {
        let format = request.target.format();
        let path = request.target.path();
        let render_span = span!(
            Level::INFO,
            "render_graphviz",
            format = %format,
            path = %path.display()
        );
        let _enter = render_span.enter();

        if !self.supports(format) {
            return Err(GraphError::InvalidFormat {
                value: format.to_string(),
            }
            .into());
        }

        let source = to_dot(request.graph, request.styles);
        debug!(bytes = source.len(), "Generated DOT source");

        request
            .target
            .ensure_parent_dir()
            .with_context(|| format!("creating directory for {}", path.display()))?;

        if format.needs_graphviz() {
            self.run_graphviz(&source, format, &path)?;
        } else {
            std::fs::write(&path, &source).with_context(|| format!("writing {}", path.display()))?;
        }

        info!(path = %path.display(), "Diagram written");
        Ok(path)
    }

    fn name(&self) -> &'static str {
        "graphviz"
    }

    fn supports(&self, format: OutputFormat) -> bool {
        format.needs_graphviz() || format == OutputFormat::Dot
    }
}
