//! Plugin orchestrator for the diagram pipeline
//!
//! The orchestrator runs every stage of one diagram:
//! Loader → GraphBuilder → Renderer

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use tracing::{debug, info, span, warn, Level};

use super::{GraphvizRenderer, TextRenderer};
use crate::config::DiagramConfig;
use crate::core::{EdgeStyles, NamingConvention, OutputFormat, OutputTarget, RenderRequest, Renderer};
use crate::graph::{Graph, GraphBuilder};
use crate::loader::{LoadReport, Project, ProjectConfig};
use crate::naming::NamingConfig;
use crate::schema::Schema;

/// Output of a full pipeline run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Files written, one per diagram
    pub outputs: Vec<PathBuf>,
    pub model_count: usize,
    /// Paths that failed to load and were skipped
    pub load_failures: usize,
}

/// Coordinates loading, graph building and rendering
///
/// Renderers are tried in registration order; the first one that supports
/// the requested format renders it.
pub struct Orchestrator {
    renderers: Vec<Box<dyn Renderer>>,
}

impl Orchestrator {
    /// Create a new orchestrator with no renderers
    pub fn new() -> Self {
        Self {
            renderers: Vec::new(),
        }
    }

    /// Create an orchestrator with the Graphviz and text renderers registered
    pub fn with_default_renderers() -> Self {
        let mut orchestrator = Self::new();
        orchestrator.register_renderer(Box::new(GraphvizRenderer::new()));
        orchestrator.register_renderer(Box::new(TextRenderer::new()));
        orchestrator
    }

    pub fn register_renderer(&mut self, renderer: Box<dyn Renderer>) {
        self.renderers.push(renderer);
    }

    /// Get registered renderer names
    pub fn renderer_names(&self) -> Vec<&'static str> {
        self.renderers.iter().map(|r| r.name()).collect()
    }

    pub fn renderer_for(&self, format: OutputFormat) -> Option<&dyn Renderer> {
        self.renderers
            .iter()
            .find(|renderer| renderer.supports(format))
            .map(|renderer| renderer.as_ref())
    }

    /// Load project files into a schema
    pub fn load(&self, project: &ProjectConfig) -> LoadReport {
        let mut project = Project::new(project);
        let report = project.load();
        for failure in &report.failures {
            debug!(path = %failure.path, error = %failure.message, "Load failure recorded");
        }
        report
    }

    /// Build the graph of every model in a schema
    pub fn build(&self, schema: &Schema, naming: &NamingConfig) -> Result<Graph> {
        Ok(GraphBuilder::new(naming).build(schema)?)
    }

    /// Render a graph with the first renderer that supports the target format
    pub fn render(&self, graph: &Graph, styles: &EdgeStyles, target: &OutputTarget) -> Result<PathBuf> {
        let render_span = span!(Level::INFO, "render", format = %target.format());
        let _enter = render_span.enter();

        let renderer = self
            .renderer_for(target.format())
            .ok_or_else(|| anyhow!("No renderer available for format {}", target.format()))?;
        debug!(renderer = renderer.name(), "Selected renderer");

        renderer.render(&RenderRequest::new(graph, styles, target))
    }

    /// Build and render one diagram from an already loaded schema
    pub fn generate_from_schema(&self, schema: &Schema, config: &DiagramConfig) -> Result<PathBuf> {
        let styles = config.styles.to_styles()?;
        let graph = self.build(schema, &config.naming)?;
        self.render(&graph, &styles, &config.output.target())
    }

    /// Run the complete pipeline for one configuration
    pub fn generate(&self, config: &DiagramConfig) -> Result<RunReport> {
        self.generate_all(&[config.clone()])
    }

    /// Load once, then build and render one diagram per configuration
    ///
    /// Every configuration shares the first one's project settings.
    pub fn generate_all(&self, configs: &[DiagramConfig]) -> Result<RunReport> {
        let pipeline_span = span!(Level::INFO, "generate", diagrams = configs.len());
        let _enter = pipeline_span.enter();

        let first = configs
            .first()
            .ok_or_else(|| anyhow!("No diagram configuration given"))?;

        // validate styles before doing any work
        for config in configs {
            config.styles.to_styles()?;
        }

        let report = self.load(&first.project);
        if report.schema.is_empty() {
            warn!("No models were loaded");
        }

        let mut outputs = Vec::with_capacity(configs.len());
        for config in configs {
            let path = self.generate_from_schema(&report.schema, config)?;
            info!(path = %path.display(), "Generated diagram");
            outputs.push(path);
        }

        Ok(RunReport {
            outputs,
            model_count: report.schema.len(),
            load_failures: report.failures.len(),
        })
    }

    /// Relational (language-style) and schema (storage-style) diagrams
    /// written as `relational_diagram` and `schema_diagram` in `dir`
    pub fn paired_configs(config: &DiagramConfig, dir: &std::path::Path) -> [DiagramConfig; 2] {
        [
            config.variant(NamingConvention::Language, dir.join("relational_diagram")),
            config.variant(NamingConvention::Storage, dir.join("schema_diagram")),
        ]
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::with_default_renderers()
    }
}
