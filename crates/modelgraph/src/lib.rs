//! Modelgraph - Translate ORM model schemas into diagrams
//!
//! A library for turning a set of model definitions (properties,
//! relationships, inheritance) into a node/edge graph and rendering that
//! graph as Graphviz DOT, images or plain text.
//!
//! # Quick Start
//!
//! ```rust
//! use modelgraph::{build_graph, to_dot, NamingConfig, SchemaBuilder};
//!
//! let mut builder = SchemaBuilder::new();
//! builder.model("User").property("id", "Serial").has_many("posts", "Post");
//! builder.model("Post").property("id", "Serial").belongs_to("user", "User");
//! let schema = builder.build();
//!
//! let graph = build_graph(&schema, &NamingConfig::default()).unwrap();
//! assert_eq!(graph.node_count(), 2);
//!
//! let dot = to_dot(&graph);
//! assert!(dot.contains("n0 -> n1"));
//! ```
//!
//! # Advanced Usage
//!
//! Load model files from disk and render through the orchestrator:
//!
//! ```rust,no_run
//! use modelgraph::prelude::*;
//!
//! let mut config = DiagramConfig::default();
//! config.project.include.push("lib".into());
//! config.project.require.push("blog".to_string());
//! config.output.format = OutputFormat::Dot;
//!
//! let report = Orchestrator::default().generate(&config).unwrap();
//! println!("wrote {}", report.outputs[0].display());
//! ```

pub mod classifier;
pub mod config;
pub mod core;
pub mod graph;
pub mod loader;
pub mod naming;
pub mod plugins;
pub mod schema;

pub use crate::config::{DiagramConfig, Preset};
pub use crate::core::*;
pub use crate::graph::{Edge, Graph, GraphBuilder, Node, NodeId};
pub use crate::naming::{NameResolver, NamingConfig};
pub use crate::schema::{ModelDescriptor, Schema, SchemaBuilder};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::classifier::Classification;
    pub use crate::config::{DiagramConfig, OutputConfig, Preset, StyleConfig};
    pub use crate::core::{
        EdgeKind, EdgeStyles, GraphError, NamingConvention, OutputFormat, OutputTarget,
        RelationshipKind, RenderRequest, Renderer,
    };
    pub use crate::graph::{Column, Edge, Graph, GraphBuilder, Node, NodeId};
    pub use crate::loader::{LoadReport, Project, ProjectConfig};
    pub use crate::naming::{NameResolver, NamingConfig};
    pub use crate::plugins::{GraphvizRenderer, Orchestrator, RunReport, TextRenderer};
    pub use crate::schema::{ModelDescriptor, ModelId, ModelRef, Schema, SchemaBuilder};
}

/// Build the graph of every model in a schema
///
/// # Example
/// ```rust
/// use modelgraph::{build_graph, NamingConfig, NamingConvention, SchemaBuilder};
///
/// let mut builder = SchemaBuilder::new();
/// builder.model("Tag").property("id", "Serial");
/// let schema = builder.build();
///
/// let naming = NamingConfig::new().with_convention(NamingConvention::Storage);
/// let graph = build_graph(&schema, &naming).unwrap();
/// assert_eq!(graph.nodes()[0].name, "tags");
/// ```
pub fn build_graph(schema: &Schema, naming: &NamingConfig) -> Result<Graph, GraphError> {
    GraphBuilder::new(naming).build(schema)
}

/// DOT source for a graph with the default edge styles
pub fn to_dot(graph: &Graph) -> String {
    plugins::to_dot(graph, &EdgeStyles::default())
}

/// Plain-text rendering of a graph with the default edge styles
pub fn to_text(graph: &Graph) -> String {
    plugins::TextRenderer::new().render_to_string(graph, &EdgeStyles::default())
}

/// Load, build and render one diagram, returning the written file
pub fn generate(config: &DiagramConfig) -> anyhow::Result<std::path::PathBuf> {
    let report = plugins::Orchestrator::default().generate(config)?;
    report
        .outputs
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("No diagram was written"))
}
