//! Abstract node/edge graph of a schema
//!
//! Nodes are record-shaped: a title plus two column lists. Edges carry their
//! [`EdgeKind`]; renderers decide how each kind looks.

mod builder;

pub use builder::GraphBuilder;

use std::fmt;

use serde::Serialize;

use crate::core::EdgeKind;
use crate::schema::ModelId;

/// Position of a node in its graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// One attribute line of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub type_name: String,
}

impl Column {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.type_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(skip)]
    pub model: ModelId,
    pub name: String,
    pub properties: Vec<Column>,
    pub foreign_keys: Vec<Column>,
}

impl Node {
    /// Own properties followed by foreign keys
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.properties.iter().chain(self.foreign_keys.iter())
    }

    /// Column lines as displayed in a record, `name: type`
    pub fn column_lines(&self) -> Vec<String> {
        self.columns().map(Column::to_string).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: EdgeKind,
    /// Declaring relationship; `None` for inheritance edges
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
}

/// Nodes and edges in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub(crate) fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// First node with the given display name
    pub fn node_named(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.name == name)
    }

    pub fn node_for(&self, model: ModelId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.model == model)
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |edge| edge.kind == kind)
    }

    pub fn relationship_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|edge| edge.kind.is_relationship())
    }

    pub fn inheritance_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges_of_kind(EdgeKind::Inheritance)
    }

    /// Display names of an edge's endpoints
    pub fn endpoint_names(&self, edge: &Edge) -> Option<(&str, &str)> {
        let from = self.node(edge.from)?;
        let to = self.node(edge.to)?;
        Some((from.name.as_str(), to.name.as_str()))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
