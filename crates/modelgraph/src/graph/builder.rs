//! Schema to graph translation
//!
//! Three passes over the build set, in input order:
//! 1. one node per model (own properties, then foreign keys)
//! 2. one edge per graph-relevant relationship
//! 3. one edge per ordinary-class immediate ancestor
//!
//! Any target outside the build set aborts the build with
//! [`GraphError::UnresolvableTarget`].

use std::collections::HashMap;

use tracing::{debug, info, span, trace, Level};

use super::{Column, Edge, Graph, Node, NodeId};
use crate::classifier::{self, Classification};
use crate::core::{EdgeKind, GraphError};
use crate::naming::{NameResolver, NamingConfig};
use crate::schema::{Ancestor, ModelDescriptor, ModelId, ModelRef, Schema};

/// Builds a [`Graph`] from a [`Schema`] under one naming configuration
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder<'a> {
    resolver: NameResolver<'a>,
}

/// Models selected for one build, with their node positions
struct BuildSet<'s> {
    schema: &'s Schema,
    models: Vec<&'s ModelDescriptor>,
    nodes: HashMap<ModelId, NodeId>,
}

impl<'s> BuildSet<'s> {
    fn new(schema: &'s Schema, ids: &[ModelId]) -> Result<Self, GraphError> {
        let mut models = Vec::with_capacity(ids.len());
        let mut nodes = HashMap::with_capacity(ids.len());

        for id in ids {
            if nodes.contains_key(id) {
                trace!(model = id.index(), "Skipping duplicate model in build set");
                continue;
            }
            let model = schema.model(*id).ok_or_else(|| {
                GraphError::unresolvable_target("<build set>", "model", format!("#{}", id.index()))
            })?;
            nodes.insert(*id, NodeId(models.len()));
            models.push(model);
        }

        Ok(Self {
            schema,
            models,
            nodes,
        })
    }

    /// Node of a referenced model, or an unresolvable-target error
    fn node_of(
        &self,
        model: &ModelDescriptor,
        relationship: &str,
        target: &ModelRef,
    ) -> Result<(NodeId, &'s ModelDescriptor), GraphError> {
        let resolved = target
            .id()
            .and_then(|id| Some((*self.nodes.get(&id)?, self.schema.model(id)?)));

        resolved.ok_or_else(|| {
            GraphError::unresolvable_target(
                model.name(),
                relationship,
                self.schema.reference_name(target),
            )
        })
    }
}

impl<'a> GraphBuilder<'a> {
    pub fn new(config: &'a NamingConfig) -> Self {
        Self {
            resolver: NameResolver::new(config),
        }
    }

    pub fn resolver(&self) -> &NameResolver<'a> {
        &self.resolver
    }

    /// Build a graph of every model in the schema, in registration order
    pub fn build(&self, schema: &Schema) -> Result<Graph, GraphError> {
        let ids: Vec<ModelId> = schema.ids().collect();
        self.build_models(schema, &ids)
    }

    /// Build a graph of the given models, in the given order
    ///
    /// Duplicate ids collapse to their first occurrence.
    pub fn build_models(&self, schema: &Schema, ids: &[ModelId]) -> Result<Graph, GraphError> {
        let build_span = span!(
            Level::INFO,
            "build_graph",
            model_count = ids.len(),
            convention = %self.resolver.config().convention
        );
        let _enter = build_span.enter();

        let set = BuildSet::new(schema, ids)?;
        let mut graph = Graph::new();

        for (index, model) in set.models.iter().enumerate() {
            let node = self.node(&set, NodeId(index), model)?;
            trace!(
                model = model.name(),
                name = %node.name,
                properties = node.properties.len(),
                foreign_keys = node.foreign_keys.len(),
                "Emitted node"
            );
            graph.add_node(node);
        }

        for (index, model) in set.models.iter().enumerate() {
            for relationship in classifier::graph_relationships(model) {
                let Some(kind) = relationship.kind.edge_kind() else {
                    continue;
                };
                let (to, _) = set.node_of(model, &relationship.name, &relationship.target)?;
                graph.add_edge(Edge {
                    from: NodeId(index),
                    to,
                    kind,
                    relationship: Some(relationship.name.clone()),
                });
            }
        }

        for (index, model) in set.models.iter().enumerate() {
            match model.ancestor() {
                Some(Ancestor::Class(parent)) => {
                    let (from, _) = set.node_of(model, "superclass", parent)?;
                    graph.add_edge(Edge {
                        from,
                        to: NodeId(index),
                        kind: EdgeKind::Inheritance,
                        relationship: None,
                    });
                }
                Some(Ancestor::Mixin(module)) => {
                    debug!(
                        model = model.name(),
                        module = %module,
                        "Immediate ancestor is a mixin, no edge"
                    );
                }
                None => {}
            }
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph built"
        );

        Ok(graph)
    }

    fn node(&self, set: &BuildSet<'_>, id: NodeId, model: &ModelDescriptor) -> Result<Node, GraphError> {
        let classification = Classification::of(model);

        let properties = classification
            .own_properties
            .iter()
            .map(|property| {
                Column::new(
                    self.resolver.property_name(property),
                    self.resolver.property_type_name(property),
                )
            })
            .collect();

        let foreign_keys = classification
            .foreign_keys
            .iter()
            .map(|fk| {
                let (_, target) = set.node_of(model, &fk.relationship.name, fk.target)?;
                Ok(Column::new(
                    self.resolver.foreign_key_name(fk.key),
                    self.resolver.model_name(target),
                ))
            })
            .collect::<Result<Vec<_>, GraphError>>()?;

        Ok(Node {
            id,
            model: model.id(),
            name: self.resolver.model_name(model),
            properties,
            foreign_keys,
        })
    }
}
