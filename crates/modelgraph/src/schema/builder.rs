//! Fluent construction of a [`Schema`]
//!
//! Models are registered by qualified name; relationship targets and
//! superclasses are plain names until [`SchemaBuilder::build`] resolves
//! them. Resolution follows constant lookup: the name is tried inside the
//! declaring model's namespaces, innermost first, then at the top level.

use std::collections::HashMap;

use tracing::trace;

use super::{
    Ancestor, ModelDescriptor, ModelId, ModelRef, PropertyDescriptor, RelationshipDescriptor,
    Schema,
};
use crate::core::RelationshipKind;

#[derive(Debug, Clone)]
struct PendingRelationship {
    name: String,
    kind: RelationshipKind,
    target: String,
    key: Option<String>,
    via: Option<String>,
}

#[derive(Debug, Clone)]
struct PendingModel {
    name: String,
    properties: Vec<PropertyDescriptor>,
    relationships: Vec<PendingRelationship>,
    superclass: Option<String>,
    mixin: Option<String>,
    storage_name: Option<String>,
    repository: Option<String>,
}

impl PendingModel {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            properties: Vec::new(),
            relationships: Vec::new(),
            superclass: None,
            mixin: None,
            storage_name: None,
            repository: None,
        }
    }
}

/// Collects model declarations before resolving them into a [`Schema`]
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    models: Vec<PendingModel>,
    index: HashMap<String, usize>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model, or reopen it if the name is already registered
    pub fn model(&mut self, name: &str) -> ModelBuilder<'_> {
        let name = name.trim_start_matches("::");
        let position = match self.index.get(name).copied() {
            Some(position) => position,
            None => {
                self.models.push(PendingModel::new(name));
                self.index.insert(name.to_string(), self.models.len() - 1);
                self.models.len() - 1
            }
        };

        ModelBuilder {
            model: &mut self.models[position],
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name.trim_start_matches("::"))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Resolve every name and freeze the schema
    pub fn build(self) -> Schema {
        let ids: HashMap<String, ModelId> = self
            .index
            .iter()
            .map(|(name, position)| (name.clone(), ModelId(*position)))
            .collect();

        let models = self
            .models
            .into_iter()
            .enumerate()
            .map(|(position, pending)| {
                let relationships = pending
                    .relationships
                    .into_iter()
                    .map(|relationship| RelationshipDescriptor {
                        target: resolve(&ids, &pending.name, &relationship.target),
                        name: relationship.name,
                        kind: relationship.kind,
                        key: relationship.key,
                        via: relationship.via,
                    })
                    .collect();

                // Included modules sit between a class and its superclass
                let ancestor = match (pending.mixin, pending.superclass) {
                    (Some(mixin), _) => Some(Ancestor::Mixin(mixin)),
                    (None, Some(superclass)) => {
                        Some(Ancestor::Class(resolve(&ids, &pending.name, &superclass)))
                    }
                    (None, None) => None,
                };

                trace!(model = %pending.name, "Registered model descriptor");

                ModelDescriptor {
                    id: ModelId(position),
                    name: pending.name,
                    properties: pending.properties,
                    relationships,
                    ancestor,
                    storage_name: pending.storage_name,
                    repository: pending.repository.unwrap_or_else(|| "default".to_string()),
                }
            })
            .collect();

        Schema { models, index: ids }
    }
}

fn resolve(ids: &HashMap<String, ModelId>, from: &str, target: &str) -> ModelRef {
    if let Some(absolute) = target.strip_prefix("::") {
        return lookup(ids, absolute);
    }

    let segments: Vec<&str> = from.split("::").collect();
    for depth in (1..segments.len()).rev() {
        let candidate = format!("{}::{}", segments[..depth].join("::"), target);
        if let Some(id) = ids.get(&candidate) {
            return ModelRef::Id(*id);
        }
    }

    lookup(ids, target)
}

fn lookup(ids: &HashMap<String, ModelId>, name: &str) -> ModelRef {
    ids.get(name)
        .map(|id| ModelRef::Id(*id))
        .unwrap_or_else(|| ModelRef::Missing(name.to_string()))
}

/// Declares the members of one model
pub struct ModelBuilder<'a> {
    model: &'a mut PendingModel,
}

impl<'a> ModelBuilder<'a> {
    pub fn property(self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.model
            .properties
            .push(PropertyDescriptor::new(name, type_name));
        self
    }

    /// Many-to-one relationship keyed by `<name>_id`
    pub fn belongs_to(self, name: &str, target: &str) -> Self {
        let key = format!("{}_id", name);
        self.belongs_to_with_key(name, target, &key)
    }

    pub fn belongs_to_with_key(self, name: &str, target: &str, key: &str) -> Self {
        self.push(name, RelationshipKind::ManyToOne, target, Some(key), None)
    }

    /// One-to-one relationship keyed by `<name>_id`
    pub fn has_one(self, name: &str, target: &str) -> Self {
        let key = format!("{}_id", name);
        self.has_one_with_key(name, target, &key)
    }

    pub fn has_one_with_key(self, name: &str, target: &str, key: &str) -> Self {
        self.push(name, RelationshipKind::OneToOne, target, Some(key), None)
    }

    pub fn has_many(self, name: &str, target: &str) -> Self {
        self.push(name, RelationshipKind::OneToMany, target, None, None)
    }

    /// Relationship derived by chaining over `via`
    pub fn has_many_through(self, name: &str, target: &str, via: &str) -> Self {
        self.push(name, RelationshipKind::Through, target, None, Some(via))
    }

    pub fn superclass(self, name: &str) -> Self {
        self.model.superclass = Some(name.to_string());
        self
    }

    /// Mix a module into the model; the latest one becomes the immediate ancestor
    pub fn include(self, module: &str) -> Self {
        self.model.mixin = Some(module.to_string());
        self
    }

    pub fn storage(self, name: &str) -> Self {
        self.model.storage_name = Some(name.to_string());
        self
    }

    pub fn repository(self, name: &str) -> Self {
        self.model.repository = Some(name.to_string());
        self
    }

    fn push(
        self,
        name: &str,
        kind: RelationshipKind,
        target: &str,
        key: Option<&str>,
        via: Option<&str>,
    ) -> Self {
        self.model.relationships.push(PendingRelationship {
            name: name.to_string(),
            kind,
            target: target.to_string(),
            key: key.map(str::to_string),
            via: via.map(str::to_string),
        });
        self
    }
}
