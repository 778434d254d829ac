//! Relationship classification
//!
//! Splits a model's members into foreign keys, own properties and the
//! relationships that produce edges. Only owning-side relationships
//! (`ManyToOne`, `OneToOne`) store a key on the model; `OneToMany` never
//! suppresses a property and `Through` relationships are skipped entirely.

use crate::schema::{ModelDescriptor, ModelRef, PropertyDescriptor, RelationshipDescriptor};

/// A key stored on the model that refers to another model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey<'a> {
    pub key: &'a str,
    pub target: &'a ModelRef,
    pub relationship: &'a RelationshipDescriptor,
}

/// Foreign keys of a model, in relationship declaration order
pub fn foreign_keys(model: &ModelDescriptor) -> impl Iterator<Item = ForeignKey<'_>> {
    model
        .relationships()
        .iter()
        .filter(|relationship| !relationship.kind.is_derived())
        .filter_map(|relationship| {
            relationship.local_key().map(|key| ForeignKey {
                key,
                target: &relationship.target,
                relationship,
            })
        })
}

/// Properties that are not foreign keys, in declaration order
pub fn own_properties(model: &ModelDescriptor) -> impl Iterator<Item = &PropertyDescriptor> {
    let keys: Vec<&str> = foreign_keys(model).map(|fk| fk.key).collect();
    model
        .properties()
        .iter()
        .filter(move |property| !keys.contains(&property.name.as_str()))
}

/// Relationships that become edges: every kind except `Through`
pub fn graph_relationships(model: &ModelDescriptor) -> impl Iterator<Item = &RelationshipDescriptor> {
    model
        .relationships()
        .iter()
        .filter(|relationship| relationship.kind.edge_kind().is_some())
}

/// Relationships excluded from the graph because they chain over others
pub fn derived_relationships(model: &ModelDescriptor) -> impl Iterator<Item = &RelationshipDescriptor> {
    model
        .relationships()
        .iter()
        .filter(|relationship| relationship.kind.is_derived())
}

/// All three enumerations for one model, collected
#[derive(Debug, Clone)]
pub struct Classification<'a> {
    pub foreign_keys: Vec<ForeignKey<'a>>,
    pub own_properties: Vec<&'a PropertyDescriptor>,
    pub relationships: Vec<&'a RelationshipDescriptor>,
}

impl<'a> Classification<'a> {
    pub fn of(model: &'a ModelDescriptor) -> Self {
        Self {
            foreign_keys: foreign_keys(model).collect(),
            own_properties: own_properties(model).collect(),
            relationships: graph_relationships(model).collect(),
        }
    }
}
