//! Schema descriptor access
//!
//! A [`Schema`] is an arena of [`ModelDescriptor`]s in registration order.
//! Relationship targets and ancestors are stored as [`ModelRef`] handles
//! into the arena, resolved once when the schema is built. Names that did
//! not resolve stay [`ModelRef::Missing`] so the graph builder can report
//! them.

mod builder;

pub use builder::{ModelBuilder, SchemaBuilder};

use std::collections::HashMap;

use serde::Serialize;

use crate::core::RelationshipKind;

/// Handle of a model inside its schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ModelId(usize);

impl ModelId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Reference from one descriptor to another model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelRef {
    Id(ModelId),
    /// Name that matched no registered model
    Missing(String),
}

impl ModelRef {
    pub fn id(&self) -> Option<ModelId> {
        match self {
            ModelRef::Id(id) => Some(*id),
            ModelRef::Missing(_) => None,
        }
    }
}

/// Immediate ancestor of a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ancestor {
    /// An ordinary class
    Class(ModelRef),
    /// A module-like construct mixed into the model
    Mixin(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub type_name: String,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipDescriptor {
    pub name: String,
    pub kind: RelationshipKind,
    pub target: ModelRef,
    /// Local key; set for `OneToOne` and `ManyToOne`
    pub key: Option<String>,
    /// Relationship a `Through` chains over
    pub via: Option<String>,
}

impl RelationshipDescriptor {
    /// Local key name when this relationship stores one on the declaring model
    pub fn local_key(&self) -> Option<&str> {
        if self.kind.owns_foreign_key() {
            self.key.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    id: ModelId,
    name: String,
    properties: Vec<PropertyDescriptor>,
    relationships: Vec<RelationshipDescriptor>,
    ancestor: Option<Ancestor>,
    storage_name: Option<String>,
    repository: String,
}

impl ModelDescriptor {
    pub fn id(&self) -> ModelId {
        self.id
    }

    /// Fully qualified name, e.g. `Blog::User`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last path segment of the qualified name
    pub fn short_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn relationships(&self) -> &[RelationshipDescriptor] {
        &self.relationships
    }

    pub fn relationship(&self, name: &str) -> Option<&RelationshipDescriptor> {
        self.relationships.iter().find(|r| r.name == name)
    }

    pub fn ancestor(&self) -> Option<&Ancestor> {
        self.ancestor.as_ref()
    }

    /// Storage name registered for this model, if any
    pub fn storage_name(&self) -> Option<&str> {
        self.storage_name.as_deref()
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }
}

/// Immutable, ordered set of loaded model descriptors
#[derive(Debug, Clone, Default)]
pub struct Schema {
    models: Vec<ModelDescriptor>,
    index: HashMap<String, ModelId>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// All models in registration order
    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn ids(&self) -> impl Iterator<Item = ModelId> + '_ {
        self.models.iter().map(ModelDescriptor::id)
    }

    pub fn model(&self, id: ModelId) -> Option<&ModelDescriptor> {
        self.models.get(id.0)
    }

    /// Look up a model by its qualified name
    pub fn get(&self, name: &str) -> Option<&ModelDescriptor> {
        self.index.get(name).and_then(|id| self.model(*id))
    }

    pub fn id_of(&self, name: &str) -> Option<ModelId> {
        self.index.get(name).copied()
    }

    pub fn resolve(&self, reference: &ModelRef) -> Option<&ModelDescriptor> {
        reference.id().and_then(|id| self.model(id))
    }

    /// Qualified name a reference points at, resolved or not
    pub fn reference_name<'a>(&'a self, reference: &'a ModelRef) -> &'a str {
        match reference {
            ModelRef::Id(id) => self.model(*id).map(ModelDescriptor::name).unwrap_or("<unknown>"),
            ModelRef::Missing(name) => name,
        }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name() {
        let schema = {
            let mut builder = Schema::builder();
            builder.model("Blog::User");
            builder.model("Comment");
            builder.build()
        };
        assert_eq!(schema.models()[0].short_name(), "User");
        assert_eq!(schema.models()[1].short_name(), "Comment");
    }

    #[test]
    fn test_lookup() {
        let mut builder = Schema::builder();
        builder.model("Blog::User").property("id", "Serial");
        let schema = builder.build();

        let id = schema.id_of("Blog::User").unwrap();
        assert_eq!(schema.model(id).unwrap().name(), "Blog::User");
        assert!(schema.get("User").is_none());
        assert_eq!(schema.len(), 1);
        assert!(!schema.is_empty());
        assert!(Schema::default().is_empty());
    }

    #[test]
    fn test_local_key_only_on_owning_side() {
        let mut builder = Schema::builder();
        builder
            .model("User")
            .has_many("posts", "Post")
            .has_one("profile", "Profile");
        builder.model("Post").belongs_to("user", "User");
        builder.model("Profile");
        let schema = builder.build();

        let user = schema.get("User").unwrap();
        assert_eq!(user.relationship("posts").unwrap().local_key(), None);
        assert_eq!(user.relationship("profile").unwrap().local_key(), Some("profile_id"));
        let post = schema.get("Post").unwrap();
        assert_eq!(post.relationship("user").unwrap().local_key(), Some("user_id"));
    }

    #[test]
    fn test_reference_name() {
        let mut builder = Schema::builder();
        builder.model("Post").belongs_to("author", "Writer");
        let schema = builder.build();

        let relationship = &schema.get("Post").unwrap().relationships()[0];
        assert_eq!(relationship.target, ModelRef::Missing("Writer".to_string()));
        assert_eq!(schema.reference_name(&relationship.target), "Writer");
        assert!(schema.resolve(&relationship.target).is_none());
    }
}
