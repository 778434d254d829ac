//! Name resolution under a naming convention
//!
//! [`NameResolver`] turns descriptors into display strings. It is pure:
//! the same descriptor and [`NamingConfig`] always give the same name.

pub mod inflector;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::NamingConvention;
use crate::schema::{ModelDescriptor, PropertyDescriptor};

/// Naming settings, fixed for the duration of one graph build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub convention: NamingConvention,
    /// Repository name to display name, e.g. `default` to `blogdb`
    pub repository_names: BTreeMap<String, String>,
    /// Show qualified names (`Blog::User`) instead of short ones
    pub full_names: bool,
}

impl NamingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_convention(mut self, convention: NamingConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn with_repository_name(
        mut self,
        repository: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        self.repository_names
            .insert(repository.into(), display.into());
        self
    }

    pub fn with_full_names(mut self, full_names: bool) -> Self {
        self.full_names = full_names;
        self
    }
}

/// Computes display names for models, properties and foreign keys
#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'a> {
    config: &'a NamingConfig,
}

impl<'a> NameResolver<'a> {
    pub fn new(config: &'a NamingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NamingConfig {
        self.config
    }

    /// Short or qualified form of a `::`-separated class path
    pub fn class_name(&self, path: &str) -> String {
        let path = path.trim_start_matches("::");
        if self.config.full_names {
            path.to_string()
        } else {
            path.rsplit("::").next().unwrap_or(path).to_string()
        }
    }

    /// Display name of a model
    pub fn model_name(&self, model: &ModelDescriptor) -> String {
        match self.config.convention {
            NamingConvention::Language => self.class_name(model.name()),
            NamingConvention::Storage => {
                let storage = self.storage_name(model);
                match self.repository_name(model) {
                    Some(repository) => format!("{}.{}", repository, storage),
                    None => storage,
                }
            }
        }
    }

    /// Registered storage name, or the underscored plural of the qualified name
    pub fn storage_name(&self, model: &ModelDescriptor) -> String {
        model
            .storage_name()
            .map(str::to_string)
            .unwrap_or_else(|| inflector::default_storage_name(model.name()))
    }

    /// Display override for the model's repository, if one is configured
    pub fn repository_name(&self, model: &ModelDescriptor) -> Option<&'a str> {
        self.config
            .repository_names
            .get(model.repository())
            .map(String::as_str)
    }

    pub fn property_name(&self, property: &PropertyDescriptor) -> String {
        property.name.clone()
    }

    pub fn property_type_name(&self, property: &PropertyDescriptor) -> String {
        self.class_name(&property.type_name)
    }

    /// Foreign key as displayed: `user_id` becomes `user` unless storage-style
    pub fn foreign_key_name(&self, key: &str) -> String {
        if self.config.convention.is_storage() {
            return key.to_string();
        }

        match key.strip_suffix("_id") {
            Some(stripped) if !stripped.is_empty() => stripped.to_string(),
            _ => key.to_string(),
        }
    }
}
