//! Diagram configuration
//!
//! A [`DiagramConfig`] describes one run: what to load, how to name it,
//! how edges look and where the output goes. It deserializes from JSON
//! with every section optional.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{EdgeStyles, GraphError, NamingConvention, OutputFormat, OutputTarget};
use crate::loader::ProjectConfig;
use crate::naming::NamingConfig;

/// String-keyed edge style overrides, as written in config files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub colors: BTreeMap<String, String>,
    pub labels: BTreeMap<String, String>,
}

impl StyleConfig {
    /// Resolve overrides against the default style table
    pub fn to_styles(&self) -> Result<EdgeStyles, GraphError> {
        EdgeStyles::from_overrides(&self.colors, &self.labels)
    }

    /// Record a `KIND=COLOR` override, validating the kind
    pub fn add_color(&mut self, spec: &str) -> Result<(), GraphError> {
        let (kind, color) = crate::core::parse_override(spec)?;
        self.colors.insert(kind.to_string(), color);
        Ok(())
    }

    /// Record a `KIND=TEXT` override, validating the kind
    pub fn add_label(&mut self, spec: &str) -> Result<(), GraphError> {
        let (kind, label) = crate::core::parse_override(spec)?;
        if !kind.is_labelable() {
            return Err(GraphError::style_error(format!("{} edges are unlabeled", kind)));
        }
        self.labels.insert(kind.to_string(), label);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output path without extension
    pub file: PathBuf,
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("diagram"),
            format: OutputFormat::default(),
        }
    }
}

impl OutputConfig {
    pub fn target(&self) -> OutputTarget {
        OutputTarget::new(&self.file, self.format)
    }
}

/// Complete configuration of one diagram run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub project: ProjectConfig,
    pub naming: NamingConfig,
    pub styles: StyleConfig,
    pub output: OutputConfig,
}

impl DiagramConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a JSON configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Copy of this config with a different convention and output file
    pub fn variant(&self, convention: NamingConvention, file: impl Into<PathBuf>) -> Self {
        let mut config = self.clone();
        config.naming.convention = convention;
        config.output.file = file.into();
        config
    }
}

/// Default loader settings for common project layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Plain library: `ext` and `lib`, bundle group `runtime`
    Library,
    /// Rails application: `app/models`
    Rails,
    /// Padrino application: `models`
    Padrino,
}

impl Preset {
    pub fn variants() -> &'static [&'static str] {
        &["library", "rails", "padrino"]
    }

    /// Project defaults for this preset
    pub fn project(&self) -> ProjectConfig {
        let strings = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>();

        match self {
            Preset::Library => ProjectConfig {
                include: vec![PathBuf::from("ext"), PathBuf::from("lib")],
                bundle: strings(&["runtime"]),
                ..Default::default()
            },
            Preset::Rails => ProjectConfig {
                include: vec![PathBuf::from(".")],
                require_all: strings(&["app/models/*.model"]),
                ..Default::default()
            },
            Preset::Padrino => ProjectConfig {
                include: vec![PathBuf::from(".")],
                require_all: strings(&["models/*.model"]),
                ..Default::default()
            },
        }
    }

    /// Merge preset defaults under an existing project config
    ///
    /// Preset entries come first; entries already present are kept once.
    pub fn apply(&self, project: &mut ProjectConfig) {
        fn merge<T: Clone + PartialEq>(defaults: Vec<T>, existing: &mut Vec<T>) {
            let mut merged = defaults;
            for value in existing.drain(..) {
                if !merged.contains(&value) {
                    merged.push(value);
                }
            }
            *existing = merged;
        }

        let defaults = self.project();
        merge(defaults.include, &mut project.include);
        merge(defaults.require, &mut project.require);
        merge(defaults.require_all, &mut project.require_all);
        merge(defaults.bundle, &mut project.bundle);
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Library => write!(f, "library"),
            Preset::Rails => write!(f, "rails"),
            Preset::Padrino => write!(f, "padrino"),
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "library" | "lib" => Ok(Preset::Library),
            "rails" => Ok(Preset::Rails),
            "padrino" => Ok(Preset::Padrino),
            _ => Err(format!("Unknown preset: {}", s)),
        }
    }
}
