//! Project loader
//!
//! Finds model definition files through include directories, require
//! paths and require globs, parses them and registers their models into a
//! [`Schema`]. A file that cannot be found or parsed is logged and skipped;
//! the rest of the project still loads.

mod manifest;
mod parser;

pub use manifest::*;
pub use parser::*;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, span, trace, warn, Level};

use crate::schema::{Schema, SchemaBuilder};

/// Extension tried after the bare require path
pub const MODEL_EXTENSION: &str = "model";

/// What to load, as given on the command line or in a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Directories searched for require paths and globs
    pub include: Vec<PathBuf>,
    /// Paths to require, relative to an include directory
    pub require: Vec<String>,
    /// Glob patterns expanded inside every include directory
    pub require_all: Vec<String>,
    /// Manifest groups to activate
    pub bundle: Vec<String>,
    /// Manifest location, `Modelfile.json` in the working directory by default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,
}

/// A file that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub path: String,
    pub message: String,
}

/// Outcome of loading a project
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub schema: Schema,
    /// Files loaded, in load order
    pub loaded_files: Vec<PathBuf>,
    pub failures: Vec<LoadFailure>,
    /// Manifest activation, when bundle groups were requested and it succeeded
    pub bundle: Option<BundleActivation>,
}

impl LoadReport {
    /// Returns true if every requested path loaded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

struct LoadState {
    builder: SchemaBuilder,
    seen: HashSet<PathBuf>,
    loaded_files: Vec<PathBuf>,
    failures: Vec<LoadFailure>,
}

impl LoadState {
    fn fail(&mut self, path: String, message: String) {
        warn!("modelgraph: unable to load {}: {}", path, message);
        self.failures.push(LoadFailure { path, message });
    }
}

/// Loads model files into a schema
#[derive(Debug, Clone)]
pub struct Project {
    include_dirs: Vec<PathBuf>,
    require_paths: Vec<String>,
    require_globs: Vec<String>,
    bundle: Vec<String>,
    manifest: PathBuf,
    parser: ModelFileParser,
}

impl Project {
    pub fn new(config: &ProjectConfig) -> Self {
        let mut include_dirs = Vec::new();
        for dir in &config.include {
            let dir = expand_path(dir);
            if !include_dirs.contains(&dir) {
                include_dirs.push(dir);
            }
        }

        Self {
            include_dirs,
            require_paths: dedup(&config.require),
            require_globs: dedup(&config.require_all),
            bundle: dedup(&config.bundle),
            manifest: config
                .manifest
                .clone()
                .unwrap_or_else(|| PathBuf::from(MANIFEST_FILE)),
            parser: ModelFileParser::new(),
        }
    }

    /// Include directories, expanded to absolute paths
    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    pub fn require_paths(&self) -> &[String] {
        &self.require_paths
    }

    pub fn require_globs(&self) -> &[String] {
        &self.require_globs
    }

    pub fn bundle(&self) -> &[String] {
        &self.bundle
    }

    /// Activate manifest groups, appending their directories to the include list
    ///
    /// Returns `None` when no groups were requested or activation failed.
    pub fn activate_bundle(&mut self) -> Option<BundleActivation> {
        if self.bundle.is_empty() {
            return None;
        }

        match activate_bundle(&self.manifest, &self.bundle) {
            Ok(activation) => {
                for group in &activation.missing_groups {
                    warn!("modelgraph: manifest has no group {}", group);
                }
                for dir in &activation.include_dirs {
                    let dir = expand_path(dir);
                    if !self.include_dirs.contains(&dir) {
                        self.include_dirs.push(dir);
                    }
                }
                debug!(groups = ?activation.groups, "Activated manifest groups");
                Some(activation)
            }
            Err(error) => {
                warn!("modelgraph: {}", error);
                None
            }
        }
    }

    /// Load every require path and glob match into a schema
    pub fn load(&mut self) -> LoadReport {
        let load_span = span!(
            Level::INFO,
            "load_project",
            includes = self.include_dirs.len(),
            requires = self.require_paths.len(),
            globs = self.require_globs.len()
        );
        let _enter = load_span.enter();

        let bundle = self.activate_bundle();

        let dirs: Vec<PathBuf> = self
            .include_dirs
            .iter()
            .filter(|dir| {
                let exists = dir.is_dir();
                if !exists {
                    debug!(dir = %dir.display(), "Skipping missing include directory");
                }
                exists
            })
            .cloned()
            .collect();

        let mut state = LoadState {
            builder: SchemaBuilder::new(),
            seen: HashSet::new(),
            loaded_files: Vec::new(),
            failures: Vec::new(),
        };

        for path in &self.require_paths {
            match resolve(path, &dirs, None) {
                Some(file) => self.load_file(&file, &dirs, &mut state),
                None => state.fail(path.clone(), "no such file to load".to_string()),
            }
        }

        for pattern in &self.require_globs {
            for dir in &dirs {
                self.load_glob(pattern, dir, &dirs, &mut state);
            }
        }

        let schema = state.builder.build();
        info!(
            models = schema.len(),
            files = state.loaded_files.len(),
            failures = state.failures.len(),
            "Project loaded"
        );

        LoadReport {
            schema,
            loaded_files: state.loaded_files,
            failures: state.failures,
            bundle,
        }
    }

    fn load_glob(&self, pattern: &str, dir: &Path, dirs: &[PathBuf], state: &mut LoadState) {
        let full = dir.join(pattern);
        let matches = match glob::glob(&full.to_string_lossy()) {
            Ok(paths) => paths,
            Err(error) => {
                state.fail(pattern.to_string(), format!("invalid pattern: {}", error));
                return;
            }
        };

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in matches {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(error) => {
                    let relative = relative_to(error.path(), dir);
                    state.fail(
                        format!("{} from {}", relative, dir.display()),
                        error.error().to_string(),
                    );
                }
            }
        }
        files.sort();

        trace!(pattern, dir = %dir.display(), matches = files.len(), "Expanded require glob");
        for file in files {
            self.load_file(&file, dirs, state);
        }
    }

    fn load_file(&self, file: &Path, dirs: &[PathBuf], state: &mut LoadState) {
        let key = file.canonicalize().unwrap_or_else(|_| file.to_path_buf());
        if !state.seen.insert(key) {
            trace!(file = %file.display(), "Already loaded");
            return;
        }

        let contents = match std::fs::read_to_string(file) {
            Ok(contents) => contents,
            Err(error) => {
                state.fail(file.display().to_string(), error.to_string());
                return;
            }
        };

        let parsed = match self.parser.parse(file, &contents) {
            Ok(parsed) => parsed,
            Err(error) => {
                state.fail(file.display().to_string(), error.to_string());
                return;
            }
        };

        for required in &parsed.requires {
            match resolve(required, dirs, file.parent()) {
                Some(path) => self.load_file(&path, dirs, state),
                None => state.fail(
                    required.clone(),
                    format!("no such file to load (required by {})", file.display()),
                ),
            }
        }

        parsed.register(&mut state.builder);
        debug!(file = %file.display(), models = parsed.models.len(), "Loaded model file");
        state.loaded_files.push(file.to_path_buf());
    }
}

/// Find the file a require path refers to
///
/// Tries each include directory, then the requiring file's directory, then
/// the working directory; each location is tried as given and with the
/// `.model` extension.
fn resolve(path: &str, dirs: &[PathBuf], relative_to: Option<&Path>) -> Option<PathBuf> {
    let path = Path::new(path);
    let mut bases: Vec<Option<&Path>> = Vec::new();

    if path.is_absolute() {
        bases.push(None);
    } else {
        bases.extend(dirs.iter().map(|dir| Some(dir.as_path())));
        if let Some(relative) = relative_to {
            bases.push(Some(relative));
        }
        bases.push(None);
    }

    bases.into_iter().find_map(|base| {
        let candidate = match base {
            Some(base) => base.join(path),
            None => path.to_path_buf(),
        };
        [candidate.clone(), with_model_extension(&candidate)]
            .into_iter()
            .find(|file| file.is_file())
    })
}

fn with_model_extension(path: &Path) -> PathBuf {
    let mut file = path.as_os_str().to_os_string();
    file.push(".");
    file.push(MODEL_EXTENSION);
    PathBuf::from(file)
}

fn expand_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn relative_to(path: &Path, dir: &Path) -> String {
    path.strip_prefix(dir)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn dedup(values: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !unique.contains(value) {
            unique.push(value.clone());
        }
    }
    unique
}
