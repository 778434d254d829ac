//! Dependency manifest groups
//!
//! A `Modelfile.json` maps group names to directories of model files:
//!
//! ```json
//! { "groups": { "default": ["vendor/models"], "runtime": ["ext"] } }
//! ```
//!
//! Activating groups yields extra include directories. Activation is best
//! effort: the loader logs a failure and carries on without it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default manifest file name, looked up in the working directory
pub const MANIFEST_FILE: &str = "Modelfile.json";

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("{} is missing or not a valid file", .path.display())]
    MissingManifest { path: PathBuf },

    #[error("{} is malformed: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error reading manifest: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<PathBuf>>,
}

/// Result of activating manifest groups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleActivation {
    /// Groups found in the manifest
    pub groups: Vec<String>,
    /// Requested groups the manifest does not define
    pub missing_groups: Vec<String>,
    /// Directories to add to the include list, absolute
    pub include_dirs: Vec<PathBuf>,
}

impl Manifest {
    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Self, BundleError> {
        if !path.is_file() {
            return Err(BundleError::MissingManifest {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|source| BundleError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Collect include directories for the requested groups
    ///
    /// Relative directories are resolved against `base`, the manifest's
    /// directory.
    pub fn activate(&self, groups: &[String], base: &Path) -> BundleActivation {
        let mut activation = BundleActivation::default();

        for group in groups {
            match self.groups.get(group) {
                Some(dirs) => {
                    activation.groups.push(group.clone());
                    for dir in dirs {
                        let dir = if dir.is_absolute() {
                            dir.clone()
                        } else {
                            base.join(dir)
                        };
                        if !activation.include_dirs.contains(&dir) {
                            activation.include_dirs.push(dir);
                        }
                    }
                }
                None => activation.missing_groups.push(group.clone()),
            }
        }

        activation
    }
}

/// Load the manifest at `path` and activate `groups`
pub fn activate_bundle(path: &Path, groups: &[String]) -> Result<BundleActivation, BundleError> {
    let manifest = Manifest::load(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(manifest.activate(groups, base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_groups() {
        let manifest: Manifest = serde_json::from_str(
            r#"{"groups": {"default": ["vendor/models"], "runtime": ["ext", "/opt/models"]}}"#,
        )
        .unwrap();

        let activation = manifest.activate(
            &["runtime".to_string(), "test".to_string()],
            Path::new("/project"),
        );
        assert_eq!(activation.groups, vec!["runtime"]);
        assert_eq!(activation.missing_groups, vec!["test"]);
        assert_eq!(
            activation.include_dirs,
            vec![PathBuf::from("/project/ext"), PathBuf::from("/opt/models")]
        );
    }

    #[test]
    fn test_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let err = activate_bundle(&dir.path().join(MANIFEST_FILE), &["default".to_string()])
            .unwrap_err();
        assert!(matches!(err, BundleError::MissingManifest { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_malformed_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(&path, "{ groups: ").unwrap();

        let err = activate_bundle(&path, &["default".to_string()]).unwrap_err();
        assert!(matches!(err, BundleError::Malformed { .. }));
    }

    #[test]
    fn test_activate_bundle_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(&path, r#"{"groups": {"default": ["vendor"]}}"#).unwrap();

        let activation = activate_bundle(&path, &["default".to_string()]).unwrap();
        assert_eq!(activation.include_dirs, vec![dir.path().join("vendor")]);
    }
}
