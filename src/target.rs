//! Link target resolution
//!
//! A target is either a local package directory, whose name comes from its
//! own package.json, or a package registered globally with the package
//! manager.

use crate::error::TargetError;
use crate::manifest::{read_manifest, MANIFEST_FILENAME};
use std::path::{Component, Path, PathBuf};

/// Target as requested on the command line, before touching the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// A path-like argument, as typed
    Local(String),
    /// A package name passed to `--global`
    Global(String),
}

/// Resolved package to link into every dependent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    Local { directory: PathBuf, name: String },
    Global { name: String },
}

impl LinkTarget {
    /// Package name dependents must declare
    pub fn name(&self) -> &str {
        match self {
            LinkTarget::Local { name, .. } | LinkTarget::Global { name } => name,
        }
    }
}

/// Whether `arg` contains a path separator
///
/// A bare package name such as `lodash` or `.` is never treated as a path.
pub fn is_path_like(arg: &str) -> bool {
    arg.chars().any(std::path::is_separator)
}

/// Resolve `spec` against `cwd`
pub async fn resolve(spec: &TargetSpec, cwd: &Path) -> Result<LinkTarget, TargetError> {
    match spec {
        TargetSpec::Global(name) => Ok(LinkTarget::Global { name: name.clone() }),
        TargetSpec::Local(arg) => {
            let directory = normalize(&cwd.join(arg));
            // Existence follows links, the directory test does not
            if let Err(e) = tokio::fs::metadata(&directory).await {
                return Err(if e.kind() == std::io::ErrorKind::NotFound {
                    TargetError::not_found(directory)
                } else {
                    TargetError::Metadata {
                        path: directory,
                        source: e,
                    }
                });
            }
            let metadata = match tokio::fs::symlink_metadata(&directory).await {
                Ok(metadata) => metadata,
                Err(source) => {
                    return Err(TargetError::Metadata {
                        path: directory,
                        source,
                    })
                }
            };
            if !metadata.is_dir() {
                return Err(TargetError::not_a_directory(directory));
            }

            let manifest = read_manifest(&directory.join(MANIFEST_FILENAME)).await?;
            tracing::debug!(
                directory = %directory.display(),
                name = manifest.name(),
                "resolved local target"
            );
            Ok(LinkTarget::Local {
                name: manifest.name().to_string(),
                directory,
            })
        }
    }
}

/// Fold `.` and `..` components without consulting the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() && !normalized.has_root() {
                    normalized.push(component);
                }
            }
            _ => normalized.push(component),
        }
    }
    normalized
}
