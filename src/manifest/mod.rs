//! package.json reading and dependency matching
//!
//! This module provides:
//! - Strict decoding of a manifest into a `ManifestRecord`
//! - The dependency predicate used to select dependents
//! - Async loading of manifest files with diagnostics on failure

mod validate;

pub use validate::decode;

use crate::error::{ManifestError, ValidationError};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// File name of a package manifest
pub const MANIFEST_FILENAME: &str = "package.json";

/// Validated subset of a package.json
///
/// Only `decode` builds one, so every record carries a string name and
/// string-valued dependency maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    name: String,
    dependencies: Option<BTreeMap<String, String>>,
    dev_dependencies: Option<BTreeMap<String, String>>,
}

impl ManifestRecord {
    /// Decode manifest text without touching the filesystem
    pub fn parse(content: &str) -> Result<Self, ParseFailure> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        Ok(decode(value)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> Option<&BTreeMap<String, String>> {
        self.dependencies.as_ref()
    }

    pub fn dev_dependencies(&self) -> Option<&BTreeMap<String, String>> {
        self.dev_dependencies.as_ref()
    }

    /// Whether `dependency` is declared in `dependencies` or `devDependencies`
    ///
    /// Only key presence counts; the version string is not inspected.
    pub fn declares_dependency(&self, dependency: &str) -> bool {
        [&self.dependencies, &self.dev_dependencies]
            .into_iter()
            .flatten()
            .any(|deps| deps.contains_key(dependency))
    }
}

/// Failure to turn manifest text into a record
#[derive(Error, Debug)]
pub enum ParseFailure {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Read and validate the manifest at `path`
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected. The
/// underlying cause is logged before the wrapping error is returned.
pub async fn read_manifest(path: &Path) -> Result<ManifestRecord, ManifestError> {
    let result = match tokio::fs::read(path).await {
        Ok(bytes) => {
            let content = String::from_utf8_lossy(&bytes);
            ManifestRecord::parse(&content).map_err(|failure| match failure {
                ParseFailure::Json(source) => ManifestError::Parse {
                    path: path.to_path_buf(),
                    source,
                },
                ParseFailure::Invalid(source) => ManifestError::Invalid {
                    path: path.to_path_buf(),
                    source,
                },
            })
        }
        Err(source) => Err(ManifestError::Read {
            path: path.to_path_buf(),
            source,
        }),
    };

    if let Err(ref err) = result {
        let cause = std::error::Error::source(err)
            .map(|s| s.to_string())
            .unwrap_or_default();
        tracing::error!(path = %path.display(), %cause, "invalid manifest");
    }
    result
}
