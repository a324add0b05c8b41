//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ValidationError: a manifest that parsed but has the wrong shape
//! - ManifestError: a manifest file that could not be read, parsed or validated
//! - TargetError: the link target could not be resolved
//! - WalkError: directory enumeration failures during discovery
//! - UsageError: unsupported command line shape

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Walk(#[from] WalkError),
}

/// Reasons a parsed manifest is rejected, checked in declaration order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Top-level value is not a JSON object
    #[error("manifest content is not a plain object: {found}")]
    MalformedManifest { found: String },

    #[error("missing required name property")]
    MissingName,

    #[error("invalid type of 'name': must be string")]
    InvalidNameType,

    #[error("invalid type of 'dependencies': must be string record")]
    InvalidDependenciesType,

    #[error("invalid type of 'devDependencies': must be string record")]
    InvalidDevDependenciesType,
}

/// Errors related to manifest files
///
/// Every variant renders the same message so callers see which file failed;
/// the underlying cause is available through `source()`.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read manifest file: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read manifest file: {path}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

/// Errors related to resolving the link target
#[derive(Error, Debug)]
pub enum TargetError {
    #[error("target directory '{path}' does not exist")]
    NotFound { path: PathBuf },

    #[error("target '{path}' is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("failed to inspect target '{path}'")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Errors raised while walking the package tree
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("failed to read directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to resolve directory {path}")]
    Canonicalize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Unsupported command line shapes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("no link target given")]
    MissingTarget,

    #[error("'{arg}' is not a path; use --global to link a registered package")]
    NotPathLike { arg: String },

    #[error("--global requires a non-empty package name")]
    EmptyGlobalName,

    #[error("{message}")]
    Invalid { message: String },
}

impl ManifestError {
    /// Path of the manifest that failed
    pub fn path(&self) -> &PathBuf {
        match self {
            ManifestError::Read { path, .. }
            | ManifestError::Parse { path, .. }
            | ManifestError::Invalid { path, .. } => path,
        }
    }
}

impl TargetError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        TargetError::NotFound { path: path.into() }
    }

    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        TargetError::NotADirectory { path: path.into() }
    }
}

impl WalkError {
    pub fn read_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WalkError::ReadDir {
            path: path.into(),
            source,
        }
    }

    pub fn canonicalize(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WalkError::Canonicalize {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_manifest_error_names_file() {
        let err = ManifestError::Invalid {
            path: PathBuf::from("/repo/pkg-a/package.json"),
            source: ValidationError::InvalidNameType,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("failed to read manifest file"));
        assert!(msg.contains("pkg-a/package.json"));
    }

    #[test]
    fn test_manifest_error_keeps_cause() {
        let err = ManifestError::Invalid {
            path: PathBuf::from("package.json"),
            source: ValidationError::MissingName,
        };
        let cause = err.source().unwrap().to_string();
        assert!(cause.contains("missing required name"));
    }

    #[test]
    fn test_manifest_error_path() {
        let err = ManifestError::Read {
            path: PathBuf::from("/a/package.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.path(), &PathBuf::from("/a/package.json"));
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MalformedManifest {
            found: "[]".to_string(),
        };
        assert!(err.to_string().contains("not a plain object"));
        assert!(ValidationError::InvalidDependenciesType
            .to_string()
            .contains("'dependencies'"));
        assert!(ValidationError::InvalidDevDependenciesType
            .to_string()
            .contains("'devDependencies'"));
    }

    #[test]
    fn test_target_error_not_found() {
        let err = TargetError::not_found("/missing");
        let msg = format!("{}", err);
        assert!(msg.contains("does not exist"));
        assert!(msg.contains("/missing"));
    }

    #[test]
    fn test_target_error_not_a_directory() {
        let err = TargetError::not_a_directory("/file.txt");
        assert!(format!("{}", err).contains("is not a directory"));
    }

    #[test]
    fn test_walk_error_read_dir() {
        let err = WalkError::read_dir(
            "/locked",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = format!("{}", err);
        assert!(msg.contains("failed to read directory"));
        assert!(msg.contains("/locked"));
    }

    #[test]
    fn test_app_error_from_target_error() {
        let app_err: AppError = TargetError::not_found("/x").into();
        assert!(format!("{}", app_err).contains("does not exist"));
    }

    #[test]
    fn test_app_error_from_walk_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let app_err: AppError = WalkError::read_dir("/repo/private", io).into();
        assert!(format!("{}", app_err).contains("/repo/private"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = TargetError::not_found("/test");
        let debug = format!("{:?}", err);
        assert!(debug.contains("NotFound"));
    }
}
