//! CLI argument parsing module for linkdeps

use crate::error::UsageError;
use crate::link::DEFAULT_PACKAGE_MANAGER;
use crate::target::{is_path_like, TargetSpec};
use clap::Parser;

/// Usage text printed for unsupported argument shapes
pub const USAGE: &str = "Usage:\n  linkdeps <dir>\n  linkdeps --global <pkg>";

/// Link a package into every package of the current tree that depends on it
#[derive(Parser, Debug, Clone)]
#[command(
    name = "linkdeps",
    version,
    about = "Link a package into every dependent package below the current directory",
    override_usage = "linkdeps <DIR>\n       linkdeps --global <PKG>"
)]
pub struct CliArgs {
    /// Directory of a local package to link (must contain a path separator, e.g. ./my-lib)
    #[arg(value_name = "DIR", conflicts_with = "global")]
    pub dir: Option<String>,

    /// Name of a globally registered package to link
    #[arg(long, value_name = "PKG")]
    pub global: Option<String>,

    /// Package manager used to run `link`
    #[arg(long = "pm", value_name = "CMD", default_value = DEFAULT_PACKAGE_MANAGER)]
    pub package_manager: String,

    /// Print the link commands without running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Descend into symlinked directories while searching
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Enable verbose output
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Check the argument shape and return the requested target
    pub fn target_spec(&self) -> Result<TargetSpec, UsageError> {
        match (&self.dir, &self.global) {
            (Some(dir), None) if is_path_like(dir) => Ok(TargetSpec::Local(dir.clone())),
            (Some(dir), None) => Err(UsageError::NotPathLike { arg: dir.clone() }),
            (None, Some(name)) if !name.is_empty() => Ok(TargetSpec::Global(name.clone())),
            (None, Some(_)) => Err(UsageError::EmptyGlobalName),
            (None, None) => Err(UsageError::MissingTarget),
            (Some(_), Some(_)) => Err(UsageError::Invalid {
                message: "a directory and --global cannot be combined".to_string(),
            }),
        }
    }
}
