//! Package manager link commands
//!
//! This module provides:
//! - Construction of `<pm> link ...` command lines for a target
//! - The `LinkRunner` seam used by the orchestrator
//! - A shell-backed runner that inherits the parent's standard streams

use crate::target::LinkTarget;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Package manager used when none is given
pub const DEFAULT_PACKAGE_MANAGER: &str = "pnpm";

/// A link invocation for one dependent package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCommand {
    /// Package manager executable
    pub program: String,
    /// Arguments after the program, unquoted
    pub args: Vec<String>,
    /// Directory of the dependent's package.json
    pub working_dir: PathBuf,
}

impl LinkCommand {
    /// Build the link command for `target`, run from `working_dir`
    pub fn new(program: &str, target: &LinkTarget, working_dir: impl Into<PathBuf>) -> Self {
        let args = match target {
            LinkTarget::Local { directory, .. } => {
                vec!["link".to_string(), directory.display().to_string()]
            }
            LinkTarget::Global { name } => {
                vec!["link".to_string(), "--global".to_string(), name.clone()]
            }
        };

        Self {
            program: program.to_string(),
            args,
            working_dir: working_dir.into(),
        }
    }

    /// Command line as handed to the shell
    pub fn shell_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for LinkCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.shell_line())
    }
}

/// Outcome of running one link command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    Linked,
    /// Not run because of `--dry-run`
    Planned,
    /// The command exited unsuccessfully; `None` when killed by a signal
    Failed { code: Option<i32> },
    /// The shell could not be started
    SpawnFailed { message: String },
}

impl LinkStatus {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            LinkStatus::Failed { .. } | LinkStatus::SpawnFailed { .. }
        )
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Linked => write!(f, "linked"),
            LinkStatus::Planned => write!(f, "planned"),
            LinkStatus::Failed { code: Some(code) } => write!(f, "exited with code {}", code),
            LinkStatus::Failed { code: None } => write!(f, "terminated by signal"),
            LinkStatus::SpawnFailed { message } => write!(f, "failed to start: {}", message),
        }
    }
}

/// Trait for running link commands
#[async_trait]
pub trait LinkRunner: Send + Sync {
    /// Run `command` to completion
    async fn run(&self, command: &LinkCommand) -> LinkStatus;
}

/// Runner that executes the command line through the platform shell
#[derive(Debug, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }

    fn shell_command(line: &str, working_dir: &Path) -> Command {
        let mut command = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(line);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(line);
            c
        };
        command.current_dir(working_dir);
        command
    }
}

#[async_trait]
impl LinkRunner for ShellRunner {
    async fn run(&self, command: &LinkCommand) -> LinkStatus {
        let line = command.shell_line();
        // stdio is inherited by default for `status()`
        match Self::shell_command(&line, &command.working_dir)
            .status()
            .await
        {
            Ok(status) if status.success() => LinkStatus::Linked,
            Ok(status) => LinkStatus::Failed {
                code: status.code(),
            },
            Err(e) => LinkStatus::SpawnFailed {
                message: e.to_string(),
            },
        }
    }
}

/// Quote `arg` for the shell when it contains anything beyond a safe set
fn shell_quote(arg: &str) -> String {
    let is_safe = |c: char| c.is_ascii_alphanumeric() || "-_./:@%+=,".contains(c);
    if !arg.is_empty() && arg.chars().all(is_safe) {
        return arg.to_string();
    }
    if cfg!(windows) {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
