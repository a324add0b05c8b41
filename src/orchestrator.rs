//! Link orchestrator coordinating the whole run
//!
//! Workflow: walk → read manifest → match target name → link.
//!
//! Discovery finishes before any command runs, so a malformed manifest
//! anywhere in the tree aborts the run with nothing linked. Commands then
//! run one at a time; a failing command is recorded and the rest still run.

use crate::cli::CliArgs;
use crate::error::AppError;
use crate::link::{LinkCommand, LinkRunner, LinkStatus, ShellRunner};
use crate::manifest::read_manifest;
use crate::progress::Progress;
use crate::target::LinkTarget;
use crate::walker::PackageWalker;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Settings for one run
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Directory the package walk starts from
    pub root: PathBuf,
    /// Package manager executable
    pub package_manager: String,
    /// Print commands without running them
    pub dry_run: bool,
    /// Descend into symlinked directories
    pub follow_symlinks: bool,
    /// Show the discovery spinner
    pub show_progress: bool,
}

impl LinkConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            package_manager: crate::link::DEFAULT_PACKAGE_MANAGER.to_string(),
            dry_run: false,
            follow_symlinks: false,
            show_progress: false,
        }
    }

    /// Build the run settings from CLI arguments, walking from `root`
    pub fn from_cli(args: &CliArgs, root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            package_manager: args.package_manager.clone(),
            dry_run: args.dry_run,
            follow_symlinks: args.follow_symlinks,
            show_progress: !args.quiet,
        }
    }
}

/// Dependents found by a walk
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Number of manifests read
    pub scanned: usize,
    /// One command per dependent, in walk order
    pub commands: Vec<LinkCommand>,
}

/// Result of one link command
#[derive(Debug, Clone)]
pub struct LinkOutcome {
    pub command: LinkCommand,
    pub status: LinkStatus,
}

/// Result of a complete run
#[derive(Debug, Clone, Default)]
pub struct LinkReport {
    pub scanned: usize,
    pub outcomes: Vec<LinkOutcome>,
}

impl LinkReport {
    pub fn failures(&self) -> impl Iterator<Item = &LinkOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_failure())
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Orchestrator for discovering dependents and linking the target into them
pub struct Orchestrator<R = ShellRunner> {
    config: LinkConfig,
    runner: R,
}

impl Orchestrator<ShellRunner> {
    /// Create an orchestrator that runs commands through the shell
    pub fn new(config: LinkConfig) -> Self {
        Self::with_runner(config, ShellRunner::new())
    }
}

impl<R: LinkRunner> Orchestrator<R> {
    /// Create an orchestrator with a custom runner (for testing)
    pub fn with_runner(config: LinkConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Walk the tree and build a link command for every dependent of `target`
    pub async fn discover(&self, target: &LinkTarget) -> Result<Discovery, AppError> {
        let mut progress = Progress::new(self.config.show_progress);
        progress.spinner("Scanning packages...");
        let result = self.scan(target, &progress).await;
        progress.finish_and_clear();
        result
    }

    /// Discover dependents, then link `target` into each of them in turn
    pub async fn run(&self, target: &LinkTarget) -> Result<LinkReport, AppError> {
        let discovery = self.discover(target).await?;
        if discovery.commands.is_empty() {
            tracing::info!(
                "no package depends on {} ({} scanned)",
                target.name(),
                discovery.scanned
            );
        } else {
            tracing::info!(
                "linking {} into {} of {} packages",
                target.name(),
                discovery.commands.len(),
                discovery.scanned
            );
        }

        let mut report = LinkReport {
            scanned: discovery.scanned,
            outcomes: Vec::with_capacity(discovery.commands.len()),
        };

        for command in discovery.commands {
            println!("{}", command.shell_line().bold());
            let status = if self.config.dry_run {
                LinkStatus::Planned
            } else {
                self.runner.run(&command).await
            };

            if status.is_failure() {
                tracing::warn!(
                    dir = %command.working_dir.display(),
                    %status,
                    "link command failed"
                );
            }
            report.outcomes.push(LinkOutcome { command, status });
        }

        Ok(report)
    }

    async fn scan(&self, target: &LinkTarget, progress: &Progress) -> Result<Discovery, AppError> {
        let mut walker =
            PackageWalker::new(&self.config.root).follow_symlinks(self.config.follow_symlinks);
        let mut discovery = Discovery::default();

        while let Some(path) = walker.next_manifest().await {
            let path = path?;
            let manifest = read_manifest(&path).await?;
            discovery.scanned += 1;

            if manifest.declares_dependency(target.name()) {
                let dir = package_dir(&path);
                tracing::debug!(
                    package = manifest.name(),
                    dir = %dir.display(),
                    "found dependent of {}",
                    target.name()
                );
                discovery.commands.push(LinkCommand::new(
                    &self.config.package_manager,
                    target,
                    dir,
                ));
            }
            progress.scanned(discovery.scanned, discovery.commands.len());
        }

        Ok(discovery)
    }
}

fn package_dir(manifest_path: &Path) -> PathBuf {
    manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}
