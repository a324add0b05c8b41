//! Progress display while discovering dependents
//!
//! Draws a spinner on stderr using indicatif. It must be cleared before any
//! link command starts, since child processes share the terminal.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner reporting discovery progress
pub struct Progress {
    /// Whether progress display is enabled (disabled in quiet mode)
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Show a spinner with a message
    pub fn spinner(&mut self, message: &str) {
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid template"),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.bar = Some(spinner);
    }

    /// Report how many manifests were scanned and how many matched
    pub fn scanned(&self, scanned: usize, matched: usize) {
        if let Some(ref bar) = self.bar {
            bar.set_message(format!(
                "Scanning packages... {} scanned, {} dependent",
                scanned, matched
            ));
        }
    }

    /// Finish and clear the spinner
    pub fn finish_and_clear(&mut self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
        self.bar = None;
    }
}
