//! Progress reporting for the traversal
//!
//! A single spinner on stderr. Disabled reporters are no-ops, so callers
//! never need to check whether progress is shown.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner showing how many files have been visited
pub struct ProgressReporter {
    spinner: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Create a reporter; when `enabled` is false nothing is drawn
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self { spinner: Some(spinner) }
    }

    pub fn hidden() -> Self {
        Self { spinner: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.spinner.is_some()
    }

    /// Start ticking with `message`
    pub fn start(&self, message: &str) {
        if let Some(spinner) = &self.spinner {
            spinner.set_message(message.to_string());
            spinner.enable_steady_tick(Duration::from_millis(100));
        }
    }

    /// Report traversal state after a round
    pub fn update(&self, visited: usize, queued: usize) {
        if let Some(spinner) = &self.spinner {
            spinner.set_message(format!("{} files visited, {} queued", visited, queued));
        }
    }

    pub fn finish(&self, message: &str) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_with_message(message.to_string());
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::hidden()
    }
}
