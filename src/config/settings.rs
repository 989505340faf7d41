//! Validation of fully merged settings

use std::path::Path;

use crate::core::inventory::compile_patterns;
use crate::error::{OrphanError, Result};
use crate::models::config::Settings;

/// Settings validator for ensuring configuration is valid
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings and return the first problem found
    pub fn validate(settings: &Settings) -> Result<()> {
        if !settings.root.is_dir() {
            return Err(OrphanError::InvalidPath {
                path: settings.root.clone(),
            });
        }

        if settings.include.is_empty() {
            return Err(OrphanError::config_error("At least one include pattern is required"));
        }
        Self::validate_patterns("include", &settings.include)?;
        Self::validate_patterns("exclude", &settings.exclude)?;

        if let Some(entry) = settings.alias.iter().find(|entry| entry.find.is_empty()) {
            return Err(OrphanError::config_error(format!(
                "Alias key must not be empty (replacement '{}')",
                entry.replacement.display()
            )));
        }

        if settings.threads == Some(0) {
            return Err(OrphanError::config_error("threads must be at least 1"));
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    fn validate_patterns(kind: &str, patterns: &[String]) -> Result<()> {
        if patterns.iter().any(|pattern| pattern.trim().is_empty()) {
            return Err(OrphanError::config_error(format!("Empty {} pattern", kind)));
        }
        compile_patterns(patterns)?;
        Ok(())
    }

    /// Validate that an output path's directory exists and is writable
    fn validate_output_path(path: &Path) -> Result<()> {
        let parent = match path.parent() {
            // a bare file name lands in the current directory
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => return Ok(()),
        };

        if !parent.is_dir() {
            return Err(OrphanError::OutputDirectoryNotFound {
                path: parent.to_path_buf(),
            });
        }

        let metadata = std::fs::metadata(parent)?;
        if metadata.permissions().readonly() {
            return Err(OrphanError::permission_denied(parent));
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if metadata.permissions().mode() & 0o200 == 0 {
                return Err(OrphanError::permission_denied(parent));
            }
        }

        Ok(())
    }
}
