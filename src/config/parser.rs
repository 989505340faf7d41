//! Configuration file parsing

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::file::DEFAULT_CONFIG_FILE;
use crate::error::{OrphanError, Result, ResultExt};
use crate::models::config::PartialSettings;

/// Parse a TOML configuration file into PartialSettings
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(OrphanError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| OrphanError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content; `path` is only used in messages
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let settings: PartialSettings = toml::from_str(content).map_err(|source| OrphanError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_partial_settings(&settings, path)?;
    Ok(settings)
}

/// Reject values that can never be right, whatever else gets merged later
pub fn validate_partial_settings<P: AsRef<Path>>(settings: &PartialSettings, path: P) -> Result<()> {
    let path = path.as_ref();
    let invalid = |what: String| OrphanError::config_error(format!("{} in config file: {}", what, path.display()));

    if settings.root.as_ref().is_some_and(|root| root.as_os_str().is_empty()) {
        return Err(invalid("Empty root".to_string()));
    }

    for (kind, patterns) in [("include", &settings.include), ("exclude", &settings.exclude)] {
        for pattern in patterns.iter().flatten() {
            if pattern.trim().is_empty() {
                return Err(invalid(format!("Empty {} pattern", kind)));
            }
            glob::Pattern::new(pattern).map_err(|e| invalid(format!("Invalid {} pattern '{}': {}", kind, pattern, e)))?;
        }
    }

    if settings.alias.iter().flatten().any(|entry| entry.find.is_empty()) {
        return Err(invalid("Empty alias key".to_string()));
    }

    if settings.threads == Some(0) {
        return Err(invalid("threads = 0".to_string()));
    }

    if settings
        .output_file
        .as_ref()
        .is_some_and(|file| file.as_os_str().is_empty())
    {
        return Err(invalid("Empty output_file".to_string()));
    }

    Ok(())
}

/// Load the first configuration file found in the default locations
pub fn find_default_config() -> Result<Option<PartialSettings>> {
    let cwd = std::env::current_dir().ok();
    find_config_in(cwd.as_deref(), dirs::home_dir().as_deref(), dirs::config_dir().as_deref())
}

/// Search `<cwd>/.orphans.toml`, `<home>/.orphans.toml` and
/// `<config_dir>/orphans/config.toml`, in that order
pub fn find_config_in(
    cwd: Option<&Path>,
    home: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<Option<PartialSettings>> {
    let candidates: Vec<PathBuf> = [
        cwd.map(|dir| dir.join(DEFAULT_CONFIG_FILE)),
        home.map(|dir| dir.join(DEFAULT_CONFIG_FILE)),
        config_dir.map(|dir| dir.join("orphans").join("config.toml")),
    ]
    .into_iter()
    .flatten()
    .collect();

    for candidate in candidates {
        if candidate.is_file() {
            debug!(path = %candidate.display(), "using config file");
            return parse_config_file(&candidate).map(Some);
        }
    }

    Ok(None)
}

/// Write the commented default configuration to `path`
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_file_context(parent)?;
        }
    }

    fs::write(path, include_str!("default_config.toml")).map_err(|source| OrphanError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}
