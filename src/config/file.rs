//! Configuration file and environment sources

use std::path::{Path, PathBuf};
use tracing::warn;

use super::{parser, ConfigSource};
use crate::error::{OrphanError, Result};
use crate::models::config::PartialSettings;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".orphans.toml";

/// Default prefix for environment overrides
pub const ENV_PREFIX: &str = "ORPHANS";

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
}

impl FileConfig {
    /// A source reading `.orphans.toml` from the current directory
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
            priority: 20,
        }
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 20,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the commented default configuration to this location
    pub fn create_default(&self) -> Result<()> {
        parser::create_default_config(&self.path)
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        if !self.is_available() {
            return Err(OrphanError::ConfigNotFound {
                path: self.path.clone(),
            });
        }
        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment variable configuration source
///
/// Reads `<PREFIX>_ROOT`, `<PREFIX>_INCLUDE`, `<PREFIX>_EXCLUDE`,
/// `<PREFIX>_POLICY`, `<PREFIX>_ENTRIES` and `<PREFIX>_OUTPUT_FORMAT`. List
/// values are comma separated.
pub struct EnvConfig {
    prefix: String,
    name: String,
    priority: u8,
}

const ENV_KEYS: [&str; 6] = ["ROOT", "INCLUDE", "EXCLUDE", "POLICY", "ENTRIES", "OUTPUT_FORMAT"];

impl EnvConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
            priority: 10,
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key))
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    fn list(&self, key: &str) -> Option<Vec<String>> {
        self.var(key).map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings::default();

        settings.root = self.var("ROOT").map(PathBuf::from);
        settings.include = self.list("INCLUDE");
        settings.exclude = self.list("EXCLUDE");
        settings.entries = self
            .list("ENTRIES")
            .map(|entries| entries.into_iter().map(PathBuf::from).collect());

        if let Some(policy) = self.var("POLICY") {
            match policy.parse() {
                Ok(policy) => settings.policy = Some(policy),
                Err(message) => warn!(source = %self.name, "{}", message),
            }
        }

        if let Some(format) = self.var("OUTPUT_FORMAT") {
            match format.parse() {
                Ok(format) => settings.output_format = Some(format),
                Err(message) => warn!(source = %self.name, "{}", message),
            }
        }

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        ENV_KEYS.iter().any(|key| self.var(key).is_some())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
