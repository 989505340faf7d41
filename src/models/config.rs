//! Configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration settings for orphans
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Project root; include/exclude patterns and alias replacements are relative to it
    pub root: PathBuf,

    /// Glob patterns selecting candidate files
    pub include: Vec<String>,

    /// Glob patterns removed from the candidate set
    pub exclude: Vec<String>,

    /// Ordered alias table
    pub alias: Vec<AliasEntry>,

    /// Declared entry files for the entry-rooted policy
    pub entries: Vec<PathBuf>,

    /// How "unused" is decided
    pub policy: ReachabilityPolicy,

    /// Report unused files without deleting them
    pub dry_run: bool,

    /// Turn a non-empty unused set into a failing run
    pub fail_on_unused: bool,

    /// Output format (text, json, csv)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to show detailed progress and debug information
    pub verbose: bool,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to show the progress spinner
    pub show_progress: bool,

    /// Whether to visit files on a thread pool
    pub parallel: bool,

    /// Worker thread count; `None` means one per CPU
    pub threads: Option<usize>,

    /// Whether to follow symbolic links while enumerating the inventory
    pub follow_links: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            include: vec!["src/**/*".to_string()],
            exclude: vec!["src/**/*.d.ts".to_string()],
            alias: vec![AliasEntry::new("@", "src")],
            entries: Vec::new(),
            policy: ReachabilityPolicy::default(),
            dry_run: true,
            fail_on_unused: false,
            output_format: OutputFormat::Text,
            output_file: None,
            quiet: false,
            verbose: false,
            use_colors: true,
            show_progress: true,
            parallel: true,
            threads: None,
            follow_links: false,
        }
    }
}

impl Settings {
    /// Number of worker threads the graph builder should use
    pub fn effective_threads(&self) -> usize {
        match self.threads {
            Some(n) if n > 0 => n,
            _ => num_cpus::get(),
        }
    }
}

/// One alias table row: specifiers starting with `find` are rewritten to `replacement`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub find: String,
    pub replacement: PathBuf,
}

impl AliasEntry {
    pub fn new(find: impl Into<String>, replacement: impl Into<PathBuf>) -> Self {
        Self {
            find: find.into(),
            replacement: replacement.into(),
        }
    }
}

impl std::str::FromStr for AliasEntry {
    type Err = String;

    /// Parses `KEY=PATH`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((find, replacement)) if !find.trim().is_empty() && !replacement.trim().is_empty() => {
                Ok(AliasEntry::new(find.trim(), replacement.trim()))
            }
            _ => Err(format!("Invalid alias '{}', expected KEY=PATH", s)),
        }
    }
}

/// Which notion of "unused" a run applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReachabilityPolicy {
    /// Unused means never the target of any edge
    #[default]
    EdgeTarget,
    /// Unused means not reachable from a declared entry
    EntryRooted,
}

impl std::str::FromStr for ReachabilityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "edge-target" => Ok(ReachabilityPolicy::EdgeTarget),
            "entry-rooted" => Ok(ReachabilityPolicy::EntryRooted),
            _ => Err(format!("Invalid reachability policy: {}", s)),
        }
    }
}

impl std::fmt::Display for ReachabilityPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReachabilityPolicy::EdgeTarget => write!(f, "edge-target"),
            ReachabilityPolicy::EntryRooted => write!(f, "entry-rooted"),
        }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialSettings {
    pub root: Option<PathBuf>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub alias: Option<Vec<AliasEntry>>,
    pub entries: Option<Vec<PathBuf>>,
    pub policy: Option<ReachabilityPolicy>,
    pub dry_run: Option<bool>,
    pub fail_on_unused: Option<bool>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    pub use_colors: Option<bool>,
    pub show_progress: Option<bool>,
    pub parallel: Option<bool>,
    pub threads: Option<usize>,
    pub follow_links: Option<bool>,
}

impl PartialSettings {
    /// Overlay `other`: every field it sets replaces ours
    pub fn merge_from(&mut self, other: PartialSettings) {
        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })*
            };
        }

        overlay!(
            root,
            include,
            exclude,
            alias,
            entries,
            policy,
            dry_run,
            fail_on_unused,
            output_format,
            output_file,
            quiet,
            verbose,
            use_colors,
            show_progress,
            parallel,
            threads,
            follow_links,
        );
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> Settings {
        let defaults = Settings::default();

        Settings {
            root: self.root.clone().unwrap_or(defaults.root),
            include: self.include.clone().unwrap_or(defaults.include),
            exclude: self.exclude.clone().unwrap_or(defaults.exclude),
            alias: self.alias.clone().unwrap_or(defaults.alias),
            entries: self.entries.clone().unwrap_or(defaults.entries),
            policy: self.policy.unwrap_or(defaults.policy),
            dry_run: self.dry_run.unwrap_or(defaults.dry_run),
            fail_on_unused: self.fail_on_unused.unwrap_or(defaults.fail_on_unused),
            output_format: self.output_format.unwrap_or(defaults.output_format),
            output_file: self.output_file.clone().or(defaults.output_file),
            quiet: self.quiet.unwrap_or(defaults.quiet),
            verbose: self.verbose.unwrap_or(defaults.verbose),
            use_colors: self.use_colors.unwrap_or(defaults.use_colors),
            show_progress: self.show_progress.unwrap_or(defaults.show_progress),
            parallel: self.parallel.unwrap_or(defaults.parallel),
            threads: self.threads.or(defaults.threads),
            follow_links: self.follow_links.unwrap_or(defaults.follow_links),
        }
    }
}
