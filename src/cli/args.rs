//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::models::config::{self, AliasEntry, ReachabilityPolicy};

/// orphans - find files in a web project that nothing imports
#[derive(Parser, Debug)]
#[command(name = "orphans")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find source files that no other file references")]
#[command(long_about = "orphans builds a file-level dependency graph of a web project from script imports, \
component templates and stylesheet references, then reports the files in the inventory that are never \
used. Files are only deleted when --delete is given.")]
#[command(after_help = "EXAMPLES:

Basic Usage:
    # Report unused files under src/ of the current directory
    orphans

    # Analyse another project
    orphans --root ./my-app

    # Only consider TypeScript and Vue files, skip tests
    orphans --include 'src/**/*.{ts,vue}' --exclude 'src/**/*.spec.ts'

Resolution:
    # Map an import alias to a directory (repeatable, longest key wins)
    orphans --alias @=src --alias ~lib=src/lib

Policies:
    # Files nothing references (default)
    orphans --policy edge-target

    # Files not reachable from the entry points
    orphans --policy entry-rooted --entry src/main.ts

Actions:
    # Delete the unused files
    orphans --delete

    # Fail a CI job when unused files exist
    orphans --fail-on-unused --quiet

Output Options:
    orphans --output json --output-file unused.json
    orphans --output csv

Configuration:
    # Use a specific configuration file
    orphans --config ./orphans.toml

    # Create a commented .orphans.toml in the current directory
    orphans --init
")]
pub struct Args {
    /// Project root
    #[arg(short, long, value_name = "DIR", help = "Project root; patterns, aliases and entries are relative to it (defaults to the current directory)")]
    pub root: Option<PathBuf>,

    #[arg(short, long, value_name = "GLOB", help = "Glob selecting files to analyse, relative to the root (repeatable; default 'src/**/*')")]
    pub include: Vec<String>,

    #[arg(short, long, value_name = "GLOB", help = "Glob removing files from the analysis (repeatable; default 'src/**/*.d.ts')")]
    pub exclude: Vec<String>,

    #[arg(short, long, value_name = "KEY=PATH", help = "Import alias, e.g. @=src (repeatable; default @=src)")]
    pub alias: Vec<AliasEntry>,

    #[arg(long, value_name = "FILE", help = "Entry file for the entry-rooted policy (repeatable)")]
    pub entry: Vec<PathBuf>,

    #[arg(short, long, value_enum, value_name = "POLICY", help = "How unused is decided: 'edge-target' (nothing references it) or 'entry-rooted' (not reachable from an entry)")]
    pub policy: Option<PolicyArg>,

    #[arg(long, help = "Delete the unused files instead of only reporting them")]
    pub delete: bool,

    #[arg(long, help = "Exit with a non-zero status when unused files are found")]
    pub fail_on_unused: bool,

    #[arg(short, long, value_enum, value_name = "FORMAT", help = "Output format: 'text', 'json' or 'csv'")]
    pub output: Option<OutputFormat>,

    #[arg(long, value_name = "FILE", help = "File to write the report to (stdout if not specified)")]
    pub output_file: Option<PathBuf>,

    #[arg(short, long, value_name = "FILE", help = "Path to configuration file (defaults to .orphans.toml in the current directory)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Visit files on a single thread")]
    pub no_parallel: bool,

    #[arg(long, value_name = "N", help = "Number of worker threads (defaults to the number of CPUs)")]
    pub threads: Option<usize>,

    #[arg(long, help = "Disable the progress spinner")]
    pub no_progress: bool,

    #[arg(long, help = "Disable colored output")]
    pub no_colors: bool,

    #[arg(long, help = "Follow symbolic links while collecting files")]
    pub follow_links: bool,

    #[arg(short, long, conflicts_with = "verbose", help = "Only print the counts and the unused files")]
    pub quiet: bool,

    #[arg(short, long, help = "Print resolution reasons, warnings, graph statistics and cycles; enable debug logging")]
    pub verbose: bool,

    #[arg(long, help = "Create a default configuration file (.orphans.toml) in the current directory")]
    pub init: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl From<OutputFormat> for config::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => config::OutputFormat::Text,
            OutputFormat::Json => config::OutputFormat::Json,
            OutputFormat::Csv => config::OutputFormat::Csv,
        }
    }
}

/// Reachability policy options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    EdgeTarget,
    EntryRooted,
}

impl From<PolicyArg> for ReachabilityPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::EdgeTarget => ReachabilityPolicy::EdgeTarget,
            PolicyArg::EntryRooted => ReachabilityPolicy::EntryRooted,
        }
    }
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults_leave_settings_alone() {
        let args = Args::parse_from(["orphans"]);
        assert!(args.root.is_none());
        assert!(args.include.is_empty());
        assert!(args.policy.is_none());
        assert!(args.output.is_none());
        assert!(!args.delete);
    }

    #[test]
    fn test_repeatable_and_typed_flags() {
        let args = Args::parse_from([
            "orphans",
            "--alias",
            "@=src",
            "--alias",
            "~=lib",
            "--policy",
            "entry-rooted",
            "--entry",
            "src/main.ts",
            "--entry",
            "src/worker.ts",
        ]);
        assert_eq!(args.alias, vec![AliasEntry::new("@", "src"), AliasEntry::new("~", "lib")]);
        assert_eq!(args.policy, Some(PolicyArg::EntryRooted));
        assert_eq!(args.entry.len(), 2);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Args::try_parse_from(["orphans", "--alias", "nokey"]).is_err());
        assert!(Args::try_parse_from(["orphans", "--policy", "reachable"]).is_err());
        assert!(Args::try_parse_from(["orphans", "--quiet", "--verbose"]).is_err());
    }
}
