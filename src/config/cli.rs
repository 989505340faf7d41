//! Command-line argument configuration source

use std::path::PathBuf;

use super::ConfigSource;
use crate::cli::args::Args;
use crate::error::Result;
use crate::models::config::{AliasEntry, OutputFormat, PartialSettings, ReachabilityPolicy};

/// Command-line argument configuration source
#[derive(Debug)]
pub struct CliConfig {
    args: CliArgs,
    name: String,
    priority: u8,
}

/// The subset of the command line that feeds settings
///
/// Flags that were not given stay `None`/`false` so lower layers keep their
/// values.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub alias: Vec<AliasEntry>,
    pub entries: Vec<PathBuf>,
    pub policy: Option<ReachabilityPolicy>,
    pub delete: bool,
    pub fail_on_unused: bool,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub no_parallel: bool,
    pub threads: Option<usize>,
    pub no_progress: bool,
    pub no_colors: bool,
    pub follow_links: bool,
    pub quiet: bool,
    pub verbose: bool,
    pub config: Option<PathBuf>,
}

impl From<&Args> for CliArgs {
    fn from(args: &Args) -> Self {
        Self {
            root: args.root.clone(),
            include: args.include.clone(),
            exclude: args.exclude.clone(),
            alias: args.alias.clone(),
            entries: args.entry.clone(),
            policy: args.policy.map(Into::into),
            delete: args.delete,
            fail_on_unused: args.fail_on_unused,
            output_format: args.output.map(Into::into),
            output_file: args.output_file.clone(),
            no_parallel: args.no_parallel,
            threads: args.threads,
            no_progress: args.no_progress,
            no_colors: args.no_colors,
            follow_links: args.follow_links,
            quiet: args.quiet,
            verbose: args.verbose,
            config: args.config.clone(),
        }
    }
}

impl CliConfig {
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            name: "command-line arguments".to_string(),
            priority: 30,
        }
    }

    pub fn from_args(args: &Args) -> Self {
        Self::new(CliArgs::from(args))
    }

    /// The config file given with `--config`, if any
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.args.config.as_ref()
    }
}

fn non_empty<T: Clone>(values: &[T]) -> Option<Vec<T>> {
    (!values.is_empty()).then(|| values.to_vec())
}

impl ConfigSource for CliConfig {
    fn load(&self) -> Result<PartialSettings> {
        let args = &self.args;

        Ok(PartialSettings {
            root: args.root.clone(),
            include: non_empty(&args.include),
            exclude: non_empty(&args.exclude),
            alias: non_empty(&args.alias),
            entries: non_empty(&args.entries),
            policy: args.policy,
            dry_run: args.delete.then_some(false),
            fail_on_unused: args.fail_on_unused.then_some(true),
            output_format: args.output_format,
            output_file: args.output_file.clone(),
            quiet: args.quiet.then_some(true),
            verbose: args.verbose.then_some(true),
            use_colors: args.no_colors.then_some(false),
            show_progress: args.no_progress.then_some(false),
            parallel: args.no_parallel.then_some(false),
            threads: args.threads,
            follow_links: args.follow_links.then_some(true),
        })
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
