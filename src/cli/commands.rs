//! Command implementations

use std::path::{Path, PathBuf};
use tracing::debug;

use super::Args;
use crate::config::{self, CliArgs, DEFAULT_CONFIG_FILE};
use crate::core::{actions, Analyzer};
use crate::error::{ErrorSeverity, Result};
use crate::models::analysis::AnalysisReport;
use crate::models::config::Settings;
use crate::output::{create_formatter, create_writer};

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Analyse the project and act on the result
    Analyze(Args),
    /// Write a default configuration file
    Init,
}

impl Command {
    pub fn from_args(args: Args) -> Self {
        if args.init {
            return Command::Init;
        }
        Command::Analyze(args)
    }

    /// Execute the command
    pub fn execute(&self) -> Result<()> {
        match self {
            Command::Analyze(args) => {
                let settings = config::load_config(CliArgs::from(args))?;
                debug!(?settings, "settings loaded");

                let report = analyze(&settings)?;
                actions::enforce_fail_on_unused(&report, settings.fail_on_unused)
            }
            Command::Init => init(&PathBuf::from(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Run the command and map the outcome to an exit code
    pub fn run(&self) -> i32 {
        match self.execute() {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("{}: {}", err.severity(), err.user_message());
                if let Some(suggestion) = err.suggestion() {
                    eprintln!("Suggestion: {}", suggestion);
                }
                exit_code(err.severity())
            }
        }
    }
}

/// Exit status for an error of the given severity
pub fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Warning => 0,
        ErrorSeverity::Error => 1,
        ErrorSeverity::Critical => 2,
    }
}

/// Analyse, delete unless dry-running, and write the report
pub fn analyze(settings: &Settings) -> Result<AnalysisReport> {
    let mut report = Analyzer::new(settings.clone()).run()?;
    actions::apply_deletions(&mut report);

    let formatter = create_formatter(
        settings.output_format,
        settings.use_colors && settings.output_file.is_none(),
        settings.verbose,
        settings.quiet,
    );
    let rendered = formatter.format(&report)?;
    create_writer(settings.output_file.as_ref()).write(&rendered)?;

    Ok(report)
}

/// Write the commented default configuration unless a file is already there
pub fn init(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Configuration file already exists at: {}", path.display());
        println!("To overwrite it, delete the file first and run this command again.");
        return Ok(());
    }

    config::create_default_config(path)?;

    println!("Created default configuration file at: {}", path.display());
    println!("\nEvery option is commented out; uncomment the ones you want to change:");
    println!("  - include / exclude: which files are analysed");
    println!("  - alias: import alias table");
    println!("  - entries / policy: how unused is decided");
    println!("  - dry_run / fail_on_unused: what happens to unused files");
    Ok(())
}
