//! Output formatting and writing functionality

mod formatters;
pub mod progress;
mod writers;

pub use self::progress::ProgressReporter;
pub use self::writers::{create_writer, FileWriter, OutputWriter, StdoutWriter};

use crate::error::Result;
use crate::models::analysis::AnalysisReport;
use crate::models::config::OutputFormat;

/// Trait for different output formatters
pub trait Formatter {
    /// Render a report
    fn format(&self, report: &AnalysisReport) -> Result<String>;
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    pub use_colors: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(use_colors: bool, verbose: bool, quiet: bool) -> Self {
        Self {
            use_colors,
            verbose,
            quiet,
        }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &AnalysisReport) -> Result<String> {
        if self.quiet {
            return Ok(formatters::format_report_quiet(report));
        }
        Ok(formatters::format_report_text(report, self.use_colors, self.verbose))
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, report: &AnalysisReport) -> Result<String> {
        formatters::format_report_json(report)
    }
}

/// CSV formatter with one `kind,path,detail` row per finding
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, report: &AnalysisReport) -> Result<String> {
        formatters::format_report_csv(report)
    }
}

/// Create a formatter based on the output format
pub fn create_formatter(format: OutputFormat, use_colors: bool, verbose: bool, quiet: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_colors, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}
