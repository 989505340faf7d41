//! Error types and definitions for orphans
//!
//! Per-file problems met during traversal (unreadable files, unparsable
//! sources, unresolved references) are downgraded to diagnostics by the graph
//! builder and never surface here as run failures. The variants below cover
//! configuration, output, actuation and the fail-on-unused policy check.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - current operation fails but overall process can continue
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for orphans operations
#[derive(Debug, Error)]
pub enum OrphanError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// A source file could not be read during traversal
    #[error("Could not read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file could not be (fully) parsed
    #[error("Could not parse {path}: {message}")]
    Extraction { path: PathBuf, message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Permission denied errors
    #[error("Permission denied accessing {path}")]
    PermissionDenied { path: PathBuf },

    /// Invalid path errors
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// CSV handling errors
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    /// Glob pattern errors
    #[error("Glob pattern error: {source}")]
    GlobPattern {
        #[source]
        source: glob::PatternError,
    },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal errors while enumerating the inventory
    #[error("Directory traversal error for {path}: {message}")]
    DirectoryTraversal { path: PathBuf, message: String },

    /// Thread pool construction or worker failures
    #[error("Parallel execution error: {message}")]
    ParallelExecution { message: String },

    /// A file selected for deletion could not be removed
    #[error("Could not delete {path}: {source}")]
    Deletion {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unused files were found while fail-on-unused is enabled
    #[error("Found {count} unused files")]
    UnusedFilesFound { count: usize },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
    },

    /// CSV serialization error
    #[error("CSV serialization error: {source}")]
    CsvSerialize {
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Output directory not found
    #[error("Output directory not found: {path}")]
    OutputDirectoryNotFound { path: PathBuf },
}

impl OrphanError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Warning level errors - operation can continue
            OrphanError::PermissionDenied { .. } => ErrorSeverity::Warning,
            OrphanError::FileRead { .. } => ErrorSeverity::Warning,
            OrphanError::Extraction { .. } => ErrorSeverity::Warning,
            OrphanError::Deletion { .. } => ErrorSeverity::Warning,

            // Critical errors - process should terminate
            OrphanError::Config { .. } => ErrorSeverity::Critical,
            OrphanError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            OrphanError::ConfigRead { .. } => ErrorSeverity::Critical,
            OrphanError::ConfigParse { .. } => ErrorSeverity::Critical,
            OrphanError::GlobPattern { .. } => ErrorSeverity::Critical,
            OrphanError::InvalidPath { .. } => ErrorSeverity::Critical,
            OrphanError::StdoutWrite { .. } => ErrorSeverity::Critical,
            OrphanError::OutputDirectoryNotFound { .. } => ErrorSeverity::Critical,

            // Regular errors, including the fail-on-unused policy violation
            _ => ErrorSeverity::Error,
        }
    }

    /// Check if this is a critical error that should terminate the process
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            OrphanError::PermissionDenied { path } => {
                format!("Cannot access '{}' due to permission denied. Check file permissions.", path.display())
            }
            OrphanError::FileRead { path, source } => {
                format!("Could not read '{}': {}. The file is treated as having no references.", path.display(), source)
            }
            OrphanError::Io { source } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            OrphanError::InvalidPath { path } => {
                format!("Invalid path: '{}'. Please provide an existing project root.", path.display())
            }
            OrphanError::ConfigNotFound { path } => {
                format!("Configuration file not found at '{}'. Create one with --init or pass options on the command line.", path.display())
            }
            OrphanError::UnusedFilesFound { count } => {
                format!("Found {} unused files and fail-on-unused is enabled.", count)
            }
            OrphanError::Deletion { path, source } => {
                format!("Could not delete '{}': {}. Remaining deletions continue.", path.display(), source)
            }
            OrphanError::OutputDirectoryNotFound { path } => {
                format!("Output directory '{}' does not exist. Please create the directory or specify a different output path.", path.display())
            }
            // For other errors, use the standard Display implementation
            _ => self.to_string(),
        }
    }

    /// A hint for resolving the error, when one is obvious
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            OrphanError::InvalidPath { .. } => Some("Check that the path exists and is accessible"),
            OrphanError::ConfigNotFound { .. } => {
                Some("Create a .orphans.toml file in your project directory or specify a config file with --config")
            }
            OrphanError::GlobPattern { .. } => Some("Check the include and exclude patterns for typos"),
            OrphanError::UnusedFilesFound { .. } => {
                Some("Remove the files, reference them, or exclude them from the include patterns")
            }
            _ => None,
        }
    }

    /// Create an IO error with context
    pub fn io_error(source: std::io::Error) -> Self {
        OrphanError::Io { source }
    }

    /// Create a file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OrphanError::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create an extraction error
    pub fn extraction(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        OrphanError::Extraction {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        OrphanError::Config {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        OrphanError::PermissionDenied { path: path.into() }
    }

    /// Create a directory traversal error
    pub fn directory_traversal_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        OrphanError::DirectoryTraversal {
            path: path.into(),
            message: message.into(),
        }
    }
}

// Implement From for common error types
impl From<std::io::Error> for OrphanError {
    fn from(err: std::io::Error) -> Self {
        OrphanError::io_error(err)
    }
}

impl From<csv::Error> for OrphanError {
    fn from(err: csv::Error) -> Self {
        OrphanError::Csv { source: err }
    }
}

impl From<glob::PatternError> for OrphanError {
    fn from(err: glob::PatternError) -> Self {
        OrphanError::GlobPattern { source: err }
    }
}

impl From<serde_json::Error> for OrphanError {
    fn from(err: serde_json::Error) -> Self {
        OrphanError::JsonSerialize { source: err }
    }
}

/// Result type alias for orphans operations
pub type Result<T> = std::result::Result<T, OrphanError>;
