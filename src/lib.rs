//! orphans - find files in a web project that nothing imports
//!
//! The analysis runs in four stages: specifiers are extracted from scripts,
//! components and stylesheets, resolved against the alias table and the file
//! system, assembled into a file-level dependency graph, and finally compared
//! with the inventory under a reachability policy to produce the unused set.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logger;
pub mod models;
pub mod output;
pub mod parsers;
pub mod utils;

pub use crate::core::{Analyzer, Inventory};
pub use error::{handle_error, ErrorSeverity, OptionExt, OrphanError, Result, ResultExt};
pub use models::{
    analysis::{AnalysisReport, AnalysisSummary},
    config::{AliasEntry, ReachabilityPolicy, Settings},
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
