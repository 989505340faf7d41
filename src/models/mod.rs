//! Data models and structures for orphans

pub mod analysis;
pub mod config;
pub mod dependency_graph;
pub mod file_category;

pub use analysis::{AnalysisReport, AnalysisSummary, DeletionFailure, FileWarning, UnresolvedReference, WarningKind};
pub use config::{AliasEntry, OutputFormat, PartialSettings, ReachabilityPolicy, Settings};
pub use dependency_graph::{DependencyGraph, GraphStatistics};
pub use file_category::{ExtensionPriority, FileCategory, ScriptDialect, StyleDialect};
