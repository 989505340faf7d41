//! Inventory, graph construction, reachability and run orchestration

pub mod actions;
pub mod analyzer;
pub mod content_cache;
pub mod graph_builder;
pub mod inventory;
pub mod reachability;

pub use analyzer::Analyzer;
pub use content_cache::ContentCache;
pub use graph_builder::{GraphBuild, GraphBuilder};
pub use inventory::Inventory;
pub use reachability::{unused_files, used_files};
