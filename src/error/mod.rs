//! Error handling for orphans
//!
//! Error types, the crate-wide result alias, and helpers for attaching
//! paths to failures and logging the non-critical ones.

pub mod context;
pub mod types;


pub use context::{handle_error, OptionExt, ResultExt};
pub use types::{ErrorSeverity, OrphanError, Result};
