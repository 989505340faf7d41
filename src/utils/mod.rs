//! Utility modules

pub mod path_resolver;

pub use path_resolver::{AliasTable, PathResolver, Resolution};
