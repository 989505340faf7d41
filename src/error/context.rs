//! Error context utilities for orphans
//!
//! Helpers for attaching a path to foreign errors and for deciding, based on
//! severity, whether an error aborts the run or is only logged.

use std::path::Path;
use tracing::{error, warn};

use crate::error::{ErrorSeverity, OrphanError, Result};

/// Extension trait for Result to attach the path an operation was working on
pub trait ResultExt<T, E> {
    /// Permission errors become `PermissionDenied`, anything else a traversal
    /// error carrying the message
    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T> {
        self.map_err(|err| {
            let path = path.as_ref().to_path_buf();
            let io_kind = (&err as &(dyn std::error::Error + 'static))
                .downcast_ref::<std::io::Error>()
                .map(|io_err| io_err.kind());

            match io_kind {
                Some(std::io::ErrorKind::PermissionDenied) => OrphanError::PermissionDenied { path },
                _ => OrphanError::DirectoryTraversal {
                    path,
                    message: err.to_string(),
                },
            }
        })
    }
}

/// Handle an error based on its severity
///
/// Warnings and regular errors are logged and swallowed. Critical errors are
/// logged and handed back to the caller.
pub fn handle_error(err: OrphanError) -> Option<OrphanError> {
    let message = err.user_message();

    match err.severity() {
        ErrorSeverity::Warning => {
            warn!("{}", message);
            None
        }
        ErrorSeverity::Error => {
            error!("{}", message);
            None
        }
        ErrorSeverity::Critical => {
            error!("critical: {}", message);
            Some(err)
        }
    }
}

/// Extension trait for Option to convert to Result with a custom error
pub trait OptionExt<T> {
    /// Convert Option to Result with a custom error message
    fn ok_or_error<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> OrphanError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_error<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> OrphanError,
    {
        self.ok_or_else(err_fn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_with_file_context() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));

        match result.with_file_context("src/a.ts") {
            Err(OrphanError::DirectoryTraversal { path, .. }) => {
                assert_eq!(path.to_string_lossy(), "src/a.ts");
            }
            other => panic!("Expected DirectoryTraversal error, got {:?}", other),
        }
    }

    #[test]
    fn test_with_file_context_permission_denied() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));

        assert!(matches!(
            result.with_file_context("src/locked.ts"),
            Err(OrphanError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn test_option_ext() {
        let none: Option<i32> = None;
        match none.ok_or_error(|| OrphanError::config_error("Missing value")) {
            Err(OrphanError::Config { message }) => assert_eq!(message, "Missing value"),
            other => panic!("Expected Config error, got {:?}", other),
        }

        let some = Some(42);
        let result = some.ok_or_error(|| OrphanError::config_error("Missing value"));
        assert_eq!(result.unwrap(), 42);
    }
}
