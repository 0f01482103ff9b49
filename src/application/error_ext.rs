//! Error conversion helpers for I/O at the application boundary
//!
//! File I/O gets path context; store I/O becomes `StorageUnavailable`.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.write(&target, &content)
    ///     .with_path_context("write export", &target)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;

    /// Treat any failure of the key/value store as the store being unavailable.
    fn or_storage_unavailable(self, key: &str) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }

    fn or_storage_unavailable(self, key: &str) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::StorageUnavailable {
            key: key.to_string(),
            source,
        })
    }
}
