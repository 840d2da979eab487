//! Error conversion helpers for console I/O
//!
//! Provides an extension trait for cleaner error handling with action context.

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add the failed action to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// self.console.read_line()
    ///     .with_action_context("read answer")?;
    /// ```
    fn with_action_context(self, action: &str) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_action_context(self, action: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: action.to_string(),
            source: Box::new(e),
        })
    }
}
