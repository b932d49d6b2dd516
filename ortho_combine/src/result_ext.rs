//! Extensions for mapping errors to `CombineResult` concisely.
//!
//! Custom merge implementations usually produce their own error types. These
//! helpers reduce repetitive `.map_err(|e| CombineError::user(e))` patterns
//! when converting them into the crate's `CombineResult<T>` alias
//! (`Result<T, Arc<CombineError>>`).
//!
//! # Examples
//!
//! ```
//! use ortho_combine::{CombineResult, CombineResultExt};
//!
//! fn parse_port(raw: &str) -> CombineResult<u16> {
//!     raw.parse::<u16>().into_user_merge()
//! }
//!
//! assert!(parse_port("8080").is_ok());
//! assert!(parse_port("eighty").is_err());
//! ```

use std::sync::Arc;

use crate::{CombineError, CombineResult, UsageError};

/// Extension mapping any `Result<T, E>` with a standard error into a
/// `CombineResult<T>` carrying [`CombineError::UserMerge`].
pub trait CombineResultExt<T> {
    /// Convert `Result<T, E>` into `CombineResult<T>`.
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped in [`CombineError::UserMerge`].
    fn into_user_merge(self) -> CombineResult<T>;
}

impl<T, E> CombineResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_user_merge(self) -> CombineResult<T> {
        self.map_err(CombineError::user)
    }
}

/// Extension for turning a [`UsageError`] result into a `CombineResult`.
pub trait UsageResultExt<T> {
    /// Convert `Result<T, UsageError>` into `CombineResult<T>`.
    ///
    /// # Errors
    ///
    /// Returns the usage error wrapped in [`CombineError::InvalidUsage`].
    fn into_combine(self) -> CombineResult<T>;
}

impl<T> UsageResultExt<T> for Result<T, UsageError> {
    fn into_combine(self) -> CombineResult<T> {
        self.map_err(|kind| Arc::new(CombineError::from(kind)))
    }
}
