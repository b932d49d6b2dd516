//! Constructors and inspection helpers for `CombineError`.

use std::sync::Arc;

use super::{CombineError, UsageError};

impl CombineError {
    /// Construct a shared [`CombineError::InvalidUsage`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ortho_combine::{CombineError, UsageError};
    /// let err = CombineError::usage(UsageError::RootRemoved);
    /// assert_eq!(err.usage_kind(), Some(UsageError::RootRemoved));
    /// ```
    #[must_use]
    pub fn usage(kind: UsageError) -> Arc<Self> {
        Arc::new(Self::InvalidUsage(kind))
    }

    /// Construct a shared [`CombineError::UserMerge`] wrapping `source`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ortho_combine::CombineError;
    /// let err = CombineError::user(std::fmt::Error);
    /// assert!(matches!(&*err, CombineError::UserMerge { .. }));
    /// ```
    #[must_use]
    pub fn user<E>(source: E) -> Arc<Self>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Arc::new(Self::UserMerge {
            source: Box::new(source),
        })
    }

    /// Returns the usage reason when this is an [`CombineError::InvalidUsage`].
    #[must_use]
    pub const fn usage_kind(&self) -> Option<UsageError> {
        match self {
            Self::InvalidUsage(kind) => Some(*kind),
            Self::UserMerge { .. } => None,
        }
    }

    /// Attempts to view the custom merge error as `E`.
    #[must_use]
    pub fn user_source<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::UserMerge { source } => source.downcast_ref::<E>(),
            Self::InvalidUsage(_) => None,
        }
    }
}
