//! Primary error enums for combine flows.

use thiserror::Error;

/// Errors that can occur while combining a value with an update.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CombineError {
    /// The combiner API was used in a way it does not support.
    #[error("invalid usage: {0}")]
    InvalidUsage(#[from] UsageError),

    /// A [`crate::Mergeable`] implementation rejected the update.
    ///
    /// The source error is carried unchanged so callers can downcast it to
    /// the implementation's own error type.
    #[error("custom merge failed: {source}")]
    UserMerge {
        /// Error reported by the custom merge implementation.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Reasons for [`CombineError::InvalidUsage`].
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum UsageError {
    /// [`crate::combine_all`] was called without any update.
    #[error("`combine_all` requires at least one update")]
    MissingUpdate,

    /// The update resolved to a removal of the root value.
    #[error("the update removed the root value; `remove()` is only valid beneath a key")]
    RootRemoved,

    /// [`crate::mark`] was called outside the dynamic extent of a transform.
    #[error("`mark` may only be called while a transform is running")]
    MarkOutsideTransform,
}
