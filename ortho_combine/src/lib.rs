//! Immutable, presence-aware merging of structured values.
//!
//! [`combine`] takes a base [`Value`] and an [`Update`] and returns a new
//! value. Containers merge key by key, scalars and lists are replaced, and
//! [`Directive`]s (`replace`, `remove`, `ignore`, `chain` and keyed updates)
//! alter that default at any depth. [`Transform`]s compute their update from
//! the value currently held at their position, including positions whose key
//! is absent. The base is never modified: only containers along updated paths
//! are reallocated and everything else is shared by reference.
//!
//! Values that need their own merge rules implement [`Mergeable`] and are
//! wrapped in [`Value::Custom`]; the combiner then delegates keyed updates to
//! them.
//!
//! ```rust
//! use ortho_combine::{Update, Value, combine, remove, transform};
//! use serde_json::json;
//!
//! let base = Value::from(json!({"name": "demo", "retries": 2, "debug": true}));
//! let update = Update::map([
//!     ("debug", remove()),
//!     (
//!         "retries",
//!         transform(|position| {
//!             let current = position.current().and_then(Value::as_i64).unwrap_or(0);
//!             Ok(Update::from(current + 1))
//!         }),
//!     ),
//! ]);
//!
//! let merged = combine(&base, &update)?;
//! assert_eq!(merged.to_json(), json!({"name": "demo", "retries": 3}));
//! # Ok::<(), std::sync::Arc<ortho_combine::CombineError>>(())
//! ```

use std::sync::Arc;

mod combine;
mod context;
mod custom;
mod error;
mod result_ext;
mod update;
mod value;
pub mod warnings;

pub use combine::{Outcome, combine, combine_all, internal_combine};
pub use context::{in_transform, mark};
pub use custom::{CombineFn, Mergeable};
pub use error::{CombineError, UsageError};
pub use result_ext::{CombineResultExt, UsageResultExt};
pub use update::{
    Directive, Position, Transform, Update, UpdateCreator, chain, ignore, is_opaque,
    keyed_update, opaque, remove, replace, transform, update_creator,
};
pub use value::{Container, Fields, Key, Symbol, Value};

/// Result type used throughout the crate.
///
/// Errors are shared behind an [`Arc`] so they can be cloned cheaply while
/// propagating out of nested transforms and custom merges.
pub type CombineResult<T> = Result<T, Arc<CombineError>>;
