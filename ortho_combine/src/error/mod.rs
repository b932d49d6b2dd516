//! Error types produced by the combiner.

mod constructors;
mod types;

pub use types::{CombineError, UsageError};
