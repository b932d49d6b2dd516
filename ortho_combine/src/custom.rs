//! Extension point for values that merge themselves.
//!
//! A [`Value::Custom`] wraps a [`Mergeable`] implementation. When a keyed
//! update meets such a value, the combiner does not enumerate keys itself:
//! it hands every enumerable `(key, update)` entry to
//! [`Mergeable::merge`] in order, together with [`crate::internal_combine`],
//! and uses the returned value verbatim. The implementation owns every
//! domain rule, and its errors propagate to the caller unchanged.

use std::fmt;

use crate::{CombineResult, Key, Outcome, Update, Value};

/// Signature of [`crate::internal_combine`], handed to custom merges so they
/// can resolve directives and transforms for their own entries.
pub type CombineFn =
    fn(Option<&Value>, &Update, Option<&Key>, bool) -> CombineResult<Outcome>;

/// Capability implemented by values that supply their own merge logic.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
///
/// use ortho_combine::{
///     CombineError, CombineFn, CombineResult, Key, Mergeable, Update, Value, combine,
/// };
///
/// /// Counters that only ever accept numeric updates for known names.
/// #[derive(Debug)]
/// struct Counters(BTreeMap<String, i64>);
///
/// impl Mergeable for Counters {
///     fn merge(
///         &self,
///         entries: &[(&Key, &Update)],
///         combine: CombineFn,
///     ) -> CombineResult<Value> {
///         let mut next = self.0.clone();
///         for (key, update) in entries {
///             let Some(name) = key.as_name().filter(|name| next.contains_key(*name)) else {
///                 return Err(CombineError::user(std::fmt::Error));
///             };
///             let current = next.get(name).copied().map(Value::from);
///             let outcome = combine(current.as_ref(), *update, Some(*key), true)?;
///             if let Some(count) = outcome.value().and_then(Value::as_i64) {
///                 next.insert(name.to_owned(), count);
///             }
///         }
///         Ok(Value::custom(Self(next)))
///     }
/// }
///
/// let counters = Value::custom(Counters(BTreeMap::from([("hits".to_owned(), 1)])));
/// let merged = combine(&counters, &Update::map([("hits", Update::from(2))]))?;
/// assert!(matches!(merged, Value::Custom(_)));
/// assert!(combine(&counters, &Update::map([("misses", Update::from(2))])).is_err());
/// # Ok::<(), std::sync::Arc<CombineError>>(())
/// ```
pub trait Mergeable: fmt::Debug + Send + Sync {
    /// Applies the enumerable `entries` of a keyed update and returns the
    /// fully merged replacement value.
    ///
    /// Entries of a [`crate::keyed_update`] arrive exactly as given, repeated
    /// keys included. `combine` is [`crate::internal_combine`]; call it to resolve each
    /// entry's directives and transforms against the current field value.
    ///
    /// # Errors
    ///
    /// Implementations report domain violations (unknown keys, refused
    /// deletions) through [`crate::CombineError::UserMerge`], and propagate
    /// errors returned by `combine` as they are.
    fn merge(&self, entries: &[(&Key, &Update)], combine: CombineFn) -> CombineResult<Value>;

    /// Plain rendering of the value, used for JSON output.
    fn snapshot(&self) -> Value {
        Value::Null
    }
}
