//! Directive variants together with their factories and predicates.

use crate::{
    CombineResult, Key, Value,
    warnings::{self, OPAQUE_NON_CONTAINER},
};

use super::{Position, Transform, Update};

/// Non-default merge instruction.
///
/// Directives are resolved while combining and never appear in the output;
/// only the payload of [`Directive::Replace`] is injected, untouched.
#[derive(Clone, Debug)]
pub enum Directive {
    /// Use the value verbatim, whatever the base holds.
    Replace(Value),
    /// Drop the key from the enclosing container.
    Remove,
    /// Keep the base value, by reference, when it is present.
    Ignore,
    /// Apply updates one after another, threading value and presence.
    Chain(Vec<Update>),
    /// Merge explicit `(key, update)` entries in order.
    KeyedUpdate(Vec<(Key, Update)>),
}

/// Replaces the current value with `value`, without merging.
///
/// # Examples
///
/// ```rust
/// use ortho_combine::{Update, Value, combine, replace};
/// use serde_json::json;
///
/// let base = Value::from(json!({"x": {"a": 1}}));
/// let update = Update::map([("x", replace(json!({"b": 2})))]);
/// assert_eq!(combine(&base, &update)?.to_json(), json!({"x": {"b": 2}}));
/// # Ok::<(), std::sync::Arc<ortho_combine::CombineError>>(())
/// ```
#[must_use]
pub fn replace(value: impl Into<Value>) -> Update {
    Update::Directive(Directive::Replace(value.into()))
}

/// Removes the current key from its container.
#[must_use]
pub const fn remove() -> Update {
    Update::Directive(Directive::Remove)
}

/// Keeps the current value untouched; an absent key stays absent.
#[must_use]
pub const fn ignore() -> Update {
    Update::Directive(Directive::Ignore)
}

/// Applies `updates` in order.
///
/// # Examples
///
/// ```rust
/// use ortho_combine::{Update, Value, chain, combine, remove, transform};
/// use serde_json::json;
///
/// let base = Value::from(json!({"x": 5}));
/// let update = Update::map([(
///     "x",
///     chain([
///         remove(),
///         transform(|position| {
///             Ok(Update::from(if position.is_present() { "bad" } else { "good" }))
///         }),
///     ]),
/// )]);
/// assert_eq!(combine(&base, &update)?.to_json(), json!({"x": "good"}));
/// # Ok::<(), std::sync::Arc<ortho_combine::CombineError>>(())
/// ```
#[must_use]
pub fn chain(updates: impl IntoIterator<Item = Update>) -> Update {
    Update::Directive(Directive::Chain(updates.into_iter().collect()))
}

/// Merges explicit `(key, update)` entries in order.
///
/// Unlike a map, the entries are kept as given. Updates for a repeated key
/// apply one after another, each seeing the result of the one before, and a
/// custom merge receives every entry.
///
/// # Examples
///
/// ```rust
/// use ortho_combine::{Update, Value, combine, keyed_update, transform};
/// use serde_json::json;
///
/// let double = transform(|position| {
///     Ok(Update::from(position.current().and_then(Value::as_i64).unwrap_or(0) * 2))
/// });
/// let update = keyed_update([("n", Update::from(3)), ("n", double)]);
/// let merged = combine(&Value::from(json!({"n": 10})), &update)?;
/// assert_eq!(merged.to_json(), json!({"n": 6}));
/// # Ok::<(), std::sync::Arc<ortho_combine::CombineError>>(())
/// ```
#[must_use]
pub fn keyed_update<K>(entries: impl IntoIterator<Item = (K, Update)>) -> Update
where
    K: Into<Key>,
{
    Update::Directive(Directive::KeyedUpdate(
        entries
            .into_iter()
            .map(|(key, update)| (key.into(), update))
            .collect(),
    ))
}

/// Wraps `f` as a transform update.
#[must_use]
pub fn transform<F>(f: F) -> Update
where
    F: Fn(&Position<'_>) -> CombineResult<Update> + Send + Sync + 'static,
{
    Update::Transform(Transform::new(f))
}

/// Marks a container as opaque and returns it as a literal update.
///
/// The marker is attached in place, so every holder of the container sees it
/// from now on and the combiner never recurses into it again. Any other value
/// cannot carry the marker: a one-time warning is emitted and the value is
/// wrapped in [`replace`] instead.
///
/// # Examples
///
/// ```rust
/// use ortho_combine::{Update, Value, combine, opaque};
/// use serde_json::json;
///
/// let settings = Value::from(json!({"y": 1}));
/// let replaced = combine(&Value::from(json!({"x": 1})), &opaque(settings.clone()))?;
/// assert!(replaced.is_same(&settings));
///
/// let merged = combine(&replaced, &Update::from(json!({"z": 1})))?;
/// assert_eq!(merged.to_json(), json!({"z": 1}));
/// # Ok::<(), std::sync::Arc<ortho_combine::CombineError>>(())
/// ```
#[must_use]
pub fn opaque(target: impl Into<Value>) -> Update {
    let value = target.into();
    if let Some(container) = value.as_container() {
        container.mark_opaque();
        return Update::Value(value);
    }
    warnings::warn(
        OPAQUE_NON_CONTAINER,
        "`opaque` should only be used with containers. Try using `replace` instead",
    );
    replace(value)
}

/// Returns `true` when `value` is a container carrying the opaque marker.
#[must_use]
pub fn is_opaque(value: &Value) -> bool {
    value.is_opaque()
}
