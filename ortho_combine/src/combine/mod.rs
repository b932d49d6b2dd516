//! Presence-aware recursive combiner.
//!
//! [`internal_combine`] dispatches on the shape of the update in a fixed
//! order: chains, transforms, `replace`, `ignore`, `remove`, keyed updates
//! and finally literals. Keyed updates fall through to the structural merge,
//! which recurses back here for every key.

mod structural;

use std::borrow::Cow;

use crate::{
    CombineError, CombineResult, Container, Directive, Key, Transform, Update, UsageError, Value,
    context::within_transform,
    warnings::{self, MULTIPLE_UPDATES, POSSIBLE_INCORRECT_UPDATE_CREATOR_USE},
};

use self::structural::{group_entries, merge_fields};
use crate::update::Position;

/// Result of resolving one update at one position.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The position holds this value afterwards.
    Present(Value),
    /// The key must not be materialised in the enclosing container.
    Removed,
}

impl Outcome {
    /// Returns `true` for [`Outcome::Present`].
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Borrows the resulting value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Present(value) => Some(value),
            Self::Removed => None,
        }
    }

    /// Takes the resulting value, if any.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Present(value) => Some(value),
            Self::Removed => None,
        }
    }
}

/// How keyed updates treat the base at the current position.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum MergeMode {
    /// Recurse into a present, non-opaque base container.
    Structural,
    /// Treat the base as atomic: keyed updates build a fresh container.
    Atomic,
}

/// Combines `source` with `update` and returns the new value.
///
/// The source is never modified; containers touched by the update are freshly
/// allocated and untouched parts are shared.
///
/// # Errors
///
/// Returns [`UsageError::RootRemoved`] when the update resolves to a removal
/// of the root, and propagates any error raised by transforms or custom
/// merges.
///
/// # Examples
///
/// ```rust
/// use ortho_combine::{Update, Value, combine};
/// use serde_json::json;
///
/// let base = Value::from(json!({"x": 5, "y": 7}));
/// let merged = combine(&base, &Update::from(json!({"x": 6})))?;
/// assert_eq!(merged.to_json(), json!({"x": 6, "y": 7}));
///
/// let promoted = combine(&Value::from(5), &Update::from(json!({"x": 6})))?;
/// assert_eq!(promoted.to_json(), json!({"x": 6}));
/// assert_eq!(combine(&base, &Update::from(5))?.to_json(), json!(5));
/// # Ok::<(), std::sync::Arc<ortho_combine::CombineError>>(())
/// ```
pub fn combine(source: &Value, update: &Update) -> CombineResult<Value> {
    internal_combine(Some(source), update, None, true)?
        .into_value()
        .ok_or_else(|| CombineError::usage(UsageError::RootRemoved))
}

/// Applies several updates to `source`, left to right.
///
/// Prefer [`crate::chain`]: passing more than one update emits a one-time
/// deprecation warning.
///
/// # Errors
///
/// Returns [`UsageError::MissingUpdate`] when `updates` is empty, and any
/// error [`combine`] raises for an individual update.
pub fn combine_all<'u, I>(source: &Value, updates: I) -> CombineResult<Value>
where
    I: IntoIterator<Item = &'u Update>,
{
    let mut updates = updates.into_iter().peekable();
    let Some(first) = updates.next() else {
        return Err(CombineError::usage(UsageError::MissingUpdate));
    };
    if updates.peek().is_some() {
        warnings::warn(
            MULTIPLE_UPDATES,
            "passing multiple updates to `combine_all` is deprecated. Use `chain` instead.",
        );
    }
    let mut current = combine(source, first)?;
    for update in updates {
        current = combine(&current, update)?;
    }
    Ok(current)
}

/// Resolves `update` against `source` at `key`, reporting removal as
/// [`Outcome::Removed`] instead of failing.
///
/// `source` is `None` when the key is absent, and `is_present` records
/// whether the key existed in the enclosing container before this step (it
/// is `true` at the root). Transforms and custom merges call this to resolve
/// nested updates.
///
/// # Errors
///
/// Propagates errors raised by transforms, custom merges and [`crate::mark`].
///
/// # Examples
///
/// ```rust
/// use ortho_combine::{Outcome, Value, ignore, internal_combine};
///
/// let outcome = internal_combine(None, &ignore(), None, false)?;
/// assert_eq!(outcome, Outcome::Removed);
///
/// let base = Value::from(3);
/// let outcome = internal_combine(Some(&base), &ignore(), None, true)?;
/// assert_eq!(outcome.value(), Some(&base));
/// # Ok::<(), std::sync::Arc<ortho_combine::CombineError>>(())
/// ```
pub fn internal_combine(
    source: Option<&Value>,
    update: &Update,
    key: Option<&Key>,
    is_present: bool,
) -> CombineResult<Outcome> {
    resolve(source, update, key, is_present, MergeMode::Structural)
}

/// Resolves `update` under an explicit merge mode.
pub(crate) fn resolve(
    source: Option<&Value>,
    update: &Update,
    key: Option<&Key>,
    is_present: bool,
    mode: MergeMode,
) -> CombineResult<Outcome> {
    match update {
        Update::Directive(Directive::Chain(steps)) => {
            resolve_chain(source, steps, key, is_present, mode)
        }
        Update::Transform(transform) => {
            resolve_transform(source, transform, key, is_present, mode)
        }
        Update::Directive(Directive::Replace(value)) => Ok(Outcome::Present(value.clone())),
        Update::Directive(Directive::Ignore) => Ok(match source {
            Some(value) if is_present => Outcome::Present(value.clone()),
            _ => Outcome::Removed,
        }),
        Update::Directive(Directive::Remove) => Ok(Outcome::Removed),
        Update::Directive(Directive::KeyedUpdate(entries)) => {
            let ordered: Vec<(&Key, &Update)> = entries
                .iter()
                .map(|(entry_key, entry)| (entry_key, entry))
                .collect();
            resolve_keyed(source, &ordered, key, is_present, mode)
        }
        Update::Map(fields) => {
            let entries: Vec<(&Key, &Update)> = fields.iter().collect();
            resolve_keyed(source, &entries, key, is_present, mode)
        }
        Update::Value(value) => match value.as_mergeable_container() {
            Some(literal) => {
                let fields = literal.fields().map_values(|item| Update::Value(item.clone()));
                let entries: Vec<(&Key, &Update)> = fields.iter().collect();
                resolve_keyed(source, &entries, key, is_present, mode)
            }
            None => Ok(Outcome::Present(value.clone())),
        },
    }
}

fn resolve_chain(
    source: Option<&Value>,
    steps: &[Update],
    key: Option<&Key>,
    is_present: bool,
    mode: MergeMode,
) -> CombineResult<Outcome> {
    let mut current = source.filter(|_| is_present).cloned();
    for step in steps {
        current = resolve(current.as_ref(), step, key, current.is_some(), mode)?.into_value();
    }
    Ok(current.map_or(Outcome::Removed, Outcome::Present))
}

fn resolve_transform(
    source: Option<&Value>,
    transform: &Transform,
    key: Option<&Key>,
    is_present: bool,
    mode: MergeMode,
) -> CombineResult<Outcome> {
    let position = Position::new(source, key, is_present, mode);
    let run = within_transform(|| transform.call(&position))?;
    if run.unsanctioned_transform().is_some() {
        warnings::warn(
            POSSIBLE_INCORRECT_UPDATE_CREATOR_USE,
            "A transform returned another transform. This may indicate invalid update creator \
             use. If this is intentional, wrap the returned transform with `mark`",
        );
    }
    resolve(source, &run.update, key, is_present, mode)
}

/// Applies ordered `(key, update)` entries at one position.
///
/// Custom values receive the entries exactly as given. Otherwise repeated
/// keys are applied one after another before the structural merge.
fn resolve_keyed(
    source: Option<&Value>,
    entries: &[(&Key, &Update)],
    key: Option<&Key>,
    is_present: bool,
    mode: MergeMode,
) -> CombineResult<Outcome> {
    if let (Some(Value::Custom(custom)), MergeMode::Structural) = (source, mode) {
        tracing::debug!(
            key = ?key,
            entries = entries.len(),
            "delegating keyed update to custom merge"
        );
        return custom
            .merge(entries, internal_combine)
            .map(Outcome::Present);
    }

    let empty = Container::new();
    let base = match (mode, source) {
        (MergeMode::Structural, Some(value)) if is_present => value
            .as_mergeable_container()
            .map_or(&empty, |container| &**container),
        _ => &empty,
    };
    let fields = group_entries(entries);
    let merged = merge_fields(
        base,
        &fields,
        |container: &Container, entry_key: &Key, entry: &Cow<'_, Update>, present: bool| {
            resolve_entry(container, entry_key, entry, present)
        },
    )?;
    Ok(Outcome::Present(Value::from(merged)))
}

/// Resolves one entry of a structural merge, honouring scalar keys.
fn resolve_entry(
    base: &Container,
    key: &Key,
    update: &Update,
    is_present: bool,
) -> CombineResult<Outcome> {
    let source = base.get(key);
    let mode = if base.is_scalar_key(key) {
        MergeMode::Atomic
    } else {
        MergeMode::Structural
    };
    resolve(source, update, Some(key), is_present, mode)
}
