//! Update model: literals, keyed updates, directives and transforms.
//!
//! An [`Update`] describes how to derive a new value from a base value. Plain
//! literals replace scalars and merge into containers; [`Directive`]s alter
//! that default; [`Transform`]s compute the next update from the value
//! currently held at their position.

mod directive;

use std::{fmt, sync::Arc};

use crate::{
    CombineResult, Container, Fields, Key, Outcome, Value,
    combine::{MergeMode, resolve},
};

pub use directive::{
    Directive, chain, ignore, is_opaque, keyed_update, opaque, remove, replace, transform,
};

/// Instruction for deriving a new value from a base value.
#[derive(Clone, Debug)]
pub enum Update {
    /// Literal value. A non-opaque container literal merges key by key; any
    /// other literal replaces the base.
    Value(Value),
    /// Container of nested updates, merged key by key.
    Map(Fields<Update>),
    /// Non-default merge instruction.
    Directive(Directive),
    /// Callable computing the update from the current value.
    Transform(Transform),
}

impl Update {
    /// Builds a keyed update from `(key, update)` pairs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ortho_combine::{Update, Value, combine, remove};
    /// use serde_json::json;
    ///
    /// let base = Value::from(json!({"x": 1, "y": 2}));
    /// let merged = combine(&base, &Update::map([("x", remove())]))?;
    /// assert_eq!(merged.to_json(), json!({"y": 2}));
    /// # Ok::<(), std::sync::Arc<ortho_combine::CombineError>>(())
    /// ```
    #[must_use]
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<Key>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Map(entries.into_iter().collect())
    }

    /// Returns the directive when this update is one.
    #[must_use]
    pub const fn as_directive(&self) -> Option<&Directive> {
        match self {
            Self::Directive(directive) => Some(directive),
            _ => None,
        }
    }

    /// Returns `true` for [`Directive::Replace`].
    #[must_use]
    pub const fn is_replace(&self) -> bool {
        matches!(self, Self::Directive(Directive::Replace(_)))
    }

    /// Returns `true` for [`Directive::Remove`].
    #[must_use]
    pub const fn is_remove(&self) -> bool {
        matches!(self, Self::Directive(Directive::Remove))
    }

    /// Returns `true` for [`Directive::Ignore`].
    #[must_use]
    pub const fn is_ignore(&self) -> bool {
        matches!(self, Self::Directive(Directive::Ignore))
    }

    /// Returns `true` for [`Directive::Chain`].
    #[must_use]
    pub const fn is_chain(&self) -> bool {
        matches!(self, Self::Directive(Directive::Chain(_)))
    }

    /// Returns `true` for [`Update::Transform`].
    #[must_use]
    pub const fn is_transform(&self) -> bool {
        matches!(self, Self::Transform(_))
    }

    /// Returns `true` when the update merges key by key: a map, a keyed
    /// update directive or a non-opaque container literal.
    #[must_use]
    pub fn is_keyed(&self) -> bool {
        match self {
            Self::Map(_) | Self::Directive(Directive::KeyedUpdate(_)) => true,
            Self::Value(value) => value.as_mergeable_container().is_some(),
            Self::Directive(_) | Self::Transform(_) => false,
        }
    }
}

impl From<Value> for Update {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Container> for Update {
    fn from(container: Container) -> Self {
        Self::Value(container.into())
    }
}

impl From<Arc<Container>> for Update {
    fn from(container: Arc<Container>) -> Self {
        Self::Value(container.into())
    }
}

impl From<serde_json::Value> for Update {
    fn from(json: serde_json::Value) -> Self {
        Self::Value(json.into())
    }
}

impl From<bool> for Update {
    fn from(flag: bool) -> Self {
        Self::Value(flag.into())
    }
}

impl From<i32> for Update {
    fn from(number: i32) -> Self {
        Self::Value(number.into())
    }
}

impl From<i64> for Update {
    fn from(number: i64) -> Self {
        Self::Value(number.into())
    }
}

impl From<&str> for Update {
    fn from(text: &str) -> Self {
        Self::Value(text.into())
    }
}

impl From<String> for Update {
    fn from(text: String) -> Self {
        Self::Value(text.into())
    }
}

impl From<Fields<Self>> for Update {
    fn from(fields: Fields<Self>) -> Self {
        Self::Map(fields)
    }
}

impl From<Directive> for Update {
    fn from(directive: Directive) -> Self {
        Self::Directive(directive)
    }
}

impl From<Transform> for Update {
    fn from(transform: Transform) -> Self {
        Self::Transform(transform)
    }
}

/// Where a transform runs: the current value, its key and its presence.
#[derive(Clone, Copy, Debug)]
pub struct Position<'a> {
    current: Option<&'a Value>,
    key: Option<&'a Key>,
    is_present: bool,
    mode: MergeMode,
}

impl<'a> Position<'a> {
    pub(crate) const fn new(
        current: Option<&'a Value>,
        key: Option<&'a Key>,
        is_present: bool,
        mode: MergeMode,
    ) -> Self {
        Self {
            current,
            key,
            is_present,
            mode,
        }
    }

    /// Value currently held at this position, or `None` when absent.
    #[must_use]
    pub const fn current(&self) -> Option<&'a Value> {
        self.current
    }

    /// Key of this position inside its parent; `None` at the root.
    #[must_use]
    pub const fn key(&self) -> Option<&'a Key> {
        self.key
    }

    /// Whether the key existed in the base before this step.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.is_present
    }

    /// Resolves `update` against this position without failing on removal.
    ///
    /// This is [`crate::internal_combine`] bound to the position's value, key
    /// and presence, so transforms can inspect sub-results. Keyed updates
    /// follow the same rules as the combiner here: under a scalar key they
    /// build a fresh container instead of merging into the current one.
    ///
    /// # Errors
    ///
    /// Propagates any error raised while resolving `update`.
    pub fn combine(&self, update: &Update) -> CombineResult<Outcome> {
        resolve(self.current, update, self.key, self.is_present, self.mode)
    }
}

type TransformFn = dyn Fn(&Position<'_>) -> CombineResult<Update> + Send + Sync;

/// Callable computing the next [`Update`] from a [`Position`].
///
/// Transforms are compared by identity: clones of one transform are the same
/// transform, separately constructed ones are not.
#[derive(Clone)]
pub struct Transform(Arc<TransformFn>);

impl Transform {
    /// Wraps `f` as a transform.
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Position<'_>) -> CombineResult<Update> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, position: &Position<'_>) -> CombineResult<Update> {
        (self.0)(position)
    }

    /// Returns `true` when both handles refer to the same callable.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(<fn>)")
    }
}

type CreatorFn<A> = dyn Fn(A) -> Update + Send + Sync;

/// Factory that builds updates from arguments while an update is being
/// constructed.
///
/// An update creator is deliberately not an [`Update`] or a [`Transform`]:
/// it can only be invoked through [`UpdateCreator::create`], so it cannot be
/// placed in an update tree by mistake.
///
/// ```compile_fail
/// use ortho_combine::{Update, update_creator};
///
/// let increment_by = update_creator(|step: i64| Update::from(step));
/// let _ = Update::map([("count", increment_by)]);
/// ```
pub struct UpdateCreator<A> {
    create: Arc<CreatorFn<A>>,
}

impl<A> UpdateCreator<A> {
    /// Builds the update for `args`.
    #[must_use]
    pub fn create(&self, args: A) -> Update {
        (self.create)(args)
    }
}

impl<A> Clone for UpdateCreator<A> {
    fn clone(&self) -> Self {
        Self {
            create: Arc::clone(&self.create),
        }
    }
}

impl<A> fmt::Debug for UpdateCreator<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UpdateCreator(<fn>)")
    }
}

/// Tags `factory` as an update creator.
///
/// # Examples
///
/// ```rust
/// use ortho_combine::{Update, Value, combine, transform, update_creator};
/// use serde_json::json;
///
/// let increment_by = update_creator(|step: i64| {
///     transform(move |position| {
///         let current = position.current().and_then(Value::as_i64).unwrap_or(0);
///         Ok(Update::from(current + step))
///     })
/// });
///
/// let base = Value::from(json!({"count": 1}));
/// let merged = combine(&base, &Update::map([("count", increment_by.create(2))]))?;
/// assert_eq!(merged.to_json(), json!({"count": 3}));
/// # Ok::<(), std::sync::Arc<ortho_combine::CombineError>>(())
/// ```
#[must_use]
pub fn update_creator<A, F>(factory: F) -> UpdateCreator<A>
where
    F: Fn(A) -> Update + Send + Sync + 'static,
{
    UpdateCreator {
        create: Arc::new(factory),
    }
}

#[cfg(test)]
mod tests;
