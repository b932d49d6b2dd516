//! Value model consumed and produced by the combiner.
//!
//! A [`Value`] is either a scalar (primitives, lists, opaque containers and
//! custom values) or a [`Container`]. Containers are shared behind [`Arc`],
//! so cloning a value never copies its contents and reference identity can be
//! observed through [`Value::is_same`].

mod container;
mod json;
mod key;

use std::sync::Arc;

use serde_json::Number;

use crate::Mergeable;

pub use container::{Container, Fields};
pub use key::{Key, Symbol};

/// A structured or scalar value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Explicit null.
    #[default]
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar.
    Number(Number),
    /// String scalar.
    String(String),
    /// Ordered list; always treated as a scalar by the combiner.
    List(Arc<[Value]>),
    /// Keyed container the combiner recurses into unless it is opaque.
    Container(Arc<Container>),
    /// Value with its own merge rules.
    Custom(Arc<dyn Mergeable>),
}

impl Value {
    /// Wraps a custom mergeable value.
    #[must_use]
    pub fn custom(value: impl Mergeable + 'static) -> Self {
        Self::Custom(Arc::new(value))
    }

    /// Builds a container value from key/value pairs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ortho_combine::Value;
    /// let value = Value::container([("x", 1), ("y", 2)]);
    /// assert_eq!(value.to_json(), serde_json::json!({"x": 1, "y": 2}));
    /// ```
    #[must_use]
    pub fn container<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Key>,
        V: Into<Self>,
    {
        Self::Container(Arc::new(entries.into_iter().collect()))
    }

    /// Returns the container when this value is one, opaque or not.
    #[must_use]
    pub const fn as_container(&self) -> Option<&Arc<Container>> {
        match self {
            Self::Container(container) => Some(container),
            _ => None,
        }
    }

    /// Returns the container only when the combiner may recurse into it.
    #[must_use]
    pub fn as_mergeable_container(&self) -> Option<&Arc<Container>> {
        self.as_container()
            .filter(|container| !container.is_opaque())
    }

    /// Returns `true` for any container value.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Container(_))
    }

    /// Returns `true` for a container carrying the opaque marker.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.as_container().is_some_and(|container| container.is_opaque())
    }

    /// Returns the string slice for [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the integer for numeric values that fit in `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(number) => number.as_i64(),
            _ => None,
        }
    }

    /// Looks up an enumerable entry by name when this value is a container.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&Self> {
        self.as_container().and_then(|container| container.named(name))
    }

    /// Reference identity.
    ///
    /// Shared values (lists, containers and custom values) are the same when
    /// they point at the same allocation; other scalars compare by content.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ortho_combine::Value;
    /// let value = Value::container([("x", 1)]);
    /// assert!(value.is_same(&value.clone()));
    /// assert!(!value.is_same(&Value::container([("x", 1)])));
    /// ```
    #[must_use]
    pub fn is_same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::List(left), Self::List(right)) => Arc::ptr_eq(left, right),
            (Self::Container(left), Self::Container(right)) => Arc::ptr_eq(left, right),
            (Self::Custom(left), Self::Custom(right)) => {
                std::ptr::addr_eq(Arc::as_ptr(left), Arc::as_ptr(right))
            }
            (Self::List(_) | Self::Container(_) | Self::Custom(_), _)
            | (_, Self::List(_) | Self::Container(_) | Self::Custom(_)) => false,
            _ => self == other,
        }
    }
}

impl PartialEq for Value {
    /// Content equality; custom values compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Number(left), Self::Number(right)) => left == right,
            (Self::String(left), Self::String(right)) => left == right,
            (Self::List(left), Self::List(right)) => left == right,
            (Self::Container(left), Self::Container(right)) => left == right,
            (Self::Custom(left), Self::Custom(right)) => {
                std::ptr::addr_eq(Arc::as_ptr(left), Arc::as_ptr(right))
            }
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Self::Number(number.into())
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Self::Number(number.into())
    }
}

impl From<u32> for Value {
    fn from(number: u32) -> Self {
        Self::Number(number.into())
    }
}

impl From<u64> for Value {
    fn from(number: u64) -> Self {
        Self::Number(number.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no numeric representation and become `Null`.
    fn from(number: f64) -> Self {
        Number::from_f64(number).map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::String(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::String(text)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items.into())
    }
}

impl From<Container> for Value {
    fn from(container: Container) -> Self {
        Self::Container(Arc::new(container))
    }
}

impl From<Arc<Container>> for Value {
    fn from(container: Arc<Container>) -> Self {
        Self::Container(container)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests;
