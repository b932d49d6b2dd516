//! Ordered key/value storage with per-entry enumerability.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use super::{Key, Value};

#[derive(Clone, Debug)]
struct Entry<T> {
    key: Key,
    value: T,
    enumerable: bool,
}

/// Insertion-ordered map whose entries are either enumerable or hidden.
///
/// Hidden entries are owned by the map but skipped by [`Fields::iter`] and
/// by the merge algorithm: a hidden entry on the base is dropped from merge
/// results and a hidden entry on an update is never applied.
///
/// Equality compares enumerable entries only and ignores their order.
///
/// # Examples
///
/// ```rust
/// use ortho_combine::{Fields, Key};
///
/// let mut fields: Fields<u8> = [("a", 1), ("b", 2)].into_iter().collect();
/// fields.insert_hidden("secret", 3);
/// assert_eq!(fields.len(), 3);
/// assert_eq!(fields.keys().count(), 2);
/// assert_eq!(fields.get_enumerable(&Key::from("secret")), None);
/// ```
#[derive(Clone, Debug)]
pub struct Fields<T> {
    entries: Vec<Entry<T>>,
    index: HashMap<Key, usize>,
}

impl<T> Default for Fields<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Fields<T> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Number of own entries, hidden ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the map owns no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sets `key` to `value`, returning the previous value.
    ///
    /// A new key is appended as enumerable; an existing key keeps its
    /// position and enumerability.
    pub fn insert(&mut self, key: impl Into<Key>, value: T) -> Option<T> {
        self.upsert(key.into(), value, None)
    }

    /// Sets `key` to `value` as a hidden entry, returning the previous value.
    pub fn insert_hidden(&mut self, key: impl Into<Key>, value: T) -> Option<T> {
        self.upsert(key.into(), value, Some(false))
    }

    /// Sets `key` to `value` with an explicit enumerability flag.
    pub fn insert_with(&mut self, key: impl Into<Key>, value: T, enumerable: bool) -> Option<T> {
        self.upsert(key.into(), value, Some(enumerable))
    }

    fn upsert(&mut self, key: Key, value: T, enumerable: Option<bool>) -> Option<T> {
        if let Some(entry) = self
            .index
            .get(&key)
            .copied()
            .and_then(|position| self.entries.get_mut(position))
        {
            if let Some(flag) = enumerable {
                entry.enumerable = flag;
            }
            return Some(std::mem::replace(&mut entry.value, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(Entry {
            key,
            value,
            enumerable: enumerable.unwrap_or(true),
        });
        None
    }

    fn entry(&self, key: &Key) -> Option<&Entry<T>> {
        self.index
            .get(key)
            .and_then(|position| self.entries.get(*position))
    }

    /// Returns the own entry for `key`, hidden or not.
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&T> {
        self.entry(key).map(|entry| &entry.value)
    }

    /// Mutably borrows the own entry for `key` without moving it.
    pub fn get_mut(&mut self, key: &Key) -> Option<&mut T> {
        let position = *self.index.get(key)?;
        self.entries.get_mut(position).map(|entry| &mut entry.value)
    }

    /// Returns the entry for `key` only when it is enumerable.
    #[must_use]
    pub fn get_enumerable(&self, key: &Key) -> Option<&T> {
        self.entry(key)
            .filter(|entry| entry.enumerable)
            .map(|entry| &entry.value)
    }

    /// Looks up an enumerable entry by string name.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&T> {
        self.get_enumerable(&Key::from(name))
    }

    /// Reports whether `key` is enumerable, or `None` when it is absent.
    #[must_use]
    pub fn is_enumerable(&self, key: &Key) -> Option<bool> {
        self.entry(key).map(|entry| entry.enumerable)
    }

    /// Returns `true` when `key` is an own entry, hidden or not.
    #[must_use]
    pub fn contains_key(&self, key: &Key) -> bool {
        self.index.contains_key(key)
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &Key) -> Option<T> {
        let position = self.index.remove(key)?;
        let removed = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(removed.value)
    }

    /// Iterates the enumerable entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &T)> {
        self.entries
            .iter()
            .filter(|entry| entry.enumerable)
            .map(|entry| (&entry.key, &entry.value))
    }

    /// Iterates every own entry with its enumerability flag.
    pub fn iter_all(&self) -> impl Iterator<Item = (&Key, &T, bool)> {
        self.entries
            .iter()
            .map(|entry| (&entry.key, &entry.value, entry.enumerable))
    }

    /// Iterates the enumerable keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.iter().map(|(key, _)| key)
    }

    /// Builds a new map with the same keys and flags and mapped values.
    pub fn map_values<U>(&self, mut f: impl FnMut(&T) -> U) -> Fields<U> {
        let mut mapped = Fields::new();
        for entry in &self.entries {
            mapped.insert_with(entry.key.clone(), f(&entry.value), entry.enumerable);
        }
        mapped
    }
}

impl<T: PartialEq> PartialEq for Fields<T> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().count() == other.iter().count()
            && self
                .iter()
                .all(|(key, value)| other.get_enumerable(key) == Some(value))
    }
}

impl<K, T> FromIterator<(K, T)> for Fields<T>
where
    K: Into<Key>,
{
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

/// Structured value: an ordered set of keyed [`Value`]s.
///
/// A container is the only value the combiner recurses into. It can be marked
/// opaque (see [`crate::opaque`]), which turns it into an atomic scalar for
/// merge purposes, and it can declare scalar keys whose values are always
/// replaced instead of merged.
///
/// # Examples
///
/// ```rust
/// use ortho_combine::{Container, Value};
///
/// let container = Container::new().with("port", 8080).with_hidden("token", "s3cr3t");
/// assert_eq!(container.named("port"), Some(&Value::from(8080)));
/// assert_eq!(container.named("token"), None);
/// ```
#[derive(Debug, Default)]
pub struct Container {
    fields: Fields<Value>,
    opaque: AtomicBool,
    scalars: Option<Arc<[Key]>>,
}

impl Container {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing fields.
    #[must_use]
    pub fn from_fields(fields: Fields<Value>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Empty container that carries over `base`'s scalar-key declaration.
    pub(crate) fn inheriting(base: &Self) -> Self {
        Self {
            scalars: base.scalars.clone(),
            ..Self::default()
        }
    }

    /// Builder form of [`Container::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.fields.insert(key, value.into());
        self
    }

    /// Builder form of [`Container::insert_hidden`].
    #[must_use]
    pub fn with_hidden(mut self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.fields.insert_hidden(key, value.into());
        self
    }

    /// Sets an enumerable entry, returning the previous value.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key, value.into())
    }

    /// Sets a hidden entry, returning the previous value.
    pub fn insert_hidden(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert_hidden(key, value.into())
    }

    /// Borrows the underlying fields.
    #[must_use]
    pub const fn fields(&self) -> &Fields<Value> {
        &self.fields
    }

    /// Mutably borrows the underlying fields.
    pub const fn fields_mut(&mut self) -> &mut Fields<Value> {
        &mut self.fields
    }

    /// Returns the enumerable entry for `key`.
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.fields.get_enumerable(key)
    }

    /// Returns the enumerable entry named `name`.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&Value> {
        self.fields.named(name)
    }

    /// Number of enumerable entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.iter().count()
    }

    /// Returns `true` when there are no enumerable entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attaches the opaque marker in place.
    ///
    /// This is the only mutation the crate performs on a shared container.
    pub fn mark_opaque(&self) {
        self.opaque.store(true, Ordering::Relaxed);
    }

    /// Returns `true` when the container has been marked opaque.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.opaque.load(Ordering::Relaxed)
    }

    /// Declares `keys` as scalar keys.
    ///
    /// Values under a scalar key are replaced wholesale by container updates
    /// rather than merged. Merge results inherit the declaration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ortho_combine::{Container, Key};
    /// let container = Container::new().with_scalars(["colour"]);
    /// assert!(container.is_scalar_key(&Key::from("colour")));
    /// ```
    #[must_use]
    pub fn with_scalars<K>(mut self, keys: impl IntoIterator<Item = K>) -> Self
    where
        K: Into<Key>,
    {
        self.scalars = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Returns `true` when the container declares scalar keys.
    #[must_use]
    pub const fn has_scalars(&self) -> bool {
        self.scalars.is_some()
    }

    /// Returns the declared scalar keys.
    #[must_use]
    pub fn scalars(&self) -> Option<&[Key]> {
        self.scalars.as_deref()
    }

    /// Returns `true` when `key` is declared as a scalar key.
    #[must_use]
    pub fn is_scalar_key(&self, key: &Key) -> bool {
        self.scalars
            .as_deref()
            .is_some_and(|scalars| scalars.contains(key))
    }
}

impl Clone for Container {
    /// Copies the fields, the scalar-key declaration and the opaque marker.
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            opaque: AtomicBool::new(self.is_opaque()),
            scalars: self.scalars.clone(),
        }
    }
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl<K, V> FromIterator<(K, V)> for Container
where
    K: Into<Key>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_fields(iter.into_iter().map(|(key, value)| (key, value.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Container, Fields};
    use crate::{Key, Value};

    #[test]
    fn insert_keeps_position_and_flag() {
        let mut fields: Fields<u8> = Fields::new();
        fields.insert("a", 1);
        fields.insert_hidden("b", 2);
        fields.insert("c", 3);
        assert_eq!(fields.insert("b", 4), Some(2));
        assert_eq!(fields.is_enumerable(&Key::from("b")), Some(false));
        let order: Vec<_> = fields.iter_all().map(|(key, _, _)| key.to_string()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn remove_reindexes_later_entries() {
        let mut fields: Fields<u8> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(fields.remove(&Key::from("a")), Some(1));
        assert_eq!(fields.named("c"), Some(&3));
        assert_eq!(fields.remove(&Key::from("a")), None);
        assert_eq!(fields.len(), 2);
    }

    #[rstest]
    #[case::order_insensitive(&[("a", 1), ("b", 2)], &[("b", 2), ("a", 1)], true)]
    #[case::different_value(&[("a", 1)], &[("a", 2)], false)]
    #[case::extra_key(&[("a", 1)], &[("a", 1), ("b", 2)], false)]
    fn equality_compares_content(
        #[case] left: &[(&str, u8)],
        #[case] right: &[(&str, u8)],
        #[case] expected: bool,
    ) {
        let left: Fields<u8> = left.iter().copied().collect();
        let right: Fields<u8> = right.iter().copied().collect();
        assert_eq!(left == right, expected);
    }

    #[test]
    fn equality_ignores_hidden_entries() {
        let mut left: Fields<u8> = [("a", 1)].into_iter().collect();
        left.insert_hidden("b", 2);
        let right: Fields<u8> = [("a", 1)].into_iter().collect();
        assert_eq!(left, right);
    }

    #[test]
    fn opaque_marker_survives_clone() {
        let container = Container::new().with("a", 1);
        container.mark_opaque();
        assert!(container.clone().is_opaque());
    }

    #[test]
    fn inheriting_copies_only_scalars() {
        let base = Container::new().with("a", 1).with_scalars(["a"]);
        base.mark_opaque();
        let child = Container::inheriting(&base);
        assert!(child.is_empty());
        assert!(!child.is_opaque());
        assert_eq!(child.scalars(), Some(&[Key::from("a")][..]));
    }

    #[test]
    fn container_len_counts_enumerable_entries() {
        let container = Container::new().with("a", Value::Null).with_hidden("b", 1);
        assert_eq!(container.len(), 1);
        assert_eq!(container.fields().len(), 2);
    }
}
