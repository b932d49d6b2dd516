//! Conversions between [`Value`] and `serde_json`.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value as Json};

use super::{Container, Key, Value};

impl From<Json> for Value {
    /// Objects become containers and arrays become lists.
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Self::Null,
            Json::Bool(flag) => Self::Bool(flag),
            Json::Number(number) => Self::Number(number),
            Json::String(text) => Self::String(text),
            Json::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Json::Object(map) => Self::Container(Arc::new(map.into_iter().collect())),
        }
    }
}

impl Value {
    /// Renders the value as JSON.
    ///
    /// Only enumerable, string-keyed entries are emitted; symbol keys and
    /// hidden entries have no JSON representation. Custom values render
    /// through [`crate::Mergeable::snapshot`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ortho_combine::{Container, Symbol, Value};
    /// use serde_json::json;
    ///
    /// let value = Value::from(
    ///     Container::new()
    ///         .with("visible", true)
    ///         .with_hidden("hidden", true)
    ///         .with(Symbol::new("tag"), true),
    /// );
    /// assert_eq!(value.to_json(), json!({"visible": true}));
    /// ```
    #[must_use]
    pub fn to_json(&self) -> Json {
        match self {
            Self::Null => Json::Null,
            Self::Bool(flag) => Json::Bool(*flag),
            Self::Number(number) => Json::Number(number.clone()),
            Self::String(text) => Json::String(text.clone()),
            Self::List(items) => Json::Array(items.iter().map(Self::to_json).collect()),
            Self::Container(container) => Json::Object(container_to_json(container)),
            Self::Custom(custom) => custom.snapshot().to_json(),
        }
    }
}

fn container_to_json(container: &Container) -> Map<String, Json> {
    container
        .fields()
        .iter()
        .filter_map(|(key, value)| match key {
            Key::Name(name) => Some((name.clone(), value.to_json())),
            Key::Symbol(_) => None,
        })
        .collect()
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
