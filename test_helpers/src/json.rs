//! JSON shorthands for building values and updates in tests.

use anyhow::{Context, Result};
use ortho_combine::{Update, Value, combine};

/// Builds a [`Value`] from a JSON literal.
#[must_use]
pub fn value(json: serde_json::Value) -> Value {
    Value::from(json)
}

/// Builds a literal [`Update`] from a JSON literal.
#[must_use]
pub fn update(json: serde_json::Value) -> Update {
    Update::from(json)
}

/// Parses a JSON document, tolerating one layer of surrounding quotes.
///
/// # Errors
///
/// Returns an error when the text is not valid JSON.
pub fn parse(raw: &str) -> Result<serde_json::Value> {
    let text = crate::text::unquote(raw);
    serde_json::from_str(text).with_context(|| format!("invalid JSON: {text}"))
}

/// Combines `base` with `update` and renders the result as JSON.
///
/// # Errors
///
/// Returns the combiner's error when the combine fails.
pub fn combined(base: serde_json::Value, update: &Update) -> Result<serde_json::Value> {
    Ok(combine(&value(base), update)?.to_json())
}
