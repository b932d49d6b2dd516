//! Unit tests for value conversions, equality and identity.

use std::sync::Arc;

use rstest::rstest;
use serde_json::json;

use super::{Container, Value};

#[rstest]
#[case::null(Value::Null, json!(null))]
#[case::flag(Value::from(true), json!(true))]
#[case::integer(Value::from(42), json!(42))]
#[case::text(Value::from("hi"), json!("hi"))]
#[case::list(Value::from(vec![Value::from(1), Value::Null]), json!([1, null]))]
fn scalars_render_as_json(#[case] value: Value, #[case] expected: serde_json::Value) {
    assert_eq!(value.to_json(), expected);
}

#[test]
fn non_finite_floats_become_null() {
    assert_eq!(Value::from(f64::NAN), Value::Null);
}

#[test]
fn container_equality_is_structural() {
    let left = Value::from(json!({"a": {"b": 1}}));
    let right = Value::from(json!({"a": {"b": 1}}));
    assert_eq!(left, right);
    assert!(!left.is_same(&right));
}

#[test]
fn scalars_are_the_same_when_equal() {
    assert!(Value::from(5).is_same(&Value::from(5)));
    assert!(!Value::from(5).is_same(&Value::from("5")));
}

#[test]
fn opaque_containers_are_not_mergeable() {
    let container = Arc::new(Container::new().with("a", 1));
    let value = Value::from(Arc::clone(&container));
    assert!(value.as_mergeable_container().is_some());
    container.mark_opaque();
    assert!(value.is_opaque());
    assert!(value.as_mergeable_container().is_none());
}

#[test]
fn optional_values_map_to_null() {
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some("x")), Value::from("x"));
}
