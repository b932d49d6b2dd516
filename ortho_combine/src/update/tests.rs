//! Unit tests for update construction and classification.

use rstest::rstest;
use serde_json::json;
use serial_test::serial;

use super::{
    Directive, Update, chain, ignore, is_opaque, keyed_update, opaque, remove, replace,
    transform, update_creator,
};
use crate::{
    Container, Key, Value,
    warnings::{self, OPAQUE_NON_CONTAINER},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Kind {
    Replace,
    Remove,
    Ignore,
    Chain,
    Transform,
    Plain,
}

fn kind_of(update: &Update) -> Kind {
    if update.is_replace() {
        Kind::Replace
    } else if update.is_remove() {
        Kind::Remove
    } else if update.is_ignore() {
        Kind::Ignore
    } else if update.is_chain() {
        Kind::Chain
    } else if update.is_transform() {
        Kind::Transform
    } else {
        Kind::Plain
    }
}

#[rstest]
#[case::replace(replace(1), Kind::Replace)]
#[case::remove(remove(), Kind::Remove)]
#[case::ignore(ignore(), Kind::Ignore)]
#[case::chain(chain([remove()]), Kind::Chain)]
#[case::transform(transform(|_| Ok(remove())), Kind::Transform)]
#[case::literal(Update::from(3), Kind::Plain)]
#[case::map(Update::map([("x", remove())]), Kind::Plain)]
fn predicates_are_mutually_exclusive(#[case] update: Update, #[case] expected: Kind) {
    assert_eq!(kind_of(&update), expected);
}

#[rstest]
#[case::map(Update::map([("x", Update::from(1))]), true)]
#[case::keyed(keyed_update([("x", remove())]), true)]
#[case::container_literal(Update::from(json!({"x": 1})), true)]
#[case::empty_container_literal(Update::from(json!({})), true)]
#[case::scalar_literal(Update::from("text"), false)]
#[case::list_literal(Update::from(json!([1, 2])), false)]
#[case::replace(replace(json!({"x": 1})), false)]
#[case::transform(transform(|_| Ok(ignore())), false)]
fn keyed_updates_are_detected(#[case] update: Update, #[case] expected: bool) {
    assert_eq!(update.is_keyed(), expected);
}

#[test]
fn opaque_containers_are_not_keyed() {
    let update = opaque(Container::new().with("x", 1));
    assert!(!update.is_keyed());
    assert!(matches!(&update, Update::Value(value) if is_opaque(value)));
}

#[test]
fn opaque_marks_the_shared_container_in_place() {
    let shared = Value::from(json!({"x": 1}));
    let alias = shared.clone();
    assert!(!is_opaque(&alias));
    let _update = opaque(shared);
    assert!(is_opaque(&alias));
}

#[test]
#[serial]
fn opaque_on_scalars_falls_back_to_replace() {
    warnings::set_test_mode(true);
    warnings::reset_warnings();
    let update = opaque("text");
    assert!(matches!(
        update.as_directive(),
        Some(Directive::Replace(Value::String(text))) if text == "text"
    ));
    assert!(warnings::is_warning_displayed(OPAQUE_NON_CONTAINER));
    warnings::reset_warnings();
}

#[test]
fn chain_keeps_its_steps_in_order() {
    let update = chain([Update::from(1), remove(), ignore()]);
    let Some(Directive::Chain(steps)) = update.as_directive() else {
        panic!("expected a chain, got {update:?}");
    };
    let kinds: Vec<Kind> = steps.iter().map(kind_of).collect();
    assert_eq!(kinds, [Kind::Plain, Kind::Remove, Kind::Ignore]);
}

#[test]
fn keyed_update_keeps_duplicate_entries() {
    let update = keyed_update([("x", remove()), ("x", Update::from(2))]);
    let Some(Directive::KeyedUpdate(entries)) = update.as_directive() else {
        panic!("expected a keyed update, got {update:?}");
    };
    let keys: Vec<&Key> = entries.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, [&Key::from("x"), &Key::from("x")]);
}

#[test]
fn transforms_compare_by_identity() {
    let first = transform(|_| Ok(remove()));
    let second = transform(|_| Ok(remove()));
    let (Update::Transform(a), Update::Transform(b)) = (&first, &second) else {
        panic!("expected transforms");
    };
    assert!(a.ptr_eq(&a.clone()));
    assert!(!a.ptr_eq(b));
}

#[test]
fn update_creators_build_fresh_updates() {
    let set_to = update_creator(|n: i64| Update::from(n));
    let copy = set_to.clone();
    let built = copy.create(4);
    assert!(matches!(built, Update::Value(ref value) if value.as_i64() == Some(4)));
    assert!(format!("{set_to:?}").starts_with("UpdateCreator"));
}

#[test]
fn literal_conversions_wrap_values() {
    assert!(matches!(Update::from(true), Update::Value(Value::Bool(true))));
    assert!(matches!(Update::from(String::from("s")), Update::Value(Value::String(_))));
    assert!(matches!(
        Update::from(Container::new()),
        Update::Value(Value::Container(_))
    ));
}
