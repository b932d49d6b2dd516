//! Unit tests for the warnings guard.

use ortho_combine::{Container, Value, opaque, warnings::OPAQUE_NON_CONTAINER};

use super::capture;

#[test]
fn guard_starts_from_a_clean_record() {
    {
        let guard = capture();
        let _update = opaque(5);
        assert!(guard.fired(OPAQUE_NON_CONTAINER));
    }
    let guard = capture();
    assert!(!guard.fired(OPAQUE_NON_CONTAINER));
}

#[test]
fn reset_clears_the_record_inside_one_guard() {
    let guard = capture();
    let _update = opaque("text");
    guard.reset();
    assert!(!guard.fired(OPAQUE_NON_CONTAINER));
}

#[test]
fn containers_never_trigger_the_opaque_warning() {
    let guard = capture();
    let _update = opaque(Value::from(Container::new()));
    assert!(!guard.fired(OPAQUE_NON_CONTAINER));
}
