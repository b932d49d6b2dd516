//! Emit-once warnings for deprecated or suspicious usage.
//!
//! Each warning is identified by a key and reaches the `tracing` subscriber at
//! most once per process. Test mode keeps recording which keys fired but
//! suppresses emission, so suites can assert on warnings without noise.

use std::collections::BTreeSet;

use parking_lot::{Mutex, const_mutex};

/// Key for [`crate::opaque`] being called on a non-container.
pub const OPAQUE_NON_CONTAINER: &str = "opaque_non_container";

/// Key for [`crate::combine_all`] receiving more than one update.
pub const MULTIPLE_UPDATES: &str = "multiple_updates";

/// Key for a transform returning a transform it did not [`crate::mark`].
pub const POSSIBLE_INCORRECT_UPDATE_CREATOR_USE: &str = "possible_incorrect_update_creator_use";

struct WarningState {
    displayed: BTreeSet<String>,
    test_mode: bool,
}

static STATE: Mutex<WarningState> = const_mutex(WarningState {
    displayed: BTreeSet::new(),
    test_mode: false,
});

/// Emits `message` unless a warning with `key` has already been recorded.
pub fn warn(key: &str, message: &str) {
    let mut state = STATE.lock();
    if state.displayed.contains(key) {
        return;
    }
    state.displayed.insert(key.to_owned());
    if !state.test_mode {
        tracing::warn!(key, "{message}");
    }
}

/// Forgets every recorded warning so each can fire again.
pub fn reset_warnings() {
    STATE.lock().displayed.clear();
}

/// Enables or disables test mode.
pub fn set_test_mode(enabled: bool) {
    STATE.lock().test_mode = enabled;
}

/// Returns `true` when the warning identified by `key` has been recorded.
#[must_use]
pub fn is_warning_displayed(key: &str) -> bool {
    STATE.lock().displayed.contains(key)
}
