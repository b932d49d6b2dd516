//! Helpers for asserting on emit-once warnings in tests.
//!
//! The combiner records warnings in process-wide state. [`capture`] takes a
//! global lock, switches test mode on and clears the record; dropping the
//! returned guard clears the record again and releases the lock. Tests that
//! hold a guard therefore observe only the warnings they trigger themselves.
//!
//! # Examples
//!
//! ```
//! use ortho_combine::{combine_all, warnings::MULTIPLE_UPDATES, Update, Value};
//! use ortho_combine_test_helpers::warnings;
//!
//! let guard = warnings::capture();
//! let updates = [Update::from(1), Update::from(2)];
//! let merged = combine_all(&Value::Null, &updates);
//! assert!(merged.is_ok());
//! assert!(guard.fired(MULTIPLE_UPDATES));
//! ```

use std::sync::LazyLock;

use ortho_combine::warnings as combine_warnings;
use parking_lot::{Mutex, MutexGuard};

static WARNINGS_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(Mutex::default);

/// RAII guard giving a test exclusive use of the warning record.
pub struct WarningsGuard {
    _lock: MutexGuard<'static, ()>,
}

/// Acquires the warning record in test mode with nothing recorded.
#[must_use]
pub fn capture() -> WarningsGuard {
    let lock = WARNINGS_MUTEX.lock();
    combine_warnings::set_test_mode(true);
    combine_warnings::reset_warnings();
    WarningsGuard { _lock: lock }
}

impl WarningsGuard {
    /// Returns `true` when the warning identified by `key` has fired since
    /// the guard was taken.
    #[must_use]
    pub fn fired(&self, key: &str) -> bool {
        combine_warnings::is_warning_displayed(key)
    }

    /// Forgets every recorded warning while keeping the lock.
    pub fn reset(&self) {
        combine_warnings::reset_warnings();
    }
}

impl Drop for WarningsGuard {
    fn drop(&mut self) {
        combine_warnings::reset_warnings();
    }
}

#[cfg(test)]
mod tests;
