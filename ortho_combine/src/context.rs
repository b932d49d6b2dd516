//! Scoped bookkeeping for running transforms.
//!
//! Every transform invocation runs inside a frame recording that a transform
//! is executing and which returned transform, if any, was sanctioned through
//! [`mark`]. Frames live in thread-local storage and follow a strict stack
//! discipline: entering a transform saves the caller's frame and dropping the
//! guard restores it, even when the transform fails or panics. Independent
//! call trees on different threads therefore never observe each other's
//! state.

use std::cell::RefCell;

use crate::{CombineError, CombineResult, Transform, Update, UsageError};

struct Frame {
    inside_transform: bool,
    sanctioned: Option<Transform>,
}

impl Frame {
    const fn idle() -> Self {
        Self {
            inside_transform: false,
            sanctioned: None,
        }
    }

    const fn active() -> Self {
        Self {
            inside_transform: true,
            sanctioned: None,
        }
    }
}

thread_local! {
    static FRAME: RefCell<Frame> = const { RefCell::new(Frame::idle()) };
}

/// Restores the enclosing frame on drop.
struct TransformScope {
    saved: Option<Frame>,
}

impl TransformScope {
    fn enter() -> Self {
        let saved = FRAME.with(|frame| frame.replace(Frame::active()));
        Self { saved: Some(saved) }
    }

    fn sanctioned() -> Option<Transform> {
        FRAME.with(|frame| frame.borrow().sanctioned.clone())
    }
}

impl Drop for TransformScope {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            FRAME.with(|frame| frame.replace(saved));
        }
    }
}

/// Result of running a transform inside its own frame.
pub(crate) struct TransformRun {
    pub(crate) update: Update,
    pub(crate) sanctioned: Option<Transform>,
}

impl TransformRun {
    /// Returns the returned transform when it was not sanctioned via [`mark`].
    pub(crate) fn unsanctioned_transform(&self) -> Option<&Transform> {
        let Update::Transform(returned) = &self.update else {
            return None;
        };
        let marked = self
            .sanctioned
            .as_ref()
            .is_some_and(|sanctioned| sanctioned.ptr_eq(returned));
        (!marked).then_some(returned)
    }
}

/// Runs `body` inside a fresh transform frame.
pub(crate) fn within_transform<F>(body: F) -> CombineResult<TransformRun>
where
    F: FnOnce() -> CombineResult<Update>,
{
    let _scope = TransformScope::enter();
    let update = body()?;
    Ok(TransformRun {
        update,
        sanctioned: TransformScope::sanctioned(),
    })
}

/// Returns `true` while a transform is executing on this thread.
#[must_use]
pub fn in_transform() -> bool {
    FRAME.with(|frame| frame.borrow().inside_transform)
}

/// Sanctions `update` as the intended result of the running transform.
///
/// A transform that returns another transform normally triggers a one-time
/// warning, because that usually means an update creator was used where a
/// transform was expected. Marking the returned transform states that this is
/// intentional.
///
/// # Errors
///
/// Returns [`UsageError::MarkOutsideTransform`] when no transform is running
/// on the current thread.
///
/// # Examples
///
/// ```rust
/// use ortho_combine::{Update, Value, combine, mark, transform};
/// use serde_json::json;
///
/// let double_later = transform(|_| {
///     mark(transform(|position| {
///         let current = position.current().and_then(Value::as_i64).unwrap_or(0);
///         Ok(Update::from(current * 2))
///     }))
/// });
/// let merged = combine(&Value::from(json!({"n": 4})), &Update::map([("n", double_later)]))?;
/// assert_eq!(merged.to_json(), json!({"n": 8}));
///
/// assert!(mark(Update::from(1)).is_err());
/// # Ok::<(), std::sync::Arc<ortho_combine::CombineError>>(())
/// ```
pub fn mark(update: Update) -> CombineResult<Update> {
    FRAME.with(|cell| {
        let mut frame = cell.borrow_mut();
        if !frame.inside_transform {
            return Err(CombineError::usage(UsageError::MarkOutsideTransform));
        }
        frame.sanctioned = match &update {
            Update::Transform(transform) => Some(transform.clone()),
            _ => None,
        };
        Ok(())
    })?;
    Ok(update)
}
