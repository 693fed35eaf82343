//! Unwind signalling helpers.
//!
//! Thin wrappers over [`std::panic`] for code that needs to raise a marker
//! unwind, run cleanup on the way out of a failing block, or contain an
//! unwind entirely.
//!
//! [`catch_all`] swallows *every* unwind, including ones raised by genuine
//! bugs. Callers must be prepared for it to mask fatal conditions; the
//! registry only uses it during teardown, where leaking the remaining handles
//! is worse than continuing.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Payload raised by [`throw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal;

/// Starts unwinding with a [`Signal`] payload.
pub fn throw() -> ! {
    panic::panic_any(Signal)
}

/// Returns `true` if an unwind payload came from [`throw`].
#[must_use]
pub fn is_signal(payload: &(dyn Any + Send)) -> bool {
    payload.is::<Signal>()
}

/// Runs `f`. If it unwinds, runs `cleanup` and then resumes the same unwind.
pub fn catch<T>(f: impl FnOnce() -> T, cleanup: impl FnOnce()) -> T {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(payload) => {
            cleanup();
            panic::resume_unwind(payload)
        }
    }
}

/// Runs `f` and suppresses any unwind. Returns `None` if `f` unwound.
pub fn catch_all<T>(f: impl FnOnce() -> T) -> Option<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).ok()
}
