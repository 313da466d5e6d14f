//! Scoped suppression of invalid-operation reporting.

use std::cell::Cell;

thread_local! {
    static SUPPRESS_INVALID: Cell<bool> = const { Cell::new(false) };
}

/// While alive, invalid operations in sandboxed evaluation are not reported.
///
/// Dropping the guard restores the previous state, on every exit path including
/// unwinding. Guards nest.
#[must_use = "suppression ends when the guard is dropped"]
pub struct InvalidOpGuard {
    previous: bool,
}

impl InvalidOpGuard {
    pub fn suppress() -> Self {
        let previous = SUPPRESS_INVALID.with(|c| c.replace(true));
        Self { previous }
    }
}

impl Drop for InvalidOpGuard {
    fn drop(&mut self) {
        SUPPRESS_INVALID.with(|c| c.set(self.previous));
    }
}

pub fn invalid_ops_suppressed() -> bool {
    SUPPRESS_INVALID.with(Cell::get)
}
