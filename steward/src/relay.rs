//! Single-slot error relay between the dispatch loop and the controller.
//!
//! The host supervisor's run primitive only reports success or failure of the
//! service session itself; an error raised by the application inside the loop
//! has no path back to the caller of `run`. The relay carries it across that
//! boundary: the loop records, the controller takes after the host returns.

use parking_lot::Mutex;

use crate::errors::StewardError;

/// Mutex-guarded slot holding at most one error
#[derive(Debug, Default)]
pub struct ErrorRelay {
    slot: Mutex<Option<StewardError>>,
}

impl ErrorRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the slot. Called at the start of every supervised run so a
    /// stale error from a previous run cannot leak into this one.
    pub fn reset(&self) {
        *self.slot.lock() = None;
    }

    /// Store an error, replacing any earlier one. Last writer wins.
    pub fn record(&self, err: StewardError) {
        *self.slot.lock() = Some(err);
    }

    /// Consume the slot, leaving it empty.
    pub fn take(&self) -> Option<StewardError> {
        self.slot.lock().take()
    }
}
