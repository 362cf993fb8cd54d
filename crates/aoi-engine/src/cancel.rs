//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shared cancellation flag for one capture session.
///
/// The loop reads it at the top of every cycle and again immediately
/// after every suspension point. Cancelling never aborts an in-flight
/// call; it only prevents the result from being observed and further
/// cycles from starting. A fresh token is minted per session, so a
/// stale task from an earlier session can never see a later session's
/// flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create an un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Safe to call any number of times.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
