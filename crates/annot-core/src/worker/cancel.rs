//! Cooperative cancellation flag shared between submitter and worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cooperative-cancellation flag.
///
/// Cancellation is advisory: running work polls `is_cancelled` at bounded
/// intervals and winds down on its own; nothing is ever interrupted
/// forcibly. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation at the next checkpoint.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Re-arm the token before a new task starts.
    pub(crate) fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}
