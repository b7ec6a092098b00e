//! Cooperative cancellation for long-running passes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Returned by a pass that observed its token being cancelled.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("analysis was cancelled")]
pub struct Cancelled;

/// Shared flag checked between node visits.
///
/// Clones observe the same flag. Cancellation is sticky.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` once [`cancel`](Self::cancel) has been called on any clone.
    #[inline]
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
