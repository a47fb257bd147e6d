use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// The analysis was aborted at a cooperative checkpoint.
///
/// This is never conflated with a grammar-backend failure: a cancelled
/// top-level call returns no result at all, while a failing backend merely
/// contributes zero findings for its fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("analysis cancelled")]
pub struct Cancelled;

/// Cooperative cancellation checkpoint.
///
/// Polled once per fragment, right after the grammar engine invocation, so the
/// latency of honoring a cancellation request is bounded by roughly one
/// fragment's worth of work regardless of document size.
pub trait CancelCheck: Send + Sync {
    fn poll(&self) -> Result<(), Cancelled>;
}

/// Checkpoint that never fires; the default for plain `analyze` calls.
pub struct NeverCancelled;

impl CancelCheck for NeverCancelled {
    fn poll(&self) -> Result<(), Cancelled> {
        Ok(())
    }
}

/// Shared cancellation flag. Clone it into whatever owns the analysis
/// lifetime and call `cancel()` to make every checkpoint fail from then on.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl CancelCheck for CancelFlag {
    fn poll(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}
