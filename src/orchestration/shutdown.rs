//! Cooperative cancellation for one listener run.
//!
//! A cloneable token pairing an atomic flag with a `Notify`, raced against
//! sleeps and in-flight service calls via `tokio::select!`. Cancellation is
//! cooperative: nothing is preempted, waiters observe the token and return
//! promptly. Teardown deliberately never consults the token so cleanup is
//! not aborted by the same signal that stopped polling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Shared cancellation signal for a single listener run.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    inner: Arc<ShutdownInner>,
}

#[derive(Debug, Default)]
struct ShutdownInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal. Idempotent; wakes every current and future waiter.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Resolves once the token has been cancelled.
    pub async fn cancelled(&self) {
        // Register interest before checking the flag so a cancel() landing
        // between the check and the await cannot be missed.
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if self.is_cancelled() {
            return;
        }

        notified.await;
    }
}
