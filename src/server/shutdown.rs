//! Graceful shutdown and session accounting.
//!
//! A single [`CancellationToken`] fans the stop signal out to the accept
//! loop and every session loop. Sessions register themselves here while they
//! run; the same counter enforces the advisory session limit and lets
//! [`Shutdown::stop`] wait until the last session has drained.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct Shutdown {
    token: CancellationToken,
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    active: AtomicUsize,
    drained: Notify,
}

impl Shutdown {
    pub fn new() -> Shutdown {
        Shutdown {
            token: CancellationToken::new(),
            inner: Arc::new(Inner {
                active: AtomicUsize::new(0),
                drained: Notify::new(),
            }),
        }
    }

    // A token that completes its `cancelled()` future once stop() has been
    // called. Cheap to clone into every task that needs the signal.
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Registers a session against the optional limit. Returns `None` when
    /// the limit is reached or shutdown has already begun; otherwise the
    /// returned guard keeps the session counted until it is dropped.
    pub fn try_register(&self, limit: Option<usize>) -> Option<SessionGuard> {
        if self.token.is_cancelled() {
            return None;
        }
        // The accept loop registers sessions one at a time, so a plain
        // load-then-add is enough here.
        if let Some(limit) = limit {
            if self.inner.active.load(Ordering::SeqCst) >= limit {
                return None;
            }
        }
        self.inner.active.fetch_add(1, Ordering::SeqCst);
        Some(SessionGuard {
            inner: Arc::clone(&self.inner),
        })
    }

    /// Cancels the token and waits until every registered session has
    /// dropped its guard.
    pub async fn stop(&self) {
        self.token.cancel();
        while self.inner.active.load(Ordering::SeqCst) != 0 {
            // notify_one leaves a permit behind, so a guard dropped between
            // the check above and this await still wakes us.
            self.inner.drained.notified().await;
        }
    }
}

// Keeps one session counted; dropping it is how a session deregisters.
#[derive(Debug)]
pub struct SessionGuard {
    inner: Arc<Inner>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.inner.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.drained.notify_one();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn stop_waits_for_registered_sessions() {
        let shutdown = Shutdown::new();
        let guard = shutdown.try_register(None).unwrap();

        let cancel = shutdown.cancel_token();
        let handle = tokio::spawn(async move {
            cancel.cancelled().await;
            tokio::time::sleep(Duration::from_millis(50)).await;
            drop(guard);
        });

        let started = std::time::Instant::now();
        shutdown.stop().await;
        assert!(started.elapsed() >= Duration::from_millis(50));
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn limit_is_enforced_and_released() {
        let shutdown = Shutdown::new();
        let first = shutdown.try_register(Some(1)).unwrap();
        assert!(shutdown.try_register(Some(1)).is_none());
        drop(first);
        assert!(shutdown.try_register(Some(1)).is_some());
    }

    #[tokio::test]
    async fn registration_is_refused_after_stop_begins() {
        let shutdown = Shutdown::new();
        shutdown.stop().await;
        assert!(shutdown.try_register(None).is_none());
    }
}
