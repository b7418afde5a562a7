//! Per-repository mutual exclusion.
//!
//! Repository mutations are sequences of plumbing calls (stage, commit,
//! checkout) with no transaction around them; concurrent requests against
//! the same repository must not interleave. Locks are keyed by repository
//! identity and held across the whole unit of work.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of per-repository locks, keyed by user id or [`super::MASTER_LOCK_KEY`].
#[derive(Default)]
pub struct RepoLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl RepoLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `key`, waiting if another request holds it.
    /// The guard is owned so it can be held across `spawn_blocking`.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(key.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_key_serializes() {
        let locks = RepoLocks::new();
        let guard = locks.acquire("alice").await;
        // A second acquire on the same key must not be immediately ready.
        let pending = locks.acquire("alice");
        tokio::pin!(pending);
        assert!(not_ready(&mut pending).await);
        drop(guard);
        let _ = pending.await;
    }

    #[tokio::test]
    async fn different_keys_are_independent() {
        let locks = RepoLocks::new();
        let _a = locks.acquire("alice").await;
        let _b = locks.acquire("bob").await;
    }

    async fn not_ready<F: std::future::Future + Unpin>(fut: &mut F) -> bool {
        tokio::select! {
            _ = fut => false,
            _ = tokio::task::yield_now() => true,
        }
    }
}
