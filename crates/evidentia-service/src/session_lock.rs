//! Per-session append serialization.

use evidentia_types::SessionId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// A map of per-session async locks guarding the read-then-append sequence.
///
/// Two `chain` calls racing on the same session would otherwise both read
/// the same latest entry and claim the same sequence number. One lock per
/// session keeps unrelated sessions fully concurrent.
#[derive(Default)]
pub struct SessionLocks {
    inner: Mutex<HashMap<SessionId, Arc<AsyncMutex<()>>>>,
}

impl SessionLocks {
    /// Create an empty lock map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one session, waiting if another append to the
    /// same session is in flight.
    ///
    /// Idle entries are pruned on each acquisition: a guard keeps its `Arc`
    /// alive, so a strong count of 1 means no holder and no waiter, and the
    /// map stays bounded by the number of sessions appending concurrently.
    pub async fn acquire(&self, session_id: &SessionId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock();
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(
                map.entry(session_id.clone())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.inner.lock().len()
    }
}
