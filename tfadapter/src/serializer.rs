//! Process-wide serialization of remote mutations
//!
//! At most one mutating remote call is in flight at any time, across every
//! entity kind and every concurrent lifecycle call. The backend offers no
//! conflict boundaries to lock on, so the lock is a single global one.

use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tokio::sync::Mutex;

/// Mutual-exclusion wrapper around remote calls
pub struct MutationSerializer {
    lock: Option<Mutex<()>>,
}

impl MutationSerializer {
    /// An isolated serializer, independent of the process-wide one
    pub fn new() -> Self {
        Self {
            lock: Some(Mutex::new(())),
        }
    }

    /// A serializer that runs operations without locking
    pub fn passthrough() -> Self {
        Self { lock: None }
    }

    /// The process-wide serializer shared by every coordinator
    pub fn global() -> Arc<MutationSerializer> {
        static GLOBAL: OnceLock<Arc<MutationSerializer>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(MutationSerializer::new()))
            .clone()
    }

    pub fn is_exclusive(&self) -> bool {
        self.lock.is_some()
    }

    /// Run `op` while holding the lock and return its output unchanged
    ///
    /// The guard lives for the duration of the future, so it is released
    /// when `op` completes, fails or unwinds.
    pub async fn run<F, Fut, T>(&self, op: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let Some(lock) = &self.lock else {
            return op().await;
        };

        let waiting = Instant::now();
        let _guard = lock.lock().await;
        tracing::trace!(
            "Acquired mutation lock after {}ms",
            waiting.elapsed().as_millis()
        );

        op().await
    }
}

impl Default for MutationSerializer {
    fn default() -> Self {
        Self::new()
    }
}
