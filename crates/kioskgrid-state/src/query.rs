//! RecordQuery — cached read side of the record store.
//!
//! The view reads the kiosk list through this query instead of hitting the
//! store directly. `invalidate()` re-runs the fetch and pushes the fresh
//! snapshot to every subscriber through a `watch` channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use kiosk_core::KioskRecord;
use tokio::sync::watch;
use tracing::debug;

use crate::store::RecordStore;

/// Snapshot of the kiosk list shared between the cache and its observers.
pub type RecordSnapshot = Arc<Vec<KioskRecord>>;

/// Cloneable handle to the cached kiosk list.
#[derive(Clone)]
pub struct RecordQuery {
    inner: Arc<QueryInner>,
}

struct QueryInner {
    store: RecordStore,
    /// Latest snapshot; receivers are handed out by `subscribe`.
    snapshot: watch::Sender<RecordSnapshot>,
    /// Number of `invalidate` calls so far.
    invalidations: AtomicU64,
}

impl RecordQuery {
    /// Create the query and perform the initial fetch.
    pub async fn new(store: RecordStore) -> Self {
        let initial = Arc::new(store.fetch_all().await);
        let (snapshot, _) = watch::channel(initial);
        Self {
            inner: Arc::new(QueryInner {
                store,
                snapshot,
                invalidations: AtomicU64::new(0),
            }),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.inner.store
    }

    /// Return the cached snapshot.
    pub fn read(&self) -> RecordSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Drop the cached snapshot: re-run the fetch and refresh every observer.
    pub async fn invalidate(&self) {
        let count = self.inner.invalidations.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(invalidations = count, "record query invalidated");
        self.refetch().await;
    }

    /// Observe the kiosk list; the receiver is notified after each refresh.
    pub fn subscribe(&self) -> watch::Receiver<RecordSnapshot> {
        self.inner.snapshot.subscribe()
    }

    pub fn invalidation_count(&self) -> u64 {
        self.inner.invalidations.load(Ordering::Acquire)
    }

    async fn refetch(&self) {
        let fresh = Arc::new(self.inner.store.fetch_all().await);
        debug!(count = fresh.len(), "record query refreshed");
        self.inner.snapshot.send_replace(fresh);
    }
}
