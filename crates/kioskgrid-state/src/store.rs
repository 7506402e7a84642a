//! RecordStore — the in-memory kiosk collection.
//!
//! Records keep their seed order. Reads hand out owned copies so callers
//! can never alias the store's state; the only mutation is a version bump
//! on a single record.

use std::sync::Arc;

use kiosk_core::{KioskId, KioskRecord, default_fleet};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{StateError, StateResult};

/// Thread-safe, cloneable handle to one session's kiosk records.
#[derive(Clone)]
pub struct RecordStore {
    records: Arc<RwLock<Vec<KioskRecord>>>,
}

impl RecordStore {
    /// Create a store holding `records` in the given order.
    pub fn new(records: Vec<KioskRecord>) -> Self {
        debug!(count = records.len(), "record store created");
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Create a store seeded with the default 14-kiosk fleet.
    pub fn seeded() -> Self {
        Self::new(default_fleet())
    }

    /// Return an independent copy of every record, in seed order.
    pub async fn fetch_all(&self) -> Vec<KioskRecord> {
        self.records.read().await.clone()
    }

    /// Get a copy of a single record.
    pub async fn get(&self, id: KioskId) -> StateResult<KioskRecord> {
        let records = self.records.read().await;
        records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StateError::NotFound(id))
    }

    pub async fn contains(&self, id: KioskId) -> bool {
        self.records.read().await.iter().any(|r| r.id == id)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Increment the patch segment of a record's version.
    ///
    /// Returns the updated record. A malformed version fails without
    /// touching the record.
    pub async fn bump_version(&self, id: KioskId) -> StateResult<KioskRecord> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StateError::NotFound(id))?;

        let previous = record.version.clone();
        record
            .bump_version()
            .map_err(|source| StateError::InvalidVersion { id, source })?;
        debug!(kiosk_id = id, from = %previous, to = %record.version, "version bumped");
        Ok(record.clone())
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_all_returns_every_seed_id() {
        let store = RecordStore::seeded();
        let records = store.fetch_all().await;

        let ids: Vec<KioskId> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=14).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn repeated_reads_are_equal() {
        let store = RecordStore::seeded();
        assert_eq!(store.fetch_all().await, store.fetch_all().await);
    }

    #[tokio::test]
    async fn fetched_copy_does_not_alias_store() {
        let store = RecordStore::seeded();
        let mut records = store.fetch_all().await;
        records[0].version = "9.9.9".to_string();
        records.clear();

        assert_eq!(store.get(1).await.unwrap().version, "1.0.0");
        assert_eq!(store.len().await, 14);
    }

    #[tokio::test]
    async fn bump_version_mutates_only_target() {
        let store = RecordStore::seeded();
        let updated = store.bump_version(3).await.unwrap();

        assert_eq!(updated.version, "1.0.1");
        assert_eq!(store.get(3).await.unwrap().version, "1.0.1");
        assert_eq!(store.get(2).await.unwrap().version, "1.0.0");
        assert_eq!(store.get(4).await.unwrap().version, "1.0.0");
    }

    #[tokio::test]
    async fn bump_version_unknown_id() {
        let store = RecordStore::seeded();
        assert_eq!(store.bump_version(99).await, Err(StateError::NotFound(99)));
        assert!(!store.contains(99).await);
    }

    #[tokio::test]
    async fn bump_version_malformed_fails_fast() {
        let store = RecordStore::new(vec![KioskRecord::new(1, "Kiosk 1", "1.0")]);
        let result = store.bump_version(1).await;

        assert!(matches!(result, Err(StateError::InvalidVersion { id: 1, .. })));
        assert_eq!(store.get(1).await.unwrap().version, "1.0");
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = RecordStore::seeded();
        let other = store.clone();
        store.bump_version(1).await.unwrap();
        assert_eq!(other.get(1).await.unwrap().version, "1.0.1");
    }

    #[tokio::test]
    async fn empty_store() {
        let store = RecordStore::new(Vec::new());
        assert!(store.is_empty().await);
        assert!(store.fetch_all().await.is_empty());
    }
}
