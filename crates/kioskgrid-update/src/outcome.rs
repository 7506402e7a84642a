//! Outcome tracker — the latest update outcome for each kiosk.
//!
//! Every request gets a sequence number when it is submitted. A kiosk's
//! displayed outcome always belongs to its most recently submitted request:
//! when an older request settles after a newer one was submitted, its
//! result is reported on the event feed but does not replace what the
//! kiosk's row shows.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use kiosk_core::{KioskId, KioskRecord};
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use tracing::debug;

/// Capacity of the outcome event feed before slow subscribers lag.
const EVENT_CAPACITY: usize = 256;

/// Update state of a kiosk as the view sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum UpdateStatus {
    /// No update has been requested for this kiosk.
    Idle,
    /// The latest request is still running.
    Pending,
    /// The latest request succeeded; carries the updated record.
    Succeeded(KioskRecord),
    /// The latest request failed; carries the error message.
    Failed(String),
}

impl UpdateStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, UpdateStatus::Pending)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, UpdateStatus::Succeeded(_) | UpdateStatus::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            UpdateStatus::Idle => "idle",
            UpdateStatus::Pending => "pending",
            UpdateStatus::Succeeded(_) => "succeeded",
            UpdateStatus::Failed(_) => "failed",
        }
    }
}

/// One state transition of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeEvent {
    pub id: KioskId,
    /// Submission sequence number of the request.
    pub seq: u64,
    pub status: UpdateStatus,
    /// False when a newer request for the same kiosk already superseded this one.
    pub latest: bool,
}

/// Latest outcome of one kiosk.
#[derive(Debug, Clone)]
struct Tracked {
    seq: u64,
    status: UpdateStatus,
}

/// Cloneable handle to the per-kiosk outcome map.
#[derive(Clone)]
pub struct OutcomeTracker {
    latest: Arc<RwLock<HashMap<KioskId, Tracked>>>,
    next_seq: Arc<AtomicU64>,
    events: broadcast::Sender<OutcomeEvent>,
}

impl OutcomeTracker {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            latest: Arc::new(RwLock::new(HashMap::new())),
            next_seq: Arc::new(AtomicU64::new(1)),
            events,
        }
    }

    /// Register a new request for `id` and mark the kiosk pending.
    ///
    /// Returns the request's sequence number. Any earlier outcome for the
    /// kiosk, terminal or not, stops being displayed.
    pub async fn begin(&self, id: KioskId) -> u64 {
        let seq = {
            let mut latest = self.latest.write().await;
            self.mark_pending(&mut latest, id)
        };
        self.announce(id, seq);
        seq
    }

    /// Like [`begin`](Self::begin), but returns `None` without recording
    /// anything when the kiosk's latest request is still pending.
    ///
    /// The check and the insert happen under one write lock, so concurrent
    /// callers for the same kiosk start at most one request.
    pub async fn begin_unless_pending(&self, id: KioskId) -> Option<u64> {
        let seq = {
            let mut latest = self.latest.write().await;
            if latest.get(&id).is_some_and(|t| t.status.is_pending()) {
                return None;
            }
            self.mark_pending(&mut latest, id)
        };
        self.announce(id, seq);
        Some(seq)
    }

    fn mark_pending(&self, latest: &mut HashMap<KioskId, Tracked>, id: KioskId) -> u64 {
        let seq = self.next_seq.fetch_add(1, Ordering::AcqRel);
        latest.insert(
            id,
            Tracked {
                seq,
                status: UpdateStatus::Pending,
            },
        );
        seq
    }

    fn announce(&self, id: KioskId, seq: u64) {
        debug!(kiosk_id = id, seq, "update pending");
        self.emit(id, seq, UpdateStatus::Pending, true);
    }

    /// Record the terminal outcome of request `seq` for `id`.
    ///
    /// Returns true when the outcome became the displayed one, false when a
    /// newer request for the kiosk had already been submitted.
    pub async fn settle(&self, id: KioskId, seq: u64, status: UpdateStatus) -> bool {
        let displayed = {
            let mut latest = self.latest.write().await;
            match latest.get_mut(&id) {
                Some(tracked) if tracked.seq == seq => {
                    tracked.status = status.clone();
                    true
                }
                _ => false,
            }
        };
        debug!(
            kiosk_id = id,
            seq,
            status = status.label(),
            displayed,
            "update settled"
        );
        self.emit(id, seq, status, displayed);
        displayed
    }

    /// Displayed outcome for a kiosk; `Idle` if it was never updated.
    pub async fn status(&self, id: KioskId) -> UpdateStatus {
        self.latest
            .read()
            .await
            .get(&id)
            .map(|t| t.status.clone())
            .unwrap_or(UpdateStatus::Idle)
    }

    /// Displayed outcome of every kiosk that has had a request.
    pub async fn snapshot(&self) -> HashMap<KioskId, UpdateStatus> {
        self.latest
            .read()
            .await
            .iter()
            .map(|(id, t)| (*id, t.status.clone()))
            .collect()
    }

    /// Number of kiosks whose latest request is still running.
    pub async fn pending_count(&self) -> usize {
        self.latest
            .read()
            .await
            .values()
            .filter(|t| t.status.is_pending())
            .count()
    }

    /// Subscribe to every request transition.
    pub fn subscribe(&self) -> broadcast::Receiver<OutcomeEvent> {
        self.events.subscribe()
    }

    fn emit(&self, id: KioskId, seq: u64, status: UpdateStatus, latest: bool) {
        // No subscribers is fine.
        let _ = self.events.send(OutcomeEvent {
            id,
            seq,
            status,
            latest,
        });
    }
}

impl Default for OutcomeTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_kiosk_is_idle() {
        let tracker = OutcomeTracker::new();
        assert_eq!(tracker.status(1).await, UpdateStatus::Idle);
        assert!(tracker.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn begin_then_settle() {
        let tracker = OutcomeTracker::new();
        let seq = tracker.begin(3).await;
        assert_eq!(tracker.status(3).await, UpdateStatus::Pending);
        assert_eq!(tracker.pending_count().await, 1);

        assert!(tracker.settle(3, seq, UpdateStatus::Failed("boom".into())).await);
        assert_eq!(tracker.status(3).await, UpdateStatus::Failed("boom".into()));
        assert_eq!(tracker.pending_count().await, 0);
    }

    #[tokio::test]
    async fn outcomes_are_scoped_per_kiosk() {
        let tracker = OutcomeTracker::new();
        let a = tracker.begin(1).await;
        let b = tracker.begin(2).await;

        tracker.settle(1, a, UpdateStatus::Failed("boom".into())).await;
        assert_eq!(tracker.status(2).await, UpdateStatus::Pending);

        let record = KioskRecord::new(2, "Kiosk 2", "1.0.1");
        tracker.settle(2, b, UpdateStatus::Succeeded(record.clone())).await;
        assert_eq!(tracker.status(1).await, UpdateStatus::Failed("boom".into()));
        assert_eq!(tracker.status(2).await, UpdateStatus::Succeeded(record));
    }

    #[tokio::test]
    async fn new_request_supersedes_terminal_outcome() {
        let tracker = OutcomeTracker::new();
        let first = tracker.begin(5).await;
        tracker.settle(5, first, UpdateStatus::Failed("boom".into())).await;

        tracker.begin(5).await;
        assert_eq!(tracker.status(5).await, UpdateStatus::Pending);
    }

    #[tokio::test]
    async fn stale_settle_does_not_replace_latest() {
        let tracker = OutcomeTracker::new();
        let first = tracker.begin(5).await;
        let second = tracker.begin(5).await;
        assert!(second > first);

        let record = KioskRecord::new(5, "Kiosk 5", "1.0.1");
        assert!(tracker.settle(5, second, UpdateStatus::Succeeded(record.clone())).await);
        assert!(!tracker.settle(5, first, UpdateStatus::Failed("late".into())).await);

        assert_eq!(tracker.status(5).await, UpdateStatus::Succeeded(record));
    }

    #[tokio::test]
    async fn begin_unless_pending_skips_running_request() {
        let tracker = OutcomeTracker::new();
        let mut rx = tracker.subscribe();

        let first = tracker.begin_unless_pending(4).await.unwrap();
        assert_eq!(tracker.begin_unless_pending(4).await, None);
        assert_eq!(rx.recv().await.unwrap().seq, first);
        assert!(rx.try_recv().is_err());

        tracker.settle(4, first, UpdateStatus::Failed("boom".into())).await;
        let second = tracker.begin_unless_pending(4).await.unwrap();
        assert!(second > first);
        assert_eq!(tracker.status(4).await, UpdateStatus::Pending);
    }

    #[tokio::test]
    async fn concurrent_begin_unless_pending_starts_one_request() {
        let tracker = OutcomeTracker::new();
        let (a, b) = tokio::join!(
            tracker.begin_unless_pending(9),
            tracker.begin_unless_pending(9)
        );
        assert_eq!(a.is_some() as u8 + b.is_some() as u8, 1);
        assert_eq!(tracker.pending_count().await, 1);
    }

    #[tokio::test]
    async fn events_report_every_transition() {
        let tracker = OutcomeTracker::new();
        let mut rx = tracker.subscribe();

        let seq = tracker.begin(7).await;
        tracker.settle(7, seq, UpdateStatus::Failed("boom".into())).await;

        let pending = rx.recv().await.unwrap();
        assert_eq!(pending.status, UpdateStatus::Pending);
        assert_eq!((pending.id, pending.seq, pending.latest), (7, seq, true));

        let settled = rx.recv().await.unwrap();
        assert_eq!(settled.status, UpdateStatus::Failed("boom".into()));
    }

    #[test]
    fn status_serializes_tagged() {
        let json = serde_json::to_string(&UpdateStatus::Failed("boom".into())).unwrap();
        assert_eq!(json, r#"{"status":"failed","detail":"boom"}"#);
        let idle = serde_json::to_string(&UpdateStatus::Idle).unwrap();
        assert_eq!(idle, r#"{"status":"idle"}"#);
    }
}
