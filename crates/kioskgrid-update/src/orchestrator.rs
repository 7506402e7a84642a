//! Update orchestrator — drives simulated kiosk updates.
//!
//! A request moves a kiosk through `Idle -> Pending -> {Succeeded | Failed}`:
//!
//! 1. The kiosk must exist, else `NotFound` (nothing recorded).
//! 2. The kiosk is marked pending, the request's plan is drawn and the
//!    request is spawned on its own task.
//! 3. After the planned delay the update either bumps the kiosk's version
//!    or fails with `OperationFailed`.
//! 4. The outcome is recorded and the record query is invalidated, once,
//!    whatever the outcome.
//!
//! Requests are never cancelled. Two requests for the same kiosk both run:
//! the record ends up as written by whichever completes last, while the
//! row shows the outcome of whichever was submitted last.

use std::collections::HashMap;
use std::sync::Arc;

use kiosk_core::{KioskId, KioskRecord};
use kioskgrid_state::{RecordQuery, RecordStore};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{FAILURE_MESSAGE, UpdateError, UpdateResult};
use crate::outcome::{OutcomeEvent, OutcomeTracker, UpdateStatus};
use crate::source::{UpdatePlan, UpdateSource};

/// A submitted request running in the background.
#[derive(Debug)]
pub struct UpdateTicket {
    pub id: KioskId,
    pub seq: u64,
    handle: JoinHandle<UpdateResult<KioskRecord>>,
}

impl UpdateTicket {
    /// Wait for the request to settle.
    pub async fn wait(self) -> UpdateResult<KioskRecord> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(UpdateError::Join(e.to_string())),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Wait for every ticket, returning results in ticket order.
pub async fn wait_all(tickets: Vec<UpdateTicket>) -> Vec<UpdateResult<KioskRecord>> {
    let mut results = Vec::with_capacity(tickets.len());
    for ticket in tickets {
        results.push(ticket.wait().await);
    }
    results
}

/// Cloneable handle that submits and tracks kiosk updates.
#[derive(Clone)]
pub struct UpdateOrchestrator {
    store: RecordStore,
    query: RecordQuery,
    source: Arc<dyn UpdateSource>,
    tracker: OutcomeTracker,
}

impl UpdateOrchestrator {
    /// Create an orchestrator over `query`'s store.
    pub fn new(query: RecordQuery, source: Arc<dyn UpdateSource>) -> Self {
        Self {
            store: query.store().clone(),
            query,
            source,
            tracker: OutcomeTracker::new(),
        }
    }

    pub fn query(&self) -> &RecordQuery {
        &self.query
    }

    pub fn tracker(&self) -> &OutcomeTracker {
        &self.tracker
    }

    /// Run one update and wait for it to settle.
    ///
    /// The request runs on its own task: dropping the returned future stops
    /// the wait, not the update.
    pub async fn update(&self, id: KioskId) -> UpdateResult<KioskRecord> {
        self.submit(id).await?.wait().await
    }

    /// Start one update in the background.
    ///
    /// The kiosk is already pending when this returns.
    pub async fn submit(&self, id: KioskId) -> UpdateResult<UpdateTicket> {
        self.ensure_known(id).await?;
        let seq = self.tracker.begin(id).await;
        Ok(self.spawn(id, seq))
    }

    /// Start an update unless the kiosk's latest request is still pending.
    pub async fn submit_unless_pending(&self, id: KioskId) -> UpdateResult<Option<UpdateTicket>> {
        self.ensure_known(id).await?;
        match self.tracker.begin_unless_pending(id).await {
            Some(seq) => Ok(Some(self.spawn(id, seq))),
            None => {
                debug!(kiosk_id = id, "update already pending, ignoring");
                Ok(None)
            }
        }
    }

    /// Start one independent update per id.
    ///
    /// Ids missing from the store are skipped with a warning; the rest run
    /// concurrently with no ordering between their completions.
    pub async fn submit_many(&self, ids: impl IntoIterator<Item = KioskId>) -> Vec<UpdateTicket> {
        let mut tickets = Vec::new();
        for id in ids {
            match self.submit(id).await {
                Ok(ticket) => tickets.push(ticket),
                Err(e) => warn!(kiosk_id = id, error = %e, "skipping bulk update"),
            }
        }
        info!(requests = tickets.len(), "bulk update dispatched");
        tickets
    }

    /// Displayed outcome of one kiosk.
    pub async fn outcome(&self, id: KioskId) -> UpdateStatus {
        self.tracker.status(id).await
    }

    /// Displayed outcome of every kiosk that has had a request.
    pub async fn outcomes(&self) -> HashMap<KioskId, UpdateStatus> {
        self.tracker.snapshot().await
    }

    /// Subscribe to every request transition.
    pub fn subscribe(&self) -> broadcast::Receiver<OutcomeEvent> {
        self.tracker.subscribe()
    }

    async fn ensure_known(&self, id: KioskId) -> UpdateResult<()> {
        if !self.store.contains(id).await {
            return Err(UpdateError::NotFound(id));
        }
        Ok(())
    }

    fn spawn(&self, id: KioskId, seq: u64) -> UpdateTicket {
        let plan = self.source.plan(id);
        info!(
            kiosk_id = id,
            seq,
            delay_ms = plan.delay.as_millis() as u64,
            "update submitted"
        );
        let this = self.clone();
        let handle = tokio::spawn(async move { this.run(id, seq, plan).await });
        UpdateTicket { id, seq, handle }
    }

    async fn run(&self, id: KioskId, seq: u64, plan: UpdatePlan) -> UpdateResult<KioskRecord> {
        tokio::time::sleep(plan.delay).await;

        let result = if plan.succeeds {
            self.store.bump_version(id).await.map_err(UpdateError::from)
        } else {
            Err(UpdateError::OperationFailed(FAILURE_MESSAGE.to_string()))
        };

        let status = match &result {
            Ok(record) => {
                info!(kiosk_id = id, seq, version = %record.version, "update succeeded");
                UpdateStatus::Succeeded(record.clone())
            }
            Err(e) => {
                warn!(kiosk_id = id, seq, error = %e, "update failed");
                UpdateStatus::Failed(e.to_string())
            }
        };

        self.tracker.settle(id, seq, status).await;
        self.query.invalidate().await;
        result
    }
}
