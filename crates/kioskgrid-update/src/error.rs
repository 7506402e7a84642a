//! Update orchestrator error types.

use kiosk_core::KioskId;
use thiserror::Error;

/// Message reported for a simulated update failure.
pub const FAILURE_MESSAGE: &str = "Something went wrong";

/// Errors that can occur while updating a kiosk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    /// The kiosk is not in the store. Rejected before any state change.
    #[error("kiosk not found: {0}")]
    NotFound(KioskId),

    /// The simulated update failed. Recoverable; shown on the kiosk's row.
    #[error("{0}")]
    OperationFailed(String),

    #[error("state store error: {0}")]
    State(#[from] kioskgrid_state::StateError),

    #[error("update task aborted: {0}")]
    Join(String),
}

pub type UpdateResult<T> = Result<T, UpdateError>;
