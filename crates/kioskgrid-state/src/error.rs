//! Error types for the kioskgrid record store.

use kiosk_core::{KioskId, VersionError};
use thiserror::Error;

/// Result type alias for record store operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur during record store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("kiosk not found: {0}")]
    NotFound(KioskId),

    #[error("kiosk {id} has an invalid version: {source}")]
    InvalidVersion {
        id: KioskId,
        #[source]
        source: VersionError,
    },
}
