//! Shared types used across kioskgrid crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identifier of a kiosk device.
pub type KioskId = u64;

/// Number of kiosks in the default fleet.
pub const DEFAULT_FLEET_SIZE: u64 = 14;

/// Version every kiosk in the default fleet starts at.
pub const INITIAL_VERSION: &str = "1.0.0";

/// A kiosk device entry as shown in the admin table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KioskRecord {
    pub id: KioskId,
    pub name: String,
    pub version: String,
}

impl KioskRecord {
    pub fn new(id: KioskId, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            version: version.into(),
        }
    }

    /// Increment the patch segment of this record's version in place.
    ///
    /// On error the record is left untouched.
    pub fn bump_version(&mut self) -> Result<(), VersionError> {
        self.version = bump_patch(&self.version)?;
        Ok(())
    }
}

/// Errors raised when a version string cannot be bumped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("version {0:?} has fewer than three dot-separated segments")]
    TooFewSegments(String),

    #[error("version {version:?} has non-numeric patch segment {segment:?}")]
    NonNumericPatch { version: String, segment: String },

    #[error("version {0:?} patch segment overflows")]
    Overflow(String),
}

/// Increment the integer in the third dot-separated segment of `version`.
///
/// Other segments are preserved verbatim: `1.0.3` becomes `1.0.4`,
/// `2.7.9.beta` becomes `2.7.10.beta`.
pub fn bump_patch(version: &str) -> Result<String, VersionError> {
    let mut segments: Vec<&str> = version.split('.').collect();
    if segments.len() < 3 {
        return Err(VersionError::TooFewSegments(version.to_string()));
    }

    let patch: u64 = segments[2]
        .parse()
        .map_err(|_| VersionError::NonNumericPatch {
            version: version.to_string(),
            segment: segments[2].to_string(),
        })?;
    let next = patch
        .checked_add(1)
        .ok_or_else(|| VersionError::Overflow(version.to_string()))?
        .to_string();

    segments[2] = &next;
    Ok(segments.join("."))
}

/// The fleet every fresh store starts with: `Kiosk 1` .. `Kiosk 14` at `1.0.0`.
pub fn default_fleet() -> Vec<KioskRecord> {
    (1..=DEFAULT_FLEET_SIZE)
        .map(|id| KioskRecord::new(id, format!("Kiosk {id}"), INITIAL_VERSION))
        .collect()
}
