//! View models for the kiosk table.
//!
//! These are plain data structs that combine a kiosk record with its
//! selection and update state for rendering.

use std::collections::HashMap;

use kiosk_core::{KioskId, KioskRecord};
use kioskgrid_update::UpdateStatus;
use serde::Serialize;

use crate::selection::SelectionSet;

static IDLE: UpdateStatus = UpdateStatus::Idle;

/// Status icon shown in a row's action column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum RowStatus {
    /// Never updated: download icon, clicking starts an update.
    Idle,
    /// Spinner; clicks are ignored until the request settles.
    Pending,
    /// Alert icon with the error message as tooltip.
    Failed(String),
    /// Check mark after a successful update.
    Updated,
}

impl RowStatus {
    pub fn from_outcome(status: &UpdateStatus) -> Self {
        match status {
            UpdateStatus::Idle => RowStatus::Idle,
            UpdateStatus::Pending => RowStatus::Pending,
            UpdateStatus::Succeeded(_) => RowStatus::Updated,
            UpdateStatus::Failed(message) => RowStatus::Failed(message.clone()),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            RowStatus::Idle => "⤓",
            RowStatus::Pending => "…",
            RowStatus::Failed(_) => "!",
            RowStatus::Updated => "✓",
        }
    }

    pub fn tooltip(&self) -> Option<&str> {
        match self {
            RowStatus::Pending => None,
            RowStatus::Failed(message) => Some(message.as_str()),
            RowStatus::Idle | RowStatus::Updated => Some("Update"),
        }
    }

    /// Whether clicking the icon starts a new update.
    pub fn accepts_click(&self) -> bool {
        !matches!(self, RowStatus::Pending)
    }
}

/// One row of the kiosk table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KioskRow {
    pub id: KioskId,
    pub name: String,
    pub version: String,
    pub selected: bool,
    pub status: RowStatus,
}

impl KioskRow {
    pub fn from_record(record: &KioskRecord, selected: bool, status: &UpdateStatus) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            version: record.version.clone(),
            selected,
            status: RowStatus::from_outcome(status),
        }
    }
}

/// Build table rows in record order.
///
/// Kiosks missing from `outcomes` are shown as idle.
pub fn build_rows(
    records: &[KioskRecord],
    selection: &SelectionSet,
    outcomes: &HashMap<KioskId, UpdateStatus>,
) -> Vec<KioskRow> {
    records
        .iter()
        .map(|record| {
            let status = outcomes.get(&record.id).unwrap_or(&IDLE);
            KioskRow::from_record(record, selection.is_selected(record.id), status)
        })
        .collect()
}

/// The "Update selected" button is only shown while something is selected.
pub fn bulk_action_visible(selection: &SelectionSet) -> bool {
    !selection.is_empty()
}
