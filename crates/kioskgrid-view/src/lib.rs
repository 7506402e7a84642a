//! kioskgrid-view — the kiosk admin table without a UI toolkit.
//!
//! Combines the cached kiosk list, the row selection, and the latest update
//! outcomes into rows ready for display, and dispatches bulk updates for
//! the selected rows.
//!
//! # Components
//!
//! - **`selection`** — Selected kiosk ids, per row, per page, or all rows
//! - **`views`** — Row view models and their status icons
//! - **`table`** — Plain-text rendering of the rows

pub mod selection;
pub mod table;
pub mod views;

use kiosk_core::KioskId;
use kioskgrid_update::{UpdateOrchestrator, UpdateTicket};
use tracing::info;

pub use selection::{CheckState, Pagination, SelectionSet};
pub use table::render_table;
pub use views::{KioskRow, RowStatus, build_rows, bulk_action_visible};

/// "Update selected": submit one update per selected kiosk.
///
/// The selection is cleared before any request settles.
pub async fn dispatch_selected(
    orchestrator: &UpdateOrchestrator,
    selection: &mut SelectionSet,
) -> Vec<UpdateTicket> {
    let ids: Vec<KioskId> = selection.take();
    info!(selected = ids.len(), "dispatching update for selection");
    orchestrator.submit_many(ids).await
}
