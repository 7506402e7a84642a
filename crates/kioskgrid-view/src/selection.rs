//! Row selection for the kiosk table.

use std::collections::BTreeSet;

use kiosk_core::{KioskId, KioskRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// State of the select-page checkbox in the table header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    Unchecked,
    Indeterminate,
    Checked,
}

impl CheckState {
    pub fn glyph(&self) -> &'static str {
        match self {
            CheckState::Unchecked => "[ ]",
            CheckState::Indeterminate => "[-]",
            CheckState::Checked => "[x]",
        }
    }
}

/// Set of kiosk ids currently selected in the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<KioskId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one row's selection. Returns the new state.
    pub fn toggle(&mut self, id: KioskId) -> bool {
        let selected = if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        };
        debug!(kiosk_id = id, selected, "row selection toggled");
        selected
    }

    pub fn select(&mut self, id: KioskId) {
        self.ids.insert(id);
    }

    pub fn deselect(&mut self, id: KioskId) {
        self.ids.remove(&id);
    }

    pub fn is_selected(&self, id: KioskId) -> bool {
        self.ids.contains(&id)
    }

    /// Select or deselect every row on a page (the header checkbox).
    pub fn toggle_page(&mut self, page_ids: &[KioskId], selected: bool) {
        for id in page_ids {
            if selected {
                self.ids.insert(*id);
            } else {
                self.ids.remove(id);
            }
        }
        debug!(rows = page_ids.len(), selected, "page selection set");
    }

    /// Header checkbox state for a page.
    ///
    /// An empty page reads as unchecked.
    pub fn page_state(&self, page_ids: &[KioskId]) -> CheckState {
        let selected = page_ids.iter().filter(|id| self.ids.contains(*id)).count();
        if selected == 0 {
            CheckState::Unchecked
        } else if selected == page_ids.len() {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }

    pub fn select_all(&mut self, ids: impl IntoIterator<Item = KioskId>) {
        self.ids.extend(ids);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Remove and return every selected id, in ascending order.
    pub fn take(&mut self) -> Vec<KioskId> {
        std::mem::take(&mut self.ids).into_iter().collect()
    }

    pub fn ids(&self) -> Vec<KioskId> {
        self.ids.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Splits the kiosk list into fixed-size pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_size: usize,
}

impl Pagination {
    /// A zero page size is treated as one row per page.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Records on page `index` (zero-based); empty past the last page.
    pub fn page<'a>(&self, records: &'a [KioskRecord], index: usize) -> &'a [KioskRecord] {
        let start = index.saturating_mul(self.page_size).min(records.len());
        let end = start.saturating_add(self.page_size).min(records.len());
        &records[start..end]
    }

    /// Ids on page `index`.
    pub fn page_ids(&self, records: &[KioskRecord], index: usize) -> Vec<KioskId> {
        self.page(records, index).iter().map(|r| r.id).collect()
    }
}
