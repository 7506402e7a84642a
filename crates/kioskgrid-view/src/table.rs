//! Plain-text rendering of the kiosk table.

use crate::selection::CheckState;
use crate::views::{KioskRow, RowStatus};

/// Render rows as an aligned text table.
///
/// `header` is the state of the select-page checkbox.
pub fn render_table(rows: &[KioskRow], header: CheckState) -> String {
    let name_width = rows
        .iter()
        .map(|r| r.name.chars().count())
        .chain(std::iter::once("Name".len()))
        .max()
        .unwrap_or(4);
    let version_width = rows
        .iter()
        .map(|r| r.version.chars().count())
        .chain(std::iter::once("version".len()))
        .max()
        .unwrap_or(7);

    let mut out = String::new();
    out.push_str(&format!(
        "{}  {:<name_width$}  {:<version_width$}  \n",
        header.glyph(),
        "Name",
        "version",
    ));
    for row in rows {
        let check = if row.selected {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        };
        out.push_str(&format!(
            "{}  {:<name_width$}  {:<version_width$}  {}\n",
            check.glyph(),
            row.name,
            row.version,
            status_cell(&row.status),
        ));
    }
    out
}

fn status_cell(status: &RowStatus) -> String {
    match status {
        RowStatus::Failed(message) => format!("{} {}", status.icon(), message),
        _ => status.icon().to_string(),
    }
}
