use kioskgrid_state::{RecordQuery, RecordStore};
use kioskgrid_view::{SelectionSet, build_rows, render_table};

use crate::Format;
use crate::commands::load_config;

pub async fn list(config_path: &str, format: Format) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let query = RecordQuery::new(RecordStore::new(config.fleet())).await;
    let records = query.read();

    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(records.as_slice())?);
        }
        Format::Text => {
            let selection = SelectionSet::new();
            let rows = build_rows(&records, &selection, &Default::default());
            let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
            print!("{}", render_table(&rows, selection.page_state(&ids)));
        }
    }

    Ok(())
}
