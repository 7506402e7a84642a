//! `kiosk simulate` — select kiosks and run a simulated bulk update.

use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use kiosk_core::KioskConfig;
use kioskgrid_state::{RecordQuery, RecordStore};
use kioskgrid_update::{RandomSource, UpdateOrchestrator, UpdateSource, wait_all};
use kioskgrid_view::{
    CheckState, KioskRow, Pagination, SelectionSet, build_rows, bulk_action_visible,
    dispatch_selected, render_table,
};
use tracing::info;

use crate::commands::load_config;
use crate::{ForcedOutcome, Format};

pub struct SimulateOptions {
    pub select: Vec<u64>,
    pub all: bool,
    pub seed: Option<u64>,
    pub force: Option<ForcedOutcome>,
    pub max_delay_ms: Option<u64>,
    pub format: Format,
}

/// Result of one simulated bulk update.
pub struct SimulationReport {
    pub rows: Vec<KioskRow>,
    pub succeeded: usize,
    pub failed: usize,
}

pub async fn simulate(config_path: &str, options: SimulateOptions) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let format = options.format;
    let report = run(&config, options).await?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report.rows)?),
        Format::Text => {
            print!("{}", render_table(&report.rows, CheckState::Unchecked));
            println!("{} updated, {} failed", report.succeeded, report.failed);
        }
    }
    Ok(())
}

/// Build the session from `config`, dispatch the selection, and wait for
/// every update to settle.
pub async fn run(
    config: &KioskConfig,
    options: SimulateOptions,
) -> anyhow::Result<SimulationReport> {
    let source = build_source(config, &options);
    let query = RecordQuery::new(RecordStore::new(config.fleet())).await;
    let orchestrator = UpdateOrchestrator::new(query.clone(), source);
    let pages = Pagination::new(config.page_size());

    let records = query.read();
    let first_page = pages.page_ids(&records, 0);
    let mut selection = SelectionSet::new();
    if options.all {
        selection.select_all(records.iter().map(|r| r.id));
    } else if options.select.is_empty() {
        selection.toggle_page(&first_page, true);
    } else {
        for id in &options.select {
            selection.select(*id);
        }
    }

    if !bulk_action_visible(&selection) {
        bail!("no kiosks selected");
    }

    if options.format == Format::Text {
        let rows = build_rows(&records, &selection, &orchestrator.outcomes().await);
        print!("{}", render_table(&rows, selection.page_state(&first_page)));
        println!();
    }

    let tickets = dispatch_selected(&orchestrator, &mut selection).await;
    info!(requests = tickets.len(), "waiting for updates to settle");

    let results = wait_all(tickets).await;
    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    let failed = results.len() - succeeded;

    let rows = build_rows(&query.read(), &selection, &orchestrator.outcomes().await);
    Ok(SimulationReport {
        rows,
        succeeded,
        failed,
    })
}

fn build_source(config: &KioskConfig, options: &SimulateOptions) -> Arc<dyn UpdateSource> {
    let max_delay = options
        .max_delay_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.max_delay());
    let success_rate = match options.force {
        Some(ForcedOutcome::Success) => 1.0,
        Some(ForcedOutcome::Failure) => 0.0,
        None => config.success_rate(),
    };

    match options.seed.or(config.seed()) {
        Some(seed) => Arc::new(RandomSource::seeded(seed, max_delay, success_rate)),
        None => Arc::new(RandomSource::new(max_delay, success_rate)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kioskgrid_view::RowStatus;

    fn options() -> SimulateOptions {
        SimulateOptions {
            select: Vec::new(),
            all: false,
            seed: Some(1),
            force: None,
            max_delay_ms: Some(0),
            format: Format::Json,
        }
    }

    #[tokio::test]
    async fn default_selection_is_first_page() {
        let report = run(
            &KioskConfig::default(),
            SimulateOptions {
                force: Some(ForcedOutcome::Success),
                ..options()
            },
        )
        .await
        .unwrap();

        assert_eq!(report.succeeded, 10);
        assert_eq!(report.failed, 0);
        assert!(report.rows[..10].iter().all(|r| r.version == "1.0.1"));
        assert!(report.rows[10..].iter().all(|r| r.status == RowStatus::Idle));
        assert!(report.rows.iter().all(|r| !r.selected));
    }

    #[tokio::test]
    async fn forced_failure_on_explicit_selection() {
        let report = run(
            &KioskConfig::default(),
            SimulateOptions {
                select: vec![3, 5],
                force: Some(ForcedOutcome::Failure),
                ..options()
            },
        )
        .await
        .unwrap();

        assert_eq!((report.succeeded, report.failed), (0, 2));
        assert!(matches!(report.rows[2].status, RowStatus::Failed(_)));
        assert_eq!(report.rows[2].version, "1.0.0");
        assert_eq!(report.rows[3].status, RowStatus::Idle);
    }

    #[tokio::test]
    async fn select_all_with_random_outcomes() {
        let report = run(
            &KioskConfig::default(),
            SimulateOptions {
                all: true,
                ..options()
            },
        )
        .await
        .unwrap();

        assert_eq!(report.succeeded + report.failed, 14);
        for row in &report.rows {
            match row.status {
                RowStatus::Updated => assert_eq!(row.version, "1.0.1"),
                RowStatus::Failed(_) => assert_eq!(row.version, "1.0.0"),
                _ => panic!("kiosk {} did not settle", row.id),
            }
        }
    }

    #[tokio::test]
    async fn unknown_ids_are_skipped() {
        let report = run(
            &KioskConfig::default(),
            SimulateOptions {
                select: vec![2, 404],
                force: Some(ForcedOutcome::Success),
                ..options()
            },
        )
        .await
        .unwrap();

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.rows[1].version, "1.0.1");
    }

    #[test]
    fn default_source_succeeds_three_times_in_four() {
        let source = build_source(&KioskConfig::default(), &options());
        let successes = (0..4000).filter(|&id| source.plan(id).succeeds).count();
        assert!((2800..3200).contains(&successes), "got {successes}");
    }

    #[tokio::test]
    async fn empty_fleet_has_nothing_to_select() {
        let config = KioskConfig {
            kiosks: Some(Vec::new()),
            ..Default::default()
        };
        assert!(run(&config, options()).await.is_err());
    }
}
