//! `odesi-browse scrape` — run the full pipeline and export the workbook.

use serde::Serialize;

use odesi_browse::catalog::is_known_category;
use odesi_browse::observe::default_observer;
use odesi_browse::{DatasetStats, ExportReport, OdesiScraper, SharedObserver};

use crate::config::RunSettings;

/// Outcome of one `scrape` run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub stats: DatasetStats,
    /// `None` when nothing was scraped and no file was written.
    pub export: Option<ExportReport>,
}

/// Run the scrape command with the `tracing` observer.
pub async fn run(settings: &RunSettings) -> anyhow::Result<RunSummary> {
    run_with_observer(settings, default_observer()).await
}

/// Run the scrape command reporting through `observer`.
pub async fn run_with_observer(
    settings: &RunSettings,
    observer: SharedObserver,
) -> anyhow::Result<RunSummary> {
    if let Some(categories) = &settings.categories {
        for unknown in categories.iter().filter(|c| !is_known_category(c)) {
            tracing::warn!("'{unknown}' is not a built-in category; requesting it anyway");
        }
    }

    let scraper = OdesiScraper::with_observer(settings.scraper.clone(), observer)?;

    tracing::info!("Starting ODESI data scraping...");
    let dataset = scraper
        .scrape_all_categories(settings.categories.as_deref())
        .await;
    let stats = dataset.stats(settings.top);

    if dataset.is_empty() {
        tracing::warn!("No data was scraped!");
        return Ok(RunSummary {
            stats,
            export: None,
        });
    }

    let report = scraper.export_to_excel(&dataset, &settings.output)?;
    tracing::info!("Successfully scraped {} records", stats.total_records);
    tracing::info!("Categories: {}", stats.categories);
    tracing::info!("Unique series: {}", stats.unique_series);

    Ok(RunSummary {
        stats,
        export: Some(report),
    })
}

/// Human-readable summary for the terminal.
pub fn render_summary(summary: &RunSummary) -> String {
    let stats = &summary.stats;
    let mut out = String::new();

    out.push_str(&format!("Total surveys:         {}\n", stats.total_records));
    out.push_str(&format!("Total categories:      {}\n", stats.categories));
    out.push_str(&format!("Total unique series:   {}\n", stats.unique_series));

    if !stats.top_series.is_empty() {
        out.push_str(&format!(
            "\nTop {} series by survey count:\n",
            stats.top_series.len()
        ));
        for (name, count) in &stats.top_series {
            out.push_str(&format!("  {count:>6}  {name}\n"));
        }
    }

    match &summary.export {
        Some(report) => {
            out.push_str(&format!("\nWrote {}\n", report.path.display()));
            out.push_str(&format!("  Sheets: {}\n", report.sheets.join(", ")));
            out.push_str(&format!(
                "  Potential duplicates: {}\n",
                report.duplicate_records
            ));
            if report.truncated_cells > 0 {
                out.push_str(&format!(
                    "  Truncated cells: {}\n",
                    report.truncated_cells
                ));
            }
        }
        None => out.push_str("\nNo data was scraped; nothing written.\n"),
    }

    out
}
