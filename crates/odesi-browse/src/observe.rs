//! Scrape events and the observer capability each component reports through.
//!
//! Components never log through a process-wide logger. They receive a
//! [`ScrapeObserver`] and emit [`ScrapeEvent`]s to it; [`TracingObserver`]
//! forwards those to `tracing`, [`RecordingObserver`] keeps them for
//! assertions, and [`NullObserver`] drops them.

use std::sync::{Arc, Mutex};

use serde::Serialize;

/// Every event the pipeline emits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ScrapeEvent {
    /// A category is about to be fetched (`index` is 1-based).
    CategoryStarted {
        index: usize,
        total: usize,
        category: String,
    },
    /// The HTTP request for a category failed; it is treated as empty.
    FetchFailed { category: String, error: String },
    /// The response carried no `content` for the category.
    NoData { category: String },
    /// The response did not have the expected nesting.
    MalformedShape { category: String, reason: String },
    /// Records were flattened out of a category response.
    CategoryParsed { category: String, records: usize },
    /// All requested categories have been processed.
    ScrapeComplete { categories: usize, records: usize },
    /// The exporter is about to write a workbook.
    ExportStarted { path: String },
    /// Duplicate records were found while exporting.
    DuplicatesFound { records: usize },
    /// Text cells longer than Excel allows were cut to `limit` characters.
    CellsTruncated { cells: usize, limit: usize },
    /// The workbook was written.
    ExportComplete { path: String, sheets: usize },
}

/// Receives pipeline events.
pub trait ScrapeObserver: Send + Sync {
    fn on_event(&self, event: &ScrapeEvent);
}

/// Shared handle passed to each component.
pub type SharedObserver = Arc<dyn ScrapeObserver>;

/// Forwards events to `tracing` at a level matching their severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ScrapeObserver for TracingObserver {
    fn on_event(&self, event: &ScrapeEvent) {
        match event {
            ScrapeEvent::CategoryStarted {
                index,
                total,
                category,
            } => {
                tracing::info!("Processing category {index}/{total}: {category}");
            }
            ScrapeEvent::FetchFailed { category, error } => {
                tracing::error!("Error fetching {category}: {error}");
            }
            ScrapeEvent::NoData { category } => {
                tracing::warn!("No data found for category: {category}");
            }
            ScrapeEvent::MalformedShape { category, reason } => {
                tracing::warn!("No datasets found for category: {category} ({reason})");
            }
            ScrapeEvent::CategoryParsed { category, records } => {
                tracing::info!("Parsed {records} records from {category}");
            }
            ScrapeEvent::ScrapeComplete {
                categories,
                records,
            } => {
                tracing::info!("Total records scraped: {records} across {categories} categories");
            }
            ScrapeEvent::ExportStarted { path } => {
                tracing::info!("Exporting data to {path}");
            }
            ScrapeEvent::DuplicatesFound { records } => {
                tracing::info!("Found {records} potential duplicate records");
            }
            ScrapeEvent::CellsTruncated { cells, limit } => {
                tracing::warn!("Truncated {cells} cells to {limit} characters");
            }
            ScrapeEvent::ExportComplete { path, sheets } => {
                tracing::info!("Export complete: {path} ({sheets} sheets)");
            }
        }
    }
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ScrapeObserver for NullObserver {
    fn on_event(&self, _event: &ScrapeEvent) {}
}

/// Keeps every event in arrival order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ScrapeEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<ScrapeEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Number of events for which `pred` holds.
    pub fn count(&self, pred: impl Fn(&ScrapeEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl ScrapeObserver for RecordingObserver {
    fn on_event(&self, event: &ScrapeEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// The observer used when a caller does not supply one.
pub fn default_observer() -> SharedObserver {
    Arc::new(TracingObserver)
}
