//! ODESI browse scraper — fetch survey catalogs by category, flatten them into
//! records, flag potential duplicates and export everything to `.xlsx`.

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod duplicates;
pub mod export;
pub mod fetch;
pub mod observe;
pub mod pacing;
pub mod parse;
pub mod scraper;
pub mod types;

pub use catalog::{default_categories, CATEGORIES};
pub use config::ScraperConfig;
pub use dataset::{CategorySummary, Dataset, DatasetStats, SeriesSummary};
pub use duplicates::{find_duplicates, normalize_title};
pub use export::{export_to_excel, plan_workbook, ExportReport, WorkbookPlan};
pub use fetch::{BrowseClient, CategorySource};
pub use observe::{
    NullObserver, RecordingObserver, ScrapeEvent, ScrapeObserver, SharedObserver, TracingObserver,
};
pub use pacing::{Pacer, PacingPolicy};
pub use parse::{parse_category, ParseOutcome};
pub use scraper::OdesiScraper;
pub use types::*;
