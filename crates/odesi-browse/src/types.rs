//! Core data types for flattened survey records and scrape errors.

use serde::{Deserialize, Serialize};

/// Column headers for record sheets, in export order.
pub const RECORD_COLUMNS: [&str; 5] = ["Category", "Series_Name", "Year", "Survey_Title", "URI"];

/// Default label for a series or year the upstream did not name.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One flattened survey instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurveyRecord {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Series_Name")]
    pub series_name: String,
    /// Opaque label, not guaranteed numeric.
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Survey_Title")]
    pub survey_title: String,
    #[serde(rename = "URI")]
    pub uri: String,
}

impl SurveyRecord {
    /// Cell values in [`RECORD_COLUMNS`] order.
    pub fn columns(&self) -> [&str; 5] {
        [
            self.category.as_str(),
            self.series_name.as_str(),
            self.year.as_str(),
            self.survey_title.as_str(),
            self.uri.as_str(),
        ]
    }
}

/// Errors that can occur while scraping or exporting.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience result type.
pub type ScrapeResult<T> = Result<T, ScrapeError>;
