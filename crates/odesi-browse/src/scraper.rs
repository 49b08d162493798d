//! Sequential scrape over a list of categories.

use std::path::Path;

use serde_json::Value;

use crate::catalog::default_categories;
use crate::config::ScraperConfig;
use crate::dataset::Dataset;
use crate::duplicates::find_duplicates;
use crate::export::{export_to_excel, ExportReport};
use crate::fetch::{fetch_or_empty, BrowseClient, CategorySource};
use crate::observe::{default_observer, ScrapeEvent, SharedObserver};
use crate::pacing::Pacer;
use crate::parse::parse_and_report;
use crate::types::{ScrapeResult, SurveyRecord};

/// Drives fetch, parse and aggregation for one scrape run.
///
/// Categories are processed strictly one after another; the pacer is awaited
/// between consecutive categories only.
pub struct OdesiScraper {
    source: Box<dyn CategorySource>,
    pacer: Box<dyn Pacer>,
    observer: SharedObserver,
}

impl OdesiScraper {
    /// Scraper backed by the HTTP browse client, logging through `tracing`.
    pub fn new(config: ScraperConfig) -> ScrapeResult<Self> {
        Self::with_observer(config, default_observer())
    }

    /// Scraper backed by the HTTP browse client with a caller-supplied observer.
    pub fn with_observer(config: ScraperConfig, observer: SharedObserver) -> ScrapeResult<Self> {
        let client = BrowseClient::new(&config)?;
        Ok(Self::from_parts(
            Box::new(client),
            Box::new(config.pacing),
            observer,
        ))
    }

    /// Assemble a scraper from its parts.
    pub fn from_parts(
        source: Box<dyn CategorySource>,
        pacer: Box<dyn Pacer>,
        observer: SharedObserver,
    ) -> Self {
        Self {
            source,
            pacer,
            observer,
        }
    }

    /// Raw response for one category, or an empty mapping if the fetch failed.
    pub async fn fetch_category(&self, category: &str) -> Value {
        fetch_or_empty(self.source.as_ref(), category, self.observer.as_ref()).await
    }

    /// Flattened records for one category response.
    pub fn parse_category(&self, category: &str, data: &Value) -> Vec<SurveyRecord> {
        parse_and_report(category, data, self.observer.as_ref())
    }

    /// Scrape every category of the built-in catalog.
    pub async fn scrape_all(&self) -> Dataset {
        self.scrape_categories(&default_categories()).await
    }

    /// Scrape `categories` in order, or the built-in catalog when `None`.
    pub async fn scrape_all_categories(&self, categories: Option<&[String]>) -> Dataset {
        match categories {
            Some(categories) => self.scrape_categories(categories).await,
            None => self.scrape_all().await,
        }
    }

    /// Scrape the given categories in order and concatenate their records.
    pub async fn scrape_categories(&self, categories: &[String]) -> Dataset {
        let total = categories.len();
        let mut dataset = Dataset::default();

        for (i, category) in categories.iter().enumerate() {
            let index = i + 1;
            self.observer.on_event(&ScrapeEvent::CategoryStarted {
                index,
                total,
                category: category.clone(),
            });

            let data = self.fetch_category(category).await;
            let records = self.parse_category(category, &data);
            dataset.extend(records);

            if index < total {
                self.pacer.pause().await;
            }
        }

        self.observer.on_event(&ScrapeEvent::ScrapeComplete {
            categories: total,
            records: dataset.len(),
        });

        dataset
    }

    /// Potential duplicates within `dataset`.
    pub fn find_duplicates(&self, dataset: &Dataset) -> Dataset {
        find_duplicates(dataset)
    }

    /// Export `dataset` with summaries to an `.xlsx` file.
    pub fn export_to_excel(&self, dataset: &Dataset, path: &Path) -> ScrapeResult<ExportReport> {
        export_to_excel(dataset, path, self.observer.as_ref())
    }
}

impl std::fmt::Debug for OdesiScraper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OdesiScraper").finish_non_exhaustive()
    }
}
