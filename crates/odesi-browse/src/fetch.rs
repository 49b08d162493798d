//! Fetching raw category listings from the browse API.
//!
//! One GET per category, no retries. Any failure (transport, timeout,
//! non-success status, undecodable body) is reported to the observer and
//! collapsed to an empty JSON mapping by [`fetch_or_empty`].

use async_trait::async_trait;
use serde_json::{Map, Value};
use url::Url;

use crate::config::ScraperConfig;
use crate::observe::{ScrapeEvent, ScrapeObserver};
use crate::types::ScrapeResult;

/// Anything that can produce the raw browse response for a category.
#[async_trait]
pub trait CategorySource: Send + Sync {
    async fn try_fetch(&self, category: &str) -> ScrapeResult<Value>;
}

/// HTTP client for the browse endpoint.
///
/// Holds a single `reqwest::Client` whose user agent and timeout are fixed
/// at construction.
#[derive(Debug, Clone)]
pub struct BrowseClient {
    client: reqwest::Client,
    base_url: Url,
}

impl BrowseClient {
    /// Build a client from the scraper settings.
    pub fn new(config: &ScraperConfig) -> ScrapeResult<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Request URL for a category: `{base}?category={encoded}`.
    pub fn category_url(&self, category: &str) -> Url {
        category_url(&self.base_url, category)
    }
}

#[async_trait]
impl CategorySource for BrowseClient {
    async fn try_fetch(&self, category: &str) -> ScrapeResult<Value> {
        let url = self.category_url(category);
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(body)
    }
}

/// Append the category as the `category` query parameter of `base`.
pub fn category_url(base: &Url, category: &str) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut().append_pair("category", category);
    url
}

/// Fetch a category, reporting any failure and returning an empty mapping in its place.
pub async fn fetch_or_empty(
    source: &dyn CategorySource,
    category: &str,
    observer: &dyn ScrapeObserver,
) -> Value {
    match source.try_fetch(category).await {
        Ok(body) => body,
        Err(e) => {
            observer.on_event(&ScrapeEvent::FetchFailed {
                category: category.to_string(),
                error: e.to_string(),
            });
            Value::Object(Map::new())
        }
    }
}
