//! Scraper construction settings.

use std::time::Duration;

use crate::pacing::PacingPolicy;
use crate::types::ScrapeResult;

/// Browse endpoint of the public ODESI portal.
pub const DEFAULT_BASE_URL: &str = "https://odesi.ca/api/browse";

/// Browser-like user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Seconds between consecutive category requests.
pub const DEFAULT_DELAY_SECS: f64 = 1.0;

/// [`DEFAULT_DELAY_SECS`] as a [`Duration`].
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Default workbook name used by the exporter.
pub const DEFAULT_EXPORT_FILE: &str = "odesi_data.xlsx";

/// Settings fixed at scraper construction.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub pacing: PacingPolicy,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            pacing: PacingPolicy::Fixed(DEFAULT_DELAY),
        }
    }
}

impl ScraperConfig {
    /// Default settings with a fixed inter-request delay in seconds.
    pub fn with_delay(delay_secs: f64) -> ScrapeResult<Self> {
        Ok(Self {
            pacing: PacingPolicy::from_secs(delay_secs)?,
            ..Self::default()
        })
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn pacing(mut self, pacing: PacingPolicy) -> Self {
        self.pacing = pacing;
        self
    }
}
