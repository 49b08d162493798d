//! Configuration loading and resolution.
//!
//! Each setting is taken from the command line first, then the environment,
//! then the built-in default.

use std::path::PathBuf;
use std::time::Duration;

use odesi_browse::config::{DEFAULT_BASE_URL, DEFAULT_DELAY_SECS};
use odesi_browse::{PacingPolicy, ScrapeError, ScrapeResult, ScraperConfig};

pub const ENV_BASE_URL: &str = "ODESI_BASE_URL";
pub const ENV_OUTPUT: &str = "ODESI_OUTPUT";
pub const ENV_DELAY: &str = "ODESI_DELAY";

/// Workbook written by the `scrape` command when none is given.
pub const DEFAULT_OUTPUT: &str = "odesi_surveys.xlsx";

/// Series listed in the run summary when `--top` is not given.
pub const DEFAULT_TOP_SERIES: usize = 10;

/// Fully resolved settings for one `scrape` run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub scraper: ScraperConfig,
    pub output: PathBuf,
    pub categories: Option<Vec<String>>,
    pub top: usize,
}

/// Raw `scrape` options as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ScrapeArgs {
    pub categories: Vec<String>,
    pub output: Option<String>,
    pub delay: Option<f64>,
    pub jitter: Option<f64>,
    pub base_url: Option<String>,
    pub timeout: Option<u64>,
    pub top: Option<usize>,
}

impl RunSettings {
    /// Resolve against the process environment.
    pub fn resolve(args: &ScrapeArgs) -> ScrapeResult<Self> {
        Self::resolve_with(args, |key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary environment lookup.
    pub fn resolve_with(
        args: &ScrapeArgs,
        env: impl Fn(&str) -> Option<String>,
    ) -> ScrapeResult<Self> {
        let base_url = resolve_base_url(args.base_url.as_deref(), env(ENV_BASE_URL));
        let output = resolve_output_path(args.output.as_deref(), env(ENV_OUTPUT));
        let delay = resolve_delay(args.delay, env(ENV_DELAY))?;

        let pacing = match args.jitter {
            Some(spread) => PacingPolicy::jitter_secs(delay, spread)?,
            None => PacingPolicy::from_secs(delay)?,
        };

        let mut scraper = ScraperConfig::default().base_url(base_url).pacing(pacing);
        if let Some(secs) = args.timeout {
            if secs == 0 {
                return Err(ScrapeError::Config("timeout must be at least 1 second".into()));
            }
            scraper = scraper.timeout(Duration::from_secs(secs));
        }

        let categories = if args.categories.is_empty() {
            None
        } else {
            Some(args.categories.clone())
        };

        Ok(Self {
            scraper,
            output,
            categories,
            top: args.top.unwrap_or(DEFAULT_TOP_SERIES),
        })
    }
}

/// Resolve the browse endpoint.
pub fn resolve_base_url(explicit: Option<&str>, env_value: Option<String>) -> String {
    if let Some(url) = explicit {
        return url.to_string();
    }

    env_value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Resolve the workbook path.
pub fn resolve_output_path(explicit: Option<&str>, env_value: Option<String>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    match env_value.filter(|v| !v.trim().is_empty()) {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(DEFAULT_OUTPUT),
    }
}

/// Resolve the inter-request delay in seconds.
pub fn resolve_delay(explicit: Option<f64>, env_value: Option<String>) -> ScrapeResult<f64> {
    let delay = match (explicit, env_value) {
        (Some(d), _) => d,
        (None, Some(raw)) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ScrapeError::Config(format!("{ENV_DELAY} is not a number: {raw}")))?,
        (None, None) => DEFAULT_DELAY_SECS,
    };

    if !delay.is_finite() || delay < 0.0 {
        return Err(ScrapeError::Config(format!(
            "delay must be a non-negative number of seconds, got {delay}"
        )));
    }
    Duration::try_from_secs_f64(delay)
        .map_err(|e| ScrapeError::Config(format!("delay of {delay} seconds is too large: {e}")))?;
    Ok(delay)
}
