//! Inter-request pacing.
//!
//! The aggregator calls [`Pacer::pause`] once between consecutive categories,
//! never before the first or after the last.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::types::{ScrapeError, ScrapeResult};

/// Waits between two upstream requests.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// How long to wait between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacingPolicy {
    /// No delay at all.
    #[default]
    None,
    /// The same delay every time.
    Fixed(Duration),
    /// `base` plus a uniformly random extra below `spread`.
    Jitter { base: Duration, spread: Duration },
}

impl PacingPolicy {
    /// A fixed delay in seconds. Zero or negative values disable pacing.
    ///
    /// Fails for NaN, infinity, or a delay too large for a [`Duration`].
    pub fn from_secs(secs: f64) -> ScrapeResult<Self> {
        let delay = secs_to_duration(secs)?;
        Ok(if delay.is_zero() {
            Self::None
        } else {
            Self::Fixed(delay)
        })
    }

    /// A jittered delay in seconds, falling back to [`PacingPolicy::from_secs`]
    /// when the spread is not positive.
    pub fn jitter_secs(base: f64, spread: f64) -> ScrapeResult<Self> {
        let spread = secs_to_duration(spread)?;
        if spread.is_zero() {
            return Self::from_secs(base);
        }
        Ok(Self::Jitter {
            base: secs_to_duration(base)?,
            spread,
        })
    }

    /// The delay to apply for the next pause.
    pub fn next_delay(&self) -> Duration {
        match *self {
            Self::None => Duration::ZERO,
            Self::Fixed(d) => d,
            Self::Jitter { base, spread } => {
                let extra = spread.mul_f64(rand::thread_rng().gen::<f64>());
                base.saturating_add(extra)
            }
        }
    }
}

fn secs_to_duration(secs: f64) -> ScrapeResult<Duration> {
    if secs <= 0.0 {
        return Ok(Duration::ZERO);
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| ScrapeError::Config(format!("delay of {secs} seconds is out of range: {e}")))
}

#[async_trait]
impl Pacer for PacingPolicy {
    async fn pause(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
