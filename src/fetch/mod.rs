//! Feed fetching
//!
//! Downloads a named summary-feed window over HTTP. The raw bytes are
//! handed to the normalizer untouched; this module does not interpret
//! the payload.

use crate::config::FeedConfig;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Named feed windows offered by the summary endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Hour,
    Day,
    Week,
    Month,
}

impl TimeRange {
    /// Feed file name for this window
    pub fn feed_file(&self) -> &'static str {
        match self {
            TimeRange::Hour => "all_hour.geojson",
            TimeRange::Day => "all_day.geojson",
            TimeRange::Week => "all_week.geojson",
            TimeRange::Month => "all_month.geojson",
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeRange::Hour => write!(f, "hour"),
            TimeRange::Day => write!(f, "day"),
            TimeRange::Week => write!(f, "week"),
            TimeRange::Month => write!(f, "month"),
        }
    }
}

impl FromStr for TimeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hour" => Ok(TimeRange::Hour),
            "day" => Ok(TimeRange::Day),
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            _ => Err(Error::InvalidArgument(format!(
                "unknown time range '{}' (expected hour, day, week or month)",
                s
            ))),
        }
    }
}

/// HTTP client for the summary feed
pub struct FeedClient {
    client: Client,
    base_url: String,
}

impl FeedClient {
    /// Create a new feed client
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| Error::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the raw feed bytes for a time range
    pub async fn fetch(&self, range: TimeRange) -> Result<Vec<u8>> {
        let url = format!("{}/{}", self.base_url, range.feed_file());
        debug!("Fetching feed: {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("HTTP {}: {}", status, url)));
        }

        let bytes = response.bytes().await?;
        debug!("Fetched {} bytes for '{}'", bytes.len(), range);
        Ok(bytes.to_vec())
    }
}
