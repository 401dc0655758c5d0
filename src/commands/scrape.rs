//! Scrape command - fetch, normalize and persist one feed window

use crate::config::Config;
use crate::error::Result;
use crate::feed;
use crate::fetch::{FeedClient, TimeRange};
use crate::models::FeedMetadata;
use crate::store::EventStore;
use serde::Serialize;
use tracing::{info, warn};

/// Scrape statistics
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeStats {
    pub time_range: String,
    /// Well-formed features found in the feed
    pub records_fetched: usize,
    /// Records actually persisted
    pub records_saved: usize,
    /// Features dropped as malformed
    pub records_skipped: usize,
    pub metadata: FeedMetadata,
}

/// Execute a scrape: fetch the feed window, normalize it and save the
/// records as one audited batch.
pub async fn cmd_scrape(
    config: &Config,
    store: &EventStore,
    range: TimeRange,
) -> Result<ScrapeStats> {
    info!("Scraping '{}' feed", range);

    let client = FeedClient::new(&config.feed)?;
    let raw = client.fetch(range).await?;

    let normalized = feed::normalize(&raw)?;
    if normalized.skipped > 0 {
        warn!("Skipped {} malformed features", normalized.skipped);
    }

    let saved = store.save(&normalized.records, &range.to_string()).await?;

    Ok(ScrapeStats {
        time_range: range.to_string(),
        records_fetched: normalized.records.len(),
        records_saved: saved,
        records_skipped: normalized.skipped,
        metadata: normalized.metadata,
    })
}

/// Print scrape statistics to console
pub fn print_scrape_stats(stats: &ScrapeStats) {
    println!("\n✓ Scrape complete ({})", stats.time_range);
    println!("  Records fetched: {}", stats.records_fetched);
    println!("  Records saved:   {}", stats.records_saved);
    if stats.records_skipped > 0 {
        println!("  Records skipped: {}", stats.records_skipped);
    }
    if let Some(count) = stats.metadata.count {
        println!("  Feed declared:   {}", count);
    }
    if let Some(title) = &stats.metadata.title {
        println!("  Feed: {}", title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(tmp: &TempDir, base_url: String) -> Config {
        let mut config = Config::default();
        config.feed.base_url = base_url;
        config.paths.base_dir = tmp.path().to_path_buf();
        config.paths.config_file = tmp.path().join("config.toml");
        config.paths.db_file = tmp.path().join("earthquakes.db");
        config
    }

    #[tokio::test]
    async fn test_scrape_pipeline_skips_bad_feature() {
        let server = MockServer::start().await;
        let body = json!({
            "metadata": {"count": 3, "title": "Test Feed"},
            "features": [
                {
                    "id": "ev1",
                    "properties": {"mag": 4.5, "place": "California", "time": 1_000},
                    "geometry": {"coordinates": [-120.0, 36.0, 5.0]}
                },
                {
                    "id": "ev2",
                    "properties": {"mag": 2.0, "place": "Alaska", "time": 2_000},
                    "geometry": null
                },
                {
                    // No id: dropped, batch continues
                    "properties": {"mag": 1.0, "time": 3_000}
                }
            ]
        });
        Mock::given(method("GET"))
            .and(path("/all_day.geojson"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp, server.uri());
        let store = EventStore::connect(&config).await.unwrap();

        let stats = cmd_scrape(&config, &store, TimeRange::Day).await.unwrap();
        assert_eq!(stats.records_fetched, 2);
        assert_eq!(stats.records_saved, 2);
        assert_eq!(stats.records_skipped, 1);

        let history = store.list_history(None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].time_range, "day");
        assert_eq!(history[0].record_count, 2);
    }

    #[tokio::test]
    async fn test_scrape_fetch_failure_saves_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/all_hour.geojson"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp, server.uri());
        let store = EventStore::connect(&config).await.unwrap();

        assert!(cmd_scrape(&config, &store, TimeRange::Hour).await.is_err());
        assert!(store.list_history(None).await.unwrap().is_empty());
    }
}
