//! Default values for configuration

/// Default USGS summary feed base URL
pub fn default_feed_base_url() -> String {
    std::env::var("QUAKEWATCH_FEED_URL")
        .unwrap_or_else(|_| "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary".to_string())
}

/// Default user agent
pub fn default_feed_user_agent() -> String {
    format!("quakewatch/{} (Seismic Feed Scraper)", env!("CARGO_PKG_VERSION"))
}

/// Default request timeout in seconds
pub fn default_feed_timeout() -> u64 {
    30
}

/// Default API server bind address
pub fn default_server_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

/// Default limit for listing queries when none is given over HTTP
pub fn default_query_max_results() -> i64 {
    1000
}

/// Default recency window in hours
pub fn default_recent_hours() -> i64 {
    24
}

/// Default retention window for `purge old` in days
pub fn default_retention_days() -> i64 {
    30
}
