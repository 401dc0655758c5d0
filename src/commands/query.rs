//! Query commands - filtered listings, statistics and the audit trail

use crate::error::Result;
use crate::models::{EventRecord, ScrapeHistoryEntry, Statistics};
use crate::store::EventStore;

/// List all stored events, optionally capped
pub async fn cmd_list(store: &EventStore, limit: Option<i64>) -> Result<Vec<EventRecord>> {
    store.list_all(limit).await
}

/// List events within a magnitude range
pub async fn cmd_magnitude(
    store: &EventStore,
    min: f64,
    max: Option<f64>,
) -> Result<Vec<EventRecord>> {
    store.list_by_magnitude(min, max).await
}

/// List events matching a location substring
pub async fn cmd_location(store: &EventStore, query: &str) -> Result<Vec<EventRecord>> {
    store.list_by_location(query).await
}

/// List events from the last N hours
pub async fn cmd_recent(store: &EventStore, hours: i64) -> Result<Vec<EventRecord>> {
    store.list_recent(hours).await
}

/// Aggregate statistics over the store
pub async fn cmd_stats(store: &EventStore) -> Result<Statistics> {
    store.statistics().await
}

/// Recent scrape audit entries
pub async fn cmd_history(store: &EventStore, limit: Option<i64>) -> Result<Vec<ScrapeHistoryEntry>> {
    store.list_history(limit).await
}

/// Print event records as a table
pub fn print_records(records: &[EventRecord]) {
    if records.is_empty() {
        println!("No events found.");
        return;
    }

    println!("{:<14} {:>5}  {:<44} {:<24}", "ID", "MAG", "LOCATION", "TIME (UTC)");
    for record in records {
        let mag = record
            .magnitude
            .map(|m| format!("{:.1}", m))
            .unwrap_or_else(|| "-".to_string());
        let location = record.location.as_deref().unwrap_or("-");
        let time = record
            .time
            .and_then(format_epoch_ms)
            .unwrap_or_else(|| "-".to_string());
        println!("{:<14} {:>5}  {:<44} {:<24}", record.id, mag, truncate(location, 44), time);
    }
    println!("\n{} event(s)", records.len());
}

/// Print statistics to console
pub fn print_stats(stats: &Statistics) {
    println!("\nEvent statistics");
    println!("  Total events:     {}", stats.total_count);
    println!("  Magnitude min:    {}", fmt_opt(stats.magnitude_min));
    println!("  Magnitude max:    {}", fmt_opt(stats.magnitude_max));
    println!("  Magnitude avg:    {}", fmt_opt(stats.magnitude_avg));
    println!("  Tsunami events:   {}", stats.tsunami_event_count);
    println!("  Unique locations: {}", stats.unique_location_count);
}

/// Print the scrape audit trail
pub fn print_history(entries: &[ScrapeHistoryEntry]) {
    if entries.is_empty() {
        println!("No scrapes recorded.");
        return;
    }

    println!("{:<8} {:>8}  {}", "RANGE", "RECORDS", "SCRAPED AT");
    for entry in entries {
        println!("{:<8} {:>8}  {}", entry.time_range, entry.record_count, entry.scraped_at);
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "n/a".to_string())
}

fn format_epoch_ms(ms: i64) -> Option<String> {
    chrono::DateTime::from_timestamp_millis(ms).map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
