//! Purge commands - age-based and full deletion

use crate::error::Result;
use crate::store::EventStore;
use serde::Serialize;
use tracing::info;

/// Purge statistics
#[derive(Debug, Clone, Serialize)]
pub struct PurgeStats {
    pub deleted_count: u64,
    /// Age threshold in days; None for a full purge
    pub days: Option<i64>,
}

/// Delete events older than the given number of days
pub async fn cmd_purge_old(store: &EventStore, days: i64) -> Result<PurgeStats> {
    info!("Purging events older than {} days", days);
    let deleted_count = store.purge_older_than(days).await?;
    Ok(PurgeStats {
        deleted_count,
        days: Some(days),
    })
}

/// Delete every stored event
pub async fn cmd_purge_all(store: &EventStore) -> Result<PurgeStats> {
    info!("Purging all events");
    let deleted_count = store.purge_all().await?;
    Ok(PurgeStats {
        deleted_count,
        days: None,
    })
}

/// Print purge statistics to console
pub fn print_purge_stats(stats: &PurgeStats) {
    match stats.days {
        Some(days) => println!("✓ Deleted {} event(s) older than {} days", stats.deleted_count, days),
        None => println!("✓ Deleted all {} event(s)", stats.deleted_count),
    }
}
