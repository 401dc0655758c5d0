//! Event storage using SQLite
//!
//! This module handles all persistence:
//! - Idempotent upsert of normalized event records (replace by id)
//! - Filtered listings (magnitude, location, recency)
//! - Aggregate statistics
//! - The append-only scrape audit trail

mod schema;

pub use schema::*;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{EventRecord, ScrapeHistoryEntry, Statistics};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const MS_PER_HOUR: i64 = 3_600 * 1_000;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Event database handle
#[derive(Clone)]
pub struct EventStore {
    pool: SqlitePool,
    /// Serializes ingestion batches so each audit entry counts only its
    /// own writes. Reads never take this lock.
    write_lock: Arc<Mutex<()>>,
}

impl EventStore {
    /// Connect to the event database using config
    pub async fn connect(config: &Config) -> Result<Self> {
        Self::new(&config.paths.db_file).await
    }

    /// Open the database at a path directly, creating the schema if needed
    pub async fn new(db_path: &std::path::Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        debug!("Connecting to SQLite database at {:?}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        };

        if !store.is_initialized().await? {
            store.init_schema().await?;
        }

        Ok(store)
    }

    /// Initialize the database schema
    pub async fn init_schema(&self) -> Result<()> {
        info!("Initializing database schema");
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// Check if database is initialized
    pub async fn is_initialized(&self) -> Result<bool> {
        let result: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM sqlite_master WHERE type='table' AND name='earthquakes'")
                .fetch_optional(&self.pool)
                .await?;
        Ok(result.is_some())
    }

    // ===== Ingestion =====

    /// Upsert a batch of records and append one audit entry.
    ///
    /// Each record replaces any prior row with the same id on every
    /// field (last-write-wins, no merging). A per-record database
    /// failure is logged and skipped; the batch continues. The audit
    /// entry records the count actually persisted, which is also the
    /// return value.
    pub async fn save(&self, records: &[EventRecord], time_range: &str) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let mut saved = 0usize;
        for record in records {
            match self.upsert_event(record).await {
                Ok(()) => saved += 1,
                Err(Error::Storage(sqlx::Error::Database(e))) => {
                    warn!("Failed to save event {}: {}", record.id, e);
                }
                Err(e) => return Err(e),
            }
        }

        sqlx::query(
            r#"
            INSERT INTO scrape_history (time_range, record_count, scraped_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(time_range)
        .bind(saved as i64)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        info!("Saved {} of {} records for '{}'", saved, records.len(), time_range);
        Ok(saved)
    }

    async fn upsert_event(&self, record: &EventRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO earthquakes (
                id, title, magnitude, location, time, updated, timezone,
                url, detail, felt, cdi, mmi, alert, status, tsunami, sig,
                net, code, ids, sources, types, nst, dmin, rms, gap,
                magType, type, longitude, latitude, depth, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.title)
        .bind(record.magnitude)
        .bind(&record.location)
        .bind(record.time)
        .bind(record.updated)
        .bind(record.timezone)
        .bind(&record.url)
        .bind(&record.detail)
        .bind(record.felt)
        .bind(record.cdi)
        .bind(record.mmi)
        .bind(&record.alert)
        .bind(&record.status)
        .bind(record.tsunami)
        .bind(record.sig)
        .bind(&record.net)
        .bind(&record.code)
        .bind(&record.ids)
        .bind(&record.sources)
        .bind(&record.types)
        .bind(record.nst)
        .bind(record.dmin)
        .bind(record.rms)
        .bind(record.gap)
        .bind(&record.mag_type)
        .bind(&record.event_type)
        .bind(record.longitude)
        .bind(record.latitude)
        .bind(record.depth)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ===== Listings =====

    /// All records, most recent first
    pub async fn list_all(&self, limit: Option<i64>) -> Result<Vec<EventRecord>> {
        let records = match limit {
            Some(limit) => {
                sqlx::query_as::<_, EventRecord>(
                    "SELECT * FROM earthquakes ORDER BY time DESC LIMIT ?",
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, EventRecord>("SELECT * FROM earthquakes ORDER BY time DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(records)
    }

    /// Records within a magnitude range; NULL magnitudes are excluded.
    /// Both bounds are inclusive.
    pub async fn list_by_magnitude(
        &self,
        min: f64,
        max: Option<f64>,
    ) -> Result<Vec<EventRecord>> {
        let records = match max {
            Some(max) => {
                sqlx::query_as::<_, EventRecord>(
                    r#"
                    SELECT * FROM earthquakes
                    WHERE magnitude >= ? AND magnitude <= ?
                    ORDER BY time DESC
                    "#,
                )
                .bind(min)
                .bind(max)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, EventRecord>(
                    r#"
                    SELECT * FROM earthquakes
                    WHERE magnitude >= ?
                    ORDER BY time DESC
                    "#,
                )
                .bind(min)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(records)
    }

    /// Case-insensitive substring match on location; NULL locations excluded
    pub async fn list_by_location(&self, query: &str) -> Result<Vec<EventRecord>> {
        let records = sqlx::query_as::<_, EventRecord>(
            r#"
            SELECT * FROM earthquakes
            WHERE location IS NOT NULL
              AND instr(lower(location), lower(?)) > 0
            ORDER BY time DESC
            "#,
        )
        .bind(query)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Records from the last N hours, evaluated against wall-clock now
    pub async fn list_recent(&self, hours: i64) -> Result<Vec<EventRecord>> {
        self.list_recent_at(hours, Utc::now().timestamp_millis()).await
    }

    /// Records with `time >= now_ms - hours`; the boundary is inclusive
    pub async fn list_recent_at(&self, hours: i64, now_ms: i64) -> Result<Vec<EventRecord>> {
        if hours < 0 {
            return Err(Error::InvalidArgument(format!(
                "hours must be non-negative, got {}",
                hours
            )));
        }

        let threshold = now_ms - hours * MS_PER_HOUR;
        let records = sqlx::query_as::<_, EventRecord>(
            r#"
            SELECT * FROM earthquakes
            WHERE time >= ?
            ORDER BY time DESC
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    // ===== Statistics =====

    /// Aggregates over all currently stored records.
    ///
    /// Magnitude aggregates ignore NULL magnitudes and are themselves
    /// None when no qualifying record exists. None signals "no data";
    /// zero would falsely signal "average is zero".
    pub async fn statistics(&self) -> Result<Statistics> {
        let (total_count, magnitude_min, magnitude_max, magnitude_avg): (
            i64,
            Option<f64>,
            Option<f64>,
            Option<f64>,
        ) = sqlx::query_as(
            "SELECT COUNT(*), MIN(magnitude), MAX(magnitude), AVG(magnitude) FROM earthquakes",
        )
        .fetch_one(&self.pool)
        .await?;

        let tsunami_event_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM earthquakes WHERE tsunami = 1")
                .fetch_one(&self.pool)
                .await?;

        let unique_location_count: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT location) FROM earthquakes")
                .fetch_one(&self.pool)
                .await?;

        Ok(Statistics {
            total_count,
            magnitude_min,
            magnitude_max,
            magnitude_avg,
            tsunami_event_count,
            unique_location_count,
        })
    }

    // ===== Purging =====

    /// Delete records older than the given number of days
    pub async fn purge_older_than(&self, days: i64) -> Result<u64> {
        self.purge_older_than_at(days, Utc::now().timestamp_millis()).await
    }

    /// Delete records with `time < now_ms - days`, returning the count
    pub async fn purge_older_than_at(&self, days: i64, now_ms: i64) -> Result<u64> {
        if days < 0 {
            return Err(Error::InvalidArgument(format!(
                "days must be non-negative, got {}",
                days
            )));
        }

        let threshold = now_ms - days * MS_PER_DAY;
        let result = sqlx::query("DELETE FROM earthquakes WHERE time < ?")
            .bind(threshold)
            .execute(&self.pool)
            .await?;

        info!("Purged {} records older than {} days", result.rows_affected(), days);
        Ok(result.rows_affected())
    }

    /// Delete every record, returning the count
    pub async fn purge_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM earthquakes")
            .execute(&self.pool)
            .await?;

        info!("Purged all {} records", result.rows_affected());
        Ok(result.rows_affected())
    }

    // ===== Audit trail =====

    /// Recent scrape audit entries, newest first
    pub async fn list_history(&self, limit: Option<i64>) -> Result<Vec<ScrapeHistoryEntry>> {
        let entries = sqlx::query_as::<_, ScrapeHistoryEntry>(
            "SELECT * FROM scrape_history ORDER BY id DESC LIMIT ?",
        )
        .bind(limit.unwrap_or(50))
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
