//! Shared domain types: event records, feed metadata, statistics.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

/// Alert severity levels reported by the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Green,
    Yellow,
    Orange,
    Red,
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertLevel::Green => write!(f, "green"),
            AlertLevel::Yellow => write!(f, "yellow"),
            AlertLevel::Orange => write!(f, "orange"),
            AlertLevel::Red => write!(f, "red"),
        }
    }
}

impl FromStr for AlertLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "green" => Ok(AlertLevel::Green),
            "yellow" => Ok(AlertLevel::Yellow),
            "orange" => Ok(AlertLevel::Orange),
            "red" => Ok(AlertLevel::Red),
            _ => Err(Error::MalformedRecord(format!("unknown alert level: {}", s))),
        }
    }
}

/// One observed seismic event, flattened from a feed feature.
///
/// Optional fields preserve "not reported" as None; a reported zero
/// stays a zero. The longitude/latitude/depth triple is either fully
/// populated or fully None.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct EventRecord {
    /// Stable external identifier (primary key)
    pub id: String,
    pub title: Option<String>,
    pub magnitude: Option<f64>,
    /// Free-text place description
    pub location: Option<String>,
    /// Event time, epoch milliseconds
    pub time: Option<i64>,
    /// Last upstream revision time, epoch milliseconds
    pub updated: Option<i64>,
    pub timezone: Option<i64>,
    pub url: Option<String>,
    pub detail: Option<String>,
    /// Number of felt reports
    pub felt: Option<i64>,
    pub cdi: Option<f64>,
    pub mmi: Option<f64>,
    /// Severity: green/yellow/orange/red
    pub alert: Option<String>,
    pub status: Option<String>,
    /// 0/1 flag
    pub tsunami: Option<i64>,
    /// Significance score
    pub sig: Option<i64>,
    pub net: Option<String>,
    pub code: Option<String>,
    pub ids: Option<String>,
    pub sources: Option<String>,
    pub types: Option<String>,
    /// Station count
    pub nst: Option<i64>,
    pub dmin: Option<f64>,
    pub rms: Option<f64>,
    pub gap: Option<f64>,
    #[sqlx(rename = "magType")]
    #[serde(rename = "magType")]
    pub mag_type: Option<String>,
    /// Event classification, e.g. "earthquake"
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub depth: Option<f64>,
}

impl EventRecord {
    pub fn alert_level(&self) -> Result<Option<AlertLevel>> {
        self.alert.as_deref().map(AlertLevel::from_str).transpose()
    }
}

/// Feed-level metadata, extracted best-effort
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedMetadata {
    /// Feed generation time, epoch milliseconds
    pub generated: Option<i64>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub status: Option<i64>,
    pub api: Option<String>,
    /// Declared feature count
    pub count: Option<i64>,
}

/// One scrape audit entry (append-only)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScrapeHistoryEntry {
    pub id: i64,
    pub time_range: String,
    /// Records actually persisted, not attempted
    pub record_count: i64,
    pub scraped_at: String,
}

/// Aggregate statistics over all stored events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics {
    pub total_count: i64,
    /// None when no record has a magnitude; never coerced to zero
    pub magnitude_min: Option<f64>,
    pub magnitude_max: Option<f64>,
    pub magnitude_avg: Option<f64>,
    pub tsunami_event_count: i64,
    pub unique_location_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_record(id: &str) -> EventRecord {
        EventRecord {
            id: id.to_string(),
            title: None,
            magnitude: None,
            location: None,
            time: None,
            updated: None,
            timezone: None,
            url: None,
            detail: None,
            felt: None,
            cdi: None,
            mmi: None,
            alert: None,
            status: None,
            tsunami: None,
            sig: None,
            net: None,
            code: None,
            ids: None,
            sources: None,
            types: None,
            nst: None,
            dmin: None,
            rms: None,
            gap: None,
            mag_type: None,
            event_type: None,
            longitude: None,
            latitude: None,
            depth: None,
        }
    }

    #[test]
    fn test_alert_level_roundtrip() {
        assert_eq!("orange".parse::<AlertLevel>().unwrap(), AlertLevel::Orange);
        assert_eq!(AlertLevel::Red.to_string(), "red");
        assert!("purple".parse::<AlertLevel>().is_err());
    }

    #[test]
    fn test_alert_level_accessor() {
        let mut rec = minimal_record("ev1");
        assert_eq!(rec.alert_level().unwrap(), None);

        rec.alert = Some("green".to_string());
        assert_eq!(rec.alert_level().unwrap(), Some(AlertLevel::Green));

        rec.alert = Some("bogus".to_string());
        assert!(rec.alert_level().is_err());
    }

    #[test]
    fn test_record_serde_renames() {
        let mut rec = minimal_record("ev1");
        rec.mag_type = Some("ml".to_string());
        rec.event_type = Some("earthquake".to_string());

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["magType"], "ml");
        assert_eq!(json["type"], "earthquake");
    }
}
