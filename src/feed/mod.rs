//! Feed normalization
//!
//! Turns raw GeoJSON summary-feed bytes into flat [`EventRecord`]s plus
//! feed-level metadata. Pure transformation: no network or storage
//! access happens here.

use crate::error::{Error, Result};
use crate::models::{AlertLevel, EventRecord, FeedMetadata};
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

/// Result of normalizing one feed payload
#[derive(Debug, Clone)]
pub struct NormalizedFeed {
    pub records: Vec<EventRecord>,
    pub metadata: FeedMetadata,
    /// Features dropped as malformed
    pub skipped: usize,
}

/// Feed envelope: a `features` array plus optional `metadata`.
///
/// Features are kept as raw values so that one malformed feature can be
/// skipped without failing the whole batch.
#[derive(Debug, Deserialize)]
struct RawFeed {
    #[serde(default)]
    metadata: Option<Value>,
    features: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    properties: Option<RawProperties>,
    #[serde(default)]
    geometry: Option<Value>,
}

/// The loosely-typed `properties` object. Absent and null collapse to
/// None; a wrong-typed value fails deserialization of the feature.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProperties {
    title: Option<String>,
    mag: Option<f64>,
    place: Option<String>,
    time: Option<i64>,
    updated: Option<i64>,
    tz: Option<i64>,
    url: Option<String>,
    detail: Option<String>,
    felt: Option<i64>,
    cdi: Option<f64>,
    mmi: Option<f64>,
    alert: Option<String>,
    status: Option<String>,
    tsunami: Option<i64>,
    sig: Option<i64>,
    net: Option<String>,
    code: Option<String>,
    ids: Option<String>,
    sources: Option<String>,
    types: Option<String>,
    nst: Option<i64>,
    dmin: Option<f64>,
    rms: Option<f64>,
    gap: Option<f64>,
    #[serde(rename = "magType")]
    mag_type: Option<String>,
    #[serde(rename = "type")]
    event_type: Option<String>,
}

/// Normalize a raw feed payload into flat event records.
///
/// A body that is not a valid feed envelope fails the whole call.
/// Individual malformed features are skipped and counted; the rest of
/// the batch survives.
pub fn normalize(raw: &[u8]) -> Result<NormalizedFeed> {
    let feed: RawFeed = serde_json::from_slice(raw)
        .map_err(|e| Error::MalformedRecord(format!("feed envelope: {}", e)))?;

    let metadata = extract_metadata(feed.metadata.as_ref());

    let mut records = Vec::with_capacity(feed.features.len());
    let mut skipped = 0usize;

    for feature in feed.features {
        match normalize_feature(feature) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Skipping malformed feature: {}", e);
                skipped += 1;
            }
        }
    }

    Ok(NormalizedFeed {
        records,
        metadata,
        skipped,
    })
}

/// Normalize a single feature into a flat record
fn normalize_feature(feature: Value) -> Result<EventRecord> {
    let feature: RawFeature = serde_json::from_value(feature)
        .map_err(|e| Error::MalformedRecord(format!("feature: {}", e)))?;

    let id = feature
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::MalformedRecord("feature has no id".to_string()))?;

    let props = feature.properties.unwrap_or_default();

    if let Some(alert) = props.alert.as_deref() {
        // Validates against the known severity levels
        AlertLevel::from_str(alert)?;
    }

    for (name, value) in [("time", props.time), ("updated", props.updated)] {
        if let Some(v) = value {
            if v < 0 {
                return Err(Error::MalformedRecord(format!(
                    "feature {}: negative {}: {}",
                    id, name, v
                )));
            }
        }
    }

    let (longitude, latitude, depth) = extract_coordinates(feature.geometry.as_ref());

    Ok(EventRecord {
        id,
        title: props.title,
        magnitude: props.mag,
        location: props.place,
        time: props.time,
        updated: props.updated,
        timezone: props.tz,
        url: props.url,
        detail: props.detail,
        felt: props.felt,
        cdi: props.cdi,
        mmi: props.mmi,
        alert: props.alert,
        status: props.status,
        tsunami: props.tsunami,
        sig: props.sig,
        net: props.net,
        code: props.code,
        ids: props.ids,
        sources: props.sources,
        types: props.types,
        nst: props.nst,
        dmin: props.dmin,
        rms: props.rms,
        gap: props.gap,
        mag_type: props.mag_type,
        event_type: props.event_type,
        longitude,
        latitude,
        depth,
    })
}

/// Map a geometry's coordinate triple to (longitude, latitude, depth).
///
/// Absent or malformed geometry (fewer than 3 numeric coordinates)
/// yields all three None; the triple is never partially populated.
fn extract_coordinates(geometry: Option<&Value>) -> (Option<f64>, Option<f64>, Option<f64>) {
    let coords = geometry
        .and_then(|g| g.get("coordinates"))
        .and_then(|c| c.as_array());

    if let Some(coords) = coords {
        if coords.len() >= 3 {
            let triple: Vec<f64> = coords.iter().take(3).filter_map(|v| v.as_f64()).collect();
            if triple.len() == 3 {
                return (Some(triple[0]), Some(triple[1]), Some(triple[2]));
            }
        }
    }

    (None, None, None)
}

/// Extract feed metadata, best-effort: an absent or undecodable
/// `metadata` object yields the empty default, never an error.
fn extract_metadata(metadata: Option<&Value>) -> FeedMetadata {
    metadata
        .cloned()
        .and_then(|m| serde_json::from_value(m).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(id: &str, mag: f64, place: &str, time: i64) -> Value {
        json!({
            "id": id,
            "properties": {
                "title": format!("M {} - {}", mag, place),
                "mag": mag,
                "place": place,
                "time": time,
                "updated": time + 60_000,
                "tsunami": 0,
                "sig": 310,
                "status": "reviewed",
                "magType": "ml",
                "type": "earthquake"
            },
            "geometry": {
                "type": "Point",
                "coordinates": [-122.5, 38.2, 7.3]
            }
        })
    }

    fn feed(features: Vec<Value>) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "metadata": {
                "generated": 1700000000000i64,
                "url": "https://example.test/all_day.geojson",
                "title": "USGS All Earthquakes, Past Day",
                "status": 200,
                "api": "1.10.3",
                "count": features.len()
            },
            "features": features
        }))
        .unwrap()
    }

    #[test]
    fn test_normalize_well_formed_feed() {
        let raw = feed(vec![
            feature("ev1", 4.5, "Northern California", 1700000000000),
            feature("ev2", 2.1, "Alaska Peninsula", 1700000100000),
        ]);

        let out = normalize(&raw).unwrap();
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.skipped, 0);
        assert!(out.records.iter().all(|r| !r.id.is_empty()));
        assert_eq!(out.metadata.count, Some(2));
        assert_eq!(out.records[0].mag_type.as_deref(), Some("ml"));
        assert_eq!(out.records[0].event_type.as_deref(), Some("earthquake"));
    }

    #[test]
    fn test_coordinate_triple_in_order() {
        let raw = feed(vec![feature("ev1", 4.5, "somewhere", 1_000)]);
        let out = normalize(&raw).unwrap();
        let rec = &out.records[0];
        assert_eq!(rec.longitude, Some(-122.5));
        assert_eq!(rec.latitude, Some(38.2));
        assert_eq!(rec.depth, Some(7.3));
    }

    #[test]
    fn test_missing_geometry_yields_null_triple() {
        let mut f = feature("ev1", 4.5, "somewhere", 1_000);
        f.as_object_mut().unwrap().remove("geometry");
        let out = normalize(&feed(vec![f])).unwrap();
        let rec = &out.records[0];
        assert_eq!(rec.longitude, None);
        assert_eq!(rec.latitude, None);
        assert_eq!(rec.depth, None);
    }

    #[test]
    fn test_short_coordinate_list_yields_null_triple() {
        let mut f = feature("ev1", 4.5, "somewhere", 1_000);
        f["geometry"]["coordinates"] = json!([-122.5, 38.2]);
        let out = normalize(&feed(vec![f])).unwrap();
        let rec = &out.records[0];
        assert_eq!(rec.longitude, None);
        assert_eq!(rec.latitude, None);
        assert_eq!(rec.depth, None);
        assert_eq!(out.skipped, 0);
    }

    #[test]
    fn test_missing_id_skips_feature() {
        let mut bad = feature("ev2", 3.0, "nowhere", 2_000);
        bad.as_object_mut().unwrap().remove("id");

        let raw = feed(vec![feature("ev1", 4.5, "somewhere", 1_000), bad]);
        let out = normalize(&raw).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.skipped, 1);
        assert_eq!(out.records[0].id, "ev1");
    }

    #[test]
    fn test_wrong_typed_property_skips_feature() {
        let mut bad = feature("ev2", 3.0, "nowhere", 2_000);
        bad["properties"]["mag"] = json!("not a number");

        let out = normalize(&feed(vec![bad])).unwrap();
        assert_eq!(out.records.len(), 0);
        assert_eq!(out.skipped, 1);
    }

    #[test]
    fn test_unknown_alert_skips_feature() {
        let mut bad = feature("ev1", 3.0, "nowhere", 2_000);
        bad["properties"]["alert"] = json!("purple");

        let out = normalize(&feed(vec![bad])).unwrap();
        assert_eq!(out.skipped, 1);
    }

    #[test]
    fn test_negative_time_skips_feature() {
        let bad = feature("ev1", 3.0, "nowhere", -5);
        let out = normalize(&feed(vec![bad])).unwrap();
        assert_eq!(out.skipped, 1);
    }

    #[test]
    fn test_negative_magnitude_is_valid() {
        let out = normalize(&feed(vec![feature("ev1", -0.4, "geyser basin", 1_000)])).unwrap();
        assert_eq!(out.records[0].magnitude, Some(-0.4));
        assert_eq!(out.skipped, 0);
    }

    #[test]
    fn test_absent_properties_map_to_none() {
        let f = json!({
            "id": "evbare",
            "properties": { "mag": 0.0 },
            "geometry": null
        });
        let out = normalize(&feed(vec![f])).unwrap();
        let rec = &out.records[0];
        // Reported zero stays zero; everything unreported is None
        assert_eq!(rec.magnitude, Some(0.0));
        assert_eq!(rec.time, None);
        assert_eq!(rec.felt, None);
        assert_eq!(rec.location, None);
    }

    #[test]
    fn test_absent_metadata_is_empty() {
        let raw = serde_json::to_vec(&json!({
            "features": [feature("ev1", 4.5, "somewhere", 1_000)]
        }))
        .unwrap();
        let out = normalize(&raw).unwrap();
        assert_eq!(out.metadata, FeedMetadata::default());
    }

    #[test]
    fn test_invalid_envelope_fails() {
        assert!(normalize(b"not json").is_err());
        assert!(normalize(br#"{"metadata": {}}"#).is_err());
    }
}
