//! API route handlers

use super::error::ApiError;
use super::AppState;
use crate::commands::{cmd_scrape, ScrapeStats};
use crate::error::Error;
use crate::models::{EventRecord, ScrapeHistoryEntry, Statistics};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// `GET /health`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Scrape request body
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default = "default_time_range")]
    pub time_range: String,
}

fn default_time_range() -> String {
    "day".to_string()
}

/// `POST /scrape`
///
/// Fetches the named feed window and ingests it as one audited batch.
pub async fn scrape(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<ScrapeStats>, ApiError> {
    let range = crate::fetch::TimeRange::from_str(&request.time_range)?;
    let stats = cmd_scrape(&state.config, &state.store, range).await?;
    Ok(Json(stats))
}

/// Listing response: row count plus the rows
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub count: usize,
    pub data: Vec<EventRecord>,
}

impl From<Vec<EventRecord>> for ListResponse {
    fn from(data: Vec<EventRecord>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// `GET /earthquakes`
pub async fn list_all(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let limit = params.limit.unwrap_or(state.config.query.max_results);
    let records = state.store.list_all(Some(limit)).await?;
    Ok(Json(records.into()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentQuery {
    pub hours: Option<i64>,
}

/// `GET /earthquakes/recent`
pub async fn list_recent(
    State(state): State<AppState>,
    Query(params): Query<RecentQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let hours = params.hours.unwrap_or(state.config.query.recent_hours);
    let records = state.store.list_recent(hours).await?;
    Ok(Json(records.into()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct MagnitudeQuery {
    pub min_magnitude: f64,
    pub max_magnitude: Option<f64>,
}

/// `GET /earthquakes/magnitude`
pub async fn list_by_magnitude(
    State(state): State<AppState>,
    Query(params): Query<MagnitudeQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    if let Some(max) = params.max_magnitude {
        if max < params.min_magnitude {
            return Err(Error::InvalidArgument(format!(
                "max_magnitude {} is below min_magnitude {}",
                max, params.min_magnitude
            ))
            .into());
        }
    }

    let records = state
        .store
        .list_by_magnitude(params.min_magnitude, params.max_magnitude)
        .await?;
    Ok(Json(records.into()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationQuery {
    pub location: String,
}

/// `GET /earthquakes/location`
pub async fn list_by_location(
    State(state): State<AppState>,
    Query(params): Query<LocationQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    if params.location.is_empty() {
        return Err(Error::InvalidArgument("location must not be empty".to_string()).into());
    }

    let records = state.store.list_by_location(&params.location).await?;
    Ok(Json(records.into()))
}

/// `GET /statistics`
pub async fn statistics(State(state): State<AppState>) -> Result<Json<Statistics>, ApiError> {
    let stats = state.store.statistics().await?;
    Ok(Json(stats))
}

/// History response
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub count: usize,
    pub data: Vec<ScrapeHistoryEntry>,
}

/// `GET /history`
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let data = state.store.list_history(params.limit).await?;
    Ok(Json(HistoryResponse {
        count: data.len(),
        data,
    }))
}

/// Purge response
#[derive(Debug, Clone, Serialize)]
pub struct PurgeResponse {
    pub deleted_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurgeQuery {
    pub days: Option<i64>,
}

/// `DELETE /earthquakes/old`
pub async fn purge_old(
    State(state): State<AppState>,
    Query(params): Query<PurgeQuery>,
) -> Result<Json<PurgeResponse>, ApiError> {
    let days = params.days.unwrap_or(state.config.query.retention_days);
    let deleted_count = state.store.purge_older_than(days).await?;
    Ok(Json(PurgeResponse {
        deleted_count,
        days: Some(days),
    }))
}

/// `DELETE /earthquakes`
pub async fn purge_all(State(state): State<AppState>) -> Result<Json<PurgeResponse>, ApiError> {
    let deleted_count = state.store.purge_all().await?;
    Ok(Json(PurgeResponse {
        deleted_count,
        days: None,
    }))
}
