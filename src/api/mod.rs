//! HTTP API transport
//!
//! Thin axum layer over the store and the scrape pipeline. Handlers do
//! no domain work of their own: they parse parameters, call into the
//! core, and map typed errors onto status codes.

mod error;
mod routes;

pub use error::ApiError;

use crate::config::Config;
use crate::error::Result;
use crate::store::EventStore;
use axum::http::Request;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: EventStore,
}

/// Build the complete API router.
///
/// - `GET    /health` - Health check
/// - `POST   /scrape` - Fetch and ingest a feed window
/// - `GET    /earthquakes` - List all events
/// - `GET    /earthquakes/recent` - Events from the last N hours
/// - `GET    /earthquakes/magnitude` - Filter by magnitude range
/// - `GET    /earthquakes/location` - Filter by location substring
/// - `GET    /statistics` - Aggregate statistics
/// - `GET    /history` - Scrape audit trail
/// - `DELETE /earthquakes/old` - Purge events by age
/// - `DELETE /earthquakes` - Purge all events
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health_check))
        .route("/scrape", post(routes::scrape))
        .route("/earthquakes", get(routes::list_all).delete(routes::purge_all))
        .route("/earthquakes/recent", get(routes::list_recent))
        .route("/earthquakes/magnitude", get(routes::list_by_magnitude))
        .route("/earthquakes/location", get(routes::list_by_location))
        .route("/earthquakes/old", delete(routes::purge_old))
        .route("/statistics", get(routes::statistics))
        .route("/history", get(routes::history))
        .with_state(state)
}

/// Run the API server until shutdown
pub async fn serve(config: Config, store: EventStore) -> Result<()> {
    let bind_addr = config.server.bind_addr.clone();
    let state = AppState { config, store };

    let app = router(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    query = request.uri().query().unwrap_or("")
                )
            }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "starting API server");

    axum::serve(listener, app).await?;
    Ok(())
}
