//! quakewatch: seismic event feed scraper with a local SQLite store
//!
//! The pipeline is fetch → normalize → save: raw GeoJSON summary-feed
//! bytes are flattened into [`models::EventRecord`]s and upserted by id
//! into the store. Read paths (listings, statistics) go straight to the
//! store; the normalizer is not involved.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod models;
pub mod store;

pub use error::{Error, Result};
