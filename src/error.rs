//! Custom error types for quakewatch

use thiserror::Error;

/// Main error type for quakewatch operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A single feed feature (or the feed envelope itself) could not be
    /// normalized. Per-record occurrences are recovered by the caller;
    /// the batch continues.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Caller supplied an unrecognized time-range label or an
    /// out-of-domain parameter.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The persistence layer itself failed.
    #[error("Storage unavailable: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

/// Result type alias for quakewatch
pub type Result<T> = std::result::Result<T, Error>;
