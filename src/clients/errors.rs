use rspotify::ClientError;
use thiserror::Error;

/// Errors raised while crawling the catalog or writing to local storage
#[derive(Error, Debug)]
pub enum Error {
    #[error("Spotify error: {0}")]
    SpotifyError(#[from] ClientError),

    #[error("Spotify deserialization error: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Spotify API unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Malformed track at position {position}: {reason}")]
    MalformedTrack { position: usize, reason: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] async_duckdb::Error),
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
