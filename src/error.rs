//! Error types for Hark.

use thiserror::Error;

/// Library-level error type for Hark operations.
#[derive(Error, Debug)]
pub enum HarkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load chunk {chunk}: {reason}")]
    ChunkLoad { chunk: u32, reason: String },

    #[error("Episode index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Invalid episode data: {0}")]
    InvalidData(String),

    #[error("Episode not found: {0}")]
    EpisodeNotFound(String),

    #[error("Progress store error: {0}")]
    Progress(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl HarkError {
    /// Wrap any error raised while fetching or decoding a chunk.
    pub fn chunk_load(chunk: u32, reason: impl std::fmt::Display) -> Self {
        HarkError::ChunkLoad {
            chunk,
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for Hark operations.
pub type Result<T> = std::result::Result<T, HarkError>;
