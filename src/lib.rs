//! nppa-isbn: game approval bulletin collector
//!
//! This crate walks the paginated bulletin listings of the five game approval
//! channels, extracts each bulletin's approval table into structured records,
//! and reports only the bulletins that are new or changed relative to a
//! persisted baseline.

pub mod channel;
pub mod config;
pub mod crawler;
pub mod output;
pub mod record;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

use crate::crawler::{ExtractError, FetchError};

/// Main error type for collection runs
#[derive(Debug, Error)]
pub enum IsbnError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction error for {channel}/{content_id}: {source}")]
    Extract {
        channel: Channel,
        content_id: String,
        source: ExtractError,
    },

    #[error("Listing layout error for {listing} page {page}: {message}")]
    Listing {
        listing: crate::url::Listing,
        page: u32,
        message: String,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unknown channel code: {0}")]
    UnknownChannel(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("URL {url} is outside the bulletin base {base}")]
    OutsideBase { url: String, base: String },

    #[error("Cannot derive a channel from {0}")]
    UnknownChannel(String),

    #[error("Cannot derive a document id from {0}")]
    MissingDocumentId(String),

    #[error("No numeric channel id configured for {0}")]
    MissingChannelId(Channel),

    #[error("The configured URL scheme has no {0} listing")]
    UnsupportedListing(crate::url::Listing),
}

/// Result type alias for collection operations
pub type Result<T> = std::result::Result<T, IsbnError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use channel::{Channel, ChannelLayout};
pub use config::Config;
pub use crawler::{CollectMode, CollectReport, Collector};
pub use record::{Content, ContentStub, Item};
pub use state::StubOutcome;
