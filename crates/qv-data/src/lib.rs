//! Feed retrieval, normalization and export for the earthquake dashboard

pub mod cache;
pub mod config;
pub mod export;
pub mod normalize;
pub mod query;
pub mod sources;

use tokio::task::JoinError;
use thiserror::Error;

// Re-exports
pub use cache::FreshnessCache;
pub use config::{CoordinatePolicy, DashboardConfig, FeedConfig, NormalizerConfig, CONFIG_FILE_NAME};
pub use export::{export_to_file, to_csv_string, write_csv, EXPORT_FILE_NAME};
pub use normalize::{normalize, normalize_with};
pub use query::{EarthquakeQuery, QueryState};
pub use sources::{FeedSource, HttpFeedSource};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed {url} answered with status {status}")]
    Status { status: u16, url: String },

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),

    /// A concurrent request for the same cache miss already failed with this message
    #[error("Feed request failed: {0}")]
    Failed(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(error: serde_json::Error) -> Self {
        DataError::Config(error.to_string())
    }
}
