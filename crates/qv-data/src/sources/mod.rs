pub mod http_source;

pub use http_source::HttpFeedSource;

use async_trait::async_trait;

use crate::DataError;

/// Something that can produce the raw feed text
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Retrieve the whole feed as text
    async fn fetch_text(&self) -> Result<String, DataError>;

    /// Get the source name/URL
    fn source_name(&self) -> &str;
}
