use async_trait::async_trait;

use super::FeedSource;
use crate::config::FeedConfig;
use crate::DataError;

/// Feed source doing a single HTTP GET per retrieval
pub struct HttpFeedSource {
    client: reqwest::Client,
    url: String,
}

impl HttpFeedSource {
    /// Create a source for `url`
    pub fn new(url: impl Into<String>) -> Result<Self, DataError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("quakeview/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Create a source from the feed configuration
    pub fn from_config(config: &FeedConfig) -> Result<Self, DataError> {
        Self::new(config.url.clone())
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_text(&self) -> Result<String, DataError> {
        tracing::info!("Fetching feed from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let text = response.text().await?;
        tracing::debug!("Received {} bytes from {}", text.len(), self.url);
        Ok(text)
    }

    fn source_name(&self) -> &str {
        &self.url
    }
}
