//! Dashboard configuration

pub mod feed_config;
pub mod normalizer_config;

pub use feed_config::*;
pub use normalizer_config::*;

use std::path::Path;

use serde::{Serialize, Deserialize};
use qv_core::AppSettings;

use crate::DataError;

/// Optional config file read from the working directory at startup
pub const CONFIG_FILE_NAME: &str = "quakeview.json";

/// Complete dashboard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub feed: FeedConfig,
    pub normalizer: NormalizerConfig,
    pub settings: AppSettings,
}

impl DashboardConfig {
    /// Parse a JSON document; missing sections and fields keep their defaults
    pub fn from_json(text: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load the config file at `path`, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, DataError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config = Self::from_json(&text)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
