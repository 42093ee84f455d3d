//! Upstream feed configuration

use std::time::Duration;
use serde::{Serialize, Deserialize};

/// USGS summary feed, all events of the past month
pub const USGS_ALL_MONTH_CSV: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_month.csv";

/// Where to fetch from and how long a result stays fresh
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Feed URL, fetched with a plain GET
    pub url: String,

    /// Freshness window in seconds
    pub freshness_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: USGS_ALL_MONTH_CSV.to_string(),
            // 5 minutes
            freshness_secs: 300,
        }
    }
}

impl FeedConfig {
    /// Freshness window as a duration
    pub fn freshness(&self) -> Duration {
        Duration::from_secs(self.freshness_secs)
    }
}
