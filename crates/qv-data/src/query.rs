//! Earthquake feed query: fetch, normalize and cache with a freshness window

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use qv_core::events::events;
use qv_core::{EventBus, Record};
use tokio::runtime::Handle;

use crate::cache::FreshnessCache;
use crate::config::{DashboardConfig, NormalizerConfig};
use crate::normalize::normalize_with;
use crate::sources::FeedSource;
use crate::DataError;

/// Observable state of the query
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    /// Last successfully normalized records
    pub data: Option<Arc<Vec<Record>>>,

    /// A retrieval is in progress
    pub is_loading: bool,

    /// Message of the last failed retrieval, cleared by the next success
    pub error: Option<String>,

    /// Incremented each time new data is installed
    pub data_version: u64,
}

/// Fetches the feed at most once per cache miss and serves the normalized
/// result until the freshness window runs out
pub struct EarthquakeQuery {
    source: Arc<dyn FeedSource>,
    normalizer: NormalizerConfig,
    cache: FreshnessCache<Arc<Vec<Record>>>,
    state: RwLock<QueryState>,

    /// Serializes retrievals
    fetch_lock: tokio::sync::Mutex<()>,

    /// Set while a task spawned by `request` is running
    in_flight: AtomicBool,

    /// Number of finished retrievals, successful or not
    settled: AtomicU64,

    event_bus: Option<Arc<EventBus>>,
}

impl EarthquakeQuery {
    /// Create a query over `source`
    pub fn new(source: Arc<dyn FeedSource>, freshness: Duration, normalizer: NormalizerConfig) -> Self {
        Self {
            source,
            normalizer,
            cache: FreshnessCache::new(freshness),
            state: RwLock::new(QueryState::default()),
            fetch_lock: tokio::sync::Mutex::new(()),
            in_flight: AtomicBool::new(false),
            settled: AtomicU64::new(0),
            event_bus: None,
        }
    }

    /// Create a query using the feed and normalizer sections of `config`
    pub fn from_config(source: Arc<dyn FeedSource>, config: &DashboardConfig) -> Self {
        Self::new(source, config.feed.freshness(), config.normalizer.clone())
    }

    /// Publish load/failure events on `event_bus`
    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Get the current state
    pub fn snapshot(&self) -> QueryState {
        self.state.read().clone()
    }

    /// Whether a cached result can be served right now
    pub fn is_fresh(&self) -> bool {
        self.cache.is_fresh(Instant::now())
    }

    pub fn source_name(&self) -> &str {
        self.source.source_name()
    }

    /// Get the records, retrieving them only if the cache is stale.
    ///
    /// Callers that queue up behind a retrieval share its outcome instead of
    /// starting another one.
    pub async fn fetch(&self) -> Result<Arc<Vec<Record>>, DataError> {
        let seen = self.settled.load(Ordering::SeqCst);
        let _guard = self.fetch_lock.lock().await;

        if let Some(records) = self.cache.get_fresh(Instant::now()) {
            tracing::debug!("Serving {} cached records", records.len());
            return Ok(records);
        }

        if self.settled.load(Ordering::SeqCst) != seen {
            if let Some(error) = self.state.read().error.clone() {
                return Err(DataError::Failed(error));
            }
        }

        self.state.write().is_loading = true;
        let result = self.retrieve().await;
        self.settled.fetch_add(1, Ordering::SeqCst);

        {
            let mut state = self.state.write();
            state.is_loading = false;
            match &result {
                Ok(records) => {
                    self.cache.put(records.clone(), Instant::now());
                    state.data = Some(records.clone());
                    state.error = None;
                    state.data_version += 1;
                }
                Err(e) => {
                    state.error = Some(e.to_string());
                }
            }
        }

        match &result {
            Ok(records) => {
                tracing::info!("Loaded {} records from {}", records.len(), self.source_name());
                if let Some(bus) = &self.event_bus {
                    bus.publish(events::FeedLoaded {
                        source_name: self.source_name().to_string(),
                        row_count: records.len(),
                    });
                }
            }
            Err(e) => {
                tracing::error!("Failed to load {}: {}", self.source_name(), e);
                if let Some(bus) = &self.event_bus {
                    bus.publish(events::FeedFailed {
                        source_name: self.source_name().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        result
    }

    /// Start a background fetch on `handle` unless the cache is fresh or a
    /// fetch is already running. `on_settled` runs once the fetch finishes.
    ///
    /// Returns whether a fetch was started.
    pub fn request<F>(self: &Arc<Self>, handle: &Handle, on_settled: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_fresh() {
            return false;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        let query = Arc::clone(self);
        handle.spawn(async move {
            // Failures are recorded in the state by `fetch`
            let _ = query.fetch().await;
            query.in_flight.store(false, Ordering::SeqCst);
            on_settled();
        });

        true
    }

    /// Drop the cached result so the next request retrieves again.
    ///
    /// The last data stays visible until the new result arrives.
    pub fn invalidate(&self) {
        tracing::debug!("Invalidating cached feed");
        self.cache.clear();
    }

    async fn retrieve(&self) -> Result<Arc<Vec<Record>>, DataError> {
        let text = self.source.fetch_text().await?;
        let config = self.normalizer.clone();
        let records = tokio::task::spawn_blocking(move || normalize_with(&text, &config)).await?;
        Ok(Arc::new(records))
    }
}
