//! Place filter results cached per dataset version and filter text

use std::sync::Arc;
use qv_core::{filter_by_place, Dataset};

/// Remembers the last filter result so views only rescan the records when
/// the dataset or the filter text changes
#[derive(Default)]
pub struct FilterCache {
    cached: Option<CachedFilter>,
}

struct CachedFilter {
    dataset_version: u64,
    filter: String,
    indices: Arc<Vec<usize>>,
}

impl FilterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indices into `dataset.records` matching `filter`, in input order
    pub fn get(&mut self, dataset: &Dataset, filter: &str) -> Arc<Vec<usize>> {
        if let Some(cached) = &self.cached {
            if cached.dataset_version == dataset.version && cached.filter == filter {
                return cached.indices.clone();
            }
        }

        let indices = Arc::new(filter_by_place(&dataset.records, filter));
        tracing::debug!("Filter '{}' matched {} of {} records", filter, indices.len(), dataset.len());
        self.cached = Some(CachedFilter {
            dataset_version: dataset.version,
            filter: filter.to_string(),
            indices: indices.clone(),
        });
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::dataset;

    #[test]
    fn test_reuses_result_until_inputs_change() {
        let mut cache = FilterCache::new();
        let data = dataset(&[("a", "Los Angeles"), ("b", "Tokyo")], 1);

        let first = cache.get(&data, "los");
        let second = cache.get(&data, "los");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, vec![0]);

        let widened = cache.get(&data, "");
        assert_eq!(*widened, vec![0, 1]);

        let refetched = dataset(&[("c", "Tokyo Bay")], 2);
        assert_eq!(*cache.get(&refetched, ""), vec![0]);
    }
}
