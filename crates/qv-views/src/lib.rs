//! View system for the earthquake dashboard

mod space_view;
mod viewport;
mod filter;
mod controls;
mod detail;
mod export;
pub mod plots;
mod tables;

pub use space_view::{SpaceView, SpaceViewId};
pub use viewport::Viewport;
pub use filter::FilterCache;
pub use controls::controls_bar;
pub use detail::DetailView;
pub use export::{handle_export_request, visible_records, ExportStatus};
pub use tables::{TableView, TableConfig};
pub use plots::{ChartView, ChartConfig};

use std::sync::Arc;
use parking_lot::RwLock;
use qv_core::{Dataset, SelectionStore};

/// Context passed to views during rendering
#[derive(Clone)]
pub struct ViewerContext {
    /// Records installed by the last successful fetch
    pub dataset: Arc<RwLock<Dataset>>,

    /// Selection and place filter shared by all views
    pub selection: Arc<SelectionStore>,
}

impl ViewerContext {
    pub fn new(selection: Arc<SelectionStore>) -> Self {
        Self {
            dataset: Arc::new(RwLock::new(Dataset::default())),
            selection,
        }
    }

    /// Get the current dataset
    pub fn dataset(&self) -> Dataset {
        self.dataset.read().clone()
    }

    /// Install a new dataset
    pub fn set_dataset(&self, dataset: Dataset) {
        *self.dataset.write() = dataset;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use qv_core::Record;

    /// Dataset with one record per (id, place), magnitudes and coordinates
    /// varying with the position
    pub(crate) fn dataset(rows: &[(&str, &str)], version: u64) -> Dataset {
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, (id, place))| Record {
                id: id.to_string(),
                time: format!("2024-01-01T00:{:02}:00Z", i % 60),
                latitude: 30.0 + i as f64 * 0.5123,
                longitude: -120.0 + i as f64 * 0.25,
                depth: 5.0 + i as f64,
                magnitude: 1.5 + (i % 6) as f64,
                place: place.to_string(),
                extra: BTreeMap::new(),
            })
            .collect();
        Dataset::new(Arc::new(records), version)
    }

    #[test]
    fn test_chart_selection_reaches_table_same_frame() {
        let selection = Arc::new(SelectionStore::new());
        let ctx = ViewerContext::new(selection.clone());
        ctx.set_dataset(dataset(&[("a", "Alpha"), ("b", "Beta"), ("c", "Gamma")], 1));

        let mut chart = ChartView::new(SpaceViewId::new_v4(), "Chart".to_string(), ChartConfig::default());
        let mut table = TableView::new(SpaceViewId::new_v4(), "Table".to_string(), TableConfig::default());
        let data = ctx.dataset();

        chart.refresh_marks(&data, "");
        chart.select_mark(2, &ctx.selection);

        let selected = selection.selected_id();
        assert_eq!(selected.as_deref(), Some("c"));
        assert_eq!(table.scroll_target(&data.records, &[0, 1, 2], selected.as_deref()), Some(2));
    }

    #[test]
    fn test_filter_applies_to_both_views() {
        let selection = Arc::new(SelectionStore::new());
        let ctx = ViewerContext::new(selection.clone());
        ctx.set_dataset(dataset(&[("a", "Tokyo"), ("b", "Lima"), ("c", "tokyo bay")], 1));
        selection.set_filter_text("TOKYO");

        let data = ctx.dataset();
        let mut chart = ChartView::new(SpaceViewId::new_v4(), "Chart".to_string(), ChartConfig::default());
        chart.refresh_marks(&data, &selection.filter_text());
        let chart_ids: Vec<&str> = chart.marks().iter().map(|m| m.id.as_str()).collect();

        let mut filter = FilterCache::new();
        let indices = filter.get(&data, &selection.filter_text());
        let table_ids: Vec<&str> = visible_records(&data, &indices).map(|r| r.id.as_str()).collect();

        assert_eq!(chart_ids, vec!["a", "c"]);
        assert_eq!(chart_ids, table_ids);
    }
}
