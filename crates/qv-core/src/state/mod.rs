use std::sync::Arc;
use serde::{Deserialize, Serialize};

use crate::record::{MeasureKey, Record};

/// The kind of chart drawn by the chart view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// One point per record, x and y measurements
    Scatter,
    /// One bar per record for the first `bar_limit` records
    Bar,
}

impl ChartKind {
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Scatter => "Scatter",
            ChartKind::Bar => "Bar",
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Initial x-axis measurement
    pub x_key: MeasureKey,

    /// Initial y-axis measurement
    pub y_key: MeasureKey,

    /// Initial chart kind
    pub chart_kind: ChartKind,

    /// Number of records shown by the bar chart
    pub bar_limit: usize,

    /// Hovering a table row selects it
    pub select_on_hover: bool,

    /// Theme settings
    pub theme: ThemeSettings,
}

/// Theme settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    /// UI scale factor
    pub scale_factor: f32,

    /// Whether to use dark mode
    pub dark_mode: bool,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            dark_mode: true,
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            x_key: MeasureKey::Magnitude,
            y_key: MeasureKey::Depth,
            chart_kind: ChartKind::Scatter,
            bar_limit: 20,
            select_on_hover: false,
            theme: ThemeSettings::default(),
        }
    }
}

/// The record collection currently shown by the views.
///
/// `version` changes every time a new fetch result is installed, so views can
/// key their derived caches on it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Arc<Vec<Record>>,
    pub version: u64,
}

impl Dataset {
    pub fn new(records: Arc<Vec<Record>>, version: u64) -> Self {
        Self { records, version }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id. Dangling ids simply miss.
    pub fn find(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::sample;

    #[test]
    fn test_settings_fill_missing_fields_from_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{ "chart_kind": "bar", "y_key": "magnitude" }"#).unwrap();
        assert_eq!(settings.chart_kind, ChartKind::Bar);
        assert_eq!(settings.y_key, MeasureKey::Magnitude);
        assert_eq!(settings.x_key, MeasureKey::Magnitude);
        assert_eq!(settings.bar_limit, 20);
        assert!(settings.theme.dark_mode);
    }

    #[test]
    fn test_dataset_lookup_misses_quietly() {
        let dataset = Dataset::new(Arc::new(vec![sample("a", "A", 1.0)]), 1);
        assert!(dataset.find("a").is_some());
        assert!(dataset.find("gone").is_none());
    }
}
