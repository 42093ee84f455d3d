//! Chart view: scatter or bar chart of the filtered records

use egui::{Pos2, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points};
use qv_core::{AppSettings, ChartKind, Dataset, MeasureKey, Record, SelectionStore};

use super::utils::colors::{magnitude_color, MagnitudeClass, SELECTED_FILL, SELECTED_STROKE};
use crate::{controls_bar, FilterCache, SpaceView, SpaceViewId, ViewerContext};

/// Maximum screen distance, in points, for a click to hit a scatter mark
const HIT_RADIUS: f32 = 8.0;

/// Longest bar label before truncation
const MAX_LABEL_CHARS: usize = 18;

/// Chart configuration
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// X-axis measurement (scatter only)
    pub x_key: MeasureKey,

    /// Y-axis measurement
    pub y_key: MeasureKey,

    pub kind: ChartKind,

    /// Number of leading records drawn as bars
    pub bar_limit: usize,

    /// Whether to show grid
    pub show_grid: bool,

    /// Bar width factor (0.0 to 1.0)
    pub bar_width: f32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::from_settings(&AppSettings::default())
    }
}

impl ChartConfig {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            x_key: settings.x_key,
            y_key: settings.y_key,
            kind: settings.chart_kind,
            bar_limit: settings.bar_limit,
            show_grid: true,
            bar_width: 0.7,
        }
    }
}

/// One drawable mark, tied to its record by id
#[derive(Debug, Clone, PartialEq)]
pub struct ChartMark {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub magnitude: f64,
    pub label: String,
}

/// Everything the derived marks depend on
#[derive(Debug, Clone, PartialEq, Eq)]
struct ChartCacheKey {
    dataset_version: u64,
    filter: String,
    x_key: MeasureKey,
    y_key: MeasureKey,
    kind: ChartKind,
    bar_limit: usize,
}

/// Build the marks for the records at `indices`.
///
/// Scatter charts get one mark per record. Bar charts take the first
/// `bar_limit` records and lay them out at x = 0, 1, 2...
pub fn derive_marks(records: &[Record], indices: &[usize], config: &ChartConfig) -> Vec<ChartMark> {
    let selected = indices.iter().filter_map(|&idx| records.get(idx));

    match config.kind {
        ChartKind::Scatter => selected
            .map(|r| ChartMark {
                id: r.id.clone(),
                x: r.measure(config.x_key),
                y: r.measure(config.y_key),
                magnitude: r.magnitude,
                label: r.place.clone(),
            })
            .collect(),
        ChartKind::Bar => selected
            .take(config.bar_limit)
            .enumerate()
            .map(|(i, r)| ChartMark {
                id: r.id.clone(),
                x: i as f64,
                y: r.measure(config.y_key),
                magnitude: r.magnitude,
                label: truncate_label(&r.place, MAX_LABEL_CHARS),
            })
            .collect(),
    }
}

/// Shorten a place name for a bar label
pub fn truncate_label(place: &str, max_chars: usize) -> String {
    if place.is_empty() {
        return "Unknown".to_string();
    }
    if place.chars().count() > max_chars {
        let mut label: String = place.chars().take(max_chars).collect();
        label.push('…');
        label
    } else {
        place.to_string()
    }
}

/// Index of the mark closest to `pointer` within `max_distance` screen points
pub fn nearest_mark<F>(marks: &[ChartMark], pointer: Pos2, to_screen: F, max_distance: f32) -> Option<usize>
where
    F: Fn(&ChartMark) -> Pos2,
{
    marks
        .iter()
        .enumerate()
        .map(|(i, mark)| (i, to_screen(mark).distance(pointer)))
        .filter(|(_, distance)| *distance <= max_distance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Index of the bar under the plot coordinate (`x`, `y`)
pub fn bar_at(marks: &[ChartMark], x: f64, y: f64, width: f64) -> Option<usize> {
    let slot = x.round();
    if slot < 0.0 {
        return None;
    }
    let index = slot as usize;
    let mark = marks.get(index)?;

    if (x - mark.x).abs() > width / 2.0 {
        return None;
    }
    let (low, high) = if mark.y >= 0.0 { (0.0, mark.y) } else { (mark.y, 0.0) };
    (y >= low && y <= high).then_some(index)
}

/// Chart view
pub struct ChartView {
    id: SpaceViewId,
    title: String,
    pub config: ChartConfig,

    // State
    filter_cache: FilterCache,
    cache_key: Option<ChartCacheKey>,
    marks: Vec<ChartMark>,
    /// Scatter points grouped by magnitude band, derived with `marks`
    class_points: Vec<(MagnitudeClass, Vec<[f64; 2]>)>,
}

impl ChartView {
    /// Create a new chart view
    pub fn new(id: SpaceViewId, title: String, config: ChartConfig) -> Self {
        Self {
            id,
            title,
            config,
            filter_cache: FilterCache::new(),
            cache_key: None,
            marks: Vec::new(),
            class_points: Vec::new(),
        }
    }

    /// Current marks
    pub fn marks(&self) -> &[ChartMark] {
        &self.marks
    }

    /// Re-derive the marks if the dataset, the filter or the chart
    /// configuration changed. Returns whether they were re-derived.
    pub fn refresh_marks(&mut self, dataset: &Dataset, filter: &str) -> bool {
        let key = ChartCacheKey {
            dataset_version: dataset.version,
            filter: filter.to_string(),
            x_key: self.config.x_key,
            y_key: self.config.y_key,
            kind: self.config.kind,
            bar_limit: self.config.bar_limit,
        };
        if self.cache_key.as_ref() == Some(&key) {
            return false;
        }

        let indices = self.filter_cache.get(dataset, filter);
        self.marks = derive_marks(&dataset.records, &indices, &self.config);
        self.class_points = MagnitudeClass::ALL
            .into_iter()
            .map(|class| {
                let points = self
                    .marks
                    .iter()
                    .filter(|m| MagnitudeClass::from_magnitude(m.magnitude) == class)
                    .map(|m| [m.x, m.y])
                    .collect();
                (class, points)
            })
            .collect();
        self.cache_key = Some(key);

        tracing::debug!("Derived {} {} marks", self.marks.len(), self.config.kind.label());
        true
    }

    /// Make the record behind mark `index` the selection
    pub fn select_mark(&self, index: usize, selection: &SelectionStore) {
        if let Some(mark) = self.marks.get(index) {
            selection.set_selected_id(Some(mark.id.clone()));
        }
    }

    /// Plot memory id. Changing the chart kind or an axis starts from fresh bounds.
    pub fn plot_id(&self) -> egui::Id {
        egui::Id::new((self.id, self.config.kind, self.config.x_key, self.config.y_key))
    }

    fn selected_mark(&self, selected: Option<&str>) -> Option<&ChartMark> {
        let selected = selected?;
        self.marks.iter().find(|m| m.id == selected)
    }

    /// Draw the scatter plot. Returns the hovered mark and whether the plot was clicked.
    fn show_scatter(&self, ui: &mut Ui, selected: Option<&str>) -> (Option<usize>, bool) {
        let plot = Plot::new(self.plot_id())
            .legend(Legend::default())
            .show_grid(self.config.show_grid)
            .x_axis_label(self.config.x_key.label())
            .y_axis_label(self.config.y_key.label())
            .allow_zoom(true)
            .allow_drag(true)
            .allow_boxed_zoom(true);

        let marks = &self.marks;
        let selected_mark = self.selected_mark(selected);

        let response = plot.show(ui, |plot_ui| {
            for (class, points) in &self.class_points {
                if points.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(PlotPoints::from(points.clone()))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(class.radius())
                        .color(class.color())
                        .name(class.label()),
                );
            }

            if let Some(mark) = selected_mark {
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![[mark.x, mark.y]]))
                        .shape(MarkerShape::Circle)
                        .filled(false)
                        .radius(10.0)
                        .color(SELECTED_STROKE),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![[mark.x, mark.y]]))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(7.0)
                        .color(SELECTED_FILL)
                        .name("Selected"),
                );
            }

            let pointer = plot_ui.pointer_coordinate()?;
            let pointer = plot_ui.screen_from_plot(pointer);
            nearest_mark(
                marks,
                pointer,
                |mark| plot_ui.screen_from_plot(PlotPoint::new(mark.x, mark.y)),
                HIT_RADIUS,
            )
        });

        (response.inner, response.response.clicked())
    }

    /// Draw the bar chart. Returns the hovered bar and whether the plot was clicked.
    fn show_bars(&self, ui: &mut Ui, selected: Option<&str>) -> (Option<usize>, bool) {
        let plot = Plot::new(self.plot_id())
            .show_grid(self.config.show_grid)
            .x_axis_label("Record")
            .y_axis_label(self.config.y_key.label())
            .allow_zoom(true)
            .allow_drag(true)
            .allow_boxed_zoom(true);

        let marks = &self.marks;
        let width = self.config.bar_width as f64;

        let response = plot.show(ui, |plot_ui| {
            let bars = marks
                .iter()
                .map(|mark| {
                    let bar = Bar::new(mark.x, mark.y).width(width).name(&mark.label);
                    if selected == Some(mark.id.as_str()) {
                        bar.fill(SELECTED_FILL).stroke(Stroke::new(2.0, SELECTED_STROKE))
                    } else {
                        bar.fill(magnitude_color(mark.magnitude))
                    }
                })
                .collect();

            plot_ui.bar_chart(BarChart::new(bars).name(self.config.y_key.label()));

            let pointer = plot_ui.pointer_coordinate()?;
            bar_at(marks, pointer.x, pointer.y, width)
        });

        (response.inner, response.response.clicked())
    }
}

impl SpaceView for ChartView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "ChartView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        controls_bar(ui, &mut self.config, &ctx.selection);
        ui.separator();

        let dataset = ctx.dataset();
        let selection = ctx.selection.snapshot();
        self.refresh_marks(&dataset, &selection.filter_text);

        if self.marks.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("No records match the filter");
            });
            return;
        }

        let selected = selection.selected_id.as_deref();
        let (hovered, clicked) = match self.config.kind {
            ChartKind::Scatter => self.show_scatter(ui, selected),
            ChartKind::Bar => self.show_bars(ui, selected),
        };

        if let Some(index) = hovered {
            if let Some(mark) = self.marks.get(index) {
                egui::show_tooltip_text(ui.ctx(), egui::Id::new(("chart_hover", self.id)), format!(
                    "{}\nM {:.1} · {} {:.2}",
                    mark.label,
                    mark.magnitude,
                    self.config.y_key.short_name(),
                    mark.y,
                ));
            }
        }

        if clicked {
            if let Some(index) = hovered {
                self.select_mark(index, &ctx.selection);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::dataset;

    fn records() -> Dataset {
        dataset(
            &[
                ("a", "10km NE of Ridgecrest, CA"),
                ("b", "Tokyo"),
                ("c", "Central Alaska"),
            ],
            1,
        )
    }

    #[test]
    fn test_scatter_marks_follow_axis_keys() {
        let data = records();
        let config = ChartConfig {
            kind: ChartKind::Scatter,
            x_key: MeasureKey::Longitude,
            y_key: MeasureKey::Magnitude,
            ..ChartConfig::default()
        };
        let marks = derive_marks(&data.records, &[0, 2], &config);

        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].id, "a");
        assert_eq!(marks[1].id, "c");
        assert_eq!(marks[1].x, data.records[2].longitude);
        assert_eq!(marks[1].y, data.records[2].magnitude);
    }

    #[test]
    fn test_bar_marks_are_truncated_to_limit() {
        let places: Vec<(String, String)> = (0..25)
            .map(|i| (format!("id{}", i), format!("Place number {}", i)))
            .collect();
        let borrowed: Vec<(&str, &str)> = places.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
        let data = dataset(&borrowed, 1);
        let indices: Vec<usize> = (0..25).collect();

        let config = ChartConfig {
            kind: ChartKind::Bar,
            bar_limit: 20,
            ..ChartConfig::default()
        };
        let marks = derive_marks(&data.records, &indices, &config);

        assert_eq!(marks.len(), 20);
        assert_eq!(marks[3].x, 3.0);
        assert_eq!(marks[19].id, "id19");
    }

    #[test]
    fn test_label_truncation() {
        assert_eq!(truncate_label("Tokyo", 18), "Tokyo");
        assert_eq!(truncate_label("10km NE of Ridgecrest, CA", 18), "10km NE of Ridgecr…");
        assert_eq!(truncate_label("", 18), "Unknown");
    }

    #[test]
    fn test_marks_rederived_on_key_change_only() {
        let data = records();
        let mut view = ChartView::new(SpaceViewId::new_v4(), "Chart".to_string(), ChartConfig::default());

        assert!(view.refresh_marks(&data, ""));
        assert!(!view.refresh_marks(&data, ""));

        view.config.y_key = MeasureKey::Latitude;
        assert!(view.refresh_marks(&data, ""));
        assert_eq!(view.marks()[0].y, data.records[0].latitude);

        assert!(view.refresh_marks(&data, "tokyo"));
        assert_eq!(view.marks().len(), 1);

        let refetched = Dataset::new(data.records.clone(), 2);
        assert!(view.refresh_marks(&refetched, "tokyo"));
    }

    #[test]
    fn test_plot_id_tracks_kind_and_axes() {
        let mut view = ChartView::new(SpaceViewId::new_v4(), "Chart".to_string(), ChartConfig::default());
        let initial = view.plot_id();
        assert_eq!(view.plot_id(), initial);

        view.config.y_key = MeasureKey::Latitude;
        let by_y = view.plot_id();
        assert_ne!(by_y, initial);

        view.config.x_key = MeasureKey::Longitude;
        let by_x = view.plot_id();
        assert_ne!(by_x, by_y);

        view.config.kind = ChartKind::Bar;
        assert_ne!(view.plot_id(), by_x);

        let other = ChartView::new(SpaceViewId::new_v4(), "Chart".to_string(), view.config.clone());
        assert_ne!(other.plot_id(), view.plot_id());
    }

    #[test]
    fn test_nearest_mark_within_radius() {
        let data = records();
        let config = ChartConfig {
            x_key: MeasureKey::Latitude,
            y_key: MeasureKey::Longitude,
            ..ChartConfig::default()
        };
        let mut marks = derive_marks(&data.records, &[0, 1, 2], &config);
        marks[0].x = 0.0;
        marks[0].y = 0.0;
        marks[1].x = 10.0;
        marks[1].y = 0.0;
        marks[2].x = 100.0;
        marks[2].y = 100.0;

        let identity = |m: &ChartMark| Pos2::new(m.x as f32, m.y as f32);
        assert_eq!(nearest_mark(&marks, Pos2::new(7.0, 0.0), identity, 8.0), Some(1));
        assert_eq!(nearest_mark(&marks, Pos2::new(2.0, 1.0), identity, 8.0), Some(0));
        assert_eq!(nearest_mark(&marks, Pos2::new(50.0, 50.0), identity, 8.0), None);
    }

    #[test]
    fn test_bar_hit_testing() {
        let mark = |x: f64, y: f64| ChartMark {
            id: format!("{}", x),
            x,
            y,
            magnitude: 1.0,
            label: String::new(),
        };
        let marks = vec![mark(0.0, 5.0), mark(1.0, -2.0)];

        assert_eq!(bar_at(&marks, 0.1, 4.0, 0.7), Some(0));
        assert_eq!(bar_at(&marks, 0.1, 6.0, 0.7), None);
        assert_eq!(bar_at(&marks, 0.45, 1.0, 0.7), None);
        assert_eq!(bar_at(&marks, 1.2, -1.0, 0.7), Some(1));
        assert_eq!(bar_at(&marks, 2.0, 1.0, 0.7), None);
        assert_eq!(bar_at(&marks, -0.9, 1.0, 0.7), None);
    }

    #[test]
    fn test_select_mark_writes_store() {
        let data = records();
        let store = SelectionStore::new();
        let mut view = ChartView::new(SpaceViewId::new_v4(), "Chart".to_string(), ChartConfig::default());
        view.refresh_marks(&data, "");

        view.select_mark(1, &store);
        assert_eq!(store.selected_id().as_deref(), Some("b"));

        view.select_mark(99, &store);
        assert_eq!(store.selected_id().as_deref(), Some("b"));
    }
}
