//! Table view implementation

use egui::{Align, Label, Layout, Sense, Ui};
use egui_extras::{Column, TableBuilder};
use qv_core::{AppSettings, Dataset, Record, SelectionStore};

use crate::export::{handle_export_request, show_export_button, visible_records, ExportStatus};
use crate::plots::utils::colors::SELECTED_FILL;
use crate::{FilterCache, SpaceView, SpaceViewId, ViewerContext};

const COLUMN_TITLES: [&str; 6] = ["Time", "Place", "Magnitude", "Depth", "Lat", "Lon"];

/// Configuration for table views
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Hovering a row selects it, not only clicking
    pub select_on_hover: bool,
    pub striped_rows: bool,
    pub resizable_columns: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            select_on_hover: false,
            striped_rows: true,
            resizable_columns: true,
        }
    }
}

impl TableConfig {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            select_on_hover: settings.select_on_hover,
            ..Self::default()
        }
    }
}

/// Cell texts for one row
pub fn format_row(record: &Record) -> [String; 6] {
    [
        record.time.clone(),
        record.place.clone(),
        record.magnitude.to_string(),
        record.depth.to_string(),
        format!("{:.3}", record.latitude),
        format!("{:.3}", record.longitude),
    ]
}

/// Position of the record with `id` among the filtered rows
pub fn row_position(records: &[Record], indices: &[usize], id: &str) -> Option<usize> {
    indices
        .iter()
        .position(|&idx| records.get(idx).map_or(false, |r| r.id == id))
}

/// Table view that lists the filtered records
pub struct TableView {
    id: SpaceViewId,
    title: String,
    pub config: TableConfig,

    // State
    filter_cache: FilterCache,
    /// Selection the view has already reacted to
    last_selected: Option<String>,
    export_status: Option<ExportStatus>,
}

impl TableView {
    /// Create a new table view
    pub fn new(id: SpaceViewId, title: String, config: TableConfig) -> Self {
        Self {
            id,
            title,
            config,
            filter_cache: FilterCache::new(),
            last_selected: None,
            export_status: None,
        }
    }

    /// Row to scroll to this frame.
    ///
    /// Only a selection change made elsewhere scrolls; a selection the table
    /// made itself is already on screen.
    pub fn scroll_target(&mut self, records: &[Record], indices: &[usize], selected: Option<&str>) -> Option<usize> {
        if self.last_selected.as_deref() == selected {
            return None;
        }
        self.last_selected = selected.map(str::to_string);
        row_position(records, indices, selected?)
    }

    /// Select a row the user interacted with
    pub fn select_row(&mut self, id: String, selection: &SelectionStore) {
        self.last_selected = Some(id.clone());
        selection.set_selected_id(Some(id));
    }

    /// Draw the rows. Returns the id of the record the user picked, if any.
    fn render_table(
        &self,
        ui: &mut Ui,
        dataset: &Dataset,
        indices: &[usize],
        selected: Option<&str>,
        scroll_to: Option<usize>,
    ) -> Option<String> {
        let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 1.5;
        let highlight = SELECTED_FILL.gamma_multiply(0.35);
        let select_on_hover = self.config.select_on_hover;
        let mut picked = None;

        let mut builder = TableBuilder::new(ui)
            .striped(self.config.striped_rows)
            .resizable(self.config.resizable_columns)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::initial(180.0).at_least(90.0).clip(true))
            .column(Column::initial(240.0).at_least(100.0).clip(true))
            .columns(Column::initial(75.0).at_least(50.0), 4)
            .min_scrolled_height(0.0)
            .vscroll(true);

        if let Some(row) = scroll_to {
            builder = builder.scroll_to_row(row, Some(Align::Center));
        }

        builder
            .header(20.0, |mut header| {
                for title in COLUMN_TITLES {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(text_height, indices.len(), |row_index, mut row| {
                    let Some(record) = indices.get(row_index).and_then(|&idx| dataset.records.get(idx)) else {
                        return;
                    };
                    let is_selected = selected == Some(record.id.as_str());

                    for cell in format_row(record) {
                        row.col(|ui| {
                            if is_selected {
                                ui.painter().rect_filled(ui.available_rect_before_wrap(), 0.0, highlight);
                            }
                            let response = ui.add(Label::new(cell).sense(Sense::click()));
                            if response.clicked() || (select_on_hover && response.hovered()) {
                                picked = Some(record.id.clone());
                            }
                        });
                    }
                });
            });

        picked
    }
}

impl SpaceView for TableView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "TableView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let dataset = ctx.dataset();
        let selection = ctx.selection.snapshot();
        let indices = self.filter_cache.get(&dataset, &selection.filter_text);

        ui.horizontal(|ui| {
            ui.label(format!("Rows: {} of {}", indices.len(), dataset.len()));

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if show_export_button(ui, !indices.is_empty()) {
                    if let Some(status) = handle_export_request(visible_records(&dataset, &indices)) {
                        self.export_status = Some(status);
                    }
                }
                if let Some(status) = &self.export_status {
                    ui.colored_label(status.color(), status.message());
                }
            });
        });

        ui.add_space(4.0);

        if indices.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("No records match the filter");
            });
            return;
        }

        let selected = selection.selected_id.as_deref();
        let scroll_to = self.scroll_target(&dataset.records, &indices, selected);
        if let Some(id) = self.render_table(ui, &dataset, &indices, selected, scroll_to) {
            self.select_row(id, &ctx.selection);
        }
    }
}
