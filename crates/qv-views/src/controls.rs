//! Chart controls: axis keys, chart kind and the place filter

use egui::Ui;
use qv_core::{ChartKind, MeasureKey, SelectionStore};

use crate::plots::ChartConfig;

/// Draw the controls bar above the chart.
///
/// Axis and kind changes go into `config`; the filter text goes straight into
/// the selection store so the table sees it in the same frame.
pub fn controls_bar(ui: &mut Ui, config: &mut ChartConfig, selection: &SelectionStore) {
    ui.horizontal(|ui| {
        ui.add_enabled_ui(config.kind == ChartKind::Scatter, |ui| {
            measure_combo(ui, "chart_x_key", "X:", &mut config.x_key);
        });
        measure_combo(ui, "chart_y_key", "Y:", &mut config.y_key);

        ui.separator();

        for kind in [ChartKind::Scatter, ChartKind::Bar] {
            ui.selectable_value(&mut config.kind, kind, kind.label());
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let mut filter = selection.filter_text();
            let response = ui.add(
                egui::TextEdit::singleline(&mut filter)
                    .hint_text("Filter place...")
                    .desired_width(180.0),
            );
            if response.changed() {
                selection.set_filter_text(filter);
            }
        });
    });
}

fn measure_combo(ui: &mut Ui, id: &str, label: &str, key: &mut MeasureKey) {
    ui.label(label);
    egui::ComboBox::from_id_source(id)
        .selected_text(key.label())
        .show_ui(ui, |ui| {
            for option in MeasureKey::ALL {
                ui.selectable_value(key, option, option.label());
            }
        });
}
