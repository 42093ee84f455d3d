//! CSV export of the filtered records through a save dialog

use std::path::PathBuf;

use egui::{Color32, Ui};
use qv_core::{Dataset, Record};
use qv_data::{export_to_file, EXPORT_FILE_NAME};

/// Outcome of the last export, shown next to the export button
#[derive(Debug, Clone, PartialEq)]
pub enum ExportStatus {
    Saved(PathBuf),
    Failed(String),
}

impl ExportStatus {
    pub fn message(&self) -> String {
        match self {
            ExportStatus::Saved(path) => format!("Saved {}", path.display()),
            ExportStatus::Failed(error) => format!("Export failed: {}", error),
        }
    }

    pub fn color(&self) -> Color32 {
        match self {
            ExportStatus::Saved(_) => Color32::from_rgb(34, 197, 94),
            ExportStatus::Failed(_) => Color32::from_rgb(239, 68, 68),
        }
    }
}

/// Records at `indices`, in order
pub fn visible_records<'a>(dataset: &'a Dataset, indices: &'a [usize]) -> impl Iterator<Item = &'a Record> + 'a {
    indices.iter().filter_map(|&idx| dataset.records.get(idx))
}

/// Write `records` to `path` and turn the result into a status
pub fn export_records_to<'a, I>(path: PathBuf, records: I) -> ExportStatus
where
    I: IntoIterator<Item = &'a Record>,
{
    match export_to_file(&path, records) {
        Ok(()) => ExportStatus::Saved(path),
        Err(e) => {
            tracing::error!("CSV export to {:?} failed: {}", path, e);
            ExportStatus::Failed(e.to_string())
        }
    }
}

/// Ask for a destination and export. `None` when the dialog was cancelled.
pub fn handle_export_request<'a, I>(records: I) -> Option<ExportStatus>
where
    I: IntoIterator<Item = &'a Record>,
{
    let path = rfd::FileDialog::new()
        .set_title("Export records as CSV")
        .add_filter("CSV", &["csv"])
        .set_file_name(EXPORT_FILE_NAME)
        .save_file()?;

    Some(export_records_to(path, records))
}

/// Export button; returns true when clicked
pub fn show_export_button(ui: &mut Ui, enabled: bool) -> bool {
    ui.add_enabled(enabled, egui::Button::new("⬇ Export CSV"))
        .on_hover_text("Save the filtered records as CSV")
        .clicked()
}
