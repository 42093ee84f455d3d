use egui::{CentralPanel, Context, RichText, TopBottomPanel};
use qv_core::ThemeSettings;

use crate::icons;
use crate::theme::{error_color, warning_color};

/// What the user asked for from the menu bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    /// Drop the cached feed and fetch again
    Refresh,
    /// Save the filtered records as CSV
    Export,
    /// Theme settings changed and need re-applying
    ThemeChanged,
}

/// What the shell shows about the feed and the selection
#[derive(Debug, Clone, Default)]
pub struct StatusInfo {
    pub source_name: String,
    pub total_rows: usize,
    pub visible_rows: usize,
    pub is_loading: bool,
    pub error: Option<String>,
    pub selected_id: Option<String>,
    /// Last feed or export message
    pub notice: Option<String>,
}

impl StatusInfo {
    /// One-line summary for the status bar
    pub fn summary(&self) -> String {
        let mut text = if self.visible_rows == self.total_rows {
            format!("{} records", self.total_rows)
        } else {
            format!("{} of {} records", self.visible_rows, self.total_rows)
        };
        if let Some(id) = &self.selected_id {
            text.push_str(&format!(" · selected {}", id));
        }
        text
    }
}

/// Render the main menu bar
pub fn menu_bar(ctx: &Context, theme: &mut ThemeSettings, status: &StatusInfo) -> Option<ShellAction> {
    let mut action = None;

    TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            // File menu
            ui.menu_button("File", |ui| {
                if ui.button(format!("{} Refresh feed", icons::REFRESH)).clicked() {
                    action = Some(ShellAction::Refresh);
                    ui.close_menu();
                }

                let can_export = status.visible_rows > 0;
                if ui
                    .add_enabled(can_export, egui::Button::new(format!("{} Export CSV...", icons::EXPORT)))
                    .clicked()
                {
                    action = Some(ShellAction::Export);
                    ui.close_menu();
                }

                ui.separator();

                if ui.button("Exit").clicked() {
                    ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            // View menu
            ui.menu_button("View", |ui| {
                if ui.checkbox(&mut theme.dark_mode, "Dark Mode").changed() {
                    action = Some(ShellAction::ThemeChanged);
                    ui.close_menu();
                }
                if ui
                    .add(egui::Slider::new(&mut theme.scale_factor, 0.5..=3.0).text("UI Scale"))
                    .drag_released()
                {
                    action = Some(ShellAction::ThemeChanged);
                }
            });

            // Right-aligned status
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(&status.source_name).weak());
            });
        });
    });

    action
}

/// Render the status bar at the bottom of the window
pub fn status_bar(ctx: &Context, status: &StatusInfo) {
    TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(status.summary());
            if let Some(notice) = &status.notice {
                ui.separator();
                ui.label(RichText::new(notice).weak());
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(error) = &status.error {
                    ui.label(RichText::new(format!("{} {}", icons::WARNING, error)).color(error_color()));
                } else if status.is_loading {
                    ui.spinner();
                    ui.label(RichText::new("Refreshing...").color(warning_color()));
                }
            });
        });
    });
}

/// Full-window loading state shown until the first dataset arrives
pub fn loading_screen(ctx: &Context, source_name: &str) {
    CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.35);
            ui.spinner();
            ui.add_space(12.0);
            ui.heading(format!("{} Loading dataset...", icons::LOADING));
            ui.label(RichText::new(source_name).weak());
        });
    });
}

/// Full-window error state. Returns true when the user asked to retry.
pub fn error_screen(ctx: &Context, error: &str) -> bool {
    let mut retry = false;

    CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.35);
            ui.label(
                RichText::new(format!("{} Error: {}", icons::WARNING, error))
                    .color(error_color())
                    .size(16.0),
            );
            ui.add_space(16.0);
            if ui.button(format!("{} Retry", icons::REFRESH)).clicked() {
                retry = true;
            }
        });
    });

    retry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_without_filter() {
        let status = StatusInfo {
            total_rows: 12,
            visible_rows: 12,
            ..StatusInfo::default()
        };
        assert_eq!(status.summary(), "12 records");
    }

    #[test]
    fn test_summary_with_filter_and_selection() {
        let status = StatusInfo {
            total_rows: 12,
            visible_rows: 3,
            selected_id: Some("ci123".to_string()),
            ..StatusInfo::default()
        };
        assert_eq!(status.summary(), "3 of 12 records · selected ci123");
    }
}
