//! Viewport - manages dockable space views
//! Based on Rerun's re_viewport

use std::collections::HashMap;
use egui::Ui;
use egui_dock::{DockArea, DockState, NodeIndex, TabViewer};

use crate::{SpaceView, SpaceViewId, ViewerContext};

/// The main viewport that manages dockable space views
pub struct Viewport {
    dock_state: DockState<SpaceViewId>,
    space_views: HashMap<SpaceViewId, Box<dyn SpaceView>>,
}

impl Viewport {
    /// Chart on the left, table on the right with the detail view below it
    pub fn dashboard_layout(
        chart: Box<dyn SpaceView>,
        table: Box<dyn SpaceView>,
        detail: Box<dyn SpaceView>,
    ) -> Self {
        let (chart_id, table_id, detail_id) = (chart.id(), table.id(), detail.id());

        let mut dock_state = DockState::new(vec![chart_id]);
        let surface = dock_state.main_surface_mut();
        let [_, right] = surface.split_right(NodeIndex::root(), 0.5, vec![table_id]);
        surface.split_below(right, 0.72, vec![detail_id]);

        let space_views = [chart, table, detail]
            .into_iter()
            .map(|view| {
                tracing::debug!("Docking {} '{}'", view.view_type(), view.display_name());
                (view.id(), view)
            })
            .collect();

        Self {
            dock_state,
            space_views,
        }
    }

    /// Draw the viewport
    pub fn ui(&mut self, ui: &mut Ui, viewer_context: &ViewerContext) {
        let available_rect = ui.available_rect_before_wrap();

        ui.allocate_ui(available_rect.size(), |ui| {
            DockArea::new(&mut self.dock_state)
                .show_close_buttons(false)
                .draggable_tabs(true)
                .show_tab_name_on_hover(true)
                .show_inside(ui, &mut ViewportTabViewer {
                    space_views: &mut self.space_views,
                    viewer_context,
                });
        });
    }
}

/// Tab viewer for egui_dock
struct ViewportTabViewer<'a> {
    space_views: &'a mut HashMap<SpaceViewId, Box<dyn SpaceView>>,
    viewer_context: &'a ViewerContext,
}

impl<'a> TabViewer for ViewportTabViewer<'a> {
    type Tab = SpaceViewId;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        if let Some(view) = self.space_views.get(tab) {
            view.display_name().into()
        } else {
            "Unknown".into()
        }
    }

    fn ui(&mut self, ui: &mut Ui, tab: &mut Self::Tab) {
        if let Some(view) = self.space_views.get_mut(tab) {
            view.ui(self.viewer_context, ui);
        }
    }
}
