//! Space view abstraction - base trait for all dockable views

use egui::Ui;
use uuid::Uuid;

use crate::ViewerContext;

/// Unique identifier for a space view
pub type SpaceViewId = Uuid;

/// Base trait for all space views (chart, table, details)
pub trait SpaceView: Send + Sync {
    /// Get the unique ID of this view
    fn id(&self) -> SpaceViewId;

    /// Get the display name
    fn display_name(&self) -> &str;

    /// Get the view type
    fn view_type(&self) -> &str;

    /// Draw the UI
    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui);
}
