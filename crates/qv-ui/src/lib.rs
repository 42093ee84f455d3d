//! User interface components for the earthquake dashboard
//!
//! This crate provides the egui theme and the application shell:
//! menu bar, status bar and the full-screen loading and error states.

pub mod theme;
pub mod shell;

pub use shell::{error_screen, loading_screen, menu_bar, status_bar, ShellAction, StatusInfo};
pub use theme::apply_theme;

// Common icon definitions
pub mod icons {
    pub const REFRESH: &str = "🔄";
    pub const EXPORT: &str = "⬇";
    pub const WARNING: &str = "⚠";
    pub const LOADING: &str = "⏳";
}
