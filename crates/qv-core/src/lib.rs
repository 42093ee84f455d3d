//! Core functionality for the earthquake dashboard
//!
//! This crate provides the record model, the shared selection store and
//! the event bus used to keep the chart and table views in step.

pub mod events;
pub mod record;
pub mod state;
pub mod sync;

// Re-export commonly used types
pub use events::{EventBus, Event, EventHandler, handler_from_fn};
pub use record::{Record, MeasureKey, filter_by_place};
pub use state::{AppSettings, ChartKind, Dataset, ThemeSettings};
pub use sync::{SelectionStore, SelectionState};
