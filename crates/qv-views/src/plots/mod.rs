//! Plot view implementations

pub mod chart;

// Utilities
pub mod utils;

// Re-exports
pub use chart::{ChartView, ChartConfig, ChartMark};
