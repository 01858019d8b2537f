//! Parsing for the planogram input formats.
//!
//! This module handles reading imported planogram CSV files and the
//! layout description JSON that drives the shelf overlay.

pub mod layout_json;
pub mod planogram_csv;

// Re-export commonly used functions
pub use layout_json::parse_layout_json;
pub use planogram_csv::{is_csv_file, parse_planogram_csv};
