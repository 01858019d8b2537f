//! Layout entry model for the shelf placement description.

use super::RgbColor;
use serde::{Deserialize, Serialize};

/// One placed item in the layout description JSON.
///
/// Coordinates are top-left-origin pixels in backdrop image space
/// (see [`crate::constants::BACKDROP_WIDTH`]). Entries form an ordered
/// sequence consumed sequentially by the display cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEntry {
    /// Layout-side grouping key; drives which backdrop and overlay set is shown.
    pub grupo: u32,
    /// Shelf number within the group.
    pub charola: u32,
    /// Product identifier, also the product asset name.
    pub sku: String,
    /// Horizontal position from the backdrop's left edge, in pixels.
    pub x: f64,
    /// Vertical position from the backdrop's top edge, in pixels.
    pub y: f64,
    /// Item width in pixels.
    #[serde(rename = "w")]
    pub width: f64,
    /// Item height in pixels.
    #[serde(rename = "h")]
    pub height: f64,
    /// Optional product image reference; `null` when the source had none.
    #[serde(default, rename = "img")]
    pub image: Option<String>,
    /// Placement mark color, `[r, g, b]` in the source JSON.
    pub color: RgbColor,
}
