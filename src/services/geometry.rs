//! Overlay coordinate transforms.
//!
//! Layout entries carry top-left-origin pixel coordinates in backdrop
//! image space. The overlay works bottom-left-origin relative to the
//! backdrop height, with a fixed empirical horizontal offset, and the
//! result is projected onto a terminal cell grid for rendering. The
//! transform is one-way; out-of-bounds entries are clipped rather than
//! validated.

use crate::constants::{BACKDROP_HEIGHT, BACKDROP_WIDTH, OVERLAY_X_OFFSET};
use crate::models::LayoutEntry;

/// A projected overlay rectangle on the terminal cell grid.
///
/// Coordinates are relative to the canvas, not the whole frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayCell {
    /// Column of the left edge.
    pub x: u16,
    /// Row of the top edge.
    pub y: u16,
    /// Width in columns (at least 1).
    pub width: u16,
    /// Height in rows (at least 1).
    pub height: u16,
}

/// Computes the bottom-left-origin position of an entry.
///
/// `x` keeps its left-edge meaning but gains the empirical horizontal
/// offset; `y` becomes the distance from the container's bottom edge to
/// the entry's bottom edge.
#[must_use]
pub fn bottom_left_position(entry: &LayoutEntry, container_height: f64) -> (f64, f64) {
    let x = entry.x + OVERLAY_X_OFFSET;
    let y = container_height - (entry.y + entry.height);
    (x, y)
}

/// Projects an entry onto a terminal canvas of `cols` x `rows` cells.
///
/// Returns `None` when the entry lands entirely outside the canvas;
/// partially visible entries are clipped to the canvas edges. A
/// malformed entry therefore simply disappears instead of failing.
#[must_use]
pub fn project_entry(entry: &LayoutEntry, cols: u16, rows: u16) -> Option<OverlayCell> {
    if cols == 0 || rows == 0 {
        return None;
    }

    let (x, y_from_bottom) = bottom_left_position(entry, BACKDROP_HEIGHT);
    let top = BACKDROP_HEIGHT - (y_from_bottom + entry.height);

    let scale_x = f64::from(cols) / BACKDROP_WIDTH;
    let scale_y = f64::from(rows) / BACKDROP_HEIGHT;

    let cell_x = x * scale_x;
    let cell_y = top * scale_y;
    let cell_w = (entry.width * scale_x).max(1.0);
    let cell_h = (entry.height * scale_y).max(1.0);

    // Entirely off-canvas
    if cell_x >= f64::from(cols) || cell_y >= f64::from(rows) || cell_x + cell_w <= 0.0 || cell_y + cell_h <= 0.0 {
        return None;
    }

    // Clip to the canvas
    let x0 = cell_x.max(0.0);
    let y0 = cell_y.max(0.0);
    let x1 = (cell_x + cell_w).min(f64::from(cols));
    let y1 = (cell_y + cell_h).min(f64::from(rows));

    let width = ((x1 - x0).round() as u16).max(1);
    let height = ((y1 - y0).round() as u16).max(1);
    let x = (x0.round() as u16).min(cols - 1);
    let y = (y0.round() as u16).min(rows - 1);

    Some(OverlayCell {
        x,
        y,
        width: width.min(cols - x),
        height: height.min(rows - y),
    })
}
