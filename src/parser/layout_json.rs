//! Layout description JSON parser.
//!
//! The layout file is a static asset: an ordered array of placed items
//! with backdrop-space coordinates. It is loaded once per simulation
//! start.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::constants::LAYOUT_FILE_NAME;
use crate::models::LayoutEntry;

/// Parses the layout description JSON from the assets directory.
///
/// # Errors
///
/// Returns an error if `planograma_layout.json` is missing from the
/// assets directory or is not a valid layout entry array. Layout load
/// failures surface as a page-level error in the viewer; they never
/// abort the process.
pub fn parse_layout_json(assets_dir: &Path) -> Result<Vec<LayoutEntry>> {
    let layout_path = assets_dir.join(LAYOUT_FILE_NAME);

    let content = fs::read_to_string(&layout_path).context(format!(
        "Failed to read layout file: {}",
        layout_path.display()
    ))?;

    let entries: Vec<LayoutEntry> = serde_json::from_str(&content).context(format!(
        "Failed to parse layout file: {}",
        layout_path.display()
    ))?;

    Ok(entries)
}
