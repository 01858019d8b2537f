//! Shelf backdrop loading with fallback.
//!
//! Backdrops are text-art assets addressed by shelf number. Loading
//! follows a two-state machine: { Requested, Fallback }. A missing
//! requested asset falls back to shelf 1's art, and the state resets to
//! Requested whenever the wanted shelf changes. Product marks track an
//! independent per-sku failure flag with no retry.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Shelf number the fallback state shows.
pub const FALLBACK_SHELF: u32 = 1;

/// Which asset the backdrop is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackdropSource {
    /// Showing the requested shelf's art.
    Requested,
    /// Requested art failed to load; showing shelf 1's art.
    Fallback,
}

/// Shelf backdrop state.
#[derive(Debug, Clone)]
pub struct Backdrop {
    assets_dir: PathBuf,
    source: BackdropSource,
    shelf: u32,
    art: Option<String>,
    attempted: bool,
}

impl Backdrop {
    /// Creates a backdrop rooted at the given assets directory.
    ///
    /// Nothing is loaded until the first [`Backdrop::show`] call.
    #[must_use]
    pub fn new(assets_dir: PathBuf) -> Self {
        Self {
            assets_dir,
            source: BackdropSource::Requested,
            shelf: 0,
            art: None,
            attempted: false,
        }
    }

    /// Loads the art for a shelf, falling back to shelf 1 on failure.
    ///
    /// Re-requesting the shelf already shown is a no-op, so render code
    /// can call this every frame. A change of shelf resets the state
    /// machine to Requested before attempting the load.
    pub fn show(&mut self, shelf: u32) {
        if self.shelf == shelf && self.attempted {
            return;
        }

        self.shelf = shelf;
        self.attempted = true;
        match read_shelf_art(&self.assets_dir, shelf) {
            Some(art) => {
                self.source = BackdropSource::Requested;
                self.art = Some(art);
            }
            None => {
                self.source = BackdropSource::Fallback;
                self.art = read_shelf_art(&self.assets_dir, FALLBACK_SHELF);
            }
        }
    }

    /// True when the requested art failed and shelf 1 is showing.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self.source, BackdropSource::Fallback)
    }

    /// The loaded art text, if any asset could be read at all.
    #[must_use]
    pub fn art(&self) -> Option<&str> {
        self.art.as_deref()
    }

    /// Shelf number the art was requested for.
    #[must_use]
    pub const fn shelf(&self) -> u32 {
        self.shelf
    }
}

/// Reads a shelf's backdrop art file.
fn read_shelf_art(assets_dir: &Path, shelf: u32) -> Option<String> {
    let path = assets_dir.join("shelves").join(format!("estante_{shelf}.txt"));
    fs::read_to_string(path).ok()
}

/// Per-sku product mark labels with failure tracking.
///
/// A product's label comes from `products/<sku>.txt`; once a read
/// fails, the sku is flagged and never retried; the placement mark is
/// rendered without a label from then on.
#[derive(Debug, Clone)]
pub struct ProductArt {
    assets_dir: PathBuf,
    failed: HashSet<String>,
}

impl ProductArt {
    /// Creates a product art loader rooted at the assets directory.
    #[must_use]
    pub fn new(assets_dir: PathBuf) -> Self {
        Self {
            assets_dir,
            failed: HashSet::new(),
        }
    }

    /// Returns the label for a sku, or `None` once it has failed.
    pub fn label(&mut self, sku: &str) -> Option<String> {
        if self.failed.contains(sku) {
            return None;
        }

        let path = self.assets_dir.join("products").join(format!("{sku}.txt"));
        match fs::read_to_string(path) {
            Ok(content) => content.lines().next().map(|line| line.trim().to_string()),
            Err(_) => {
                self.failed.insert(sku.to_string());
                None
            }
        }
    }

    /// True when the sku's art already failed to load.
    #[must_use]
    pub fn has_failed(&self, sku: &str) -> bool {
        self.failed.contains(sku)
    }
}
