//! Shared test fixtures for E2E and integration tests.
#![allow(dead_code)] // Not every fixture is used by every test binary

use planoguia::models::{LayoutEntry, PlanogramRow, RgbColor};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A small but realistic planogram CSV with a quoted field, a
/// non-numeric facings value, and a missing facings value.
pub const SAMPLE_CSV: &str = "\
Charola,Nombre,Cantidad de Frentes,Posicion en Charola
1,Refresco Cola 600ml,2,1
1,Agua Natural 1L,x,2
2,Papas Saladas 45g,,1
2,\"Galletas, Surtido\",3,2
";

/// Writes CSV content to a temp file with the given name.
///
/// Returns the file path and the guard keeping the directory alive.
pub fn create_temp_csv(name: &str, content: &str) -> (PathBuf, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write temp CSV");
    (path, dir)
}

/// Builds a layout entry for tests.
pub fn test_entry(grupo: u32, charola: u32, sku: &str) -> LayoutEntry {
    LayoutEntry {
        grupo,
        charola,
        sku: sku.to_string(),
        x: 40.0,
        y: 60.0,
        width: 35.0,
        height: 42.0,
        image: None,
        color: RgbColor::new(221, 35, 36),
    }
}

/// Layout entries matching [`SAMPLE_CSV`] row-for-row (4 rows).
pub fn sample_entries() -> Vec<LayoutEntry> {
    vec![
        test_entry(1, 1, "SKU-A"),
        test_entry(1, 1, "SKU-B"),
        test_entry(2, 2, "SKU-C"),
        test_entry(2, 2, "SKU-D"),
    ]
}

/// Writes an assets directory containing a layout JSON for the entries.
pub fn create_assets_dir(entries: &[LayoutEntry]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create assets dir");
    let json = serde_json::to_string_pretty(entries).expect("Failed to encode layout");
    fs::write(dir.path().join("planograma_layout.json"), json)
        .expect("Failed to write layout JSON");
    dir
}

/// Rows equivalent to [`SAMPLE_CSV`], built directly.
pub fn sample_rows() -> Vec<PlanogramRow> {
    vec![
        PlanogramRow::with_frentes("1", "Refresco Cola 600ml", "2"),
        PlanogramRow::with_frentes("1", "Agua Natural 1L", "x"),
        PlanogramRow::with_frentes("2", "Papas Saladas 45g", ""),
        PlanogramRow::with_frentes("2", "Galletas, Surtido", "3"),
    ]
}
