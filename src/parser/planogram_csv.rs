//! Planogram CSV parser for the import flow.
//!
//! Parses header-keyed rows with quoted-field support, skipping empty
//! lines. The shelf identifier and display name columns are required;
//! every other column is preserved verbatim on the row.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::models::{PlanogramRow, FACINGS_COLUMN, NAME_COLUMN, SHELF_COLUMN};

/// Checks whether a path names a CSV file.
///
/// This is the import screen's pre-parse gate: anything that is not a
/// `.csv` file is rejected before any file I/O happens.
#[must_use]
pub fn is_csv_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Parses a planogram CSV file into rows.
///
/// # Errors
///
/// Returns an error if the path is not a CSV file, the file cannot be
/// read, the header is missing the required columns, or any record is
/// malformed. The first failure aborts the parse; nothing is persisted
/// by callers on error.
pub fn parse_planogram_csv(path: &Path) -> Result<Vec<PlanogramRow>> {
    if !is_csv_file(path) {
        anyhow::bail!("Not a CSV file: {}", path.display());
    }

    let content = fs::read_to_string(path)
        .context(format!("Failed to read CSV file: {}", path.display()))?;

    parse_planogram_str(&content)
}

/// Parses planogram CSV content from a string.
///
/// Split out from [`parse_planogram_csv`] so the parse logic can be
/// exercised without touching the filesystem.
pub fn parse_planogram_str(content: &str) -> Result<Vec<PlanogramRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .context("Failed to read CSV header row")?
        .clone();

    let shelf_idx = column_index(&headers, SHELF_COLUMN)?;
    let name_idx = column_index(&headers, NAME_COLUMN)?;
    let facings_idx = headers.iter().position(|h| h.trim() == FACINGS_COLUMN);

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.context(format!("Failed to parse CSV record {}", line + 1))?;

        // Skip lines where every field is empty
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let mut extra = BTreeMap::new();
        for (idx, field) in record.iter().enumerate() {
            if idx == shelf_idx || idx == name_idx || Some(idx) == facings_idx {
                continue;
            }
            if let Some(header) = headers.get(idx) {
                extra.insert(header.trim().to_string(), field.to_string());
            }
        }

        let frentes = facings_idx
            .and_then(|idx| record.get(idx))
            .map(ToString::to_string);

        rows.push(PlanogramRow {
            charola: record.get(shelf_idx).unwrap_or_default().trim().to_string(),
            nombre: record.get(name_idx).unwrap_or_default().trim().to_string(),
            frentes,
            extra,
        });
    }

    Ok(rows)
}

/// Finds the index of a required header column.
fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .context(format!("CSV is missing the required '{name}' column"))
}
