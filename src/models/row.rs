//! Planogram row model for imported CSV data.

use crate::constants::DEFAULT_FACINGS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Header name of the shelf identifier column.
pub const SHELF_COLUMN: &str = "Charola";

/// Header name of the display name column.
pub const NAME_COLUMN: &str = "Nombre";

/// Header name of the optional facings count column.
pub const FACINGS_COLUMN: &str = "Cantidad de Frentes";

/// A single imported planogram row.
///
/// Rows are header-keyed records: the shelf identifier and display name
/// are required, the facings count is optional, and every other column
/// is preserved verbatim in `extra` so the persisted session loses
/// nothing from the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanogramRow {
    /// Shelf identifier ("Charola" column), used as the grouping key.
    pub charola: String,
    /// Product display name ("Nombre" column).
    pub nombre: String,
    /// Raw facings value ("Cantidad de Frentes" column), kept unparsed
    /// so a non-numeric source value survives the persistence round-trip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frentes: Option<String>,
    /// All remaining columns, keyed by header name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl PlanogramRow {
    /// Creates a row with just the required columns.
    #[must_use]
    pub fn new(charola: impl Into<String>, nombre: impl Into<String>) -> Self {
        Self {
            charola: charola.into(),
            nombre: nombre.into(),
            frentes: None,
            extra: BTreeMap::new(),
        }
    }

    /// Creates a row with an explicit facings value.
    #[must_use]
    pub fn with_frentes(
        charola: impl Into<String>,
        nombre: impl Into<String>,
        frentes: impl Into<String>,
    ) -> Self {
        Self {
            frentes: Some(frentes.into()),
            ..Self::new(charola, nombre)
        }
    }

    /// Returns the facings count for this row.
    ///
    /// Missing, empty, or non-numeric values default to 1.
    #[must_use]
    pub fn facings(&self) -> u32 {
        match self.frentes.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite() && *n >= 0.0)
                .map_or(DEFAULT_FACINGS, |n| n.round() as u32),
            _ => DEFAULT_FACINGS,
        }
    }
}
