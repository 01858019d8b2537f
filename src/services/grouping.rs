//! Grouping and facings aggregation for imported rows.
//!
//! Rows are bucketed by shelf key into an ordered map so display order
//! is deterministic (lexicographic by key), then linearized into a flat
//! sequence the display cursor slices by index.

use std::collections::BTreeMap;

use crate::models::PlanogramRow;

/// Grouping key used for rows whose shelf column is empty.
pub const UNASSIGNED_SHELF: &str = "Sin Charola";

/// One (shelf, row) pair in the flattened display sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedItem {
    /// Shelf key of the bucket this row belongs to.
    pub charola: String,
    /// The row itself.
    pub row: PlanogramRow,
}

/// Groups rows by shelf key into ordered buckets.
///
/// Bucket iteration order is lexicographic by key; insertion order is
/// preserved within each bucket. Rows with an empty shelf column land
/// in the [`UNASSIGNED_SHELF`] bucket.
#[must_use]
pub fn group_by_charola(rows: &[PlanogramRow]) -> BTreeMap<String, Vec<PlanogramRow>> {
    let mut groups: BTreeMap<String, Vec<PlanogramRow>> = BTreeMap::new();

    for row in rows {
        let key = if row.charola.trim().is_empty() {
            UNASSIGNED_SHELF.to_string()
        } else {
            row.charola.clone()
        };
        groups.entry(key).or_default().push(row.clone());
    }

    groups
}

/// Linearizes grouped rows into the flat display sequence.
///
/// All (shelf, row) pairs are emitted in sorted-bucket order so the
/// flattened length always equals the input row count, regardless of
/// shelf-key cardinality.
#[must_use]
pub fn flatten_groups(groups: &BTreeMap<String, Vec<PlanogramRow>>) -> Vec<FlattenedItem> {
    groups
        .iter()
        .flat_map(|(charola, rows)| {
            rows.iter().map(|row| FlattenedItem {
                charola: charola.clone(),
                row: row.clone(),
            })
        })
        .collect()
}

/// Sums facings across all rows.
#[must_use]
pub fn total_facings(rows: &[PlanogramRow]) -> u32 {
    rows.iter().map(PlanogramRow::facings).sum()
}

/// Sums facings across the first `display_count` items of the flattened
/// sequence.
///
/// Recomputed from scratch on every cursor change; there is no
/// incremental maintenance at this scale.
#[must_use]
pub fn revealed_facings(items: &[FlattenedItem], display_count: usize) -> u32 {
    items
        .iter()
        .take(display_count)
        .map(|item| item.row.facings())
        .sum()
}
