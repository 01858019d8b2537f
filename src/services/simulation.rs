//! Walkthrough simulation state: step pairing and the display cursor.

use anyhow::Result;

use super::grouping::{flatten_groups, group_by_charola, total_facings};
use crate::models::{LayoutEntry, PlanogramRow, SimulationStep};

/// The running walkthrough simulation.
///
/// Built once per "start" action from the imported rows and the layout
/// description. The two sequences are paired into [`SimulationStep`]s
/// up front; a single cursor (`display_count`) then slices the step
/// list, so the row list and the overlay can never drift apart.
#[derive(Debug, Clone)]
pub struct Simulation {
    steps: Vec<SimulationStep>,
    display_count: usize,
    total_facings: u32,
}

impl Simulation {
    /// Builds a simulation from imported rows and layout entries.
    ///
    /// Rows are grouped by shelf key and flattened in sorted order,
    /// then paired index-by-index with the layout entries.
    ///
    /// # Errors
    ///
    /// Fails when the CSV has no data rows, or when the flattened row
    /// count and the layout entry count disagree. A length mismatch is
    /// reported rather than silently truncated.
    pub fn build(rows: &[PlanogramRow], entries: Vec<LayoutEntry>) -> Result<Self> {
        if rows.is_empty() {
            anyhow::bail!("No data rows found in the imported file");
        }

        let flattened = flatten_groups(&group_by_charola(rows));

        if flattened.len() != entries.len() {
            anyhow::bail!(
                "Layout description has {} entries but the imported CSV has {} rows",
                entries.len(),
                flattened.len()
            );
        }

        let total_facings = total_facings(rows);

        let steps = flattened
            .into_iter()
            .zip(entries)
            .enumerate()
            .map(|(index, (item, entry))| SimulationStep {
                index,
                charola: item.charola,
                row: item.row,
                entry,
            })
            .collect();

        Ok(Self {
            steps,
            display_count: 1,
            total_facings,
        })
    }

    /// Total number of steps in the walkthrough.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Number of currently revealed steps, always in `1..=total_steps`.
    #[must_use]
    pub const fn display_count(&self) -> usize {
        self.display_count
    }

    /// Reveals the next step. Returns false when already at the end.
    pub fn advance(&mut self) -> bool {
        if self.display_count < self.steps.len() {
            self.display_count += 1;
            true
        } else {
            false
        }
    }

    /// Hides the last revealed step. Returns false when already at the start.
    pub fn retreat(&mut self) -> bool {
        if self.display_count > 1 {
            self.display_count -= 1;
            true
        } else {
            false
        }
    }

    /// The currently revealed steps, in display order.
    #[must_use]
    pub fn revealed(&self) -> &[SimulationStep] {
        &self.steps[..self.display_count]
    }

    /// Grouping key of the last revealed layout entry.
    ///
    /// Drives which backdrop and overlay set the viewer shows.
    #[must_use]
    pub fn current_grupo(&self) -> u32 {
        self.revealed().last().map_or(1, |step| step.entry.grupo)
    }

    /// Revealed steps bucketed by shelf key, in display order.
    ///
    /// Steps are already flattened in sorted-bucket order, so buckets
    /// are contiguous runs of the revealed slice.
    #[must_use]
    pub fn revealed_sections(&self) -> Vec<(String, Vec<&SimulationStep>)> {
        let mut sections: Vec<(String, Vec<&SimulationStep>)> = Vec::new();

        for step in self.revealed() {
            match sections.last_mut() {
                Some((charola, steps)) if *charola == step.charola => steps.push(step),
                _ => sections.push((step.charola.clone(), vec![step])),
            }
        }

        sections
    }

    /// Facings total across all imported rows.
    #[must_use]
    pub const fn total_facings(&self) -> u32 {
        self.total_facings
    }

    /// Facings total across the revealed steps, recomputed on demand.
    #[must_use]
    pub fn revealed_facings(&self) -> u32 {
        self.revealed().iter().map(|step| step.row.facings()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RgbColor;

    fn entry(grupo: u32, sku: &str) -> LayoutEntry {
        LayoutEntry {
            grupo,
            charola: 1,
            sku: sku.to_string(),
            x: 10.0,
            y: 10.0,
            width: 35.0,
            height: 35.0,
            image: None,
            color: RgbColor::new(200, 40, 40),
        }
    }

    fn sample() -> Simulation {
        let rows = vec![
            PlanogramRow::with_frentes("1", "Refresco Cola 600ml", "2"),
            PlanogramRow::new("1", "Agua Natural 1L"),
            PlanogramRow::with_frentes("2", "Papas Saladas 45g", "x"),
            PlanogramRow::with_frentes("2", "Galletas Surtido", "3"),
        ];
        let entries = vec![
            entry(1, "A"),
            entry(1, "B"),
            entry(2, "C"),
            entry(2, "D"),
        ];
        Simulation::build(&rows, entries).unwrap()
    }

    #[test]
    fn test_build_pairs_by_index() {
        let sim = sample();
        assert_eq!(sim.total_steps(), 4);
        assert_eq!(sim.revealed().len(), 1);
        assert_eq!(sim.revealed()[0].row.nombre, "Refresco Cola 600ml");
        assert_eq!(sim.revealed()[0].entry.sku, "A");
    }

    #[test]
    fn test_build_rejects_length_mismatch() {
        let rows = vec![PlanogramRow::new("1", "Only")];
        let err = Simulation::build(&rows, vec![entry(1, "A"), entry(1, "B")]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("2 entries"));
        assert!(message.contains("1 rows"));
    }

    #[test]
    fn test_build_rejects_empty_rows() {
        assert!(Simulation::build(&[], vec![]).is_err());
    }

    #[test]
    fn test_cursor_clamps_at_both_ends() {
        let mut sim = sample();

        // Retreating at the start does nothing
        assert!(!sim.retreat());
        assert_eq!(sim.display_count(), 1);

        // Advance to the end
        assert!(sim.advance());
        assert!(sim.advance());
        assert!(sim.advance());
        assert_eq!(sim.display_count(), 4);

        // Advancing past the end does nothing
        assert!(!sim.advance());
        assert_eq!(sim.display_count(), 4);
    }

    #[test]
    fn test_cursor_invariant_over_action_sequences() {
        let mut sim = sample();
        let actions = [true, true, false, true, true, true, false, false, false, false, true];

        for &advance in &actions {
            if advance {
                sim.advance();
            } else {
                sim.retreat();
            }
            assert!(sim.display_count() >= 1);
            assert!(sim.display_count() <= sim.total_steps());
        }
    }

    #[test]
    fn test_current_grupo_follows_last_revealed() {
        let mut sim = sample();
        assert_eq!(sim.current_grupo(), 1);

        sim.advance();
        assert_eq!(sim.current_grupo(), 1);

        sim.advance();
        assert_eq!(sim.current_grupo(), 2);
    }

    #[test]
    fn test_revealed_sections_group_contiguously() {
        let mut sim = sample();
        sim.advance();
        sim.advance();

        let sections = sim.revealed_sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].0, "1");
        assert_eq!(sections[0].1.len(), 2);
        assert_eq!(sections[1].0, "2");
        assert_eq!(sections[1].1.len(), 1);
    }

    #[test]
    fn test_facings_totals() {
        let mut sim = sample();
        // 2 + 1 + 1 + 3
        assert_eq!(sim.total_facings(), 7);
        assert_eq!(sim.revealed_facings(), 2);

        sim.advance();
        sim.advance();
        // 2 + 1 + 1
        assert_eq!(sim.revealed_facings(), 4);
    }
}
