//! Simulation step model pairing imported rows with layout entries.

use super::{LayoutEntry, PlanogramRow};

/// One step of the walkthrough simulation.
///
/// The imported CSV rows and the layout JSON are two independently
/// ordered sequences driven by a single display cursor. Pairing them
/// into explicit steps at simulation start (validated for length
/// agreement) removes the consistency risk of slicing two lists with
/// one index.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationStep {
    /// Zero-based position in the walkthrough sequence.
    pub index: usize,
    /// Shelf key of the row side of this step.
    pub charola: String,
    /// The imported row revealed at this step.
    pub row: PlanogramRow,
    /// The layout entry placed at this step.
    pub entry: LayoutEntry,
}
