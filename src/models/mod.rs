//! Data models for planogram rows, layout entries, and simulation steps.

pub mod layout_entry;
pub mod rgb;
pub mod row;
pub mod step;

pub use layout_entry::LayoutEntry;
pub use rgb::RgbColor;
pub use row::{PlanogramRow, FACINGS_COLUMN, NAME_COLUMN, SHELF_COLUMN};
pub use step::SimulationStep;
