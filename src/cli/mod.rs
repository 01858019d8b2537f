//! CLI command handlers for Planoguia.
//!
//! This module provides headless, scriptable access to the import
//! parser for automation and CI usage; the interactive viewer itself
//! lives in [`crate::tui`].

pub mod check;

pub use check::CheckArgs;
