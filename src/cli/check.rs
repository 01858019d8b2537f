//! Headless validation command for planogram CSV files.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::parser::parse_planogram_csv;
use crate::services::grouping::{flatten_groups, group_by_charola, total_facings};

/// Validate a planogram CSV file without starting the viewer
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Path to the planogram CSV file
    #[arg(value_name = "FILE")]
    pub csv: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Machine-readable check result.
#[derive(Debug, Serialize)]
struct CheckResponse {
    valid: bool,
    rows: usize,
    shelves: usize,
    total_facings: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl CheckArgs {
    /// Executes the check command.
    ///
    /// Returns whether the file is a valid planogram CSV; the caller
    /// maps that to the process exit code.
    pub fn execute(&self) -> Result<bool> {
        let response = match parse_planogram_csv(&self.csv) {
            Ok(rows) => {
                let groups = group_by_charola(&rows);
                let flattened = flatten_groups(&groups);
                CheckResponse {
                    valid: true,
                    rows: flattened.len(),
                    shelves: groups.len(),
                    total_facings: total_facings(&rows),
                    error: None,
                }
            }
            Err(err) => CheckResponse {
                valid: false,
                rows: 0,
                shelves: 0,
                total_facings: 0,
                error: Some(format!("{err:#}")),
            },
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else if response.valid {
            println!(
                "✓ Parsed {} rows across {} shelves",
                response.rows, response.shelves
            );
            println!("  Total facings: {}", response.total_facings);
        } else {
            println!(
                "✗ {}",
                response.error.as_deref().unwrap_or("Unknown error")
            );
        }

        Ok(response.valid)
    }
}
