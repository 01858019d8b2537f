//! Planoguia - Terminal-based planogram walkthrough viewer
//!
//! Imports a planogram CSV, persists it as the local session, and
//! replays the placement sequence item-by-item over a shelf backdrop,
//! optionally narrated by a local audio service.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use planoguia::cli::CheckArgs;
use planoguia::config::Config;
use planoguia::constants::{APP_BINARY_NAME, APP_NAME};
use planoguia::parser::parse_planogram_csv;
use planoguia::store::SessionStore;
use planoguia::tui;

/// Planoguia - Terminal-based planogram walkthrough viewer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a planogram CSV to import before launching the viewer
    #[arg(value_name = "FILE")]
    csv_path: Option<PathBuf>,

    /// Clear the stored import session and exit
    #[arg(long)]
    reset: bool,

    /// Override the assets directory (layout JSON and shelf art)
    #[arg(long, value_name = "PATH")]
    assets: Option<PathBuf>,

    /// Override the audio narration service URL
    #[arg(long, value_name = "URL")]
    audio_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a planogram CSV file without starting the viewer
    Check(CheckArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Headless commands never touch the terminal UI
    if let Some(Commands::Check(args)) = &cli.command {
        let valid = args.execute()?;
        if !valid {
            std::process::exit(1);
        }
        return Ok(());
    }

    // Load or create default config
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Warning: Failed to load config: {err}");
            Config::new()
        }
    };

    if let Some(assets) = cli.assets {
        config.paths.assets_dir = Some(assets);
    }
    if let Some(url) = cli.audio_url {
        config.audio.base_url = url;
    }

    if let Err(err) = config.validate() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    let store = SessionStore::open()?;

    if cli.reset {
        store.clear()?;
        println!("Stored session cleared.");
        return Ok(());
    }

    // A CSV argument runs the import flow headlessly before launching
    if let Some(path) = &cli.csv_path {
        if !path.exists() {
            eprintln!("Error: CSV file not found: {}", path.display());
            eprintln!();
            eprintln!("Examples:");
            eprintln!("  {} planograma.csv", APP_BINARY_NAME);
            eprintln!("  {} check planograma.csv", APP_BINARY_NAME);
            std::process::exit(1);
        }

        let rows = match parse_planogram_csv(path) {
            Ok(rows) => rows,
            Err(err) => {
                eprintln!("Error: {err:#}");
                std::process::exit(1);
            }
        };

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("planograma.csv");
        store.save(&rows, file_name)?;

        println!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));
        println!("Imported {} rows from {}", rows.len(), file_name);
    }

    let session = match store.load() {
        Ok(session) => session,
        Err(err) => {
            eprintln!("Warning: Failed to read stored session: {err}");
            None
        }
    };

    // Initialize TUI
    let mut terminal = tui::setup_terminal()?;
    let mut app_state = tui::AppState::new(config, store, session)?;

    // Run main TUI loop
    let result = tui::run_tui(&mut app_state, &mut terminal);

    // Restore terminal
    tui::restore_terminal(terminal)?;

    // Check for errors
    result?;

    Ok(())
}
