//! Viewer screen: walkthrough list, shelf canvas, and narration wiring.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout as RatatuiLayout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use super::backdrop::{Backdrop, ProductArt, FALLBACK_SHELF};
use super::shelf_canvas::ShelfCanvas;
use super::{AppState, Screen};
use crate::audio::{AudioClient, Availability, NarrationCursor, Narrator};
use crate::config::Config;
use crate::parser::parse_layout_json;
use crate::services::Simulation;
use crate::tui::import_screen::ImportState;

/// State of the viewer screen.
pub struct ViewerState {
    /// Running simulation, present after the "start" action.
    pub simulation: Option<Simulation>,
    /// Pre-simulation shelf selector, always at least 1.
    pub shelf_number: u32,
    /// Shelf backdrop with fallback handling.
    pub backdrop: Backdrop,
    /// Product mark labels with per-sku failure tracking.
    pub products: ProductArt,
    /// Narration service availability.
    pub availability: Availability,
    /// Which clip index pairs with the walkthrough position.
    pub narration: NarrationCursor,
    /// Background playback worker.
    pub narrator: Narrator,
    client: AudioClient,
    probe: Option<Receiver<Availability>>,
}

impl ViewerState {
    /// Creates viewer state from configuration.
    ///
    /// The narration worker is spawned immediately; it idles until the
    /// availability probe succeeds and the first clip is requested.
    pub fn new(config: &Config) -> Result<Self> {
        let assets_dir = config.assets_dir()?;
        let client = AudioClient::new(
            &config.audio.base_url,
            Duration::from_secs(config.audio.probe_timeout_secs),
        )?;

        Ok(Self {
            simulation: None,
            shelf_number: FALLBACK_SHELF,
            backdrop: Backdrop::new(assets_dir.clone()),
            products: ProductArt::new(assets_dir),
            availability: Availability::Unknown,
            narration: NarrationCursor::new(),
            narrator: Narrator::spawn(client.clone()),
            client,
            probe: None,
        })
    }

    /// Starts the availability probe on a background thread.
    ///
    /// The probe is idempotent; a probe already in flight is left alone.
    pub fn start_probe(&mut self) {
        if self.probe.is_some() {
            return;
        }

        let (tx, rx) = channel();
        let client = self.client.clone();
        thread::spawn(move || {
            let _ = tx.send(client.probe());
        });
        self.probe = Some(rx);
    }

    /// True while a probe is in flight.
    #[must_use]
    pub const fn is_probing(&self) -> bool {
        self.probe.is_some()
    }

    /// Drains a finished probe, updating availability.
    pub fn poll_probe(&mut self) -> Option<Availability> {
        let receiver = self.probe.as_ref()?;
        match receiver.try_recv() {
            Ok(availability) => {
                self.probe = None;
                self.availability = availability.clone();
                Some(availability)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.probe = None;
                let availability = Availability::Unavailable {
                    reason: "Audio service probe failed. Narration disabled.".to_string(),
                };
                self.availability = availability.clone();
                Some(availability)
            }
        }
    }
}

/// Handles a key event on the viewer screen.
///
/// Returns true when the application should quit.
pub fn handle_input(state: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Ok(true);
        }
        KeyCode::Char('u') => back_to_import(state)?,
        KeyCode::Char('s') => start_simulation(state),
        KeyCode::Right | KeyCode::Char('l') => advance(state),
        KeyCode::Left | KeyCode::Char('h') => retreat(state),
        KeyCode::Up | KeyCode::Char('k') => next_shelf(state),
        KeyCode::Down | KeyCode::Char('j') => previous_shelf(state),
        KeyCode::Char('r') => retry_probe(state),
        _ => {}
    }

    Ok(false)
}

/// Starts the walkthrough: loads the layout description and pairs it
/// with the imported rows. Errors surface as a page-level overlay.
fn start_simulation(state: &mut AppState) {
    if state.viewer.simulation.is_some() {
        return;
    }

    let Some(session) = &state.session else {
        state.set_error("No imported data. Press 'u' to import a CSV first.");
        return;
    };

    let assets_dir = match state.config.assets_dir() {
        Ok(dir) => dir,
        Err(err) => {
            state.set_error(format!("Error resolving assets directory: {err}"));
            return;
        }
    };

    let entries = match parse_layout_json(&assets_dir) {
        Ok(entries) => entries,
        Err(err) => {
            state.set_error(format!("Error loading layout file: {err}"));
            return;
        }
    };

    let simulation = match Simulation::build(&session.rows, entries) {
        Ok(simulation) => simulation,
        Err(err) => {
            state.set_error(format!("Cannot start simulation: {err}"));
            return;
        }
    };

    state.viewer.simulation = Some(simulation);
    state.viewer.narration.reset();

    // Narrate the first step when the service is up
    if state.viewer.availability.is_available() {
        state.viewer.narrator.play(state.viewer.narration.current());
    }

    state.set_status("Simulation started. Use Left/Right to step.");
}

/// Reveals the next step and narrates it.
fn advance(state: &mut AppState) {
    let Some(simulation) = state.viewer.simulation.as_mut() else {
        return;
    };

    if !simulation.advance() {
        return;
    }

    if let Some(total) = state.viewer.availability.total_records() {
        let index = state.viewer.narration.advance(total);
        state.viewer.narrator.play(index);
    }
}

/// Hides the last revealed step and narrates the one before it.
fn retreat(state: &mut AppState) {
    let Some(simulation) = state.viewer.simulation.as_mut() else {
        return;
    };

    if !simulation.retreat() {
        return;
    }

    if state.viewer.availability.is_available() {
        if let Some(index) = state.viewer.narration.retreat() {
            state.viewer.narrator.play(index);
        }
    }
}

/// Steps the shelf selector forward (inert during simulation).
fn next_shelf(state: &mut AppState) {
    if state.viewer.simulation.is_none() {
        state.viewer.shelf_number += 1;
    }
}

/// Steps the shelf selector backward, clamped at 1 (inert during simulation).
fn previous_shelf(state: &mut AppState) {
    if state.viewer.simulation.is_none() && state.viewer.shelf_number > 1 {
        state.viewer.shelf_number -= 1;
    }
}

/// Re-runs the availability probe after a failure.
fn retry_probe(state: &mut AppState) {
    if state.viewer.availability.is_available() || state.viewer.is_probing() {
        return;
    }

    state.viewer.start_probe();
    state.set_status("Probing audio service...");
}

/// Clears the stored session and returns to the import screen.
fn back_to_import(state: &mut AppState) -> Result<()> {
    if let Err(err) = state.store.clear() {
        state.set_error(format!("Failed to clear stored session: {err}"));
        return Ok(());
    }

    state.session = None;
    state.import = ImportState::new();
    // Fresh viewer state also drops the narrator, stopping any playback
    state.viewer = ViewerState::new(&state.config)?;
    state.screen = Screen::Import;
    state.set_status("Session cleared");

    Ok(())
}

/// Renders the viewer screen: walkthrough list on the left, shelf
/// canvas on the right.
pub fn render(f: &mut Frame, area: Rect, state: &mut AppState) {
    let chunks = RatatuiLayout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_walkthrough_panel(f, chunks[0], state);
    ShelfCanvas::render(f, chunks[1], state);
}

/// Renders the revealed item list grouped by shelf, or the start prompt.
fn render_walkthrough_panel(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;

    let block = Block::default()
        .title(" Walkthrough ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(simulation) = &state.viewer.simulation else {
        render_start_prompt(f, inner, state);
        return;
    };

    let sections = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let mut lines: Vec<Line> = Vec::new();
    for (charola, steps) in simulation.revealed_sections() {
        lines.push(Line::styled(
            format!("Charola {charola}"),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ));
        for (position, step) in steps.iter().enumerate() {
            let is_latest = step.index + 1 == simulation.display_count();
            let style = if is_latest {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            lines.push(Line::styled(
                format!("  {}. {}", position + 1, step.row.nombre),
                style,
            ));
        }
        lines.push(Line::from(""));
    }

    // Keep the newest entries visible, like a log tailing its end
    let scroll = (lines.len() as u16).saturating_sub(sections[0].height);
    let list = Paragraph::new(lines).scroll((scroll, 0));
    f.render_widget(list, sections[0]);

    let counter = Paragraph::new(format!(
        "Showing {} of {} items",
        simulation.revealed_facings(),
        simulation.total_facings()
    ))
    .style(Style::default().fg(theme.text_secondary));
    f.render_widget(counter, sections[1]);
}

/// Renders the pre-simulation prompt with the session summary.
fn render_start_prompt(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;

    let mut lines = vec![
        Line::from(""),
        Line::styled(
            "Press 's' to start the simulation",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
    ];

    if let Some(session) = &state.session {
        lines.push(Line::styled(
            format!("File: {}", session.file_name),
            Style::default().fg(theme.text),
        ));
        lines.push(Line::styled(
            format!("Rows: {}", session.rows.len()),
            Style::default().fg(theme.text),
        ));
        lines.push(Line::styled(
            format!(
                "Imported: {}",
                session.imported_at.format("%Y-%m-%d %H:%M UTC")
            ),
            Style::default().fg(theme.text_muted),
        ));
    }

    lines.push(Line::from(""));
    lines.push(Line::styled(
        "Browse shelves with Up/Down before starting.",
        Style::default().fg(theme.text_muted),
    ));

    f.render_widget(Paragraph::new(lines), area);
}
