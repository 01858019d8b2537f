//! Import screen: CSV path entry, validation, and persistence.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout as RatatuiLayout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::path::PathBuf;

use super::{centered_rect, AppState};
use crate::parser::{is_csv_file, parse_planogram_csv};

/// State of the import screen.
#[derive(Debug, Clone, Default)]
pub struct ImportState {
    /// CSV path being typed.
    pub path_input: String,
    /// Inline validation/parse error, if any.
    pub error: Option<String>,
}

impl ImportState {
    /// Creates an empty import form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Renders the import screen.
pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let popup = centered_rect(70, 50, area);

    let block = Block::default()
        .title(" Import planogram CSV ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Prompt
            Constraint::Length(3), // Path input
            Constraint::Length(2), // Error
            Constraint::Min(1),    // Help
        ])
        .split(inner);

    let prompt = Paragraph::new("Path to the planogram CSV file:")
        .style(Style::default().fg(theme.text));
    f.render_widget(prompt, chunks[0]);

    let input = Paragraph::new(format!("{}█", state.import.path_input))
        .style(Style::default().fg(theme.accent))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(input, chunks[1]);

    if let Some(error) = &state.import.error {
        let error_line = Paragraph::new(error.as_str())
            .style(Style::default().fg(theme.error).add_modifier(Modifier::BOLD));
        f.render_widget(error_line, chunks[2]);
    }

    let help = Paragraph::new(vec![
        Line::from("Enter: import and continue"),
        Line::from("The file must have 'Charola' and 'Nombre' columns."),
    ])
    .style(Style::default().fg(theme.text_muted));
    f.render_widget(help, chunks[3]);
}

/// Handles a key event on the import screen.
///
/// Returns true when the application should quit.
pub fn handle_input(state: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => return Ok(true),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Ok(true);
        }
        KeyCode::Enter => submit(state)?,
        KeyCode::Backspace => {
            state.import.path_input.pop();
        }
        KeyCode::Char(c) => state.import.path_input.push(c),
        _ => {}
    }

    Ok(false)
}

/// Validates, parses, and persists the entered CSV, then switches to
/// the viewer. Every failure stays on this screen with an inline
/// message; nothing is persisted on error.
fn submit(state: &mut AppState) -> Result<()> {
    let path = PathBuf::from(state.import.path_input.trim());

    if path.as_os_str().is_empty() {
        state.import.error = Some("Please enter a CSV file path".to_string());
        return Ok(());
    }

    // Reject non-CSV files before any file I/O
    if !is_csv_file(&path) {
        state.import.error = Some("Please select a valid CSV file".to_string());
        return Ok(());
    }

    let rows = match parse_planogram_csv(&path) {
        Ok(rows) => rows,
        Err(err) => {
            state.import.error = Some(format!("Failed to parse CSV: {err}"));
            return Ok(());
        }
    };

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("planograma.csv")
        .to_string();

    // Persist; a storage failure aborts the screen switch
    if let Err(err) = state.store.save(&rows, &file_name) {
        state.import.error = Some(format!("Failed to save imported data: {err}"));
        return Ok(());
    }

    // Read the session back so the viewer sees exactly what was stored
    match state.store.load() {
        Ok(session) => state.session = session,
        Err(err) => {
            state.import.error = Some(format!("Failed to read stored session: {err}"));
            return Ok(());
        }
    }
    state.import.error = None;
    state.enter_viewer();
    state.set_status(format!("Imported {} rows from {file_name}", rows.len()));

    Ok(())
}
