//! Status bar widget for the status message, narration state, and key help.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{AppState, Screen};
use crate::audio::Availability;

/// Status bar renders three lines: status message, narration state, key help.
pub struct StatusBar;

impl StatusBar {
    /// Renders the status bar.
    pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;

        let status_line = Line::styled(
            state.status_message.clone(),
            Style::default().fg(theme.text),
        );

        let narration_line = narration_line(state);

        let help_line = Line::styled(help_text(state), Style::default().fg(theme.text_muted));

        let paragraph = Paragraph::new(vec![status_line, narration_line, help_line])
            .block(Block::default().borders(Borders::TOP));
        f.render_widget(paragraph, area);
    }
}

/// Builds the narration status line.
fn narration_line(state: &AppState) -> Line<'static> {
    let theme = &state.theme;

    if state.viewer.is_probing() {
        return Line::styled(
            "Probing audio service...".to_string(),
            Style::default().fg(theme.text_muted),
        );
    }

    match &state.viewer.availability {
        Availability::Unknown => Line::from(""),
        Availability::Available { total } => {
            if state.viewer.narrator.is_playing() {
                Line::styled(
                    "♪ Playing narration...".to_string(),
                    Style::default()
                        .fg(theme.success)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Line::styled(
                    format!("Narration ready ({total} clips)"),
                    Style::default().fg(theme.text_muted),
                )
            }
        }
        Availability::Unavailable { reason } => Line::styled(
            format!("{reason} Press 'r' to retry."),
            Style::default().fg(theme.warning),
        ),
    }
}

/// Key help for the active screen.
fn help_text(state: &AppState) -> String {
    match state.screen {
        Screen::Import => "Enter: import | Esc: quit".to_string(),
        Screen::Viewer => {
            if state.viewer.simulation.is_some() {
                "Left/Right: step | u: new import | q: quit".to_string()
            } else {
                "s: start | Up/Down: shelf | u: new import | q: quit".to_string()
            }
        }
    }
}
