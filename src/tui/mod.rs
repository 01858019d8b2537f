//! Terminal user interface: screens, state management, and the event loop.
//!
//! Two screens compose the app: the import screen (CSV path entry) and
//! the viewer (walkthrough list plus shelf canvas). All shared state
//! lives on [`AppState`] and is only touched from the UI thread; the
//! narration worker and the availability probe report back through
//! channels drained once per tick.

pub mod backdrop;
pub mod import_screen;
pub mod shelf_canvas;
pub mod status_bar;
pub mod theme;
pub mod viewer;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout as RatatuiLayout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

use crate::audio::PlaybackEvent;
use crate::config::Config;
use crate::constants::APP_NAME;
use crate::store::{SessionStore, StoredSession};
use crate::tui::backdrop::FALLBACK_SHELF;

pub use import_screen::ImportState;
pub use status_bar::StatusBar;
pub use theme::Theme;
pub use viewer::ViewerState;

/// The two screens of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// CSV import form.
    Import,
    /// Walkthrough viewer.
    Viewer,
}

/// Application state shared by both screens.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Active color theme.
    pub theme: Theme,
    /// Which screen is active.
    pub screen: Screen,
    /// Session store handle.
    pub store: SessionStore,
    /// Loaded import session, if any.
    pub session: Option<StoredSession>,
    /// Import screen state.
    pub import: ImportState,
    /// Viewer screen state.
    pub viewer: ViewerState,
    /// Status bar message.
    pub status_message: String,
    /// Page-level error overlay, blocks input until dismissed.
    pub error_message: Option<String>,
    /// Whether the application should exit.
    pub should_quit: bool,
}

impl AppState {
    /// Creates application state from config and the stored session.
    ///
    /// Presence of a stored session selects the viewer screen, absence
    /// selects the import screen. This is the sole routing guard.
    pub fn new(
        config: Config,
        store: SessionStore,
        session: Option<StoredSession>,
    ) -> Result<Self> {
        let theme = Theme::from_mode(config.ui.theme_mode);
        let viewer = ViewerState::new(&config)?;
        let screen = if session.is_some() {
            Screen::Viewer
        } else {
            Screen::Import
        };

        let mut state = Self {
            config,
            theme,
            screen,
            store,
            session,
            import: ImportState::new(),
            viewer,
            status_message: "Welcome".to_string(),
            error_message: None,
            should_quit: false,
        };

        if state.screen == Screen::Viewer {
            state.viewer.start_probe();
            state.status_message = "Press 's' to start the simulation".to_string();
        }

        Ok(state)
    }

    /// Switches to the viewer screen, probing the audio service if it
    /// has not been probed yet.
    pub fn enter_viewer(&mut self) {
        self.screen = Screen::Viewer;
        if matches!(self.viewer.availability, crate::audio::Availability::Unknown) {
            self.viewer.start_probe();
        }
    }

    /// Sets the status message.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.error_message = None;
    }

    /// Sets the page-level error overlay.
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error_message = Some(error.into());
    }

    /// Clears the error overlay.
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Per-frame bookkeeping: drains worker channels and applies the
    /// backdrop fallback rule.
    pub fn tick(&mut self) {
        // Availability lands on the narration line; no status churn here
        let _ = self.viewer.poll_probe();

        while let Some(event) = self.viewer.narrator.poll() {
            if let PlaybackEvent::Failed { reason, .. } = event {
                self.status_message = format!("Narration error: {reason}");
            }
        }

        // Backdrop follows the active grupo during simulation, the
        // selector otherwise. A load failure outside simulation mode
        // forces the selector itself back to shelf 1.
        let simulating = self.viewer.simulation.is_some();
        let wanted_shelf = match &self.viewer.simulation {
            Some(simulation) => simulation.current_grupo(),
            None => self.viewer.shelf_number,
        };
        self.viewer.backdrop.show(wanted_shelf);
        if !simulating
            && self.viewer.backdrop.is_fallback()
            && self.viewer.shelf_number != FALLBACK_SHELF
        {
            self.viewer.shelf_number = FALLBACK_SHELF;
        }
    }
}

/// Initialize terminal for TUI
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main event loop
pub fn run_tui(
    state: &mut AppState,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        // Apply theme based on user preference (Auto detects OS)
        state.theme = Theme::from_mode(state.config.ui.theme_mode);

        // Drain worker channels and refresh the backdrop
        state.tick();

        // Render current state
        terminal.draw(|f| render(f, state))?;

        // Poll for events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if handle_key_event(state, key)? {
                    break; // User quit
                }
            }
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

/// Render the UI from current state
fn render(f: &mut Frame, state: &mut AppState) {
    // Fill entire screen with theme background color first
    let full_bg = Block::default().style(Style::default().bg(state.theme.background));
    f.render_widget(full_bg, f.area());

    let chunks = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(4), // Status bar
        ])
        .split(f.area());

    render_title_bar(f, chunks[0], state);

    match state.screen {
        Screen::Import => import_screen::render(f, chunks[1], state),
        Screen::Viewer => viewer::render(f, chunks[1], state),
    }

    StatusBar::render(f, chunks[2], state);

    if state.error_message.is_some() {
        render_error_overlay(f, state);
    }
}

/// Renders the title bar with the session summary.
fn render_title_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let title = match &state.session {
        Some(session) => format!(" {APP_NAME} — {}", session.file_name),
        None => format!(" {APP_NAME} — Planogram walkthrough"),
    };

    let paragraph = Paragraph::new(title)
        .style(
            Style::default()
                .fg(state.theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

/// Renders the page-level error overlay.
fn render_error_overlay(f: &mut Frame, state: &AppState) {
    let Some(error) = &state.error_message else {
        return;
    };

    let popup = centered_rect(60, 30, f.area());
    f.render_widget(Clear, popup);

    let lines = vec![
        Line::from(""),
        Line::from(error.as_str()),
        Line::from(""),
        Line::styled(
            "Enter: dismiss",
            Style::default().fg(state.theme.text_muted),
        ),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(state.theme.error))
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(state.theme.error)),
        );
    f.render_widget(paragraph, popup);
}

/// Helper to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    RatatuiLayout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Handle keyboard input events
fn handle_key_event(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    use crossterm::event::KeyCode;

    // If error overlay is shown, allow dismissing with Enter or Esc
    if state.error_message.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            state.clear_error();
        }
        // Block all other input while error is shown
        return Ok(false);
    }

    match state.screen {
        Screen::Import => import_screen::handle_input(state, key),
        Screen::Viewer => viewer::handle_input(state, key),
    }
}
