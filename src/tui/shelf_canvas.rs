//! Shelf canvas widget: backdrop art plus the placement overlay.

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::backdrop::FALLBACK_SHELF;
use super::AppState;
use crate::services::geometry::project_entry;

/// Shelf canvas renders the backdrop and the revealed placement marks.
pub struct ShelfCanvas;

impl ShelfCanvas {
    /// Renders the canvas.
    ///
    /// Pre-simulation the canvas shows the selected shelf's backdrop
    /// only; during simulation it follows the active grupo and overlays
    /// the revealed entries belonging to it.
    pub fn render(f: &mut Frame, area: Rect, state: &mut AppState) {
        let theme = state.theme.clone();

        // The shelf on display: fallback forces shelf 1's caption
        let wanted_shelf = match &state.viewer.simulation {
            Some(simulation) => simulation.current_grupo(),
            None => state.viewer.shelf_number,
        };
        let displayed_shelf = if state.viewer.backdrop.is_fallback() {
            FALLBACK_SHELF
        } else {
            wanted_shelf
        };

        let border_style = if state.viewer.backdrop.is_fallback() {
            Style::default().fg(theme.warning)
        } else {
            Style::default().fg(theme.primary)
        };

        let block = Block::default()
            .title(format!(" Planograma {displayed_shelf} "))
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        f.render_widget(block, area);

        // Backdrop art
        if let Some(art) = state.viewer.backdrop.art() {
            let lines: Vec<Line> = art.lines().map(Line::from).collect();
            let backdrop = Paragraph::new(lines).style(Style::default().fg(theme.text_muted));
            f.render_widget(backdrop, inner);
        }

        // Placement overlay, only while simulating
        let Some(simulation) = &state.viewer.simulation else {
            return;
        };
        let current_grupo = simulation.current_grupo();

        for step in simulation.revealed() {
            if step.entry.grupo != current_grupo {
                continue;
            }

            let Some(cell) = project_entry(&step.entry, inner.width, inner.height) else {
                continue;
            };

            let rect = Rect {
                x: inner.x + cell.x,
                y: inner.y + cell.y,
                width: cell.width,
                height: cell.height,
            };

            let color = step.entry.color.to_ratatui_color();
            f.render_widget(
                Block::default().style(Style::default().bg(color)),
                rect,
            );

            // Product mark label; omitted for skus whose art failed
            if let Some(label) = state.viewer.products.label(&step.entry.sku) {
                let truncated: String = label.chars().take(rect.width as usize).collect();
                let mark = Paragraph::new(truncated)
                    .style(Style::default().fg(theme.background).bg(color));
                f.render_widget(
                    mark,
                    Rect {
                        height: 1,
                        ..rect
                    },
                );
            }
        }
    }
}
