//! Help overlay showing the key table.
//!
//! Renders a centered overlay listing every key the board and the share
//! form respond to, grouped by where the key applies.

use crate::app::App;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

/// Key table, grouped by context. Keys are fixed, so this is static.
const SECTIONS: [(&str, &[(&str, &str)]); 4] = [
    (
        "General",
        &[
            ("q", "Quit"),
            ("?", "Toggle this help"),
            ("t", "Switch theme"),
            ("Tab", "Switch panel"),
        ],
    ),
    (
        "Categories",
        &[("j/k", "Move selection"), ("Enter", "Show this category")],
    ),
    (
        "Facts",
        &[
            ("j/k", "Move selection"),
            ("1", "Vote interesting"),
            ("2", "Vote mind-blowing"),
            ("3", "Vote false"),
            ("Enter", "Vote interesting"),
            ("o", "Open source in browser"),
            ("n", "Share a new fact"),
            ("r", "Reload the list"),
        ],
    ),
    (
        "Share form",
        &[
            ("Tab / Shift+Tab", "Next / previous field"),
            ("Left/Right", "Pick category"),
            ("Enter", "Post the fact"),
            ("Esc", "Discard the draft"),
        ],
    ),
];

/// Render the help overlay on top of the board.
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    let overlay = centered_rect(60, 80, area);
    if overlay.width < 24 || overlay.height < 6 {
        return;
    }

    // Clear the background behind the overlay
    f.render_widget(Clear, overlay);

    let mut rows: Vec<Row> = Vec::new();
    for (label, bindings) in &SECTIONS {
        rows.push(
            Row::new(vec![
                Line::from(Span::styled(
                    format!("-- {} --", label),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ])
            .style(app.style("header_title")),
        );

        for (key, description) in *bindings {
            rows.push(Row::new(vec![
                format!("  {}", key),
                description.to_string(),
            ]));
        }

        rows.push(Row::new(vec![String::new(), String::new()]));
    }
    // Drop the trailing separator
    rows.pop();

    let widths = [Constraint::Length(18), Constraint::Min(20)];

    let table = Table::new(rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(" Help (? to close) "),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        )
        .style(app.style("fact_text"));

    f.render_widget(table, overlay);
}

/// Create a centered rectangle with the given percentage of the parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
