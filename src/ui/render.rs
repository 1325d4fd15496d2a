//! Frame layout and overlay stacking.
//!
//! Lays out the board (category sidebar, fact list, count line, status bar)
//! and draws whichever overlays are active on top of it.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{categories, facts, form, help, status};

/// Smallest terminal the board layout fits in.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Entry point for a frame.
///
/// Draws the board, then the overlays bottom-up in the reverse of their
/// input-capture order, so the overlay that owns the keyboard is the one
/// on top.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    // A zero-area frame would panic the layout math
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        // Below ~3 lines there isn't room for the full notice either
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nNeed at least {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    render_board(f, app);

    if app.form.is_some() {
        form::render(f, app);
    }

    if let Some(ref message) = app.alert {
        render_alert_overlay(f, app, message);
    }

    if app.show_help {
        help::render(f, app);
    }
}

/// Render the board: header, sidebar and fact list, count line, status bar.
fn render_board(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let header = Paragraph::new("Today I Learned")
        .alignment(Alignment::Center)
        .style(app.style("header_title"));
    f.render_widget(header, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(22), Constraint::Percentage(78)])
        .split(rows[1]);

    categories::render(f, app, columns[0]);
    facts::render(f, app, columns[1]);
    render_count_line(f, app, rows[2]);
    status::render(f, app, rows[3]);
}

/// Render the fact-count line under the board.
///
/// Suppressed while a load is in flight: the count of a list that is being
/// replaced would only mislead.
fn render_count_line(f: &mut Frame, app: &App, area: Rect) {
    if app.is_loading {
        return;
    }

    let line = Paragraph::new(app.fact_count_message())
        .alignment(Alignment::Center)
        .style(app.style("footer"));
    f.render_widget(line, area);
}

/// Render the load-failure alert centered on screen.
///
/// The board stays visible behind it, still showing whatever list was
/// displayed before the failed load.
fn render_alert_overlay(f: &mut Frame, app: &App, message: &str) {
    let area = f.area();

    let text = format!("{}\n\n(Enter/Esc) Dismiss", message);

    // 50x7 box, shrunk to fit with a margin on small screens
    let width = 50u16.min(area.width.saturating_sub(4));
    let height = 7u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);

    if overlay.width < 10 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("alert_border"))
                .title(" Error "),
        )
        .alignment(Alignment::Center)
        .style(app.style("alert_text"));

    f.render_widget(paragraph, overlay);
}
