use crate::app::{App, FactForm, FormField};
use ratatui::{
    layout::Rect,
    style::Color,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use super::facts::SPINNER;

/// Render the share-a-fact form overlay.
pub fn render(f: &mut Frame, app: &App) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    let area = f.area();

    let width = 64u16.min(area.width.saturating_sub(4));
    let height = 14u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);

    if overlay.width < 30 || overlay.height < 10 {
        return;
    }

    f.render_widget(Clear, overlay);

    let inner_width = overlay.width.saturating_sub(2) as usize;
    let paragraph = Paragraph::new(form_lines(app, form, inner_width)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.style("panel_border_focused"))
            .title(" Share a fact "),
    );
    f.render_widget(paragraph, overlay);
}

/// Lay out the form body: three labeled fields, the character countdown,
/// and the key hints (or the posting indicator while the insert is out).
fn form_lines(app: &App, form: &FactForm, inner_width: usize) -> Vec<Line<'static>> {
    let label_style = app.style("form_label");

    let mut lines = Vec::with_capacity(12);
    lines.push(Line::raw(""));
    lines.push(Line::styled(" Fact", label_style));
    lines.push(input_line(
        app,
        form,
        FormField::Text,
        &form.text,
        "Share a fact with the word...",
        inner_width,
    ));

    // Countdown mirrors the submit rule: negative means too long to post
    let counter_style = if form.chars_left() < 0 {
        app.style("form_counter_over")
    } else {
        app.style("form_counter")
    };
    lines.push(Line::styled(format!("{} ", form.chars_left()), counter_style).right_aligned());

    lines.push(Line::styled(" Source", label_style));
    lines.push(input_line(
        app,
        form,
        FormField::Source,
        &form.source,
        "Trustworthy source...",
        inner_width,
    ));
    lines.push(Line::raw(""));
    lines.push(Line::styled(" Category", label_style));
    lines.push(picker_line(app, form));
    lines.push(Line::raw(""));

    if form.is_uploading {
        let spinner = SPINNER[app.spinner_frame % SPINNER.len()];
        lines.push(Line::styled(format!(" {} Posting...", spinner), label_style));
    } else {
        lines.push(Line::styled(
            " (Enter) Post  (Tab) Next field  (Esc) Cancel",
            label_style,
        ));
    }

    lines
}

/// One text input row: focus marker, typed value or placeholder, cursor.
fn input_line(
    app: &App,
    form: &FactForm,
    field: FormField,
    value: &str,
    placeholder: &str,
    inner_width: usize,
) -> Line<'static> {
    let focused = form.field == field && !form.is_uploading;
    let marker = if focused { " > " } else { "   " };
    let style = if focused {
        app.style("form_input_focused")
    } else {
        app.style("form_input")
    };

    let mut spans = vec![Span::styled(marker.to_string(), style)];
    if value.is_empty() {
        spans.push(Span::styled(
            placeholder.to_string(),
            app.style("form_label"),
        ));
    } else {
        // Keep the end of long input visible, typing happens there
        let budget = inner_width.saturating_sub(marker.len() + 1);
        spans.push(Span::styled(tail_fitting(value, budget), style));
        if focused {
            spans.push(Span::styled("_".to_string(), style));
        }
    }
    Line::from(spans)
}

/// The category picker row. Shows the chosen category uppercase in its
/// registry color, or the unset prompt.
fn picker_line(app: &App, form: &FactForm) -> Line<'static> {
    let focused = form.field == FormField::Category && !form.is_uploading;
    let marker = if focused { " > " } else { "   " };
    let style = if focused {
        app.style("form_input_focused")
    } else {
        app.style("form_input")
    };

    let label_span = match form.category {
        Some(category) => {
            let (r, g, b) = category.rgb();
            Span::styled(
                format!("< {} >", category.name().to_uppercase()),
                style.fg(Color::Rgb(r, g, b)),
            )
        }
        None => Span::styled("< Choose category >".to_string(), style),
    };

    Line::from(vec![Span::styled(marker.to_string(), style), label_span])
}

/// Longest suffix of `value` that fits in `max_width` columns.
fn tail_fitting(value: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut start = value.len();
    for (idx, c) in value.char_indices().rev() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        start = idx;
    }
    value[start..].to_string()
}
