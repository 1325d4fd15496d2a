use crate::app::{App, Focus, RowVote};
use crate::store::{Fact, VoteColumn};
use crate::util::{display_width, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Frames of the braille loading spinner.
pub(super) const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Widest the category tag may grow. Categories on rows written by other
/// clients are arbitrary strings, not registry names.
const MAX_TAG_WIDTH: usize = 15;

/// Render the fact list panel.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 10 || area.height < 3 {
        return;
    }

    let is_focused = app.focus == Focus::Facts;
    let border_style = if is_focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", app.filter.label()));

    if app.is_loading {
        let spinner = SPINNER[app.spinner_frame % SPINNER.len()];
        let paragraph = Paragraph::new(format!("{} Loading facts...", spinner))
            .alignment(Alignment::Center)
            .style(app.style("fact_text"))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    if app.facts.is_empty() {
        let paragraph = Paragraph::new("No facts for this category yet. Create the first one!")
            .alignment(Alignment::Center)
            .style(app.style("fact_text"))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .facts
        .iter()
        .enumerate()
        .map(|(i, fact)| fact_row(app, fact, i == app.selected_fact, inner_width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default());

    let mut state = ListState::default().with_selected(Some(app.selected_fact));
    f.render_stateful_widget(list, area, &mut state);
}

/// Build one list row. The selected row grows a second line showing the
/// source URL that `o` would open.
fn fact_row(app: &App, fact: &Fact, selected: bool, inner_width: usize) -> ListItem<'static> {
    let vote = app.vote_for(fact.id);

    let text_style = if selected {
        app.style("fact_selected")
    } else {
        app.style("fact_text")
    };

    // Right-hand cluster first, so the text knows how much room is left
    let tag = tag_span(app, fact);
    let votes = vote_spans(app, fact, vote);

    let disputed = fact.is_disputed();
    let disputed_width = if disputed {
        display_width("[DISPUTED] ")
    } else {
        0
    };
    let cluster_width: usize = std::iter::once(&tag)
        .chain(votes.iter())
        .map(|s| display_width(&s.content))
        .sum::<usize>()
        + 2;

    let text_width = inner_width.saturating_sub(disputed_width + cluster_width);
    let clean = strip_control_chars(&fact.text);
    let text = truncate_to_width(&clean, text_width).into_owned();

    let mut spans: Vec<Span<'static>> = Vec::with_capacity(8);
    if disputed {
        spans.push(Span::styled("[DISPUTED] ", app.style("fact_disputed")));
    }
    spans.push(Span::styled(text, text_style));
    spans.push(Span::raw(" "));
    spans.push(tag);
    spans.push(Span::raw(" "));
    spans.extend(votes);

    if selected {
        let source = strip_control_chars(&fact.source);
        let source = truncate_to_width(&source, inner_width.saturating_sub(4)).into_owned();
        let source_line = Line::from(vec![
            Span::raw("  ↳ "),
            Span::styled(source, app.style("fact_source")),
        ]);
        ListItem::new(vec![Line::from(spans), source_line])
    } else {
        ListItem::new(Line::from(spans))
    }
}

/// Category tag colored from the registry, with a fallback style for
/// categories this build does not know.
fn tag_span(app: &App, fact: &Fact) -> Span<'static> {
    let clean = strip_control_chars(&fact.category);
    let label = truncate_to_width(&clean, MAX_TAG_WIDTH);
    let label = format!(" {} ", label);

    match fact.category_tag() {
        Some(category) => {
            let (r, g, b) = category.rgb();
            Span::styled(
                label,
                Style::default().fg(Color::Black).bg(Color::Rgb(r, g, b)),
            )
        }
        None => Span::styled(label, app.style("tag_fallback")),
    }
}

/// The three vote counters for one row.
///
/// The counter holding the user's vote renders active. Counts come straight
/// from the row, so they move only once the server confirms; the selection
/// highlight is the optimistic part. A trailing marker shows while the
/// round trip is out.
fn vote_spans(app: &App, fact: &Fact, vote: RowVote) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(4);
    for (i, column) in VoteColumn::ALL.iter().enumerate() {
        let style = if vote.selected == Some(*column) {
            app.style("vote_active")
        } else {
            app.style("vote_count")
        };
        let sep = if i == 0 { "" } else { " " };
        spans.push(Span::styled(
            format!("{}{} {}", sep, column.symbol(), fact.votes(*column)),
            style,
        ));
    }
    if vote.updating {
        spans.push(Span::styled(" …", app.style("vote_count")));
    }
    spans
}
