use crate::app::{App, Focus};
use crate::categories::Category;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the category sidebar panel.
///
/// Row 0 is "all"; the rest are the fixed categories, each with a bullet in
/// its registry color. The row under the cursor uses the selected style, and
/// the currently active filter is bold regardless of where the cursor sits.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let is_focused = app.focus == Focus::Categories;

    let style_selected = app.style("sidebar_selected");
    let style_normal = app.style("sidebar_normal");

    let mut items: Vec<ListItem> = Vec::with_capacity(app.sidebar_len());

    let all_style = row_style(app, 0, style_selected, style_normal);
    items.push(ListItem::new(Line::from(Span::styled("  all", all_style))));

    for (i, category) in Category::ALL.iter().enumerate() {
        let row = i + 1;
        let style = row_style(app, row, style_selected, style_normal);
        let (r, g, b) = category.rgb();

        let line = Line::from(vec![
            Span::styled("● ", Style::default().fg(Color::Rgb(r, g, b))),
            Span::styled(category.name(), style),
        ]);
        items.push(ListItem::new(line));
    }

    let border_style = if is_focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("Categories"),
        )
        .highlight_style(Style::default());

    let mut state = ListState::default().with_selected(Some(app.selected_sidebar));
    f.render_stateful_widget(list, area, &mut state);
}

/// Style for one sidebar row: cursor beats normal, active filter adds bold.
fn row_style(app: &App, row: usize, selected: Style, normal: Style) -> Style {
    let style = if app.selected_sidebar == row {
        selected
    } else {
        normal
    };
    if app.filter == app.sidebar_filter(row) {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}
