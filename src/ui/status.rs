use crate::app::App;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // Status bar needs at least 1 char width to be meaningful
    if area.width < 1 || area.height < 1 {
        return;
    }

    // Use Cow to avoid allocations for the static hint lines
    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.form.is_some() {
        Cow::Borrowed("[Tab]next field [Enter]post [Esc]cancel")
    } else if app.alert.is_some() {
        Cow::Borrowed("[Enter/Esc]dismiss")
    } else if app.show_help {
        Cow::Borrowed("[Esc]close help")
    } else {
        Cow::Borrowed(
            "[j/k]move [Tab]switch [1/2/3]vote [n]ew [o]pen [r]eload [t]heme [?]help [q]uit",
        )
    };

    let paragraph = Paragraph::new(text).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}
