//! Colors for the board, keyed by role name.
//!
//! `ThemeVariant` picks a Dark or Light `ColorPalette`, and `StyleMap`
//! turns that palette into a string-keyed lookup the render code can
//! query without knowing which variant is active.
//!
//! Category tag colors are not palette roles: they are the fixed
//! registry RGB values and do not change with the theme. Only the
//! fallback style for unregistered category names lives here.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// The two built-in palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Look up a variant by name, ignoring case.
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// The palette this variant paints with.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// The other variant, for the theme-toggle key.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Variant name as accepted by `from_str_name`, for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

// ============================================================================
// Color Palettes
// ============================================================================

/// One `Style` per visual role on the board.
///
/// Both variants fill in every field, so role lookups never miss.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Category sidebar --
    pub sidebar_normal: Style,
    pub sidebar_selected: Style,

    // -- Fact list --
    pub fact_text: Style,
    pub fact_selected: Style,
    pub fact_source: Style,
    pub fact_disputed: Style,
    pub vote_count: Style,
    pub vote_active: Style,
    /// Tag style for facts whose category is not in the registry.
    pub tag_fallback: Style,

    // -- New fact form --
    pub form_label: Style,
    pub form_input: Style,
    pub form_input_focused: Style,
    pub form_counter: Style,
    pub form_counter_over: Style,

    // -- Chrome --
    pub header_title: Style,
    pub footer: Style,
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,

    // -- Alert overlay --
    pub alert_border: Style,
    pub alert_text: Style,
}

impl ColorPalette {
    /// Dark palette, the default.
    fn dark() -> Self {
        Self {
            // Category sidebar
            sidebar_normal: Style::default(),
            sidebar_selected: Style::default().bg(Color::DarkGray).fg(Color::White),

            // Fact list
            fact_text: Style::default(),
            fact_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            fact_source: Style::default().fg(Color::DarkGray),
            fact_disputed: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            vote_count: Style::default().fg(Color::Gray),
            vote_active: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            tag_fallback: Style::default().bg(Color::Gray).fg(Color::Black),

            // New fact form
            form_label: Style::default().fg(Color::Cyan),
            form_input: Style::default(),
            form_input_focused: Style::default().fg(Color::Cyan),
            form_counter: Style::default().fg(Color::DarkGray),
            form_counter_over: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            // Chrome
            header_title: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            footer: Style::default().fg(Color::DarkGray),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),

            // Alert overlay
            alert_border: Style::default().fg(Color::Red),
            alert_text: Style::default(),
        }
    }

    /// Light palette, for white-background terminals.
    fn light() -> Self {
        Self {
            // Category sidebar
            sidebar_normal: Style::default().fg(Color::Black),
            sidebar_selected: Style::default().bg(Color::Blue).fg(Color::White),

            // Fact list
            fact_text: Style::default().fg(Color::Black),
            fact_selected: Style::default().bg(Color::Blue).fg(Color::White),
            fact_source: Style::default().fg(Color::DarkGray),
            fact_disputed: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            vote_count: Style::default().fg(Color::DarkGray),
            vote_active: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            tag_fallback: Style::default().bg(Color::DarkGray).fg(Color::White),

            // New fact form
            form_label: Style::default().fg(Color::Blue),
            form_input: Style::default().fg(Color::Black),
            form_input_focused: Style::default().fg(Color::Blue),
            form_counter: Style::default().fg(Color::DarkGray),
            form_counter_over: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            // Chrome
            header_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            footer: Style::default().fg(Color::DarkGray),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),

            // Alert overlay
            alert_border: Style::default().fg(Color::Red),
            alert_text: Style::default().fg(Color::Black),
        }
    }
}

// ============================================================================
// Style Map — string-keyed lookup used by the render path
// ============================================================================

/// String-keyed style lookup.
///
/// Built from a `ColorPalette`, this resolves role names (e.g.
/// `"fact_selected"`) to concrete `Style`s at render time, so a theme
/// switch only has to rebuild this map.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// Role names, ordered to match the palette fields.
const ROLE_NAMES: [&str; 21] = [
    "sidebar_normal",
    "sidebar_selected",
    "fact_text",
    "fact_selected",
    "fact_source",
    "fact_disputed",
    "vote_count",
    "vote_active",
    "tag_fallback",
    "form_label",
    "form_input",
    "form_input_focused",
    "form_counter",
    "form_counter_over",
    "header_title",
    "footer",
    "status_bar",
    "panel_border",
    "panel_border_focused",
    "alert_border",
    "alert_text",
];

impl StyleMap {
    /// Flatten a palette into the name-keyed map.
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 21] = [
            p.sidebar_normal,
            p.sidebar_selected,
            p.fact_text,
            p.fact_selected,
            p.fact_source,
            p.fact_disputed,
            p.vote_count,
            p.vote_active,
            p.tag_fallback,
            p.form_label,
            p.form_input,
            p.form_input_focused,
            p.form_counter,
            p.form_counter_over,
            p.header_title,
            p.footer,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
            p.alert_border,
            p.alert_text,
        ];

        let mut map = HashMap::with_capacity(ROLE_NAMES.len());
        for (name, style) in ROLE_NAMES.iter().zip(styles.iter()) {
            map.insert(*name, *style);
        }

        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for
    /// unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_palette_selection_uses_dark_gray() {
        let palette = ThemeVariant::Dark.palette();
        assert_eq!(
            palette.fact_selected,
            Style::default().bg(Color::DarkGray).fg(Color::White)
        );
        assert_eq!(palette.sidebar_selected, palette.fact_selected);
    }

    #[test]
    fn dark_palette_focus_border_is_cyan() {
        let palette = ThemeVariant::Dark.palette();
        assert_eq!(
            palette.panel_border_focused,
            Style::default().fg(Color::Cyan)
        );
    }

    #[test]
    fn dark_palette_status_bar_is_inverted() {
        let palette = ThemeVariant::Dark.palette();
        assert_eq!(
            palette.status_bar,
            Style::default().bg(Color::DarkGray).fg(Color::White)
        );
    }

    #[test]
    fn disputed_marker_is_bold_red_in_both_variants() {
        for variant in [ThemeVariant::Dark, ThemeVariant::Light] {
            let palette = variant.palette();
            assert_eq!(
                palette.fact_disputed,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            );
        }
    }

    #[test]
    fn fallback_tag_is_visible_in_both_variants() {
        // An unregistered category must still get a styled tag.
        for variant in [ThemeVariant::Dark, ThemeVariant::Light] {
            let palette = variant.palette();
            assert_ne!(palette.tag_fallback, Style::default());
        }
    }

    #[test]
    fn light_palette_differs_from_dark() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        // The variants must actually disagree on the high-traffic roles
        assert_ne!(dark.fact_selected, light.fact_selected);
        assert_ne!(dark.vote_active, light.vote_active);
    }

    #[test]
    fn variant_from_str_name() {
        assert_eq!(
            ThemeVariant::from_str_name("dark"),
            Some(ThemeVariant::Dark)
        );
        assert_eq!(
            ThemeVariant::from_str_name("Light"),
            Some(ThemeVariant::Light)
        );
        assert_eq!(
            ThemeVariant::from_str_name("DARK"),
            Some(ThemeVariant::Dark)
        );
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
    }

    #[test]
    fn variant_cycle_round_trips() {
        assert_eq!(ThemeVariant::Dark.next(), ThemeVariant::Light);
        assert_eq!(ThemeVariant::Light.next(), ThemeVariant::Dark);
    }

    #[test]
    fn style_map_resolves_known_roles() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);

        assert_eq!(sm.resolve("fact_selected"), palette.fact_selected);
        assert_eq!(sm.resolve("vote_active"), palette.vote_active);
        assert_eq!(sm.resolve("status_bar"), palette.status_bar);
    }

    #[test]
    fn style_map_returns_default_for_unknown() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);
        assert_eq!(sm.resolve("nonexistent_role"), Style::default());
    }

    #[test]
    fn style_map_has_all_roles() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);
        for name in ROLE_NAMES {
            assert!(sm.map.contains_key(name), "role '{}' not in map", name);
        }
    }

    #[test]
    fn role_names_count_matches_palette_fields() {
        // Keeps ROLE_NAMES in sync with the palette: a role added to
        // ColorPalette but not here fails the from_palette array length.
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);
        assert_eq!(sm.map.len(), ROLE_NAMES.len());
    }
}
