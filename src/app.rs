//! Application state management.
//!
//! Holds everything the input, event, and render layers share: the fact list
//! and its per-row vote bookkeeping, the category sidebar, the share-a-fact
//! form, overlay flags, status messages, and the active theme. All mutation
//! happens on the event loop thread; background tasks communicate back through
//! [`AppEvent`].

use crate::categories::{Category, CategoryFilter};
use crate::store::{Fact, NewFact, StoreClient, StoreError, VoteColumn};
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::is_valid_http_url;
use ratatui::style::Style;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Hard cap on fact text length, counted in characters.
pub const FACT_TEXT_MAX: usize = 200;

/// Which panel owns navigation keys in the board view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Category sidebar on the left.
    Categories,
    /// Fact list on the right.
    Facts,
}

/// Input field focused inside the share-a-fact form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Text,
    Source,
    Category,
}

impl FormField {
    /// Next field in Tab order (wraps).
    pub fn next(self) -> Self {
        match self {
            FormField::Text => FormField::Source,
            FormField::Source => FormField::Category,
            FormField::Category => FormField::Text,
        }
    }

    /// Previous field in Tab order (wraps).
    pub fn prev(self) -> Self {
        match self {
            FormField::Text => FormField::Category,
            FormField::Source => FormField::Text,
            FormField::Category => FormField::Source,
        }
    }
}

/// Draft state for the share-a-fact overlay.
///
/// The draft is only validated at submit time; until then any content is
/// allowed, including text past the limit (the counter goes negative so the
/// user can see how far over they are).
#[derive(Debug, Clone, Default)]
pub struct FactForm {
    pub text: String,
    pub source: String,
    /// Chosen category, or `None` while still on "choose category".
    pub category: Option<Category>,
    pub field: FormField,
    /// True while an insert round trip is outstanding; inputs are disabled.
    pub is_uploading: bool,
}

impl FactForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Characters still available before the text limit. Negative once the
    /// draft runs over.
    pub fn chars_left(&self) -> i64 {
        FACT_TEXT_MAX as i64 - self.text.chars().count() as i64
    }

    /// Build the row to insert, or `None` while the draft is incomplete.
    ///
    /// The submit gate: non-empty text within the limit, a source that parses
    /// as an absolute http(s) URL, and a chosen category. An incomplete draft
    /// never reaches the network.
    pub fn draft(&self) -> Option<NewFact> {
        if self.text.is_empty() || self.text.chars().count() > FACT_TEXT_MAX {
            return None;
        }
        if !is_valid_http_url(&self.source) {
            return None;
        }
        let category = self.category?;
        Some(NewFact {
            text: self.text.clone(),
            source: self.source.clone(),
            category,
        })
    }

    /// Step the category picker forward, wrapping from the last entry back to
    /// the first. Starts at the first entry when none is chosen yet.
    pub fn cycle_category_forward(&mut self) {
        self.category = match self.category {
            None => Some(Category::ALL[0]),
            Some(cat) => Some(Category::ALL[(cat.index() + 1) % Category::ALL.len()]),
        };
    }

    /// Step the category picker backward, wrapping from the first entry to the
    /// last.
    pub fn cycle_category_backward(&mut self) {
        self.category = match self.category {
            None => Some(Category::ALL[Category::ALL.len() - 1]),
            Some(cat) => {
                Some(Category::ALL[(cat.index() + Category::ALL.len() - 1) % Category::ALL.len()])
            }
        };
    }
}

/// Vote bookkeeping for one fact row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowVote {
    /// Which vote button the reader currently has down, if any.
    pub selected: Option<VoteColumn>,
    /// True while a vote round trip for this row is outstanding; the row's
    /// vote keys are ignored until it lands.
    pub updating: bool,
}

/// Compute the result of pressing a vote button given the row's current
/// selection.
///
/// Returns the new selection plus the per-column count deltas the store must
/// absorb. Pressing the held button releases it; pressing a different one
/// moves the vote, which touches two columns in a single update.
pub fn vote_transition(
    current: Option<VoteColumn>,
    pressed: VoteColumn,
) -> (Option<VoteColumn>, Vec<(VoteColumn, i64)>) {
    match current {
        None => (Some(pressed), vec![(pressed, 1)]),
        Some(held) if held == pressed => (None, vec![(pressed, -1)]),
        Some(held) => (Some(pressed), vec![(held, -1), (pressed, 1)]),
    }
}

/// Events sent from background tasks to the main event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A fact list fetch finished, successfully or not.
    FactsLoaded {
        /// Generation at spawn time; stale responses are discarded.
        generation: u64,
        result: Result<Vec<Fact>, StoreError>,
    },
    /// A fact insert finished; on success carries the row the store created.
    FactInserted { result: Result<Fact, StoreError> },
    /// A vote round trip finished for one row.
    VoteApplied {
        fact_id: i64,
        /// Selection the press asked for.
        selected: Option<VoteColumn>,
        /// Selection to restore if the round trip failed.
        previous: Option<VoteColumn>,
        result: Result<Fact, StoreError>,
    },
    /// A background task panicked; carries the panic message.
    TaskPanicked { task: &'static str, error: String },
}

/// Main application state.
pub struct App {
    /// Shared PostgREST client; cloned into background tasks.
    pub store: Arc<StoreClient>,

    // Fact list
    /// Current fact list. Arc so background tasks can hold cheap read-only
    /// clones; mutation goes through `Arc::make_mut` on the event loop thread.
    pub facts: Arc<Vec<Fact>>,
    /// Per-row vote state keyed by fact id. Cleared whenever a fresh list
    /// lands, so selections never outlive the list they were made against.
    pub votes: HashMap<i64, RowVote>,
    pub selected_fact: usize,

    // Category sidebar
    /// Filter the current fact list was loaded with.
    pub filter: CategoryFilter,
    /// Sidebar cursor: 0 is "all", 1..=N the categories in registry order.
    pub selected_sidebar: usize,

    pub focus: Focus,

    // List loading
    pub is_loading: bool,
    /// Incremented for every spawned list fetch; responses carrying an older
    /// generation lost the race and are dropped.
    pub load_generation: u64,
    pub load_handle: Option<JoinHandle<()>>,

    // Overlays
    /// Share-a-fact form; `Some` while the overlay is open.
    pub form: Option<FactForm>,
    pub show_help: bool,
    /// Blocking alert shown when a list fetch fails. The previous list stays
    /// up behind it.
    pub alert: Option<String>,

    // Status bar
    /// Transient message and the time it was set; expires after 3 seconds.
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    // Render state
    pub spinner_frame: usize,
    pub needs_redraw: bool,
}

impl App {
    pub fn new(
        store: Arc<StoreClient>,
        filter: CategoryFilter,
        theme_variant: ThemeVariant,
    ) -> Self {
        let theme = StyleMap::from_palette(&theme_variant.palette());
        let selected_sidebar = match filter {
            CategoryFilter::All => 0,
            CategoryFilter::Only(cat) => cat.index() + 1,
        };

        Self {
            store,
            facts: Arc::new(Vec::new()),
            votes: HashMap::new(),
            selected_fact: 0,
            filter,
            selected_sidebar,
            focus: Focus::Facts,
            is_loading: false,
            load_generation: 0,
            load_handle: None,
            form: None,
            show_help: false,
            alert: None,
            status_message: None,
            theme_variant,
            theme,
            spinner_frame: 0,
            needs_redraw: true,
        }
    }

    /// Look up a style by role name in the active theme.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    /// Switch to the given theme variant and rebuild the style map.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant. Returns the new variant's name for
    /// status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        self.set_theme(self.theme_variant.next());
        self.theme_variant.name()
    }

    /// Number of sidebar entries ("all" plus each registered category).
    pub fn sidebar_len(&self) -> usize {
        Category::ALL.len() + 1
    }

    /// Filter behind a sidebar row. Row 0 is "all"; the rest follow registry
    /// order.
    pub fn sidebar_filter(&self, index: usize) -> CategoryFilter {
        if index == 0 {
            CategoryFilter::All
        } else {
            Category::ALL
                .get(index - 1)
                .copied()
                .map(CategoryFilter::Only)
                .unwrap_or(CategoryFilter::All)
        }
    }

    /// Currently selected fact, if the list has one.
    pub fn selected_fact(&self) -> Option<&Fact> {
        self.facts.get(self.selected_fact)
    }

    /// Vote bookkeeping for a row, defaulting to "nothing pressed".
    pub fn vote_for(&self, fact_id: i64) -> RowVote {
        self.votes.get(&fact_id).copied().unwrap_or_default()
    }

    /// Replace the fact list with a fresh store response.
    ///
    /// Per-row vote selections are dropped along with the old rows; they
    /// belong to the list they were made against.
    pub fn apply_facts(&mut self, facts: Vec<Fact>) {
        self.facts = Arc::new(facts);
        self.votes.clear();
        self.selected_fact = 0;
        self.clamp_selections();
    }

    /// Replace the row matching `updated.id` with the store's returned copy.
    ///
    /// Returns false when the row is no longer in the list (the user switched
    /// category while the round trip was in flight).
    ///
    /// SAFETY: all `Arc::make_mut` calls on `facts` must happen on the event
    /// loop thread. Background tasks may hold Arc clones for reading but must
    /// never mutate.
    pub fn merge_fact(&mut self, updated: Fact) -> bool {
        let facts = Arc::make_mut(&mut self.facts);
        if let Some(slot) = facts.iter_mut().find(|f| f.id == updated.id) {
            *slot = updated;
            true
        } else {
            false
        }
    }

    /// Put a freshly inserted row at the top of the list and select it.
    pub fn prepend_fact(&mut self, fact: Fact) {
        let facts = Arc::make_mut(&mut self.facts);
        facts.insert(0, fact);
        self.selected_fact = 0;
        self.focus = Focus::Facts;
    }

    /// Footer line under the list: the board's running tally, or an invitation
    /// when the current category is empty.
    pub fn fact_count_message(&self) -> Cow<'static, str> {
        match self.facts.len() {
            0 => Cow::Borrowed("No facts for this category yet. Create the first one!"),
            1 => Cow::Borrowed("There is 1 fact in the database. Add your own!"),
            n => Cow::Owned(format!(
                "There are {} facts in the database. Add your own!",
                n
            )),
        }
    }

    /// Move selection down in the focused panel.
    pub fn nav_down(&mut self) {
        match self.focus {
            Focus::Categories => {
                self.selected_sidebar = (self.selected_sidebar + 1).min(self.sidebar_len() - 1);
            }
            Focus::Facts => {
                if !self.facts.is_empty() {
                    self.selected_fact = (self.selected_fact + 1).min(self.facts.len() - 1);
                }
            }
        }
    }

    /// Move selection up in the focused panel.
    pub fn nav_up(&mut self) {
        match self.focus {
            Focus::Categories => {
                self.selected_sidebar = self.selected_sidebar.saturating_sub(1);
            }
            Focus::Facts => {
                self.selected_fact = self.selected_fact.saturating_sub(1);
            }
        }
    }

    /// Clamp all selection indices to valid ranges.
    ///
    /// Call after any list mutation to prevent out-of-bounds access.
    pub fn clamp_selections(&mut self) {
        if self.facts.is_empty() {
            self.selected_fact = 0;
        } else if self.selected_fact >= self.facts.len() {
            self.selected_fact = self.facts.len() - 1;
        }

        if self.selected_sidebar >= self.sidebar_len() {
            self.selected_sidebar = self.sidebar_len() - 1;
        }

        debug_assert!(self.facts.is_empty() || self.selected_fact < self.facts.len());
        debug_assert!(self.selected_sidebar < self.sidebar_len());
    }

    /// Set a transient status bar message.
    pub fn set_status(&mut self, message: impl Into<Cow<'static, str>>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Clear the status message once it has been visible for 3 seconds.
    ///
    /// Returns true if a message was cleared (caller should redraw).
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, set_at)) = &self.status_message {
            if set_at.elapsed() >= Duration::from_secs(3) {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Abort the in-flight list fetch so it doesn't outlive the UI
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted list fetch task on app drop");
        }
    }
}
