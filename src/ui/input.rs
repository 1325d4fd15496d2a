//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler. Overlays (help, alert, form) capture all keys while visible;
//! otherwise keys act on the board view.

use crate::app::{App, AppEvent, FactForm, Focus, FormField, RowVote, vote_transition};
use crate::categories::CategoryFilter;
use crate::store::VoteColumn;
use crate::util::validate_source_url;
use crossterm::event::{KeyCode, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::helpers::{spawn_facts_load, spawn_insert_fact, spawn_vote_update};
use super::Action;

/// Cap on typed fact text. Well over the submit limit so the counter can go
/// negative, but bounded against held keys.
const MAX_TEXT_INPUT: usize = 1024;

/// Cap on typed source URL length.
const MAX_SOURCE_INPUT: usize = 2048;

/// Main input dispatch function.
///
/// Routes input to the appropriate handler based on which overlay, if any,
/// is on top.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Overlays capture all keys while visible, topmost first
    if app.show_help {
        return handle_help_input(app, code);
    }
    if app.alert.is_some() {
        return handle_alert_input(app, code);
    }
    if app.form.is_some() {
        return handle_form_input(app, code, event_tx);
    }
    handle_board_input(app, code, modifiers, event_tx)
}

/// Handle input while the help overlay is visible.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input while the load-failure alert is visible.
///
/// The alert is blocking: only an explicit dismissal gets back to the board.
fn handle_alert_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Enter | KeyCode::Esc => {
            app.alert = None;
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input while the share-a-fact form is open.
///
/// While an insert is outstanding every key is ignored, mirroring the
/// disabled inputs of the board; the request timeout guarantees the flag
/// eventually clears.
fn handle_form_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    // Take ownership temporarily to mutate the draft
    let Some(mut form) = app.form.take() else {
        return Action::Continue;
    };

    if form.is_uploading {
        app.form = Some(form);
        return Action::Continue;
    }

    match code {
        KeyCode::Esc => {
            // Discard the draft — form stays None from take()
        }
        KeyCode::Tab | KeyCode::Down => {
            form.field = form.field.next();
            app.form = Some(form);
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.field = form.field.prev();
            app.form = Some(form);
        }
        KeyCode::Enter => {
            match form.draft() {
                Some(draft) => {
                    form.is_uploading = true;
                    tracing::debug!(category = draft.category.name(), "Submitting fact");
                    spawn_insert_fact(Arc::clone(&app.store), draft, event_tx.clone());
                }
                None => {
                    // Invalid draft never reaches the network
                    tracing::debug!("Submit ignored, draft incomplete");
                }
            }
            app.form = Some(form);
        }
        KeyCode::Backspace => {
            match form.field {
                FormField::Text => {
                    form.text.pop();
                }
                FormField::Source => {
                    form.source.pop();
                }
                FormField::Category => {
                    form.category = None;
                }
            }
            app.form = Some(form);
        }
        KeyCode::Left if form.field == FormField::Category => {
            form.cycle_category_backward();
            app.form = Some(form);
        }
        KeyCode::Right if form.field == FormField::Category => {
            form.cycle_category_forward();
            app.form = Some(form);
        }
        KeyCode::Char(c) => {
            match form.field {
                FormField::Text => {
                    if form.text.len() < MAX_TEXT_INPUT {
                        form.text.push(c);
                    }
                }
                FormField::Source => {
                    if form.source.len() < MAX_SOURCE_INPUT {
                        form.source.push(c);
                    }
                }
                FormField::Category => match c {
                    'j' | 'l' | ' ' => form.cycle_category_forward(),
                    'k' | 'h' => form.cycle_category_backward(),
                    _ => {}
                },
            }
            app.form = Some(form);
        }
        _ => {
            app.form = Some(form);
        }
    }
    Action::Continue
}

/// Handle input on the board view (sidebar + fact list).
fn handle_board_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::Categories => Focus::Facts,
                Focus::Facts => Focus::Categories,
            };
        }
        KeyCode::Enter => handle_enter_key(app, event_tx),
        KeyCode::Char('1') => press_vote(app, VoteColumn::Interesting, event_tx),
        KeyCode::Char('2') => press_vote(app, VoteColumn::Mindblow, event_tx),
        KeyCode::Char('3') => press_vote(app, VoteColumn::False, event_tx),
        KeyCode::Char('n') => {
            app.form = Some(FactForm::new());
        }
        KeyCode::Char('o') => open_selected_source(app),
        KeyCode::Char('r') => spawn_facts_load(app, event_tx),
        KeyCode::Char('t') => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        _ => {}
    }
    Action::Continue
}

/// Handle Enter on the board: apply the highlighted category filter, or vote
/// "interesting" on the selected fact.
fn handle_enter_key(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    match app.focus {
        Focus::Categories => {
            let chosen = app.sidebar_filter(app.selected_sidebar);
            apply_filter(app, chosen, event_tx);
        }
        Focus::Facts => press_vote(app, VoteColumn::Interesting, event_tx),
    }
}

/// Switch the active filter and load its facts.
///
/// Re-selecting the current filter is a no-op: one fetch per filter change,
/// nothing for a change that isn't one.
fn apply_filter(app: &mut App, chosen: CategoryFilter, event_tx: &mpsc::Sender<AppEvent>) {
    if chosen == app.filter {
        tracing::debug!(filter = chosen.label(), "Filter unchanged, skipping fetch");
        return;
    }
    app.filter = chosen;
    app.focus = Focus::Facts;
    spawn_facts_load(app, event_tx);
}

/// Press a vote button on the selected fact.
///
/// Flips the selection optimistically and spawns the round trip; the event
/// handler confirms the flip or rolls it back. A press while the row's
/// previous round trip is still out is ignored.
fn press_vote(app: &mut App, column: VoteColumn, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(fact) = app.selected_fact() else {
        return;
    };
    let fact_id = fact.id;

    let current = app.vote_for(fact_id);
    if current.updating {
        tracing::debug!(fact_id, "Vote round trip outstanding for row, ignoring press");
        return;
    }

    let (selected, deltas) = vote_transition(current.selected, column);
    app.votes.insert(
        fact_id,
        RowVote {
            selected,
            updating: true,
        },
    );
    app.needs_redraw = true;

    spawn_vote_update(
        Arc::clone(&app.store),
        fact_id,
        selected,
        current.selected,
        deltas,
        event_tx.clone(),
    );
}

/// Open the selected fact's source in the system browser.
///
/// Rows written by other clients may carry anything in `source`, so it is
/// re-validated before handing it to the opener.
fn open_selected_source(app: &mut App) {
    let Some(source) = app.selected_fact().map(|f| f.source.clone()) else {
        return;
    };

    match validate_source_url(&source) {
        Ok(url) => {
            if let Err(e) = open::that(url.as_str()) {
                app.set_status(format!("Failed to open browser: {}", e));
            } else {
                app.set_status("Opening source...");
            }
        }
        Err(e) => {
            app.set_status(format!("Cannot open source: {}", e));
        }
    }
}
