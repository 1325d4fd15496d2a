//! Application event handling.
//!
//! This module processes background task completion events: fact list
//! fetches, fact inserts, and vote round trips. All state mutation stays on
//! the event loop thread; tasks only ever send messages here.

use crate::app::{App, AppEvent, RowVote};
use crate::store::{Fact, StoreError, VoteColumn};

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::FactsLoaded { generation, result } => {
            handle_facts_loaded(app, generation, result);
        }
        AppEvent::FactInserted { result } => {
            handle_fact_inserted(app, result);
        }
        AppEvent::VoteApplied {
            fact_id,
            selected,
            previous,
            result,
        } => {
            handle_vote_applied(app, fact_id, selected, previous, result);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}

/// Handle a finished fact list fetch.
///
/// A response carrying an older generation lost the race to a newer category
/// selection and is dropped; its task was aborted but the send may already
/// have been queued.
fn handle_facts_loaded(app: &mut App, generation: u64, result: Result<Vec<Fact>, StoreError>) {
    if generation != app.load_generation {
        tracing::debug!(
            expected = app.load_generation,
            got = generation,
            "Ignoring stale list response (generation mismatch)"
        );
        return;
    }

    app.is_loading = false;
    app.load_handle = None;

    match result {
        Ok(facts) => {
            let count = facts.len();
            app.apply_facts(facts);
            tracing::debug!(filter = app.filter.label(), count, "Fact list loaded");
        }
        Err(e) => {
            // Prior list stays in place behind the alert
            tracing::warn!(error = %e, filter = app.filter.label(), "Fact list fetch failed");
            app.alert = Some("There was a problem gathering the data".to_string());
        }
    }
}

/// Handle a finished insert.
///
/// Success prepends the store's returned row (never the local draft) and
/// closes the form. Failure re-enables the form with the draft intact and
/// otherwise stays quiet.
fn handle_fact_inserted(app: &mut App, result: Result<Fact, StoreError>) {
    match result {
        Ok(fact) => {
            tracing::info!(fact_id = fact.id, category = %fact.category, "Fact posted");
            app.prepend_fact(fact);
            app.form = None;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Fact insert failed");
            if let Some(form) = &mut app.form {
                form.is_uploading = false;
            }
        }
    }
}

/// Handle a finished vote round trip for one row.
///
/// Success merges the store's returned row and confirms the optimistic
/// selection. Failure rolls the selection back to what it was before the
/// press. Either way the row's updating flag clears. A row that fell out of
/// the list mid-flight (category switch) just drops its vote state.
fn handle_vote_applied(
    app: &mut App,
    fact_id: i64,
    selected: Option<VoteColumn>,
    previous: Option<VoteColumn>,
    result: Result<Fact, StoreError>,
) {
    let listed = app.facts.iter().any(|f| f.id == fact_id);

    match result {
        Ok(fact) => {
            if listed {
                app.merge_fact(fact);
                app.votes.insert(
                    fact_id,
                    RowVote {
                        selected,
                        updating: false,
                    },
                );
            } else {
                tracing::debug!(fact_id, "Voted row no longer listed, dropping result");
                app.votes.remove(&fact_id);
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, fact_id, "Vote update failed, restoring previous selection");
            if listed {
                app.votes.insert(
                    fact_id,
                    RowVote {
                        selected: previous,
                        updating: false,
                    },
                );
            } else {
                app.votes.remove(&fact_id);
            }
        }
    }
}
