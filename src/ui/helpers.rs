//! Helper functions for UI operations.
//!
//! Background task spawning for the three store round trips (list fetch,
//! insert, vote update), plus the panic wrapper that turns task panics into
//! events instead of silent losses.

use crate::app::{App, AppEvent};
use crate::store::{NewFact, StoreClient, VoteColumn};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of a spawned task silently disappearing (caught by Tokio's runtime
/// but never handled), panics are converted to `Err(String)` containing the
/// panic message, which the caller forwards as [`AppEvent::TaskPanicked`].
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else if let Some(e) = panic.downcast_ref::<Box<dyn std::error::Error + Send>>() {
                e.to_string()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Spawn the fact list fetch for the app's current filter.
///
/// Aborts any fetch already in flight and bumps the load generation, so a
/// stale response that still arrives gets discarded by the event handler.
/// One call means exactly one request.
pub(super) fn spawn_facts_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if let Some(handle) = app.load_handle.take() {
        handle.abort();
        tracing::debug!("Aborted previous list fetch task");
    }

    app.load_generation = app.load_generation.wrapping_add(1);
    let generation = app.load_generation;
    app.is_loading = true;
    app.needs_redraw = true;

    let filter = app.filter;
    let store = Arc::clone(&app.store);
    let tx = event_tx.clone();

    tracing::debug!(filter = filter.label(), generation, "Spawning fact list fetch");

    app.load_handle = Some(tokio::spawn(async move {
        let tx_panic = tx.clone();
        match catch_task_panic(async {
            let result = store.list_facts(filter).await;
            if let Err(e) = tx.send(AppEvent::FactsLoaded { generation, result }).await {
                tracing::warn!(error = %e, event = "FactsLoaded", "Channel send failed (receiver dropped)");
            }
        })
        .await
        {
            Ok(()) => {}
            Err(panic_msg) => {
                tracing::error!(task = "list_facts", error = %panic_msg, "Background task panicked");
                let _ = tx_panic
                    .send(AppEvent::TaskPanicked {
                        task: "list_facts",
                        error: panic_msg,
                    })
                    .await;
            }
        }
    }));
}

/// Spawn the insert round trip for a validated draft.
///
/// The caller has already set the form's uploading flag; duplicate submits
/// are blocked by that flag, not here.
pub(super) fn spawn_insert_fact(
    store: Arc<StoreClient>,
    draft: NewFact,
    tx: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        let tx_panic = tx.clone();
        match catch_task_panic(async {
            let result = store.insert_fact(&draft).await;
            if let Err(e) = tx.send(AppEvent::FactInserted { result }).await {
                tracing::warn!(error = %e, event = "FactInserted", "Channel send failed (receiver dropped)");
            }
        })
        .await
        {
            Ok(()) => {}
            Err(panic_msg) => {
                tracing::error!(task = "insert_fact", error = %panic_msg, "Background task panicked");
                let _ = tx_panic
                    .send(AppEvent::TaskPanicked {
                        task: "insert_fact",
                        error: panic_msg,
                    })
                    .await;
            }
        }
    });
}

/// Spawn the vote round trip for one row.
///
/// Re-reads the row first so both columns of a moved vote are computed from
/// the same fresh counters, then writes them in a single update. The caller
/// has already set the row's updating flag and flipped its selection
/// optimistically; `previous` is what the event handler restores on failure.
pub(super) fn spawn_vote_update(
    store: Arc<StoreClient>,
    fact_id: i64,
    selected: Option<VoteColumn>,
    previous: Option<VoteColumn>,
    deltas: Vec<(VoteColumn, i64)>,
    tx: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        let tx_panic = tx.clone();
        match catch_task_panic(async {
            let result = store.apply_vote_deltas(fact_id, &deltas).await;

            if let Err(e) = tx
                .send(AppEvent::VoteApplied {
                    fact_id,
                    selected,
                    previous,
                    result,
                })
                .await
            {
                tracing::warn!(error = %e, event = "VoteApplied", "Channel send failed (receiver dropped)");
            }
        })
        .await
        {
            Ok(()) => {}
            Err(panic_msg) => {
                tracing::error!(task = "vote_update", fact_id, error = %panic_msg, "Background task panicked");
                let _ = tx_panic
                    .send(AppEvent::TaskPanicked {
                        task: "vote_update",
                        error: panic_msg,
                    })
                    .await;
            }
        }
    });
}
