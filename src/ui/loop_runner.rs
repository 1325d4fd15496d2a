//! The event loop driving the board.
//!
//! Multiplexes terminal input, background store round trips, and a periodic
//! tick over one `select!`, with all state mutation staying on this task.

use crate::app::{App, AppEvent};
use anyhow::Result;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::events::handle_app_event;
use super::helpers::spawn_facts_load;
use super::input::handle_input;
use super::render::render;

/// What the input layer decided a key press means for the loop.
pub enum Action {
    /// Keep going.
    Continue,
    /// Leave the loop and restore the terminal.
    Quit,
}

/// Runs the board until the user quits or the input stream closes.
///
/// Three event sources feed the loop: key presses from crossterm's async
/// stream, completions from background store tasks over the `AppEvent`
/// channel, and a 250ms tick that expires status messages and animates the
/// spinner. The initial list load for the configured category is spawned
/// before the first draw, so the board comes up loading rather than empty.
///
/// A panic hook leaves raw mode and the alternate screen before unwinding,
/// so a crash never strands the terminal.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    // Hook goes in before raw mode, so even setup failures restore the screen
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();

    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    // Unix signals; elsewhere the select arms get never-ready futures
    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    spawn_facts_load(app, &event_tx);

    loop {
        // Only render when state has changed
        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        // An expired status message means one redraw to blank the bar
        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        // Drain all pending app events before handling more input. This
        // ensures background task results are processed promptly even during
        // rapid key repeat, so a vote confirmation is never starved by the
        // keys that follow it.
        while let Ok(event) = event_rx.try_recv() {
            app.needs_redraw = true;
            handle_app_event(app, event);
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;  // Arms are checked in order: signals beat input beat ticks

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        app.needs_redraw = true;
                        match handle_input(app, key.code, key.modifiers, &event_tx) {
                            Action::Quit => break,
                            Action::Continue => {}
                        }
                    }
                    Some(Ok(Event::Resize(_, _))) => {
                        app.needs_redraw = true;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Terminal input stream error");
                    }
                    // Input stream closed, nothing left to read
                    None => break,
                }
            }

            // Blocking recv covers the case where the drain above found nothing
            Some(event) = event_rx.recv() => {
                app.needs_redraw = true;
                handle_app_event(app, event);
            }

            _ = tick_interval.tick() => {
                handle_tick(app);
            }
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

/// Handle periodic tick: advance the spinner while network work is visible.
fn handle_tick(app: &mut App) {
    let animating = app.is_loading || app.form.as_ref().is_some_and(|f| f.is_uploading);
    if animating {
        app.spinner_frame = (app.spinner_frame + 1) % super::facts::SPINNER.len();
        app.needs_redraw = true;
    }
}

/// Raw mode plus the alternate screen, undone by `restore_terminal`.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Hand the terminal back to the shell.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
