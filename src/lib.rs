//! Terminal client for a shared "Today I Learned" facts board.
//!
//! The board lives behind a PostgREST-style HTTP API: the client lists
//! facts by category, posts new ones, and records reaction votes. All
//! state of record stays on the server; this crate renders the board in
//! a TUI and keeps its local view consistent with what the server
//! confirms.

pub mod app;
pub mod categories;
pub mod config;
pub mod store;
pub mod theme;
pub mod ui;
pub mod util;
