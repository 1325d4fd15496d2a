//! Terminal User Interface module.
//!
//! This module provides the TUI for the facts board, including:
//! - Main event loop (`run`)
//! - Input handling for the board, the share form, and the overlays
//! - Rendering for the category sidebar, fact list, and status bar
//! - Background task event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Layout and overlay dispatch
//! - `helpers` - Background task spawning
//! - `categories` - Category sidebar widget
//! - `facts` - Fact list widget
//! - `form` - Share-a-fact form overlay
//! - `help` - Key table overlay
//! - `status` - Status bar widget

// Submodules for UI components
mod categories;
mod events;
mod facts;
mod form;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod status;

// Re-export the public API
pub use loop_runner::{run, Action};
