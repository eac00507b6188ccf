//! Terminal User Interface module.
//!
//! This module provides the TUI for the reading client, including:
//! - Main event loop (`run`)
//! - Keyboard input dispatch across views and overlays
//! - Rendering for the feed, reader, editor, and library views
//! - Background task event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - View rendering dispatch and overlays
//! - `helpers` - Shared widgets and spawned file reads
//! - `feed` - Home feed (tabs, featured cards, list, sidebar)
//! - `reader` - Article detail view
//! - `editor` - Compose/publish form
//! - `saved` / `history` / `downloads` - Library list views
//! - `categories` - Category explorer
//! - `profile` - Author profile view
//! - `settings` - Account settings and the premium upgrade card
//! - `audio` / `feedback` - Static shelf and feedback views
//! - `status` - Status bar widget

mod audio;
mod categories;
mod downloads;
mod editor;
mod events;
mod feed;
mod feedback;
mod help;
mod helpers;
mod history;
mod input;
mod loop_runner;
mod profile;
pub mod reader;
mod render;
mod saved;
mod settings;
mod status;

// Re-export the public API
pub use loop_runner::{run, Action};
