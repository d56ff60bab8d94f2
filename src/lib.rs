// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. store::StoreError)
    clippy::module_name_repetitions
)]

//! # Blockpad
//!
//! A block-based notes editor for the terminal.
//!
//! Every project is a titled page of blocks:
//! - Text, three heading levels, bullet and numbered items
//! - Checkable todos, quotes and collapsible toggles
//! - A `/` insertion menu and markdown-style typing shortcuts
//! - A JSON store that can be watched for changes made elsewhere
//!
//! ## Architecture
//!
//! Blockpad uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! Document edits are pure functions in [`document::transform`]; the
//! controller installs their results and persists the collection through a
//! [`store::ValueStore`].
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`block`]: Blocks and their variants
//! - [`document`]: Documents, transforms and typing shortcuts
//! - [`editor`]: Caret movement inside a text field
//! - [`gallery`]: The project collection and card summaries
//! - [`menu`]: Insertion, options and icon menus
//! - [`store`]: Named JSON value persistence
//! - [`ui`]: Terminal UI components
//! - [`watcher`]: Store file watching
//! - [`config`]: Saved command-line defaults

pub mod app;
pub mod block;
pub mod config;
pub mod document;
pub mod editor;
pub mod gallery;
pub mod menu;
pub mod store;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::block::{Block, BlockId, Variant};
    pub use crate::document::{Document, DocumentId};
    pub use crate::store::{JsonFileStore, MemoryStore, ValueStore};
    pub use crate::ui::viewport::Viewport;
}
