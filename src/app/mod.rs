//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Persistence is a side effect: after each update the collection is
//! written through the [`ValueStore`] when it changed.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Field, Focus, Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::store::ValueStore;

/// Main application struct that owns the store and runs the event loop.
pub struct App {
    store: Box<dyn ValueStore>,
    watch_enabled: bool,
    seed_enabled: bool,
    /// Set while the stored collection is unreadable and could not be set
    /// aside; saving would overwrite it.
    writes_blocked: bool,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application over the given store.
    pub fn new(store: Box<dyn ValueStore>) -> Self {
        Self {
            store,
            watch_enabled: false,
            seed_enabled: true,
            writes_blocked: false,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Enable or disable watching the store for remote writes.
    pub fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Whether an empty store starts with the sample projects.
    pub fn with_seed(mut self, enabled: bool) -> Self {
        self.seed_enabled = enabled;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

#[cfg(test)]
mod tests;
