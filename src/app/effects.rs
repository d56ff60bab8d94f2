use std::time::Duration;

use chrono::Utc;

use crate::app::{App, Message, Model, ToastLevel};
use crate::document::Document;
use crate::gallery::sample_documents;
use crate::store::{self, PROJECTS_KEY};
use crate::watcher::StoreWatcher;

impl App {
    /// Load the collection, seeding the sample projects into an empty store.
    ///
    /// Unreadable projects are skipped and the stored value is set aside
    /// before anything can overwrite it. The second element describes the
    /// problem, if there was one.
    fn load_documents(&mut self) -> (Vec<Document>, Option<String>) {
        match store::load_each::<Document>(&*self.store, PROJECTS_KEY) {
            Ok(None) if self.seed_enabled => {
                let documents = sample_documents(Utc::now());
                tracing::info!(count = documents.len(), "seeding sample projects");
                if let Err(err) = store::write(&mut *self.store, PROJECTS_KEY, &documents) {
                    tracing::warn!(%err, "failed to persist sample projects");
                }
                (documents, None)
            }
            Ok(None) => (Vec::new(), None),
            Ok(Some(decoded)) if decoded.rejected == 0 => (decoded.items, None),
            Ok(Some(decoded)) => {
                self.set_aside_unreadable();
                let problem = format!(
                    "Skipped {} unreadable project(s); original kept as {}",
                    decoded.rejected,
                    store::unreadable_key(PROJECTS_KEY)
                );
                (decoded.items, Some(problem))
            }
            Err(err) => {
                tracing::warn!(%err, "failed to load projects");
                self.set_aside_unreadable();
                (Vec::new(), Some(format!("Load failed: {err}")))
            }
        }
    }

    /// Copy the stored collection aside. Saving stays paused when that fails.
    fn set_aside_unreadable(&mut self) {
        match store::set_aside(&mut *self.store, PROJECTS_KEY) {
            Ok(()) => {
                tracing::warn!(
                    backup = %store::unreadable_key(PROJECTS_KEY),
                    "kept a copy of unreadable projects"
                );
                self.writes_blocked = false;
            }
            Err(err) => {
                tracing::warn!(%err, "cannot set unreadable projects aside, saving paused");
                self.writes_blocked = true;
            }
        }
    }

    /// Build the initial model for a terminal of the given size.
    pub fn initial_model(&mut self, terminal_size: (u16, u16)) -> Model {
        let (documents, problem) = self.load_documents();
        let mut model = Model::new(documents, terminal_size);
        model.watch_enabled = self.watch_enabled;
        model.store_path = self.store.location().map(std::path::Path::to_path_buf);
        model.config_global_path.clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        if let Some(problem) = problem {
            model.show_toast(ToastLevel::Error, problem);
        }
        model
    }

    pub(super) fn make_store_watcher(&self) -> Option<notify::Result<StoreWatcher>> {
        self.store
            .location()
            .map(|path| StoreWatcher::new(path, Duration::from_millis(200)))
    }

    pub(super) fn handle_message_side_effects(
        &mut self,
        model: &mut Model,
        store_watcher: &mut Option<StoreWatcher>,
        msg: &Message,
    ) {
        match msg {
            Message::ToggleWatch => {
                if model.watch_enabled {
                    match self.make_store_watcher() {
                        Some(Ok(watcher)) => {
                            *store_watcher = Some(watcher);
                            model.show_toast(ToastLevel::Info, "Watching store changes");
                        }
                        Some(Err(err)) => {
                            model.watch_enabled = false;
                            *store_watcher = None;
                            model.show_toast(
                                ToastLevel::Warning,
                                format!("Watch unavailable: {err}"),
                            );
                            tracing::warn!(%err, "failed to start store watcher");
                        }
                        None => {
                            model.watch_enabled = false;
                            model.show_toast(ToastLevel::Warning, "This store cannot be watched");
                        }
                    }
                } else {
                    *store_watcher = None;
                    model.show_toast(ToastLevel::Info, "Watch disabled");
                }
            }
            Message::StoreChanged => self.reload_from_store(model),
            _ => {}
        }

        if model.take_dirty() {
            self.persist(model);
        }
    }

    /// Write the whole collection. The model already holds the new state, so
    /// a failure only surfaces as a toast.
    fn persist(&mut self, model: &mut Model) {
        if self.writes_blocked {
            tracing::warn!("not saving over unreadable projects");
            model.show_toast(
                ToastLevel::Error,
                "Saving paused: stored projects could not be read",
            );
            return;
        }
        let documents = model.gallery.documents();
        match store::write(&mut *self.store, PROJECTS_KEY, documents) {
            Ok(()) => {
                tracing::debug!(count = documents.len(), revision = model.revision(), "saved");
            }
            Err(err) => {
                tracing::warn!(%err, "failed to save projects");
                model.show_toast(ToastLevel::Error, format!("Save failed: {err}"));
            }
        }
    }

    /// Replace the collection with what another writer left in the store.
    ///
    /// A collection that does not fully decode leaves the local one in place.
    fn reload_from_store(&mut self, model: &mut Model) {
        match self.store.refresh() {
            Ok(true) => {}
            Ok(false) => {
                tracing::trace!("store event matched our last write");
                return;
            }
            Err(err) => {
                tracing::warn!(%err, "failed to reload store");
                model.show_toast(ToastLevel::Error, format!("Reload failed: {err}"));
                return;
            }
        }

        let documents = match store::load_each::<Document>(&*self.store, PROJECTS_KEY) {
            Ok(None) => Vec::new(),
            Ok(Some(decoded)) if decoded.rejected == 0 => decoded.items,
            Ok(Some(decoded)) => {
                self.set_aside_unreadable();
                model.show_toast(
                    ToastLevel::Error,
                    format!(
                        "Reload skipped: {} unreadable project(s) in store",
                        decoded.rejected
                    ),
                );
                return;
            }
            Err(err) => {
                tracing::warn!(%err, "remote projects are unreadable");
                self.set_aside_unreadable();
                model.show_toast(ToastLevel::Error, format!("Reload failed: {err}"));
                return;
            }
        };

        tracing::info!(count = documents.len(), "store changed remotely");
        self.writes_blocked = false;
        model.gallery.replace_documents(documents);
        model.sanitize_focus();
        model.note_remote_change();
        model.show_toast(ToastLevel::Info, "Projects updated");
    }
}
