//! # Setlist Editor Core
//!
//! Client-side state and persistence for the setlist editor:
//! - [`EditorStore`] holds the optimistic in-memory song list and the
//!   selected song's sequence
//! - [`Synchronizer`] coalesces rapid sequence edits into one debounced
//!   whole-song write
//! - [`Editor`] ties the two together over a remote [`SongStore`]
//!
//! Control flow: UI event mutates the store synchronously, the UI renders
//! the result immediately, and the synchronizer makes it durable. The
//! remote store stays the source of truth and is reloaded when a
//! collection reorder fails.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

use setlist_common::model::Song;
use setlist_common::{Element, Result};

pub mod client;
pub mod store;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_store;

pub use client::{HttpSongStore, SongStore};
pub use store::{EditorStore, Reconciled};
pub use sync::{Synchronizer, DEFAULT_SAVE_DEBOUNCE};

/// Editor facade: optimistic local mutations plus remote reconciliation
pub struct Editor<S: SongStore + 'static> {
    store: EditorStore,
    remote: Arc<S>,
    sync: Synchronizer<S>,
}

impl<S: SongStore + 'static> Editor<S> {
    pub fn new(remote: Arc<S>, debounce: Duration) -> Self {
        Self {
            store: EditorStore::new(),
            remote: Arc::clone(&remote),
            sync: Synchronizer::new(remote, debounce),
        }
    }

    pub fn store(&self) -> &EditorStore {
        &self.store
    }

    pub fn select(&mut self, id: Option<Uuid>) {
        self.store.select(id);
    }

    /// Replace local state with the server's copy
    pub async fn load(&mut self) -> Result<()> {
        let songs = self.remote.list().await?;
        self.store.set_songs(songs);
        Ok(())
    }

    /// Create a song remotely, then append and select it locally
    pub async fn add_song(&mut self, title: &str, key: Option<&str>) -> Result<Uuid> {
        let song = self.remote.create(title, key).await?;
        let id = song.id;
        self.store.push_song(song);
        self.store.select(Some(id));
        Ok(id)
    }

    /// Update title and key, keeping the current sequence
    pub async fn update_song(&mut self, id: Uuid, title: &str, key: Option<&str>) -> Result<()> {
        let Some(mut song) = self.store.songs().iter().find(|s| s.id == id).cloned() else {
            return Ok(());
        };
        song.title = title.to_string();
        song.key = key.map(str::to_string);
        let saved = self.remote.update(&song).await?;
        self.store.apply_song(saved);
        Ok(())
    }

    pub async fn delete_song(&mut self, id: Uuid) -> Result<()> {
        self.remote.delete(id).await?;
        self.store.remove_song(id);
        Ok(())
    }

    /// Append a structural element to the selected song and schedule a
    /// debounced save. No-op without a selection.
    pub async fn add_item(&mut self, element: Element, occurrence: Option<u32>) {
        if let Some(song) = self.store.add_item(element, occurrence) {
            self.sync.schedule_save(song).await;
        }
    }

    pub async fn delete_item(&mut self, item_id: Uuid) {
        if let Some(song) = self.store.delete_item(item_id) {
            self.sync.schedule_save(song).await;
        }
    }

    pub async fn update_note(&mut self, item_id: Uuid, note: &str) {
        if let Some(song) = self.store.update_note(item_id, note) {
            self.sync.schedule_save(song).await;
        }
    }

    pub async fn reorder_sequence(&mut self, old: usize, new: usize) {
        if let Some(song) = self.store.reorder_sequence(old, new) {
            self.sync.schedule_save(song).await;
        }
    }

    /// Move a song within the collection: optimistic local move, then an
    /// immediate transactional batch write. On failure the whole
    /// collection is reloaded from the server (server state wins).
    pub async fn reorder_songs(&mut self, old: usize, new: usize) -> Result<()> {
        let Some(orders) = self.store.reorder_songs(old, new) else {
            return Ok(());
        };

        match self.remote.reorder_batch(&orders).await {
            Ok(()) => {
                self.store.commit_reorder();
                Ok(())
            }
            Err(e) => {
                warn!("Collection reorder failed, reloading from server: {}", e);
                let songs = self.remote.list().await?;
                self.store.set_songs(songs);
                Ok(())
            }
        }
    }
}
