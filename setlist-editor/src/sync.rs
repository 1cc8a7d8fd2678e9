//! Debounced persistence for sequence edits
//!
//! Sequence edits are frequent and rapid (typing, repeated element
//! clicks), so every edit resets a single pending timer and only the last
//! scheduled write within the window reaches the store, carrying the full
//! song state at that moment.

use std::sync::Arc;
use std::time::Duration;

use setlist_common::model::Song;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::SongStore;

/// Default quiet period before a debounced write fires
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(5000);

/// Owns the one live save timer. A new schedule aborts and replaces any
/// pending write, so a burst of edits yields exactly one network write
/// after the quiet period. An already in-flight write is not cancelled;
/// the client observes last-write-wins.
pub struct Synchronizer<S: SongStore + 'static> {
    remote: Arc<S>,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<S: SongStore + 'static> Synchronizer<S> {
    pub fn new(remote: Arc<S>, delay: Duration) -> Self {
        Self {
            remote,
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedule a whole-song write after the quiet period, superseding any
    /// pending one. Failures are logged and swallowed; the next edit
    /// schedules a fresh write anyway.
    pub async fn schedule_save(&self, song: Song) {
        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let remote = Arc::clone(&self.remote);
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("Flushing debounced save for song {}", song.id);
            // The write runs detached from the timer task: a later
            // schedule aborts this handle, which can only ever cancel
            // the sleep, never a request already in flight
            tokio::spawn(async move {
                if let Err(e) = remote.update(&song).await {
                    warn!("Failed to save song {}: {}", song.id, e);
                }
            });
        }));
    }

    /// Drop any pending save timer without executing the write. A write
    /// already in flight is unaffected.
    pub async fn cancel_pending(&self) {
        if let Some(handle) = self.pending.lock().await.take() {
            handle.abort();
        }
    }

    pub async fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .await
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}
