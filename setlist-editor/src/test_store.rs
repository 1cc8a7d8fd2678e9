//! In-memory [`SongStore`] double used by the editor tests
//!
//! [`SongStore`]: crate::client::SongStore

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use setlist_common::model::{Song, SongOrder};
use setlist_common::{Error, Result};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::client::SongStore;

/// Records every write and can be told to fail specific operations
pub struct MockStore {
    pub songs: Mutex<Vec<Song>>,
    pub updates: Mutex<Vec<Song>>,
    pub reorders: Mutex<Vec<Vec<SongOrder>>>,
    fail_updates: AtomicBool,
    fail_reorders: AtomicBool,
    update_delay_ms: AtomicU64,
}

impl MockStore {
    pub fn new(songs: Vec<Song>) -> Self {
        Self {
            songs: Mutex::new(songs),
            updates: Mutex::new(Vec::new()),
            reorders: Mutex::new(Vec::new()),
            fail_updates: AtomicBool::new(false),
            fail_reorders: AtomicBool::new(false),
            update_delay_ms: AtomicU64::new(0),
        }
    }

    pub fn with_titles(titles: &[&str]) -> Arc<Self> {
        let songs = titles
            .iter()
            .enumerate()
            .map(|(i, t)| Song {
                id: Uuid::new_v4(),
                title: t.to_string(),
                key: None,
                order: i as i64,
                sequence: Vec::new(),
            })
            .collect();
        Arc::new(Self::new(songs))
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    pub fn fail_reorders(&self) {
        self.fail_reorders.store(true, Ordering::SeqCst);
    }

    /// Make every update take this long, simulating a slow network write
    pub fn set_update_delay(&self, delay: Duration) {
        self.update_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

#[async_trait]
impl SongStore for MockStore {
    async fn list(&self) -> Result<Vec<Song>> {
        let mut songs = self.songs.lock().await.clone();
        songs.sort_by_key(|s| s.order);
        Ok(songs)
    }

    async fn create(&self, title: &str, key: Option<&str>) -> Result<Song> {
        let mut songs = self.songs.lock().await;
        let order = songs.iter().map(|s| s.order).max().map_or(0, |m| m + 1);
        let song = Song {
            id: Uuid::new_v4(),
            title: title.to_string(),
            key: key.map(str::to_string),
            order,
            sequence: Vec::new(),
        };
        songs.push(song.clone());
        Ok(song)
    }

    async fn update(&self, song: &Song) -> Result<Song> {
        let delay = self.update_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(Error::Remote("update failed".to_string()));
        }
        self.updates.lock().await.push(song.clone());
        let mut songs = self.songs.lock().await;
        if let Some(slot) = songs.iter_mut().find(|s| s.id == song.id) {
            *slot = song.clone();
        }
        Ok(song.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.songs.lock().await.retain(|s| s.id != id);
        Ok(())
    }

    async fn reorder_batch(&self, orders: &[SongOrder]) -> Result<()> {
        if self.fail_reorders.load(Ordering::SeqCst) {
            return Err(Error::Remote("reorder failed".to_string()));
        }
        self.reorders.lock().await.push(orders.to_vec());
        let mut songs = self.songs.lock().await;
        for entry in orders {
            if let Some(song) = songs.iter_mut().find(|s| s.id == entry.id) {
                song.order = entry.order;
            }
        }
        songs.sort_by_key(|s| s.order);
        Ok(())
    }
}
