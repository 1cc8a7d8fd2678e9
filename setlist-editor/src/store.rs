//! Optimistic in-memory state for the setlist editor
//!
//! The store owns the authoritative local copy of the user's songs and the
//! selected song's sequence. Mutations apply synchronously so the UI can
//! render the result before any remote confirmation; persistence is the
//! synchronizer's job.

use setlist_common::model::{normalize_sequence, SequenceItem, Song, SongOrder};
use setlist_common::{Element, ElementKind};
use uuid::Uuid;

/// Two-state value tracking an optimistic local copy against the last
/// server-confirmed state. Mutations touch only the local copy; callers
/// reconcile explicitly on write success or failure.
#[derive(Debug, Clone)]
pub struct Reconciled<T: Clone> {
    local: T,
    confirmed: T,
}

impl<T: Clone> Reconciled<T> {
    pub fn new(value: T) -> Self {
        Self {
            local: value.clone(),
            confirmed: value,
        }
    }

    pub fn local(&self) -> &T {
        &self.local
    }

    pub fn local_mut(&mut self) -> &mut T {
        &mut self.local
    }

    pub fn confirmed(&self) -> &T {
        &self.confirmed
    }

    /// Mark the local state as durable (write succeeded)
    pub fn commit(&mut self) {
        self.confirmed = self.local.clone();
    }

    /// Discard the optimistic state (write failed, no newer server copy)
    pub fn revert(&mut self) {
        self.local = self.confirmed.clone();
    }

    /// Adopt an authoritative server copy into both states
    pub fn replace(&mut self, value: T) {
        self.local = value.clone();
        self.confirmed = value;
    }
}

/// Remove the element at `old` and reinsert it at `new`.
/// Returns false (leaving the list untouched) for out-of-range indices or
/// when the indices resolve to the same position.
fn move_item<T>(items: &mut Vec<T>, old: usize, new: usize) -> bool {
    if old == new || old >= items.len() || new >= items.len() {
        return false;
    }
    let item = items.remove(old);
    items.insert(new, item);
    true
}

/// In-memory list of songs plus the current selection
#[derive(Debug)]
pub struct EditorStore {
    songs: Reconciled<Vec<Song>>,
    selected: Option<Uuid>,
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorStore {
    pub fn new() -> Self {
        Self {
            songs: Reconciled::new(Vec::new()),
            selected: None,
        }
    }

    pub fn songs(&self) -> &[Song] {
        self.songs.local()
    }

    pub fn selected_song(&self) -> Option<&Song> {
        let id = self.selected?;
        self.songs.local().iter().find(|s| s.id == id)
    }

    fn selected_song_mut(&mut self) -> Option<&mut Song> {
        let id = self.selected?;
        self.songs.local_mut().iter_mut().find(|s| s.id == id)
    }

    /// Adopt an authoritative server copy; selection survives when the
    /// selected song is still present.
    pub fn set_songs(&mut self, songs: Vec<Song>) {
        if let Some(id) = self.selected {
            if !songs.iter().any(|s| s.id == id) {
                self.selected = None;
            }
        }
        self.songs.replace(songs);
    }

    pub fn select(&mut self, id: Option<Uuid>) {
        self.selected = match id {
            Some(id) if self.songs.local().iter().any(|s| s.id == id) => Some(id),
            _ => None,
        };
    }

    /// Append a server-created song and mark the state durable
    pub fn push_song(&mut self, song: Song) {
        self.songs.local_mut().push(song);
        self.songs.commit();
    }

    /// Replace a song with its server-updated copy
    pub fn apply_song(&mut self, song: Song) {
        if let Some(slot) = self.songs.local_mut().iter_mut().find(|s| s.id == song.id) {
            *slot = song;
        }
        self.songs.commit();
    }

    /// Remove a song after its remote delete succeeded. Clears the
    /// selection when the deleted song was selected.
    pub fn remove_song(&mut self, id: Uuid) {
        self.songs.local_mut().retain(|s| s.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.songs.commit();
    }

    /// Optimistically move a song within the collection. Returns the
    /// target order batch (array index becomes the new order) for the
    /// synchronizer, or None when the move is a no-op.
    ///
    /// Order fields are not recomputed here; [`commit_reorder`] assigns
    /// them once the remote write succeeds.
    ///
    /// [`commit_reorder`]: EditorStore::commit_reorder
    pub fn reorder_songs(&mut self, old: usize, new: usize) -> Option<Vec<SongOrder>> {
        if !move_item(self.songs.local_mut(), old, new) {
            return None;
        }
        Some(
            self.songs
                .local()
                .iter()
                .enumerate()
                .map(|(index, song)| SongOrder {
                    id: song.id,
                    order: index as i64,
                })
                .collect(),
        )
    }

    /// Confirm an optimistic collection reorder: assign each song its
    /// array index as order and mark the state durable.
    pub fn commit_reorder(&mut self) {
        for (index, song) in self.songs.local_mut().iter_mut().enumerate() {
            song.order = index as i64;
        }
        self.songs.commit();
    }

    /// Append a structural element to the selected song's sequence.
    ///
    /// Occurrence handling for base elements: an explicit occurrence wins;
    /// otherwise, when peers of the same element exist, the next number is
    /// max(existing, None counted as 1) + 1 and any unnumbered peer
    /// retroactively becomes occurrence 1. Flow elements never carry one.
    ///
    /// Returns a clone of the updated song for the synchronizer, or None
    /// when no song is selected.
    pub fn add_item(
        &mut self,
        element: Element,
        occurrence: Option<u32>,
    ) -> Option<Song> {
        let song = self.selected_song_mut()?;

        let occurrence = match element.kind() {
            ElementKind::Flow => None,
            ElementKind::Base => {
                let peers = song.sequence.iter().filter(|i| i.element == element);
                let max_existing = peers.map(|i| i.occurrence.unwrap_or(1)).max();
                match (occurrence, max_existing) {
                    (Some(explicit), _) => Some(explicit),
                    (None, Some(max)) => Some(max + 1),
                    (None, None) => None,
                }
            }
        };

        if occurrence.is_some() {
            // Unnumbered first occurrence becomes occurrence 1, matching
            // how display treats it
            for item in song
                .sequence
                .iter_mut()
                .filter(|i| i.element == element && i.occurrence.is_none())
            {
                item.occurrence = Some(1);
            }
        }

        let order = song.sequence.len() as i64;
        song.sequence.push(SequenceItem::new(element, order, occurrence));

        let updated = song.clone();
        self.songs.commit();
        Some(updated)
    }

    /// Remove one item from the selected song's sequence and renumber
    pub fn delete_item(&mut self, item_id: Uuid) -> Option<Song> {
        let song = self.selected_song_mut()?;
        song.sequence.retain(|i| i.id != item_id);
        normalize_sequence(&mut song.sequence);

        let updated = song.clone();
        self.songs.commit();
        Some(updated)
    }

    /// Replace the note field of one item, leaving everything else alone
    pub fn update_note(&mut self, item_id: Uuid, note: &str) -> Option<Song> {
        let song = self.selected_song_mut()?;
        if let Some(item) = song.sequence.iter_mut().find(|i| i.id == item_id) {
            item.note = Some(note.to_string());
        }

        let updated = song.clone();
        self.songs.commit();
        Some(updated)
    }

    /// Move an item within the selected song's sequence and renumber.
    /// Returns None (no write scheduled) for no-op moves.
    pub fn reorder_sequence(&mut self, old: usize, new: usize) -> Option<Song> {
        let song = self.selected_song_mut()?;
        if !move_item(&mut song.sequence, old, new) {
            return None;
        }
        normalize_sequence(&mut song.sequence);

        let updated = song.clone();
        self.songs.commit();
        Some(updated)
    }

    /// Discard optimistic state, restoring the last confirmed copy
    pub fn revert(&mut self) {
        self.songs.revert();
        if let Some(id) = self.selected {
            if !self.songs.local().iter().any(|s| s.id == id) {
                self.selected = None;
            }
        }
    }
}
