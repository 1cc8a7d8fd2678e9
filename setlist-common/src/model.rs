//! Core data model: songs and their arrangement sequences

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::elements::{Element, ElementKind};

/// One structural element occurrence within a song's arrangement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub element: Element,
    /// Position within the song, dense 0-based after normalization
    pub order: i64,
    /// Disambiguates repeated base elements ("Verse 2"); None displays as 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SequenceItem {
    /// Create a new item. Occurrence is only meaningful for base elements
    /// and is dropped for flow elements.
    pub fn new(element: Element, order: i64, occurrence: Option<u32>) -> Self {
        let occurrence = match element.kind() {
            ElementKind::Base => occurrence,
            ElementKind::Flow => None,
        };
        Self {
            id: Uuid::new_v4(),
            kind: element.kind(),
            element,
            order,
            occurrence,
            note: None,
        }
    }

    /// Display label, e.g. "Verse 2". Unnumbered base items display as 1.
    pub fn label(&self) -> String {
        match self.kind {
            ElementKind::Base => format!("{} {}", self.element, self.occurrence.unwrap_or(1)),
            ElementKind::Flow => self.element.to_string(),
        }
    }
}

/// A user-owned setlist entity: title, musical key, ordered sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Collection position, unique per owner
    pub order: i64,
    #[serde(default)]
    pub sequence: Vec<SequenceItem>,
}

/// One entry of a collection reorder batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongOrder {
    pub id: Uuid,
    pub order: i64,
}

/// Renumber a sequence so every item's `order` equals its array index,
/// and repair client-supplied items: `kind` is re-derived from the
/// element and flow items never carry an occurrence. Runs before every
/// persisted write; array position wins over any incoming `order`.
pub fn normalize_sequence(sequence: &mut [SequenceItem]) {
    for (index, item) in sequence.iter_mut().enumerate() {
        item.order = index as i64;
        item.kind = item.element.kind();
        if item.kind == ElementKind::Flow {
            item.occurrence = None;
        }
    }
}
