//! Structural element vocabulary for song arrangements
//!
//! Elements come in two kinds: base elements are the named sections of a
//! song (Verse, Chorus, ...) which may repeat and carry an occurrence
//! number, flow elements are dynamics markers (Build, Pause, ...) which
//! never repeat-number.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Element kind, serialized as the wire-level `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Base,
    Flow,
}

/// Fixed vocabulary of structural elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    Verse,
    #[serde(rename = "Pre-Chorus")]
    PreChorus,
    Chorus,
    Bridge,
    Instrumental,
    Intro,
    Interlude,
    Outro,
    Ending,
    Tag,
    Drums,
    Breakdown,
    Build,
    Pause,
}

/// Base elements in selector order
pub const BASE_ELEMENTS: [Element; 10] = [
    Element::Verse,
    Element::PreChorus,
    Element::Chorus,
    Element::Bridge,
    Element::Instrumental,
    Element::Intro,
    Element::Interlude,
    Element::Outro,
    Element::Ending,
    Element::Tag,
];

/// Flow elements in selector order
pub const FLOW_ELEMENTS: [Element; 4] = [
    Element::Drums,
    Element::Breakdown,
    Element::Build,
    Element::Pause,
];

impl Element {
    /// Which kind this element belongs to
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Drums | Element::Breakdown | Element::Build | Element::Pause => {
                ElementKind::Flow
            }
            _ => ElementKind::Base,
        }
    }

    /// Display name, matching the wire form
    pub fn name(&self) -> &'static str {
        match self {
            Element::Verse => "Verse",
            Element::PreChorus => "Pre-Chorus",
            Element::Chorus => "Chorus",
            Element::Bridge => "Bridge",
            Element::Instrumental => "Instrumental",
            Element::Intro => "Intro",
            Element::Interlude => "Interlude",
            Element::Outro => "Outro",
            Element::Ending => "Ending",
            Element::Tag => "Tag",
            Element::Drums => "Drums",
            Element::Breakdown => "Breakdown",
            Element::Build => "Build",
            Element::Pause => "Pause",
        }
    }

    /// Compact label used in sequence overviews
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Element::Verse => "V",
            Element::PreChorus => "PC",
            Element::Chorus => "C",
            Element::Bridge => "B",
            Element::Instrumental => "Inst",
            Element::Interlude => "It",
            Element::Ending => "E",
            Element::Breakdown => "Bd",
            other => other.name(),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
