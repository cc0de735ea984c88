//! # Display Indexes
//!
//! Note ids are opaque and long, so the presentation layer numbers notes
//! `1..n` by their position in the canonical (unfiltered) list. Filtering
//! does not renumber: `notezy list milk` may show `2` and `5`, and `notezy
//! view 5` refers to the same note either way.
//!
//! Indexes are only as stable as the store's ordering. The bundled stores
//! keep insertion order, so adding notes never shifts existing indexes;
//! deleting one shifts everything after it.

use crate::model::{Note, NoteId};
use crate::viewmodel::ListEntry;
use std::fmt;
use std::str::FromStr;

/// A user-facing, 1-based position in the canonical list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayIndex(pub usize);

impl fmt::Display for DisplayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DisplayIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(DisplayIndex(n)),
            _ => Err(format!("Invalid index format: {}", s)),
        }
    }
}

/// A user input to select a note, either by its index or by its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteSelector {
    Index(DisplayIndex),
    Id(NoteId),
}

impl fmt::Display for NoteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteSelector::Index(idx) => write!(f, "{}", idx),
            NoteSelector::Id(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for NoteSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty note selector".to_string());
        }
        if let Ok(index) = DisplayIndex::from_str(s) {
            return Ok(NoteSelector::Index(index));
        }
        Ok(NoteSelector::Id(NoteId::new(s)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNote {
    pub index: DisplayIndex,
    pub note: Note,
    pub pending: bool,
}

/// Number the displayed entries by their canonical position.
pub fn index_notes(canonical: &[ListEntry], displayed: &[ListEntry]) -> Vec<DisplayNote> {
    displayed
        .iter()
        .filter_map(|entry| {
            let pos = canonical
                .iter()
                .position(|c| c.note().id == entry.note().id)?;
            Some(DisplayNote {
                index: DisplayIndex(pos + 1),
                note: entry.note().clone(),
                pending: entry.is_pending(),
            })
        })
        .collect()
}

/// Find the canonical entry a selector points at.
pub fn resolve<'a>(canonical: &'a [ListEntry], selector: &NoteSelector) -> Option<&'a Note> {
    match selector {
        NoteSelector::Index(DisplayIndex(n)) => canonical.get(n.checked_sub(1)?).map(ListEntry::note),
        NoteSelector::Id(id) => canonical.iter().map(ListEntry::note).find(|n| &n.id == id),
    }
}
