use crate::model::Note;
use std::fmt;

/// Tag for a local, not yet confirmed text overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalEditId(pub(crate) u64);

impl fmt::Display for LocalEditId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edit-{}", self.0)
    }
}

/// One row of the canonical list.
///
/// Snapshots only ever produce `Confirmed` entries, so a `Pending` overlay
/// lives until the next snapshot replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry {
    Confirmed(Note),
    Pending { note: Note, edit: LocalEditId },
}

impl ListEntry {
    pub fn note(&self) -> &Note {
        match self {
            ListEntry::Confirmed(note) => note,
            ListEntry::Pending { note, .. } => note,
        }
    }

    pub fn into_note(self) -> Note {
        match self {
            ListEntry::Confirmed(note) => note,
            ListEntry::Pending { note, .. } => note,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ListEntry::Pending { .. })
    }
}

/// Case-insensitive substring filter over note text.
///
/// A blank query matches everything. A non-blank query is used as typed
/// (not trimmed) and note text is never trimmed.
pub fn matches_filter(note: &Note, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    note.text.to_lowercase().contains(&query.to_lowercase())
}
