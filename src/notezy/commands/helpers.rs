use crate::error::{AuthError, NotezyError, Result};
use crate::index::{resolve, DisplayIndex, NoteSelector};
use crate::model::{Identity, Note};
use crate::session::SessionProvider;
use crate::store::DocumentStore;
use crate::viewmodel::NoteSyncViewModel;

pub fn require_identity<P: SessionProvider>(session: &P) -> Result<Identity> {
    session
        .current_identity()
        .ok_or_else(|| AuthError::NotSignedIn.into())
}

/// Make sure the view-model is subscribed for the current session.
pub fn mount<S: DocumentStore, P: SessionProvider>(
    vm: &mut NoteSyncViewModel<S, P>,
) -> Result<Identity> {
    let identity = require_identity(vm.session().as_ref())?;
    if !vm.is_open() || vm.owner().as_ref() != Some(&identity) {
        vm.open(Some(&identity));
    }
    Ok(identity)
}

/// Resolve a selector against the current canonical list.
pub fn resolve_selector<S: DocumentStore, P: SessionProvider>(
    vm: &mut NoteSyncViewModel<S, P>,
    selector: &NoteSelector,
) -> Result<(DisplayIndex, Note)> {
    mount(vm)?;
    let canonical = vm.canonical_list();
    let note = resolve(&canonical, selector)
        .cloned()
        .ok_or_else(|| NotezyError::Api(format!("Note {} not found", selector)))?;
    let pos = canonical
        .iter()
        .position(|e| e.note().id == note.id)
        .unwrap_or_default();
    Ok((DisplayIndex(pos + 1), note))
}

/// First line of a note, shortened for messages.
pub fn preview(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let cut: String = line.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}
