use super::helpers::resolve_selector;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::index::{DisplayNote, NoteSelector};
use crate::session::SessionProvider;
use crate::store::DocumentStore;
use crate::viewmodel::NoteSyncViewModel;

/// Show one note, fetched fresh from the store.
pub fn run<S: DocumentStore, P: SessionProvider>(
    vm: &mut NoteSyncViewModel<S, P>,
    selector: &NoteSelector,
) -> Result<CmdResult> {
    let (index, listed) = resolve_selector(vm, selector)?;
    let note = vm.detail(&listed.id)?;
    Ok(CmdResult::default().with_listed_notes(vec![DisplayNote {
        index,
        note,
        pending: false,
    }]))
}
