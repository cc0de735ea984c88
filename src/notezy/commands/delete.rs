use super::helpers::{preview, resolve_selector};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::NoteSelector;
use crate::session::SessionProvider;
use crate::store::DocumentStore;
use crate::viewmodel::NoteSyncViewModel;

/// Permanently delete a note. Without `confirmed` nothing is removed and a
/// warning asks the caller to confirm.
pub fn run<S: DocumentStore, P: SessionProvider>(
    vm: &mut NoteSyncViewModel<S, P>,
    selector: &NoteSelector,
    confirmed: bool,
) -> Result<CmdResult> {
    let (index, note) = resolve_selector(vm, selector)?;
    let summary = preview(&note.text, 40);

    if !confirmed {
        return Ok(CmdResult::default().with_message(CmdMessage::warning(format!(
            "Are you sure you want to delete note {} ({})? Re-run with --yes to confirm.",
            index, summary
        ))));
    }

    vm.delete(&note.id)?;
    let message = CmdMessage::success(format!("Note deleted ({}): {}", index, summary));
    Ok(CmdResult::default()
        .with_affected_notes(vec![note])
        .with_message(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::index::DisplayIndex;
    use crate::model::Identity;
    use crate::session::memory::InMemorySessionProvider;
    use crate::store::memory::fixtures::note;
    use crate::store::memory::InMemoryDocumentStore;
    use std::sync::Arc;

    fn setup() -> (
        Arc<InMemoryDocumentStore>,
        NoteSyncViewModel<InMemoryDocumentStore, InMemorySessionProvider>,
    ) {
        let store = Arc::new(
            InMemoryDocumentStore::new()
                .with_notes([note("a", "u1", "keep"), note("b", "u1", "drop me")]),
        );
        let vm = NoteSyncViewModel::new(
            Arc::clone(&store),
            Arc::new(InMemorySessionProvider::signed_in(Identity::new("u1"))),
        );
        (store, vm)
    }

    #[test]
    fn unconfirmed_delete_only_warns() {
        let (store, mut vm) = setup();
        let result = run(&mut vm, &NoteSelector::Index(DisplayIndex(2)), false).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert_eq!(store.notes().len(), 2);
    }

    #[test]
    fn confirmed_delete_removes_permanently() {
        let (store, mut vm) = setup();
        let result = run(&mut vm, &NoteSelector::Index(DisplayIndex(2)), true).unwrap();
        assert_eq!(result.messages[0].content, "Note deleted (2): drop me");
        assert_eq!(store.notes().len(), 1);
        assert_eq!(vm.canonical_list().len(), 1);
    }
}
