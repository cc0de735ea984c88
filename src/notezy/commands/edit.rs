use super::helpers::{preview, resolve_selector};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::NoteSelector;
use crate::session::SessionProvider;
use crate::store::DocumentStore;
use crate::viewmodel::NoteSyncViewModel;

pub fn run<S: DocumentStore, P: SessionProvider>(
    vm: &mut NoteSyncViewModel<S, P>,
    selector: &NoteSelector,
    text: &str,
) -> Result<CmdResult> {
    let (index, note) = resolve_selector(vm, selector)?;
    vm.edit_with_overlay(&note.id, text)?;

    let updated: Vec<_> = vm
        .canonical_list()
        .into_iter()
        .map(|e| e.into_note())
        .filter(|n| n.id == note.id)
        .collect();
    let message = CmdMessage::success(format!(
        "Note updated ({}): {}",
        index,
        preview(text, 40)
    ));
    Ok(CmdResult::default()
        .with_affected_notes(updated)
        .with_message(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NotezyError, ValidationError};
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
        let store = Arc::new(InMemoryDocumentStore::new().with_notes([note("a", "u1", "Old")]));
        let vm = NoteSyncViewModel::new(
            Arc::clone(&store),
            Arc::new(InMemorySessionProvider::signed_in(Identity::new("u1"))),
        );
        (store, vm)
    }

    #[test]
    fn updates_note_text_keeping_id() {
        let (store, mut vm) = setup();
        let result = run(&mut vm, &NoteSelector::Index(DisplayIndex(1)), "New").unwrap();
        assert_eq!(result.messages[0].content, "Note updated (1): New");
        assert_eq!(result.affected_notes[0].text, "New");
        assert_eq!(store.notes()[0].id.as_str(), "a");
        assert_eq!(store.notes()[0].text, "New");
    }

    #[test]
    fn blank_edit_is_rejected() {
        let (store, mut vm) = setup();
        assert!(matches!(
            run(&mut vm, &NoteSelector::Index(DisplayIndex(1)), "  "),
            Err(NotezyError::Validation(ValidationError::EmptyNote))
        ));
        assert_eq!(store.notes()[0].text, "Old");
    }
}
