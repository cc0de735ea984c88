use super::helpers::{mount, preview};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::session::SessionProvider;
use crate::store::DocumentStore;
use crate::viewmodel::NoteSyncViewModel;

pub fn run<S: DocumentStore, P: SessionProvider>(
    vm: &mut NoteSyncViewModel<S, P>,
    text: &str,
) -> Result<CmdResult> {
    mount(vm)?;
    let id = vm.add(text)?;

    let mut result = CmdResult::default();
    // present once the store has pushed the new snapshot
    let created: Vec<_> = vm
        .canonical_list()
        .into_iter()
        .map(|e| e.into_note())
        .filter(|n| n.id == id)
        .collect();
    match created.first() {
        Some(note) => result.add_message(CmdMessage::success(format!(
            "Note added: {}",
            preview(&note.text, 40)
        ))),
        None => result.add_message(CmdMessage::success("Note added")),
    }
    Ok(result.with_affected_notes(created))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NotezyError, ValidationError};
    use crate::model::Identity;
    use crate::session::memory::InMemorySessionProvider;
    use crate::store::memory::InMemoryDocumentStore;
    use std::sync::Arc;

    #[test]
    fn adds_trimmed_note_for_current_user() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let mut vm = NoteSyncViewModel::new(
            Arc::clone(&store),
            Arc::new(InMemorySessionProvider::signed_in(Identity::new("u1"))),
        );

        let result = run(&mut vm, "  Buy milk \n").unwrap();
        assert_eq!(result.messages[0].content, "Note added: Buy milk");
        assert_eq!(result.affected_notes.len(), 1);

        let stored = store.notes();
        assert_eq!(stored[0].text, "Buy milk");
        assert_eq!(stored[0].owner_id, Identity::new("u1"));
    }

    #[test]
    fn blank_note_is_rejected() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let mut vm = NoteSyncViewModel::new(
            Arc::clone(&store),
            Arc::new(InMemorySessionProvider::signed_in(Identity::new("u1"))),
        );
        assert!(matches!(
            run(&mut vm, " "),
            Err(NotezyError::Validation(ValidationError::EmptyNote))
        ));
        assert!(store.notes().is_empty());
    }
}
