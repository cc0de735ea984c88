use super::helpers::mount;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::index_notes;
use crate::session::SessionProvider;
use crate::store::DocumentStore;
use crate::viewmodel::NoteSyncViewModel;

/// List the current user's notes, narrowed by `filter`.
pub fn run<S: DocumentStore, P: SessionProvider>(
    vm: &mut NoteSyncViewModel<S, P>,
    filter: &str,
) -> Result<CmdResult> {
    mount(vm)?;
    vm.set_filter(filter);

    let listed = index_notes(&vm.canonical_list(), &vm.display_list());
    let mut result = CmdResult::default();
    if vm.is_loading() {
        result.add_message(CmdMessage::info("Loading notes..."));
    } else if listed.is_empty() {
        result.add_message(CmdMessage::info("No notes found."));
    }
    Ok(result.with_listed_notes(listed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add;
    use crate::index::DisplayIndex;
    use crate::model::Identity;
    use crate::session::memory::InMemorySessionProvider;
    use crate::store::memory::InMemoryDocumentStore;
    use std::sync::Arc;

    fn signed_in() -> NoteSyncViewModel<InMemoryDocumentStore, InMemorySessionProvider> {
        NoteSyncViewModel::new(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(InMemorySessionProvider::signed_in(Identity::new("u1"))),
        )
    }

    #[test]
    fn empty_list_says_so() {
        let mut vm = signed_in();
        let result = run(&mut vm, "").unwrap();
        assert!(result.listed_notes.is_empty());
        assert_eq!(result.messages[0].content, "No notes found.");
    }

    #[test]
    fn search_keeps_canonical_indexes() {
        let mut vm = signed_in();
        add::run(&mut vm, "Buy milk").unwrap();
        add::run(&mut vm, "Walk dog").unwrap();
        add::run(&mut vm, "Milk the cow").unwrap();

        let result = run(&mut vm, "MILK").unwrap();
        let indexes: Vec<_> = result.listed_notes.iter().map(|n| n.index).collect();
        assert_eq!(indexes, vec![DisplayIndex(1), DisplayIndex(3)]);

        let all = run(&mut vm, "").unwrap();
        assert_eq!(all.listed_notes.len(), 3);
    }
}
