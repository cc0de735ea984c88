//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for UI
//! clients. It owns the [`NoteSyncViewModel`] for the lifetime of the client,
//! parses user-facing selectors, and dispatches to `commands/*.rs`.
//!
//! Like the commands, it never prints and never exits: everything comes back
//! as `Result<CmdResult>`.
//!
//! `NotezyApi<S, P>` is generic over both collaborators:
//! - Production: `NotezyApi<FileDocumentStore, FileSessionProvider>`
//! - Testing: `NotezyApi<InMemoryDocumentStore, InMemorySessionProvider>`

use crate::commands;
use crate::error::{NotezyError, Result};
use crate::index::NoteSelector;
use crate::session::SessionProvider;
use crate::store::DocumentStore;
use crate::viewmodel::NoteSyncViewModel;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

pub struct NotezyApi<S: DocumentStore, P: SessionProvider> {
    vm: NoteSyncViewModel<S, P>,
    home: PathBuf,
}

impl<S: DocumentStore, P: SessionProvider> NotezyApi<S, P> {
    pub fn new(store: S, session: P, home: impl Into<PathBuf>) -> Self {
        Self {
            vm: NoteSyncViewModel::new(Arc::new(store), Arc::new(session)),
            home: home.into(),
        }
    }

    pub fn register(
        &mut self,
        email: &str,
        password: &str,
        name: Option<String>,
    ) -> Result<CmdResult> {
        commands::auth::register(&mut self.vm, email, password, name)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<CmdResult> {
        commands::auth::login(&mut self.vm, email, password)
    }

    pub fn logout(&mut self) -> Result<CmdResult> {
        commands::auth::logout(&mut self.vm)
    }

    pub fn whoami(&self) -> Result<CmdResult> {
        commands::auth::whoami(&self.vm)
    }

    pub fn add_note(&mut self, text: &str) -> Result<CmdResult> {
        commands::add::run(&mut self.vm, text)
    }

    pub fn list_notes(&mut self, filter: &str) -> Result<CmdResult> {
        commands::list::run(&mut self.vm, filter)
    }

    pub fn view_note(&mut self, selector: &str) -> Result<CmdResult> {
        let selector = parse_selector(selector)?;
        commands::view::run(&mut self.vm, &selector)
    }

    pub fn edit_note(&mut self, selector: &str, text: &str) -> Result<CmdResult> {
        let selector = parse_selector(selector)?;
        commands::edit::run(&mut self.vm, &selector, text)
    }

    pub fn delete_note(&mut self, selector: &str, confirmed: bool) -> Result<CmdResult> {
        let selector = parse_selector(selector)?;
        commands::delete::run(&mut self.vm, &selector, confirmed)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.home, action)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn view_model(&self) -> &NoteSyncViewModel<S, P> {
        &self.vm
    }
}

fn parse_selector(input: &str) -> Result<NoteSelector> {
    NoteSelector::from_str(input).map_err(NotezyError::Api)
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Identity;
    use crate::session::memory::InMemorySessionProvider;
    use crate::store::memory::fixtures::note;
    use crate::store::memory::InMemoryDocumentStore;

    fn api() -> (
        tempfile::TempDir,
        NotezyApi<InMemoryDocumentStore, InMemorySessionProvider>,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryDocumentStore::new().with_notes([
            note("a", "u1", "Buy milk"),
            note("b", "u1", "Call mom"),
        ]);
        let api = NotezyApi::new(
            store,
            InMemorySessionProvider::signed_in(Identity::new("u1")),
            dir.path(),
        );
        (dir, api)
    }

    #[test]
    fn selectors_accept_indexes_and_ids() {
        let (_dir, mut api) = api();
        let by_index = api.view_note("2").unwrap();
        assert_eq!(by_index.listed_notes[0].note.text, "Call mom");
        let by_id = api.view_note("a").unwrap();
        assert_eq!(by_id.listed_notes[0].note.text, "Buy milk");
    }

    #[test]
    fn blank_selector_is_an_api_error() {
        let (_dir, mut api) = api();
        assert!(matches!(api.view_note("  "), Err(NotezyError::Api(_))));
    }

    #[test]
    fn list_dispatches_filter() {
        let (_dir, mut api) = api();
        let result = api.list_notes("MILK").unwrap();
        assert_eq!(result.listed_notes.len(), 1);
        assert_eq!(api.view_model().filter_text(), "MILK");
    }

    #[test]
    fn config_uses_home() {
        let (dir, api) = api();
        api.config(ConfigAction::Set("line-width".into(), "60".into()))
            .unwrap();
        assert!(dir.path().join("config.json").exists());
        assert_eq!(api.home(), dir.path());
    }
}
