//! # Note Sync View-Model
//!
//! Keeps the list a presentation layer shows in step with the backend's live
//! state for the current session, and with the current filter text.
//!
//! ## State
//!
//! - **canonical list**: mirror of the latest snapshot, in delivery order
//! - **display list**: the canonical entries matching the filter text
//! - **filter text**: whatever the presentation layer last set
//! - **loading**: true between [`NoteSyncViewModel::open`] and the first
//!   snapshot (or subscription error)
//!
//! Every snapshot replaces the canonical list wholesale. Snapshots carry no
//! version, so the last one received wins even if the store delivered it
//! out of order.
//!
//! ## Subscription Lifecycle
//!
//! A view-model owns at most one [`Subscription`]. `open` closes the previous
//! one first; `close` (also run on drop) silences the listener *before*
//! cancelling the handle. Listeners are tagged with a generation number and
//! check it under the state lock, so once `close` returns nothing is applied
//! or emitted, even for a push that was already in flight.
//!
//! ## Mutations
//!
//! `add`, `edit` and `delete` go straight to the store and rely on the next
//! snapshot to show their effect. `edit` and `delete` first fetch the note
//! and refuse it unless the current session owns it. `edit_with_overlay`
//! additionally marks the entry [`ListEntry::Pending`] until that snapshot
//! arrives.

use crate::error::{AuthError, Result, StoreError, ValidationError};
use crate::model::{Identity, NewNote, Note, NoteId, NotePatch, NoteQuery};
use crate::session::SessionProvider;
use crate::store::{lock, DocumentStore, SnapshotListener, Subscription};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, Weak};

mod entry;

pub use entry::{matches_filter, ListEntry, LocalEditId};

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Loading,
    Changed { canonical: usize, displayed: usize },
    Failed(StoreError),
}

#[derive(Default)]
struct State {
    owner: Option<Identity>,
    generation: u64,
    active: Option<u64>,
    canonical: Vec<ListEntry>,
    display: Vec<ListEntry>,
    filter: String,
    loading: bool,
    next_edit: u64,
    events: Option<Sender<ViewEvent>>,
}

impl State {
    fn refilter(&mut self) {
        let display = self
            .canonical
            .iter()
            .filter(|e| matches_filter(e.note(), &self.filter))
            .cloned()
            .collect();
        self.display = display;
    }

    fn emit(&mut self, event: ViewEvent) {
        if let Some(tx) = &self.events {
            if tx.send(event).is_err() {
                self.events = None;
            }
        }
    }

    fn changed(&mut self) {
        let event = ViewEvent::Changed {
            canonical: self.canonical.len(),
            displayed: self.display.len(),
        };
        self.emit(event);
    }

    fn apply_snapshot(&mut self, notes: Vec<Note>) {
        self.canonical = notes.into_iter().map(ListEntry::Confirmed).collect();
        self.refilter();
        self.loading = false;
        self.changed();
    }
}

/// Listener bound to one subscription generation.
struct Binding {
    state: Weak<Mutex<State>>,
    generation: u64,
}

impl Binding {
    fn with_live_state(&self, f: impl FnOnce(&mut State)) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let mut state = lock(&state);
        if state.active != Some(self.generation) {
            tracing::trace!(generation = self.generation, "dropping push for closed subscription");
            return;
        }
        f(&mut state);
    }
}

impl SnapshotListener for Binding {
    fn on_snapshot(&self, notes: Vec<Note>) {
        self.with_live_state(|state| {
            tracing::debug!(notes = notes.len(), "snapshot received");
            state.apply_snapshot(notes);
        });
    }

    fn on_error(&self, error: StoreError) {
        self.with_live_state(|state| {
            tracing::warn!(error = %error, "live query failed");
            state.loading = false;
            state.emit(ViewEvent::Failed(error));
        });
    }
}

/// Trimmed note text, or `EmptyNote` when nothing is left.
pub fn validate_text(text: &str) -> std::result::Result<&str, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyNote);
    }
    Ok(trimmed)
}

pub struct NoteSyncViewModel<S: DocumentStore, P: SessionProvider> {
    store: Arc<S>,
    session: Arc<P>,
    state: Arc<Mutex<State>>,
    subscription: Option<Subscription>,
}

impl<S: DocumentStore, P: SessionProvider> NoteSyncViewModel<S, P> {
    pub fn new(store: Arc<S>, session: Arc<P>) -> Self {
        Self {
            store,
            session,
            state: Arc::default(),
            subscription: None,
        }
    }

    /// Subscribe to every note owned by `session`.
    ///
    /// Without a session this does nothing; callers check session validity
    /// first. An already open subscription is closed before the new one is
    /// created.
    pub fn open(&mut self, session: Option<&Identity>) {
        let Some(owner) = session else {
            tracing::debug!("open without a session; nothing to subscribe to");
            return;
        };
        self.close();

        let generation = {
            let mut state = lock(&self.state);
            if state.owner.as_ref() != Some(owner) {
                state.canonical.clear();
                state.display.clear();
                state.owner = Some(owner.clone());
            }
            state.generation += 1;
            state.active = Some(state.generation);
            state.loading = true;
            state.emit(ViewEvent::Loading);
            state.generation
        };

        let listener = Arc::new(Binding {
            state: Arc::downgrade(&self.state),
            generation,
        });
        tracing::debug!(owner = %owner, generation, "opening live query");
        let subscription = self
            .store
            .subscribe(NoteQuery::owned_by(owner.clone()), listener);
        self.subscription = Some(subscription);
    }

    /// Stop listening. Safe to call at any time, any number of times.
    pub fn close(&mut self) {
        {
            let mut state = lock(&self.state);
            state.active = None;
            state.loading = false;
        }
        if let Some(subscription) = self.subscription.take() {
            tracing::debug!(subscription = subscription.id(), "closing live query");
            subscription.cancel();
        }
    }

    pub fn set_filter(&self, text: impl Into<String>) {
        let mut state = lock(&self.state);
        state.filter = text.into();
        state.refilter();
        state.changed();
    }

    /// Create a note owned by the current session. The new note shows up
    /// with the next snapshot.
    pub fn add(&self, text: &str) -> Result<NoteId> {
        let text = validate_text(text)?;
        let owner = self
            .session
            .current_identity()
            .ok_or(AuthError::NotSignedIn)?;
        let id = self.store.create(NewNote {
            text: text.to_string(),
            owner_id: owner,
        })?;
        tracing::info!(note = %id, "note added");
        Ok(id)
    }

    /// Rewrite a note's text. The text is stored as entered once it passes
    /// the blank check.
    pub fn edit(&self, id: &NoteId, text: &str) -> Result<()> {
        validate_text(text)?;
        self.owned(id)?;
        self.write_text(id, text)
    }

    /// Like [`edit`](Self::edit), but shows the new text right away as a
    /// [`ListEntry::Pending`] entry. The overlay is reverted if the store
    /// rejects the update. Without an open subscription no overlay is made,
    /// since no snapshot would ever replace it.
    pub fn edit_with_overlay(&self, id: &NoteId, text: &str) -> Result<LocalEditId> {
        validate_text(text)?;
        self.owned(id)?;

        let (edit, previous) = {
            let mut state = lock(&self.state);
            state.next_edit += 1;
            let edit = LocalEditId(state.next_edit);
            let previous = if state.active.is_some() {
                state
                    .canonical
                    .iter_mut()
                    .find(|e| &e.note().id == id)
                    .map(|entry| {
                        let previous = entry.clone();
                        let mut note = entry.note().clone();
                        note.text = text.to_string();
                        *entry = ListEntry::Pending { note, edit };
                        previous
                    })
            } else {
                None
            };
            if previous.is_some() {
                state.refilter();
                state.changed();
            }
            (edit, previous)
        };

        if let Err(error) = self.write_text(id, text) {
            if let Some(previous) = previous {
                let mut state = lock(&self.state);
                let overlay = state.canonical.iter_mut().find(
                    |e| matches!(e, ListEntry::Pending { edit: tag, .. } if *tag == edit),
                );
                if let Some(entry) = overlay {
                    *entry = previous;
                    state.refilter();
                    state.changed();
                }
            }
            return Err(error);
        }
        Ok(edit)
    }

    fn write_text(&self, id: &NoteId, text: &str) -> Result<()> {
        self.store.update(
            id,
            NotePatch {
                text: text.to_string(),
            },
        )?;
        tracing::info!(note = %id, "note edited");
        Ok(())
    }

    /// Permanently remove a note.
    pub fn delete(&self, id: &NoteId) -> Result<()> {
        self.owned(id)?;
        self.store.remove(id)?;
        tracing::info!(note = %id, "note deleted");
        Ok(())
    }

    /// Fetch a single note straight from the store. Notes owned by anyone
    /// but the current session are refused.
    pub fn detail(&self, id: &NoteId) -> Result<Note> {
        self.owned(id)
    }

    /// The stored note, if it belongs to the current session.
    fn owned(&self, id: &NoteId) -> Result<Note> {
        let note = self
            .store
            .get_one(id)?
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if self.session.current_identity().as_ref() != Some(&note.owner_id) {
            tracing::warn!(note = %id, "refusing access to a note owned by another identity");
            return Err(StoreError::PermissionDenied(format!("note {} is not yours", id)).into());
        }
        Ok(note)
    }

    /// Receive [`ViewEvent`]s from now on. Replaces any earlier receiver.
    pub fn events(&self) -> Receiver<ViewEvent> {
        let (tx, rx) = mpsc::channel();
        lock(&self.state).events = Some(tx);
        rx
    }

    pub fn canonical_list(&self) -> Vec<ListEntry> {
        lock(&self.state).canonical.clone()
    }

    pub fn display_list(&self) -> Vec<ListEntry> {
        lock(&self.state).display.clone()
    }

    pub fn display_notes(&self) -> Vec<Note> {
        self.display_list()
            .into_iter()
            .map(ListEntry::into_note)
            .collect()
    }

    pub fn filter_text(&self) -> String {
        lock(&self.state).filter.clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    pub fn is_open(&self) -> bool {
        self.subscription.is_some()
    }

    /// Identity of the most recent `open`.
    pub fn owner(&self) -> Option<Identity> {
        lock(&self.state).owner.clone()
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn session(&self) -> &Arc<P> {
        &self.session
    }
}

impl<S: DocumentStore, P: SessionProvider> Drop for NoteSyncViewModel<S, P> {
    fn drop(&mut self) {
        self.close();
    }
}
