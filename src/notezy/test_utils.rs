use crate::error::StoreError;
use crate::model::{Identity, NewNote, Note, NoteId, NotePatch, NoteQuery, UserProfile};
use crate::store::{lock, DocumentStore, SnapshotListener, Subscription};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Subscribe(NoteQuery),
    Create(NewNote),
    Update(NoteId, NotePatch),
    Remove(NoteId),
    GetOne(NoteId),
}

/// A remote-like store driven by the test.
///
/// Nothing is pushed on its own: the test decides when snapshots or errors
/// arrive, and listeners stay reachable after their subscription was
/// cancelled so late pushes can be simulated. [`ScriptedStore::fail_next`]
/// only affects writes (`create`, `update`, `remove`).
#[derive(Default)]
pub struct ScriptedStore {
    listeners: Mutex<Vec<Arc<dyn SnapshotListener>>>,
    cancelled: Arc<Mutex<Vec<u64>>>,
    next_id: AtomicU64,
    calls: Mutex<Vec<StoreCall>>,
    documents: Mutex<HashMap<NoteId, Note>>,
    fail_next: Mutex<Option<StoreError>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a snapshot to the listener of the `index`-th subscribe call.
    pub fn push(&self, index: usize, notes: Vec<Note>) {
        let listener = Arc::clone(&lock(&self.listeners)[index]);
        listener.on_snapshot(notes);
    }

    /// Push to the most recent subscriber.
    pub fn push_latest(&self, notes: Vec<Note>) {
        let index = self.subscribe_count() - 1;
        self.push(index, notes);
    }

    pub fn fail(&self, index: usize, error: StoreError) {
        let listener = Arc::clone(&lock(&self.listeners)[index]);
        listener.on_error(error);
    }

    pub fn fail_next(&self, error: StoreError) {
        *lock(&self.fail_next) = Some(error);
    }

    pub fn insert_document(&self, note: Note) {
        lock(&self.documents).insert(note.id.clone(), note);
    }

    pub fn subscribe_count(&self) -> usize {
        lock(&self.listeners).len()
    }

    pub fn cancel_count(&self) -> usize {
        lock(&self.cancelled).len()
    }

    /// Subscriptions opened and not yet cancelled.
    pub fn outstanding(&self) -> usize {
        self.subscribe_count() - self.cancel_count()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.calls).clone()
    }

    pub fn creates(&self) -> Vec<NewNote> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::Create(note) => Some(note),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: StoreCall) -> Result<(), StoreError> {
        lock(&self.calls).push(call);
        match lock(&self.fail_next).take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl DocumentStore for ScriptedStore {
    fn subscribe(&self, query: NoteQuery, listener: Arc<dyn SnapshotListener>) -> Subscription {
        lock(&self.calls).push(StoreCall::Subscribe(query));
        lock(&self.listeners).push(listener);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let cancelled = Arc::clone(&self.cancelled);
        Subscription::new(id, move || lock(&cancelled).push(id))
    }

    fn create(&self, note: NewNote) -> Result<NoteId, StoreError> {
        self.record(StoreCall::Create(note))?;
        Ok(NoteId::generate())
    }

    fn update(&self, id: &NoteId, patch: NotePatch) -> Result<(), StoreError> {
        self.record(StoreCall::Update(id.clone(), patch))
    }

    fn remove(&self, id: &NoteId) -> Result<(), StoreError> {
        self.record(StoreCall::Remove(id.clone()))
    }

    fn get_one(&self, id: &NoteId) -> Result<Option<Note>, StoreError> {
        lock(&self.calls).push(StoreCall::GetOne(id.clone()));
        Ok(lock(&self.documents).get(id).cloned())
    }

    fn put_profile(&self, _profile: UserProfile) -> Result<(), StoreError> {
        Ok(())
    }

    fn profile(&self, _id: &Identity) -> Result<Option<UserProfile>, StoreError> {
        Ok(None)
    }
}
