use super::registry::{dispatch, matching, Delivery, Registry};
use super::{lock, DocumentStore, SnapshotListener, Subscription};
use crate::error::StoreError;
use crate::model::{Identity, NewNote, Note, NoteId, NotePatch, NoteQuery, UserProfile};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Documents {
    notes: Vec<Note>,
    profiles: HashMap<Identity, UserProfile>,
    fail_next: Option<StoreError>,
}

impl Documents {
    fn take_failure(&mut self) -> Result<(), StoreError> {
        match self.fail_next.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn position(&self, id: &NoteId) -> Result<usize, StoreError> {
        self.notes
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}

/// In-memory document store for testing and embedding.
/// Does NOT persist data.
///
/// Notes are kept in insertion order and every snapshot preserves it.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    docs: Mutex<Documents>,
    subscribers: Arc<Mutex<Registry>>,
    latency_compensation: bool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create` push a snapshot with the new note's `created_at` unset
    /// before pushing the acknowledged one.
    pub fn with_latency_compensation(mut self) -> Self {
        self.latency_compensation = true;
        self
    }

    /// Seed notes as-is, ids and timestamps included.
    pub fn with_notes(self, notes: impl IntoIterator<Item = Note>) -> Self {
        lock(&self.docs).notes.extend(notes);
        self
    }

    /// The next store operation fails with `error` instead of running.
    pub fn fail_next(&self, error: StoreError) {
        lock(&self.docs).fail_next = Some(error);
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }

    /// Every stored note regardless of owner.
    pub fn notes(&self) -> Vec<Note> {
        lock(&self.docs).notes.clone()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn subscribe(&self, query: NoteQuery, listener: Arc<dyn SnapshotListener>) -> Subscription {
        let (subscription, initial) = {
            let mut docs = lock(&self.docs);
            let initial = docs
                .take_failure()
                .map(|_| matching(&docs.notes, &query));
            let subscription = Registry::register(&self.subscribers, query, Arc::clone(&listener));
            (subscription, initial)
        };
        Delivery::new(listener, initial).send();
        subscription
    }

    fn create(&self, note: NewNote) -> Result<NoteId, StoreError> {
        let id = NoteId::generate();
        let mut deliveries = Vec::new();
        {
            let mut docs = lock(&self.docs);
            docs.take_failure()?;
            let mut stored = Note::new(id.clone(), note.owner_id, note.text);

            if self.latency_compensation {
                docs.notes.push(stored.clone());
                deliveries.extend(lock(&self.subscribers).snapshots(&docs.notes, &stored));
                docs.notes.pop();
            }

            stored.created_at = Some(Utc::now());
            docs.notes.push(stored.clone());
            deliveries.extend(lock(&self.subscribers).snapshots(&docs.notes, &stored));
        }
        dispatch(deliveries);
        Ok(id)
    }

    fn update(&self, id: &NoteId, patch: NotePatch) -> Result<(), StoreError> {
        let deliveries = {
            let mut docs = lock(&self.docs);
            docs.take_failure()?;
            let pos = docs.position(id)?;
            docs.notes[pos].text = patch.text;
            let changed = docs.notes[pos].clone();
            lock(&self.subscribers).snapshots(&docs.notes, &changed)
        };
        dispatch(deliveries);
        Ok(())
    }

    fn remove(&self, id: &NoteId) -> Result<(), StoreError> {
        let deliveries = {
            let mut docs = lock(&self.docs);
            docs.take_failure()?;
            let pos = docs.position(id)?;
            let removed = docs.notes.remove(pos);
            lock(&self.subscribers).snapshots(&docs.notes, &removed)
        };
        dispatch(deliveries);
        Ok(())
    }

    fn get_one(&self, id: &NoteId) -> Result<Option<Note>, StoreError> {
        let mut docs = lock(&self.docs);
        docs.take_failure()?;
        Ok(docs.notes.iter().find(|n| &n.id == id).cloned())
    }

    fn put_profile(&self, profile: UserProfile) -> Result<(), StoreError> {
        let mut docs = lock(&self.docs);
        docs.take_failure()?;
        docs.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    fn profile(&self, id: &Identity) -> Result<Option<UserProfile>, StoreError> {
        let mut docs = lock(&self.docs);
        docs.take_failure()?;
        Ok(docs.profiles.get(id).cloned())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    /// Records everything a store pushes to one listener.
    #[derive(Default)]
    pub struct RecordingListener {
        pub snapshots: Mutex<Vec<Vec<Note>>>,
        pub errors: Mutex<Vec<StoreError>>,
    }

    impl RecordingListener {
        pub fn last(&self) -> Option<Vec<Note>> {
            lock(&self.snapshots).last().cloned()
        }

        pub fn snapshot_count(&self) -> usize {
            lock(&self.snapshots).len()
        }
    }

    impl SnapshotListener for RecordingListener {
        fn on_snapshot(&self, notes: Vec<Note>) {
            lock(&self.snapshots).push(notes);
        }

        fn on_error(&self, error: StoreError) {
            lock(&self.errors).push(error);
        }
    }

    pub fn note(id: &str, owner: &str, text: &str) -> Note {
        Note::new(NoteId::new(id), Identity::new(owner), text).with_created_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{note, RecordingListener};
    use super::*;

    fn new_note(owner: &str, text: &str) -> NewNote {
        NewNote {
            text: text.into(),
            owner_id: Identity::new(owner),
        }
    }

    fn texts(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.text.as_str()).collect()
    }

    #[test]
    fn subscribe_pushes_initial_snapshot_for_owner_only() {
        let store = InMemoryDocumentStore::new().with_notes([
            note("n1", "u1", "Buy milk"),
            note("n2", "u2", "Not mine"),
            note("n3", "u1", "Call mom"),
        ]);
        let listener = Arc::new(RecordingListener::default());
        let _sub = store.subscribe(NoteQuery::owned_by(Identity::new("u1")), listener.clone());

        assert_eq!(texts(&listener.last().unwrap()), vec!["Buy milk", "Call mom"]);
    }

    #[test]
    fn mutations_push_full_snapshots_in_insertion_order() {
        let store = InMemoryDocumentStore::new();
        let listener = Arc::new(RecordingListener::default());
        let _sub = store.subscribe(NoteQuery::owned_by(Identity::new("u1")), listener.clone());

        let first = store.create(new_note("u1", "one")).unwrap();
        store.create(new_note("u1", "two")).unwrap();
        assert_eq!(texts(&listener.last().unwrap()), vec!["one", "two"]);

        store
            .update(&first, NotePatch { text: "uno".into() })
            .unwrap();
        assert_eq!(texts(&listener.last().unwrap()), vec!["uno", "two"]);

        store.remove(&first).unwrap();
        assert_eq!(texts(&listener.last().unwrap()), vec!["two"]);
    }

    #[test]
    fn other_owners_changes_are_not_pushed() {
        let store = InMemoryDocumentStore::new();
        let listener = Arc::new(RecordingListener::default());
        let _sub = store.subscribe(NoteQuery::owned_by(Identity::new("u1")), listener.clone());

        store.create(new_note("u2", "elsewhere")).unwrap();
        assert_eq!(listener.snapshot_count(), 1);
    }

    #[test]
    fn cancelled_subscription_receives_nothing() {
        let store = InMemoryDocumentStore::new();
        let listener = Arc::new(RecordingListener::default());
        let sub = store.subscribe(NoteQuery::owned_by(Identity::new("u1")), listener.clone());
        assert_eq!(store.subscriber_count(), 1);

        sub.cancel();
        assert_eq!(store.subscriber_count(), 0);
        store.create(new_note("u1", "late")).unwrap();
        assert_eq!(listener.snapshot_count(), 1);
    }

    #[test]
    fn latency_compensation_pushes_pending_timestamp_first() {
        let store = InMemoryDocumentStore::new().with_latency_compensation();
        let listener = Arc::new(RecordingListener::default());
        let _sub = store.subscribe(NoteQuery::owned_by(Identity::new("u1")), listener.clone());

        store.create(new_note("u1", "fresh")).unwrap();

        let snapshots = lock(&listener.snapshots).clone();
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[1][0].created_at, None);
        assert!(snapshots[2][0].created_at.is_some());
        assert_eq!(store.notes().len(), 1);
    }

    #[test]
    fn update_and_remove_unknown_ids_fail() {
        let store = InMemoryDocumentStore::new();
        let missing = NoteId::new("nope");
        assert_eq!(
            store.update(&missing, NotePatch { text: "x".into() }),
            Err(StoreError::NotFound(missing.clone()))
        );
        assert_eq!(
            store.remove(&missing),
            Err(StoreError::NotFound(missing.clone()))
        );
        assert_eq!(store.get_one(&missing), Ok(None));
    }

    #[test]
    fn injected_failure_hits_next_operation_only() {
        let store = InMemoryDocumentStore::new();
        store.fail_next(StoreError::Unavailable("offline".into()));
        assert!(store.create(new_note("u1", "a")).is_err());
        assert!(store.create(new_note("u1", "a")).is_ok());
    }

    #[test]
    fn injected_failure_on_subscribe_goes_to_on_error() {
        let store = InMemoryDocumentStore::new();
        store.fail_next(StoreError::PermissionDenied("rules".into()));
        let listener = Arc::new(RecordingListener::default());
        let _sub = store.subscribe(NoteQuery::owned_by(Identity::new("u1")), listener.clone());

        assert_eq!(listener.snapshot_count(), 0);
        assert_eq!(
            lock(&listener.errors).as_slice(),
            &[StoreError::PermissionDenied("rules".into())]
        );
    }

    #[test]
    fn profiles_round_trip() {
        let store = InMemoryDocumentStore::new();
        let profile = UserProfile {
            id: Identity::new("u1"),
            email: "ada@example.com".into(),
            name: Some("Ada".into()),
        };
        store.put_profile(profile.clone()).unwrap();
        assert_eq!(store.profile(&Identity::new("u1")).unwrap(), Some(profile));
        assert_eq!(store.profile(&Identity::new("u2")).unwrap(), None);
    }
}
