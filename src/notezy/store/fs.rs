use super::registry::{dispatch, matching, Delivery, Registry};
use super::{lock, DocumentStore, SnapshotListener, Subscription};
use crate::error::StoreError;
use crate::model::{Identity, NewNote, Note, NoteId, NotePatch, NoteQuery, UserProfile};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const NOTES_FILENAME: &str = "notes.json";
const PROFILES_FILENAME: &str = "profiles.json";

/// Write `dir/filename` through a sibling temp file and a rename, so readers
/// see either the old or the new content, never a partial write.
pub(crate) fn write_atomic(dir: &Path, filename: &str, content: &str) -> std::io::Result<()> {
    let tmp = dir.join(format!("{}.tmp", filename));
    fs::write(&tmp, content)?;
    fs::rename(tmp, dir.join(filename))
}

pub struct FileDocumentStore {
    root: PathBuf,
    subscribers: Arc<Mutex<Registry>>,
    // serializes read-modify-write cycles within this process
    writes: Mutex<()>,
}

impl FileDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            subscribers: Arc::default(),
            writes: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }

    fn load<T: DeserializeOwned + Default>(&self, filename: &str) -> Result<T, StoreError> {
        let path = self.root.join(filename);
        if !path.exists() {
            return Ok(T::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save<T: Serialize>(&self, filename: &str, value: &T) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(value)?;
        write_atomic(&self.root, filename, &content)?;
        Ok(())
    }

    fn load_notes(&self) -> Result<Vec<Note>, StoreError> {
        self.load(NOTES_FILENAME)
    }

    fn save_notes(&self, notes: &[Note]) -> Result<(), StoreError> {
        self.save(NOTES_FILENAME, &notes)
    }

    fn position(notes: &[Note], id: &NoteId) -> Result<usize, StoreError> {
        notes
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}

impl DocumentStore for FileDocumentStore {
    fn subscribe(&self, query: NoteQuery, listener: Arc<dyn SnapshotListener>) -> Subscription {
        let (subscription, initial) = {
            let _guard = lock(&self.writes);
            let initial = self.load_notes().map(|notes| matching(&notes, &query));
            if let Err(error) = &initial {
                tracing::warn!(root = %self.root.display(), error = %error, "failed to load notes for live query");
            }
            let subscription = Registry::register(&self.subscribers, query, Arc::clone(&listener));
            (subscription, initial)
        };
        Delivery::new(listener, initial).send();
        subscription
    }

    fn create(&self, note: NewNote) -> Result<NoteId, StoreError> {
        let id = NoteId::generate();
        let deliveries = {
            let _guard = lock(&self.writes);
            let mut notes = self.load_notes()?;
            let stored = Note::new(id.clone(), note.owner_id, note.text).with_created_at(Utc::now());
            notes.push(stored.clone());
            self.save_notes(&notes)?;
            lock(&self.subscribers).snapshots(&notes, &stored)
        };
        tracing::debug!(note = %id, "note created");
        dispatch(deliveries);
        Ok(id)
    }

    fn update(&self, id: &NoteId, patch: NotePatch) -> Result<(), StoreError> {
        let deliveries = {
            let _guard = lock(&self.writes);
            let mut notes = self.load_notes()?;
            let pos = Self::position(&notes, id)?;
            notes[pos].text = patch.text;
            self.save_notes(&notes)?;
            lock(&self.subscribers).snapshots(&notes, &notes[pos])
        };
        tracing::debug!(note = %id, "note updated");
        dispatch(deliveries);
        Ok(())
    }

    fn remove(&self, id: &NoteId) -> Result<(), StoreError> {
        let deliveries = {
            let _guard = lock(&self.writes);
            let mut notes = self.load_notes()?;
            let pos = Self::position(&notes, id)?;
            let removed = notes.remove(pos);
            self.save_notes(&notes)?;
            lock(&self.subscribers).snapshots(&notes, &removed)
        };
        tracing::debug!(note = %id, "note removed");
        dispatch(deliveries);
        Ok(())
    }

    fn get_one(&self, id: &NoteId) -> Result<Option<Note>, StoreError> {
        let notes = self.load_notes()?;
        Ok(notes.into_iter().find(|n| &n.id == id))
    }

    fn put_profile(&self, profile: UserProfile) -> Result<(), StoreError> {
        let _guard = lock(&self.writes);
        let mut profiles: HashMap<Identity, UserProfile> = self.load(PROFILES_FILENAME)?;
        profiles.insert(profile.id.clone(), profile);
        self.save(PROFILES_FILENAME, &profiles)
    }

    fn profile(&self, id: &Identity) -> Result<Option<UserProfile>, StoreError> {
        let mut profiles: HashMap<Identity, UserProfile> = self.load(PROFILES_FILENAME)?;
        Ok(profiles.remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::RecordingListener;

    fn new_note(owner: &str, text: &str) -> NewNote {
        NewNote {
            text: text.into(),
            owner_id: Identity::new(owner),
        }
    }

    #[test]
    fn notes_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let store = FileDocumentStore::new(dir.path());
            store.create(new_note("u1", "Buy milk")).unwrap()
        };

        let store = FileDocumentStore::new(dir.path());
        let note = store.get_one(&id).unwrap().unwrap();
        assert_eq!(note.text, "Buy milk");
        assert_eq!(note.owner_id, Identity::new("u1"));
        assert!(note.created_at.is_some());
    }

    #[test]
    fn missing_files_mean_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path().join("fresh"));
        let listener = Arc::new(RecordingListener::default());
        let _sub = store.subscribe(NoteQuery::owned_by(Identity::new("u1")), listener.clone());
        assert_eq!(listener.last(), Some(Vec::new()));
        assert_eq!(store.profile(&Identity::new("u1")).unwrap(), None);
    }

    #[test]
    fn subscribers_see_mutations() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path());
        let listener = Arc::new(RecordingListener::default());
        let _sub = store.subscribe(NoteQuery::owned_by(Identity::new("u1")), listener.clone());

        let id = store.create(new_note("u1", "draft")).unwrap();
        store
            .update(&id, NotePatch { text: "final".into() })
            .unwrap();
        assert_eq!(listener.last().unwrap()[0].text, "final");

        store.remove(&id).unwrap();
        assert_eq!(listener.last(), Some(Vec::new()));
        assert_eq!(store.get_one(&id).unwrap(), None);
    }

    #[test]
    fn corrupt_notes_file_is_reported_to_listener() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(NOTES_FILENAME), "not json").unwrap();
        let store = FileDocumentStore::new(dir.path());
        let listener = Arc::new(RecordingListener::default());
        let _sub = store.subscribe(NoteQuery::owned_by(Identity::new("u1")), listener.clone());

        assert_eq!(listener.snapshot_count(), 0);
        assert!(matches!(
            lock(&listener.errors).first(),
            Some(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn removing_unknown_note_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path());
        let missing = NoteId::new("missing");
        assert_eq!(store.remove(&missing), Err(StoreError::NotFound(missing)));
    }
}
