use super::{lock, SnapshotListener, Subscription};
use crate::error::StoreError;
use crate::model::{Note, NoteQuery};
use std::sync::{Arc, Mutex, Weak};

/// Live query subscribers of one store.
#[derive(Default)]
pub(crate) struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

struct Entry {
    id: u64,
    query: NoteQuery,
    listener: Arc<dyn SnapshotListener>,
}

/// A pending notification, sent after every store lock has been released.
pub(crate) struct Delivery {
    listener: Arc<dyn SnapshotListener>,
    outcome: Result<Vec<Note>, StoreError>,
}

impl Delivery {
    pub(crate) fn new(
        listener: Arc<dyn SnapshotListener>,
        outcome: Result<Vec<Note>, StoreError>,
    ) -> Self {
        Self { listener, outcome }
    }

    pub(crate) fn send(self) {
        match self.outcome {
            Ok(notes) => self.listener.on_snapshot(notes),
            Err(error) => self.listener.on_error(error),
        }
    }
}

pub(crate) fn dispatch(deliveries: Vec<Delivery>) {
    for delivery in deliveries {
        delivery.send();
    }
}

pub(crate) fn matching(notes: &[Note], query: &NoteQuery) -> Vec<Note> {
    notes.iter().filter(|n| query.matches(n)).cloned().collect()
}

impl Registry {
    /// Add a listener and return the handle that removes it again.
    pub(crate) fn register(
        shared: &Arc<Mutex<Registry>>,
        query: NoteQuery,
        listener: Arc<dyn SnapshotListener>,
    ) -> Subscription {
        let id = {
            let mut registry = lock(shared);
            registry.next_id += 1;
            let id = registry.next_id;
            registry.entries.push(Entry {
                id,
                query,
                listener,
            });
            id
        };
        tracing::debug!(subscription = id, "live query registered");

        let weak: Weak<Mutex<Registry>> = Arc::downgrade(shared);
        Subscription::new(id, move || {
            if let Some(shared) = weak.upgrade() {
                if lock(&shared).remove(id) {
                    tracing::debug!(subscription = id, "live query cancelled");
                }
            }
        })
    }

    fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// One full snapshot, computed from `notes`, for every subscriber whose
    /// query matches `changed`.
    pub(crate) fn snapshots(&self, notes: &[Note], changed: &Note) -> Vec<Delivery> {
        self.entries
            .iter()
            .filter(|e| e.query.matches(changed))
            .map(|e| Delivery::new(Arc::clone(&e.listener), Ok(matching(notes, &e.query))))
            .collect()
    }
}
