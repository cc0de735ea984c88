//! # Storage Layer
//!
//! This module defines the document store abstraction for notezy. The
//! [`DocumentStore`] trait is everything the rest of the crate knows about
//! persistence: per-document CRUD on notes, profile documents, and live
//! queries that push the full matching set to a [`SnapshotListener`].
//!
//! ## Live Queries
//!
//! `subscribe` registers a listener for a [`NoteQuery`] and returns a
//! [`Subscription`] handle synchronously. The listener receives:
//!
//! - an initial snapshot with every note matching the query
//! - a new **full** snapshot after every successful mutation that could
//!   change the result set (never a delta)
//! - `on_error` when the store cannot produce a snapshot
//!
//! Cancelling the handle (explicitly or by dropping it) unregisters the
//! listener exactly once. Snapshots carry no sequence number, so a consumer
//! always takes the latest one it received.
//!
//! ## Implementations
//!
//! - [`memory::InMemoryDocumentStore`]: for tests and embedding
//!   - No persistence
//!   - Failure injection and latency compensation for exercising edge cases
//!
//! - [`fs::FileDocumentStore`]: JSON documents under a data directory
//!   ```text
//!   <home>/
//!   ├── notes.json      # Array of notes, in insertion order
//!   └── profiles.json   # Profile documents keyed by identity
//!   ```
//!   Subscriptions are in-process only.

use crate::error::StoreError;
use crate::model::{Identity, NewNote, Note, NoteId, NotePatch, NoteQuery, UserProfile};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub mod fs;
pub mod memory;
mod registry;

/// Receiver side of a live query.
pub trait SnapshotListener: Send + Sync {
    /// The complete current result set, in store order.
    fn on_snapshot(&self, notes: Vec<Note>);

    fn on_error(&self, error: StoreError);
}

/// Handle for an active live query.
///
/// The cancel action runs at most once, either from [`Subscription::cancel`]
/// or when the handle is dropped.
pub struct Subscription {
    id: u64,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(id: u64, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Abstract interface for the backend document store.
///
/// Methods take `&self`: stores are shared between the view-model and the
/// subscriptions they hand out, so implementations use interior mutability.
/// Implementations must not hold internal locks while calling listeners.
pub trait DocumentStore: Send + Sync {
    /// Open a live query. The initial snapshot (or error) is delivered to
    /// `listener`, possibly before this returns.
    fn subscribe(&self, query: NoteQuery, listener: Arc<dyn SnapshotListener>) -> Subscription;

    /// Create a note; the store assigns the id and the creation timestamp.
    fn create(&self, note: NewNote) -> Result<NoteId, StoreError>;

    /// Rewrite the fields present in `patch`.
    fn update(&self, id: &NoteId, patch: NotePatch) -> Result<(), StoreError>;

    /// Permanently remove a note.
    fn remove(&self, id: &NoteId) -> Result<(), StoreError>;

    fn get_one(&self, id: &NoteId) -> Result<Option<Note>, StoreError>;

    /// Create or replace a profile document.
    fn put_profile(&self, profile: UserProfile) -> Result<(), StoreError>;

    fn profile(&self, id: &Identity) -> Result<Option<UserProfile>, StoreError>;
}

/// Lock a mutex, recovering the data if a panicking thread poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
