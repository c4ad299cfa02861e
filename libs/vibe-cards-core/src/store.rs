//! Storage collaborator interface.

use crate::error::StoreError;
use crate::stats::PersistHook;
use crate::types::DeckLists;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Loads and saves every deck list of a user as one unit.
pub trait DeckStore: Send + Sync {
    /// Stored deck lists for `user_id`, or `None` for a user with no data yet.
    fn load_deck_lists(&self, user_id: &str) -> Result<Option<DeckLists>, StoreError>;

    fn save_deck_lists(&self, user_id: &str, decks: &DeckLists) -> Result<(), StoreError>;

    /// Load the user's deck lists, creating and saving the starter lists on first use.
    fn load_or_create(&self, user_id: &str) -> Result<DeckLists, StoreError> {
        if let Some(decks) = self.load_deck_lists(user_id)? {
            if !decks.is_empty() {
                return Ok(decks);
            }
        }
        let decks = DeckLists::starter(user_id);
        self.save_deck_lists(user_id, &decks)?;
        Ok(decks)
    }

    /// Persist hook bound to one user.
    fn for_user<'a>(&'a self, user_id: &'a str) -> UserStore<'a, Self>
    where
        Self: Sized,
    {
        UserStore {
            store: self,
            user_id,
        }
    }
}

/// A store bound to one user, usable as the stats persist hook.
pub struct UserStore<'a, S: ?Sized> {
    store: &'a S,
    user_id: &'a str,
}

impl<S: DeckStore + ?Sized> PersistHook for UserStore<'_, S> {
    fn persist(&self, decks: &DeckLists) -> Result<(), StoreError> {
        self.store.save_deck_lists(self.user_id, decks)
    }
}

/// In-process store keeping serialized JSON per user.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw JSON saved for a user.
    pub fn raw(&self, user_id: &str) -> Option<String> {
        self.users.lock().ok()?.get(user_id).cloned()
    }
}

impl DeckStore for MemoryStore {
    fn load_deck_lists(&self, user_id: &str) -> Result<Option<DeckLists>, StoreError> {
        let users = self
            .users
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))?;
        users
            .get(user_id)
            .map(|json| serde_json::from_str(json))
            .transpose()
            .map_err(Into::into)
    }

    fn save_deck_lists(&self, user_id: &str, decks: &DeckLists) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        let json = serde_json::to_string(decks)?;
        self.users
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))?
            .insert(user_id.to_string(), json);
        Ok(())
    }
}
