//! Per-user study state held by the server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use vibe_cards_core::{DeckLists, DeckStore, StudySession, UserStore};

use crate::error::{ApiError, Result};
use crate::services::storage::{is_valid_user_id, JsonFileStore};

/// Deck lists and session of one user.
#[derive(Debug)]
pub struct UserSession {
    pub decks: DeckLists,
    pub session: StudySession,
}

/// Empty until the user's deck lists are first loaded.
type UserSlot = Arc<Mutex<Option<UserSession>>>;

/// Loaded users, keyed by user id. Each user has their own lock.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    users: Mutex<HashMap<String, UserSlot>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against a user's state, loading it from `store` on first access.
    ///
    /// Only this user's lock is held while `f` and any storage calls run.
    pub fn with_user<T>(
        &self,
        store: &JsonFileStore,
        user_id: &str,
        f: impl FnOnce(&mut UserSession, &UserStore<'_, JsonFileStore>) -> Result<T>,
    ) -> Result<T> {
        if !is_valid_user_id(user_id) {
            return Err(ApiError::BadRequest(format!("invalid user id: {user_id:?}")));
        }

        let slot = self.slot(user_id)?;
        let mut guard = slot
            .lock()
            .map_err(|_| ApiError::Internal(format!("session lock poisoned for {user_id}")))?;

        if guard.is_none() {
            let decks = store.load_or_create(user_id)?;
            tracing::info!(user = user_id, lists = decks.len(), "user loaded");
            *guard = Some(UserSession {
                decks,
                session: StudySession::new(),
            });
        }

        let user = guard
            .as_mut()
            .ok_or_else(|| ApiError::Internal("user vanished from registry".to_string()))?;
        f(user, &store.for_user(user_id))
    }

    fn slot(&self, user_id: &str) -> Result<UserSlot> {
        let mut users = self
            .users
            .lock()
            .map_err(|_| ApiError::Internal("session registry lock poisoned".to_string()))?;
        Ok(Arc::clone(users.entry(user_id.to_string()).or_default()))
    }
}
