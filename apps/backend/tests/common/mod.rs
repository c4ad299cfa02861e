//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext with a throwaway data directory and test server
//! - Helper functions for creating test data

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use tempfile::TempDir;

use vibe_cards_backend::services::storage::JsonFileStore;
use vibe_cards_backend::{router, AppState};
use vibe_cards_core::{DeckLists, DeckStore};

/// Test context holding the data directory and a server over the full router.
pub struct TestContext {
    pub dir: TempDir,
    pub server: TestServer,
}

impl TestContext {
    /// Create a new test context with an empty data directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let state = AppState::new(JsonFileStore::new(dir.path()));
        let server = TestServer::new(router(state)).expect("Failed to start test server");
        Self { dir, server }
    }

    /// Create a test context whose user already owns `decks` on disk.
    pub fn with_decks(user: &str, decks: &DeckLists) -> Self {
        let ctx = Self::new();
        ctx.store()
            .save_deck_lists(user, decks)
            .expect("Failed to seed deck lists");
        ctx
    }

    /// Store over the same data directory as the server.
    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(self.dir.path())
    }

    /// Deck lists as currently saved on disk.
    pub fn saved_decks(&self, user: &str) -> DeckLists {
        self.store()
            .load_deck_lists(user)
            .expect("Failed to load deck lists")
            .expect("No deck file for user")
    }

    pub fn url(user: &str, path: &str) -> String {
        format!("/api/users/{user}{path}")
    }
}
