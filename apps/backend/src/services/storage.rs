//! JSON file storage for user deck lists.
//!
//! Each user's deck lists live in `<data_dir>/<user>_deck.json`. Files
//! written by the single-deck version of the app (a bare array of cards)
//! load into a `Default` list.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use vibe_cards_core::{Card, DeckLists, DeckStore, StoreError};

#[derive(Deserialize)]
#[serde(untagged)]
enum DeckFile {
    Lists(DeckLists),
    Single(Vec<Card>),
}

impl From<DeckFile> for DeckLists {
    fn from(file: DeckFile) -> Self {
        match file {
            DeckFile::Lists(lists) => lists,
            DeckFile::Single(cards) => DeckLists::from_lists(
                [(DeckLists::DEFAULT_LIST.to_string(), cards)]
                    .into_iter()
                    .collect(),
            ),
        }
    }
}

/// User ids become file names, so only a conservative character set is accepted.
pub fn is_valid_user_id(user_id: &str) -> bool {
    !user_id.is_empty()
        && user_id.len() <= 64
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Deck store backed by one JSON file per user.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn deck_file(&self, user_id: &str) -> PathBuf {
        self.data_dir.join(format!("{user_id}_deck.json"))
    }
}

impl DeckStore for JsonFileStore {
    fn load_deck_lists(&self, user_id: &str) -> Result<Option<DeckLists>, StoreError> {
        let path = self.deck_file(user_id);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let file: DeckFile = serde_json::from_str(&content)?;
        tracing::debug!(user = user_id, path = %path.display(), "loaded deck lists");
        Ok(Some(file.into()))
    }

    fn save_deck_lists(&self, user_id: &str, decks: &DeckLists) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)?;
        let path = self.deck_file(user_id);
        let tmp = path.with_extension("json.tmp");

        let content = serde_json::to_string_pretty(decks)?;
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &path)?;

        tracing::info!(user = user_id, lists = decks.len(), "saved deck lists");
        Ok(())
    }
}
