//! Core types for the study application.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rolling performance record of a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStats {
    #[serde(default)]
    pub attempts: u32,
    /// Most recent results, oldest first.
    #[serde(default)]
    pub history: Vec<bool>,
}

/// A question/answer unit with optional typed and multiple-choice capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub enable_write: bool,
    #[serde(default)]
    pub enable_choice: bool,
    #[serde(default)]
    pub distractors: Vec<String>,
    #[serde(default)]
    pub stats: CardStats,
}

impl Card {
    /// Create a flip-only card.
    pub fn new(id: i64, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id,
            front: front.into(),
            back: back.into(),
            enable_write: false,
            enable_choice: false,
            distractors: Vec::new(),
            stats: CardStats::default(),
        }
    }
}

/// Card content before an id has been assigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCard {
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub enable_write: bool,
    #[serde(default)]
    pub enable_choice: bool,
    #[serde(default)]
    pub distractors: Vec<String>,
}

impl NewCard {
    fn into_card(self, id: i64) -> Card {
        Card {
            id,
            front: self.front,
            back: self.back,
            enable_write: self.enable_write,
            enable_choice: self.enable_choice,
            distractors: self.distractors,
            stats: CardStats::default(),
        }
    }
}

/// Summary of one deck list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSummary {
    pub name: String,
    pub card_count: usize,
}

/// All deck lists owned by one user, keyed by list name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckLists {
    lists: BTreeMap<String, Vec<Card>>,
}

impl DeckLists {
    /// Name of the list created for new users.
    pub const DEFAULT_LIST: &'static str = "Default";

    /// Deck lists handed to a user on first login.
    pub fn starter(username: &str) -> Self {
        let mut lists = BTreeMap::new();
        lists.insert(
            Self::DEFAULT_LIST.to_string(),
            vec![
                Card::new(1, format!("Welcome {username}!"), "This is your private deck."),
                Card::new(
                    2,
                    "Where is this saved?",
                    format!("In user_data/{username}_deck.json"),
                ),
            ],
        );
        Self { lists }
    }

    pub fn from_lists(lists: BTreeMap<String, Vec<Card>>) -> Self {
        Self { lists }
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lists.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    pub fn summaries(&self) -> Vec<DeckSummary> {
        self.lists
            .iter()
            .map(|(name, cards)| DeckSummary {
                name: name.clone(),
                card_count: cards.len(),
            })
            .collect()
    }

    pub fn cards(&self, name: &str) -> Option<&[Card]> {
        self.lists.get(name).map(Vec::as_slice)
    }

    pub fn cards_mut(&mut self, name: &str) -> Option<&mut Vec<Card>> {
        self.lists.get_mut(name)
    }

    /// Create an empty list.
    pub fn create_list(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidListName(name.to_string()));
        }
        if self.lists.contains_key(name) {
            return Err(CoreError::DuplicateList(name.to_string()));
        }
        self.lists.insert(name.to_string(), Vec::new());
        Ok(())
    }

    /// Delete a list and its cards. The last remaining list cannot be deleted.
    pub fn delete_list(&mut self, name: &str) -> Result<Vec<Card>> {
        if !self.lists.contains_key(name) {
            return Err(CoreError::UnknownList(name.to_string()));
        }
        if self.lists.len() == 1 {
            return Err(CoreError::LastList);
        }
        Ok(self.lists.remove(name).unwrap_or_default())
    }

    /// Append a card to a list, returning its newly assigned id.
    pub fn add_card(&mut self, list: &str, card: NewCard) -> Result<i64> {
        let id = self.next_card_id();
        let cards = self
            .lists
            .get_mut(list)
            .ok_or_else(|| CoreError::UnknownList(list.to_string()))?;
        cards.push(card.into_card(id));
        Ok(id)
    }

    /// Remove a card from a list by id.
    pub fn remove_card(&mut self, list: &str, id: i64) -> Result<Card> {
        let cards = self
            .lists
            .get_mut(list)
            .ok_or_else(|| CoreError::UnknownList(list.to_string()))?;
        let pos = cards
            .iter()
            .position(|c| c.id == id)
            .ok_or(CoreError::CardNotFound(id))?;
        Ok(cards.remove(pos))
    }

    /// Next unused card id across every list.
    pub fn next_card_id(&self) -> i64 {
        self.lists
            .values()
            .flatten()
            .map(|c| c.id)
            .max()
            .map_or(1, |max| max + 1)
    }
}

/// Order in which a session walks the deck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyOrder {
    #[default]
    Sequential,
    Random,
}

/// Session style: self-graded review or auto-graded testing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    #[default]
    ReviewOnly,
    Interactive,
}

/// Settings fixed when a session starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub order: StudyOrder,
    pub mode: SessionMode,
}

/// Ways a user can interact with a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardMode {
    Flip,
    Write,
    Choice,
}

impl CardMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flip => "flip",
            Self::Write => "write",
            Self::Choice => "choice",
        }
    }
}

/// Session-scoped answer counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub correct: u32,
    pub partial: u32,
    pub missed: u32,
}

impl Score {
    pub fn total(&self) -> u32 {
        self.correct + self.partial + self.missed
    }
}
