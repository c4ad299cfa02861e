//! Test fixtures and factory functions for creating test data.

use serde_json::{json, Value};
use vibe_cards_core::{Card, DeckLists};

pub const LIST: &str = "Quiz";

/// `2+2` card answered by typing.
pub fn write_card() -> Card {
    Card {
        enable_write: true,
        ..Card::new(1, "2+2", "4")
    }
}

/// Capital question answered by multiple choice.
pub fn choice_card() -> Card {
    Card {
        enable_choice: true,
        distractors: vec!["London".to_string(), "Berlin".to_string()],
        ..Card::new(2, "Capital of France?", "Paris")
    }
}

/// Flip-only card.
pub fn flip_card(id: i64) -> Card {
    Card::new(id, format!("Question {id}?"), format!("Answer {id}."))
}

/// Deck lists with a single list named [`LIST`].
pub fn deck_lists(cards: Vec<Card>) -> DeckLists {
    DeckLists::from_lists([(LIST.to_string(), cards)].into_iter().collect())
}

pub fn start_request(order: &str, mode: &str) -> Value {
    json!({ "order": order, "mode": mode })
}

pub fn new_card_request(front: &str, back: &str) -> Value {
    json!({ "front": front, "back": back, "enable_write": true })
}
