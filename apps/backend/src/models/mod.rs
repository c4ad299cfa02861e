//! API request and response types

use serde::{Deserialize, Serialize};

// Re-export shared types from vibe-cards-core
pub use vibe_cards_core::{
    Card, ChoiceOutcome, DeckLists, DeckSummary, Direction, GradeReport, NewCard, Position,
    RevealOutcome, SessionConfig, SessionMode, SessionSnapshot, StudyOrder,
};

// === Deck Types ===

#[derive(Debug, Serialize)]
pub struct DeckListResponse {
    pub lists: Vec<DeckSummary>,
}

/// Cards of one deck list in their stored shape.
#[derive(Debug, Serialize)]
pub struct DeckCardsResponse {
    pub name: String,
    pub cards: Vec<Card>,
}

#[derive(Debug, Deserialize)]
pub struct CreateListRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CreateCardResponse {
    pub id: i64,
}

// === Session Types ===

#[derive(Debug, Deserialize)]
pub struct SelectListRequest {
    pub list: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequest {
    #[serde(default)]
    pub order: StudyOrder,
    #[serde(default)]
    pub mode: SessionMode,
}

impl From<StartSessionRequest> for SessionConfig {
    fn from(request: StartSessionRequest) -> Self {
        Self {
            order: request.order,
            mode: request.mode,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    pub direction: Direction,
}

#[derive(Debug, Deserialize)]
pub struct WriteAnswerRequest {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceRequest {
    pub option: String,
}

#[derive(Debug, Deserialize)]
pub struct SelfGradeRequest {
    pub correct: bool,
}

/// Outcome of one session action together with the state to render.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T> {
    pub result: T,
    pub session: SessionSnapshot,
}
