//! Core study library for the Vibe Cards application.
//!
//! Provides:
//! - Deck and card types with their persisted JSON shape
//! - Typed-answer grading (matching-blocks similarity)
//! - Study order and seeded multiple-choice shuffling
//! - Interaction mode resolution per card
//! - The study session state machine and score flow
//! - Per-card attempt history and the storage collaborator interface

pub mod error;
pub mod grader;
pub mod modes;
pub mod ordering;
pub mod session;
pub mod stats;
pub mod store;
pub mod types;

pub use error::{CoreError, Result, StoreError};
pub use grader::{grade, grade_report, similarity, word_diff, DiffSegment, DiffType, Grade, GradeReport};
pub use modes::{active_mode, available_modes};
pub use ordering::{build_study_sequence, shuffle_distractors};
pub use session::{
    submit_choice, CardView, ChoiceOutcome, CurrentCard, Direction, Feedback, Position,
    RevealOutcome, SessionPhase, SessionSnapshot, StudySession,
};
pub use stats::{record, retry_persist, NoPersist, PersistHook, HISTORY_LIMIT};
pub use store::{DeckStore, MemoryStore, UserStore};
pub use types::{
    Card, CardMode, CardStats, DeckLists, DeckSummary, NewCard, Score, SessionConfig, SessionMode,
    StudyOrder,
};
