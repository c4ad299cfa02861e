pub mod decks;
pub mod study;
