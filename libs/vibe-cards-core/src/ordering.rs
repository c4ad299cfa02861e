//! Study order and per-card option shuffling.

use crate::types::{Card, StudyOrder};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Build the study sequence for a deck of `deck_size` cards.
pub fn build_study_sequence(deck_size: usize, order: StudyOrder) -> Vec<usize> {
    build_sequence_with(deck_size, order, &mut rand::thread_rng())
}

/// Build the study sequence drawing randomness from `rng`.
pub fn build_sequence_with<R: Rng + ?Sized>(
    deck_size: usize,
    order: StudyOrder,
    rng: &mut R,
) -> Vec<usize> {
    let mut sequence: Vec<usize> = (0..deck_size).collect();
    if order == StudyOrder::Random {
        sequence.shuffle(rng);
    }
    sequence
}

/// Multiple-choice options for a card in a stable order.
///
/// The options are the distractors plus the correct answer, permuted by a
/// ChaCha8 generator seeded with the card id, so every render of the same
/// card shows the same order on every platform.
pub fn shuffle_distractors(card: &Card) -> Vec<String> {
    let mut options: Vec<String> = card
        .distractors
        .iter()
        .cloned()
        .chain(std::iter::once(card.back.clone()))
        .collect();
    let mut rng = ChaCha8Rng::seed_from_u64(card.id as u64);
    options.shuffle(&mut rng);
    options
}
