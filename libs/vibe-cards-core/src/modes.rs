//! Interaction modes available per card.

use crate::types::{Card, CardMode, SessionMode};

/// Whether multiple choice can be offered for `card`.
///
/// Requires at least one distractor, whatever `enable_choice` says.
pub fn choice_available(card: &Card) -> bool {
    card.enable_choice && !card.distractors.is_empty()
}

/// Every mode the card supports, in display order.
pub fn supported_modes(card: &Card) -> Vec<CardMode> {
    let mut modes = vec![CardMode::Flip];
    if card.enable_write {
        modes.push(CardMode::Write);
    }
    if choice_available(card) {
        modes.push(CardMode::Choice);
    }
    modes
}

/// The single mode used when testing a card: Choice, then Write, then Flip.
pub fn active_mode(card: &Card) -> CardMode {
    if choice_available(card) {
        CardMode::Choice
    } else if card.enable_write {
        CardMode::Write
    } else {
        CardMode::Flip
    }
}

/// Modes exposed for `card` in a session of the given style.
///
/// Review sessions show every supported mode side by side; interactive
/// sessions expose only the active one.
pub fn available_modes(card: &Card, session_mode: SessionMode) -> Vec<CardMode> {
    match session_mode {
        SessionMode::ReviewOnly => supported_modes(card),
        SessionMode::Interactive => vec![active_mode(card)],
    }
}

/// Whether a submission in `mode` is accepted for `card`.
pub fn accepts(card: &Card, session_mode: SessionMode, mode: CardMode) -> bool {
    available_modes(card, session_mode).contains(&mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn card(write: bool, choice: bool, distractors: &[&str]) -> Card {
        Card {
            enable_write: write,
            enable_choice: choice,
            distractors: distractors.iter().map(|d| d.to_string()).collect(),
            ..Card::new(1, "Q", "A")
        }
    }

    #[test]
    fn flip_is_always_available() {
        let plain = card(false, false, &[]);
        assert_eq!(available_modes(&plain, SessionMode::ReviewOnly), vec![CardMode::Flip]);
        assert_eq!(available_modes(&plain, SessionMode::Interactive), vec![CardMode::Flip]);
    }

    #[test]
    fn review_exposes_all_supported_modes() {
        let full = card(true, true, &["B"]);
        assert_eq!(
            available_modes(&full, SessionMode::ReviewOnly),
            vec![CardMode::Flip, CardMode::Write, CardMode::Choice]
        );
    }

    #[test]
    fn interactive_prefers_choice_then_write() {
        assert_eq!(
            available_modes(&card(true, true, &["B"]), SessionMode::Interactive),
            vec![CardMode::Choice]
        );
        assert_eq!(
            available_modes(&card(true, false, &["B"]), SessionMode::Interactive),
            vec![CardMode::Write]
        );
    }

    #[test]
    fn choice_needs_distractors() {
        for session_mode in [SessionMode::ReviewOnly, SessionMode::Interactive] {
            for write in [false, true] {
                let modes = available_modes(&card(write, true, &[]), session_mode);
                assert!(!modes.contains(&CardMode::Choice));
            }
        }
        assert_eq!(active_mode(&card(true, true, &[])), CardMode::Write);
    }

    #[test]
    fn accepts_matches_available_modes() {
        let full = card(true, true, &["B"]);
        assert!(accepts(&full, SessionMode::ReviewOnly, CardMode::Write));
        assert!(!accepts(&full, SessionMode::Interactive, CardMode::Write));
        assert!(accepts(&full, SessionMode::Interactive, CardMode::Choice));
    }
}
