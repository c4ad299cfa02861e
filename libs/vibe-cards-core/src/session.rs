//! Study session state machine.
//!
//! A session moves `Dashboard -> Configuring -> Active -> Dashboard`. The
//! session never owns the decks: every transition receives the user's
//! [`DeckLists`] so that edits made between calls are picked up, and a study
//! sequence that no longer matches its list is rebuilt before use.

use crate::error::{CoreError, Result};
use crate::grader::{grade_report, Grade, GradeReport};
use crate::modes::{self, active_mode, available_modes};
use crate::ordering::{build_sequence_with, shuffle_distractors};
use crate::stats::{self, persist, PersistHook};
use crate::types::{Card, CardMode, CardStats, DeckLists, Score, SessionConfig, SessionMode};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Prev,
    Next,
}

/// Coarse session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Dashboard,
    Configuring,
    Active,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Configuring => "configuring",
            Self::Active => "active",
        }
    }
}

/// Where the cursor sits after a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Position {
    At { cursor: usize, total: usize },
    NoCards,
}

/// Flip state after a reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RevealOutcome {
    Card { is_flipped: bool },
    NoCards,
}

/// Result of a multiple-choice submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOutcome {
    pub correct: bool,
    pub expected: String,
}

/// Feedback on the most recent graded action, kept for rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feedback {
    Write {
        card_id: i64,
        expected: String,
        report: GradeReport,
    },
    Choice {
        card_id: i64,
        selected: String,
        expected: String,
        correct: bool,
    },
    SelfGrade {
        card_id: i64,
        correct: bool,
    },
}

/// What the presentation layer needs to draw the current card.
#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub id: i64,
    pub front: String,
    /// Only present once the card is flipped.
    pub back: Option<String>,
    pub modes: Vec<CardMode>,
    /// The tested mode in interactive sessions.
    pub active_mode: Option<CardMode>,
    /// Multiple-choice options, empty when choice is not offered.
    pub options: Vec<String>,
    pub stats: CardStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CurrentCard {
    Card(CardView),
    NoCards,
}

/// Full session state for rendering, produced after every transition.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub list: Option<String>,
    pub config: Option<SessionConfig>,
    pub cursor: usize,
    pub total: usize,
    pub is_flipped: bool,
    pub answered: bool,
    pub score: Score,
    pub current: Option<CurrentCard>,
    pub feedback: Option<Feedback>,
}

#[derive(Debug, Clone)]
struct ActiveSession {
    list: String,
    config: SessionConfig,
    sequence: Vec<usize>,
    cursor: usize,
    is_flipped: bool,
    answered: bool,
    score: Score,
    feedback: Option<Feedback>,
}

impl ActiveSession {
    fn new<R: Rng + ?Sized>(list: String, config: SessionConfig, len: usize, rng: &mut R) -> Self {
        Self {
            sequence: build_sequence_with(len, config.order, rng),
            list,
            config,
            cursor: 0,
            is_flipped: false,
            answered: false,
            score: Score::default(),
            feedback: None,
        }
    }

    fn card_index(&self, len: usize) -> Result<usize> {
        let index = *self.sequence.get(self.cursor).ok_or(CoreError::OutOfRange {
            index: self.cursor,
            len: self.sequence.len(),
        })?;
        if index >= len || self.sequence.len() != len {
            return Err(CoreError::OutOfRange { index, len });
        }
        Ok(index)
    }

    /// Index into the list of the card under the cursor, or `None` if the list is empty.
    fn sync(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        match self.card_index(len) {
            Ok(index) => Some(index),
            Err(err) => {
                warn!(list = %self.list, %err, "study sequence is stale, rebuilding");
                self.rebuild(len);
                self.card_index(len).ok()
            }
        }
    }

    fn rebuild(&mut self, len: usize) {
        self.sequence = build_sequence_with(len, self.config.order, &mut rand::thread_rng());
        if self.cursor >= len {
            self.cursor = 0;
        }
        self.is_flipped = false;
        self.answered = false;
    }

    fn step(&mut self, direction: Direction) -> Position {
        let total = self.sequence.len();
        self.cursor = match direction {
            Direction::Next => (self.cursor + 1) % total,
            Direction::Prev => (self.cursor + total - 1) % total,
        };
        self.is_flipped = false;
        self.answered = false;
        Position::At {
            cursor: self.cursor,
            total,
        }
    }

    /// Card under the cursor, ready for a graded submission.
    fn answerable<'d>(&mut self, decks: &'d mut DeckLists) -> Result<&'d mut Card> {
        let len = list_len(decks, &self.list);
        let index = self.sync(len).ok_or(CoreError::NoCards)?;
        if self.answered {
            return Err(CoreError::AlreadyAnswered);
        }
        decks
            .cards_mut(&self.list)
            .and_then(|cards| cards.get_mut(index))
            .ok_or(CoreError::OutOfRange { index, len })
    }
}

#[derive(Debug, Clone)]
enum State {
    Dashboard,
    Configuring { list: String },
    Active(ActiveSession),
}

fn list_len(decks: &DeckLists, list: &str) -> usize {
    decks.cards(list).map_or(0, <[Card]>::len)
}

/// One user's study session.
#[derive(Debug, Clone)]
pub struct StudySession {
    state: State,
}

impl Default for StudySession {
    fn default() -> Self {
        Self::new()
    }
}

impl StudySession {
    pub fn new() -> Self {
        Self {
            state: State::Dashboard,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            State::Dashboard => SessionPhase::Dashboard,
            State::Configuring { .. } => SessionPhase::Configuring,
            State::Active(_) => SessionPhase::Active,
        }
    }

    /// Deck list being configured or studied.
    pub fn list_name(&self) -> Option<&str> {
        match &self.state {
            State::Dashboard => None,
            State::Configuring { list } => Some(list),
            State::Active(active) => Some(&active.list),
        }
    }

    pub fn config(&self) -> Option<SessionConfig> {
        self.active().map(|a| a.config)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.active().map(|a| a.cursor)
    }

    pub fn sequence(&self) -> Option<&[usize]> {
        self.active().map(|a| a.sequence.as_slice())
    }

    pub fn is_flipped(&self) -> bool {
        self.active().is_some_and(|a| a.is_flipped)
    }

    /// Score of the running session; zero outside of one.
    pub fn current_score(&self) -> Score {
        self.active().map(|a| a.score).unwrap_or_default()
    }

    fn active(&self) -> Option<&ActiveSession> {
        match &self.state {
            State::Active(active) => Some(active),
            _ => None,
        }
    }

    fn active_mut(&mut self, action: &'static str) -> Result<&mut ActiveSession> {
        let phase = self.phase();
        match &mut self.state {
            State::Active(active) => Ok(active),
            _ => Err(CoreError::InvalidTransition {
                action,
                phase: phase.as_str(),
            }),
        }
    }

    fn invalid(&self, action: &'static str) -> CoreError {
        CoreError::InvalidTransition {
            action,
            phase: self.phase().as_str(),
        }
    }

    /// Pick the deck list to study.
    pub fn select_list(&mut self, decks: &DeckLists, name: &str) -> Result<()> {
        if matches!(self.state, State::Active(_)) {
            return Err(self.invalid("select a list"));
        }
        if !decks.contains(name) {
            return Err(CoreError::UnknownList(name.to_string()));
        }
        debug!(list = name, "configuring session");
        self.state = State::Configuring {
            list: name.to_string(),
        };
        Ok(())
    }

    /// Start studying the selected list.
    pub fn start(&mut self, decks: &DeckLists, config: SessionConfig) -> Result<()> {
        self.start_with(decks, config, &mut rand::thread_rng())
    }

    /// Start studying, shuffling with `rng` for random order.
    pub fn start_with<R: Rng + ?Sized>(
        &mut self,
        decks: &DeckLists,
        config: SessionConfig,
        rng: &mut R,
    ) -> Result<()> {
        let State::Configuring { list } = &self.state else {
            return Err(self.invalid("start"));
        };
        let list = list.clone();
        let len = decks
            .cards(&list)
            .ok_or_else(|| CoreError::UnknownList(list.clone()))?
            .len();

        info!(list = %list, cards = len, ?config, "session started");
        self.state = State::Active(ActiveSession::new(list, config, len, rng));
        Ok(())
    }

    /// Start over with the same list and configuration.
    pub fn restart(&mut self, decks: &DeckLists) -> Result<()> {
        let active = self.active_mut("restart")?;
        let (list, config) = (active.list.clone(), active.config);
        info!(list = %list, "session restarted");
        *active = ActiveSession::new(list.clone(), config, list_len(decks, &list), &mut rand::thread_rng());
        Ok(())
    }

    /// Return to the dashboard, discarding the session score.
    pub fn exit(&mut self) -> Result<Score> {
        let score = match &self.state {
            State::Dashboard => return Err(self.invalid("exit")),
            State::Configuring { .. } => Score::default(),
            State::Active(active) => {
                info!(list = %active.list, score = ?active.score, "session ended");
                active.score
            }
        };
        self.state = State::Dashboard;
        Ok(score)
    }

    /// Move to the previous or next card, wrapping around.
    pub fn advance(&mut self, decks: &DeckLists, direction: Direction) -> Result<Position> {
        let active = self.active_mut("advance")?;
        let len = list_len(decks, &active.list);
        if active.sync(len).is_none() {
            return Ok(Position::NoCards);
        }
        let position = active.step(direction);
        debug!(?direction, ?position, "advanced");
        Ok(position)
    }

    /// Toggle the flip state of the current card.
    ///
    /// Interactive sessions only allow this on cards tested by flipping; the
    /// other modes flip the card when an answer is submitted.
    pub fn reveal(&mut self, decks: &DeckLists) -> Result<RevealOutcome> {
        let active = self.active_mut("reveal")?;
        let len = list_len(decks, &active.list);
        let Some(index) = active.sync(len) else {
            return Ok(RevealOutcome::NoCards);
        };
        if active.config.mode == SessionMode::Interactive {
            let card = decks
                .cards(&active.list)
                .and_then(|cards| cards.get(index))
                .ok_or(CoreError::OutOfRange { index, len })?;
            if active_mode(card) != CardMode::Flip {
                return Err(CoreError::ModeUnavailable(CardMode::Flip.as_str()));
            }
        }
        active.is_flipped = !active.is_flipped;
        Ok(RevealOutcome::Card {
            is_flipped: active.is_flipped,
        })
    }

    /// Grade a typed answer for the current card.
    pub fn submit_write(
        &mut self,
        decks: &mut DeckLists,
        hook: &impl PersistHook,
        input: &str,
    ) -> Result<GradeReport> {
        let active = self.active_mut("submit an answer")?;
        let mode = active.config.mode;
        let card = active.answerable(decks)?;
        if !modes::accepts(card, mode, CardMode::Write) {
            return Err(CoreError::ModeUnavailable(CardMode::Write.as_str()));
        }

        let report = grade_report(input, &card.back);
        stats::record(card, report.grade.is_correct());
        let feedback = Feedback::Write {
            card_id: card.id,
            expected: card.back.clone(),
            report: report.clone(),
        };

        match report.grade {
            Grade::Exact => active.score.correct += 1,
            Grade::Close => active.score.partial += 1,
            Grade::Wrong => active.score.missed += 1,
        }
        active.is_flipped = true;
        active.answered = true;
        active.feedback = Some(feedback);
        debug!(grade = ?report.grade, similarity = report.similarity, "typed answer graded");

        persist(hook, decks)?;
        Ok(report)
    }

    /// Check a multiple-choice selection for the current card.
    pub fn submit_choice(
        &mut self,
        decks: &mut DeckLists,
        hook: &impl PersistHook,
        selected: &str,
    ) -> Result<ChoiceOutcome> {
        let active = self.active_mut("submit a choice")?;
        let mode = active.config.mode;
        let card = active.answerable(decks)?;
        if !modes::accepts(card, mode, CardMode::Choice) {
            return Err(CoreError::ModeUnavailable(CardMode::Choice.as_str()));
        }

        let correct = submit_choice(card, selected);
        let outcome = ChoiceOutcome {
            correct,
            expected: card.back.clone(),
        };
        let card_id = card.id;

        if correct {
            active.score.correct += 1;
        } else {
            active.score.missed += 1;
        }
        active.is_flipped = true;
        active.answered = true;
        active.feedback = Some(Feedback::Choice {
            card_id,
            selected: selected.to_string(),
            expected: outcome.expected.clone(),
            correct,
        });
        debug!(correct, "choice graded");

        persist(hook, decks)?;
        Ok(outcome)
    }

    /// Record a self-assessment after revealing the card, then move on.
    pub fn self_grade(
        &mut self,
        decks: &mut DeckLists,
        hook: &impl PersistHook,
        correct: bool,
    ) -> Result<Position> {
        let active = self.active_mut("self-grade")?;
        let len = list_len(decks, &active.list);
        if active.sync(len).is_none() {
            return Ok(Position::NoCards);
        }
        let mode = active.config.mode;
        let card = active.answerable(decks)?;
        if mode == SessionMode::Interactive && active_mode(card) != CardMode::Flip {
            return Err(CoreError::ModeUnavailable(CardMode::Flip.as_str()));
        }
        if !active.is_flipped {
            return Err(CoreError::NotRevealed);
        }

        stats::record(card, correct);
        let card_id = card.id;
        if correct {
            active.score.correct += 1;
        } else {
            active.score.missed += 1;
        }
        active.feedback = Some(Feedback::SelfGrade { card_id, correct });
        let position = active.step(Direction::Next);
        debug!(correct, ?position, "self-graded");

        persist(hook, decks)?;
        Ok(position)
    }

    /// Render state for the presentation layer.
    pub fn snapshot(&mut self, decks: &DeckLists) -> SessionSnapshot {
        let phase = self.phase();
        match &mut self.state {
            State::Dashboard => SessionSnapshot::idle(phase, None),
            State::Configuring { list } => SessionSnapshot::idle(phase, Some(list.clone())),
            State::Active(active) => {
                let len = list_len(decks, &active.list);
                let card = active
                    .sync(len)
                    .and_then(|index| decks.cards(&active.list)?.get(index));
                let current = match card {
                    Some(card) => {
                        CurrentCard::Card(card_view(card, active.config.mode, active.is_flipped))
                    }
                    None => CurrentCard::NoCards,
                };
                SessionSnapshot {
                    phase,
                    list: Some(active.list.clone()),
                    config: Some(active.config),
                    cursor: active.cursor,
                    total: active.sequence.len().min(len),
                    is_flipped: active.is_flipped,
                    answered: active.answered,
                    score: active.score,
                    current: Some(current),
                    feedback: active.feedback.clone(),
                }
            }
        }
    }
}

impl SessionSnapshot {
    fn idle(phase: SessionPhase, list: Option<String>) -> Self {
        Self {
            phase,
            list,
            config: None,
            cursor: 0,
            total: 0,
            is_flipped: false,
            answered: false,
            score: Score::default(),
            current: None,
            feedback: None,
        }
    }
}

/// Whether `selected` is the card's answer. Comparison is exact.
pub fn submit_choice(card: &Card, selected: &str) -> bool {
    selected == card.back
}

fn card_view(card: &Card, mode: SessionMode, is_flipped: bool) -> CardView {
    let modes = available_modes(card, mode);
    let options = if modes.contains(&CardMode::Choice) {
        shuffle_distractors(card)
    } else {
        Vec::new()
    };
    CardView {
        id: card.id,
        front: card.front.clone(),
        back: is_flipped.then(|| card.back.clone()),
        active_mode: (mode == SessionMode::Interactive).then(|| active_mode(card)),
        modes,
        options,
        stats: card.stats.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::stats::NoPersist;
    use crate::types::{NewCard, StudyOrder};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    const LIST: &str = "Default";

    fn decks_with(cards: Vec<Card>) -> DeckLists {
        DeckLists::from_lists([(LIST.to_string(), cards)].into_iter().collect())
    }

    fn write_card() -> Card {
        Card {
            enable_write: true,
            ..Card::new(1, "2+2", "4")
        }
    }

    fn choice_card() -> Card {
        Card {
            enable_choice: true,
            distractors: vec!["London".into(), "Berlin".into()],
            ..Card::new(2, "Capital of France?", "Paris")
        }
    }

    fn plain_cards(n: i64) -> Vec<Card> {
        (1..=n).map(|i| Card::new(i, format!("Q{i}"), format!("A{i}"))).collect()
    }

    fn started(decks: &DeckLists, mode: SessionMode) -> StudySession {
        let mut session = StudySession::new();
        session.select_list(decks, LIST).unwrap();
        session
            .start(
                decks,
                SessionConfig {
                    order: StudyOrder::Sequential,
                    mode,
                },
            )
            .unwrap();
        session
    }

    #[test]
    fn initial_phase_is_dashboard() {
        let session = StudySession::new();
        assert_eq!(session.phase(), SessionPhase::Dashboard);
        assert_eq!(session.current_score(), Score::default());
    }

    #[test]
    fn full_cycle() {
        let decks = decks_with(plain_cards(2));
        let mut session = StudySession::new();

        session.select_list(&decks, LIST).unwrap();
        assert_eq!(session.phase(), SessionPhase::Configuring);
        session.start(&decks, SessionConfig::default()).unwrap();
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.cursor(), Some(0));
        assert_eq!(session.sequence(), Some(&[0, 1][..]));

        session.exit().unwrap();
        assert_eq!(session.phase(), SessionPhase::Dashboard);
        assert!(session.exit().is_err());
    }

    #[test]
    fn select_unknown_list_fails() {
        let decks = decks_with(plain_cards(1));
        let mut session = StudySession::new();
        assert!(matches!(
            session.select_list(&decks, "Nope"),
            Err(CoreError::UnknownList(_))
        ));
        assert_eq!(session.phase(), SessionPhase::Dashboard);
    }

    #[test]
    fn transitions_outside_active_are_rejected() {
        let decks = decks_with(plain_cards(1));
        let mut session = StudySession::new();
        assert!(matches!(
            session.advance(&decks, Direction::Next),
            Err(CoreError::InvalidTransition { phase: "dashboard", .. })
        ));
        assert!(session.start(&decks, SessionConfig::default()).is_err());

        let mut session = started(&decks, SessionMode::ReviewOnly);
        assert!(session.select_list(&decks, LIST).is_err());
    }

    #[test]
    fn navigation_wraps_around() {
        let decks = decks_with(plain_cards(3));
        let mut session = started(&decks, SessionMode::ReviewOnly);

        assert_eq!(
            session.advance(&decks, Direction::Prev).unwrap(),
            Position::At { cursor: 2, total: 3 }
        );
        assert_eq!(
            session.advance(&decks, Direction::Next).unwrap(),
            Position::At { cursor: 0, total: 3 }
        );
    }

    #[test]
    fn single_card_wraps_to_itself() {
        let decks = decks_with(plain_cards(1));
        let mut session = started(&decks, SessionMode::ReviewOnly);
        for direction in [Direction::Next, Direction::Prev] {
            assert_eq!(
                session.advance(&decks, direction).unwrap(),
                Position::At { cursor: 0, total: 1 }
            );
        }
    }

    #[test]
    fn advance_clears_flip() {
        let decks = decks_with(plain_cards(2));
        let mut session = started(&decks, SessionMode::ReviewOnly);
        assert_eq!(
            session.reveal(&decks).unwrap(),
            RevealOutcome::Card { is_flipped: true }
        );
        assert!(session.is_flipped());
        session.advance(&decks, Direction::Next).unwrap();
        assert!(!session.is_flipped());
    }

    #[test]
    fn reveal_toggles() {
        let decks = decks_with(plain_cards(1));
        let mut session = started(&decks, SessionMode::ReviewOnly);
        assert_eq!(
            session.reveal(&decks).unwrap(),
            RevealOutcome::Card { is_flipped: true }
        );
        assert_eq!(
            session.reveal(&decks).unwrap(),
            RevealOutcome::Card { is_flipped: false }
        );
    }

    #[test]
    fn interactive_reveal_only_for_flip_cards() {
        let decks = decks_with(vec![write_card(), Card::new(5, "Q", "A")]);
        let mut session = started(&decks, SessionMode::Interactive);
        assert!(matches!(
            session.reveal(&decks),
            Err(CoreError::ModeUnavailable("flip"))
        ));
        session.advance(&decks, Direction::Next).unwrap();
        assert_eq!(
            session.reveal(&decks).unwrap(),
            RevealOutcome::Card { is_flipped: true }
        );
    }

    #[test]
    fn empty_list_reports_no_cards() {
        let decks = decks_with(Vec::new());
        let mut session = started(&decks, SessionMode::ReviewOnly);

        assert_eq!(session.advance(&decks, Direction::Next).unwrap(), Position::NoCards);
        assert_eq!(session.reveal(&decks).unwrap(), RevealOutcome::NoCards);
        let snapshot = session.snapshot(&decks);
        assert!(matches!(snapshot.current, Some(CurrentCard::NoCards)));
        assert_eq!(snapshot.total, 0);
    }

    #[test]
    fn list_emptied_mid_session_reports_no_cards() {
        let mut decks = decks_with(plain_cards(2));
        let mut session = started(&decks, SessionMode::ReviewOnly);
        session.reveal(&decks).unwrap();
        decks.cards_mut(LIST).unwrap().clear();

        assert_eq!(session.advance(&decks, Direction::Next).unwrap(), Position::NoCards);
        assert_eq!(session.reveal(&decks).unwrap(), RevealOutcome::NoCards);
        assert_eq!(
            session.self_grade(&mut decks, &NoPersist, true).unwrap(),
            Position::NoCards
        );
        assert_eq!(session.current_score(), Score::default());
    }

    #[test]
    fn deleted_active_list_reports_no_cards() {
        let mut decks = decks_with(plain_cards(1));
        decks.create_list("Other").unwrap();
        let mut session = started(&decks, SessionMode::ReviewOnly);
        decks.delete_list(LIST).unwrap();

        assert_eq!(session.reveal(&decks).unwrap(), RevealOutcome::NoCards);
        assert!(matches!(
            session.submit_write(&mut decks, &NoPersist, "A1"),
            Err(CoreError::NoCards)
        ));
    }

    #[test]
    fn shrunken_list_rebuilds_sequence() {
        let mut decks = decks_with(plain_cards(3));
        let mut session = started(&decks, SessionMode::ReviewOnly);
        session.advance(&decks, Direction::Prev).unwrap();
        assert_eq!(session.cursor(), Some(2));

        decks.remove_card(LIST, 3).unwrap();
        let position = session.advance(&decks, Direction::Next).unwrap();
        assert_eq!(position, Position::At { cursor: 1, total: 2 });
        assert_eq!(session.sequence(), Some(&[0, 1][..]));
    }

    #[test]
    fn grown_list_rebuilds_sequence() {
        let mut decks = decks_with(plain_cards(2));
        let mut session = started(&decks, SessionMode::ReviewOnly);
        decks
            .add_card(
                LIST,
                NewCard {
                    front: "new".into(),
                    back: "card".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        let snapshot = session.snapshot(&decks);
        assert_eq!(snapshot.total, 3);
        assert_eq!(session.sequence(), Some(&[0, 1, 2][..]));
    }

    #[test]
    fn random_order_is_permutation() {
        let decks = decks_with(plain_cards(10));
        let mut session = StudySession::new();
        session.select_list(&decks, LIST).unwrap();
        session
            .start(
                &decks,
                SessionConfig {
                    order: StudyOrder::Random,
                    mode: SessionMode::ReviewOnly,
                },
            )
            .unwrap();
        let mut seq = session.sequence().unwrap().to_vec();
        seq.sort_unstable();
        assert_eq!(seq, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn typed_exact_answer_scores_correct() {
        let mut decks = decks_with(vec![write_card()]);
        let mut session = started(&decks, SessionMode::Interactive);

        let report = session.submit_write(&mut decks, &NoPersist, "4").unwrap();
        assert_eq!(report.grade, Grade::Exact);
        assert_eq!(session.current_score().correct, 1);
        assert!(session.is_flipped());

        let stats = &decks.cards(LIST).unwrap()[0].stats;
        assert_eq!(stats.attempts, 1);
        assert_eq!(stats.history, vec![true]);
    }

    #[test]
    fn typed_wrong_answer_scores_missed() {
        let mut decks = decks_with(vec![write_card()]);
        let mut session = started(&decks, SessionMode::Interactive);

        let report = session.submit_write(&mut decks, &NoPersist, "five").unwrap();
        assert_eq!(report.grade, Grade::Wrong);
        assert_eq!(session.current_score().missed, 1);
        assert_eq!(decks.cards(LIST).unwrap()[0].stats.history, vec![false]);
    }

    #[test]
    fn typed_close_answer_is_partial_but_recorded_as_miss() {
        let mut decks = decks_with(vec![Card {
            enable_write: true,
            ..Card::new(1, "Capital of France?", "Paris")
        }]);
        let mut session = started(&decks, SessionMode::Interactive);

        let report = session.submit_write(&mut decks, &NoPersist, "pariss").unwrap();
        assert_eq!(report.grade, Grade::Close);
        assert_eq!(
            session.current_score(),
            Score {
                correct: 0,
                partial: 1,
                missed: 0
            }
        );
        assert_eq!(decks.cards(LIST).unwrap()[0].stats.history, vec![false]);
    }

    #[test]
    fn choice_answers() {
        let mut decks = decks_with(vec![choice_card()]);
        let mut session = started(&decks, SessionMode::Interactive);

        let outcome = session.submit_choice(&mut decks, &NoPersist, "Berlin").unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.expected, "Paris");
        assert_eq!(session.current_score().missed, 1);
        assert!(session.is_flipped());

        session.advance(&decks, Direction::Next).unwrap();
        let outcome = session.submit_choice(&mut decks, &NoPersist, "Paris").unwrap();
        assert!(outcome.correct);
        assert_eq!(session.current_score().correct, 1);
        assert_eq!(decks.cards(LIST).unwrap()[0].stats.history, vec![false, true]);
    }

    #[test]
    fn choice_comparison_is_exact() {
        let card = choice_card();
        assert!(submit_choice(&card, "Paris"));
        assert!(!submit_choice(&card, "paris"));
        assert!(!submit_choice(&card, "Paris "));
    }

    #[test]
    fn second_submission_is_rejected() {
        let mut decks = decks_with(vec![write_card()]);
        let mut session = started(&decks, SessionMode::Interactive);
        session.submit_write(&mut decks, &NoPersist, "4").unwrap();
        assert!(matches!(
            session.submit_write(&mut decks, &NoPersist, "4"),
            Err(CoreError::AlreadyAnswered)
        ));
        assert_eq!(session.current_score().total(), 1);
    }

    #[test]
    fn interactive_rejects_lower_priority_mode() {
        let mut decks = decks_with(vec![Card {
            enable_write: true,
            ..choice_card()
        }]);
        let mut session = started(&decks, SessionMode::Interactive);
        assert!(matches!(
            session.submit_write(&mut decks, &NoPersist, "Paris"),
            Err(CoreError::ModeUnavailable("write"))
        ));
    }

    #[test]
    fn choice_without_distractors_is_unavailable() {
        let mut decks = decks_with(vec![Card {
            enable_choice: true,
            ..Card::new(1, "Q", "A")
        }]);
        let mut session = started(&decks, SessionMode::ReviewOnly);
        assert!(matches!(
            session.submit_choice(&mut decks, &NoPersist, "A"),
            Err(CoreError::ModeUnavailable("choice"))
        ));
    }

    #[test]
    fn review_tabs_accept_typed_answers() {
        let mut decks = decks_with(vec![write_card()]);
        let mut session = started(&decks, SessionMode::ReviewOnly);
        let report = session.submit_write(&mut decks, &NoPersist, " 4 ").unwrap();
        assert_eq!(report.grade, Grade::Exact);
    }

    #[test]
    fn self_grade_requires_reveal_and_advances() {
        let mut decks = decks_with(plain_cards(2));
        let mut session = started(&decks, SessionMode::ReviewOnly);

        assert!(matches!(
            session.self_grade(&mut decks, &NoPersist, true),
            Err(CoreError::NotRevealed)
        ));

        session.reveal(&decks).unwrap();
        let position = session.self_grade(&mut decks, &NoPersist, true).unwrap();
        assert_eq!(position, Position::At { cursor: 1, total: 2 });
        assert!(!session.is_flipped());
        assert_eq!(session.current_score().correct, 1);
        assert_eq!(decks.cards(LIST).unwrap()[0].stats.history, vec![true]);

        session.reveal(&decks).unwrap();
        session.self_grade(&mut decks, &NoPersist, false).unwrap();
        assert_eq!(session.cursor(), Some(0));
        assert_eq!(session.current_score().missed, 1);
    }

    #[test]
    fn interactive_self_grade_on_flip_card() {
        let mut decks = decks_with(plain_cards(2));
        let mut session = started(&decks, SessionMode::Interactive);

        session.reveal(&decks).unwrap();
        let position = session.self_grade(&mut decks, &NoPersist, false).unwrap();
        assert_eq!(position, Position::At { cursor: 1, total: 2 });
        assert_eq!(session.current_score().missed, 1);
        assert_eq!(decks.cards(LIST).unwrap()[0].stats.history, vec![false]);
    }

    #[test]
    fn interactive_self_grade_rejected_on_write_card() {
        let mut decks = decks_with(vec![write_card()]);
        let mut session = started(&decks, SessionMode::Interactive);

        assert!(matches!(
            session.self_grade(&mut decks, &NoPersist, true),
            Err(CoreError::ModeUnavailable("flip"))
        ));
        assert_eq!(session.current_score(), Score::default());
        assert_eq!(decks.cards(LIST).unwrap()[0].stats.attempts, 0);
        assert_eq!(session.cursor(), Some(0));
    }

    #[test]
    fn persist_hook_runs_after_each_graded_answer() {
        let mut decks = decks_with(vec![write_card(), choice_card()]);
        let mut session = started(&decks, SessionMode::Interactive);
        let saves = Cell::new(0);
        let hook = |_: &DeckLists| -> std::result::Result<(), StoreError> {
            saves.set(saves.get() + 1);
            Ok(())
        };

        session.submit_write(&mut decks, &hook, "4").unwrap();
        session.advance(&decks, Direction::Next).unwrap();
        session.submit_choice(&mut decks, &hook, "Paris").unwrap();
        assert_eq!(saves.get(), 2);
    }

    #[test]
    fn failed_persist_keeps_in_memory_state() {
        let mut decks = decks_with(vec![write_card()]);
        let mut session = started(&decks, SessionMode::Interactive);
        let failing = |_: &DeckLists| -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("disk full".into()))
        };

        let err = session.submit_write(&mut decks, &failing, "4").unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(session.current_score().correct, 1);
        assert_eq!(decks.cards(LIST).unwrap()[0].stats.attempts, 1);

        let snapshot = session.snapshot(&decks);
        assert!(matches!(snapshot.feedback, Some(Feedback::Write { .. })));
    }

    #[test]
    fn restart_resets_score() {
        let mut decks = decks_with(vec![write_card()]);
        let mut session = started(&decks, SessionMode::Interactive);
        session.submit_write(&mut decks, &NoPersist, "4").unwrap();

        session.restart(&decks).unwrap();
        assert_eq!(session.current_score(), Score::default());
        assert!(!session.is_flipped());
        assert_eq!(session.cursor(), Some(0));
    }

    #[test]
    fn exit_returns_final_score_and_discards_it() {
        let mut decks = decks_with(vec![write_card()]);
        let mut session = started(&decks, SessionMode::Interactive);
        session.submit_write(&mut decks, &NoPersist, "4").unwrap();

        assert_eq!(session.exit().unwrap().correct, 1);
        assert_eq!(session.current_score(), Score::default());
        assert_eq!(decks.cards(LIST).unwrap()[0].stats.attempts, 1);
    }

    #[test]
    fn snapshot_hides_back_until_flipped() {
        let decks = decks_with(vec![choice_card()]);
        let mut session = started(&decks, SessionMode::ReviewOnly);

        let Some(CurrentCard::Card(view)) = session.snapshot(&decks).current else {
            panic!("expected a card");
        };
        assert_eq!(view.back, None);
        assert_eq!(view.modes, vec![CardMode::Flip, CardMode::Choice]);
        assert_eq!(view.active_mode, None);
        assert_eq!(view.options, shuffle_distractors(&choice_card()));

        session.reveal(&decks).unwrap();
        let Some(CurrentCard::Card(view)) = session.snapshot(&decks).current else {
            panic!("expected a card");
        };
        assert_eq!(view.back.as_deref(), Some("Paris"));
    }

    #[test]
    fn snapshot_serializes_phase_and_status() {
        let decks = decks_with(vec![write_card()]);
        let mut session = started(&decks, SessionMode::Interactive);
        let value = serde_json::to_value(session.snapshot(&decks)).unwrap();
        assert_eq!(value["phase"], "active");
        assert_eq!(value["current"]["status"], "card");
        assert_eq!(value["current"]["active_mode"], "write");
        assert_eq!(value["config"]["mode"], "interactive");
    }
}
