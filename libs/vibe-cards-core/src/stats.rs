//! Per-card attempt tracking.

use crate::error::{CoreError, Result as CoreResult, StoreError};
use crate::types::{Card, CardStats, DeckLists};
use tracing::{info, warn};

/// Number of results kept in a card's history.
pub const HISTORY_LIMIT: usize = 20;

/// Record one graded attempt on `card`, keeping only the latest results.
pub fn record(card: &mut Card, correct: bool) -> &CardStats {
    let stats = &mut card.stats;
    stats.attempts += 1;
    stats.history.push(correct);
    if stats.history.len() > HISTORY_LIMIT {
        let excess = stats.history.len() - HISTORY_LIMIT;
        stats.history.drain(..excess);
    }
    stats
}

/// Hook invoked after every in-memory mutation so the storage side can save.
pub trait PersistHook {
    fn persist(&self, decks: &DeckLists) -> Result<(), StoreError>;
}

impl<F> PersistHook for F
where
    F: Fn(&DeckLists) -> Result<(), StoreError>,
{
    fn persist(&self, decks: &DeckLists) -> Result<(), StoreError> {
        self(decks)
    }
}

/// Hook that keeps everything in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPersist;

impl PersistHook for NoPersist {
    fn persist(&self, _decks: &DeckLists) -> Result<(), StoreError> {
        Ok(())
    }
}

pub(crate) fn persist(hook: &impl PersistHook, decks: &DeckLists) -> CoreResult<()> {
    hook.persist(decks).map_err(|err| {
        warn!(%err, "failed to persist deck lists");
        CoreError::from(err)
    })
}

/// Save the in-memory deck lists again after a failed persist.
///
/// Nothing is re-recorded: stats and scores were applied before the first attempt.
pub fn retry_persist(hook: &impl PersistHook, decks: &DeckLists) -> CoreResult<()> {
    persist(hook, decks)?;
    info!(lists = decks.len(), "deck lists saved on retry");
    Ok(())
}
