//! Leaderboard of finished runs
//!
//! Runs rank by score; equal scores rank the quicker run first, since it
//! cleared the same asteroids in less time. Each entry remembers how the
//! run ended. Storage is left to the host; the board only serializes.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::sim::GameOverReason;

/// Runs kept on the board
pub const MAX_HIGH_SCORES: usize = 10;

/// One finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    /// Session clock when the run ended (ms)
    pub survived_ms: u64,
    pub reason: GameOverReason,
    /// Unix time (ms) the run finished
    pub timestamp: f64,
}

impl HighScoreEntry {
    /// Board order: higher score first, then shorter run
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then(self.survived_ms.cmp(&other.survived_ms))
    }
}

/// Leaderboard, kept sorted in board order
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot (0-based) a run would take. Equal runs go behind the ones
    /// already recorded. None for empty runs and runs off the bottom.
    fn slot_for(&self, entry: &HighScoreEntry) -> Option<usize> {
        if entry.score == 0 {
            return None;
        }
        let slot = self
            .entries
            .partition_point(|e| e.rank_cmp(entry) != Ordering::Greater);
        (slot < MAX_HIGH_SCORES).then_some(slot)
    }

    /// Record a finished run. Returns its 1-based rank, or None if it
    /// didn't make the board.
    pub fn record(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let slot = self.slot_for(&entry)?;
        log::info!(
            "Run of {} points ({:?}, {} ms) placed #{}",
            entry.score,
            entry.reason,
            entry.survived_ms,
            slot + 1
        );
        self.entries.insert(slot, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(slot + 1)
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}
