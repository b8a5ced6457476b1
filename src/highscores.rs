//! Session leaderboard
//!
//! Tracks the top 10 finished runs plus per-mode bests. The host persists it
//! between sessions through the JSON helpers; nothing here touches storage.

use serde::{Deserialize, Serialize};

use crate::settings::GameMode;
use crate::sim::PlayerSlot;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A finished run (fell or completed)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub score: u64,
    pub mode: GameMode,
    pub slot: PlayerSlot,
    /// Run time in seconds
    pub time: f32,
    /// Reached the final platform
    pub completed: bool,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    /// Sorted descending by score
    pub entries: Vec<RunRecord>,
    /// Fastest completion per mode
    #[serde(default)]
    pub best_solo_time: Option<f32>,
    #[serde(default)]
    pub best_versus_time: Option<f32>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Record a finished run
    ///
    /// Completion times always count toward the mode's best time, even when the
    /// score misses the table. Returns the table rank (1-indexed) if it placed.
    pub fn add_run(&mut self, run: RunRecord) -> Option<usize> {
        if run.completed {
            let best = match run.mode {
                GameMode::Solo => &mut self.best_solo_time,
                GameMode::Versus => &mut self.best_versus_time,
            };
            if best.is_none_or(|b| run.time < b) {
                *best = Some(run.time);
            }
        }

        if !self.qualifies(run.score) {
            return None;
        }

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| run.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, run);
                i + 1
            }
            None => {
                self.entries.push(run);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Highest score recorded in a mode
    pub fn top_score_for(&self, mode: GameMode) -> Option<u64> {
        self.entries.iter().find(|e| e.mode == mode).map(|e| e.score)
    }

    pub fn best_time(&self, mode: GameMode) -> Option<f32> {
        match mode {
            GameMode::Solo => self.best_solo_time,
            GameMode::Versus => self.best_versus_time,
        }
    }

    /// Fold in records from a previous session
    pub fn merge(&mut self, other: &HighScores) {
        for run in &other.entries {
            self.add_run(*run);
        }
        for mode in [GameMode::Solo, GameMode::Versus] {
            if let Some(time) = other.best_time(mode) {
                let best = match mode {
                    GameMode::Solo => &mut self.best_solo_time,
                    GameMode::Versus => &mut self.best_versus_time,
                };
                if best.is_none_or(|b| time < b) {
                    *best = Some(time);
                }
            }
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
