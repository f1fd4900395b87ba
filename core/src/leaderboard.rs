use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: Score,
    /// Milliseconds since the unix epoch.
    pub timestamp_millis: i64,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// First entry for this player.
    Inserted,
    /// Replaced a lower score of the same player.
    Improved,
    /// The player already has an equal or higher score.
    Kept,
}

impl SubmitOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Inserted => true,
            Self::Improved => true,
            Self::Kept => false,
        }
    }
}

/// Best score per player name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records `entry` unless its player already holds an equal or better score.
    pub fn submit(&mut self, mut entry: LeaderboardEntry) -> Result<SubmitOutcome> {
        let name = String::from(entry.name.trim());
        if name.is_empty() {
            return Err(GameError::InvalidPlayerName);
        }
        entry.name = name;

        let outcome = match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) if !is_better(entry.score, Some(existing.score)) => SubmitOutcome::Kept,
            Some(existing) => {
                *existing = entry;
                SubmitOutcome::Improved
            }
            None => {
                self.entries.push(entry);
                SubmitOutcome::Inserted
            }
        };
        log::debug!("leaderboard submit: {:?}", outcome);
        Ok(outcome)
    }

    pub fn best_for(&self, name: &str) -> Option<&LeaderboardEntry> {
        let name = name.trim();
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Entries ranked by score, earlier timestamps first on ties, optionally limited to one difficulty.
    pub fn entries(&self, difficulty: Option<Difficulty>) -> Vec<&LeaderboardEntry> {
        let mut ranked: Vec<_> = self
            .entries
            .iter()
            .filter(|entry| difficulty.is_none() || entry.difficulty == difficulty)
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.timestamp_millis.cmp(&b.timestamp_millis))
        });
        ranked
    }

    pub fn top(&self, count: usize, difficulty: Option<Difficulty>) -> Vec<&LeaderboardEntry> {
        let mut ranked = self.entries(difficulty);
        ranked.truncate(count);
        ranked
    }
}
