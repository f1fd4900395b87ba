#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use card::*;
pub use config::*;
pub use dealer::*;
pub use engine::*;
pub use error::*;
pub use leaderboard::*;
pub use rules::*;
pub use scores::*;
pub use types::*;

mod card;
mod config;
mod dealer;
mod engine;
mod error;
mod leaderboard;
mod rules;
mod scores;
mod types;

/// Outcome of a single reveal request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    /// The request was ignored, nothing changed.
    NoChange,
    /// First card of a pair turned face up.
    Revealed,
    Matched,
    /// Pair did not match, the cards flip back when the hide timer fires.
    Mismatched,
    /// Last pair matched, the round is over.
    Completed { score: Score, new_best: bool },
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            Matched => true,
            Mismatched => true,
            Completed { .. } => true,
        }
    }

    pub const fn is_resolution(self) -> bool {
        matches!(
            self,
            Self::Matched | Self::Mismatched | Self::Completed { .. }
        )
    }
}

/// Outcome of delivering a timer to a round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerOutcome {
    Applied,
    /// The timer belongs to another round or was superseded, nothing changed.
    Stale,
}

impl TimerOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Applied => true,
            Self::Stale => false,
        }
    }
}
