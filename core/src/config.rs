use core::fmt::{self, Display};
use serde::{Deserialize, Serialize};

/// Symbols of the classic screen.
pub const CLASSIC_SYMBOLS: [&str; 10] = [
    "😀", "🎉", "🚀", "💧", "🐦‍🔥", "🪼", "🍀", "🎵", "⭐", "🔥",
];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Number of pairs dealt at this level.
    pub const fn pairs(self) -> usize {
        match self {
            Self::Easy => 4,
            Self::Medium => 8,
            Self::Hard => 10,
        }
    }

    pub fn symbols(self) -> &'static [&'static str] {
        &CLASSIC_SYMBOLS[..self.pairs()]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|difficulty| difficulty.name() == name)
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
