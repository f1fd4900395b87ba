use thiserror::Error;

use crate::MAX_PAIRS;

/// Why a symbol set cannot be dealt.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeckIssue {
    #[error("symbol set is empty")]
    Empty,
    #[error("symbol set contains duplicates")]
    DuplicateSymbol,
    #[error("symbol set has more than {} symbols", MAX_PAIRS)]
    TooLarge,
}

/// Why a saved round cannot be restored.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum StateIssue {
    #[error("deck has an odd number of cards")]
    OddDeck,
    #[error("card does not sit at its own position")]
    MisplacedCard,
    #[error("matched card is face down")]
    MatchedFaceDown,
    #[error("more than two pending reveals")]
    TooManyPendingReveals,
    #[error("position out of range")]
    PositionOutOfRange,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid deck specification: {0}")]
    InvalidDeckSpecification(DeckIssue),
    #[error("Player name must not be blank")]
    InvalidPlayerName,
    #[error("Invalid saved state: {0}")]
    InvalidSavedState(StateIssue),
}

impl From<DeckIssue> for GameError {
    fn from(issue: DeckIssue) -> Self {
        Self::InvalidDeckSpecification(issue)
    }
}

impl From<StateIssue> for GameError {
    fn from(issue: StateIssue) -> Self {
        Self::InvalidSavedState(issue)
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
