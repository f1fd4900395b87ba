use serde::{Deserialize, Serialize};

use crate::Position;

/// What the player currently sees of a card.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardFace {
    Down,
    Up,
    Matched,
}

impl CardFace {
    /// Whether the symbol is visible
    pub const fn is_visible(self) -> bool {
        match self {
            Self::Down => false,
            Self::Up => true,
            Self::Matched => true,
        }
    }
}

/// A single card of a dealt deck.
///
/// `matched` implies `revealed`, and once matched a card never turns back down.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card<S> {
    symbol: S,
    position: Position,
    revealed: bool,
    matched: bool,
}

impl<S> Card<S> {
    /// Cards are dealt face up for the preview.
    pub(crate) const fn new(symbol: S, position: Position) -> Self {
        Self {
            symbol,
            position,
            revealed: true,
            matched: false,
        }
    }

    pub const fn symbol(&self) -> &S {
        &self.symbol
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_matched(&self) -> bool {
        self.matched
    }

    pub const fn face(&self) -> CardFace {
        match (self.revealed, self.matched) {
            (_, true) => CardFace::Matched,
            (true, false) => CardFace::Up,
            (false, false) => CardFace::Down,
        }
    }

    pub(crate) fn show(&mut self) {
        self.revealed = true;
    }

    /// Turns the card back down, matched cards stay up.
    pub(crate) fn hide(&mut self) {
        if !self.matched {
            self.revealed = false;
        }
    }

    pub(crate) fn mark_matched(&mut self) {
        self.revealed = true;
        self.matched = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hide_keeps_matched_cards_face_up() {
        let mut card = Card::new('a', 0);
        card.mark_matched();
        card.hide();

        assert!(card.is_revealed());
        assert_eq!(card.face(), CardFace::Matched);
    }

    #[test]
    fn hide_turns_unmatched_card_down() {
        let mut card = Card::new('a', 3);
        assert_eq!(card.face(), CardFace::Up);

        card.hide();

        assert_eq!(card.face(), CardFace::Down);
        assert!(!card.face().is_visible());
        assert_eq!(card.position(), 3);
    }
}
