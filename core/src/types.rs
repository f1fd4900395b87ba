use core::fmt::{self, Debug, Display};
use core::hash::Hash;
use serde::{Deserialize, Serialize};

/// Index of a card within a dealt deck.
pub type Position = u16;

/// Score type, signed so a round without a floor can go below zero.
pub type Score = i32;

/// Largest number of distinct symbols a deck can be dealt from.
pub const MAX_PAIRS: usize = (Position::MAX as usize + 1) / 2;

/// Anything that can sit on the face of a card.
pub trait Symbol: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Symbol for T {}

/// Generation of a dealt round, handed out by a [`crate::Dealer`].
///
/// Timers carry the id of the round that scheduled them so a timer outliving its round is rejected.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoundId(pub(crate) u64);

impl RoundId {
    /// Id of the empty, never dealt state.
    pub const NONE: Self = Self(0);
}

impl Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
